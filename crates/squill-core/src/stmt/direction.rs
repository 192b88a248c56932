/// Sort direction for an `ORDER BY` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }

    /// Resolves a wire direction value, case-insensitively.
    pub fn from_wire(value: &str) -> Option<Direction> {
        if value.eq_ignore_ascii_case("ASC") {
            Some(Direction::Asc)
        } else if value.eq_ignore_ascii_case("DESC") {
            Some(Direction::Desc)
        } else {
            None
        }
    }
}
