use super::Direction;

use indexmap::IndexMap;

/// An ordered mapping from column name to sort direction.
///
/// Iteration order determines `ORDER BY` clause order, so entries are kept in
/// insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderSpec {
    entries: IndexMap<String, Direction>,
}

impl OrderSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry, replacing any previous direction for the column while
    /// keeping its original position.
    pub fn insert(&mut self, column: impl Into<String>, direction: Direction) {
        self.entries.insert(column.into(), direction);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Direction)> {
        self.entries.iter().map(|(col, dir)| (col.as_str(), *dir))
    }

    pub fn asc(column: impl Into<String>) -> Self {
        Self::from_iter([(column.into(), Direction::Asc)])
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self::from_iter([(column.into(), Direction::Desc)])
    }
}

impl<C: Into<String>> FromIterator<(C, Direction)> for OrderSpec {
    fn from_iter<T: IntoIterator<Item = (C, Direction)>>(iter: T) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(col, dir)| (col.into(), dir))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_insertion_order() {
        let mut order = OrderSpec::new();
        order.insert("zeta", Direction::Asc);
        order.insert("alpha", Direction::Desc);

        let cols: Vec<_> = order.iter().map(|(col, _)| col.to_string()).collect();
        assert_eq!(cols, ["zeta", "alpha"]);
    }
}
