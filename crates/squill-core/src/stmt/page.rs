/// Pagination bounds for a fetch.
///
/// An absent bound means unbounded. `limit: Some(0)` is honored literally:
/// the query is compiled with `LIMIT 0` and returns no rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl Page {
    /// No bounds: every matching row.
    pub const ALL: Page = Page {
        limit: None,
        offset: None,
    };

    pub fn limit(limit: u64) -> Page {
        Page {
            limit: Some(limit),
            ..Page::ALL
        }
    }

    pub fn offset(mut self, offset: u64) -> Page {
        self.offset = Some(offset);
        self
    }
}
