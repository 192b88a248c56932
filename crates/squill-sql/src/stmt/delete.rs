use squill_core::stmt::FilterNode;

/// `DELETE FROM <table> [WHERE ...]`
///
/// An absent filter deletes every row; that is the caller's explicit
/// "match all" policy, not an error.
#[derive(Debug, Clone)]
pub struct Delete {
    pub table: String,
    pub filter: Option<FilterNode>,
    pub returning: bool,
}
