use crate::{stmt::ValueRecord, Error, Result};

#[derive(Debug)]
pub struct Response {
    pub rows: Rows,
}

#[derive(Debug)]
pub enum Rows {
    /// Statement result for operations that do not return rows.
    Count(ExecCount),

    /// Operation result rows, in result-set order.
    Values(Vec<ValueRecord>),
}

/// The outcome of a non-returning statement.
///
/// `last_insert_id` is the backend's last generated key on this connection,
/// reported by drivers whose dialect retrieves mutation results with a
/// wrapped select. For a multi-row insert it is the *last* key of the
/// statement's contiguous range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecCount {
    pub affected: u64,
    pub last_insert_id: Option<u64>,
}

impl Response {
    pub fn count(affected: u64) -> Self {
        Self {
            rows: Rows::Count(ExecCount {
                affected,
                last_insert_id: None,
            }),
        }
    }

    pub fn count_with_last_id(affected: u64, last_insert_id: Option<u64>) -> Self {
        Self {
            rows: Rows::Count(ExecCount {
                affected,
                last_insert_id,
            }),
        }
    }

    pub fn values(rows: Vec<ValueRecord>) -> Self {
        Self {
            rows: Rows::Values(rows),
        }
    }
}

impl Rows {
    pub fn is_count(&self) -> bool {
        matches!(self, Self::Count(_))
    }

    pub fn is_values(&self) -> bool {
        matches!(self, Self::Values(_))
    }

    pub fn into_count(self) -> Result<ExecCount> {
        match self {
            Self::Count(count) => Ok(count),
            Self::Values(rows) => Err(Error::invalid_result(format!(
                "expected an affected-row count, got {} result rows",
                rows.len()
            ))),
        }
    }

    pub fn into_values(self) -> Result<Vec<ValueRecord>> {
        match self {
            Self::Values(rows) => Ok(rows),
            Self::Count(count) => Err(Error::invalid_result(format!(
                "expected result rows, got an affected-row count of {}",
                count.affected
            ))),
        }
    }
}
