use crate::{Error, Result};

/// A driver-agnostic SQL value.
#[derive(Debug, Default, Clone, PartialEq)]
pub enum Value {
    /// Boolean value
    Bool(bool),

    /// Signed 64-bit integer
    I64(i64),

    /// 64-bit float
    F64(f64),

    /// String value
    String(String),

    /// Binary value
    Bytes(Vec<u8>),

    /// Null value
    #[default]
    Null,
}

impl Value {
    pub const fn null() -> Self {
        Self::Null
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn to_bool(self) -> Result<bool> {
        match self {
            Self::Bool(v) => Ok(v),
            _ => Err(type_mismatch(&self, "bool")),
        }
    }

    pub fn to_i64(self) -> Result<i64> {
        match self {
            Self::I64(v) => Ok(v),
            _ => Err(type_mismatch(&self, "i64")),
        }
    }

    pub fn to_f64(self) -> Result<f64> {
        match self {
            Self::F64(v) => Ok(v),
            _ => Err(type_mismatch(&self, "f64")),
        }
    }

    pub fn to_string(self) -> Result<String> {
        match self {
            Self::String(v) => Ok(v),
            _ => Err(type_mismatch(&self, "String")),
        }
    }

    pub fn to_bytes(self) -> Result<Vec<u8>> {
        match self {
            Self::Bytes(v) => Ok(v),
            _ => Err(type_mismatch(&self, "Bytes")),
        }
    }

    /// Converts to `Some(i64)`, treating null as `None`.
    pub fn to_option_i64(self) -> Result<Option<i64>> {
        match self {
            Self::Null => Ok(None),
            other => other.to_i64().map(Some),
        }
    }

    /// Converts to `Some(String)`, treating null as `None`.
    pub fn to_option_string(self) -> Result<Option<String>> {
        match self {
            Self::Null => Ok(None),
            other => other.to_string().map(Some),
        }
    }
}

fn type_mismatch(value: &Value, target: &str) -> Error {
    Error::scan(format!("cannot convert {value:?} to {target}"))
}

impl From<bool> for Value {
    fn from(src: bool) -> Self {
        Self::Bool(src)
    }
}

impl From<i64> for Value {
    fn from(src: i64) -> Self {
        Self::I64(src)
    }
}

impl From<i32> for Value {
    fn from(src: i32) -> Self {
        Self::I64(src as i64)
    }
}

impl From<f64> for Value {
    fn from(src: f64) -> Self {
        Self::F64(src)
    }
}

impl From<String> for Value {
    fn from(src: String) -> Self {
        Self::String(src)
    }
}

impl From<&str> for Value {
    fn from(src: &str) -> Self {
        Self::String(src.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(src: Vec<u8>) -> Self {
        Self::Bytes(src)
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(src: Option<T>) -> Self {
        match src {
            Some(value) => value.into(),
            None => Self::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversion_accessors() {
        assert_eq!(Value::from(42i64).to_i64().unwrap(), 42);
        assert_eq!(Value::from("hi").to_string().unwrap(), "hi");
        assert_eq!(Value::Null.to_option_i64().unwrap(), None);
        assert_eq!(Value::from(7i64).to_option_i64().unwrap(), Some(7));
    }

    #[test]
    fn mismatch_is_scan_class() {
        let err = Value::from("hi").to_i64().unwrap_err();
        assert!(err.is_scan());
    }

    #[test]
    fn option_rounds_to_null() {
        let v: Value = Option::<i64>::None.into();
        assert!(v.is_null());
    }
}
