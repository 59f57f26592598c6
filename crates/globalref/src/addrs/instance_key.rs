use std::fmt::{Display, Formatter};

/// Key selecting one instance of a repeated object
///
/// `count` produces [InstanceKey::Int] keys, `for_each` produces [InstanceKey::String] keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InstanceKey {
    Int(i64),
    String(String),
}

impl InstanceKey {
    /// Convert a constant hcl value into a key
    ///
    /// Only whole numbers and strings can be used as keys.
    pub fn from_value(value: &hcl::Value) -> Option<Self> {
        match value {
            hcl::Value::Number(num) => num.as_i64().map(InstanceKey::Int),
            hcl::Value::String(s) => Some(InstanceKey::String(s.clone())),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            InstanceKey::String(s) => Some(s),
            InstanceKey::Int(_) => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            InstanceKey::Int(i) => Some(*i),
            InstanceKey::String(_) => None,
        }
    }
}

impl From<i64> for InstanceKey {
    fn from(value: i64) -> Self {
        InstanceKey::Int(value)
    }
}

impl From<&str> for InstanceKey {
    fn from(value: &str) -> Self {
        InstanceKey::String(value.to_string())
    }
}

impl From<String> for InstanceKey {
    fn from(value: String) -> Self {
        InstanceKey::String(value)
    }
}

/// Renders the key in index syntax: `[0]` or `["name"]`
impl Display for InstanceKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            InstanceKey::Int(i) => write!(f, "[{i}]"),
            InstanceKey::String(s) => write!(f, "[{s:?}]"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(InstanceKey::Int(3).to_string(), "[3]");
        assert_eq!(InstanceKey::from("whatever").to_string(), r#"["whatever"]"#);
        assert_eq!(InstanceKey::from("a\"b").to_string(), r#"["a\"b"]"#);
    }

    #[test]
    fn from_value() {
        assert_eq!(
            InstanceKey::from_value(&hcl::Value::from(2)),
            Some(InstanceKey::Int(2))
        );
        assert_eq!(
            InstanceKey::from_value(&hcl::Value::from("k")),
            Some(InstanceKey::from("k"))
        );
        assert_eq!(InstanceKey::from_value(&hcl::Value::Bool(true)), None);
        assert_eq!(InstanceKey::from_value(&hcl::Value::from(1.5)), None);
    }
}
