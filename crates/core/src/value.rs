//! Value type definitions.
//!
//! A record cell holds either a number or a string. Values carry a total
//! order so they can be sorted, grouped and deduplicated directly.

use alloc::string::{String, ToString};
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};

use crate::types::FieldType;

/// A value stored in a record field or produced by an aggregation.
#[derive(Clone, Debug)]
pub enum Value {
    /// 64-bit floating point number
    Number(f64),
    /// UTF-8 string
    String(String),
}

impl Value {
    /// Returns the field type matching this value.
    pub fn field_type(&self) -> FieldType {
        match self {
            Value::Number(_) => FieldType::Numeric,
            Value::String(_) => FieldType::String,
        }
    }

    /// Returns the number if this is a Number, None otherwise.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns a reference to the string if this is a String, None otherwise.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v.as_str()),
            _ => None,
        }
    }

    /// Returns true if this is a Number.
    #[inline]
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    /// Returns the integer this number is equal to, if it is one.
    fn as_exact_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) if n.is_finite() && *n == (*n as i64) as f64 => Some(*n as i64),
            _ => None,
        }
    }

    fn type_order(&self) -> u8 {
        match self {
            Value::Number(_) => 0,
            Value::String(_) => 1,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => {
                // NaN sorts after every other number
                match (a.is_nan(), b.is_nan()) {
                    (true, true) => Ordering::Equal,
                    (true, false) => Ordering::Greater,
                    (false, true) => Ordering::Less,
                    (false, false) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
                }
            }
            (Value::String(a), Value::String(b)) => a.cmp(b),
            _ => self.type_order().cmp(&other.type_order()),
        }
    }
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        core::mem::discriminant(self).hash(state);
        match self {
            // 0.0 and -0.0 compare equal and must hash alike
            Value::Number(n) if *n == 0.0 => 0u64.hash(state),
            Value::Number(n) if n.is_nan() => u64::MAX.hash(state),
            Value::Number(n) => n.to_bits().hash(state),
            Value::String(s) => s.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => match self.as_exact_i64() {
                Some(i) => write!(f, "{}", i),
                None => write!(f, "{}", n),
            },
            Value::String(s) => f.write_str(s),
        }
    }
}

impl serde::Serialize for Value {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Number(n) => match self.as_exact_i64() {
                Some(i) => serializer.serialize_i64(i),
                None => serializer.serialize_f64(*n),
            },
            Value::String(s) => serializer.serialize_str(s),
        }
    }
}

impl<'de> serde::Deserialize<'de> for Value {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ValueVisitor;

        impl<'de> serde::de::Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a number or a string")
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Value, E> {
                Ok(Value::Number(v as f64))
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Value, E> {
                Ok(Value::Number(v as f64))
            }

            fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<Value, E> {
                Ok(Value::Number(v))
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Value, E> {
                Ok(Value::String(v.to_string()))
            }

            fn visit_string<E: serde::de::Error>(self, v: String) -> Result<Value, E> {
                Ok(Value::String(v))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Number(v as f64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Number(v as f64)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    #[test]
    fn test_value_accessors() {
        assert_eq!(Value::Number(3.5).as_f64(), Some(3.5));
        assert_eq!(Value::String("cpsc".into()).as_str(), Some("cpsc"));
        assert_eq!(Value::Number(1.0).as_str(), None);
        assert_eq!(Value::String("1".into()).as_f64(), None);
        assert_eq!(Value::Number(1.0).field_type(), FieldType::Numeric);
    }

    #[test]
    fn test_value_equality() {
        assert_eq!(Value::Number(42.0), Value::Number(42.0));
        assert_eq!(Value::Number(0.0), Value::Number(-0.0));
        assert_eq!(Value::Number(f64::NAN), Value::Number(f64::NAN));
        assert_ne!(Value::Number(1.0), Value::String("1".into()));
    }

    #[test]
    fn test_value_ordering() {
        assert!(Value::Number(1.0) < Value::Number(2.0));
        assert!(Value::Number(-1.5) < Value::Number(0.0));
        assert!(Value::String("adhe".into()) < Value::String("cpsc".into()));
        assert!(Value::Number(1e9) < Value::String("".into()));
        assert!(Value::Number(f64::INFINITY) < Value::Number(f64::NAN));

        let mut values = vec![
            Value::String("b".into()),
            Value::Number(2.0),
            Value::String("a".into()),
            Value::Number(1.0),
        ];
        values.sort();
        let expected: Vec<Value> = vec![1.0.into(), 2.0.into(), "a".into(), "b".into()];
        assert_eq!(values, expected);
    }

    #[test]
    fn test_display() {
        use alloc::string::ToString;
        assert_eq!(Value::Number(95.0).to_string(), "95");
        assert_eq!(Value::Number(72.25).to_string(), "72.25");
        assert_eq!(Value::String("math".into()).to_string(), "math");
    }

    #[test]
    fn test_serialize_integral_numbers_as_integers() {
        assert_eq!(serde_json::to_string(&Value::Number(95.0)).unwrap(), "95");
        assert_eq!(serde_json::to_string(&Value::Number(2.2)).unwrap(), "2.2");
        assert_eq!(
            serde_json::to_string(&Value::String("cpsc".into())).unwrap(),
            "\"cpsc\""
        );
    }

    #[test]
    fn test_deserialize() {
        let v: Value = serde_json::from_str("80").unwrap();
        assert_eq!(v, Value::Number(80.0));
        let v: Value = serde_json::from_str("80.5").unwrap();
        assert_eq!(v, Value::Number(80.5));
        let v: Value = serde_json::from_str("\"math\"").unwrap();
        assert_eq!(v, Value::String("math".into()));
        assert!(serde_json::from_str::<Value>("true").is_err());
    }
}
