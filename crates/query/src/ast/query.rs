//! Query, OPTIONS and TRANSFORMATIONS node definitions.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;
use insight_core::FieldKey;

use crate::ast::filter::Filter;

/// A validated query.
#[derive(Clone, Debug, PartialEq)]
pub struct Query {
    /// WHERE clause; `None` when WHERE is `{}` and every record matches.
    pub filter: Option<Filter>,
    /// OPTIONS clause.
    pub options: Options,
    /// TRANSFORMATIONS clause, if present.
    pub transformations: Option<Transformations>,
}

impl Query {
    /// Collects every field key referenced anywhere in the query, in the
    /// order WHERE, OPTIONS, TRANSFORMATIONS. Apply-keys carry no dataset
    /// prefix and are not included; apply-rule targets are.
    pub fn field_keys(&self) -> Vec<&FieldKey> {
        let mut keys = Vec::new();
        if let Some(filter) = &self.filter {
            filter.collect_keys(&mut keys);
        }
        keys.extend(self.options.columns.iter().filter_map(ColumnKey::as_field));
        if let Some(order) = &self.options.order {
            keys.extend(order.keys().iter().filter_map(ColumnKey::as_field));
        }
        if let Some(transformations) = &self.transformations {
            keys.extend(transformations.group.iter());
            keys.extend(transformations.apply.iter().map(|rule| &rule.field));
        }
        keys
    }
}

/// A COLUMNS / ORDER entry: either a dataset field or an apply-key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ColumnKey {
    /// `<dataset>_<field>`
    Field(FieldKey),
    /// An unprefixed aggregation output name.
    Apply(String),
}

impl ColumnKey {
    /// Returns the field key, if this is one.
    pub fn as_field(&self) -> Option<&FieldKey> {
        match self {
            ColumnKey::Field(key) => Some(key),
            ColumnKey::Apply(_) => None,
        }
    }

    /// Returns the output column name.
    pub fn name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKey::Field(key) => write!(f, "{}", key),
            ColumnKey::Apply(name) => f.write_str(name),
        }
    }
}

/// OPTIONS clause.
#[derive(Clone, Debug, PartialEq)]
pub struct Options {
    /// Requested output columns, in output order. Never empty.
    pub columns: Vec<ColumnKey>,
    /// Sort specification.
    pub order: Option<Order>,
}

/// Sort direction for the directional ORDER form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Up,
    Down,
}

/// ORDER clause.
#[derive(Clone, Debug, PartialEq)]
pub enum Order {
    /// `"ORDER": "<key>"`, ascending.
    Single(ColumnKey),
    /// `"ORDER": { "dir": ..., "keys": [...] }`, one direction for all keys.
    Directional {
        direction: SortDirection,
        keys: Vec<ColumnKey>,
    },
}

impl Order {
    /// Returns the sort keys, most significant first.
    pub fn keys(&self) -> &[ColumnKey] {
        match self {
            Order::Single(key) => core::slice::from_ref(key),
            Order::Directional { keys, .. } => keys,
        }
    }

    /// Returns the sort direction.
    pub fn direction(&self) -> SortDirection {
        match self {
            Order::Single(_) => SortDirection::Up,
            Order::Directional { direction, .. } => *direction,
        }
    }
}

/// Aggregation operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ApplyToken {
    Max,
    Min,
    Avg,
    Count,
    Sum,
}

impl ApplyToken {
    /// Returns the query keyword.
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplyToken::Max => "MAX",
            ApplyToken::Min => "MIN",
            ApplyToken::Avg => "AVG",
            ApplyToken::Count => "COUNT",
            ApplyToken::Sum => "SUM",
        }
    }

    /// Parses a query keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "MAX" => Some(ApplyToken::Max),
            "MIN" => Some(ApplyToken::Min),
            "AVG" => Some(ApplyToken::Avg),
            "COUNT" => Some(ApplyToken::Count),
            "SUM" => Some(ApplyToken::Sum),
            _ => None,
        }
    }

    /// Returns true if the operator only accepts numeric fields.
    pub fn requires_numeric(&self) -> bool {
        !matches!(self, ApplyToken::Count)
    }
}

/// One APPLY entry: `{ "<apply_key>": { "<TOKEN>": "<field_key>" } }`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApplyRule {
    pub key: String,
    pub token: ApplyToken,
    pub field: FieldKey,
}

/// TRANSFORMATIONS clause.
#[derive(Clone, Debug, PartialEq)]
pub struct Transformations {
    /// GROUP keys, never empty.
    pub group: Vec<FieldKey>,
    /// APPLY rules, never empty.
    pub apply: Vec<ApplyRule>,
}

impl Transformations {
    /// Returns the apply rule producing `key`, if any.
    pub fn rule(&self, key: &str) -> Option<&ApplyRule> {
        self.apply.iter().find(|rule| rule.key == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::NumericOp;
    use alloc::vec;
    use insight_core::Field;

    fn key(field: Field) -> FieldKey {
        FieldKey::new("courses", field)
    }

    #[test]
    fn test_field_keys_cover_every_clause() {
        let query = Query {
            filter: Some(Filter::Numeric {
                op: NumericOp::Gt,
                key: key(Field::Avg),
                value: 90.0,
            }),
            options: Options {
                columns: vec![
                    ColumnKey::Field(key(Field::Dept)),
                    ColumnKey::Apply("maxPass".into()),
                ],
                order: Some(Order::Single(ColumnKey::Apply("maxPass".into()))),
            },
            transformations: Some(Transformations {
                group: vec![key(Field::Dept)],
                apply: vec![ApplyRule {
                    key: "maxPass".into(),
                    token: ApplyToken::Max,
                    field: key(Field::Pass),
                }],
            }),
        };

        let keys = query.field_keys();
        assert_eq!(
            keys,
            vec![
                &key(Field::Avg),
                &key(Field::Dept),
                &key(Field::Dept),
                &key(Field::Pass)
            ]
        );
    }

    #[test]
    fn test_order_accessors() {
        let single = Order::Single(ColumnKey::Field(key(Field::Avg)));
        assert_eq!(single.keys().len(), 1);
        assert_eq!(single.direction(), SortDirection::Up);

        let directional = Order::Directional {
            direction: SortDirection::Down,
            keys: vec![
                ColumnKey::Field(key(Field::Dept)),
                ColumnKey::Field(key(Field::Avg)),
            ],
        };
        assert_eq!(directional.keys().len(), 2);
        assert_eq!(directional.direction(), SortDirection::Down);
    }

    #[test]
    fn test_column_key_names() {
        assert_eq!(ColumnKey::Field(key(Field::Avg)).name(), "courses_avg");
        assert_eq!(ColumnKey::Apply("overallAvg".into()).name(), "overallAvg");
    }

    #[test]
    fn test_apply_tokens() {
        for token in [
            ApplyToken::Max,
            ApplyToken::Min,
            ApplyToken::Avg,
            ApplyToken::Count,
            ApplyToken::Sum,
        ] {
            assert_eq!(ApplyToken::from_keyword(token.as_str()), Some(token));
        }
        assert_eq!(ApplyToken::from_keyword("MEAN"), None);
        assert!(!ApplyToken::Count.requires_numeric());
        assert!(ApplyToken::Sum.requires_numeric());
    }
}
