//! Filter (WHERE) node definitions.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;
use insight_core::{FieldKey, WildcardPattern};

/// Logical connectives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

impl LogicalOp {
    /// Returns the query keyword.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalOp::And => "AND",
            LogicalOp::Or => "OR",
        }
    }
}

/// Numeric comparison operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NumericOp {
    Lt,
    Gt,
    Eq,
}

impl NumericOp {
    /// Returns the query keyword.
    pub fn as_str(&self) -> &'static str {
        match self {
            NumericOp::Lt => "LT",
            NumericOp::Gt => "GT",
            NumericOp::Eq => "EQ",
        }
    }

    /// Applies the comparison `lhs <op> rhs`.
    #[inline]
    pub fn compare(&self, lhs: f64, rhs: f64) -> bool {
        match self {
            NumericOp::Lt => lhs < rhs,
            NumericOp::Gt => lhs > rhs,
            NumericOp::Eq => lhs == rhs,
        }
    }
}

/// A WHERE filter node.
#[derive(Clone, Debug, PartialEq)]
pub enum Filter {
    /// AND / OR over one or more children.
    Logic {
        op: LogicalOp,
        children: Vec<Filter>,
    },
    /// NOT: flips the sense of its subtree.
    Not(Box<Filter>),
    /// LT / GT / EQ against a numeric field.
    Numeric {
        op: NumericOp,
        key: FieldKey,
        value: f64,
    },
    /// IS against a string field.
    String {
        key: FieldKey,
        pattern: WildcardPattern,
    },
}

impl Filter {
    /// Creates an AND node.
    pub fn and(children: Vec<Filter>) -> Self {
        Filter::Logic {
            op: LogicalOp::And,
            children,
        }
    }

    /// Creates an OR node.
    pub fn or(children: Vec<Filter>) -> Self {
        Filter::Logic {
            op: LogicalOp::Or,
            children,
        }
    }

    /// Creates a NOT node.
    pub fn negate(child: Filter) -> Self {
        Filter::Not(Box::new(child))
    }

    /// Collects every field key referenced in this subtree, in preorder.
    pub fn collect_keys<'a>(&'a self, out: &mut Vec<&'a FieldKey>) {
        match self {
            Filter::Logic { children, .. } => {
                for child in children {
                    child.collect_keys(out);
                }
            }
            Filter::Not(child) => child.collect_keys(out),
            Filter::Numeric { key, .. } | Filter::String { key, .. } => out.push(key),
        }
    }

    /// Returns the nesting depth of this subtree (a leaf has depth 1).
    pub fn depth(&self) -> usize {
        match self {
            Filter::Logic { children, .. } => {
                1 + children.iter().map(Filter::depth).max().unwrap_or(0)
            }
            Filter::Not(child) => 1 + child.depth(),
            _ => 1,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Logic { op, children } => {
                write!(f, "{}(", op.as_str())?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", child)?;
                }
                f.write_str(")")
            }
            Filter::Not(child) => write!(f, "NOT({})", child),
            Filter::Numeric { op, key, value } => write!(f, "{}({}, {})", op.as_str(), key, value),
            Filter::String { key, pattern } => write!(f, "IS({}, \"{}\")", key, pattern),
        }
    }
}
