//! AST module for validated queries.
//!
//! The grammar validator produces these nodes only on full success; they are
//! immutable afterwards and dropped when the query call returns.

mod filter;
mod query;

pub use filter::{Filter, LogicalOp, NumericOp};
pub use query::{
    ApplyRule, ApplyToken, ColumnKey, Options, Order, Query, SortDirection, Transformations,
};
