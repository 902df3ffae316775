//! Query executor module.

mod aggregate;
mod filter;
mod project;
mod relation;
mod runner;
mod sort;

pub use aggregate::AggregateExecutor;
pub use filter::{matches_record, FilterExecutor};
pub use project::{ProjectExecutor, ResultRow};
pub use relation::{GroupRow, Relation, RelationEntry};
pub use runner::{DataSource, ExecutionError, ExecutionResult, InMemoryDataSource, QueryRunner};
pub use sort::SortExecutor;
