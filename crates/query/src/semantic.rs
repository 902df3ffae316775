//! Semantic validation.
//!
//! Runs on a grammatically valid [`Query`] and enforces the rules that need
//! whole-query context: ORDER/COLUMNS consistency, GROUP/APPLY coverage of
//! COLUMNS, apply-key uniqueness, the single-dataset rule and numeric
//! aggregation targets. On success it returns the id of the one dataset the
//! query reads.
//!
//! Checks run in a fixed order and the first violation is reported:
//!
//! 1. TRANSFORMATIONS: unique apply-keys, then COLUMNS a subset of GROUP and APPLY keys
//! 2. ORDER keys a subset of COLUMNS
//! 3. a single dataset prefix, known to the data source
//! 4. MAX/MIN/AVG/SUM target numeric fields
//! 5. apply-keys in COLUMNS require TRANSFORMATIONS
//! 6. every field exists on the dataset's kind

use alloc::format;
use alloc::string::String;
use hashbrown::HashSet;
use insight_core::DatasetKind;

use crate::ast::{ColumnKey, Query, Transformations};
use crate::error::{QueryError, QueryResult};
use crate::executor::DataSource;

/// Validates `query` against the datasets known to `source` and returns the
/// resolved dataset id.
pub fn validate<D: DataSource + ?Sized>(query: &Query, source: &D) -> QueryResult<String> {
    if let Some(transformations) = &query.transformations {
        check_transformations(query, transformations)?;
    }
    check_order(query)?;

    let dataset = resolve_dataset(query)?;
    let kind = source
        .kind(&dataset)
        .ok_or_else(|| QueryError::semantic(format!("dataset {} does not exist", dataset)))?;

    check_numeric_aggregations(query)?;
    check_apply_columns(query)?;
    check_field_kinds(query, &dataset, kind)?;

    log::debug!("query resolved to {} dataset {}", kind, dataset);
    Ok(dataset)
}

fn check_transformations(query: &Query, transformations: &Transformations) -> QueryResult<()> {
    let mut apply_keys = HashSet::with_capacity(transformations.apply.len());
    for rule in &transformations.apply {
        if !apply_keys.insert(rule.key.as_str()) {
            return Err(QueryError::semantic(
                "applykey must be unique for each APPLYRULE.",
            ));
        }
    }

    let covered = query.options.columns.iter().all(|column| match column {
        ColumnKey::Field(key) => transformations.group.contains(key),
        ColumnKey::Apply(name) => apply_keys.contains(name.as_str()),
    });
    if !covered {
        return Err(QueryError::semantic(
            "COLUMN keys must be found in GROUP or APPLY keys.",
        ));
    }
    Ok(())
}

fn check_order(query: &Query) -> QueryResult<()> {
    let Some(order) = &query.options.order else {
        return Ok(());
    };
    match order
        .keys()
        .iter()
        .find(|key| !query.options.columns.contains(key))
    {
        Some(missing) => Err(QueryError::semantic(format!(
            "ORDER key must be in COLUMNS: {}",
            missing
        ))),
        None => Ok(()),
    }
}

/// Returns the dataset prefix shared by every field key in the query.
fn resolve_dataset(query: &Query) -> QueryResult<String> {
    let keys = query.field_keys();
    let mut datasets = keys.iter().map(|key| key.dataset.as_str());
    let first = datasets
        .next()
        .ok_or_else(|| QueryError::semantic("dataset could not be determined"))?;
    if datasets.any(|other| other != first) {
        return Err(QueryError::semantic(
            "Query cannot reference multiple datasets",
        ));
    }
    Ok(String::from(first))
}

fn check_numeric_aggregations(query: &Query) -> QueryResult<()> {
    let Some(transformations) = &query.transformations else {
        return Ok(());
    };
    let invalid = transformations
        .apply
        .iter()
        .any(|rule| rule.token.requires_numeric() && !rule.field.is_numeric());
    if invalid {
        return Err(QueryError::semantic(
            "MAX, MIN, AVG, SUM should only be applied to numeric fields.",
        ));
    }
    Ok(())
}

fn check_apply_columns(query: &Query) -> QueryResult<()> {
    if query.transformations.is_some() {
        return Ok(());
    }
    match query
        .options
        .columns
        .iter()
        .find(|column| matches!(column, ColumnKey::Apply(_)))
    {
        Some(column) => Err(QueryError::semantic(format!(
            "COLUMNS key {} is not a field key and the query has no TRANSFORMATIONS",
            column
        ))),
        None => Ok(()),
    }
}

fn check_field_kinds(query: &Query, dataset: &str, kind: DatasetKind) -> QueryResult<()> {
    match query
        .field_keys()
        .into_iter()
        .find(|key| !key.field.belongs_to(kind))
    {
        Some(key) => Err(QueryError::semantic(format!(
            "{} is not a field of {} dataset {}",
            key, kind, dataset
        ))),
        None => Ok(()),
    }
}
