//! Grammar validation.
//!
//! Walks a raw, untyped query (a decoded JSON value) and checks its structure:
//! required and permitted keys, arities, value types and key shapes. On
//! success it returns the typed [`Query`] AST; the first violation aborts
//! with a [`QueryError::Grammar`] and nothing is returned.
//!
//! Grammar validation never looks at dataset contents and does not check
//! cross-clause rules; those belong to [`crate::semantic`].
//!
//! ```
//! use insight_query::grammar;
//!
//! let query = grammar::parse_query(r#"{
//!     "WHERE": { "GT": { "courses_avg": 90 } },
//!     "OPTIONS": { "COLUMNS": ["courses_dept", "courses_avg"], "ORDER": "courses_avg" }
//! }"#).unwrap();
//! assert!(query.filter.is_some());
//! assert_eq!(query.options.columns.len(), 2);
//! ```

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use insight_core::{FieldKey, WildcardPattern};
use serde_json::{Map, Value as Json};

use crate::ast::{
    ApplyRule, ApplyToken, ColumnKey, Filter, LogicalOp, NumericOp, Options, Order, Query,
    SortDirection, Transformations,
};
use crate::error::{QueryError, QueryResult};

const WHERE: &str = "WHERE";
const OPTIONS: &str = "OPTIONS";
const TRANSFORMATIONS: &str = "TRANSFORMATIONS";
const COLUMNS: &str = "COLUMNS";
const ORDER: &str = "ORDER";
const GROUP: &str = "GROUP";
const APPLY: &str = "APPLY";

/// Decodes JSON text and validates it as a query.
pub fn parse_query(text: &str) -> QueryResult<Query> {
    let raw: Json = serde_json::from_str(text)
        .map_err(|e| QueryError::grammar(format!("Query is not valid JSON: {}", e)))?;
    validate(&raw)
}

/// Validates a raw query value against the grammar and builds its AST.
pub fn validate(raw: &Json) -> QueryResult<Query> {
    let root = raw
        .as_object()
        .ok_or_else(|| QueryError::grammar("Query must be an object"))?;
    check_query_keys(root)?;

    let where_clause = root
        .get(WHERE)
        .and_then(Json::as_object)
        .ok_or_else(|| QueryError::grammar("WHERE must be an object"))?;
    // WHERE: {} matches every record
    let filter = if where_clause.is_empty() {
        None
    } else {
        Some(check_filter_object(where_clause)?)
    };

    let options = check_options(&root[OPTIONS])?;
    let transformations = root
        .get(TRANSFORMATIONS)
        .map(check_transformations)
        .transpose()?;

    log::debug!(
        "grammar accepted query: {} column(s), filter depth {}, transformations: {}",
        options.columns.len(),
        filter.as_ref().map_or(0, Filter::depth),
        transformations.is_some()
    );

    Ok(Query {
        filter,
        options,
        transformations,
    })
}

fn check_query_keys(root: &Map<String, Json>) -> QueryResult<()> {
    if !root.contains_key(WHERE) {
        return Err(QueryError::grammar("Missing WHERE in query"));
    }
    if !root.contains_key(OPTIONS) {
        return Err(QueryError::grammar("Missing OPTIONS in query"));
    }
    if let Some(extra) = root
        .keys()
        .find(|key| !matches!(key.as_str(), WHERE | OPTIONS | TRANSFORMATIONS))
    {
        return Err(QueryError::grammar(format!("Excess key in query: {}", extra)));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// WHERE
// ---------------------------------------------------------------------------

fn check_filter(value: &Json) -> QueryResult<Filter> {
    let object = value
        .as_object()
        .ok_or_else(|| QueryError::grammar("FILTER must be an object"))?;
    check_filter_object(object)
}

fn check_filter_object(object: &Map<String, Json>) -> QueryResult<Filter> {
    let mut entries = object.iter();
    let (key, body) = match (entries.next(), entries.next()) {
        (Some(entry), None) => entry,
        _ => {
            return Err(QueryError::grammar(format!(
                "FILTER must contain exactly one key, found {}",
                object.len()
            )))
        }
    };

    match key.as_str() {
        "AND" => check_logic(LogicalOp::And, body),
        "OR" => check_logic(LogicalOp::Or, body),
        "LT" => check_numeric_comparison(NumericOp::Lt, body),
        "GT" => check_numeric_comparison(NumericOp::Gt, body),
        "EQ" => check_numeric_comparison(NumericOp::Eq, body),
        "IS" => check_string_comparison(body),
        "NOT" => Ok(Filter::negate(check_filter(body)?)),
        other => Err(QueryError::grammar(format!("Invalid FILTER key: {}", other))),
    }
}

fn check_logic(op: LogicalOp, body: &Json) -> QueryResult<Filter> {
    let items = match body.as_array() {
        Some(items) if !items.is_empty() => items,
        _ => {
            return Err(QueryError::grammar(format!(
                "{} must be a non-empty array",
                op.as_str()
            )))
        }
    };
    let children = items.iter().map(check_filter).collect::<QueryResult<Vec<_>>>()?;
    Ok(Filter::Logic { op, children })
}

/// Returns the single `(key, value)` entry of a comparator object.
fn single_entry<'a>(body: &'a Json, name: &str) -> QueryResult<(&'a String, &'a Json)> {
    let object = body
        .as_object()
        .ok_or_else(|| QueryError::grammar(format!("{} must be an object", name)))?;
    let mut entries = object.iter();
    match (entries.next(), entries.next()) {
        (Some(entry), None) => Ok(entry),
        _ => Err(QueryError::grammar(format!(
            "{} must contain exactly one key, found {}",
            name,
            object.len()
        ))),
    }
}

fn check_numeric_comparison(op: NumericOp, body: &Json) -> QueryResult<Filter> {
    let (key, value) = single_entry(body, op.as_str())?;
    let key = match FieldKey::parse(key) {
        Ok(key) if key.is_numeric() => key,
        _ => {
            return Err(QueryError::grammar(format!(
                "{} requires a numeric field key, got '{}'",
                op.as_str(),
                key
            )))
        }
    };
    let value = value.as_f64().ok_or_else(|| {
        QueryError::grammar(format!("{} requires a numeric value", op.as_str()))
    })?;
    Ok(Filter::Numeric { op, key, value })
}

fn check_string_comparison(body: &Json) -> QueryResult<Filter> {
    let (key, value) = single_entry(body, "IS")?;
    let key = match FieldKey::parse(key) {
        Ok(key) if !key.is_numeric() => key,
        _ => {
            return Err(QueryError::grammar(format!(
                "IS requires a string field key, got '{}'",
                key
            )))
        }
    };
    let input = value
        .as_str()
        .ok_or_else(|| QueryError::grammar("IS requires a string value"))?;
    let pattern = WildcardPattern::compile(input).map_err(|e| QueryError::grammar(e.to_string()))?;
    Ok(Filter::String { key, pattern })
}

// ---------------------------------------------------------------------------
// OPTIONS
// ---------------------------------------------------------------------------

fn check_options(value: &Json) -> QueryResult<Options> {
    let object = value
        .as_object()
        .ok_or_else(|| QueryError::grammar("OPTIONS must be an object"))?;
    if !object.contains_key(COLUMNS) {
        return Err(QueryError::grammar("Missing COLUMNS in OPTIONS"));
    }
    if let Some(extra) = object
        .keys()
        .find(|key| !matches!(key.as_str(), COLUMNS | ORDER))
    {
        return Err(QueryError::grammar(format!("Invalid key in OPTIONS: {}", extra)));
    }

    // a repeated key names the same output column once, at its first position
    let columns = match object[COLUMNS].as_array() {
        Some(items) if !items.is_empty() => {
            let mut columns: Vec<ColumnKey> = Vec::with_capacity(items.len());
            for item in items {
                let key = column_key(item, COLUMNS)?;
                if !columns.contains(&key) {
                    columns.push(key);
                }
            }
            columns
        }
        Some(_) => return Err(QueryError::grammar("COLUMNS must contain at least one key")),
        None => return Err(QueryError::grammar("COLUMNS must be an array")),
    };
    let order = object.get(ORDER).map(check_order).transpose()?;

    Ok(Options { columns, order })
}

/// Parses a COLUMNS or ORDER entry: a field key if it contains an
/// underscore, otherwise an apply-key.
fn column_key(value: &Json, clause: &str) -> QueryResult<ColumnKey> {
    let key = value
        .as_str()
        .ok_or_else(|| QueryError::grammar(format!("{} keys must be strings", clause)))?;
    if key.contains('_') {
        FieldKey::parse(key)
            .map(ColumnKey::Field)
            .map_err(|e| QueryError::grammar(format!("Invalid {} key: {}", clause, e)))
    } else if key.is_empty() {
        Err(QueryError::grammar(format!("{} keys cannot be empty", clause)))
    } else {
        Ok(ColumnKey::Apply(key.to_string()))
    }
}

fn check_order(value: &Json) -> QueryResult<Order> {
    match value {
        Json::String(_) => Ok(Order::Single(column_key(value, ORDER)?)),
        Json::Object(object) => {
            let (Some(dir), Some(keys)) = (object.get("dir"), object.get("keys")) else {
                return Err(QueryError::grammar("ORDER must contain 'dir' and 'keys'"));
            };
            if object.len() != 2 {
                return Err(QueryError::grammar("ORDER may only contain 'dir' and 'keys'"));
            }
            let direction = match dir.as_str() {
                Some("UP") => SortDirection::Up,
                Some("DOWN") => SortDirection::Down,
                _ => return Err(QueryError::grammar("ORDER 'dir' must be \"UP\" or \"DOWN\"")),
            };
            let keys = match keys.as_array() {
                Some(items) if !items.is_empty() => items
                    .iter()
                    .map(|item| column_key(item, ORDER))
                    .collect::<QueryResult<Vec<_>>>()?,
                _ => return Err(QueryError::grammar("ORDER 'keys' must be a non-empty array")),
            };
            Ok(Order::Directional { direction, keys })
        }
        _ => Err(QueryError::grammar("ORDER must be a key or a { dir, keys } object")),
    }
}

// ---------------------------------------------------------------------------
// TRANSFORMATIONS
// ---------------------------------------------------------------------------

fn check_transformations(value: &Json) -> QueryResult<Transformations> {
    let object = value
        .as_object()
        .ok_or_else(|| QueryError::grammar("TRANSFORMATIONS must be an object"))?;
    let (Some(group), Some(apply)) = (object.get(GROUP), object.get(APPLY)) else {
        return Err(QueryError::grammar("TRANSFORMATIONS must contain GROUP and APPLY"));
    };
    if object.len() != 2 {
        return Err(QueryError::grammar(
            "TRANSFORMATIONS may only contain GROUP and APPLY",
        ));
    }

    let group = match group.as_array() {
        Some(items) if !items.is_empty() => items
            .iter()
            .map(group_key)
            .collect::<QueryResult<Vec<_>>>()?,
        _ => return Err(QueryError::grammar("GROUP must be a non-empty array")),
    };
    let apply = match apply.as_array() {
        Some(items) if !items.is_empty() => items
            .iter()
            .map(check_apply_rule)
            .collect::<QueryResult<Vec<_>>>()?,
        _ => return Err(QueryError::grammar("APPLY must be a non-empty array")),
    };

    Ok(Transformations { group, apply })
}

fn group_key(value: &Json) -> QueryResult<FieldKey> {
    let key = value
        .as_str()
        .ok_or_else(|| QueryError::grammar("GROUP keys must be strings"))?;
    FieldKey::parse(key).map_err(|e| QueryError::grammar(format!("Invalid GROUP key: {}", e)))
}

fn check_apply_rule(value: &Json) -> QueryResult<ApplyRule> {
    let (apply_key, body) = single_entry(value, "APPLYRULE")?;
    if apply_key.is_empty() || apply_key.contains('_') {
        return Err(QueryError::grammar(format!(
            "applykey '{}' must be non-empty and cannot contain an underscore",
            apply_key
        )));
    }

    let (token, target) = single_entry(body, "APPLYTOKEN")?;
    let token = ApplyToken::from_keyword(token)
        .ok_or_else(|| QueryError::grammar(format!("Invalid APPLYTOKEN: {}", token)))?;
    let target = target
        .as_str()
        .ok_or_else(|| QueryError::grammar(format!("{} target must be a string", token.as_str())))?;
    let field = FieldKey::parse(target)
        .map_err(|e| QueryError::grammar(format!("Invalid {} key: {}", token.as_str(), e)))?;

    Ok(ApplyRule {
        key: apply_key.clone(),
        token,
        field,
    })
}
