//! Aggregate executor.
//!
//! Partitions the matching records by the tuple of their GROUP values and
//! computes every APPLY rule per partition. SUM and AVG accumulate in
//! decimal arithmetic and round half away from zero to two places, so that
//! e.g. `[1.1, 2.2, 3.3]` sums to `6.60` and averages to `2.20` exactly.

use alloc::format;
use alloc::vec;
use alloc::vec::Vec;
use core::str::FromStr;
use hashbrown::{HashMap, HashSet};
use insight_core::{Field, Record, Value};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::ast::{ApplyRule, ApplyToken, Transformations};
use crate::executor::relation::GroupRow;
use crate::executor::{ExecutionError, ExecutionResult};

/// Decimal places kept by SUM and AVG.
const SCALE: u32 = 2;

/// Aggregate executor - computes GROUP/APPLY output rows.
pub struct AggregateExecutor<'t> {
    transformations: &'t Transformations,
}

impl<'t> AggregateExecutor<'t> {
    /// Creates a new aggregate executor.
    pub fn new(transformations: &'t Transformations) -> Self {
        Self { transformations }
    }

    /// Groups the records at `positions` and computes one row per group.
    ///
    /// Groups are emitted in order of their first member.
    pub fn execute(&self, records: &[Record], positions: &[usize]) -> ExecutionResult<Vec<GroupRow>> {
        let mut slots: HashMap<Vec<&Value>, usize> = HashMap::new();
        let mut groups: Vec<(Vec<&Value>, Vec<&Record>)> = Vec::new();

        for record in positions.iter().filter_map(|&pos| records.get(pos)) {
            let key = self
                .transformations
                .group
                .iter()
                .map(|key| value_of(record, key.field))
                .collect::<ExecutionResult<Vec<_>>>()?;

            match slots.get(&key) {
                Some(&slot) => groups[slot].1.push(record),
                None => {
                    slots.insert(key.clone(), groups.len());
                    groups.push((key, vec![record]));
                }
            }
        }

        log::debug!("grouped {} records into {} groups", positions.len(), groups.len());

        groups
            .into_iter()
            .map(|(key, members)| self.build_row(key, &members))
            .collect()
    }

    fn build_row(&self, key: Vec<&Value>, members: &[&Record]) -> ExecutionResult<GroupRow> {
        let keys = self
            .transformations
            .group
            .iter()
            .zip(key)
            .map(|(group_key, value)| (group_key.field, value.clone()))
            .collect();
        let applied = self
            .transformations
            .apply
            .iter()
            .map(|rule| Ok((rule.key.clone(), apply(rule, members)?)))
            .collect::<ExecutionResult<Vec<_>>>()?;
        Ok(GroupRow { keys, applied })
    }
}

/// Computes one APPLY rule over a non-empty group.
fn apply(rule: &ApplyRule, members: &[&Record]) -> ExecutionResult<Value> {
    let field = rule.field.field;
    let result = match rule.token {
        ApplyToken::Count => {
            let distinct = members
                .iter()
                .map(|record| value_of(record, field))
                .collect::<ExecutionResult<HashSet<_>>>()?;
            distinct.len() as f64
        }
        ApplyToken::Max => numbers_of(members, field)?
            .into_iter()
            .fold(f64::NEG_INFINITY, f64::max),
        ApplyToken::Min => numbers_of(members, field)?
            .into_iter()
            .fold(f64::INFINITY, f64::min),
        ApplyToken::Sum => sum(&numbers_of(members, field)?),
        ApplyToken::Avg => average(&numbers_of(members, field)?),
    };
    Ok(Value::Number(result))
}

fn value_of(record: &Record, field: Field) -> ExecutionResult<&Value> {
    record
        .get(field)
        .ok_or(ExecutionError::MissingValue { field })
}

fn numbers_of(members: &[&Record], field: Field) -> ExecutionResult<Vec<f64>> {
    members
        .iter()
        .map(|record| {
            value_of(record, field)?.as_f64().ok_or_else(|| {
                ExecutionError::TypeMismatch(format!("{} holds a non-numeric value", field))
            })
        })
        .collect()
}

/// Sum rounded to two decimal places.
fn sum(values: &[f64]) -> f64 {
    decimal_sum(values)
        .and_then(round_decimal)
        .unwrap_or_else(|| round_f64(values.iter().sum()))
}

/// Mean rounded to two decimal places.
fn average(values: &[f64]) -> f64 {
    let count = values.len() as u64;
    decimal_sum(values)
        .and_then(|total| total.checked_div(Decimal::from(count)))
        .and_then(round_decimal)
        .unwrap_or_else(|| round_f64(values.iter().sum::<f64>() / count as f64))
}

/// Exact decimal sum, or `None` if a value has no decimal form (NaN,
/// infinities, magnitudes beyond 96 bits) or the sum overflows.
fn decimal_sum(values: &[f64]) -> Option<Decimal> {
    values
        .iter()
        .try_fold(Decimal::ZERO, |acc, &value| acc.checked_add(to_decimal(value)?))
}

/// Converts through the shortest round-trip representation, so `1.1`
/// becomes exactly `1.1` rather than its binary expansion.
fn to_decimal(value: f64) -> Option<Decimal> {
    Decimal::from_str(&format!("{}", value))
        .ok()
        .or_else(|| Decimal::from_f64_retain(value))
}

fn round_decimal(value: Decimal) -> Option<f64> {
    value
        .round_dp_with_strategy(SCALE, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
}

fn round_f64(value: f64) -> f64 {
    libm::round(value * 100.0) / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use insight_core::FieldKey;

    fn rule(key: &str, token: ApplyToken, field: Field) -> ApplyRule {
        ApplyRule {
            key: key.into(),
            token,
            field: FieldKey::new("courses", field),
        }
    }

    fn transformations(group: &[Field], apply: Vec<ApplyRule>) -> Transformations {
        Transformations {
            group: group.iter().map(|&f| FieldKey::new("courses", f)).collect(),
            apply,
        }
    }

    fn all(records: &[Record]) -> Vec<usize> {
        (0..records.len()).collect()
    }

    #[test]
    fn test_group_by_single_key() {
        let records = vec![
            Record::new().with(Field::Dept, "cpsc").with(Field::Avg, 95),
            Record::new().with(Field::Dept, "math").with(Field::Avg, 80),
            Record::new().with(Field::Dept, "cpsc").with(Field::Avg, 85),
        ];
        let t = transformations(&[Field::Dept], vec![rule("overallAvg", ApplyToken::Avg, Field::Avg)]);
        let rows = AggregateExecutor::new(&t).execute(&records, &all(&records)).unwrap();

        assert_eq!(
            rows,
            vec![
                GroupRow {
                    keys: vec![(Field::Dept, Value::from("cpsc"))],
                    applied: vec![("overallAvg".into(), Value::from(90))],
                },
                GroupRow {
                    keys: vec![(Field::Dept, Value::from("math"))],
                    applied: vec![("overallAvg".into(), Value::from(80))],
                },
            ]
        );
    }

    #[test]
    fn test_only_matching_positions_are_grouped() {
        let records = vec![
            Record::new().with(Field::Dept, "cpsc").with(Field::Avg, 95),
            Record::new().with(Field::Dept, "math").with(Field::Avg, 80),
        ];
        let t = transformations(&[Field::Dept], vec![rule("n", ApplyToken::Count, Field::Avg)]);
        let rows = AggregateExecutor::new(&t).execute(&records, &[1]).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].key(Field::Dept), Some(&Value::from("math")));
    }

    #[test]
    fn test_composite_keys_do_not_collide() {
        let records = vec![
            Record::new().with(Field::Dept, "ab").with(Field::Id, "c"),
            Record::new().with(Field::Dept, "a").with(Field::Id, "bc"),
        ];
        let t = transformations(
            &[Field::Dept, Field::Id],
            vec![rule("n", ApplyToken::Count, Field::Dept)],
        );
        let rows = AggregateExecutor::new(&t).execute(&records, &all(&records)).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_decimal_precision() {
        let records: Vec<Record> = [1.1, 2.2, 3.3]
            .iter()
            .map(|&avg| Record::new().with(Field::Dept, "x").with(Field::Avg, avg))
            .collect();
        let t = transformations(
            &[Field::Dept],
            vec![
                rule("avg", ApplyToken::Avg, Field::Avg),
                rule("sum", ApplyToken::Sum, Field::Avg),
            ],
        );
        let rows = AggregateExecutor::new(&t).execute(&records, &all(&records)).unwrap();

        assert_eq!(rows[0].applied("avg"), Some(&Value::Number(2.2)));
        assert_eq!(rows[0].applied("sum"), Some(&Value::Number(6.6)));
    }

    #[test]
    fn test_rounding_half_away_from_zero() {
        assert_eq!(average(&[1.0, 2.0, 2.0]), 1.67);
        assert_eq!(sum(&[0.125]), 0.13);
        assert_eq!(sum(&[-0.125]), -0.13);
        assert_eq!(average(&[97.995]), 98.0);
    }

    #[test]
    fn test_min_max() {
        let records: Vec<Record> = [70.5, 99.25, 12.0]
            .iter()
            .map(|&avg| Record::new().with(Field::Dept, "x").with(Field::Avg, avg))
            .collect();
        let t = transformations(
            &[Field::Dept],
            vec![
                rule("hi", ApplyToken::Max, Field::Avg),
                rule("lo", ApplyToken::Min, Field::Avg),
            ],
        );
        let rows = AggregateExecutor::new(&t).execute(&records, &all(&records)).unwrap();

        assert_eq!(rows[0].applied("hi"), Some(&Value::Number(99.25)));
        assert_eq!(rows[0].applied("lo"), Some(&Value::Number(12.0)));
    }

    #[test]
    fn test_count_is_distinct() {
        let records: Vec<Record> = ["a", "a", "a", "b", "b"]
            .iter()
            .map(|&instructor| {
                Record::new()
                    .with(Field::Dept, "x")
                    .with(Field::Instructor, instructor)
            })
            .collect();
        let t = transformations(&[Field::Dept], vec![rule("n", ApplyToken::Count, Field::Instructor)]);
        let rows = AggregateExecutor::new(&t).execute(&records, &all(&records)).unwrap();

        assert_eq!(rows[0].applied("n"), Some(&Value::from(2)));
    }

    #[test]
    fn test_missing_group_value() {
        let records = vec![Record::new().with(Field::Avg, 1)];
        let t = transformations(&[Field::Dept], vec![rule("n", ApplyToken::Count, Field::Avg)]);
        let result = AggregateExecutor::new(&t).execute(&records, &[0]);
        assert_eq!(result, Err(ExecutionError::MissingValue { field: Field::Dept }));
    }

    #[test]
    fn test_non_finite_values_fall_back() {
        assert!(sum(&[f64::INFINITY, 1.0]).is_infinite());
        assert!(average(&[f64::NAN, 1.0]).is_nan());
    }
}
