//! Property-based tests for filter evaluation.
//!
//! The flag-threading evaluator must agree with plain boolean evaluation,
//! and negation must distribute over AND/OR (De Morgan).

use insight_core::{Field, FieldKey, Record, WildcardPattern};
use insight_query::ast::{Filter, NumericOp};
use insight_query::executor::{matches_record, FilterExecutor};
use proptest::prelude::*;

const DEPTS: [&str; 4] = ["adhe", "cpsc", "math", "apsc"];

/// Strategy for a course record with a department and an average.
fn record_strategy() -> impl Strategy<Value = Record> {
    (0..DEPTS.len(), 0u32..=100).prop_map(|(dept, avg)| {
        Record::new()
            .with(Field::Dept, DEPTS[dept])
            .with(Field::Avg, avg as f64)
    })
}

fn records_strategy(max_rows: usize) -> impl Strategy<Value = Vec<Record>> {
    prop::collection::vec(record_strategy(), 0..max_rows)
}

/// Strategy for a comparison leaf.
fn leaf_strategy() -> impl Strategy<Value = Filter> {
    let numeric = (
        prop_oneof![Just(NumericOp::Lt), Just(NumericOp::Gt), Just(NumericOp::Eq)],
        0u32..=100,
    )
        .prop_map(|(op, value)| Filter::Numeric {
            op,
            key: FieldKey::new("courses", Field::Avg),
            value: value as f64,
        });
    let string = prop_oneof![
        Just("adhe"),
        Just("*sc"),
        Just("a*"),
        Just("*p*"),
        Just("math"),
        Just("*"),
    ]
    .prop_map(|pattern| Filter::String {
        key: FieldKey::new("courses", Field::Dept),
        pattern: WildcardPattern::compile(pattern).unwrap(),
    });
    prop_oneof![numeric, string]
}

/// Strategy for an arbitrary filter tree.
fn filter_strategy() -> impl Strategy<Value = Filter> {
    leaf_strategy().prop_recursive(4, 24, 3, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 1..4).prop_map(Filter::and),
            prop::collection::vec(inner.clone(), 1..4).prop_map(Filter::or),
            inner.prop_map(Filter::negate),
        ]
    })
}

fn run(filter: &Filter, records: &[Record]) -> Vec<usize> {
    FilterExecutor::new(filter).execute(records)
}

proptest! {
    /// Property: NOT(AND(a, b)) selects the same records as OR(NOT(a), NOT(b)).
    #[test]
    fn not_and_equals_or_of_nots(
        records in records_strategy(40),
        avg in 0u32..=100,
        dept in 0..DEPTS.len(),
    ) {
        let gt = Filter::Numeric {
            op: NumericOp::Gt,
            key: FieldKey::new("courses", Field::Avg),
            value: avg as f64,
        };
        let is = Filter::String {
            key: FieldKey::new("courses", Field::Dept),
            pattern: WildcardPattern::compile(DEPTS[dept]).unwrap(),
        };

        let negated = Filter::negate(Filter::and(vec![gt.clone(), is.clone()]));
        let distributed = Filter::or(vec![Filter::negate(gt), Filter::negate(is)]);

        prop_assert_eq!(run(&negated, &records), run(&distributed, &records));
    }

    /// Property: NOT(OR(a, b)) selects the same records as AND(NOT(a), NOT(b)).
    #[test]
    fn not_or_equals_and_of_nots(
        records in records_strategy(40),
        a in leaf_strategy(),
        b in leaf_strategy(),
    ) {
        let negated = Filter::negate(Filter::or(vec![a.clone(), b.clone()]));
        let distributed = Filter::and(vec![Filter::negate(a), Filter::negate(b)]);

        prop_assert_eq!(run(&negated, &records), run(&distributed, &records));
    }

    /// Property: the evaluator agrees with per-record boolean evaluation and
    /// returns positions in dataset order.
    #[test]
    fn evaluator_matches_boolean_semantics(
        records in records_strategy(40),
        filter in filter_strategy(),
    ) {
        let expected: Vec<usize> = (0..records.len())
            .filter(|&i| matches_record(&filter, &records[i]))
            .collect();
        prop_assert_eq!(run(&filter, &records), expected);
    }

    /// Property: a filter and its negation partition the records.
    #[test]
    fn negation_is_complement(
        records in records_strategy(40),
        filter in filter_strategy(),
    ) {
        let matched = run(&filter, &records);
        let rejected = run(&Filter::negate(filter), &records);

        prop_assert_eq!(matched.len() + rejected.len(), records.len());
        prop_assert!(matched.iter().all(|pos| !rejected.contains(pos)));
    }
}
