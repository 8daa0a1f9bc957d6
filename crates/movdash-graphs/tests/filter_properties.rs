//! Property tests for the filter engine and aggregators.

use chrono::{NaiveDate, TimeDelta};
use movdash_common::test_utils::mock_timestamp;
use movdash_common::{MovementRecord, RecordSet};
use movdash_graphs::filter::{apply_predicates, at_midnight};
use movdash_graphs::{
    filter, run, ActionCountAggregator, Aggregator, DailyVolumeAggregator, FilterOptions,
    FilterSelection, HourlyVolumeAggregator,
};
use proptest::prelude::*;
use std::collections::BTreeSet;

const ACTIONS: &[&str] = &["RECEBIMENTO", "EXPEDICAO", "ARMAZENAGEM", "INVENTARIO", ""];

/// Records spread over Feb to Apr 2024
fn arb_records() -> impl Strategy<Value = RecordSet> {
    prop::collection::vec((0i64..(90 * 24 * 60), 0usize..ACTIONS.len()), 0..60).prop_map(
        |rows| {
            let origin = mock_timestamp(2024, 2, 1, 0, 0, 0);
            let records = rows
                .into_iter()
                .map(|(minutes, action)| {
                    let timestamp = origin + TimeDelta::try_minutes(minutes).unwrap();
                    MovementRecord::new(timestamp, ACTIONS[action])
                })
                .collect();
            RecordSet::from_records(records)
        },
    )
}

fn arb_selection() -> impl Strategy<Value = FilterSelection> {
    (
        prop::sample::select(vec!["2024-01", "2024-02", "2024-03", "2024-04"]),
        prop::sample::subsequence(ACTIONS.to_vec(), 0..=ACTIONS.len()),
        0u64..100,
        0u64..100,
    )
        .prop_map(|(month, actions, a, b)| {
            let origin = NaiveDate::from_ymd_opt(2024, 1, 25).unwrap();
            let start = origin + chrono::Days::new(a.min(b));
            let end = origin + chrono::Days::new(a.max(b));
            FilterSelection::new(month, actions, start, end)
        })
}

proptest! {
    #[test]
    fn filtered_records_satisfy_every_predicate(
        records in arb_records(),
        selection in arb_selection(),
    ) {
        let filtered = filter(&records, &selection);
        for record in &filtered {
            prop_assert_eq!(&record.month_bucket, &selection.month);
            prop_assert!(selection.actions.contains(&record.action));
            prop_assert!(record.timestamp >= at_midnight(selection.start));
            prop_assert!(record.timestamp <= at_midnight(selection.end));
        }
        // Nothing matching is dropped
        let expected = records.iter().filter(|r| {
            selection.predicates().iter().all(|p| p.matches(r))
        }).count();
        prop_assert_eq!(filtered.len(), expected);
    }

    #[test]
    fn predicate_order_does_not_matter(
        records in arb_records(),
        selection in arb_selection(),
        order in Just(vec![0usize, 1, 2, 3]).prop_shuffle(),
    ) {
        let predicates = selection.predicates();
        let reordered: Vec<_> = order.iter().map(|&i| predicates[i]).collect();

        // Applying predicates one at a time in any order matches the combined filter
        let mut stepwise = records.clone();
        for predicate in &reordered {
            stepwise = apply_predicates(&stepwise, std::slice::from_ref(predicate));
        }

        prop_assert_eq!(stepwise, filter(&records, &selection));
    }

    #[test]
    fn empty_action_set_selects_nothing(
        records in arb_records(),
        selection in arb_selection(),
    ) {
        let selection = FilterSelection { actions: BTreeSet::new(), ..selection };
        prop_assert!(filter(&records, &selection).is_empty());
    }

    #[test]
    fn aggregate_totals_match_filtered_count(
        records in arb_records(),
        selection in arb_selection(),
    ) {
        let tables = run(&records, &selection);

        prop_assert_eq!(tables.by_action.total(), tables.filtered_count);
        prop_assert_eq!(tables.by_day.total(), tables.filtered_count);
        prop_assert_eq!(tables.by_hour.total(), tables.filtered_count);
        prop_assert!(tables.by_day.iter().all(|row| (1..=31).contains(&row.category)));
        prop_assert!(tables.by_hour.iter().all(|row| row.category < 24));
        prop_assert!(tables.by_action.iter().all(|row| row.count > 0));
    }

    #[test]
    fn aggregation_is_idempotent(records in arb_records(), selection in arb_selection()) {
        prop_assert_eq!(run(&records, &selection), run(&records, &selection));
    }

    #[test]
    fn action_counts_are_non_increasing(records in arb_records()) {
        let table = ActionCountAggregator.aggregate(&records);
        prop_assert!(table.rows().windows(2).all(|w| w[0].count >= w[1].count));
    }

    #[test]
    fn numeric_tables_are_strictly_ascending(records in arb_records()) {
        let by_day = DailyVolumeAggregator.aggregate(&records);
        let by_hour = HourlyVolumeAggregator.aggregate(&records);
        prop_assert!(by_day.rows().windows(2).all(|w| w[0].category < w[1].category));
        prop_assert!(by_hour.rows().windows(2).all(|w| w[0].category < w[1].category));
    }

    #[test]
    fn default_selection_over_single_month_keeps_bounded_records(records in arb_records()) {
        let options = FilterOptions::from_records(&records);
        let selection = options.default_selection();
        let filtered = filter(&records, &selection);

        let expected = records.iter().filter(|r| {
            r.month_bucket == selection.month
                && r.timestamp <= at_midnight(selection.end)
        }).count();
        prop_assert_eq!(filtered.len(), expected);
    }
}
