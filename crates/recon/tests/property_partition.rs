// Property-based tests for the reconciliation engine.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use std::collections::HashSet;

use proptest::prelude::*;

use ledgerlens_recon::columns;
use ledgerlens_recon::reconcile;
use ledgerlens_recon::table::{Cell, Table};

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

fn config_128() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(128),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// Arbitrary description: plain words, TP2P-suffixed codes, sell-rate
/// quotes, or blank.
fn arb_description() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => r"[a-z]{3,8}( [a-z]{3,8})?",
        2 => r"[A-Z]{2,5}[0-9]{1,4}TP2P",
        1 => r"SELL RATE [0-9]{1,2}\.[0-9]{1,3}",
        1 => Just(String::new()),
    ]
}

/// Credit cell text: a plain amount or empty.
fn arb_credit() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => r"[0-9]{1,4}(\.[0-9]{2})?",
        1 => Just(String::new()),
    ]
}

fn cell(text: String) -> Cell {
    if text.is_empty() {
        Cell::Empty
    } else {
        Cell::Text(text)
    }
}

fn build_sheet(preamble: usize, rows: &[(String, String)]) -> Table {
    let mut all: Vec<Vec<Cell>> = Vec::new();
    for _ in 0..preamble {
        all.push(vec![Cell::Text("statement preamble".into())]);
    }
    all.push(vec![
        Cell::Text("Description".into()),
        Cell::Text("Debit".into()),
        Cell::Text("Credit".into()),
    ]);
    for (description, credit) in rows {
        all.push(vec![cell(description.clone()), Cell::Empty, cell(credit.clone())]);
    }
    Table::new(all)
}

/// A bank sheet plus a wallet sheet that echoes some bank rows back, with
/// TP2P suffixes stripped so both text rules get exercised.
fn arb_pair() -> impl Strategy<Value = (Table, Table)> {
    (
        0usize..3,
        0usize..3,
        proptest::collection::vec((arb_description(), arb_credit()), 1..10),
        proptest::collection::vec((arb_description(), arb_credit()), 0..6),
        proptest::collection::vec(any::<prop::sample::Index>(), 0..6),
    )
        .prop_map(
            |(bank_preamble, wallet_preamble, bank_rows, wallet_fresh, echoes)| {
                let mut wallet_rows = wallet_fresh;
                for index in echoes {
                    let description = index.get(&bank_rows).0.trim();
                    let echoed = match description.strip_suffix("TP2P") {
                        Some(base) => base.trim().to_string(),
                        None => description.to_string(),
                    };
                    wallet_rows.push((echoed, "25.00".to_string()));
                }
                (
                    build_sheet(bank_preamble, &bank_rows),
                    build_sheet(wallet_preamble, &wallet_rows),
                )
            },
        )
}

fn described_count(table: &Table) -> usize {
    let map = columns::locate(table).unwrap();
    table.rows[map.header_row + 1..]
        .iter()
        .filter(|row| {
            row.get(map.description)
                .map_or(false, |cell| !cell.is_blank())
        })
        .count()
}

// ===========================================================================
// Phase 1: Partition — both directions
// ===========================================================================

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn described_bank_rows_partition((bank, wallet) in arb_pair()) {
        let result = reconcile(&bank, Some(&wallet), None).unwrap();
        prop_assert_eq!(
            result.matches.len() + result.unique.len(),
            described_count(&bank),
            "matches + uniques must cover every described bank row exactly once"
        );
        for record in &result.matches {
            let has_candidates = record
                .wallet1
                .as_ref()
                .map_or(false, |m| !m.rows.is_empty());
            prop_assert!(has_candidates, "a match record must carry candidate rows");
        }
    }

    #[test]
    fn described_wallet_rows_partition((bank, wallet) in arb_pair()) {
        let result = reconcile(&bank, Some(&wallet), None).unwrap();

        let matched: HashSet<usize> = result
            .matches
            .iter()
            .filter_map(|record| record.wallet1.as_ref())
            .flat_map(|wallet_match| wallet_match.rows.iter().map(|row| row.row_number))
            .collect();
        let unique: HashSet<usize> = result
            .unique_in_wallets
            .iter()
            .map(|record| record.row_number)
            .collect();

        prop_assert_eq!(
            matched.intersection(&unique).count(),
            0,
            "a wallet row cannot be both matched and unique"
        );
        prop_assert_eq!(
            matched.len() + unique.len(),
            described_count(&wallet),
            "forward hits + reverse uniques must cover every described wallet row"
        );
    }

    #[test]
    fn row_numbers_are_distinct_and_in_range((bank, wallet) in arb_pair()) {
        let result = reconcile(&bank, Some(&wallet), None).unwrap();
        let map = columns::locate(&bank).unwrap();
        let first = map.header_row + 2;
        let last = map.header_row + 1 + result.statistics.bank_rows;

        let mut seen = HashSet::new();
        for row_number in result
            .matches
            .iter()
            .map(|record| record.row_number)
            .chain(result.unique.iter().map(|record| record.row_number))
        {
            prop_assert!(
                (first..=last).contains(&row_number),
                "row number {} outside {}..={}",
                row_number,
                first,
                last
            );
            prop_assert!(seen.insert(row_number), "duplicate row number {}", row_number);
        }
    }
}

// ===========================================================================
// Phase 2: Statistics consistency
// ===========================================================================

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn statistics_agree_with_lists((bank, wallet) in arb_pair()) {
        let result = reconcile(&bank, Some(&wallet), None).unwrap();
        let stats = &result.statistics;

        prop_assert_eq!(stats.matching_rows, result.matches.len());
        prop_assert_eq!(stats.unique_rows, result.unique.len());
        prop_assert_eq!(
            stats.exact_matches + stats.tp2p_matches + stats.sell_rate_matches,
            stats.matching_rows,
            "every match record is classified under exactly one kind"
        );
        prop_assert_eq!(
            stats.wallet1_unique_rows + stats.wallet2_unique_rows,
            result.unique_in_wallets.len()
        );

        let expected_rate = if stats.bank_rows > 0 {
            ((stats.matching_rows as f64 / stats.bank_rows as f64) * 100.0).round() as u32
        } else {
            0
        };
        prop_assert_eq!(stats.match_rate, expected_rate);
    }
}

// ===========================================================================
// Phase 3: Determinism
// ===========================================================================

proptest! {
    #![proptest_config(config_128())]

    #[test]
    fn reconcile_is_deterministic((bank, wallet) in arb_pair()) {
        let first = reconcile(&bank, Some(&wallet), None).unwrap();
        let second = reconcile(&bank, Some(&wallet), None).unwrap();
        prop_assert_eq!(first, second);
    }
}

// ===========================================================================
// Phase 4: Header scan bound
// ===========================================================================

proptest! {
    #![proptest_config(config_128())]

    #[test]
    fn header_found_only_within_scan_window(offset in 0usize..15) {
        let mut rows: Vec<Vec<Cell>> = (0..offset)
            .map(|_| vec![Cell::Text("x".into())])
            .collect();
        rows.push(vec![Cell::Text("Description".into())]);
        let table = Table::new(rows);
        prop_assert_eq!(
            columns::locate(&table).is_some(),
            offset < columns::HEADER_SCAN_ROWS
        );
    }
}
