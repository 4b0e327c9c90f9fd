//! Statistics aggregation over the two reconciliation passes.

use crate::model::{
    ColumnFlags, MatchRecord, SetLabel, Statistics, UniqueRecord, WalletFlags,
};
use crate::rules::MatchKind;

/// How one wallet sheet entered the run. `Default` is "not supplied".
#[derive(Debug, Clone, Copy, Default)]
pub struct WalletStatus {
    pub supplied: bool,
    pub column_found: bool,
    pub data_rows: usize,
}

/// Fold both passes into the aggregate counters.
///
/// Match-by-type counts classify each bank row once via
/// [`MatchRecord::kind`]; the match rate is the share of bank rows with at
/// least one match, rounded to a whole percentage.
pub fn compute_statistics(
    bank_rows: usize,
    wallet1: WalletStatus,
    wallet2: WalletStatus,
    matches: &[MatchRecord],
    unique: &[UniqueRecord],
    unique_in_wallets: &[UniqueRecord],
) -> Statistics {
    let mut exact_matches = 0;
    let mut tp2p_matches = 0;
    let mut sell_rate_matches = 0;
    for record in matches {
        match record.kind() {
            MatchKind::Exact => exact_matches += 1,
            MatchKind::Tp2p => tp2p_matches += 1,
            MatchKind::SellRate => sell_rate_matches += 1,
        }
    }

    let count_set = |set: SetLabel| {
        unique_in_wallets
            .iter()
            .filter(|record| record.set == set)
            .count()
    };

    let match_rate = if bank_rows > 0 {
        ((matches.len() as f64 / bank_rows as f64) * 100.0).round() as u32
    } else {
        0
    };

    Statistics {
        bank_rows,
        wallet1_rows: wallet1.data_rows,
        wallet2_rows: wallet2.data_rows,
        matching_rows: matches.len(),
        unique_rows: unique.len(),
        exact_matches,
        tp2p_matches,
        sell_rate_matches,
        wallet1_unique_rows: count_set(SetLabel::Wallet1),
        wallet2_unique_rows: count_set(SetLabel::Wallet2),
        match_rate,
        description_column_found: ColumnFlags {
            bank: true,
            wallet1: wallet1.column_found,
            wallet2: wallet2.column_found,
        },
        wallets_compared: WalletFlags {
            wallet1: wallet1.supplied,
            wallet2: wallet2.supplied,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MatchedCandidate, WalletMatch};

    fn record(kind: MatchKind) -> MatchRecord {
        MatchRecord {
            row_number: 2,
            description: "d".into(),
            debit: String::new(),
            credit: String::new(),
            cells: vec![],
            wallet1: Some(WalletMatch {
                kind,
                rows: vec![MatchedCandidate {
                    row_number: 2,
                    description: "d".into(),
                    debit: String::new(),
                    credit: String::new(),
                    cells: vec![],
                }],
            }),
            wallet2: None,
        }
    }

    fn unique(set: SetLabel) -> UniqueRecord {
        UniqueRecord {
            set,
            row_number: 3,
            description: "u".into(),
            debit: String::new(),
            credit: String::new(),
            cells: vec![],
        }
    }

    #[test]
    fn counts_by_kind_and_rate() {
        let matches = vec![
            record(MatchKind::Exact),
            record(MatchKind::Exact),
            record(MatchKind::Tp2p),
        ];
        let unique_rows = vec![unique(SetLabel::Bank)];
        let wallet_uniques = vec![unique(SetLabel::Wallet1), unique(SetLabel::Wallet2)];
        let wallet1 = WalletStatus {
            supplied: true,
            column_found: true,
            data_rows: 5,
        };
        let stats = compute_statistics(
            7,
            wallet1,
            WalletStatus::default(),
            &matches,
            &unique_rows,
            &wallet_uniques,
        );

        assert_eq!(stats.bank_rows, 7);
        assert_eq!(stats.wallet1_rows, 5);
        assert_eq!(stats.wallet2_rows, 0);
        assert_eq!(stats.matching_rows, 3);
        assert_eq!(stats.unique_rows, 1);
        assert_eq!(stats.exact_matches, 2);
        assert_eq!(stats.tp2p_matches, 1);
        assert_eq!(stats.sell_rate_matches, 0);
        assert_eq!(stats.wallet1_unique_rows, 1);
        assert_eq!(stats.wallet2_unique_rows, 1);
        // 3 of 7 = 42.857..., rounds to 43.
        assert_eq!(stats.match_rate, 43);
        assert!(stats.description_column_found.bank);
        assert!(stats.wallets_compared.wallet1);
        assert!(!stats.wallets_compared.wallet2);
    }

    #[test]
    fn empty_bank_slice_has_zero_rate() {
        let stats = compute_statistics(
            0,
            WalletStatus::default(),
            WalletStatus::default(),
            &[],
            &[],
            &[],
        );
        assert_eq!(stats.match_rate, 0);
        assert_eq!(stats.matching_rows, 0);
    }
}
