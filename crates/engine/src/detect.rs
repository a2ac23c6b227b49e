//! The three pattern detectors. Each is a stateless function over one
//! client's transactions plus the injected reference date, filtering
//! first to the trailing lookback window.
//!
//! `Type` matching is deliberately substring-based and case-insensitive:
//! upstream category labels vary ("Cash Deposit - branch", "intl cash
//! deposit") and there is no controlled vocabulary.

use chrono::NaiveDate;
use serde::Serialize;

use crate::config::{CountryTiers, Thresholds};
use crate::dates::within_months;
use crate::model::TransactionRecord;

/// Evidence from the structuring (near-threshold cash deposit) detector.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StructuringFinding {
    pub hit: bool,
    /// Longest run of qualifying deposits with consecutive gaps within
    /// the configured day limit.
    pub max_run: usize,
    /// Total qualifying deposits in window, contiguous or not.
    pub count: usize,
    pub total_amount: f64,
}

/// Evidence from the high-risk corridor detector.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CorridorFinding {
    pub hit: bool,
    pub count: usize,
    /// Matches at or above the big-amount floor.
    pub big_count: usize,
    pub max_amount: Option<f64>,
}

/// Evidence from the large domestic transfer detector.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LargeDomesticFinding {
    pub hit: bool,
    pub count: usize,
    pub max_amount: Option<f64>,
}

/// All three detector results for one client, memoized so the scorer and
/// the case builder report identical evidence numbers.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ClientFindings {
    pub structuring: StructuringFinding,
    pub corridor: CorridorFinding,
    pub large_domestic: LargeDomesticFinding,
}

pub fn detect_all(
    txns: &[TransactionRecord],
    as_of: NaiveDate,
    thresholds: &Thresholds,
    countries: &CountryTiers,
) -> ClientFindings {
    ClientFindings {
        structuring: detect_structuring(txns, as_of, thresholds),
        corridor: detect_corridor(txns, as_of, thresholds, countries),
        large_domestic: detect_large_domestic(txns, as_of, thresholds),
    }
}

fn kind_contains(txn: &TransactionRecord, needle: &str) -> bool {
    txn.kind
        .as_deref()
        .map_or(false, |k| k.to_lowercase().contains(needle))
}

/// Near-threshold cash deposits in runs. A run extends while each deposit
/// follows its immediate predecessor within the gap limit; the gap is
/// never measured from the run's start. Hit requires both the longest run
/// and the total count to reach the same floor.
pub fn detect_structuring(
    txns: &[TransactionRecord],
    as_of: NaiveDate,
    t: &Thresholds,
) -> StructuringFinding {
    let mut qualifying: Vec<(NaiveDate, f64)> = txns
        .iter()
        .filter(|x| kind_contains(x, "cash deposit"))
        .filter(|x| within_months(x.date, as_of, t.lookback_months))
        .filter_map(|x| {
            let amount = x.amount?;
            // Half-open band: the reporting threshold itself is excluded.
            if amount >= t.structuring_low && amount < t.structuring_high {
                Some((x.date?, amount))
            } else {
                None
            }
        })
        .collect();
    qualifying.sort_by_key(|(date, _)| *date);

    let mut max_run = 0usize;
    let mut run = 0usize;
    let mut prev: Option<NaiveDate> = None;
    for (date, _) in &qualifying {
        run = match prev {
            Some(p) if (*date - p).num_days() <= t.structuring_gap_days => run + 1,
            _ => 1,
        };
        max_run = max_run.max(run);
        prev = Some(*date);
    }

    let count = qualifying.len();
    StructuringFinding {
        hit: max_run >= t.structuring_min_run && count >= t.structuring_min_run,
        max_run,
        count,
        total_amount: qualifying.iter().map(|(_, amount)| amount).sum(),
    }
}

/// International transfers into a configured corridor country. Hit needs
/// the count floor plus at least one transfer at the big-amount floor.
pub fn detect_corridor(
    txns: &[TransactionRecord],
    as_of: NaiveDate,
    t: &Thresholds,
    countries: &CountryTiers,
) -> CorridorFinding {
    let mut count = 0usize;
    let mut big_count = 0usize;
    let mut max_amount: Option<f64> = None;

    for txn in txns {
        if !kind_contains(txn, "international") {
            continue;
        }
        if !within_months(txn.date, as_of, t.lookback_months) {
            continue;
        }
        let Some(country) = txn.counterparty_country.as_deref() else {
            continue;
        };
        if !countries.is_corridor(country) {
            continue;
        }
        count += 1;
        if let Some(amount) = txn.amount {
            if max_amount.map_or(true, |m| amount > m) {
                max_amount = Some(amount);
            }
            if amount >= t.corridor_big_amount {
                big_count += 1;
            }
        }
    }

    CorridorFinding {
        hit: count >= t.corridor_min_count && big_count >= 1,
        count,
        big_count,
        max_amount,
    }
}

/// Domestic transfers at or above the large-amount floor. One is enough.
pub fn detect_large_domestic(
    txns: &[TransactionRecord],
    as_of: NaiveDate,
    t: &Thresholds,
) -> LargeDomesticFinding {
    let mut count = 0usize;
    let mut max_amount: Option<f64> = None;

    for txn in txns {
        if !kind_contains(txn, "domestic") {
            continue;
        }
        if !within_months(txn.date, as_of, t.lookback_months) {
            continue;
        }
        let Some(amount) = txn.amount else { continue };
        if amount < t.large_domestic_amount {
            continue;
        }
        count += 1;
        if max_amount.map_or(true, |m| amount > m) {
            max_amount = Some(amount);
        }
    }

    LargeDomesticFinding {
        hit: count >= 1,
        count,
        max_amount,
    }
}
