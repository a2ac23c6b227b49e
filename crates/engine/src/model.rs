use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Pre-loaded raw rows for one run. Keys are the original CSV headers;
/// the synonym tables in `normalize` map them onto canonical fields.
/// Rows are ordered maps so header collisions resolve the same way on
/// every run.
pub struct RunInput {
    pub clients: Vec<BTreeMap<String, String>>,
    pub transactions: Vec<BTreeMap<String, String>>,
}

/// A canonical client profile row after header normalization.
///
/// `client_id` is unique within a batch and is the join key to transactions;
/// when absent from input it is synthesized from row position.
#[derive(Debug, Clone, Default)]
pub struct ClientRecord {
    pub client_id: String,
    pub name: String,
    pub country: String,
    pub pep: Option<String>,
    pub sanctions_match: Option<String>,
    pub residency_status: Option<String>,
    pub kyc_status: Option<String>,
    pub last_kyc_review: Option<String>,
    pub onboard_date: Option<String>,
    pub delivery_channel: Option<String>,
    pub services_used: Option<String>,
    pub risk_country_exposure: Option<String>,
    /// Original header → value pairs, passed through to reporting untouched.
    /// Ordered so serialized output is reproducible.
    pub raw_fields: BTreeMap<String, String>,
}

/// A canonical transaction row. Unparseable dates and amounts stay `None`
/// and simply fail every window/threshold comparison downstream.
#[derive(Debug, Clone, Default)]
pub struct TransactionRecord {
    pub client_id: Option<String>,
    pub date: Option<NaiveDate>,
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub kind: Option<String>,
    pub channel: Option<String>,
    pub counterparty_country: Option<String>,
    pub notes: Option<String>,
}

// ---------------------------------------------------------------------------
// Scoring output
// ---------------------------------------------------------------------------

/// Discrete risk tier derived from a score via fixed cutoffs.
/// Ordering is Low < Medium < High.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskBand {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for RiskBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// One client's scoring result, ready for the reporting collaborator.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredClient {
    pub client_id: String,
    pub name: String,
    pub country: String,
    pub score: u32,
    pub band: RiskBand,
    /// One entry per triggered rule, in fixed evaluation order.
    pub reasons: Vec<String>,
    /// Raw profile fields for display columns the engine does not interpret.
    pub profile: BTreeMap<String, String>,
}

// ---------------------------------------------------------------------------
// Monitoring cases
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseRule {
    Structuring,
    HighRiskCorridor,
    LargeDomestic,
}

impl std::fmt::Display for CaseRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Structuring => write!(f, "structuring"),
            Self::HighRiskCorridor => write!(f, "high_risk_corridor"),
            Self::LargeDomestic => write!(f, "large_domestic"),
        }
    }
}

/// One triggered detection, at most one per rule per client.
#[derive(Debug, Clone, Serialize)]
pub struct MonitoringCase {
    pub rule: CaseRule,
    /// Display name of the owning client.
    pub client: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    pub detail: String,
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub total_clients: usize,
    pub total_transactions: usize,
    /// Transactions dropped for lack of a resolvable client id.
    pub orphaned_transactions: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub total_cases: usize,
    pub case_counts: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunMeta {
    pub config_name: String,
    pub engine_version: String,
    /// Reference date all lookback windows were measured against.
    pub as_of: NaiveDate,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub meta: RunMeta,
    pub summary: RunSummary,
    /// Score-descending; ties broken by client id for reproducible output.
    pub clients: Vec<ScoredClient>,
    pub cases: Vec<MonitoringCase>,
}
