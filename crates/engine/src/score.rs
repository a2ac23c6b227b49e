//! The additive risk scorer. Rules are evaluated in a fixed order; each
//! appends one reason when it fires. The band is derived exactly once,
//! after the full pass.

use chrono::NaiveDate;

use crate::config::{CountryTiers, Thresholds};
use crate::dates::{months_ago, parse_date};
use crate::detect::ClientFindings;
use crate::model::{ClientRecord, RiskBand};
use crate::normalize::is_yes;

/// Outcome of one client's scoring pass. Never mutated after construction.
#[derive(Debug, Clone)]
pub struct ScoreResult {
    pub score: u32,
    /// One entry per triggered rule, in evaluation order.
    pub reasons: Vec<String>,
    pub band: RiskBand,
}

pub fn score_client(
    client: &ClientRecord,
    findings: &ClientFindings,
    as_of: NaiveDate,
    thresholds: &Thresholds,
    countries: &CountryTiers,
) -> ScoreResult {
    let mut score = 0u32;
    let mut reasons: Vec<String> = Vec::new();

    {
        let mut add = |points: u32, reason: String| {
            score += points;
            reasons.push(reason);
        };

        if is_yes(client.pep.as_deref()) {
            add(30, "PEP flagged (+30)".into());
        }
        if is_yes(client.sanctions_match.as_deref()) {
            add(40, "Sanctions match (+40)".into());
        }
        if kyc_review_stale(client, as_of, thresholds) {
            add(6, "KYC review stale (+6)".into());
        }
        if residency_is(client, "NON-RESIDENT") {
            add(5, "Non-resident (+5)".into());
        }
        if services_contain(client, "remittance") {
            add(10, "Uses remittance (+10)".into());
        }
        if services_contain(client, "property") {
            add(5, "Property settlements (+5)".into());
        }
        if higher_risk_channel(client) {
            add(4, "Higher-risk delivery channel (+4)".into());
        }

        let (high_tags, medium_tags) = count_country_tags(client, countries);
        // The bonus applies once per tier; the count is evidence only.
        if high_tags >= 1 {
            add(12, format!("High-risk country exposure x{high_tags} (+12)"));
        }
        if medium_tags >= 1 {
            add(6, format!("Medium-risk country exposure x{medium_tags} (+6)"));
        }

        if findings.structuring.hit {
            add(
                15,
                format!(
                    "Structuring pattern: run of {} near-threshold cash deposits (+15)",
                    findings.structuring.max_run
                ),
            );
        }
        if findings.corridor.hit {
            add(
                12,
                format!(
                    "High-risk corridor activity x{} (+12)",
                    findings.corridor.count
                ),
            );
        }
        if findings.large_domestic.hit {
            add(8, "Large domestic transfer (+8)".into());
        }
        if kyc_status_contains(client, "ENHANCED") {
            add(5, "EDD in place (+5)".into());
        }
    }

    let band = band_for(score, thresholds);
    ScoreResult {
        score,
        reasons,
        band,
    }
}

/// Band mapping over the final score. Computed once, never incrementally.
pub fn band_for(score: u32, thresholds: &Thresholds) -> RiskBand {
    if score >= thresholds.band_high {
        RiskBand::High
    } else if score >= thresholds.band_medium {
        RiskBand::Medium
    } else {
        RiskBand::Low
    }
}

/// Stale when the last review (falling back to the onboarding date) is
/// older than the stale cutoff. A client with no parseable KYC history
/// at all is treated as stale.
fn kyc_review_stale(client: &ClientRecord, as_of: NaiveDate, thresholds: &Thresholds) -> bool {
    let review = client
        .last_kyc_review
        .as_deref()
        .and_then(parse_date)
        .or_else(|| client.onboard_date.as_deref().and_then(parse_date));
    months_ago(review, as_of).map_or(true, |m| m > thresholds.kyc_stale_months)
}

fn residency_is(client: &ClientRecord, status: &str) -> bool {
    client
        .residency_status
        .as_deref()
        .map_or(false, |r| r.trim().eq_ignore_ascii_case(status))
}

fn services_contain(client: &ClientRecord, needle: &str) -> bool {
    client
        .services_used
        .as_deref()
        .map_or(false, |s| s.to_lowercase().contains(needle))
}

fn higher_risk_channel(client: &ClientRecord) -> bool {
    let Some(channel) = client.delivery_channel.as_deref() else {
        return false;
    };
    let channel = channel.to_lowercase();
    ["mixed", "broker", "in-branch"]
        .iter()
        .any(|needle| channel.contains(needle))
}

fn kyc_status_contains(client: &ClientRecord, needle: &str) -> bool {
    client
        .kyc_status
        .as_deref()
        .map_or(false, |s| s.to_uppercase().contains(needle))
}

/// Count high- and medium-risk tags across the combined exposure and
/// country fields. Tags are comma-separated, optionally prefixed with a
/// tier label, and matched upper-cased against the configured sets.
fn count_country_tags(client: &ClientRecord, countries: &CountryTiers) -> (usize, usize) {
    let exposure = client.risk_country_exposure.as_deref().unwrap_or("");
    let combined = format!("{exposure},{}", client.country);

    let mut high = 0usize;
    let mut medium = 0usize;
    for tag in combined.split(',') {
        let tag = strip_tier_prefix(tag.trim());
        if tag.is_empty() {
            continue;
        }
        if countries.is_high_risk(tag) {
            high += 1;
        } else if countries.is_medium_risk(tag) {
            medium += 1;
        }
    }
    (high, medium)
}

fn strip_tier_prefix(tag: &str) -> &str {
    for prefix in ["highrisk:", "medrisk:"] {
        if let Some(head) = tag.get(..prefix.len()) {
            if head.eq_ignore_ascii_case(prefix) {
                return tag[prefix.len()..].trim();
            }
        }
    }
    tag
}
