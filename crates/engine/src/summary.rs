use std::collections::BTreeMap;

use crate::model::{MonitoringCase, RiskBand, RunSummary, ScoredClient};

/// Compute summary statistics over scored clients and their cases.
pub fn compute_summary(
    clients: &[ScoredClient],
    cases: &[MonitoringCase],
    total_transactions: usize,
    orphaned_transactions: usize,
) -> RunSummary {
    let mut high = 0;
    let mut medium = 0;
    let mut low = 0;
    for client in clients {
        match client.band {
            RiskBand::High => high += 1,
            RiskBand::Medium => medium += 1,
            RiskBand::Low => low += 1,
        }
    }

    let mut case_counts: BTreeMap<String, usize> = BTreeMap::new();
    for case in cases {
        *case_counts.entry(case.rule.to_string()).or_insert(0) += 1;
    }

    RunSummary {
        total_clients: clients.len(),
        total_transactions,
        orphaned_transactions,
        high,
        medium,
        low,
        total_cases: cases.len(),
        case_counts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CaseRule;

    fn client(band: RiskBand) -> ScoredClient {
        ScoredClient {
            client_id: "C001".into(),
            name: "Mei Tan".into(),
            country: "AU".into(),
            score: 0,
            band,
            reasons: vec![],
            profile: BTreeMap::new(),
        }
    }

    fn case(rule: CaseRule) -> MonitoringCase {
        MonitoringCase {
            rule,
            client: "Mei Tan".into(),
            amount: None,
            detail: "x".into(),
        }
    }

    #[test]
    fn summary_counts() {
        let clients = vec![
            client(RiskBand::High),
            client(RiskBand::Low),
            client(RiskBand::Low),
            client(RiskBand::Medium),
        ];
        let cases = vec![
            case(CaseRule::Structuring),
            case(CaseRule::Structuring),
            case(CaseRule::LargeDomestic),
        ];
        let summary = compute_summary(&clients, &cases, 42, 3);
        assert_eq!(summary.total_clients, 4);
        assert_eq!(summary.total_transactions, 42);
        assert_eq!(summary.orphaned_transactions, 3);
        assert_eq!(summary.high, 1);
        assert_eq!(summary.medium, 1);
        assert_eq!(summary.low, 2);
        assert_eq!(summary.total_cases, 3);
        assert_eq!(summary.case_counts["structuring"], 2);
        assert_eq!(summary.case_counts["large_domestic"], 1);
    }
}
