//! Builds the flat monitoring-case list from memoized detector findings.
//! At most one case per detector per client; details restate the same
//! evidence numbers the scorer put into its reason strings.

use crate::detect::ClientFindings;
use crate::model::{CaseRule, MonitoringCase, ScoredClient};

/// Emit cases per client in the given (score-descending) order, with the
/// fixed per-client rule order structuring → corridor → large-domestic.
pub fn build_cases(scored: &[(ScoredClient, ClientFindings)]) -> Vec<MonitoringCase> {
    let mut cases = Vec::new();

    for (client, findings) in scored {
        let s = &findings.structuring;
        if s.hit {
            cases.push(MonitoringCase {
                rule: CaseRule::Structuring,
                client: client.name.clone(),
                amount: Some(s.total_amount),
                detail: format!(
                    "run of {} near-threshold cash deposits, {} in window",
                    s.max_run, s.count
                ),
            });
        }

        let c = &findings.corridor;
        if c.hit {
            cases.push(MonitoringCase {
                rule: CaseRule::HighRiskCorridor,
                client: client.name.clone(),
                amount: c.max_amount,
                detail: format!(
                    "{} international transfers to high-risk corridors, {} at large amount",
                    c.count, c.big_count
                ),
            });
        }

        let l = &findings.large_domestic;
        if l.hit {
            cases.push(MonitoringCase {
                rule: CaseRule::LargeDomestic,
                client: client.name.clone(),
                amount: l.max_amount,
                detail: format!("{} large domestic transfers in window", l.count),
            });
        }
    }

    cases
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::{CorridorFinding, LargeDomesticFinding, StructuringFinding};
    use crate::model::RiskBand;
    use std::collections::BTreeMap;

    fn scored(id: &str, name: &str, score: u32) -> ScoredClient {
        ScoredClient {
            client_id: id.into(),
            name: name.into(),
            country: "AU".into(),
            score,
            band: RiskBand::Low,
            reasons: vec![],
            profile: BTreeMap::new(),
        }
    }

    #[test]
    fn no_hits_no_cases() {
        let input = vec![(scored("C001", "Mei Tan", 0), ClientFindings::default())];
        assert!(build_cases(&input).is_empty());
    }

    #[test]
    fn rule_order_within_a_client() {
        let findings = ClientFindings {
            structuring: StructuringFinding {
                hit: true,
                max_run: 4,
                count: 4,
                total_amount: 38_800.0,
            },
            corridor: CorridorFinding {
                hit: true,
                count: 2,
                big_count: 1,
                max_amount: Some(25_000.0),
            },
            large_domestic: LargeDomesticFinding {
                hit: true,
                count: 1,
                max_amount: Some(150_000.0),
            },
        };
        let input = vec![(scored("C002", "Omar Haddad", 118), findings)];
        let cases = build_cases(&input);

        assert_eq!(cases.len(), 3);
        assert_eq!(cases[0].rule, CaseRule::Structuring);
        assert_eq!(cases[0].amount, Some(38_800.0));
        assert_eq!(
            cases[0].detail,
            "run of 4 near-threshold cash deposits, 4 in window"
        );
        assert_eq!(cases[1].rule, CaseRule::HighRiskCorridor);
        assert_eq!(
            cases[1].detail,
            "2 international transfers to high-risk corridors, 1 at large amount"
        );
        assert_eq!(cases[2].rule, CaseRule::LargeDomestic);
        assert_eq!(cases[2].detail, "1 large domestic transfers in window");
        for case in &cases {
            assert_eq!(case.client, "Omar Haddad");
        }
    }

    #[test]
    fn clients_emit_in_given_order() {
        let hit = ClientFindings {
            large_domestic: LargeDomesticFinding {
                hit: true,
                count: 1,
                max_amount: Some(120_000.0),
            },
            ..Default::default()
        };
        let input = vec![
            (scored("C002", "Omar Haddad", 50), hit.clone()),
            (scored("C001", "Mei Tan", 8), hit),
        ];
        let cases = build_cases(&input);
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].client, "Omar Haddad");
        assert_eq!(cases[1].client, "Mei Tan");
    }
}
