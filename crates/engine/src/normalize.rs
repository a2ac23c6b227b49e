//! Header-synonym normalization for the two input tables.
//!
//! Each table has its own fixed synonym table mapping lower-cased, trimmed
//! headers onto canonical fields. Unmatched headers are silently dropped
//! from the canonical record (they survive in `raw_fields`). Canonical
//! field names themselves appear in the tables, so normalizing an
//! already-canonical row is a fixed point.
//!
//! Rows arrive as ordered maps; when two headers are synonyms for the
//! same field the lexicographically later header wins, on every run.

use std::collections::BTreeMap;

use crate::dates::parse_date;
use crate::model::{ClientRecord, TransactionRecord};

// ---------------------------------------------------------------------------
// Client table
// ---------------------------------------------------------------------------

enum ClientField {
    ClientId,
    Name,
    Country,
    Pep,
    SanctionsMatch,
    ResidencyStatus,
    KycStatus,
    LastKycReview,
    OnboardDate,
    DeliveryChannel,
    ServicesUsed,
    RiskCountryExposure,
}

fn client_field(header: &str) -> Option<ClientField> {
    use ClientField::*;
    Some(match header {
        "id" | "client_id" | "clientid" | "client id" | "customer_id" | "customerid"
        | "customer id" => ClientId,
        "name" | "client_name" | "clientname" | "client name" | "full_name" | "full name"
        | "customer" | "customer_name" | "customer name" => Name,
        "country" | "country_code" | "country code" | "residence_country"
        | "residence country" | "home_country" | "home country" => Country,
        "pep" | "pep_flag" | "pep flag" | "is_pep" | "politically_exposed"
        | "politically exposed" => Pep,
        "sanctions" | "sanctions_match" | "sanctionsmatch" | "sanctions match"
        | "sanction_match" | "sanctions_hit" | "sanctions hit" => SanctionsMatch,
        "residency" | "residency_status" | "residencystatus" | "residency status"
        | "resident" => ResidencyStatus,
        "kyc" | "kyc_status" | "kycstatus" | "kyc status" => KycStatus,
        "last_kyc_review" | "lastkycreview" | "last kyc review" | "kyc_review"
        | "kyc review" | "kyc_review_date" | "kyc review date" | "last_review"
        | "last review" => LastKycReview,
        "onboard_date" | "onboarddate" | "onboard date" | "onboarded"
        | "onboarding_date" | "onboarding date" | "start_date" | "start date" => OnboardDate,
        "delivery_channel" | "deliverychannel" | "delivery channel" => DeliveryChannel,
        "services_used" | "servicesused" | "services used" | "services" | "products" => {
            ServicesUsed
        }
        "risk_country_exposure" | "riskcountryexposure" | "risk country exposure"
        | "country_exposure" | "country exposure" | "risk_countries" | "risk countries" => {
            RiskCountryExposure
        }
        _ => return None,
    })
}

/// Normalize one raw client row. `index` is the zero-based row position,
/// used to synthesize an id when the input has none.
pub fn normalize_client(
    row: &BTreeMap<String, String>,
    index: usize,
    home_country: &str,
) -> ClientRecord {
    let mut client = ClientRecord::default();

    for (header, value) in row {
        let value = value.trim();
        client
            .raw_fields
            .insert(header.clone(), value.to_string());
        if value.is_empty() {
            continue;
        }
        let Some(field) = client_field(header.trim().to_lowercase().as_str()) else {
            continue;
        };
        let value = value.to_string();
        match field {
            ClientField::ClientId => client.client_id = value,
            ClientField::Name => client.name = value,
            ClientField::Country => client.country = value,
            ClientField::Pep => client.pep = Some(value),
            ClientField::SanctionsMatch => client.sanctions_match = Some(value),
            ClientField::ResidencyStatus => client.residency_status = Some(value),
            ClientField::KycStatus => client.kyc_status = Some(value),
            ClientField::LastKycReview => client.last_kyc_review = Some(value),
            ClientField::OnboardDate => client.onboard_date = Some(value),
            ClientField::DeliveryChannel => client.delivery_channel = Some(value),
            ClientField::ServicesUsed => client.services_used = Some(value),
            ClientField::RiskCountryExposure => client.risk_country_exposure = Some(value),
        }
    }

    // Fallback defaults, applied after mapping.
    if client.client_id.is_empty() {
        client.client_id = format!("C{:04}", index + 1);
    }
    if client.name.is_empty() {
        client.name = client.client_id.clone();
    }
    if client.country.is_empty() {
        client.country = home_country.trim().to_uppercase();
    }

    client
}

pub fn normalize_clients(
    rows: &[BTreeMap<String, String>],
    home_country: &str,
) -> Vec<ClientRecord> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| normalize_client(row, i, home_country))
        .collect()
}

// ---------------------------------------------------------------------------
// Transaction table
// ---------------------------------------------------------------------------

enum TxnField {
    ClientId,
    Date,
    Amount,
    Currency,
    Kind,
    Channel,
    CounterpartyCountry,
    Notes,
}

fn txn_field(header: &str) -> Option<TxnField> {
    use TxnField::*;
    Some(match header {
        "client_id" | "clientid" | "client id" | "client" | "customer_id" | "customerid"
        | "customer id" => ClientId,
        "date" | "txn_date" | "txn date" | "transaction_date" | "transaction date"
        | "value_date" | "value date" | "posted" | "posted_date" | "posted date" => Date,
        "amount" | "amt" | "value" | "txn_amount" | "txn amount" | "amount_aud"
        | "amount aud" => Amount,
        "currency" | "ccy" | "cur" => Currency,
        "type" | "txn_type" | "txn type" | "transaction_type" | "transaction type"
        | "category" | "kind" => Kind,
        "channel" | "method" => Channel,
        "counterparty_country" | "counterpartycountry" | "counterparty country"
        | "counterparty" | "destination_country" | "destination country" | "dest_country"
        | "country" => CounterpartyCountry,
        "notes" | "note" | "description" | "memo" | "reference" => Notes,
        _ => return None,
    })
}

/// Normalize one raw transaction row. Dates and amounts are parsed here;
/// failures become `None`, never errors.
pub fn normalize_transaction(row: &BTreeMap<String, String>) -> TransactionRecord {
    let mut txn = TransactionRecord::default();

    for (header, value) in row {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        let Some(field) = txn_field(header.trim().to_lowercase().as_str()) else {
            continue;
        };
        match field {
            TxnField::ClientId => txn.client_id = Some(value.to_string()),
            TxnField::Date => txn.date = parse_date(value),
            TxnField::Amount => txn.amount = parse_amount(value),
            TxnField::Currency => txn.currency = Some(value.to_string()),
            TxnField::Kind => txn.kind = Some(value.to_string()),
            TxnField::Channel => txn.channel = Some(value.to_string()),
            TxnField::CounterpartyCountry => txn.counterparty_country = Some(value.to_string()),
            TxnField::Notes => txn.notes = Some(value.to_string()),
        }
    }

    txn
}

pub fn normalize_transactions(rows: &[BTreeMap<String, String>]) -> Vec<TransactionRecord> {
    rows.iter().map(normalize_transaction).collect()
}

// ---------------------------------------------------------------------------
// Value parsing helpers
// ---------------------------------------------------------------------------

/// Parse a currency-formatted amount. A currency code at either end
/// ("AUD 150000"), currency symbols, thousands separators and spaces are
/// stripped; any letter left over makes the whole value unparseable and
/// yields `None`, which fails every threshold comparison downstream.
/// "12 Mar 2025" in an amount column is not a number.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let mut s = raw.trim();
    // A run of up to 3 letters at either end reads as a currency code.
    let lead = s.bytes().take_while(|b| b.is_ascii_alphabetic()).count();
    if (1..=3).contains(&lead) {
        s = s[lead..].trim_start();
    }
    let tail = s.bytes().rev().take_while(|b| b.is_ascii_alphabetic()).count();
    if (1..=3).contains(&tail) {
        s = s[..s.len() - tail].trim_end();
    }
    let cleaned: String = s
        .chars()
        .filter(|c| !matches!(c, '$' | '€' | '£' | '¥' | ',' | ' '))
        .collect();
    if cleaned.is_empty() || cleaned.bytes().any(|b| b.is_ascii_alphabetic()) {
        return None;
    }
    cleaned.parse().ok()
}

/// Tri-state yes/no test: true for "y", "yes", "true", "1" (any case).
pub fn is_yes(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("y" | "yes" | "true" | "1")
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn client_headers_match_case_insensitively() {
        let raw = row(&[
            ("Client ID", "C042"),
            ("FULL NAME", "Mei Tan"),
            ("country", "nz"),
            ("PEP", " Y "),
        ]);
        let client = normalize_client(&raw, 0, "AU");
        assert_eq!(client.client_id, "C042");
        assert_eq!(client.name, "Mei Tan");
        assert_eq!(client.country, "nz");
        assert_eq!(client.pep.as_deref(), Some("Y"));
    }

    #[test]
    fn unknown_headers_dropped_but_kept_raw() {
        let raw = row(&[("id", "C001"), ("Internal Code", "ZZ9")]);
        let client = normalize_client(&raw, 0, "AU");
        assert_eq!(client.client_id, "C001");
        assert_eq!(client.raw_fields.get("Internal Code").unwrap(), "ZZ9");
    }

    #[test]
    fn colliding_synonym_headers_resolve_deterministically() {
        // Both headers map onto the country field; the lexicographically
        // later one wins, independent of row construction order.
        let mut seen = std::collections::BTreeSet::new();
        for _ in 0..64 {
            let raw = row(&[("id", "C001"), ("country", "NZ"), ("country_code", "JP")]);
            seen.insert(normalize_client(&raw, 0, "AU").country);
        }
        assert_eq!(seen.len(), 1);
        assert!(seen.contains("JP"));

        // "amt" sorts after "amount", so its value wins.
        let txn = normalize_transaction(&row(&[
            ("ClientID", "C001"),
            ("amount", "100"),
            ("amt", "200"),
        ]));
        assert_eq!(txn.amount, Some(200.0));
    }

    #[test]
    fn fallback_defaults() {
        let client = normalize_client(&row(&[("name", "")]), 4, "au");
        assert_eq!(client.client_id, "C0005");
        assert_eq!(client.name, "C0005");
        assert_eq!(client.country, "AU");
    }

    #[test]
    fn normalization_is_a_fixed_point_for_canonical_headers() {
        let canonical = row(&[
            ("ClientID", "C001"),
            ("Name", "Mei Tan"),
            ("Country", "AU"),
            ("SanctionsMatch", "N"),
            ("ResidencyStatus", "RESIDENT"),
            ("KYCStatus", "STANDARD"),
            ("LastKYCReview", "2025-06-01"),
            ("OnboardDate", "2020-01-01"),
            ("DeliveryChannel", "online"),
            ("ServicesUsed", "savings"),
            ("RiskCountryExposure", "MedRisk:CN"),
        ]);
        let once = normalize_client(&canonical, 0, "AU");

        // Re-normalize the canonical output as a raw row again.
        let again = row(&[
            ("ClientID", &once.client_id),
            ("Name", &once.name),
            ("Country", &once.country),
            ("SanctionsMatch", once.sanctions_match.as_deref().unwrap()),
            ("ResidencyStatus", once.residency_status.as_deref().unwrap()),
            ("KYCStatus", once.kyc_status.as_deref().unwrap()),
            ("LastKYCReview", once.last_kyc_review.as_deref().unwrap()),
            ("OnboardDate", once.onboard_date.as_deref().unwrap()),
            ("DeliveryChannel", once.delivery_channel.as_deref().unwrap()),
            ("ServicesUsed", once.services_used.as_deref().unwrap()),
            (
                "RiskCountryExposure",
                once.risk_country_exposure.as_deref().unwrap(),
            ),
        ]);
        let twice = normalize_client(&again, 0, "AU");

        assert_eq!(twice.client_id, once.client_id);
        assert_eq!(twice.name, once.name);
        assert_eq!(twice.country, once.country);
        assert_eq!(twice.kyc_status, once.kyc_status);
        assert_eq!(twice.risk_country_exposure, once.risk_country_exposure);
    }

    #[test]
    fn transaction_parsing_degrades_to_none() {
        let txn = normalize_transaction(&row(&[
            ("ClientID", "C001"),
            ("Date", "nonsense"),
            ("Amount", "n/a"),
            ("Type", "Cash Deposit"),
        ]));
        assert_eq!(txn.client_id.as_deref(), Some("C001"));
        assert!(txn.date.is_none());
        assert!(txn.amount.is_none());
        assert_eq!(txn.kind.as_deref(), Some("Cash Deposit"));
    }

    #[test]
    fn missing_client_id_stays_none() {
        let txn = normalize_transaction(&row(&[("Date", "2025-01-01"), ("Amount", "50")]));
        assert!(txn.client_id.is_none());

        let txn = normalize_transaction(&row(&[("ClientID", "  "), ("Amount", "50")]));
        assert!(txn.client_id.is_none());
    }

    #[test]
    fn amount_parsing_strips_currency_noise() {
        assert_eq!(parse_amount("$9,700.00"), Some(9_700.0));
        assert_eq!(parse_amount("  25 000 "), Some(25_000.0));
        assert_eq!(parse_amount("-120.50"), Some(-120.5));
        assert_eq!(parse_amount("AUD 150000"), Some(150_000.0));
        assert_eq!(parse_amount("150000 AUD"), Some(150_000.0));
        assert_eq!(parse_amount("n/a"), None);
        assert_eq!(parse_amount(""), None);
    }

    #[test]
    fn amounts_with_interior_letters_are_not_numbers() {
        // A date landing in an amount column must not coerce to a number.
        assert_eq!(parse_amount("12 Mar 2025"), None);
        assert_eq!(parse_amount("2025-03-12"), None);
        assert_eq!(parse_amount("about 500"), None);
        assert_eq!(parse_amount("1,2x3"), None);
    }

    #[test]
    fn yes_no_truthiness() {
        assert!(is_yes(Some("Y")));
        assert!(is_yes(Some(" yes ")));
        assert!(is_yes(Some("TRUE")));
        assert!(is_yes(Some("1")));
        assert!(!is_yes(Some("N")));
        assert!(!is_yes(Some("no")));
        assert!(!is_yes(Some("")));
        assert!(!is_yes(None));
    }
}
