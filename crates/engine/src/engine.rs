use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::cases::build_cases;
use crate::config::EngineConfig;
use crate::detect::{detect_all, ClientFindings};
use crate::error::EngineError;
use crate::group::group_by_client;
use crate::model::{RunInput, RunMeta, RunResult, ScoredClient};
use crate::normalize::{normalize_clients, normalize_transactions};
use crate::score::score_client;
use crate::summary::compute_summary;

/// Run the full pipeline over one batch: normalize both tables, group
/// transactions, score every client, build monitoring cases.
pub fn run(config: &EngineConfig, input: &RunInput) -> Result<RunResult, EngineError> {
    config.validate()?;
    let as_of = config
        .as_of
        .unwrap_or_else(|| chrono::Utc::now().date_naive());

    let clients = normalize_clients(&input.clients, &config.home_country);
    let transactions = normalize_transactions(&input.transactions);
    let orphaned = transactions
        .iter()
        .filter(|t| t.client_id.is_none())
        .count();
    let groups = group_by_client(&transactions);
    debug!(
        clients = clients.len(),
        transactions = transactions.len(),
        orphaned,
        "normalized input batch"
    );

    let mut scored: Vec<(ScoredClient, ClientFindings)> = Vec::with_capacity(clients.len());
    for client in &clients {
        let txns = groups
            .get(&client.client_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[]);
        let findings = detect_all(txns, as_of, &config.thresholds, &config.countries);
        let result = score_client(client, &findings, as_of, &config.thresholds, &config.countries);
        scored.push((
            ScoredClient {
                client_id: client.client_id.clone(),
                name: client.name.clone(),
                country: client.country.clone(),
                score: result.score,
                band: result.band,
                reasons: result.reasons,
                profile: client.raw_fields.clone(),
            },
            findings,
        ));
    }

    // Score-descending; client id breaks ties so repeated runs are identical.
    scored.sort_by(|a, b| {
        b.0.score
            .cmp(&a.0.score)
            .then_with(|| a.0.client_id.cmp(&b.0.client_id))
    });

    let cases = build_cases(&scored);
    let clients: Vec<ScoredClient> = scored.into_iter().map(|(client, _)| client).collect();
    let summary = compute_summary(&clients, &cases, transactions.len(), orphaned);
    info!(
        clients = clients.len(),
        cases = cases.len(),
        high = summary.high,
        "run complete"
    );

    Ok(RunResult {
        meta: RunMeta {
            config_name: config.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            as_of,
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        clients,
        cases,
    })
}

/// Load raw CSV text into header → value row maps, ordered by header so
/// downstream field resolution is reproducible. No normalization here;
/// `run` applies the synonym tables.
pub fn load_csv_rows(csv_data: &str) -> Result<Vec<BTreeMap<String, String>>, EngineError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv_data.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| EngineError::Io(e.to_string()))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| EngineError::Io(e.to_string()))?;
        let mut row = BTreeMap::new();
        for (i, header) in headers.iter().enumerate() {
            if let Some(value) = record.get(i) {
                row.insert(header.clone(), value.to_string());
            }
        }
        rows.push(row);
    }

    Ok(rows)
}
