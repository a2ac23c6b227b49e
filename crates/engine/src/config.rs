use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::EngineError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Run configuration. Every threshold defaults to the engine's fixed
/// compatibility values; a TOML file only needs to name its inputs.
#[derive(Debug, Deserialize)]
pub struct EngineConfig {
    pub name: String,
    /// Reference date for all lookback windows. Injectable so runs against
    /// fixed historical data are reproducible; defaults to today when unset.
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
    /// Jurisdiction assumed for clients with no country column.
    #[serde(default = "default_home_country")]
    pub home_country: String,
    #[serde(default)]
    pub inputs: Option<InputsConfig>,
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default)]
    pub countries: CountryTiers,
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_home_country() -> String {
    "AU".into()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            name: "adhoc".into(),
            as_of: None,
            home_country: default_home_country(),
            inputs: None,
            thresholds: Thresholds::default(),
            countries: CountryTiers::default(),
            output: OutputConfig::default(),
        }
    }
}

/// CSV files for the two tables, relative to the config file.
#[derive(Debug, Clone, Deserialize)]
pub struct InputsConfig {
    pub clients: String,
    pub transactions: String,
}

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

/// Detection and banding constants. Defaults are the compatibility values;
/// override only when the reporting jurisdiction's rules differ.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Trailing window (months) for all three detectors.
    pub lookback_months: i32,
    /// Near-threshold band for structuring: `[low, high)`.
    pub structuring_low: f64,
    pub structuring_high: f64,
    /// Max gap (days) between consecutive deposits in a structuring run.
    pub structuring_gap_days: i64,
    /// Floor applied to both the longest run and the total qualifying count.
    pub structuring_min_run: usize,
    pub corridor_min_count: usize,
    pub corridor_big_amount: f64,
    pub large_domestic_amount: f64,
    /// A KYC review older than this (months) counts as stale.
    pub kyc_stale_months: i32,
    pub band_medium: u32,
    pub band_high: u32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            lookback_months: 18,
            structuring_low: 9_600.0,
            structuring_high: 10_000.0,
            structuring_gap_days: 7,
            structuring_min_run: 4,
            corridor_min_count: 2,
            corridor_big_amount: 20_000.0,
            large_domestic_amount: 100_000.0,
            kyc_stale_months: 24,
            band_medium: 15,
            band_high: 30,
        }
    }
}

// ---------------------------------------------------------------------------
// Country tiers
// ---------------------------------------------------------------------------

/// Country tier lists for exposure scoring and corridor detection.
/// Matching is case-insensitive on trimmed 2-letter codes.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CountryTiers {
    pub high_risk: Vec<String>,
    pub medium_risk: Vec<String>,
    pub corridors: Vec<String>,
}

impl Default for CountryTiers {
    fn default() -> Self {
        let to_vec = |codes: &[&str]| codes.iter().map(|c| c.to_string()).collect();
        Self {
            high_risk: to_vec(&["IR", "KP", "SY", "AF", "MM", "RU", "YE", "SS", "SD"]),
            medium_risk: to_vec(&["AE", "TR", "CN", "PK", "NG", "KH", "LA", "VN"]),
            corridors: to_vec(&["IR", "KP", "SY", "AF", "MM", "KH", "LA"]),
        }
    }
}

impl CountryTiers {
    pub fn is_high_risk(&self, code: &str) -> bool {
        contains_code(&self.high_risk, code)
    }

    pub fn is_medium_risk(&self, code: &str) -> bool {
        contains_code(&self.medium_risk, code)
    }

    pub fn is_corridor(&self, code: &str) -> bool {
        contains_code(&self.corridors, code)
    }
}

fn contains_code(list: &[String], code: &str) -> bool {
    let code = code.trim();
    !code.is_empty() && list.iter().any(|c| c.eq_ignore_ascii_case(code))
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Write the JSON result here after a run (relative to the config file).
    #[serde(default)]
    pub json: Option<String>,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl EngineConfig {
    pub fn from_toml(input: &str) -> Result<Self, EngineError> {
        let config: EngineConfig =
            toml::from_str(input).map_err(|e| EngineError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        let t = &self.thresholds;

        if t.lookback_months <= 0 {
            return Err(EngineError::ConfigValidation(format!(
                "lookback_months must be positive, got {}",
                t.lookback_months
            )));
        }
        if t.structuring_low >= t.structuring_high {
            return Err(EngineError::ConfigValidation(format!(
                "structuring band is empty: [{}, {})",
                t.structuring_low, t.structuring_high
            )));
        }
        if t.structuring_min_run == 0 || t.corridor_min_count == 0 {
            return Err(EngineError::ConfigValidation(
                "run-length and corridor count floors must be at least 1".into(),
            ));
        }
        if t.band_medium >= t.band_high {
            return Err(EngineError::ConfigValidation(format!(
                "band cutoffs must satisfy medium < high, got {} >= {}",
                t.band_medium, t.band_high
            )));
        }
        if self.home_country.trim().is_empty() {
            return Err(EngineError::ConfigValidation(
                "home_country must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// The input files, or a precondition error when the config has none.
    pub fn inputs(&self) -> Result<&InputsConfig, EngineError> {
        self.inputs.as_ref().ok_or_else(|| {
            EngineError::Precondition("config names no [inputs] table".into())
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
name = "Quarterly Review"

[inputs]
clients = "clients.csv"
transactions = "transactions.csv"
"#;

    #[test]
    fn parse_minimal_uses_defaults() {
        let config = EngineConfig::from_toml(MINIMAL).unwrap();
        assert_eq!(config.name, "Quarterly Review");
        assert_eq!(config.home_country, "AU");
        assert!(config.as_of.is_none());
        assert_eq!(config.thresholds.lookback_months, 18);
        assert_eq!(config.thresholds.structuring_low, 9_600.0);
        assert_eq!(config.thresholds.structuring_high, 10_000.0);
        assert_eq!(config.thresholds.band_medium, 15);
        assert_eq!(config.thresholds.band_high, 30);
        assert!(config.countries.is_high_risk("IR"));
        assert!(config.countries.is_medium_risk("cn"));
        assert!(!config.countries.is_high_risk("AU"));
        let inputs = config.inputs().unwrap();
        assert_eq!(inputs.clients, "clients.csv");
    }

    #[test]
    fn parse_with_overrides() {
        let input = r#"
name = "Custom"
as_of = "2026-01-31"
home_country = "NZ"

[thresholds]
lookback_months = 12
corridor_big_amount = 15000.0

[countries]
high_risk = ["IR"]
medium_risk = ["CN"]
corridors = ["IR"]
"#;
        let config = EngineConfig::from_toml(input).unwrap();
        assert_eq!(config.as_of.unwrap().to_string(), "2026-01-31");
        assert_eq!(config.home_country, "NZ");
        assert_eq!(config.thresholds.lookback_months, 12);
        assert_eq!(config.thresholds.corridor_big_amount, 15_000.0);
        // Unspecified thresholds keep their defaults
        assert_eq!(config.thresholds.structuring_gap_days, 7);
        assert!(!config.countries.is_medium_risk("AE"));
    }

    #[test]
    fn reject_inverted_band_cutoffs() {
        let input = r#"
name = "Bad"

[thresholds]
band_medium = 30
band_high = 15
"#;
        let err = EngineConfig::from_toml(input).unwrap_err();
        assert!(err.to_string().contains("medium < high"));
    }

    #[test]
    fn reject_empty_structuring_band() {
        let input = r#"
name = "Bad"

[thresholds]
structuring_low = 10000.0
structuring_high = 9600.0
"#;
        let err = EngineConfig::from_toml(input).unwrap_err();
        assert!(err.to_string().contains("structuring band"));
    }

    #[test]
    fn missing_inputs_is_a_precondition_error() {
        let config = EngineConfig::from_toml("name = \"No Inputs\"").unwrap();
        let err = config.inputs().unwrap_err();
        assert!(matches!(err, EngineError::Precondition(_)));
    }

    #[test]
    fn country_matching_trims_and_ignores_case() {
        let tiers = CountryTiers::default();
        assert!(tiers.is_corridor(" ir "));
        assert!(!tiers.is_corridor(""));
        assert!(!tiers.is_corridor("  "));
    }
}
