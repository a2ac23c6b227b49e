use std::fmt;

#[derive(Debug)]
pub enum EngineError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (bad thresholds, inverted band cutoffs, etc.).
    ConfigValidation(String),
    /// Programming contract violation (e.g. a run invoked without inputs).
    /// Data-quality problems never surface here — malformed dates, amounts
    /// and unknown headers degrade to "rule does not fire".
    Precondition(String),
    /// IO error (CSV read, etc.).
    Io(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::Precondition(msg) => write!(f, "precondition violated: {msg}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {}
