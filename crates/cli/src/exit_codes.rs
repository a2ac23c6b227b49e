//! CLI Exit Code Registry
//!
//! Single source of truth for all CLI exit codes. Exit codes are part of
//! the shell contract — compliance pipelines gate on them.
//!
//! | Code | Meaning                                   |
//! |------|-------------------------------------------|
//! | 0    | Success, no monitoring cases              |
//! | 1    | General error (unspecified)               |
//! | 2    | CLI usage error (bad args, missing file)  |
//! | 3    | Invalid or incomplete run config          |
//! | 4    | Runtime error (unreadable input, IO)      |
//! | 5    | Run completed and monitoring cases found  |

/// Success - run completed with no monitoring cases.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// Config failed to parse or validate, or names no inputs.
pub const EXIT_INVALID_CONFIG: u8 = 3;

/// Runtime failure: unreadable CSV, IO error, serialization error.
pub const EXIT_RUNTIME: u8 = 4;

/// The run succeeded and produced at least one monitoring case.
/// Like `diff(1)`, a nonzero code here means "findings", not "failure".
pub const EXIT_CASES_FOUND: u8 = 5;
