//! Exit codes for the `cfd` binary.
//!
//! Exit code ranges:
//! - 0: success
//! - 2: command-line usage error (raised by clap before any command runs)
//! - 10-19: user/input errors (recoverable by user action)
//! - 20-29: internal errors

/// Process exit codes. Stable for scripting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Ok = 0,

    // ========================================================================
    // User / Input Errors (10-19)
    // ========================================================================
    /// Malformed input data or argument values
    ArgsError = 10,

    /// Settings file missing, unreadable or invalid
    ConfigError = 11,

    /// Parameters outside a family's domain
    ParameterError = 12,

    /// Estimator rejected the samples or failed to converge
    EstimationError = 13,

    // ========================================================================
    // Internal Errors (20-29)
    // ========================================================================
    /// Internal error (bug - please report)
    InternalError = 20,

    /// I/O error
    IoError = 21,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn is_user_error(self) -> bool {
        (10..20).contains(&self.as_i32())
    }

    pub fn is_internal_error(self) -> bool {
        self.as_i32() >= 20
    }

    /// Error code name (for JSON output).
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Ok => "OK",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::ConfigError => "ERR_CONFIG",
            ExitCode::ParameterError => "ERR_PARAMETER",
            ExitCode::EstimationError => "ERR_ESTIMATION",
            ExitCode::InternalError => "ERR_INTERNAL",
            ExitCode::IoError => "ERR_IO",
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}
