use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Malformed, oversized, or cross-reference-invalid request payloads.
///
/// Always recoverable: the request is rejected and the worker keeps serving.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("buffer too short reading {context}: needed {needed} bytes, {remaining} remaining")]
    TooShort {
        context: &'static str,
        needed: usize,
        remaining: usize,
    },

    #[error("{field} = {count} exceeds limit {limit}")]
    CountExceedsLimit {
        field: &'static str,
        count: usize,
        limit: usize,
    },

    #[error("{field} index {index} out of range (must be < {bound})")]
    IndexOutOfRange {
        field: &'static str,
        index: usize,
        bound: usize,
    },

    #[error("unknown objective mode tag {0}")]
    UnknownObjectiveMode(u8),

    #[error("unknown constraint kind tag {0}")]
    UnknownConstraintKind(u8),

    #[error("unknown command {0}")]
    UnknownCommand(u8),

    #[error("{count} unexpected trailing bytes")]
    TrailingBytes { count: usize },

    #[error("custom constraint has {coefficients} coefficients for {routes} routes")]
    CoefficientMismatch { routes: usize, coefficients: usize },

    #[error("variable vector has {got} values, model declares {expected}")]
    VariableCountMismatch { expected: usize, got: usize },
}

/// Numerical failures reported by the solver engine.
///
/// Distinct from infeasibility, which is a valid business outcome.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    #[error("objective is unbounded")]
    Unbounded,

    #[error("solver engine failure: {0}")]
    Engine(String),

    #[error("degenerate ROI scaling variable t = {t}")]
    DegenerateScaling { t: f64 },

    #[error("solution has {got} values, formulation has {expected} columns")]
    DimensionMismatch { expected: usize, got: usize },
}

/// Framing failures. Fatal to the connection, not to the worker.
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("stream ended inside a frame: expected {expected} bytes, got {got}")]
    Truncated { expected: usize, got: usize },

    #[error("empty frame")]
    EmptyFrame,

    #[error("frame length {length} exceeds maximum {max}")]
    FrameTooLarge { length: usize, max: usize },

    #[error("stream IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Solve(#[from] SolveError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
