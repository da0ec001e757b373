use thiserror::Error;

/// Main error type for kubestat
#[derive(Error, Debug)]
pub enum KubestatError {
    /// Snapshot document violates the expected shape
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// Snapshot source could not be read
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Errors raised while converting CPU and memory quantity strings
#[derive(Error, Debug, PartialEq, Eq)]
pub enum QuantityError {
    #[error("empty quantity")]
    Empty,

    #[error("invalid number in quantity '{0}'")]
    InvalidNumber(String),

    #[error("unknown suffix in quantity '{0}'")]
    UnknownSuffix(String),

    #[error("quantity '{0}' is out of range")]
    Overflow(String),
}

/// Input contract violations found while ingesting a snapshot document
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("unsupported apiVersion '{0}', expected 'v1'")]
    UnsupportedApiVersion(String),

    #[error("document has no 'items' array")]
    MissingItems,

    #[error("item #{index} has unsupported kind '{kind}'")]
    UnsupportedKind { index: usize, kind: String },

    #[error("item #{index} ({kind}) is missing required field '{field}'")]
    MissingField {
        index: usize,
        kind: &'static str,
        field: &'static str,
    },

    #[error("pod #{index} '{pod}' has {count} owner references; exactly one is expected")]
    OwnerReferences {
        index: usize,
        pod: String,
        count: usize,
    },

    #[error("pod '{pod}' volume '{volume}' declares {count} volume types; exactly one is expected")]
    VolumeType {
        pod: String,
        volume: String,
        count: usize,
    },

    #[error("pod '{pod}' container '{container}' mounts undeclared volume '{volume}'")]
    UnknownVolume {
        pod: String,
        container: String,
        volume: String,
    },

    #[error("item #{index} ({kind}) is malformed: {source}")]
    Malformed {
        index: usize,
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{context}: {source}")]
    InvalidQuantity {
        context: String,
        #[source]
        source: QuantityError,
    },
}

/// Errors raised by snapshot sources
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("cannot read '{path}': {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot start `{command}`: {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {code}: {stderr}")]
    CommandFailed {
        command: String,
        code: String,
        stderr: String,
    },

    #[error("output of `{0}` is not valid UTF-8")]
    InvalidOutput(String),
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Filter names a field that cannot be filtered on
    #[error("Invalid filter field '{field}' in '{criteria}'")]
    InvalidFilterField { field: String, criteria: String },

    /// Filter regex does not compile
    #[error("Invalid regular expression for field '{field}' in '{criteria}': {source}")]
    InvalidRegex {
        field: String,
        criteria: String,
        #[source]
        source: regex::Error,
    },

    /// Column list names an unknown column
    #[error("Unknown column '{column}', expected one of: {expected}")]
    InvalidColumn { column: String, expected: String },

    /// Invalid configuration value
    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

/// Helper type alias for Results
pub type Result<T> = std::result::Result<T, KubestatError>;
