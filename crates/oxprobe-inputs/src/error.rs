/// Errors raised while gathering from an input.
///
/// # Examples
///
/// ```rust
/// use oxprobe_inputs::error::InputError;
///
/// let err = InputError::BinaryNotFound("ip6tables".to_string());
/// assert!(err.to_string().contains("ip6tables"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    /// The `iptables -nvL` output did not start with the chain and column headers.
    #[error("cannot parse iptables list information")]
    IptablesParse,

    /// The configured binary could not be resolved on `$PATH`.
    #[error("executable file not found in $PATH: {0}")]
    BinaryNotFound(String),

    /// The child process could not be spawned.
    #[error("failed to run {program}: {source}")]
    Command {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The child process exited unsuccessfully.
    #[error("{program} exited with {status}: {stderr}")]
    CommandStatus {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("unable to parse address {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Transport-level failure from `reqwest` (connect, timeout, TLS).
    #[error("error making HTTP request to {url:?}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("{url} returned unexpected content type {content_type}")]
    UnexpectedContentType { url: String, content_type: String },

    /// The status document was not valid JSON for the expected schema.
    #[error("error while decoding JSON response")]
    Decode(#[source] serde_json::Error),

    /// TLS material (CA, client certificate or key) could not be loaded.
    #[error("TLS configuration error: {0}")]
    Tls(String),

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

/// Convenience type alias so callers can write `error::Result<T>`.
pub type Result<T> = std::result::Result<T, InputError>;
