/// Errors raised while building or parsing a connection descriptor
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    /// The standalone host was set to an empty string
    #[error("Host must not be empty")]
    EmptyHost,

    /// A port was outside `[0, 65535]` or not a number
    #[error("Port out of range: {0}")]
    InvalidPort(String),

    /// An endpoint address is not of the form `host:port`
    #[error("Malformed endpoint address: {0}")]
    MalformedEndpoint(String),

    /// More than one topology mode was selected
    #[error("Cannot combine {0} mode with {1} endpoints")]
    ConflictingTopology(&'static str, &'static str),

    /// No host, sentinel, or cluster endpoint was configured
    #[error("At least one of host, sentinel, or cluster endpoints must be set")]
    MissingEndpoint,

    /// Sentinel mode was selected without naming a master
    #[error("Sentinel mode requires a master id")]
    MissingMasterId,
}
