use thiserror::Error;

/// Errors surfaced while walking the argument loop (§4.9) or the top-level
/// option parser.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArgError {
    #[error("unknown object or verb: {0}")]
    Usage(String),
    #[error("keyword '{0}' requires a value")]
    MissingArgument(String),
    #[error("invalid value for '{keyword}': {value}")]
    InvalidArgument { keyword: String, value: String },
}

/// Errors raised while walking a single reply message's attributes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("attribute {0:#x} has the wrong length for its kind")]
    WrongLength(u16),
    #[error("malformed attribute stream: {0}")]
    Malformed(String),
    #[error("reply is missing its required id attribute")]
    MissingId,
    #[error("multi-attribute aggregator could not allocate its sequence")]
    AllocationFailure,
}

/// Errors raised by the transport (family resolution, socket setup, kernel
/// replies carrying an error code).
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("the \"dpll\" generic netlink family is not available: {0}")]
    FamilyUnavailable(String),
    #[error("netlink socket setup failed: {0}")]
    SocketSetup(#[source] std::io::Error),
    #[error("netlink request failed: {0}")]
    Request(String),
    #[error("kernel rejected the request with error code {0}")]
    KernelError(i32),
}

/// The flat, crate-wide error a CLI boundary maps onto an exit code.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("{0}")]
    Usage(#[from] ArgError),
    #[error("{0}")]
    Transport(#[from] TransportError),
    #[error("{0}")]
    Decode(#[from] DecodeError),
    #[error("kernel reply did not carry an id")]
    KernelMissingId,
}

impl CoreError {
    /// Process exit code per §7: everything that reaches the CLI boundary is 1;
    /// only the caller's own `-V` short-circuit and success return 0.
    pub fn exit_code(&self) -> i32 {
        1
    }
}
