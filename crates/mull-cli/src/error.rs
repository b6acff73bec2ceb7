use mull_net::NetError;
use mull_shared::{Action, RelayError};
use mull_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Relay(#[from] RelayError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Net(#[from] NetError),

    #[error("A relay is already active ({0}), deactivate it first with `mull down`")]
    AlreadyActive(String),

    #[error("No active relays detected")]
    NoActiveRelay,

    #[error("No relay specified and no favorites available, provide a relay hostname")]
    NoRelaySpecified,

    #[error("wg-quick {action} {relay} failed with code {code}\n{output}")]
    ActivationFailed {
        action: Action,
        relay: String,
        code: i32,
        output: String,
    },

    #[error("External tool error: {0}")]
    ExternalTool(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// The domain error underneath, if any.
    fn relay_error(&self) -> Option<&RelayError> {
        match self {
            CliError::Relay(e) | CliError::Store(StoreError::Relay(e)) => Some(e),
            _ => None,
        }
    }

    /// Process exit status: 2 for mistakes in the arguments, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        match self.relay_error() {
            Some(
                RelayError::InvalidFormat(_)
                | RelayError::IndexOutOfRange { .. }
                | RelayError::AlreadyExists(_)
                | RelayError::NotFound(_)
                | RelayError::EmptyQuery,
            ) => 2,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, CliError>;
