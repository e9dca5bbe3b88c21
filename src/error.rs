use crate::networking::peer::PeerId;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("dial failed: {0}")]
    Dial(String),

    #[error("peer {0} could not be found")]
    PeerNotFound(PeerId),

    #[error("could not connect to {peer}: {cause}")]
    Connection {
        peer: PeerId,
        #[source]
        cause: Box<Error>,
    },

    #[error("malformed message: {0}")]
    Decode(String),

    #[error("cannot encode message: {0}")]
    Encode(String),

    #[error("received an empty message but expected a public key")]
    EmptyResponse,

    #[error("stream ended before any response was received")]
    NoResponse,

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("invalid input: {0}")]
    Input(String),

    #[error("timed out while waiting to {0}")]
    Timeout(&'static str),

    #[error("stream closed by remote")]
    StreamClosed,

    #[error("no handler registered for protocol {0}")]
    UnknownProtocol(String),

    #[error("protocol {0} is already registered")]
    DuplicateProtocol(String),

    #[error("crypto error: {0}")]
    Crypto(#[from] secp256k1::Error),

    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
}

impl Error {
    /// Wraps a failure to reach `peer`, keeping the underlying cause.
    pub fn connection(peer: PeerId, cause: Error) -> Error {
        Error::Connection {
            peer,
            cause: Box::new(cause),
        }
    }
}
