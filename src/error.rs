// Error taxonomy for the library half of the crate. Every failure a
// client or store call can produce ends up here so the command layer can
// match on it (for example to tell "never logged in" apart from "the
// session file is unreadable").

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Connection, TLS or timeout failure before a response was read.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered but the envelope reports failure.
    #[error("[Eero API Error] Http Status {code}: {message}")]
    Api { code: u16, message: String },

    #[error("could not decode {endpoint} response: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{endpoint} response carried no data")]
    MissingPayload { endpoint: String },

    #[error("no session found at {location}")]
    NoSessionFound { location: String },

    #[error("session storage at {location} failed: {source}")]
    Persistence {
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not find ID in network string '{url}'")]
    MalformedNetworkReference { url: String },

    #[error("login identifier must not be empty")]
    EmptyIdentifier,
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Status code reported by the API, if this is an API-level failure.
    pub fn api_code(&self) -> Option<u16> {
        match self {
            Error::Api { code, .. } => Some(*code),
            _ => None,
        }
    }
}
