use thiserror::Error;

/// Errors returned while configuring a generator or producing a code.
#[derive(Error, Debug)]
pub enum Error {
    /// Digit count outside of `6..=8`.
    #[error("invalid digit count {0}, expected a value between 6 and 8")]
    InvalidDigitCount(u8),

    #[error("time step must be a positive number of seconds")]
    InvalidTimeStep,

    #[error("secret must not be empty")]
    EmptySecret,

    /// The instant (after applying skew) lies before 1970-01-01T00:00:00Z.
    #[error("time precedes the Unix epoch")]
    PreEpochTime,

    #[error("secret is not valid RFC 4648 base32")]
    InvalidBase32,

    #[error("unknown hash algorithm: {0}")]
    UnknownAlgorithm(String),

    /// HMAC output too short for dynamic truncation.
    #[error("digest of {0} bytes is too short to truncate")]
    DigestTooShort(usize),

    #[error("crypto backend error: {0}")]
    Crypto(#[from] openssl::error::ErrorStack),
}

pub type Result<T> = std::result::Result<T, Error>;
