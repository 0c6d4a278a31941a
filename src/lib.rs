//! otpgen is a Rust library for performing the HMAC-based One-time Password Algorithm as per RFC 4226
//! and the Time-based One-time Password Algorithm as per RFC 6238.
//! These are also the algorithms many mobile-based 2FA apps, such as Google Authenticator and Authy, use to generate 2FA codes.
//!
//! ```rust
//! use otpgen::{generate_otp, Algorithm, Digits, Totp};
//!
//! // HOTP: secret, hash algorithm, counter and number of digits
//! let code = generate_otp(b"12345678901234567890", Algorithm::Sha1, 0, Digits::default()).unwrap();
//! assert_eq!(code, "755224");
//!
//! // TOTP: the counter is derived from the time, here given as seconds since the epoch
//! let totp = Totp::from_base32("GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ").unwrap();
//! assert_eq!(totp.generate_at_secs(59).unwrap(), "287082");
//! ```
extern crate base32;
extern crate byteorder;
extern crate openssl;
extern crate secrecy;
extern crate thiserror;
extern crate time;
extern crate tracing;

mod algorithm;
mod counter;
mod error;
mod hotp;
mod totp;

use base32::Alphabet::RFC4648;

pub use algorithm::Algorithm;
pub use counter::{derive_counter, derive_counter_from_secs, derive_counter_with_skew, UnixTime};
pub use error::{Error, Result};
pub use hotp::{generate_otp, truncate, Code, Digits};
pub use totp::{Totp, TotpBuilder, DEFAULT_TIME_STEP};

/// Decodes a secret (given as an RFC4648 base32-encoded ASCII string)
/// into a byte string. Case and trailing padding are ignored.
pub fn decode_secret(secret: &str) -> Result<Vec<u8>> {
    let normalized = secret.trim_end_matches('=').to_ascii_uppercase();
    match base32::decode(RFC4648 { padding: false }, &normalized) {
        Some(ref decoded) if decoded.is_empty() => Err(Error::EmptySecret),
        Some(decoded) => Ok(decoded),
        None => Err(Error::InvalidBase32),
    }
}
