//! Time-based One-time Password generation as per RFC 6238.

use std::fmt;
use std::num::NonZeroU64;

use secrecy::{ExposeSecret, SecretVec};
use time::OffsetDateTime;
use tracing::{debug, trace};

use crate::algorithm::Algorithm;
use crate::counter::{self, UnixTime};
use crate::error::{Error, Result};
use crate::hotp::{generate_otp, Code, Digits};

/// Default time step in seconds, as used by Google Authenticator and most apps.
pub const DEFAULT_TIME_STEP: u64 = 30;

/// An immutable TOTP generator configuration.
///
/// Every method takes `&self`, so a single `Totp` can be shared between
/// threads freely.
///
/// ```rust
/// use otpgen::{Algorithm, Totp};
///
/// let totp = Totp::new(b"12345678901234567890".to_vec(), 8, 30, Algorithm::Sha1).unwrap();
/// assert_eq!(totp.generate_at_secs(59).unwrap(), "94287082");
/// ```
pub struct Totp {
    secret: SecretVec<u8>,
    digits: Digits,
    time_step: NonZeroU64,
    algorithm: Algorithm,
    skew: i64,
}

impl Totp {
    /// Creates a generator, rejecting a digit count outside `6..=8`, a zero
    /// time step, or an empty secret.
    pub fn new(secret: Vec<u8>, digits: u8, time_step: u64, algorithm: Algorithm) -> Result<Self> {
        Totp::builder(secret)
            .digits(digits)
            .time_step(time_step)
            .algorithm(algorithm)
            .build()
    }

    /// 6 digits, a 30 second step and SHA-1.
    pub fn with_defaults(secret: Vec<u8>) -> Result<Self> {
        Totp::builder(secret).build()
    }

    /// Creates a default generator from an RFC 4648 base32 encoded secret.
    pub fn from_base32(secret: &str) -> Result<Self> {
        Totp::with_defaults(crate::decode_secret(secret)?)
    }

    pub fn builder(secret: Vec<u8>) -> TotpBuilder {
        TotpBuilder {
            secret: SecretVec::new(secret),
            digits: Digits::default().get(),
            time_step: DEFAULT_TIME_STEP,
            algorithm: Algorithm::default(),
            skew: 0,
        }
    }

    pub fn digits(&self) -> u8 {
        self.digits.get()
    }

    pub fn time_step(&self) -> u64 {
        self.time_step.get()
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Offset in seconds applied to every instant before deriving the counter.
    pub fn skew(&self) -> i64 {
        self.skew
    }

    /// The counter `generate` would use for `instant`.
    pub fn counter_at<T: UnixTime>(&self, instant: T) -> Result<u64> {
        counter::derive_counter_with_skew(instant, self.time_step, self.skew)
    }

    /// Generates the code for `instant`. Instants before the Unix epoch are
    /// rejected with `Error::PreEpochTime`.
    pub fn generate<T: UnixTime>(&self, instant: T) -> Result<Code> {
        let counter = self.counter_at(instant)?;
        self.generate_counter(counter)
    }

    /// Generates the code for a number of seconds since the Unix epoch.
    ///
    /// Only a negative skew larger than `secs` can make this fail.
    pub fn generate_at_secs(&self, secs: u64) -> Result<Code> {
        let shifted = counter::apply_skew(i128::from(secs), self.skew)?;
        self.generate_counter(counter::derive_counter_from_secs(shifted, self.time_step))
    }

    /// Generates the code for the current system time.
    pub fn generate_current(&self) -> Result<Code> {
        self.generate(OffsetDateTime::now_utc())
    }

    /// HOTP with this generator's secret, algorithm and digit count.
    pub fn generate_counter(&self, counter: u64) -> Result<Code> {
        trace!(counter, algorithm = %self.algorithm, "generating code");
        generate_otp(
            self.secret.expose_secret(),
            self.algorithm,
            counter,
            self.digits,
        )
    }
}

impl fmt::Debug for Totp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Totp")
            .field("secret", &"[REDACTED]")
            .field("digits", &self.digits.get())
            .field("time_step", &self.time_step.get())
            .field("algorithm", &self.algorithm)
            .field("skew", &self.skew)
            .finish()
    }
}

/// Builder for `Totp`; validation happens in `build`.
pub struct TotpBuilder {
    secret: SecretVec<u8>,
    digits: u8,
    time_step: u64,
    algorithm: Algorithm,
    skew: i64,
}

impl TotpBuilder {
    pub fn digits(mut self, digits: u8) -> Self {
        self.digits = digits;
        self
    }

    pub fn time_step(mut self, time_step: u64) -> Self {
        self.time_step = time_step;
        self
    }

    pub fn algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Seconds added to every instant, to compensate for clock drift or to
    /// compute codes for neighbouring intervals.
    pub fn skew(mut self, skew: i64) -> Self {
        self.skew = skew;
        self
    }

    pub fn build(self) -> Result<Totp> {
        let digits = Digits::new(self.digits)?;
        let time_step = NonZeroU64::new(self.time_step).ok_or(Error::InvalidTimeStep)?;
        let secret_len = self.secret.expose_secret().len();
        if secret_len == 0 {
            return Err(Error::EmptySecret);
        }
        debug!(
            digits = digits.get(),
            time_step = time_step.get(),
            algorithm = %self.algorithm,
            skew = self.skew,
            secret_len,
            "configured TOTP generator"
        );
        Ok(Totp {
            secret: self.secret,
            digits,
            time_step,
            algorithm: self.algorithm,
            skew: self.skew,
        })
    }
}

impl fmt::Debug for TotpBuilder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("TotpBuilder")
            .field("secret", &"[REDACTED]")
            .field("digits", &self.digits)
            .field("time_step", &self.time_step)
            .field("algorithm", &self.algorithm)
            .field("skew", &self.skew)
            .finish()
    }
}
