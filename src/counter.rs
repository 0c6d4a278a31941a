//! Mapping of wall-clock time onto the HOTP moving factor (RFC 6238, section 4.2).

use std::convert::TryFrom;
use std::num::NonZeroU64;
use std::time::{SystemTime, UNIX_EPOCH};

use time::OffsetDateTime;

use crate::error::{Error, Result};

/// A point in time that can be expressed as seconds relative to the Unix epoch.
pub trait UnixTime {
    /// Whole seconds since 1970-01-01T00:00:00Z, rounded towards negative
    /// infinity. Instants before the epoch are negative.
    fn unix_seconds(&self) -> i64;
}

impl UnixTime for OffsetDateTime {
    fn unix_seconds(&self) -> i64 {
        self.unix_timestamp()
    }
}

impl UnixTime for SystemTime {
    fn unix_seconds(&self) -> i64 {
        match self.duration_since(UNIX_EPOCH) {
            Ok(elapsed) => i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX),
            Err(err) => {
                let before = err.duration();
                let secs = i64::try_from(before.as_secs()).unwrap_or(i64::MAX);
                if before.subsec_nanos() > 0 {
                    -secs - 1
                } else {
                    -secs
                }
            }
        }
    }
}

impl<'a, T: UnixTime + ?Sized> UnixTime for &'a T {
    fn unix_seconds(&self) -> i64 {
        (**self).unix_seconds()
    }
}

/// Counter for a number of seconds already known to be at or after the epoch.
pub fn derive_counter_from_secs(secs: u64, time_step: NonZeroU64) -> u64 {
    secs / time_step.get()
}

/// Counter for `instant`, failing with `Error::PreEpochTime` for instants
/// before the Unix epoch.
pub fn derive_counter<T: UnixTime>(instant: T, time_step: NonZeroU64) -> Result<u64> {
    derive_counter_with_skew(instant, time_step, 0)
}

/// Like `derive_counter`, but shifts the instant by `skew` seconds first.
/// The shifted time must still be at or after the epoch.
pub fn derive_counter_with_skew<T: UnixTime>(
    instant: T,
    time_step: NonZeroU64,
    skew: i64,
) -> Result<u64> {
    let secs = apply_skew(i128::from(instant.unix_seconds()), skew)?;
    Ok(derive_counter_from_secs(secs, time_step))
}

pub(crate) fn apply_skew(secs: i128, skew: i64) -> Result<u64> {
    u64::try_from(secs + i128::from(skew)).map_err(|_| Error::PreEpochTime)
}
