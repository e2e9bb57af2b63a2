//! Timestamp and nonce generation (RFC 5849 section 3.3).

use std::time::{SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;

use crate::{SignError, SignResult};

const NONCE_RANDOM_BYTES: usize = 24;

/// Source of the current time.
pub trait Clock {
    /// Seconds since the unix epoch, UTC.
    fn unix_timestamp(&self) -> SignResult<u64>;
}

/// Source of the random bytes put into nonces.
pub trait RandomSource {
    fn fill(&self, dest: &mut [u8]) -> SignResult<()>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn unix_timestamp(&self) -> SignResult<u64> {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .map_err(|_| SignError::Clock)
    }
}

/// Operating system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill(&self, dest: &mut [u8]) -> SignResult<()> {
        OsRng
            .try_fill_bytes(dest)
            .map_err(|e| SignError::Random(e.to_string()))
    }
}

/// A clock stopped at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub u64);

impl Clock for FixedClock {
    fn unix_timestamp(&self) -> SignResult<u64> {
        Ok(self.0)
    }
}

impl<T: Clock + ?Sized> Clock for &T {
    fn unix_timestamp(&self) -> SignResult<u64> {
        (**self).unix_timestamp()
    }
}

impl<T: RandomSource + ?Sized> RandomSource for &T {
    fn fill(&self, dest: &mut [u8]) -> SignResult<()> {
        (**self).fill(dest)
    }
}

/// Decimal unix seconds.
pub fn generate_timestamp<C: Clock>(clock: &C) -> SignResult<String> {
    Ok(clock.unix_timestamp()?.to_string())
}

/// 24 random bytes in standard base64, followed by the current timestamp.
pub fn generate_nonce<C, R>(clock: &C, random: &R) -> SignResult<String>
where
    C: Clock,
    R: RandomSource,
{
    let mut bytes = [0u8; NONCE_RANDOM_BYTES];
    random.fill(&mut bytes)?;
    Ok(BASE64.encode(bytes) + &generate_timestamp(clock)?)
}
