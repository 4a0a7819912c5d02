//! The 32-byte recent-blockhash value embedded in every message.

use std::fmt;
use std::str::FromStr;

use crate::error::KeyError;

/// Length in bytes of a blockhash.
pub const BLOCKHASH_LENGTH: usize = 32;

/// A recent-ledger reference used as a freshness/replay-window token.
///
/// When a durable nonce is in play the same field carries the nonce value;
/// either way it is an opaque 32-byte quantity to the wire format.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Blockhash([u8; BLOCKHASH_LENGTH]);

impl Blockhash {
    pub const fn new(bytes: [u8; BLOCKHASH_LENGTH]) -> Self {
        Blockhash(bytes)
    }

    pub fn from_base58(s: &str) -> Result<Self, KeyError> {
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|e| KeyError::InvalidBlockhash(format!("base58 decode failed: {e}")))?;

        let arr: [u8; BLOCKHASH_LENGTH] = bytes.try_into().map_err(|v: Vec<u8>| {
            KeyError::InvalidBlockhash(format!("expected 32 bytes, got {}", v.len()))
        })?;

        Ok(Blockhash(arr))
    }

    pub fn as_bytes(&self) -> &[u8; BLOCKHASH_LENGTH] {
        &self.0
    }

    pub fn to_bytes(self) -> [u8; BLOCKHASH_LENGTH] {
        self.0
    }
}

impl From<[u8; BLOCKHASH_LENGTH]> for Blockhash {
    fn from(bytes: [u8; BLOCKHASH_LENGTH]) -> Self {
        Blockhash(bytes)
    }
}

impl FromStr for Blockhash {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Blockhash::from_base58(s)
    }
}

impl fmt::Display for Blockhash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", bs58::encode(&self.0).into_string())
    }
}

impl fmt::Debug for Blockhash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Blockhash({self})")
    }
}
