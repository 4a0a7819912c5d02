//! The 32-byte account/program key type.
//!
//! Solana addresses are Base58-encoded 32-byte Ed25519 public keys. There
//! is no hashing step — the public key bytes ARE the address bytes, so the
//! text form is just a Base58 round-trip.

use std::fmt;
use std::str::FromStr;

use crate::error::KeyError;

/// Length in bytes of a public key / account address.
pub const PUBKEY_LENGTH: usize = 32;

/// A 32-byte public key identifying an account or program.
///
/// Equality is byte-wise; a `Pubkey` has no identity beyond its bytes.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pubkey([u8; PUBKEY_LENGTH]);

impl Pubkey {
    pub const fn new(bytes: [u8; PUBKEY_LENGTH]) -> Self {
        Pubkey(bytes)
    }

    /// Decode a Base58 address string into a `Pubkey`.
    ///
    /// Fails unless the string decodes to exactly 32 bytes.
    pub fn from_base58(address: &str) -> Result<Self, KeyError> {
        let bytes = bs58::decode(address)
            .into_vec()
            .map_err(|e| KeyError::InvalidAddress(format!("base58 decode failed: {e}")))?;

        let arr: [u8; PUBKEY_LENGTH] = bytes.try_into().map_err(|v: Vec<u8>| {
            KeyError::InvalidAddress(format!("expected 32 bytes, got {}", v.len()))
        })?;

        Ok(Pubkey(arr))
    }

    pub fn as_bytes(&self) -> &[u8; PUBKEY_LENGTH] {
        &self.0
    }

    pub fn to_bytes(self) -> [u8; PUBKEY_LENGTH] {
        self.0
    }
}

impl From<[u8; PUBKEY_LENGTH]> for Pubkey {
    fn from(bytes: [u8; PUBKEY_LENGTH]) -> Self {
        Pubkey(bytes)
    }
}

impl FromStr for Pubkey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Pubkey::from_base58(s)
    }
}

impl fmt::Display for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", bs58::encode(&self.0).into_string())
    }
}

impl fmt::Debug for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pubkey({self})")
    }
}

/// The System Program.
pub mod system_program {
    use super::Pubkey;

    /// `11111111111111111111111111111111` — 32 zero bytes.
    pub const ID: Pubkey = Pubkey::new([0u8; 32]);
}
