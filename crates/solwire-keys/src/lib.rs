//! Key and address primitives for the Solana wire format.
//!
//! This crate holds the 32-byte value types the message codec is built on
//! (`Pubkey`, `Blockhash`) plus program derived address (PDA) derivation.
//! Addresses are Base58-encoded raw bytes; PDA derivation is an iterative
//! SHA-256 hash-and-curve-check search using `curve25519-dalek`.

pub mod blockhash;
pub mod error;
pub mod pda;
pub mod pubkey;

pub use blockhash::{Blockhash, BLOCKHASH_LENGTH};
pub use error::KeyError;
pub use pda::{derive_program_address, find_program_address, is_on_curve, ProgramDerivedAddress};
pub use pubkey::{system_program, Pubkey, PUBKEY_LENGTH};
