//! Solana transaction message wire format: building, reading, signing.
//!
//! This crate serializes the compact binary message format by hand — no
//! `solana-sdk`, no tokio, no 200+ transitive dependencies. A builder
//! writes a legacy or v0 message straight into a caller-supplied buffer,
//! views parse either format back without copying payloads, and signing
//! fills 64-byte signature slots in place so the serialized size never
//! changes once a message is sealed.
//!
//! ```
//! use solwire_keys::{Blockhash, Pubkey};
//! use solwire_message::{AccountMeta, Instruction, MessageBuilder, MAX_MESSAGE_SIZE};
//!
//! # fn main() -> Result<(), solwire_message::MessageError> {
//! let payer = Pubkey::new([1u8; 32]);
//! let program = Pubkey::new([2u8; 32]);
//!
//! let mut buffer = [0u8; MAX_MESSAGE_SIZE];
//! let transaction = MessageBuilder::legacy(&mut buffer)
//!     .payer(payer)
//!     .recent_blockhash(Blockhash::new([3u8; 32]))
//!     .instruction(Instruction::new(
//!         program,
//!         vec![AccountMeta::writable(payer, true)],
//!         vec![0, 1, 2],
//!     ))
//!     .seal()?
//!     .unsigned();
//! # assert!(!transaction.is_empty());
//! # Ok(())
//! # }
//! ```

pub mod accounts;
pub mod builder;
mod cursor;
pub mod error;
pub mod instruction;
pub mod shortvec;
pub mod signing;
pub mod view;

// Re-export key public types for ergonomic imports.
pub use accounts::{LookupEntry, LookupIndex, ResolvedAccounts};
pub use builder::{LegacyMessageBuilder, MessageBuilder, SealedMessage, V0MessageBuilder};
pub use error::MessageError;
pub use instruction::{AccountMeta, AddressLookupTable, Instruction};
pub use signing::{
    sign_in_place, Ed25519Signer, SignedMessageBuilder, Signer, SIGNATURE_LENGTH,
};
pub use view::{InstructionView, LookupTableView, MessageView};

/// The largest transaction the network will accept: an IPv6 MTU of 1280
/// minus UDP and header overhead.
pub const MAX_MESSAGE_SIZE: usize = 1232;
