//! The message write path: a staged builder over a caller-supplied buffer.
//!
//! Wire layout, signatures first:
//!
//! ```text
//! Transaction:
//!   num_signatures          compact length
//!   signature slots         64 bytes each (reserved, not zeroed)
//!   message:
//!     [v0 only] 0x80 version marker
//!     num_signed            u8   (doubles as the first message byte for
//!                                 legacy, so its high bit must be clear)
//!     num_signed_readonly   u8
//!     num_unsigned_readonly u8
//!     static accounts       compact length, 32 bytes each
//!     recent_blockhash      32 bytes
//!     instructions          compact length, then per instruction:
//!       program index       u8
//!       account indexes     compact length, u8 each
//!       data                compact length, raw bytes
//!     [v0 only] lookups     compact length, then per entry:
//!       table address       32 bytes
//!       writable indexes    compact length, u8 each
//!       readonly indexes    compact length, u8 each
//! ```
//!
//! `seal()` resolves accounts and writes this layout once; everything
//! after that only overwrites signature slots, so the buffer size is
//! stable through signing.

use solwire_keys::{Blockhash, Pubkey};

use crate::accounts::ResolvedAccounts;
use crate::cursor::BufWriter;
use crate::error::MessageError;
use crate::instruction::{AddressLookupTable, Instruction};
use crate::signing::{SignedMessageBuilder, SIGNATURE_LENGTH};

/// Entry point selecting the wire format.
pub struct MessageBuilder;

impl MessageBuilder {
    /// Build a legacy message (static accounts only) into `buffer`.
    pub fn legacy(buffer: &mut [u8]) -> LegacyMessageBuilder<'_> {
        LegacyMessageBuilder {
            buffer,
            payer: None,
            blockhash: None,
            instructions: Vec::new(),
        }
    }

    /// Build a v0 message (address lookup tables allowed) into `buffer`.
    pub fn v0(buffer: &mut [u8]) -> V0MessageBuilder<'_> {
        V0MessageBuilder {
            buffer,
            payer: None,
            blockhash: None,
            instructions: Vec::new(),
            lookup_tables: Vec::new(),
        }
    }
}

/// Builder for the legacy wire format.
pub struct LegacyMessageBuilder<'a> {
    buffer: &'a mut [u8],
    payer: Option<Pubkey>,
    blockhash: Option<Blockhash>,
    instructions: Vec<Instruction>,
}

impl<'a> LegacyMessageBuilder<'a> {
    pub fn payer(mut self, payer: Pubkey) -> Self {
        self.payer = Some(payer);
        self
    }

    pub fn recent_blockhash(mut self, blockhash: Blockhash) -> Self {
        self.blockhash = Some(blockhash);
        self
    }

    pub fn instruction(mut self, instruction: Instruction) -> Self {
        self.instructions.push(instruction);
        self
    }

    /// Resolve accounts and write the full layout. The builder is spent;
    /// only signature slots may change afterwards.
    pub fn seal(self) -> Result<SealedMessage<'a>, MessageError> {
        let payer = require_payer(self.payer)?;
        let blockhash = require_blockhash(self.blockhash)?;

        let resolved = ResolvedAccounts::resolve(&self.instructions, &payer);
        let len = write_message(
            self.buffer,
            MessageFormat::Legacy,
            &resolved,
            &blockhash,
            &self.instructions,
        )?;

        Ok(SealedMessage {
            buffer: self.buffer,
            len,
        })
    }
}

/// Builder for the v0 wire format.
pub struct V0MessageBuilder<'a> {
    buffer: &'a mut [u8],
    payer: Option<Pubkey>,
    blockhash: Option<Blockhash>,
    instructions: Vec<Instruction>,
    lookup_tables: Vec<AddressLookupTable>,
}

impl<'a> V0MessageBuilder<'a> {
    pub fn payer(mut self, payer: Pubkey) -> Self {
        self.payer = Some(payer);
        self
    }

    pub fn recent_blockhash(mut self, blockhash: Blockhash) -> Self {
        self.blockhash = Some(blockhash);
        self
    }

    pub fn instruction(mut self, instruction: Instruction) -> Self {
        self.instructions.push(instruction);
        self
    }

    /// Supply the lookup tables eligible accounts may resolve through.
    pub fn lookup_tables(mut self, tables: Vec<AddressLookupTable>) -> Self {
        self.lookup_tables = tables;
        self
    }

    pub fn seal(self) -> Result<SealedMessage<'a>, MessageError> {
        let payer = require_payer(self.payer)?;
        let blockhash = require_blockhash(self.blockhash)?;

        let resolved =
            ResolvedAccounts::resolve_with_lookups(&self.instructions, &payer, &self.lookup_tables);
        let len = write_message(
            self.buffer,
            MessageFormat::V0,
            &resolved,
            &blockhash,
            &self.instructions,
        )?;

        Ok(SealedMessage {
            buffer: self.buffer,
            len,
        })
    }
}

fn require_payer(payer: Option<Pubkey>) -> Result<Pubkey, MessageError> {
    payer.ok_or_else(|| MessageError::Incomplete("payer has not been specified".into()))
}

fn require_blockhash(blockhash: Option<Blockhash>) -> Result<Blockhash, MessageError> {
    blockhash
        .ok_or_else(|| MessageError::Incomplete("recent blockhash has not been specified".into()))
}

/// A fully serialized message whose signature slots are still open.
pub struct SealedMessage<'a> {
    buffer: &'a mut [u8],
    len: usize,
}

impl<'a> SealedMessage<'a> {
    /// Serialized length within the caller's buffer.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn bytes(&self) -> &[u8] {
        &self.buffer[..self.len]
    }

    /// Hand the transaction out without any signatures filled in.
    pub fn unsigned(self) -> &'a [u8] {
        &self.buffer[..self.len]
    }

    /// Move to signing; slots are filled in place, size never changes.
    pub fn signed(self) -> SignedMessageBuilder<'a> {
        SignedMessageBuilder::new(self.buffer, self.len)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum MessageFormat {
    Legacy,
    V0,
}

/// The v0 version marker; also the bit that must stay clear in the first
/// byte of a legacy message.
const VERSION_MARKER_V0: u8 = 0x80;

fn write_message(
    buffer: &mut [u8],
    format: MessageFormat,
    resolved: &ResolvedAccounts,
    blockhash: &Blockhash,
    instructions: &[Instruction],
) -> Result<usize, MessageError> {
    let count_signed = resolved.count_signed();

    let mut writer = BufWriter::new(buffer);

    // Signature block: count, then one 64-byte slot per signer. Slots are
    // skipped, not written; the caller's existing bytes stay put until a
    // signer fills them.
    writer.put_compact(count_signed as u64)?;
    writer.skip(count_signed * SIGNATURE_LENGTH)?;

    match format {
        MessageFormat::Legacy => {
            if count_signed > 0x7f {
                return Err(MessageError::Encode(format!(
                    "legacy message cannot hold {count_signed} signers (high bit must stay clear)"
                )));
            }
            writer.put_u8(count_signed as u8)?;
        }
        MessageFormat::V0 => {
            let count = u8::try_from(count_signed).map_err(|_| {
                MessageError::Encode(format!("{count_signed} signers exceed the one-byte count"))
            })?;
            writer.put_u8(VERSION_MARKER_V0)?;
            writer.put_u8(count)?;
        }
    }
    writer.put_u8(checked_count(resolved.count_signed_readonly())?)?;
    writer.put_u8(checked_count(resolved.count_unsigned_readonly())?)?;

    let statics = resolved.static_accounts();
    writer.put_compact(statics.len() as u64)?;
    for account in statics {
        writer.put_pubkey(account)?;
    }

    writer.put_bytes(blockhash.as_bytes())?;

    writer.put_compact(instructions.len() as u64)?;
    for instruction in instructions {
        writer.put_u8(account_index(resolved, &instruction.program)?)?;

        writer.put_compact(instruction.accounts.len() as u64)?;
        for meta in &instruction.accounts {
            writer.put_u8(account_index(resolved, &meta.pubkey)?)?;
        }

        writer.put_compact(instruction.data.len() as u64)?;
        writer.put_bytes(&instruction.data)?;
    }

    if format == MessageFormat::V0 {
        let lookups = resolved.lookups();
        writer.put_compact(lookups.len() as u64)?;
        for entry in lookups {
            writer.put_pubkey(&entry.table)?;

            writer.put_compact(entry.writable.len() as u64)?;
            for index in &entry.writable {
                writer.put_u8(table_index(index.table_index)?)?;
            }

            writer.put_compact(entry.readonly.len() as u64)?;
            for index in &entry.readonly {
                writer.put_u8(table_index(index.table_index)?)?;
            }
        }
    }

    Ok(writer.position())
}

fn checked_count(count: usize) -> Result<u8, MessageError> {
    u8::try_from(count)
        .map_err(|_| MessageError::Encode(format!("account count {count} exceeds one byte")))
}

fn account_index(resolved: &ResolvedAccounts, account: &Pubkey) -> Result<u8, MessageError> {
    let index = resolved
        .index_of(account)
        .ok_or_else(|| MessageError::Encode(format!("account {account} missing from the table")))?;
    u8::try_from(index)
        .map_err(|_| MessageError::Encode(format!("account index {index} exceeds one byte")))
}

fn table_index(index: usize) -> Result<u8, MessageError> {
    u8::try_from(index)
        .map_err(|_| MessageError::Encode(format!("lookup table index {index} exceeds one byte")))
}
