//! The message read path: borrowed views over a serialized transaction.
//!
//! A view parses the buffer once up front and answers questions about it
//! without copying payloads; instruction data and signatures are slices
//! into the caller's bytes. The format is sniffed from the first message
//! byte: `0x80` means v0, a clear high bit means legacy (the byte itself
//! is the signer count), anything else is unsupported.

use solwire_keys::{Blockhash, Pubkey};

use crate::cursor::BufReader;
use crate::error::MessageError;
use crate::instruction::AddressLookupTable;
use crate::signing::SIGNATURE_LENGTH;

const VERSION_MARKER_V0: u8 = 0x80;

/// A parsed transaction, either wire format.
pub enum MessageView<'a> {
    Legacy(LegacyMessageView<'a>),
    V0(V0MessageView<'a>),
}

/// One compiled instruction as it appears on the wire: indexes into the
/// flattened account list plus a borrowed data payload.
#[derive(Debug, PartialEq, Eq)]
pub struct InstructionView<'a> {
    program_index: u8,
    account_indexes: Vec<u8>,
    data: &'a [u8],
}

impl<'a> InstructionView<'a> {
    pub fn program_index(&self) -> u8 {
        self.program_index
    }

    pub fn account_indexes(&self) -> &[u8] {
        &self.account_indexes
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Resolve the program id against a flattened account list, as
    /// produced by [`MessageView::accounts`].
    pub fn program(&self, resolved: &[Pubkey]) -> Result<Pubkey, MessageError> {
        account_at(resolved, self.program_index)
    }

    /// Resolve every account reference against a flattened account list,
    /// in declared order.
    pub fn accounts(&self, resolved: &[Pubkey]) -> Result<Vec<Pubkey>, MessageError> {
        self.account_indexes
            .iter()
            .map(|&index| account_at(resolved, index))
            .collect()
    }
}

fn account_at(resolved: &[Pubkey], index: u8) -> Result<Pubkey, MessageError> {
    resolved
        .get(index as usize)
        .copied()
        .ok_or(MessageError::LookupIndexOutOfRange(index as usize))
}

/// One lookup entry as it appears on the wire. The indexes point into
/// the on-chain table's address list, which the message itself does not
/// carry.
#[derive(Debug, PartialEq, Eq)]
pub struct LookupTableView {
    table: Pubkey,
    writable_indexes: Vec<u8>,
    readonly_indexes: Vec<u8>,
}

impl LookupTableView {
    pub fn table(&self) -> &Pubkey {
        &self.table
    }

    pub fn writable_indexes(&self) -> &[u8] {
        &self.writable_indexes
    }

    pub fn readonly_indexes(&self) -> &[u8] {
        &self.readonly_indexes
    }
}

/// Fields common to both formats.
struct MessageCore<'a> {
    signatures: Vec<&'a [u8]>,
    count_signed: usize,
    count_signed_readonly: usize,
    count_unsigned_readonly: usize,
    static_accounts: Vec<Pubkey>,
    blockhash: Blockhash,
    instructions: Vec<InstructionView<'a>>,
    /// The signed span: everything after the signature block.
    message: &'a [u8],
}

pub struct LegacyMessageView<'a> {
    core: MessageCore<'a>,
}

pub struct V0MessageView<'a> {
    core: MessageCore<'a>,
    lookups: Vec<LookupTableView>,
}

impl<'a> MessageView<'a> {
    /// Parse a serialized transaction. `bytes` must start at the
    /// signature count and contain the complete transaction.
    pub fn parse(bytes: &'a [u8]) -> Result<Self, MessageError> {
        let mut reader = BufReader::new(bytes);

        let slot_count = reader.read_compact_len()?;
        let mut signatures = Vec::with_capacity(slot_count);
        for _ in 0..slot_count {
            signatures.push(reader.read_bytes(SIGNATURE_LENGTH)?);
        }
        let message_start = reader.position();

        let first = reader.read_u8()?;
        let (is_v0, count_signed) = if first == VERSION_MARKER_V0 {
            (true, reader.read_u8()? as usize)
        } else if first & 0x80 == 0 {
            (false, first as usize)
        } else {
            return Err(MessageError::UnsupportedFormat(first));
        };

        let count_signed_readonly = reader.read_u8()? as usize;
        let count_unsigned_readonly = reader.read_u8()? as usize;

        let static_count = reader.read_compact_len()?;
        let mut static_accounts = Vec::with_capacity(static_count);
        for _ in 0..static_count {
            static_accounts.push(reader.read_pubkey()?);
        }

        let blockhash = reader.read_blockhash()?;

        let instruction_count = reader.read_compact_len()?;
        let mut instructions = Vec::with_capacity(instruction_count);
        for _ in 0..instruction_count {
            let program_index = reader.read_u8()?;

            let index_count = reader.read_compact_len()?;
            let account_indexes = reader.read_bytes(index_count)?.to_vec();

            let data_len = reader.read_compact_len()?;
            let data = reader.read_bytes(data_len)?;

            instructions.push(InstructionView {
                program_index,
                account_indexes,
                data,
            });
        }

        let lookups = if is_v0 {
            let entry_count = reader.read_compact_len()?;
            let mut lookups = Vec::with_capacity(entry_count);
            for _ in 0..entry_count {
                let table = reader.read_pubkey()?;

                let writable_count = reader.read_compact_len()?;
                let writable_indexes = reader.read_bytes(writable_count)?.to_vec();

                let readonly_count = reader.read_compact_len()?;
                let readonly_indexes = reader.read_bytes(readonly_count)?.to_vec();

                lookups.push(LookupTableView {
                    table,
                    writable_indexes,
                    readonly_indexes,
                });
            }
            lookups
        } else {
            Vec::new()
        };

        let core = MessageCore {
            signatures,
            count_signed,
            count_signed_readonly,
            count_unsigned_readonly,
            static_accounts,
            blockhash,
            instructions,
            message: &bytes[message_start..reader.position()],
        };

        Ok(if is_v0 {
            MessageView::V0(V0MessageView { core, lookups })
        } else {
            MessageView::Legacy(LegacyMessageView { core })
        })
    }

    fn core(&self) -> &MessageCore<'a> {
        match self {
            MessageView::Legacy(view) => &view.core,
            MessageView::V0(view) => &view.core,
        }
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, MessageView::Legacy(_))
    }

    pub fn count_signed(&self) -> usize {
        self.core().count_signed
    }

    pub fn count_signed_readonly(&self) -> usize {
        self.core().count_signed_readonly
    }

    pub fn count_unsigned_readonly(&self) -> usize {
        self.core().count_unsigned_readonly
    }

    /// The signature slots in signer order. Unsigned slots hold whatever
    /// bytes the buffer carried.
    pub fn signatures(&self) -> &[&'a [u8]] {
        &self.core().signatures
    }

    pub fn static_accounts(&self) -> &[Pubkey] {
        &self.core().static_accounts
    }

    pub fn blockhash(&self) -> &Blockhash {
        &self.core().blockhash
    }

    pub fn instructions(&self) -> &[InstructionView<'a>] {
        &self.core().instructions
    }

    /// The signed span of the transaction, suitable for signature
    /// verification.
    pub fn message_bytes(&self) -> &'a [u8] {
        self.core().message
    }

    /// The fee payer: always the first static account.
    pub fn fee_payer(&self) -> Result<Pubkey, MessageError> {
        self.core()
            .static_accounts
            .first()
            .copied()
            .ok_or_else(|| MessageError::Decode("message has no accounts".into()))
    }

    pub fn is_signer(&self, account: &Pubkey) -> bool {
        self.signer_index(account).is_some()
    }

    /// The accounts whose signatures the message requires, in slot order.
    pub fn signers(&self) -> &[Pubkey] {
        let core = self.core();
        &core.static_accounts[..core.count_signed.min(core.static_accounts.len())]
    }

    /// The signature slot belonging to `account`.
    pub fn signature_for(&self, account: &Pubkey) -> Result<&'a [u8], MessageError> {
        let index = self
            .signer_index(account)
            .ok_or(MessageError::AccountNotFound(*account))?;
        Ok(self.core().signatures[index])
    }

    fn signer_index(&self, account: &Pubkey) -> Option<usize> {
        self.signers().iter().position(|a| a == account)
    }

    /// Whether the message marks `account` writable. For v0 messages the
    /// on-chain `tables` are needed to classify accounts loaded through
    /// lookups; legacy messages ignore them.
    pub fn is_writable(
        &self,
        account: &Pubkey,
        tables: &[AddressLookupTable],
    ) -> Result<bool, MessageError> {
        let core = self.core();
        if let Some(index) = core.static_accounts.iter().position(|a| a == account) {
            return Ok(core.is_static_writable(index));
        }
        match self {
            MessageView::Legacy(_) => Ok(false),
            MessageView::V0(view) => view.is_lookup_writable(account, tables),
        }
    }

    /// The flattened account list instruction indexes point into. Legacy
    /// messages need no tables; v0 messages resolve their lookup entries
    /// against `tables`.
    pub fn accounts(&self, tables: &[AddressLookupTable]) -> Result<Vec<Pubkey>, MessageError> {
        let mut accounts = self.core().static_accounts.clone();
        if let MessageView::V0(view) = self {
            for lookup in &view.lookups {
                let table = find_table(tables, &lookup.table)?;
                for &index in lookup
                    .writable_indexes
                    .iter()
                    .chain(&lookup.readonly_indexes)
                {
                    accounts.push(resolve_entry(table, index)?);
                }
            }
        }
        Ok(accounts)
    }
}

impl MessageCore<'_> {
    /// Static-table writability falls out of the header counts: writable
    /// signers come first, then read-only signers, then writable
    /// non-signers, then read-only non-signers.
    fn is_static_writable(&self, index: usize) -> bool {
        let len = self.static_accounts.len();
        index < self.count_signed.saturating_sub(self.count_signed_readonly)
            || (index >= self.count_signed
                && index < len.saturating_sub(self.count_unsigned_readonly))
    }
}

impl<'a> V0MessageView<'a> {
    pub fn lookup_tables(&self) -> &[LookupTableView] {
        &self.lookups
    }

    fn is_lookup_writable(
        &self,
        account: &Pubkey,
        tables: &[AddressLookupTable],
    ) -> Result<bool, MessageError> {
        for lookup in &self.lookups {
            let table = find_table(tables, &lookup.table)?;
            for &index in &lookup.writable_indexes {
                if resolve_entry(table, index)? == *account {
                    return Ok(true);
                }
            }
            for &index in &lookup.readonly_indexes {
                if resolve_entry(table, index)? == *account {
                    return Ok(false);
                }
            }
        }
        Ok(false)
    }
}

fn find_table<'t>(
    tables: &'t [AddressLookupTable],
    address: &Pubkey,
) -> Result<&'t AddressLookupTable, MessageError> {
    tables
        .iter()
        .find(|t| t.address == *address)
        .ok_or(MessageError::AccountNotFound(*address))
}

fn resolve_entry(table: &AddressLookupTable, index: u8) -> Result<Pubkey, MessageError> {
    table
        .addresses
        .get(index as usize)
        .copied()
        .ok_or(MessageError::LookupIndexOutOfRange(index as usize))
}
