//! Account reference resolution: the canonical ordering, deduplication,
//! and flag merging of every account a transaction touches.
//!
//! The resolved order defines the wire layout and the signature slot
//! indexing, so it has to be reproduced exactly:
//!
//!   1. signed + writable accounts, payer always first
//!   2. signed + read-only accounts
//!   3. unsigned + writable accounts
//!   4. unsigned + read-only accounts
//!
//! Within a tier, first-seen order among the flattened instruction
//! references is preserved. Duplicate references merge by OR-ing their
//! permission flags without moving the account from its first position.

use solwire_keys::Pubkey;

use crate::instruction::{AddressLookupTable, Instruction};

/// One account reference occurrence, before merging.
#[derive(Debug, Clone, Copy)]
struct AccountReference {
    pubkey: Pubkey,
    is_signer: bool,
    is_writable: bool,
    is_program: bool,
}

impl AccountReference {
    fn rank(&self) -> u8 {
        match (self.is_signer, self.is_writable) {
            (true, true) => 0,
            (true, false) => 1,
            (false, true) => 2,
            (false, false) => 3,
        }
    }
}

/// An account resolved into a lookup table: the account itself plus its
/// position within the table's full address list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupIndex {
    pub account: Pubkey,
    pub table_index: usize,
}

/// All accounts a message resolves through one lookup table, partitioned
/// by writability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupEntry {
    pub table: Pubkey,
    pub writable: Vec<LookupIndex>,
    pub readonly: Vec<LookupIndex>,
}

/// The resolver output: static accounts in canonical order, lookup
/// entries in first-demotion order, and the message header counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAccounts {
    static_accounts: Vec<Pubkey>,
    lookups: Vec<LookupEntry>,
    count_signed: usize,
    count_signed_readonly: usize,
    count_unsigned_readonly: usize,
}

impl ResolvedAccounts {
    /// Resolve with no lookup tables; every account stays static.
    pub fn resolve(instructions: &[Instruction], payer: &Pubkey) -> Self {
        Self::resolve_with_lookups(instructions, payer, &[])
    }

    /// Resolve against the supplied lookup tables. Unsigned accounts found
    /// in a table are removed from the static list and recorded as lookup
    /// entries; the first table containing an account wins, ties broken by
    /// table input order. The payer and all signers always stay static.
    pub fn resolve_with_lookups(
        instructions: &[Instruction],
        payer: &Pubkey,
        tables: &[AddressLookupTable],
    ) -> Self {
        let merged = merge_references(instructions, payer);

        let mut static_accounts = Vec::with_capacity(merged.len());
        let mut lookups: Vec<LookupEntry> = Vec::new();
        let mut count_signed = 0;
        let mut count_signed_readonly = 0;
        let mut count_unsigned_readonly = 0;

        for reference in &merged {
            if !reference.is_signer {
                if let Some((table, table_index)) = find_in_tables(&reference.pubkey, tables) {
                    let entry = entry_for_table(&mut lookups, table);
                    let index = LookupIndex {
                        account: reference.pubkey,
                        table_index,
                    };
                    if reference.is_writable {
                        entry.writable.push(index);
                    } else {
                        entry.readonly.push(index);
                    }
                    continue;
                }
            }

            if reference.is_signer {
                count_signed += 1;
                if !reference.is_writable {
                    count_signed_readonly += 1;
                }
            } else if !reference.is_writable {
                count_unsigned_readonly += 1;
            }
            static_accounts.push(reference.pubkey);
        }

        ResolvedAccounts {
            static_accounts,
            lookups,
            count_signed,
            count_signed_readonly,
            count_unsigned_readonly,
        }
    }

    pub fn static_accounts(&self) -> &[Pubkey] {
        &self.static_accounts
    }

    pub fn lookups(&self) -> &[LookupEntry] {
        &self.lookups
    }

    pub fn count_signed(&self) -> usize {
        self.count_signed
    }

    pub fn count_signed_readonly(&self) -> usize {
        self.count_signed_readonly
    }

    pub fn count_unsigned_readonly(&self) -> usize {
        self.count_unsigned_readonly
    }

    /// The index space instructions reference into: static accounts first,
    /// then each lookup entry's writable accounts followed by its
    /// read-only accounts, in entry order.
    pub fn flattened_accounts(&self) -> Vec<Pubkey> {
        let mut flattened = self.static_accounts.clone();
        for entry in &self.lookups {
            flattened.extend(entry.writable.iter().map(|i| i.account));
            flattened.extend(entry.readonly.iter().map(|i| i.account));
        }
        flattened
    }

    /// Position of an account in the flattened index space.
    pub fn index_of(&self, account: &Pubkey) -> Option<usize> {
        let in_static = self.static_accounts.iter().position(|a| a == account);
        if in_static.is_some() {
            return in_static;
        }

        let mut offset = self.static_accounts.len();
        for entry in &self.lookups {
            for index in entry.writable.iter().chain(entry.readonly.iter()) {
                if index.account == *account {
                    return Some(offset);
                }
                offset += 1;
            }
        }
        None
    }
}

/// Flatten, sort, and merge every reference the transaction makes.
///
/// Per instruction the declared references come first and the synthesized
/// program reference (unsigned, read-only, program) follows them; the
/// whole flattened run is then stable-sorted by (signer desc, writable
/// desc) and the payer reference is prepended unsorted. Merging keeps the
/// first occurrence position and ORs the flags.
fn merge_references(instructions: &[Instruction], payer: &Pubkey) -> Vec<AccountReference> {
    let mut references: Vec<AccountReference> = Vec::new();
    for instruction in instructions {
        for meta in &instruction.accounts {
            references.push(AccountReference {
                pubkey: meta.pubkey,
                is_signer: meta.is_signer,
                is_writable: meta.is_writable,
                is_program: false,
            });
        }
        references.push(AccountReference {
            pubkey: instruction.program,
            is_signer: false,
            is_writable: false,
            is_program: true,
        });
    }

    references.sort_by_key(AccountReference::rank);

    let payer_reference = AccountReference {
        pubkey: *payer,
        is_signer: true,
        is_writable: true,
        is_program: false,
    };

    let mut merged: Vec<AccountReference> = Vec::with_capacity(references.len() + 1);
    merged.push(payer_reference);
    for reference in references {
        match merged.iter_mut().find(|r| r.pubkey == reference.pubkey) {
            Some(existing) => {
                existing.is_signer |= reference.is_signer;
                existing.is_writable |= reference.is_writable;
                existing.is_program |= reference.is_program;
            }
            None => merged.push(reference),
        }
    }

    merged
}

fn find_in_tables<'t>(
    account: &Pubkey,
    tables: &'t [AddressLookupTable],
) -> Option<(&'t AddressLookupTable, usize)> {
    for table in tables {
        if let Some(index) = table.position_of(account) {
            return Some((table, index));
        }
    }
    None
}

fn entry_for_table<'l>(
    lookups: &'l mut Vec<LookupEntry>,
    table: &AddressLookupTable,
) -> &'l mut LookupEntry {
    let position = match lookups.iter().position(|e| e.table == table.address) {
        Some(position) => position,
        None => {
            lookups.push(LookupEntry {
                table: table.address,
                writable: Vec::new(),
                readonly: Vec::new(),
            });
            lookups.len() - 1
        }
    };
    &mut lookups[position]
}
