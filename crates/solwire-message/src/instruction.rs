//! The value types instruction builders hand to the message codec.

use solwire_keys::Pubkey;

/// A single account reference in an instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountMeta {
    pub pubkey: Pubkey,
    pub is_signer: bool,
    pub is_writable: bool,
}

impl AccountMeta {
    pub fn writable(pubkey: Pubkey, is_signer: bool) -> Self {
        AccountMeta {
            pubkey,
            is_signer,
            is_writable: true,
        }
    }

    pub fn readonly(pubkey: Pubkey, is_signer: bool) -> Self {
        AccountMeta {
            pubkey,
            is_signer,
            is_writable: false,
        }
    }
}

/// An instruction before compilation: the program to invoke, the accounts
/// it touches in declared order, and its opaque data payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub program: Pubkey,
    pub accounts: Vec<AccountMeta>,
    pub data: Vec<u8>,
}

impl Instruction {
    pub fn new(program: Pubkey, accounts: Vec<AccountMeta>, data: Vec<u8>) -> Self {
        Instruction {
            program,
            accounts,
            data,
        }
    }
}

/// The contents of an on-chain address lookup table: its own address plus
/// the full ordered list of addresses it holds. v0 messages reference
/// table entries by position in that list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressLookupTable {
    pub address: Pubkey,
    pub addresses: Vec<Pubkey>,
}

impl AddressLookupTable {
    pub fn new(address: Pubkey, addresses: Vec<Pubkey>) -> Self {
        AddressLookupTable { address, addresses }
    }

    pub(crate) fn position_of(&self, account: &Pubkey) -> Option<usize> {
        self.addresses.iter().position(|a| a == account)
    }
}
