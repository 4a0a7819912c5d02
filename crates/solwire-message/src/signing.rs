//! In-place partial signing of a serialized transaction.
//!
//! Signatures live in fixed 64-byte slots in front of the message body,
//! so signing never moves bytes: each signer's slot is located by parsing
//! the serialized buffer, then overwritten. Signers can be applied in any
//! order, across processes, or not at all.

use ed25519_dalek::SigningKey;
use solwire_keys::Pubkey;
use zeroize::Zeroize;

use crate::cursor::BufReader;
use crate::error::MessageError;

/// An Ed25519 signature is always 64 bytes on the wire.
pub const SIGNATURE_LENGTH: usize = 64;

const VERSION_MARKER_V0: u8 = 0x80;

/// Anything that can produce a signature over the message body. The
/// message bytes are exactly what a verifier checks the signature
/// against: everything after the signature block.
pub trait Signer {
    fn sign(&self, message: &[u8], signature: &mut [u8; SIGNATURE_LENGTH]);
}

impl<F> Signer for F
where
    F: Fn(&[u8], &mut [u8; SIGNATURE_LENGTH]),
{
    fn sign(&self, message: &[u8], signature: &mut [u8; SIGNATURE_LENGTH]) {
        self(message, signature)
    }
}

/// A local Ed25519 keypair.
pub struct Ed25519Signer {
    key: SigningKey,
}

impl Ed25519Signer {
    /// Build from a 32-byte seed. The working copy of the seed is wiped
    /// once the key is derived.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let mut bytes = *seed;
        let key = SigningKey::from_bytes(&bytes);
        bytes.zeroize();
        Ed25519Signer { key }
    }

    pub fn pubkey(&self) -> Pubkey {
        Pubkey::new(self.key.verifying_key().to_bytes())
    }
}

impl Signer for Ed25519Signer {
    fn sign(&self, message: &[u8], signature: &mut [u8; SIGNATURE_LENGTH]) {
        use ed25519_dalek::Signer as _;
        signature.copy_from_slice(&self.key.sign(message).to_bytes());
    }
}

/// Fluent signing over a sealed transaction buffer.
pub struct SignedMessageBuilder<'a> {
    buffer: &'a mut [u8],
    len: usize,
}

impl<'a> SignedMessageBuilder<'a> {
    pub(crate) fn new(buffer: &'a mut [u8], len: usize) -> Self {
        SignedMessageBuilder { buffer, len }
    }

    /// Fill in `account`'s signature slot. Fails with `SignerNotFound`
    /// when the account is not one of the message's signers.
    pub fn by(self, account: &Pubkey, signer: &impl Signer) -> Result<Self, MessageError> {
        sign_in_place(&mut self.buffer[..self.len], account, signer)?;
        Ok(self)
    }

    /// The finished transaction bytes. Slots nobody signed keep whatever
    /// the buffer held before sealing.
    pub fn build(self) -> &'a [u8] {
        &self.buffer[..self.len]
    }
}

/// Sign a serialized transaction in place, independent of any builder.
/// `buffer` must hold exactly the transaction bytes.
pub fn sign_in_place(
    buffer: &mut [u8],
    account: &Pubkey,
    signer: &impl Signer,
) -> Result<(), MessageError> {
    let slot = locate_signer_slot(buffer, account)?;

    let mut signature = [0u8; SIGNATURE_LENGTH];
    signer.sign(&buffer[slot.message_start..], &mut signature);
    buffer[slot.offset..slot.offset + SIGNATURE_LENGTH].copy_from_slice(&signature);
    Ok(())
}

struct SignerSlot {
    /// Byte offset of the 64-byte slot within the transaction.
    offset: usize,
    /// Where the message body (the signed bytes) begins.
    message_start: usize,
}

/// Parse just enough of the serialized transaction to map `account` to
/// its signature slot: the slot count, the header counts, and the leading
/// signer accounts of the static table.
fn locate_signer_slot(buffer: &[u8], account: &Pubkey) -> Result<SignerSlot, MessageError> {
    let mut reader = BufReader::new(buffer);

    let slot_count = reader.read_compact_len()?;
    let slots_start = reader.position();
    reader.read_bytes(slot_count * SIGNATURE_LENGTH)?;
    let message_start = reader.position();

    let first = reader.read_u8()?;
    let count_signed = if first == VERSION_MARKER_V0 {
        reader.read_u8()? as usize
    } else if first & 0x80 == 0 {
        first as usize
    } else {
        return Err(MessageError::UnsupportedFormat(first));
    };
    if count_signed != slot_count {
        return Err(MessageError::Decode(format!(
            "message declares {count_signed} signers but carries {slot_count} signature slots"
        )));
    }

    // Skip the two read-only counts to reach the static account table.
    reader.read_u8()?;
    reader.read_u8()?;

    let static_count = reader.read_compact_len()?;
    if count_signed > static_count {
        return Err(MessageError::Decode(format!(
            "message declares {count_signed} signers but only {static_count} static accounts"
        )));
    }

    // Signers occupy the front of the static table, one slot each, in
    // table order.
    for index in 0..count_signed {
        if reader.read_pubkey()? == *account {
            return Ok(SignerSlot {
                offset: slots_start + index * SIGNATURE_LENGTH,
                message_start,
            });
        }
    }

    Err(MessageError::SignerNotFound(*account))
}
