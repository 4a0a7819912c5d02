//! Program Derived Address (PDA) derivation.
//!
//! A PDA is an address deterministically derived from a program id and a
//! list of seed byte strings. The derivation searches bump seeds from 255
//! downward, computing
//! `SHA-256(seed_0 || ... || seed_n || bump || program_id || "ProgramDerivedAddress")`
//! and returning the first digest that is NOT a valid Ed25519 curve point.
//! Being off the curve guarantees no private key can exist for the address.

use sha2::{Digest, Sha256};

use crate::error::KeyError;
use crate::pubkey::Pubkey;

/// The domain-separation string appended to every PDA hash input.
const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";

/// A derived address together with the bump seed that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramDerivedAddress {
    pub address: Pubkey,
    pub bump: u8,
}

/// Find the program derived address for the given seeds and program.
///
/// Tries bump seeds 255 down to 1, returning the first off-curve result.
/// Exhausting every bump without an off-curve hit fails with
/// [`KeyError::BumpSeedNotFound`]; no real-world input is known to do so.
pub fn find_program_address(
    seeds: &[&[u8]],
    program_id: &Pubkey,
) -> Result<ProgramDerivedAddress, KeyError> {
    // Bump 0 is never tried; the search space is 255..=1.
    for bump in (1u8..=255).rev() {
        if let Some(address) = try_program_address(seeds, bump, program_id) {
            return Ok(ProgramDerivedAddress { address, bump });
        }
    }

    Err(KeyError::BumpSeedNotFound)
}

/// Derive a PDA from a single owner seed, a shape common enough in the
/// upstream programs to warrant a shorthand.
pub fn derive_program_address(
    owner: &Pubkey,
    program_id: &Pubkey,
) -> Result<ProgramDerivedAddress, KeyError> {
    find_program_address(&[owner.as_bytes()], program_id)
}

/// Attempt a single bump candidate.
///
/// Returns `Some(address)` if the derived hash is OFF the Ed25519 curve,
/// `None` if it lands on the curve (try the next bump).
fn try_program_address(seeds: &[&[u8]], bump: u8, program_id: &Pubkey) -> Option<Pubkey> {
    let mut hasher = Sha256::new();

    for seed in seeds {
        hasher.update(seed);
    }
    hasher.update([bump]);
    hasher.update(program_id.as_bytes());
    hasher.update(PDA_MARKER);

    let hash: [u8; 32] = hasher.finalize().into();

    if is_on_curve(&hash) {
        return None;
    }

    Some(Pubkey::new(hash))
}

/// Check whether 32 bytes decompress to a valid Ed25519 curve point.
///
/// Any byte pattern that fails decompression — including malformed or
/// out-of-range encodings — counts as off-curve, never as an error. The
/// bump search depends on that treatment.
pub fn is_on_curve(bytes: &[u8; 32]) -> bool {
    curve25519_dalek::edwards::CompressedEdwardsY(*bytes)
        .decompress()
        .is_some()
}
