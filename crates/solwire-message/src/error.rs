use solwire_keys::Pubkey;
use thiserror::Error;

/// Message encoding, decoding, and signing errors.
#[derive(Debug, Error)]
pub enum MessageError {
    /// Builder state error: a required field was never supplied. The
    /// current build cannot proceed; start over.
    #[error("message incomplete: {0}")]
    Incomplete(String),

    /// The serialized form does not fit the caller-supplied buffer.
    #[error("buffer too small: {0}")]
    BufferTooSmall(String),

    /// A value cannot be represented in the wire format.
    #[error("encode error: {0}")]
    Encode(String),

    /// Malformed or truncated input on the read path.
    #[error("decode error: {0}")]
    Decode(String),

    /// The first message byte has its high bit set but is not the v0 marker.
    #[error("unsupported message format: 0x{0:02x}")]
    UnsupportedFormat(u8),

    /// The account is not among the message's designated signers.
    #[error("account {0} is not a designated signer of this message")]
    SignerNotFound(Pubkey),

    /// The account does not appear in the message's static account table.
    #[error("account {0} not found in this message")]
    AccountNotFound(Pubkey),

    /// A v0 account index points past the supplied lookup table contents.
    #[error("account index {0} exceeds the supplied lookup table contents")]
    LookupIndexOutOfRange(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_incomplete() {
        let err = MessageError::Incomplete("payer has not been specified".into());
        assert_eq!(
            err.to_string(),
            "message incomplete: payer has not been specified"
        );
    }

    #[test]
    fn display_unsupported_format() {
        let err = MessageError::UnsupportedFormat(0x81);
        assert_eq!(err.to_string(), "unsupported message format: 0x81");
    }

    #[test]
    fn display_signer_not_found() {
        let err = MessageError::SignerNotFound(Pubkey::new([0u8; 32]));
        assert!(err
            .to_string()
            .contains("11111111111111111111111111111111"));
    }

    #[test]
    fn error_trait_is_implemented() {
        let err: Box<dyn std::error::Error> =
            Box::new(MessageError::Decode("unexpected end of buffer".into()));
        assert!(err.to_string().contains("unexpected end"));
    }
}
