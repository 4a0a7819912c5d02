use thiserror::Error;

/// Key and address derivation errors.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid blockhash: {0}")]
    InvalidBlockhash(String),

    #[error("no off-curve program address found for the given seeds")]
    BumpSeedNotFound,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid_address() {
        let err = KeyError::InvalidAddress("bad decode".into());
        assert_eq!(err.to_string(), "invalid address: bad decode");
    }

    #[test]
    fn display_bump_seed_not_found() {
        let err = KeyError::BumpSeedNotFound;
        assert!(err.to_string().contains("off-curve"));
    }

    #[test]
    fn error_trait_is_implemented() {
        let err: Box<dyn std::error::Error> =
            Box::new(KeyError::InvalidBlockhash("too short".into()));
        assert!(err.to_string().contains("too short"));
    }
}
