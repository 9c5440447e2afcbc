use crate::constants::DEFAULT_NONCE_LENGTH;
use crate::error::CspError;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use getrandom::getrandom;

/// Produces base64 nonces for `'nonce-…'` sources.
#[derive(Debug, Clone, Copy)]
pub struct NonceGenerator {
    length: usize,
}

impl NonceGenerator {
    /// `length` random bytes per nonce.
    #[inline]
    pub fn new(length: usize) -> Self {
        Self { length }
    }

    #[inline]
    pub fn length(&self) -> usize {
        self.length
    }

    pub fn generate(&self) -> Result<String, CspError> {
        if self.length == 0 {
            return Err(CspError::InvalidNonceValue(
                "nonce length must be positive".to_string(),
            ));
        }
        let mut buffer = vec![0u8; self.length];
        getrandom(&mut buffer)
            .map_err(|err| CspError::InvalidNonceValue(format!("random source failed: {}", err)))?;
        Ok(BASE64.encode(&buffer))
    }
}

impl Default for NonceGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_NONCE_LENGTH)
    }
}
