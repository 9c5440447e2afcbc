use super::{owned_header, HeaderKind, SecureHeader};
use crate::constants::{DEFAULT_HSTS_MAX_AGE, HSTS_PRELOAD_MIN_MAX_AGE};
use crate::error::ConfigurationError;
use actix_web::http::header::{HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};

/// `Strict-Transport-Security`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hsts {
    pub max_age: u64,
    #[serde(default)]
    pub include_subdomains: bool,
    #[serde(default)]
    pub preload: bool,
}

impl Hsts {
    #[inline]
    pub fn new(max_age: u64) -> Self {
        Self {
            max_age,
            include_subdomains: false,
            preload: false,
        }
    }

    #[inline]
    pub fn include_subdomains(mut self) -> Self {
        self.include_subdomains = true;
        self
    }

    #[inline]
    pub fn preload(mut self) -> Self {
        self.preload = true;
        self
    }
}

impl Default for Hsts {
    fn default() -> Self {
        Self::new(DEFAULT_HSTS_MAX_AGE)
    }
}

impl SecureHeader for Hsts {
    const KIND: HeaderKind = HeaderKind::Hsts;

    fn validate(&self) -> Result<(), ConfigurationError> {
        if self.preload && !self.include_subdomains {
            return Err(Self::KIND.error("preload requires include_subdomains"));
        }
        if self.preload && self.max_age < HSTS_PRELOAD_MIN_MAX_AGE {
            return Err(Self::KIND.error(format!(
                "preload requires max_age of at least {}, got {}",
                HSTS_PRELOAD_MIN_MAX_AGE, self.max_age
            )));
        }
        Ok(())
    }

    fn make_header(&self) -> Result<(HeaderName, HeaderValue), ConfigurationError> {
        let mut value = format!("max-age={}", self.max_age);
        if self.include_subdomains {
            value.push_str("; includeSubDomains");
        }
        if self.preload {
            value.push_str("; preload");
        }
        owned_header(Self::KIND, Self::KIND.header_name(), value)
    }
}
