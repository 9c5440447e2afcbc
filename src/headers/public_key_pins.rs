use super::{is_absolute_url, owned_header, HeaderKind, SecureHeader};
use crate::constants::{HEADER_HPKP_REPORT_ONLY, HPKP_MIN_PINS};
use crate::error::ConfigurationError;
use actix_web::http::header::{HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};

/// One `pin-<algorithm>` entry. The digest is an opaque string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pin {
    pub algorithm: String,
    pub value: String,
}

impl Pin {
    pub fn sha256(value: impl Into<String>) -> Self {
        Self {
            algorithm: "sha256".to_string(),
            value: value.into(),
        }
    }
}

/// `Public-Key-Pins`. Opted out unless a configuration sets it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKeyPins {
    pub max_age: u64,
    pub pins: Vec<Pin>,
    #[serde(default)]
    pub include_subdomains: bool,
    #[serde(default)]
    pub report_uri: Option<String>,
    #[serde(default)]
    pub report_only: bool,
}

impl PublicKeyPins {
    pub fn new(max_age: u64) -> Self {
        Self {
            max_age,
            pins: Vec::new(),
            include_subdomains: false,
            report_uri: None,
            report_only: false,
        }
    }

    pub fn pin(mut self, pin: Pin) -> Self {
        self.pins.push(pin);
        self
    }

    pub fn include_subdomains(mut self) -> Self {
        self.include_subdomains = true;
        self
    }

    pub fn report_uri(mut self, uri: impl Into<String>) -> Self {
        self.report_uri = Some(uri.into());
        self
    }

    pub fn report_only(mut self) -> Self {
        self.report_only = true;
        self
    }
}

impl SecureHeader for PublicKeyPins {
    const KIND: HeaderKind = HeaderKind::PublicKeyPins;

    fn validate(&self) -> Result<(), ConfigurationError> {
        if self.max_age == 0 {
            return Err(Self::KIND.error("max_age must be positive"));
        }
        if self.pins.len() < HPKP_MIN_PINS {
            return Err(Self::KIND.error(format!(
                "at least {} pins are required, got {}",
                HPKP_MIN_PINS,
                self.pins.len()
            )));
        }
        for pin in &self.pins {
            if pin.algorithm != "sha256" {
                return Err(Self::KIND.error(format!(
                    "unsupported pin algorithm '{}'",
                    pin.algorithm
                )));
            }
            if pin.value.is_empty() || pin.value.contains('"') {
                return Err(Self::KIND.error("pin values must be non-empty and unquoted"));
            }
        }
        if let Some(uri) = &self.report_uri {
            if !is_absolute_url(uri) {
                return Err(Self::KIND.error(format!(
                    "report_uri must be an absolute URL, got '{}'",
                    uri
                )));
            }
        }
        Ok(())
    }

    fn make_header(&self) -> Result<(HeaderName, HeaderValue), ConfigurationError> {
        let mut value = String::with_capacity(64 * self.pins.len() + 32);
        for pin in &self.pins {
            value.push_str(&format!("pin-{}=\"{}\"; ", pin.algorithm, pin.value));
        }
        value.push_str(&format!("max-age={}", self.max_age));
        if self.include_subdomains {
            value.push_str("; includeSubDomains");
        }
        if let Some(uri) = &self.report_uri {
            value.push_str(&format!("; report-uri=\"{}\"", uri));
        }

        let name = if self.report_only {
            HeaderName::from_static(HEADER_HPKP_REPORT_ONLY)
        } else {
            Self::KIND.header_name()
        };
        owned_header(Self::KIND, name, value)
    }
}
