use super::{owned_header, static_header, HeaderKind, SecureHeader};
use crate::error::ConfigurationError;
use actix_web::http::header::{HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum XXssProtection {
    Disabled,
    Enabled,
    #[default]
    Block,
    Report(String),
}

impl SecureHeader for XXssProtection {
    const KIND: HeaderKind = HeaderKind::XXssProtection;

    fn validate(&self) -> Result<(), ConfigurationError> {
        match self {
            XXssProtection::Report(uri) if uri.trim().is_empty() => {
                Err(Self::KIND.error("report requires a non-empty uri"))
            }
            _ => Ok(()),
        }
    }

    fn make_header(&self) -> Result<(HeaderName, HeaderValue), ConfigurationError> {
        match self {
            XXssProtection::Disabled => static_header(Self::KIND, "0"),
            XXssProtection::Enabled => static_header(Self::KIND, "1"),
            XXssProtection::Block => static_header(Self::KIND, "1; mode=block"),
            XXssProtection::Report(uri) => owned_header(
                Self::KIND,
                Self::KIND.header_name(),
                format!("1; report={}", uri),
            ),
        }
    }
}
