use super::{is_absolute_url, owned_header, static_header, HeaderKind, SecureHeader};
use crate::error::ConfigurationError;
use actix_web::http::header::{HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum XFrameOptions {
    Deny,
    #[default]
    SameOrigin,
    AllowFrom(String),
}

impl SecureHeader for XFrameOptions {
    const KIND: HeaderKind = HeaderKind::XFrameOptions;

    fn validate(&self) -> Result<(), ConfigurationError> {
        match self {
            XFrameOptions::AllowFrom(uri) if !is_absolute_url(uri) => Err(Self::KIND.error(
                format!("allow-from requires an absolute URL, got '{}'", uri),
            )),
            _ => Ok(()),
        }
    }

    fn make_header(&self) -> Result<(HeaderName, HeaderValue), ConfigurationError> {
        match self {
            XFrameOptions::Deny => static_header(Self::KIND, "deny"),
            XFrameOptions::SameOrigin => static_header(Self::KIND, "sameorigin"),
            XFrameOptions::AllowFrom(uri) => owned_header(
                Self::KIND,
                Self::KIND.header_name(),
                format!("allow-from {}", uri),
            ),
        }
    }
}
