use super::{static_header, HeaderKind, SecureHeader};
use crate::error::ConfigurationError;
use actix_web::http::header::{HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};

/// Keeps old Internet Explorer from opening downloads in the site's context.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum XDownloadOptions {
    #[default]
    NoOpen,
}

impl SecureHeader for XDownloadOptions {
    const KIND: HeaderKind = HeaderKind::XDownloadOptions;

    fn validate(&self) -> Result<(), ConfigurationError> {
        Ok(())
    }

    fn make_header(&self) -> Result<(HeaderName, HeaderValue), ConfigurationError> {
        match self {
            XDownloadOptions::NoOpen => static_header(Self::KIND, "noopen"),
        }
    }
}
