use super::{static_header, HeaderKind, SecureHeader};
use crate::error::ConfigurationError;
use actix_web::http::header::{HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum XContentTypeOptions {
    #[default]
    NoSniff,
}

impl SecureHeader for XContentTypeOptions {
    const KIND: HeaderKind = HeaderKind::XContentTypeOptions;

    fn validate(&self) -> Result<(), ConfigurationError> {
        Ok(())
    }

    fn make_header(&self) -> Result<(HeaderName, HeaderValue), ConfigurationError> {
        match self {
            XContentTypeOptions::NoSniff => static_header(Self::KIND, "nosniff"),
        }
    }
}
