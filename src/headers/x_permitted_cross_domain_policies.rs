use super::{static_header, HeaderKind, SecureHeader};
use crate::error::ConfigurationError;
use actix_web::http::header::{HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum XPermittedCrossDomainPolicies {
    #[default]
    None,
    MasterOnly,
    ByContentType,
    ByFtpFilename,
    All,
}

impl XPermittedCrossDomainPolicies {
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            XPermittedCrossDomainPolicies::None => "none",
            XPermittedCrossDomainPolicies::MasterOnly => "master-only",
            XPermittedCrossDomainPolicies::ByContentType => "by-content-type",
            XPermittedCrossDomainPolicies::ByFtpFilename => "by-ftp-filename",
            XPermittedCrossDomainPolicies::All => "all",
        }
    }
}

impl SecureHeader for XPermittedCrossDomainPolicies {
    const KIND: HeaderKind = HeaderKind::XPermittedCrossDomainPolicies;

    fn validate(&self) -> Result<(), ConfigurationError> {
        Ok(())
    }

    fn make_header(&self) -> Result<(HeaderName, HeaderValue), ConfigurationError> {
        static_header(Self::KIND, self.as_str())
    }
}
