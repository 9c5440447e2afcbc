//! The fixed set of header kinds a configuration manages, and the contract
//! each simple (non-CSP) header implements.

pub mod hsts;
pub mod public_key_pins;
pub mod x_content_type_options;
pub mod x_download_options;
pub mod x_frame_options;
pub mod x_permitted_cross_domain_policies;
pub mod x_xss_protection;

pub use hsts::Hsts;
pub use public_key_pins::{Pin, PublicKeyPins};
pub use x_content_type_options::XContentTypeOptions;
pub use x_download_options::XDownloadOptions;
pub use x_frame_options::XFrameOptions;
pub use x_permitted_cross_domain_policies::XPermittedCrossDomainPolicies;
pub use x_xss_protection::XXssProtection;

use crate::constants::{
    HEADER_CSP, HEADER_HPKP, HEADER_HSTS, HEADER_X_CONTENT_TYPE_OPTIONS,
    HEADER_X_DOWNLOAD_OPTIONS, HEADER_X_FRAME_OPTIONS, HEADER_X_PERMITTED_CROSS_DOMAIN_POLICIES,
    HEADER_X_XSS_PROTECTION,
};
use crate::error::ConfigurationError;
use actix_web::http::header::{HeaderName, HeaderValue};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HeaderKind {
    Hsts,
    XFrameOptions,
    XContentTypeOptions,
    XXssProtection,
    XDownloadOptions,
    XPermittedCrossDomainPolicies,
    PublicKeyPins,
    ContentSecurityPolicy,
}

impl HeaderKind {
    /// Validation and compilation order.
    pub const ALL: [HeaderKind; 8] = [
        HeaderKind::Hsts,
        HeaderKind::XFrameOptions,
        HeaderKind::XContentTypeOptions,
        HeaderKind::XXssProtection,
        HeaderKind::XDownloadOptions,
        HeaderKind::XPermittedCrossDomainPolicies,
        HeaderKind::PublicKeyPins,
        HeaderKind::ContentSecurityPolicy,
    ];

    /// Stable identity of the kind, used as its key in configuration files.
    #[inline]
    pub const fn config_key(&self) -> &'static str {
        match self {
            HeaderKind::Hsts => "hsts",
            HeaderKind::XFrameOptions => "x_frame_options",
            HeaderKind::XContentTypeOptions => "x_content_type_options",
            HeaderKind::XXssProtection => "x_xss_protection",
            HeaderKind::XDownloadOptions => "x_download_options",
            HeaderKind::XPermittedCrossDomainPolicies => "x_permitted_cross_domain_policies",
            HeaderKind::PublicKeyPins => "hpkp",
            HeaderKind::ContentSecurityPolicy => "csp",
        }
    }

    /// Enforcing header name. Report-only variants of CSP and HPKP are
    /// chosen by their settings when rendering.
    #[inline]
    pub fn header_name(&self) -> HeaderName {
        HeaderName::from_static(match self {
            HeaderKind::Hsts => HEADER_HSTS,
            HeaderKind::XFrameOptions => HEADER_X_FRAME_OPTIONS,
            HeaderKind::XContentTypeOptions => HEADER_X_CONTENT_TYPE_OPTIONS,
            HeaderKind::XXssProtection => HEADER_X_XSS_PROTECTION,
            HeaderKind::XDownloadOptions => HEADER_X_DOWNLOAD_OPTIONS,
            HeaderKind::XPermittedCrossDomainPolicies => HEADER_X_PERMITTED_CROSS_DOMAIN_POLICIES,
            HeaderKind::PublicKeyPins => HEADER_HPKP,
            HeaderKind::ContentSecurityPolicy => HEADER_CSP,
        })
    }

    pub(crate) fn error(&self, message: impl Into<String>) -> ConfigurationError {
        let message = message.into();
        match self {
            HeaderKind::Hsts => ConfigurationError::Hsts(message),
            HeaderKind::XFrameOptions => ConfigurationError::XFrameOptions(message),
            HeaderKind::XContentTypeOptions => ConfigurationError::XContentTypeOptions(message),
            HeaderKind::XXssProtection => ConfigurationError::XXssProtection(message),
            HeaderKind::XDownloadOptions => ConfigurationError::XDownloadOptions(message),
            HeaderKind::XPermittedCrossDomainPolicies => {
                ConfigurationError::XPermittedCrossDomainPolicies(message)
            }
            HeaderKind::PublicKeyPins => ConfigurationError::PublicKeyPins(message),
            HeaderKind::ContentSecurityPolicy => ConfigurationError::ContentSecurityPolicy(
                crate::error::CspError::ValidationError(message),
            ),
        }
    }
}

impl fmt::Display for HeaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config_key())
    }
}

/// A header whose value does not depend on the requesting browser.
pub trait SecureHeader {
    const KIND: HeaderKind;

    fn validate(&self) -> Result<(), ConfigurationError>;

    fn make_header(&self) -> Result<(HeaderName, HeaderValue), ConfigurationError>;
}

pub(crate) fn static_header(
    kind: HeaderKind,
    value: &'static str,
) -> Result<(HeaderName, HeaderValue), ConfigurationError> {
    Ok((kind.header_name(), HeaderValue::from_static(value)))
}

pub(crate) fn owned_header(
    kind: HeaderKind,
    name: HeaderName,
    value: String,
) -> Result<(HeaderName, HeaderValue), ConfigurationError> {
    HeaderValue::try_from(value)
        .map(|value| (name, value))
        .map_err(|_| kind.error("value contains characters not allowed in a header"))
}

pub(crate) fn is_absolute_url(uri: &str) -> bool {
    url::Url::parse(uri).is_ok()
}
