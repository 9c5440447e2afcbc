pub use crate::config::{Configuration, ConfigurationBuilder, Registry, RequestConfig};
pub use crate::core::{CspPolicy, CspPolicyBuilder, Setting, Source};
pub use crate::error::SecureHeadersError;
pub use crate::extensions::SecureHeadersExt;
pub use crate::headers::{
    HeaderKind, Hsts, PublicKeyPins, XContentTypeOptions, XDownloadOptions, XFrameOptions,
    XPermittedCrossDomainPolicies, XXssProtection,
};
pub use crate::security::ScriptHashes;
pub use crate::user_agent::UaFamily;
