pub mod config;
pub mod constants;
pub mod core;
pub mod error;
pub mod extensions;
pub mod headers;
pub mod prelude;
pub mod security;
pub mod user_agent;
pub(crate) mod utils;

// Re-export commonly used types for convenience
pub use config::{
    CachedHeader, Configuration, ConfigurationBuilder, HeaderCache, Registry, RequestConfig,
};
pub use core::{CspPolicy, CspPolicyBuilder, HashAlgorithm, Setting, Source};
pub use error::{ConfigurationError, CspError, SecureHeadersError};
pub use extensions::SecureHeadersExt;
pub use headers::{
    HeaderKind, Hsts, Pin, PublicKeyPins, SecureHeader, XContentTypeOptions, XDownloadOptions,
    XFrameOptions, XPermittedCrossDomainPolicies, XXssProtection,
};
pub use security::{NonceGenerator, ScriptHashes};
pub use user_agent::{UaFamily, UserAgent};
