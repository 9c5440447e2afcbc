use actix_web::http::StatusCode;
use actix_web::ResponseError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CspError {
    #[error("Invalid directive value: {0}")]
    InvalidDirectiveValue(String),

    #[error("Invalid directive name: {0}")]
    InvalidDirectiveName(String),

    #[error("Invalid hash algorithm: {0}")]
    InvalidHashAlgorithm(String),

    #[error("Invalid nonce value: {0}")]
    InvalidNonceValue(String),

    #[error("Invalid report URI: {0}")]
    InvalidReportUri(String),

    #[error("Header processing error: {0}")]
    HeaderError(String),

    #[error("Policy validation error: {0}")]
    ValidationError(String),
}

impl ResponseError for CspError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// Rejection raised by a header's `validate`, naming the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("Invalid Strict-Transport-Security config: {0}")]
    Hsts(String),

    #[error("Invalid X-Frame-Options config: {0}")]
    XFrameOptions(String),

    #[error("Invalid X-Content-Type-Options config: {0}")]
    XContentTypeOptions(String),

    #[error("Invalid X-XSS-Protection config: {0}")]
    XXssProtection(String),

    #[error("Invalid X-Download-Options config: {0}")]
    XDownloadOptions(String),

    #[error("Invalid X-Permitted-Cross-Domain-Policies config: {0}")]
    XPermittedCrossDomainPolicies(String),

    #[error("Invalid Public-Key-Pins config: {0}")]
    PublicKeyPins(String),

    #[error("Invalid Content-Security-Policy config: {0}")]
    ContentSecurityPolicy(#[from] CspError),
}

#[derive(Debug, Error)]
pub enum SecureHeadersError {
    #[error("Secure headers not yet configured: {0}")]
    NotYetConfigured(String),

    #[error("Illegal policy modification: {0}")]
    IllegalPolicyModification(String),

    #[error("Configuration '{0}' is already defined")]
    AlreadyDefined(String),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Csp(#[from] CspError),

    #[error("Script hash file error: {0}")]
    ScriptHashes(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ResponseError for SecureHeadersError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}
