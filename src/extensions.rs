use crate::config::registry::Registry;
use crate::config::request::RequestConfig;
use crate::core::policy::CspPolicy;
use crate::error::SecureHeadersError;
use crate::headers::HeaderKind;
use actix_web::http::header::{HeaderName, HeaderValue, USER_AGENT};
use actix_web::HttpMessage;

/// Per-request control over secure headers.
///
/// The first call on a request copies the registry's `default` configuration
/// into the request extensions; later calls and
/// [`secure_headers`](Self::secure_headers) work on that copy. Requests that
/// never call any of these are served straight from the registry's cache.
pub trait SecureHeadersExt {
    /// Serves this request with the configuration registered as `name`.
    fn use_secure_headers_override(
        &self,
        registry: &Registry,
        name: &str,
    ) -> Result<(), SecureHeadersError>;

    /// Serves this request with every header omitted.
    fn opt_out_of_all_protection(&self, registry: &Registry) -> Result<(), SecureHeadersError>;

    fn opt_out_of_header(
        &self,
        registry: &Registry,
        kind: HeaderKind,
    ) -> Result<(), SecureHeadersError>;

    fn override_content_security_policy(
        &self,
        registry: &Registry,
        policy: CspPolicy,
    ) -> Result<(), SecureHeadersError>;

    fn append_content_security_policy(
        &self,
        registry: &Registry,
        additions: &CspPolicy,
    ) -> Result<(), SecureHeadersError>;

    fn content_security_policy_script_nonce(
        &self,
        registry: &Registry,
    ) -> Result<String, SecureHeadersError>;

    fn content_security_policy_style_nonce(
        &self,
        registry: &Registry,
    ) -> Result<String, SecureHeadersError>;

    /// The headers for this request's response, rendered for its
    /// `User-Agent`.
    fn secure_headers(
        &self,
        registry: &Registry,
    ) -> Result<Vec<(HeaderName, HeaderValue)>, SecureHeadersError>;
}

impl<T> SecureHeadersExt for T
where
    T: HttpMessage,
{
    fn use_secure_headers_override(
        &self,
        registry: &Registry,
        name: &str,
    ) -> Result<(), SecureHeadersError> {
        let config = registry.get(name)?.ok_or_else(|| {
            SecureHeadersError::NotYetConfigured(format!("'{}' is not defined", name))
        })?;
        with_request_config(self, registry, |request_config| {
            request_config.use_configuration(config)?;
            Ok(())
        })
    }

    fn opt_out_of_all_protection(&self, registry: &Registry) -> Result<(), SecureHeadersError> {
        self.use_secure_headers_override(registry, crate::constants::NOOP_CONFIG)
    }

    fn opt_out_of_header(
        &self,
        registry: &Registry,
        kind: HeaderKind,
    ) -> Result<(), SecureHeadersError> {
        with_request_config(self, registry, |request_config| {
            request_config.opt_out(kind);
            Ok(())
        })
    }

    fn override_content_security_policy(
        &self,
        registry: &Registry,
        policy: CspPolicy,
    ) -> Result<(), SecureHeadersError> {
        with_request_config(self, registry, |request_config| {
            request_config.override_csp(policy)?;
            Ok(())
        })
    }

    fn append_content_security_policy(
        &self,
        registry: &Registry,
        additions: &CspPolicy,
    ) -> Result<(), SecureHeadersError> {
        with_request_config(self, registry, |request_config| {
            request_config.append_csp(additions)
        })
    }

    fn content_security_policy_script_nonce(
        &self,
        registry: &Registry,
    ) -> Result<String, SecureHeadersError> {
        with_request_config(self, registry, |request_config| {
            Ok(request_config.csp_script_nonce()?)
        })
    }

    fn content_security_policy_style_nonce(
        &self,
        registry: &Registry,
    ) -> Result<String, SecureHeadersError> {
        with_request_config(self, registry, |request_config| {
            Ok(request_config.csp_style_nonce()?)
        })
    }

    fn secure_headers(
        &self,
        registry: &Registry,
    ) -> Result<Vec<(HeaderName, HeaderValue)>, SecureHeadersError> {
        let user_agent = self
            .headers()
            .get(USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_owned();

        let request_config = self.extensions_mut().remove::<RequestConfig>();
        match request_config {
            Some(mut request_config) => {
                let headers = request_config.headers(&user_agent);
                self.extensions_mut().insert(request_config);
                headers
            }
            None => Ok(registry.get_default()?.headers(&user_agent)),
        }
    }
}

/// Runs `f` against the request's configuration, creating it from the
/// registry's default on first use. Request configuration operations check
/// their input before changing anything, so the stored copy stays consistent
/// when `f` fails.
fn with_request_config<T, R, F>(
    message: &T,
    registry: &Registry,
    f: F,
) -> Result<R, SecureHeadersError>
where
    T: HttpMessage,
    F: FnOnce(&mut RequestConfig) -> Result<R, SecureHeadersError>,
{
    let existing = message.extensions_mut().remove::<RequestConfig>();
    let is_new = existing.is_none();
    let mut request_config = match existing {
        Some(request_config) => request_config,
        None => RequestConfig::new(registry.get_default()?),
    };

    let result = f(&mut request_config);
    if result.is_ok() || !is_new {
        message.extensions_mut().insert(request_config);
    }
    result
}
