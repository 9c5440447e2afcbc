use crate::config::configuration::Configuration;
use crate::constants::{SCRIPT_SRC, STYLE_SRC};
use crate::core::policy::CspPolicy;
use crate::core::setting::Setting;
use crate::core::source::Source;
use crate::error::{CspError, SecureHeadersError};
use crate::headers::HeaderKind;
use crate::security::nonce::NonceGenerator;
use crate::user_agent::UserAgent;
use actix_web::http::header::{HeaderName, HeaderValue};
use std::{borrow::Cow, sync::Arc};

/// The configuration one request is served with.
///
/// Starts out sharing a registered [`Configuration`] and takes a private copy
/// the first time the request changes anything, so registered configurations
/// are never mutated. A changed Content-Security-Policy is re-rendered lazily,
/// for the requesting browser only.
#[derive(Debug, Clone)]
pub struct RequestConfig {
    config: Arc<Configuration>,
    script_nonce: Option<String>,
    style_nonce: Option<String>,
    csp_dirty: bool,
}

impl RequestConfig {
    pub fn new(config: Arc<Configuration>) -> Self {
        Self {
            config,
            script_nonce: None,
            style_nonce: None,
            csp_dirty: false,
        }
    }

    #[inline]
    pub fn configuration(&self) -> &Configuration {
        &self.config
    }

    /// True once this request holds its own copy of the configuration.
    #[inline]
    pub fn is_detached(&self, shared: &Arc<Configuration>) -> bool {
        !Arc::ptr_eq(&self.config, shared)
    }

    #[inline]
    pub fn script_nonce(&self) -> Option<&str> {
        self.script_nonce.as_deref()
    }

    #[inline]
    pub fn style_nonce(&self) -> Option<&str> {
        self.style_nonce.as_deref()
    }

    /// Switches to another registered configuration. Nonces already handed
    /// out for this request are carried over.
    pub fn use_configuration(&mut self, config: Arc<Configuration>) -> Result<(), CspError> {
        self.config = config;
        self.csp_dirty = false;
        if let Some(nonce) = self.script_nonce.clone() {
            self.append_nonce(SCRIPT_SRC, nonce)?;
        }
        if let Some(nonce) = self.style_nonce.clone() {
            self.append_nonce(STYLE_SRC, nonce)?;
        }
        Ok(())
    }

    /// Replaces the policy for this request only.
    pub fn override_csp(&mut self, policy: CspPolicy) -> Result<(), CspError> {
        policy.validate()?;
        Arc::make_mut(&mut self.config).set_dynamic_csp(policy);
        self.csp_dirty = true;
        Ok(())
    }

    /// Edits a copy of the current policy and installs it as the request's
    /// policy. An opted-out policy is edited starting from an empty one.
    pub fn override_csp_with<F>(&mut self, f: F) -> Result<(), CspError>
    where
        F: FnOnce(&mut CspPolicy),
    {
        let mut policy = self.config.current_csp().as_set().cloned().unwrap_or_default();
        f(&mut policy);
        self.override_csp(policy)
    }

    /// Adds the sources of `additions` to the current policy.
    pub fn append_csp(&mut self, additions: &CspPolicy) -> Result<(), SecureHeadersError> {
        let mut policy = match self.config.current_csp() {
            Setting::Set(policy) => policy.clone(),
            Setting::OptOut => {
                return Err(SecureHeadersError::IllegalPolicyModification(
                    "cannot append to an opted-out content security policy".to_string(),
                ))
            }
        };
        policy.merge(additions);
        self.override_csp(policy)?;
        Ok(())
    }

    /// The request's script nonce, generated on first use and added to
    /// `script-src`.
    pub fn csp_script_nonce(&mut self) -> Result<String, CspError> {
        if let Some(nonce) = &self.script_nonce {
            return Ok(nonce.clone());
        }
        let nonce = NonceGenerator::default().generate()?;
        self.append_nonce(SCRIPT_SRC, nonce.clone())?;
        self.script_nonce = Some(nonce.clone());
        Ok(nonce)
    }

    /// Same as [`csp_script_nonce`](Self::csp_script_nonce), for `style-src`.
    pub fn csp_style_nonce(&mut self) -> Result<String, CspError> {
        if let Some(nonce) = &self.style_nonce {
            return Ok(nonce.clone());
        }
        let nonce = NonceGenerator::default().generate()?;
        self.append_nonce(STYLE_SRC, nonce.clone())?;
        self.style_nonce = Some(nonce.clone());
        Ok(nonce)
    }

    fn append_nonce(&mut self, directive: &str, nonce: String) -> Result<(), CspError> {
        // An opted-out policy stays opted out; the nonce is still usable in markup.
        let Setting::Set(current) = self.config.current_csp() else {
            return Ok(());
        };
        let mut policy = current.clone();
        policy.append_sources(directive, [Source::Nonce(Cow::Owned(nonce))]);
        self.override_csp(policy)
    }

    /// Omits `kind` from this request's response.
    pub fn opt_out(&mut self, kind: HeaderKind) {
        Arc::make_mut(&mut self.config).opt_out(kind);
        if kind == HeaderKind::ContentSecurityPolicy {
            self.csp_dirty = false;
        }
    }

    /// Re-renders the policy for the browser behind `user_agent`.
    pub fn rebuild_csp_header_cache(&mut self, user_agent: &str) -> Result<(), CspError> {
        Arc::make_mut(&mut self.config).rebuild_csp_header_cache(user_agent)?;
        self.csp_dirty = false;
        Ok(())
    }

    /// The headers to send for this request.
    pub fn headers(
        &mut self,
        user_agent: &str,
    ) -> Result<Vec<(HeaderName, HeaderValue)>, SecureHeadersError> {
        let family = UserAgent::parse(user_agent).family();
        let missing_variant = self.config.current_csp().as_set().is_some()
            && !self
                .config
                .cached_headers()
                .get(HeaderKind::ContentSecurityPolicy)
                .is_some_and(|header| header.is_rendered_for(family));
        if self.csp_dirty || missing_variant {
            self.rebuild_csp_header_cache(user_agent)?;
        }
        Ok(self.config.cached_headers().headers_for(family))
    }
}

impl From<Arc<Configuration>> for RequestConfig {
    fn from(config: Arc<Configuration>) -> Self {
        Self::new(config)
    }
}
