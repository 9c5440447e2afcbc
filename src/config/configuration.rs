use crate::core::policy::CspPolicy;
use crate::core::setting::Setting;
use crate::error::{ConfigurationError, CspError, SecureHeadersError};
use crate::headers::{
    HeaderKind, Hsts, PublicKeyPins, SecureHeader, XContentTypeOptions, XDownloadOptions,
    XFrameOptions, XPermittedCrossDomainPolicies, XXssProtection,
};
use crate::user_agent::{UaFamily, UserAgent};
use actix_web::http::header::{HeaderName, HeaderValue};
use indexmap::IndexMap;

/// A rendered header as it sits in a configuration's cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachedHeader {
    /// Same value for every request.
    Static { name: HeaderName, value: HeaderValue },
    /// One value per browser family (Content-Security-Policy). A family
    /// mapped to `None` was rendered but has nothing to send.
    PerFamily {
        name: HeaderName,
        variants: IndexMap<UaFamily, Option<HeaderValue>>,
    },
}

impl CachedHeader {
    #[inline]
    pub fn name(&self) -> &HeaderName {
        match self {
            CachedHeader::Static { name, .. } | CachedHeader::PerFamily { name, .. } => name,
        }
    }

    #[inline]
    pub fn value_for(&self, family: UaFamily) -> Option<&HeaderValue> {
        match self {
            CachedHeader::Static { value, .. } => Some(value),
            CachedHeader::PerFamily { variants, .. } => {
                variants.get(&family).and_then(Option::as_ref)
            }
        }
    }

    /// Whether a value (possibly none at all) has been rendered for `family`.
    #[inline]
    pub fn is_rendered_for(&self, family: UaFamily) -> bool {
        match self {
            CachedHeader::Static { .. } => true,
            CachedHeader::PerFamily { variants, .. } => variants.contains_key(&family),
        }
    }
}

/// Header values compiled once when a configuration is built. A kind with no
/// entry must not be sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderCache {
    entries: IndexMap<HeaderKind, CachedHeader>,
}

impl HeaderCache {
    #[inline]
    pub fn get(&self, kind: HeaderKind) -> Option<&CachedHeader> {
        self.entries.get(&kind)
    }

    #[inline]
    pub fn contains(&self, kind: HeaderKind) -> bool {
        self.entries.contains_key(&kind)
    }

    /// The cached Content-Security-Policy value for `family`.
    #[inline]
    pub fn csp(&self, family: UaFamily) -> Option<&HeaderValue> {
        self.get(HeaderKind::ContentSecurityPolicy)
            .and_then(|header| header.value_for(family))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (HeaderKind, &CachedHeader)> {
        self.entries.iter().map(|(kind, header)| (*kind, header))
    }

    /// Every header to send to a browser of `family`.
    pub fn headers_for(&self, family: UaFamily) -> Vec<(HeaderName, HeaderValue)> {
        self.entries
            .values()
            .filter_map(|header| {
                header
                    .value_for(family)
                    .map(|value| (header.name().clone(), value.clone()))
            })
            .collect()
    }

    pub(crate) fn remove(&mut self, kind: HeaderKind) -> Option<CachedHeader> {
        self.entries.shift_remove(&kind)
    }

    pub(crate) fn insert(&mut self, kind: HeaderKind, header: CachedHeader) {
        self.entries.insert(kind, header);
    }
}

/// The per-header settings shared by the building and frozen phases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct HeaderSettings {
    pub(crate) hsts: Setting<Hsts>,
    pub(crate) x_frame_options: Setting<XFrameOptions>,
    pub(crate) x_content_type_options: Setting<XContentTypeOptions>,
    pub(crate) x_xss_protection: Setting<XXssProtection>,
    pub(crate) x_download_options: Setting<XDownloadOptions>,
    pub(crate) x_permitted_cross_domain_policies: Setting<XPermittedCrossDomainPolicies>,
    pub(crate) hpkp: Setting<PublicKeyPins>,
    pub(crate) csp: Setting<CspPolicy>,
    pub(crate) dynamic_csp: Option<Setting<CspPolicy>>,
    pub(crate) secure_cookies: bool,
}

impl Default for HeaderSettings {
    fn default() -> Self {
        Self {
            hsts: Setting::Set(Hsts::default()),
            x_frame_options: Setting::Set(XFrameOptions::default()),
            x_content_type_options: Setting::Set(XContentTypeOptions::default()),
            x_xss_protection: Setting::Set(XXssProtection::default()),
            x_download_options: Setting::Set(XDownloadOptions::default()),
            x_permitted_cross_domain_policies: Setting::Set(
                XPermittedCrossDomainPolicies::default(),
            ),
            hpkp: Setting::OptOut,
            csp: Setting::Set(CspPolicy::secure_default()),
            dynamic_csp: None,
            secure_cookies: false,
        }
    }
}

impl HeaderSettings {
    pub(crate) fn opted_out() -> Self {
        Self {
            hsts: Setting::OptOut,
            x_frame_options: Setting::OptOut,
            x_content_type_options: Setting::OptOut,
            x_xss_protection: Setting::OptOut,
            x_download_options: Setting::OptOut,
            x_permitted_cross_domain_policies: Setting::OptOut,
            hpkp: Setting::OptOut,
            csp: Setting::OptOut,
            dynamic_csp: Some(Setting::OptOut),
            secure_cookies: false,
        }
    }

    #[inline]
    pub(crate) fn current_csp(&self) -> &Setting<CspPolicy> {
        self.dynamic_csp.as_ref().unwrap_or(&self.csp)
    }

    pub(crate) fn opt_out(&mut self, kind: HeaderKind) {
        match kind {
            HeaderKind::Hsts => self.hsts = Setting::OptOut,
            HeaderKind::XFrameOptions => self.x_frame_options = Setting::OptOut,
            HeaderKind::XContentTypeOptions => self.x_content_type_options = Setting::OptOut,
            HeaderKind::XXssProtection => self.x_xss_protection = Setting::OptOut,
            HeaderKind::XDownloadOptions => self.x_download_options = Setting::OptOut,
            HeaderKind::XPermittedCrossDomainPolicies => {
                self.x_permitted_cross_domain_policies = Setting::OptOut
            }
            HeaderKind::PublicKeyPins => self.hpkp = Setting::OptOut,
            HeaderKind::ContentSecurityPolicy => {
                self.csp = Setting::OptOut;
                self.dynamic_csp = Some(Setting::OptOut);
            }
        }
    }

    /// Runs every validator in [`HeaderKind::ALL`] order, stopping at the
    /// first failure.
    pub(crate) fn validate_all(&self) -> Result<(), ConfigurationError> {
        for kind in HeaderKind::ALL {
            match kind {
                HeaderKind::Hsts => validate_setting(&self.hsts)?,
                HeaderKind::XFrameOptions => validate_setting(&self.x_frame_options)?,
                HeaderKind::XContentTypeOptions => {
                    validate_setting(&self.x_content_type_options)?
                }
                HeaderKind::XXssProtection => validate_setting(&self.x_xss_protection)?,
                HeaderKind::XDownloadOptions => validate_setting(&self.x_download_options)?,
                HeaderKind::XPermittedCrossDomainPolicies => {
                    validate_setting(&self.x_permitted_cross_domain_policies)?
                }
                HeaderKind::PublicKeyPins => validate_setting(&self.hpkp)?,
                HeaderKind::ContentSecurityPolicy => {
                    if let Setting::Set(policy) = &self.csp {
                        policy.validate()?;
                    }
                    if let Some(Setting::Set(policy)) = &self.dynamic_csp {
                        policy.validate()?;
                    }
                }
            }
        }
        Ok(())
    }

    pub(crate) fn compile(&self) -> Result<HeaderCache, ConfigurationError> {
        let mut cache = HeaderCache::default();

        compile_setting(&mut cache, &self.hsts)?;
        compile_setting(&mut cache, &self.x_frame_options)?;
        compile_setting(&mut cache, &self.x_content_type_options)?;
        compile_setting(&mut cache, &self.x_xss_protection)?;
        compile_setting(&mut cache, &self.x_download_options)?;
        compile_setting(&mut cache, &self.x_permitted_cross_domain_policies)?;
        compile_setting(&mut cache, &self.hpkp)?;

        if let Setting::Set(policy) = self.current_csp() {
            let mut variants = IndexMap::with_capacity(UaFamily::ALL.len());
            for family in UaFamily::ALL {
                let user_agent = UserAgent::parse(family.representative_user_agent());
                variants.insert(family, render_variant(policy, &user_agent)?);
            }
            cache.insert(
                HeaderKind::ContentSecurityPolicy,
                CachedHeader::PerFamily {
                    name: policy.header_name(),
                    variants,
                },
            );
        }

        Ok(cache)
    }

    /// Replaces the CSP cache entry with a single variant rendered for
    /// `user_agent`, from the current policy.
    pub(crate) fn render_csp_for(
        &self,
        cache: &mut HeaderCache,
        user_agent: &UserAgent,
    ) -> Result<(), CspError> {
        cache.remove(HeaderKind::ContentSecurityPolicy);
        if let Setting::Set(policy) = self.current_csp() {
            let mut variants = IndexMap::with_capacity(1);
            variants.insert(user_agent.family(), render_variant(policy, user_agent)?);
            cache.insert(
                HeaderKind::ContentSecurityPolicy,
                CachedHeader::PerFamily {
                    name: policy.header_name(),
                    variants,
                },
            );
        }
        Ok(())
    }
}

/// A family that supports none of the policy's directives gets no header
/// rather than an empty one.
fn render_variant(
    policy: &CspPolicy,
    user_agent: &UserAgent,
) -> Result<Option<HeaderValue>, CspError> {
    let value = policy.render(user_agent)?;
    Ok((!value.is_empty()).then_some(value))
}

fn validate_setting<H: SecureHeader>(setting: &Setting<H>) -> Result<(), ConfigurationError> {
    match setting {
        Setting::Set(header) => header.validate(),
        Setting::OptOut => Ok(()),
    }
}

fn compile_setting<H: SecureHeader>(
    cache: &mut HeaderCache,
    setting: &Setting<H>,
) -> Result<(), ConfigurationError> {
    if let Setting::Set(header) = setting {
        let (name, value) = header.make_header()?;
        cache.insert(H::KIND, CachedHeader::Static { name, value });
    }
    Ok(())
}

/// The mutable phase of a configuration, handed to `define`/`override`
/// closures.
#[derive(Debug, Clone, Default)]
pub struct ConfigurationBuilder {
    settings: HeaderSettings,
}

impl ConfigurationBuilder {
    /// Every header at its default, Public-Key-Pins opted out and the
    /// default Content-Security-Policy in place.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn opted_out() -> Self {
        Self {
            settings: HeaderSettings::opted_out(),
        }
    }

    pub fn hsts(&mut self, setting: impl Into<Setting<Hsts>>) -> &mut Self {
        self.settings.hsts = setting.into();
        self
    }

    pub fn x_frame_options(&mut self, setting: impl Into<Setting<XFrameOptions>>) -> &mut Self {
        self.settings.x_frame_options = setting.into();
        self
    }

    pub fn x_content_type_options(
        &mut self,
        setting: impl Into<Setting<XContentTypeOptions>>,
    ) -> &mut Self {
        self.settings.x_content_type_options = setting.into();
        self
    }

    pub fn x_xss_protection(&mut self, setting: impl Into<Setting<XXssProtection>>) -> &mut Self {
        self.settings.x_xss_protection = setting.into();
        self
    }

    pub fn x_download_options(
        &mut self,
        setting: impl Into<Setting<XDownloadOptions>>,
    ) -> &mut Self {
        self.settings.x_download_options = setting.into();
        self
    }

    pub fn x_permitted_cross_domain_policies(
        &mut self,
        setting: impl Into<Setting<XPermittedCrossDomainPolicies>>,
    ) -> &mut Self {
        self.settings.x_permitted_cross_domain_policies = setting.into();
        self
    }

    pub fn hpkp(&mut self, setting: impl Into<Setting<PublicKeyPins>>) -> &mut Self {
        self.settings.hpkp = setting.into();
        self
    }

    /// Sets the static policy. Fails while a dynamic policy is active, since
    /// the dynamic one would silently take precedence.
    pub fn csp(
        &mut self,
        setting: impl Into<Setting<CspPolicy>>,
    ) -> Result<&mut Self, SecureHeadersError> {
        self.ensure_static_csp_mutable()?;
        self.settings.csp = setting.into();
        Ok(self)
    }

    /// In-place access to the static policy, under the same rule as [`csp`](Self::csp).
    pub fn csp_mut(&mut self) -> Result<&mut Setting<CspPolicy>, SecureHeadersError> {
        self.ensure_static_csp_mutable()?;
        Ok(&mut self.settings.csp)
    }

    pub fn dynamic_csp(&mut self, setting: impl Into<Setting<CspPolicy>>) -> &mut Self {
        self.settings.dynamic_csp = Some(setting.into());
        self
    }

    pub fn clear_dynamic_csp(&mut self) -> &mut Self {
        self.settings.dynamic_csp = None;
        self
    }

    pub fn secure_cookies(&mut self, enabled: bool) -> &mut Self {
        self.settings.secure_cookies = enabled;
        self
    }

    /// Omits `kind` from every response. Opting out of CSP also disables the
    /// dynamic policy.
    pub fn opt_out(&mut self, kind: HeaderKind) -> &mut Self {
        self.settings.opt_out(kind);
        self
    }

    #[inline]
    pub fn current_csp(&self) -> &Setting<CspPolicy> {
        self.settings.current_csp()
    }

    #[inline]
    pub fn get_hsts(&self) -> &Setting<Hsts> {
        &self.settings.hsts
    }

    #[inline]
    pub fn get_csp(&self) -> &Setting<CspPolicy> {
        &self.settings.csp
    }

    #[inline]
    pub fn get_dynamic_csp(&self) -> Option<&Setting<CspPolicy>> {
        self.settings.dynamic_csp.as_ref()
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.settings.validate_all()
    }

    /// Validates, compiles the header cache and freezes the result.
    pub fn build(self) -> Result<Configuration, SecureHeadersError> {
        self.settings.validate_all()?;
        let cached_headers = self.settings.compile()?;
        log::debug!(
            "Compiled {} headers across {} browser families",
            cached_headers.len(),
            UaFamily::ALL.len()
        );
        Ok(Configuration {
            settings: self.settings,
            cached_headers,
        })
    }

    fn ensure_static_csp_mutable(&self) -> Result<(), SecureHeadersError> {
        if self.settings.dynamic_csp.is_some() {
            return Err(SecureHeadersError::IllegalPolicyModification(
                "csp cannot be set while a dynamic policy is active".to_string(),
            ));
        }
        Ok(())
    }
}

/// A validated, compiled configuration. It has no public setters; derive a
/// new one through the registry's `override_config` instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    settings: HeaderSettings,
    cached_headers: HeaderCache,
}

impl Configuration {
    #[inline]
    pub fn hsts(&self) -> &Setting<Hsts> {
        &self.settings.hsts
    }

    #[inline]
    pub fn x_frame_options(&self) -> &Setting<XFrameOptions> {
        &self.settings.x_frame_options
    }

    #[inline]
    pub fn x_content_type_options(&self) -> &Setting<XContentTypeOptions> {
        &self.settings.x_content_type_options
    }

    #[inline]
    pub fn x_xss_protection(&self) -> &Setting<XXssProtection> {
        &self.settings.x_xss_protection
    }

    #[inline]
    pub fn x_download_options(&self) -> &Setting<XDownloadOptions> {
        &self.settings.x_download_options
    }

    #[inline]
    pub fn x_permitted_cross_domain_policies(&self) -> &Setting<XPermittedCrossDomainPolicies> {
        &self.settings.x_permitted_cross_domain_policies
    }

    #[inline]
    pub fn hpkp(&self) -> &Setting<PublicKeyPins> {
        &self.settings.hpkp
    }

    #[inline]
    pub fn csp(&self) -> &Setting<CspPolicy> {
        &self.settings.csp
    }

    #[inline]
    pub fn dynamic_csp(&self) -> Option<&Setting<CspPolicy>> {
        self.settings.dynamic_csp.as_ref()
    }

    /// The dynamic policy when one is set, otherwise the static one.
    #[inline]
    pub fn current_csp(&self) -> &Setting<CspPolicy> {
        self.settings.current_csp()
    }

    #[inline]
    pub fn secure_cookies(&self) -> bool {
        self.settings.secure_cookies
    }

    #[inline]
    pub fn cached_headers(&self) -> &HeaderCache {
        &self.cached_headers
    }

    /// Pre-rendered headers for the browser behind `user_agent`.
    pub fn headers(&self, user_agent: &str) -> Vec<(HeaderName, HeaderValue)> {
        self.cached_headers
            .headers_for(UserAgent::parse(user_agent).family())
    }

    /// A deep copy in the building phase, used to derive overrides.
    pub fn to_builder(&self) -> ConfigurationBuilder {
        ConfigurationBuilder {
            settings: self.settings.clone(),
        }
    }

    pub(crate) fn set_dynamic_csp(&mut self, policy: CspPolicy) {
        self.settings.dynamic_csp = Some(Setting::Set(policy));
    }

    pub(crate) fn opt_out(&mut self, kind: HeaderKind) {
        self.settings.opt_out(kind);
        self.cached_headers.remove(kind);
    }

    pub(crate) fn rebuild_csp_header_cache(&mut self, user_agent: &str) -> Result<(), CspError> {
        let user_agent = UserAgent::parse(user_agent);
        self.settings
            .render_csp_for(&mut self.cached_headers, &user_agent)
    }
}
