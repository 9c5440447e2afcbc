use crate::constants::{
    BLOCK_ALL_MIXED_CONTENT, DEFAULT_BUFFER_CAPACITY, DEFAULT_SRC, HEADER_CSP,
    HEADER_CSP_REPORT_ONLY, REPORT_TO, REPORT_URI, REQUIRE_TRUSTED_TYPES_FOR, SEMICOLON_SPACE,
    TRUSTED_TYPES, UPGRADE_INSECURE_REQUESTS,
};
use crate::core::directives::{
    DefaultSrc, Directive, DirectiveSpec, ImgSrc, ObjectSrc, Sandbox, ScriptSrc, StyleSrc,
};
use crate::core::source::Source;
use crate::error::CspError;
use crate::user_agent::{UaFamily, UserAgent};
use actix_web::http::header::{HeaderName, HeaderValue};
use bytes::BytesMut;
use indexmap::IndexMap;
use std::{
    borrow::Cow,
    hash::{Hash, Hasher},
};

/// A Content-Security-Policy: directives in insertion order plus reporting
/// metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CspPolicy {
    directives: IndexMap<Cow<'static, str>, Directive>,
    report_only: bool,
    report_uri: Option<Cow<'static, str>>,
    report_to: Option<Cow<'static, str>>,
}

impl CspPolicy {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// The policy every fresh configuration starts from:
    /// `default-src https:; img-src https: data: 'self'; object-src 'none';
    /// script-src https:; style-src 'self' 'unsafe-inline' https:`.
    pub fn secure_default() -> Self {
        let https = || Source::Scheme(Cow::Borrowed("https"));
        CspPolicyBuilder::new()
            .add_directive(DefaultSrc::new().add_source(https()))
            .add_directive(ImgSrc::new().add_sources([
                https(),
                Source::Scheme(Cow::Borrowed("data")),
                Source::Self_,
            ]))
            .add_directive(ObjectSrc::new().add_source(Source::None))
            .add_directive(ScriptSrc::new().add_source(https()))
            .add_directive(StyleSrc::new().add_sources([
                Source::Self_,
                Source::UnsafeInline,
                https(),
            ]))
            .build_unchecked()
    }

    /// Inserts `directive`, replacing any directive of the same name.
    pub fn add_directive(&mut self, directive: Directive) -> &mut Self {
        let name = directive.name().to_owned();
        self.directives.insert(Cow::Owned(name), directive);
        self
    }

    pub fn remove_directive(&mut self, name: &str) -> Option<Directive> {
        self.directives.shift_remove(name)
    }

    /// Adds `sources` to the named directive. A fetch directive the policy
    /// does not have yet starts from the `default-src` sources, so appending
    /// never loosens what `default-src` already allowed for it.
    pub fn append_sources<I>(&mut self, name: &str, sources: I) -> &mut Self
    where
        I: IntoIterator<Item = Source>,
    {
        self.directive_entry(name).add_sources(sources);
        self
    }

    /// Merges `additions` into this policy: directive sources are appended,
    /// reporting settings present on `additions` win. `'none'` only lands in
    /// a directive that has no sources yet, so merging never removes any.
    pub fn merge(&mut self, additions: &CspPolicy) -> &mut Self {
        for addition in additions.directives.values() {
            let directive = self.directive_entry(addition.name());
            let has_sources = !directive.sources().is_empty();
            directive.add_sources(
                addition
                    .sources()
                    .iter()
                    .filter(|source| !(has_sources && source.is_none()))
                    .cloned(),
            );
        }
        if additions.report_only {
            self.report_only = true;
        }
        if let Some(uri) = &additions.report_uri {
            self.report_uri = Some(uri.clone());
        }
        if let Some(endpoint) = &additions.report_to {
            self.report_to = Some(endpoint.clone());
        }
        self
    }

    #[inline]
    pub fn set_report_only(&mut self, report_only: bool) -> &mut Self {
        self.report_only = report_only;
        self
    }

    pub fn set_report_uri(&mut self, uri: impl Into<Cow<'static, str>>) -> &mut Self {
        self.report_uri = Some(uri.into());
        self
    }

    pub fn set_report_to(&mut self, endpoint: impl Into<Cow<'static, str>>) -> &mut Self {
        self.report_to = Some(endpoint.into());
        self
    }

    #[inline]
    pub fn header_name(&self) -> HeaderName {
        if self.report_only {
            HeaderName::from_static(HEADER_CSP_REPORT_ONLY)
        } else {
            HeaderName::from_static(HEADER_CSP)
        }
    }

    /// Serializes the policy the way `user_agent`'s family understands it.
    pub fn render(&self, user_agent: &UserAgent) -> Result<HeaderValue, CspError> {
        let family = user_agent.family();
        let capacity = self.estimated_size().max(DEFAULT_BUFFER_CAPACITY);
        let mut buffer = BytesMut::with_capacity(capacity);

        for directive in self.directives.values() {
            let mark = buffer.len();
            if mark > 0 {
                buffer.extend_from_slice(SEMICOLON_SPACE);
            }
            if !directive.write_for_family(&mut buffer, family) {
                buffer.truncate(mark);
            }
        }

        if let Some(uri) = &self.report_uri {
            write_reporting(&mut buffer, REPORT_URI, uri);
        }

        if let Some(endpoint) = &self.report_to {
            if family.supports_directive(REPORT_TO) {
                write_reporting(&mut buffer, REPORT_TO, endpoint);
            }
        }

        HeaderValue::from_maybe_shared(buffer.freeze()).map_err(|_| {
            CspError::HeaderError("Rendered policy is not a valid header value".to_string())
        })
    }

    /// Renders the policy for browsers with full CSP support.
    #[inline]
    pub fn header_value(&self) -> Result<HeaderValue, CspError> {
        self.render(&UserAgent::parse(UaFamily::Modern.representative_user_agent()))
    }

    pub fn validate(&self) -> Result<(), CspError> {
        if self.directives.is_empty() {
            return Err(CspError::ValidationError(
                "Policy must contain at least one directive".to_string(),
            ));
        }

        for directive in self.directives.values() {
            directive.validate()?;
        }

        if let Some(uri) = &self.report_uri {
            if !uri.starts_with('/') && url::Url::parse(uri).is_err() {
                return Err(CspError::InvalidReportUri(uri.to_string()));
            }
        }

        if let Some(endpoint) = &self.report_to {
            if endpoint.is_empty() || endpoint.contains(char::is_whitespace) {
                return Err(CspError::InvalidDirectiveValue(format!(
                    "Invalid report-to group '{}'",
                    endpoint
                )));
            }
        }

        Ok(())
    }

    #[inline]
    pub fn get_directive(&self, name: &str) -> Option<&Directive> {
        self.directives.get(name)
    }

    #[inline]
    pub fn is_report_only(&self) -> bool {
        self.report_only
    }

    #[inline]
    pub fn directives(&self) -> impl Iterator<Item = &Directive> {
        self.directives.values()
    }

    #[inline]
    pub fn report_uri(&self) -> Option<&str> {
        self.report_uri.as_deref()
    }

    #[inline]
    pub fn report_to(&self) -> Option<&str> {
        self.report_to.as_deref()
    }

    #[inline]
    pub fn contains_nonce(&self) -> bool {
        self.directives.values().any(|d| d.contains_nonce())
    }

    #[inline]
    pub fn contains_hash(&self) -> bool {
        self.directives.values().any(|d| d.contains_hash())
    }

    fn estimated_size(&self) -> usize {
        let directives: usize = self
            .directives
            .values()
            .map(|d| d.estimated_size() + SEMICOLON_SPACE.len())
            .sum();
        let reporting = self.report_uri.as_ref().map_or(0, |u| u.len() + 16)
            + self.report_to.as_ref().map_or(0, |e| e.len() + 16);
        directives + reporting
    }

    /// The named directive, inserted if missing. A new fetch directive starts
    /// from the `default-src` sources.
    fn directive_entry(&mut self, name: &str) -> &mut Directive {
        let seed = if self.directives.contains_key(name)
            || !name.ends_with("-src")
            || name == DEFAULT_SRC
        {
            None
        } else {
            self.directives.get(DEFAULT_SRC).cloned()
        };
        self.directives
            .entry(Cow::Owned(name.to_owned()))
            .or_insert_with(|| {
                let mut directive = Directive::new(Cow::Owned(name.to_owned()));
                if let Some(default_src) = &seed {
                    directive.merge(default_src);
                }
                directive
            })
    }
}

fn write_reporting(buffer: &mut BytesMut, name: &str, value: &str) {
    if !buffer.is_empty() {
        buffer.extend_from_slice(SEMICOLON_SPACE);
    }
    buffer.extend_from_slice(name.as_bytes());
    buffer.extend_from_slice(b" ");
    buffer.extend_from_slice(value.as_bytes());
}

impl Hash for CspPolicy {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.directives.len().hash(state);
        for (name, directive) in &self.directives {
            name.hash(state);
            directive.hash(state);
        }
        self.report_only.hash(state);
        self.report_uri.hash(state);
        self.report_to.hash(state);
    }
}

#[derive(Debug, Default)]
pub struct CspPolicyBuilder {
    policy: CspPolicy,
}

impl CspPolicyBuilder {
    #[inline]
    pub fn new() -> Self {
        Self {
            policy: CspPolicy::new(),
        }
    }

    pub fn add_directive<D: DirectiveSpec>(mut self, directive_builder: D) -> Self {
        self.policy.add_directive(directive_builder.build());
        self
    }

    #[inline]
    pub fn with_directive(mut self, directive: Directive) -> Self {
        self.policy.add_directive(directive);
        self
    }

    pub fn default_src(self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.add_directive(DefaultSrc::new().add_sources(sources))
    }

    pub fn script_src(self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.add_directive(ScriptSrc::new().add_sources(sources))
    }

    pub fn style_src(self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.add_directive(StyleSrc::new().add_sources(sources))
    }

    pub fn img_src(self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.add_directive(ImgSrc::new().add_sources(sources))
    }

    pub fn connect_src(self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.add_directive(crate::core::directives::ConnectSrc::new().add_sources(sources))
    }

    pub fn font_src(self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.add_directive(crate::core::directives::FontSrc::new().add_sources(sources))
    }

    pub fn object_src(self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.add_directive(ObjectSrc::new().add_sources(sources))
    }

    pub fn media_src(self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.add_directive(crate::core::directives::MediaSrc::new().add_sources(sources))
    }

    pub fn frame_src(self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.add_directive(crate::core::directives::FrameSrc::new().add_sources(sources))
    }

    pub fn worker_src(self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.add_directive(crate::core::directives::WorkerSrc::new().add_sources(sources))
    }

    pub fn manifest_src(self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.add_directive(crate::core::directives::ManifestSrc::new().add_sources(sources))
    }

    pub fn child_src(self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.add_directive(crate::core::directives::ChildSrc::new().add_sources(sources))
    }

    pub fn frame_ancestors(self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.add_directive(crate::core::directives::FrameAncestors::new().add_sources(sources))
    }

    pub fn base_uri(self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.add_directive(crate::core::directives::BaseUri::new().add_sources(sources))
    }

    pub fn form_action(self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.add_directive(crate::core::directives::FormAction::new().add_sources(sources))
    }

    pub fn sandbox(self, sandbox_builder: Sandbox) -> Self {
        self.with_directive(sandbox_builder.build())
    }

    pub fn upgrade_insecure_requests(self) -> Self {
        self.with_directive(Directive::new(UPGRADE_INSECURE_REQUESTS))
    }

    pub fn block_all_mixed_content(self) -> Self {
        self.with_directive(Directive::new(BLOCK_ALL_MIXED_CONTENT))
    }

    pub fn require_trusted_types_for(
        self,
        contexts: impl IntoIterator<Item = impl Into<Cow<'static, str>>>,
    ) -> Self {
        let mut directive = Directive::new(REQUIRE_TRUSTED_TYPES_FOR);
        for context in contexts {
            directive.add_source(Source::Host(context.into()));
        }
        self.with_directive(directive)
    }

    pub fn trusted_types(
        self,
        policies: impl IntoIterator<Item = impl Into<Cow<'static, str>>>,
    ) -> Self {
        let mut directive = Directive::new(TRUSTED_TYPES);
        for policy in policies {
            directive.add_source(Source::Host(policy.into()));
        }
        self.with_directive(directive)
    }

    #[inline]
    pub fn report_uri(mut self, uri: impl Into<Cow<'static, str>>) -> Self {
        self.policy.set_report_uri(uri);
        self
    }

    #[inline]
    pub fn report_to(mut self, endpoint: impl Into<Cow<'static, str>>) -> Self {
        self.policy.set_report_to(endpoint);
        self
    }

    #[inline]
    pub fn report_only(mut self, enabled: bool) -> Self {
        self.policy.set_report_only(enabled);
        self
    }

    pub fn build(self) -> Result<CspPolicy, CspError> {
        self.policy.validate()?;
        Ok(self.policy)
    }

    #[inline]
    pub fn build_unchecked(self) -> CspPolicy {
        self.policy
    }
}
