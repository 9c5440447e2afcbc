use crate::constants;
use crate::core::source::Source;
use crate::error::CspError;
use crate::user_agent::UaFamily;
use crate::utils::BufferWriter;
use bytes::BytesMut;
use indexmap::IndexSet;
use rustc_hash::FxHasher;
use smallvec::SmallVec;
use std::{
    borrow::Cow,
    fmt,
    hash::{BuildHasherDefault, Hash, Hasher},
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Directive {
    name: Cow<'static, str>,
    sources: SmallVec<[Source; 4]>,
}

impl Directive {
    #[inline]
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            sources: SmallVec::new(),
        }
    }

    /// `'none'` replaces every other source, and any later source replaces `'none'`.
    pub fn add_source(&mut self, source: Source) -> &mut Self {
        if source.is_none() {
            self.sources.clear();
            self.sources.push(source);
        } else if !self.sources.is_empty() && self.sources[0].is_none() {
            self.sources.clear();
            self.sources.push(source);
        } else if !self.sources.iter().any(|s| s == &source) {
            self.sources.push(source);
        }
        self
    }

    pub fn add_sources<I>(&mut self, sources: I) -> &mut Self
    where
        I: IntoIterator<Item = Source>,
    {
        for source in sources {
            self.add_source(source);
        }
        self
    }

    pub fn merge(&mut self, other: &Directive) -> &mut Self {
        self.add_sources(other.sources.iter().cloned())
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    pub fn validate(&self) -> Result<(), CspError> {
        if self.name.is_empty()
            || !self
                .name
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b == b'-')
        {
            return Err(CspError::InvalidDirectiveName(self.name.to_string()));
        }

        if self.sources.len() > 1 && self.sources.iter().any(|s| s.is_none()) {
            return Err(CspError::ValidationError(format!(
                "Directive '{}' contains 'none' with other sources",
                self.name
            )));
        }

        for source in &self.sources {
            match source {
                Source::Host(host) if host.is_empty() || host.contains([';', ',', ' ']) => {
                    return Err(CspError::InvalidDirectiveValue(format!(
                        "Directive '{}' contains invalid host '{}'",
                        self.name, host
                    )));
                }
                Source::Scheme(scheme) if scheme.is_empty() => {
                    return Err(CspError::ValidationError(format!(
                        "Directive '{}' contains empty scheme",
                        self.name
                    )));
                }
                Source::Nonce(nonce) if nonce.is_empty() => {
                    return Err(CspError::InvalidNonceValue(format!(
                        "Directive '{}' contains empty nonce",
                        self.name
                    )));
                }
                Source::Hash { value, .. } if value.is_empty() => {
                    return Err(CspError::ValidationError(format!(
                        "Directive '{}' contains empty hash",
                        self.name
                    )));
                }
                _ => {}
            }
        }

        Ok(())
    }

    #[inline]
    pub fn estimated_size(&self) -> usize {
        let mut size = self.name.len();

        if !self.sources.is_empty() {
            size += 1;
            size += self
                .sources
                .iter()
                .map(|s| s.estimated_size())
                .sum::<usize>();
            size += self.sources.len().saturating_sub(1);
        }

        size
    }

    #[inline]
    pub fn contains_nonce(&self) -> bool {
        self.sources.iter().any(|s| s.contains_nonce())
    }

    #[inline]
    pub fn contains_hash(&self) -> bool {
        self.sources.iter().any(|s| s.contains_hash())
    }

    /// Writes the directive as `family` understands it. Returns `false` when
    /// nothing was written.
    pub(crate) fn write_for_family(&self, buffer: &mut BytesMut, family: UaFamily) -> bool {
        if !family.supports_directive(&self.name) {
            return false;
        }

        let supported: SmallVec<[&Source; 4]> = self
            .sources
            .iter()
            .filter(|s| family.supports_source(s))
            .collect();

        // Without any of its sources the browser falls back to default-src.
        if !self.sources.is_empty() && supported.is_empty() {
            return false;
        }

        buffer.extend_from_slice(self.name.as_bytes());
        for source in supported {
            buffer.extend_from_slice(b" ");
            source.write_to_buffer(buffer);
        }
        true
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        for source in &self.sources {
            write!(f, " {}", source)?;
        }
        Ok(())
    }
}

impl Hash for Directive {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.sources.hash(state);
    }
}

pub trait DirectiveSpec: Sized {
    const NAME: &'static str;

    fn add_source(mut self, source: Source) -> Self {
        self.inner_mut().add_source(source);
        self
    }

    fn add_sources<I>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = Source>,
    {
        self.inner_mut().add_sources(sources);
        self
    }

    fn inner_mut(&mut self) -> &mut Directive;

    fn build(self) -> Directive;
}

macro_rules! define_directive {
    ($name:ident, $directive_name:expr) => {
        #[derive(Debug, Clone)]
        pub struct $name {
            directive: Directive,
        }

        impl $name {
            #[inline]
            pub fn new() -> Self {
                Self {
                    directive: Directive::new($directive_name),
                }
            }
        }

        impl Default for $name {
            #[inline]
            fn default() -> Self {
                Self::new()
            }
        }

        impl DirectiveSpec for $name {
            const NAME: &'static str = $directive_name;

            #[inline]
            fn inner_mut(&mut self) -> &mut Directive {
                &mut self.directive
            }

            #[inline]
            fn build(self) -> Directive {
                self.directive
            }
        }
    };
}

define_directive!(DefaultSrc, constants::DEFAULT_SRC);
define_directive!(ScriptSrc, constants::SCRIPT_SRC);
define_directive!(StyleSrc, constants::STYLE_SRC);
define_directive!(ImgSrc, constants::IMG_SRC);
define_directive!(ConnectSrc, constants::CONNECT_SRC);
define_directive!(FontSrc, constants::FONT_SRC);
define_directive!(ObjectSrc, constants::OBJECT_SRC);
define_directive!(MediaSrc, constants::MEDIA_SRC);
define_directive!(FrameSrc, constants::FRAME_SRC);
define_directive!(WorkerSrc, constants::WORKER_SRC);
define_directive!(ManifestSrc, constants::MANIFEST_SRC);
define_directive!(ChildSrc, constants::CHILD_SRC);
define_directive!(FrameAncestors, constants::FRAME_ANCESTORS);
define_directive!(BaseUri, constants::BASE_URI);
define_directive!(FormAction, constants::FORM_ACTION);
define_directive!(ScriptSrcElem, constants::SCRIPT_SRC_ELEM);
define_directive!(ScriptSrcAttr, constants::SCRIPT_SRC_ATTR);
define_directive!(StyleSrcElem, constants::STYLE_SRC_ELEM);
define_directive!(StyleSrcAttr, constants::STYLE_SRC_ATTR);
define_directive!(PrefetchSrc, constants::PREFETCH_SRC);

#[derive(Debug, Default, Clone)]
pub struct Sandbox {
    values: IndexSet<Cow<'static, str>, BuildHasherDefault<FxHasher>>,
}

impl Sandbox {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn allow_forms(self) -> Self {
        self.add_value("allow-forms")
    }

    #[inline]
    pub fn allow_same_origin(self) -> Self {
        self.add_value("allow-same-origin")
    }

    #[inline]
    pub fn allow_scripts(self) -> Self {
        self.add_value("allow-scripts")
    }

    #[inline]
    pub fn allow_popups(self) -> Self {
        self.add_value("allow-popups")
    }

    #[inline]
    pub fn allow_modals(self) -> Self {
        self.add_value("allow-modals")
    }

    #[inline]
    pub fn allow_top_navigation(self) -> Self {
        self.add_value("allow-top-navigation")
    }

    pub fn add_value(mut self, value: impl Into<Cow<'static, str>>) -> Self {
        self.values.insert(value.into());
        self
    }

    pub fn build(self) -> Directive {
        let mut directive = Directive::new(constants::SANDBOX);
        for value in self.values {
            directive.add_source(Source::Host(value));
        }
        directive
    }
}
