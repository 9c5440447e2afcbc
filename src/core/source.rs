use crate::constants::{
    HASH_PREFIX_SHA256, HASH_PREFIX_SHA384, HASH_PREFIX_SHA512, NONCE_PREFIX, NONE_SOURCE,
    REPORT_SAMPLE_SOURCE, SELF_SOURCE, STRICT_DYNAMIC_SOURCE, SUFFIX_QUOTE, UNSAFE_EVAL_SOURCE,
    UNSAFE_HASHES_SOURCE, UNSAFE_INLINE_SOURCE, WASM_UNSAFE_EVAL_SOURCE,
};
use crate::error::CspError;
use crate::utils::BufferWriter;
use bytes::BytesMut;
use std::{
    borrow::Cow,
    fmt,
    hash::{Hash, Hasher},
};

/// Digest named by a hash source. The digest value itself is opaque here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlgorithm {
    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha384 => "sha384",
            HashAlgorithm::Sha512 => "sha512",
        }
    }

    #[inline(always)]
    pub const fn prefix(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => HASH_PREFIX_SHA256,
            HashAlgorithm::Sha384 => HASH_PREFIX_SHA384,
            HashAlgorithm::Sha512 => HASH_PREFIX_SHA512,
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<&str> for HashAlgorithm {
    type Error = CspError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "sha256" => Ok(HashAlgorithm::Sha256),
            "sha384" => Ok(HashAlgorithm::Sha384),
            "sha512" => Ok(HashAlgorithm::Sha512),
            _ => Err(CspError::InvalidHashAlgorithm(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    None,
    Self_,
    UnsafeInline,
    UnsafeEval,
    StrictDynamic,
    ReportSample,
    WasmUnsafeEval,
    UnsafeHashes,
    Host(Cow<'static, str>),
    Scheme(Cow<'static, str>),
    Nonce(Cow<'static, str>),
    Hash {
        algorithm: HashAlgorithm,
        value: Cow<'static, str>,
    },
}

impl Source {
    #[inline(always)]
    pub const fn is_none(&self) -> bool {
        matches!(self, Source::None)
    }

    #[inline(always)]
    pub const fn is_self(&self) -> bool {
        matches!(self, Source::Self_)
    }

    #[inline(always)]
    pub const fn is_unsafe_inline(&self) -> bool {
        matches!(self, Source::UnsafeInline)
    }

    #[inline]
    pub const fn as_static_str(&self) -> Option<&'static str> {
        match self {
            Source::None => Some(NONE_SOURCE),
            Source::Self_ => Some(SELF_SOURCE),
            Source::UnsafeInline => Some(UNSAFE_INLINE_SOURCE),
            Source::UnsafeEval => Some(UNSAFE_EVAL_SOURCE),
            Source::StrictDynamic => Some(STRICT_DYNAMIC_SOURCE),
            Source::ReportSample => Some(REPORT_SAMPLE_SOURCE),
            Source::WasmUnsafeEval => Some(WASM_UNSAFE_EVAL_SOURCE),
            Source::UnsafeHashes => Some(UNSAFE_HASHES_SOURCE),
            _ => None,
        }
    }

    #[inline]
    pub fn estimated_size(&self) -> usize {
        match self {
            Source::Host(host) => host.len(),
            Source::Scheme(scheme) => scheme.len() + 1,
            Source::Nonce(nonce) => NONCE_PREFIX.len() + nonce.len() + SUFFIX_QUOTE.len(),
            Source::Hash { algorithm, value } => {
                algorithm.prefix().len() + value.len() + SUFFIX_QUOTE.len()
            }
            keyword => keyword.as_static_str().map_or(0, str::len),
        }
    }

    #[inline]
    pub fn contains_nonce(&self) -> bool {
        matches!(self, Source::Nonce(_))
    }

    #[inline]
    pub fn contains_hash(&self) -> bool {
        matches!(self, Source::Hash { .. })
    }

    #[inline]
    pub fn nonce(&self) -> Option<&str> {
        match self {
            Source::Nonce(nonce) => Some(nonce),
            _ => None,
        }
    }

    /// Parses a hash source such as `sha256-abc=` or `'sha384-abc='`.
    pub fn parse_hash(raw: &str) -> Result<Self, CspError> {
        let trimmed = raw.trim().trim_matches('\'');
        let (algorithm, value) = trimmed
            .split_once('-')
            .ok_or_else(|| CspError::InvalidDirectiveValue(format!("Malformed hash: {}", raw)))?;
        let algorithm = HashAlgorithm::try_from(algorithm)?;
        if value.is_empty() {
            return Err(CspError::InvalidDirectiveValue(format!(
                "Hash '{}' has no digest",
                raw
            )));
        }
        Ok(Source::Hash {
            algorithm,
            value: Cow::Owned(value.to_owned()),
        })
    }
}

impl From<&str> for Source {
    /// Interprets a source expression the way it would appear in a header.
    fn from(raw: &str) -> Self {
        match raw {
            NONE_SOURCE => Source::None,
            SELF_SOURCE => Source::Self_,
            UNSAFE_INLINE_SOURCE => Source::UnsafeInline,
            UNSAFE_EVAL_SOURCE => Source::UnsafeEval,
            STRICT_DYNAMIC_SOURCE => Source::StrictDynamic,
            REPORT_SAMPLE_SOURCE => Source::ReportSample,
            WASM_UNSAFE_EVAL_SOURCE => Source::WasmUnsafeEval,
            UNSAFE_HASHES_SOURCE => Source::UnsafeHashes,
            _ => {
                if let Some(nonce) = raw
                    .strip_prefix(NONCE_PREFIX)
                    .and_then(|rest| rest.strip_suffix(SUFFIX_QUOTE))
                {
                    return Source::Nonce(Cow::Owned(nonce.to_owned()));
                }
                if raw.starts_with('\'') {
                    if let Ok(hash) = Source::parse_hash(raw) {
                        return hash;
                    }
                }
                match raw.strip_suffix(':') {
                    Some(scheme) if !scheme.contains('/') => {
                        Source::Scheme(Cow::Owned(scheme.to_owned()))
                    }
                    _ => Source::Host(Cow::Owned(raw.to_owned())),
                }
            }
        }
    }
}

impl Hash for Source {
    fn hash<H: Hasher>(&self, state: &mut H) {
        core::mem::discriminant(self).hash(state);
        match self {
            Source::Host(host) => host.hash(state),
            Source::Scheme(scheme) => scheme.hash(state),
            Source::Nonce(nonce) => nonce.hash(state),
            Source::Hash { algorithm, value } => {
                algorithm.hash(state);
                value.hash(state);
            }
            _ => {}
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Host(host) => f.write_str(host),
            Source::Scheme(scheme) => write!(f, "{}:", scheme),
            Source::Nonce(nonce) => write!(f, "{}{}{}", NONCE_PREFIX, nonce, SUFFIX_QUOTE),
            Source::Hash { algorithm, value } => {
                write!(f, "{}{}{}", algorithm.prefix(), value, SUFFIX_QUOTE)
            }
            keyword => f.write_str(keyword.as_static_str().unwrap_or_default()),
        }
    }
}

impl BufferWriter for Source {
    fn write_to_buffer(&self, buffer: &mut BytesMut) {
        match self {
            Source::Host(host) => buffer.extend_from_slice(host.as_bytes()),
            Source::Scheme(scheme) => {
                buffer.extend_from_slice(scheme.as_bytes());
                buffer.extend_from_slice(b":");
            }
            Source::Nonce(nonce) => {
                buffer.reserve(NONCE_PREFIX.len() + nonce.len() + SUFFIX_QUOTE.len());
                buffer.extend_from_slice(NONCE_PREFIX.as_bytes());
                buffer.extend_from_slice(nonce.as_bytes());
                buffer.extend_from_slice(SUFFIX_QUOTE.as_bytes());
            }
            Source::Hash { algorithm, value } => {
                let prefix = algorithm.prefix();
                buffer.reserve(prefix.len() + value.len() + SUFFIX_QUOTE.len());
                buffer.extend_from_slice(prefix.as_bytes());
                buffer.extend_from_slice(value.as_bytes());
                buffer.extend_from_slice(SUFFIX_QUOTE.as_bytes());
            }
            keyword => {
                if let Some(text) = keyword.as_static_str() {
                    buffer.extend_from_slice(text.as_bytes());
                }
            }
        }
    }
}
