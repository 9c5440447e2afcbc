//! Browser families that differ in which parts of Content-Security-Policy
//! they understand, and the user-agent parser that buckets requests into
//! them.

use crate::constants::{
    MANIFEST_SRC, PREFETCH_SRC, REPORT_TO, REQUIRE_TRUSTED_TYPES_FOR, SCRIPT_SRC_ATTR,
    SCRIPT_SRC_ELEM, STYLE_SRC_ATTR, STYLE_SRC_ELEM, TRUSTED_TYPES, WORKER_SRC,
};
use crate::core::source::Source;
use std::fmt;

const FIREFOX_UNSUPPORTED_DIRECTIVES: &[&str] =
    &[REQUIRE_TRUSTED_TYPES_FOR, TRUSTED_TYPES, PREFETCH_SRC];

const SAFARI_UNSUPPORTED_DIRECTIVES: &[&str] = &[
    REQUIRE_TRUSTED_TYPES_FOR,
    TRUSTED_TYPES,
    PREFETCH_SRC,
    REPORT_TO,
];

const EDGE_UNSUPPORTED_DIRECTIVES: &[&str] = &[
    REQUIRE_TRUSTED_TYPES_FOR,
    TRUSTED_TYPES,
    PREFETCH_SRC,
    REPORT_TO,
    WORKER_SRC,
    MANIFEST_SRC,
    SCRIPT_SRC_ELEM,
    SCRIPT_SRC_ATTR,
    STYLE_SRC_ELEM,
    STYLE_SRC_ATTR,
];

/// A bucket of user agents sharing the same CSP support level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UaFamily {
    /// Chromium based browsers and anything unrecognised.
    Modern,
    Firefox,
    Safari,
    /// The pre-Chromium EdgeHTML engine.
    Edge,
}

impl UaFamily {
    /// Every family, in the order variants are compiled.
    pub const ALL: [UaFamily; 4] = [
        UaFamily::Modern,
        UaFamily::Firefox,
        UaFamily::Safari,
        UaFamily::Edge,
    ];

    #[inline]
    pub const fn key(&self) -> &'static str {
        match self {
            UaFamily::Modern => "modern",
            UaFamily::Firefox => "firefox",
            UaFamily::Safari => "safari",
            UaFamily::Edge => "edge",
        }
    }

    /// A real user agent string of this family, parsed at compile time to
    /// render the family's cached CSP value.
    pub const fn representative_user_agent(&self) -> &'static str {
        match self {
            UaFamily::Modern => {
                "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
            }
            UaFamily::Firefox => {
                "Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0"
            }
            UaFamily::Safari => {
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15"
            }
            UaFamily::Edge => {
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/70.0.3538.102 Safari/537.36 Edge/18.19042"
            }
        }
    }

    fn unsupported_directives(&self) -> &'static [&'static str] {
        match self {
            UaFamily::Modern => &[],
            UaFamily::Firefox => FIREFOX_UNSUPPORTED_DIRECTIVES,
            UaFamily::Safari => SAFARI_UNSUPPORTED_DIRECTIVES,
            UaFamily::Edge => EDGE_UNSUPPORTED_DIRECTIVES,
        }
    }

    #[inline]
    pub fn supports_directive(&self, name: &str) -> bool {
        !self.unsupported_directives().contains(&name)
    }

    #[inline]
    pub fn supports_source(&self, source: &Source) -> bool {
        match self {
            UaFamily::Edge => !matches!(
                source,
                Source::StrictDynamic
                    | Source::WasmUnsafeEval
                    | Source::UnsafeHashes
                    | Source::ReportSample
            ),
            _ => true,
        }
    }
}

impl fmt::Display for UaFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// What the CSP renderer needs to know about a requesting browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAgent {
    family: UaFamily,
    browser: &'static str,
    major_version: Option<u32>,
}

impl UserAgent {
    /// Buckets a raw `User-Agent` value. Never fails: empty or unrecognised
    /// input resolves to [`UaFamily::Modern`].
    pub fn parse(raw: &str) -> Self {
        // Order matters: Chromium UAs also mention Safari, EdgeHTML mentions Chrome.
        const MATCHERS: &[(&str, &str, UaFamily)] = &[
            ("Edge/", "Edge", UaFamily::Edge),
            ("Edg/", "Edge", UaFamily::Modern),
            ("OPR/", "Opera", UaFamily::Modern),
            ("FxiOS/", "Firefox", UaFamily::Firefox),
            ("Firefox/", "Firefox", UaFamily::Firefox),
            ("CriOS/", "Chrome", UaFamily::Modern),
            ("Chromium/", "Chromium", UaFamily::Modern),
            ("Chrome/", "Chrome", UaFamily::Modern),
        ];

        for (token, browser, family) in MATCHERS {
            if let Some(version) = version_after(raw, token) {
                return Self::resolved(*family, *browser, version);
            }
        }

        if raw.contains("Safari/") {
            if let Some(version) = version_after(raw, "Version/") {
                return Self::resolved(UaFamily::Safari, "Safari", version);
            }
        }

        log::trace!("Unrecognised user agent {:?}, using modern family", raw);
        Self {
            family: UaFamily::Modern,
            browser: "Unknown",
            major_version: None,
        }
    }

    fn resolved(family: UaFamily, browser: &'static str, major_version: Option<u32>) -> Self {
        log::trace!("Resolved user agent to {} ({})", browser, family);
        Self {
            family,
            browser,
            major_version,
        }
    }

    #[inline]
    pub fn family(&self) -> UaFamily {
        self.family
    }

    #[inline]
    pub fn browser(&self) -> &'static str {
        self.browser
    }

    #[inline]
    pub fn major_version(&self) -> Option<u32> {
        self.major_version
    }
}

impl Default for UserAgent {
    fn default() -> Self {
        Self::parse("")
    }
}

/// `Some(major)` when `token` occurs in `raw`; the inner option is `None` if
/// no numeric version follows the token.
fn version_after(raw: &str, token: &str) -> Option<Option<u32>> {
    let start = raw.find(token)? + token.len();
    let digits: &str = {
        let rest = &raw[start..];
        let end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        &rest[..end]
    };
    Some(digits.parse().ok())
}
