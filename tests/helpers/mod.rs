#![allow(dead_code)]

use actix_secure_headers::prelude::*;
use actix_web::http::header::{HeaderName, HeaderValue};

pub const CHROME_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36";
pub const FIREFOX_UA: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14.1; rv:120.0) Gecko/20100101 Firefox/120.0";
pub const SAFARI_UA: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_1 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Mobile/15E148 Safari/604.1";
pub const EDGE_LEGACY_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/64.0.3282.140 Safari/537.36 Edge/17.17134";

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// `default-src 'self'` with nothing else.
pub fn self_only_policy() -> CspPolicy {
    CspPolicyBuilder::new()
        .default_src([Source::Self_])
        .build()
        .expect("valid policy")
}

/// A registry whose `default` uses [`self_only_policy`].
pub fn configured_registry() -> Registry {
    init_logger();
    let registry = Registry::new();
    registry
        .configure(|config| {
            config.csp(self_only_policy())?;
            Ok(())
        })
        .expect("default configuration");
    registry
}

pub fn header<'a>(headers: &'a [(HeaderName, HeaderValue)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(header_name, _)| header_name.as_str() == name)
        .and_then(|(_, value)| value.to_str().ok())
}
