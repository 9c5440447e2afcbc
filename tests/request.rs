mod helpers;

use actix_secure_headers::constants::NOOP_CONFIG;
use actix_secure_headers::prelude::*;
use actix_secure_headers::{CspError, UaFamily};
use helpers::*;
use std::sync::Arc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untouched_request_shares_configuration() {
        let registry = configured_registry();
        let shared = registry.get_default().unwrap();
        let mut request_config = RequestConfig::new(shared.clone());

        let headers = request_config.headers(CHROME_UA).unwrap();

        assert!(!request_config.is_detached(&shared));
        assert_eq!(headers, shared.headers(CHROME_UA));
    }

    #[test]
    fn test_override_leaves_registry_untouched() {
        let registry = configured_registry();
        let shared = registry.get_default().unwrap();
        let mut request_config = RequestConfig::new(shared.clone());

        let policy = CspPolicyBuilder::new()
            .default_src([Source::None])
            .script_src([Source::Self_])
            .build()
            .unwrap();
        request_config.override_csp(policy.clone()).unwrap();
        let headers = request_config.headers(CHROME_UA).unwrap();

        assert!(request_config.is_detached(&shared));
        assert_eq!(
            header(&headers, "content-security-policy"),
            Some("default-src 'none'; script-src 'self'")
        );
        assert_eq!(
            request_config.configuration().current_csp(),
            &Setting::Set(policy)
        );
        assert!(shared.dynamic_csp().is_none());
        assert_eq!(
            shared.cached_headers().csp(UaFamily::Modern).unwrap(),
            "default-src 'self'"
        );
        assert_eq!(*shared, *registry.get_default().unwrap());
    }

    #[test]
    fn test_override_renders_for_request_family() {
        let registry = configured_registry();
        let mut request_config = RequestConfig::new(registry.get_default().unwrap());

        request_config
            .override_csp_with(|policy| {
                policy.append_sources("worker-src", [Source::from("blob:")]);
            })
            .unwrap();

        let edge = request_config.headers(EDGE_LEGACY_UA).unwrap();
        assert_eq!(
            header(&edge, "content-security-policy"),
            Some("default-src 'self'")
        );

        let chrome = request_config.headers(CHROME_UA).unwrap();
        assert_eq!(
            header(&chrome, "content-security-policy"),
            Some("default-src 'self'; worker-src 'self' blob:")
        );
    }

    #[test]
    fn test_invalid_override_rejected() {
        let registry = configured_registry();
        let shared = registry.get_default().unwrap();
        let mut request_config = RequestConfig::new(shared.clone());

        let result = request_config.override_csp(CspPolicy::new());

        assert!(matches!(result, Err(CspError::ValidationError(_))));
        assert!(!request_config.is_detached(&shared));
    }

    #[test]
    fn test_append_to_current_policy() {
        let registry = configured_registry();
        let mut request_config = RequestConfig::new(registry.get_default().unwrap());

        let additions = CspPolicyBuilder::new()
            .script_src([Source::from("cdn.example.com")])
            .build_unchecked();
        request_config.append_csp(&additions).unwrap();
        request_config.append_csp(&additions).unwrap();

        let headers = request_config.headers(FIREFOX_UA).unwrap();
        assert_eq!(
            header(&headers, "content-security-policy"),
            Some("default-src 'self'; script-src 'self' cdn.example.com")
        );
    }

    #[test]
    fn test_append_none_keeps_existing_sources() {
        let registry = configured_registry();
        registry
            .override_default("cdn", |config| {
                config.csp(
                    CspPolicyBuilder::new()
                        .default_src([Source::Self_])
                        .script_src([Source::Self_, Source::from("https://cdn.example.com")])
                        .build()?,
                )?;
                Ok(())
            })
            .unwrap();
        let mut request_config = RequestConfig::new(registry.get("cdn").unwrap().unwrap());

        let additions = CspPolicyBuilder::new()
            .script_src([Source::None])
            .frame_ancestors([Source::None])
            .build_unchecked();
        request_config.append_csp(&additions).unwrap();

        let headers = request_config.headers(CHROME_UA).unwrap();
        assert_eq!(
            header(&headers, "content-security-policy"),
            Some("default-src 'self'; script-src 'self' https://cdn.example.com; frame-ancestors 'none'")
        );
    }

    #[test]
    fn test_override_with_no_directive_for_family() {
        let registry = configured_registry();
        let mut request_config = RequestConfig::new(registry.get_default().unwrap());

        request_config
            .override_csp(
                CspPolicyBuilder::new()
                    .worker_src([Source::Self_])
                    .build()
                    .unwrap(),
            )
            .unwrap();

        let edge = request_config.headers(EDGE_LEGACY_UA).unwrap();
        assert_eq!(header(&edge, "content-security-policy"), None);
        assert!(request_config
            .configuration()
            .cached_headers()
            .get(HeaderKind::ContentSecurityPolicy)
            .unwrap()
            .is_rendered_for(UaFamily::Edge));

        let chrome = request_config.headers(CHROME_UA).unwrap();
        assert_eq!(
            header(&chrome, "content-security-policy"),
            Some("worker-src 'self'")
        );
    }

    #[test]
    fn test_append_to_opted_out_policy() {
        let registry = configured_registry();
        let mut request_config = RequestConfig::new(registry.get(NOOP_CONFIG).unwrap().unwrap());

        let result = request_config.append_csp(&self_only_policy());

        assert!(matches!(
            result,
            Err(SecureHeadersError::IllegalPolicyModification(_))
        ));
    }

    #[test]
    fn test_script_nonce_is_stable_per_request() {
        let registry = configured_registry();
        let mut request_config = RequestConfig::new(registry.get_default().unwrap());

        let nonce = request_config.csp_script_nonce().unwrap();
        assert_eq!(request_config.csp_script_nonce().unwrap(), nonce);
        assert_eq!(request_config.script_nonce(), Some(nonce.as_str()));

        let headers = request_config.headers(SAFARI_UA).unwrap();
        assert_eq!(
            header(&headers, "content-security-policy").unwrap(),
            format!("default-src 'self'; script-src 'self' 'nonce-{}'", nonce)
        );
    }

    #[test]
    fn test_style_nonce() {
        let registry = configured_registry();
        let mut request_config = RequestConfig::new(registry.get_default().unwrap());

        let script = request_config.csp_script_nonce().unwrap();
        let style = request_config.csp_style_nonce().unwrap();
        assert_ne!(script, style);

        let headers = request_config.headers(CHROME_UA).unwrap();
        assert_eq!(
            header(&headers, "content-security-policy").unwrap(),
            format!(
                "default-src 'self'; script-src 'self' 'nonce-{}'; style-src 'self' 'nonce-{}'",
                script, style
            )
        );
    }

    #[test]
    fn test_nonces_follow_configuration_switch() {
        let registry = configured_registry();
        registry
            .override_default("strict", |config| {
                config.csp(
                    CspPolicyBuilder::new()
                        .default_src([Source::None])
                        .build()?,
                )?;
                Ok(())
            })
            .unwrap();
        let mut request_config = RequestConfig::new(registry.get_default().unwrap());

        let nonce = request_config.csp_script_nonce().unwrap();
        request_config
            .use_configuration(registry.get("strict").unwrap().unwrap())
            .unwrap();

        let headers = request_config.headers(CHROME_UA).unwrap();
        assert_eq!(
            header(&headers, "content-security-policy").unwrap(),
            format!("default-src 'none'; script-src 'nonce-{}'", nonce)
        );
    }

    #[test]
    fn test_nonce_with_opted_out_csp() {
        let registry = configured_registry();
        let mut request_config = RequestConfig::new(registry.get_default().unwrap());
        request_config.opt_out(HeaderKind::ContentSecurityPolicy);

        assert!(request_config.csp_script_nonce().is_ok());
        let headers = request_config.headers(CHROME_UA).unwrap();
        assert_eq!(header(&headers, "content-security-policy"), None);
    }

    #[test]
    fn test_request_opt_out() {
        let registry = configured_registry();
        let shared = registry.get_default().unwrap();
        let mut request_config = RequestConfig::new(shared.clone());

        request_config.opt_out(HeaderKind::XFrameOptions);
        let headers = request_config.headers(CHROME_UA).unwrap();

        assert_eq!(header(&headers, "x-frame-options"), None);
        assert_eq!(headers.len(), shared.headers(CHROME_UA).len() - 1);
        assert!(shared.cached_headers().contains(HeaderKind::XFrameOptions));
    }

    #[test]
    fn test_rebuild_csp_header_cache() {
        let registry = configured_registry();
        let mut request_config = RequestConfig::new(registry.get_default().unwrap());

        request_config.rebuild_csp_header_cache(SAFARI_UA).unwrap();
        let cache = request_config.configuration().cached_headers();

        assert!(cache.csp(UaFamily::Safari).is_some());
        assert!(cache.csp(UaFamily::Modern).is_none());

        let headers = request_config.headers(CHROME_UA).unwrap();
        assert_eq!(
            header(&headers, "content-security-policy"),
            Some("default-src 'self'")
        );
    }

    #[test]
    fn test_concurrent_requests_are_isolated() {
        let registry = Arc::new(configured_registry());

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let registry = registry.clone();
                std::thread::spawn(move || {
                    let host = format!("cdn{}.example.com", i);
                    let mut request_config = RequestConfig::new(registry.get_default().unwrap());
                    request_config
                        .override_csp_with(|policy| {
                            policy.append_sources("img-src", [Source::from(host.as_str())]);
                        })
                        .unwrap();
                    let headers = request_config.headers(CHROME_UA).unwrap();
                    assert_eq!(
                        header(&headers, "content-security-policy").unwrap(),
                        format!("default-src 'self'; img-src 'self' {}", host)
                    );
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(
            registry
                .get_default()
                .unwrap()
                .cached_headers()
                .csp(UaFamily::Modern)
                .unwrap(),
            "default-src 'self'"
        );
    }
}
