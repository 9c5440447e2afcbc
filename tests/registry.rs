mod helpers;

use actix_secure_headers::constants::{DEFAULT_CONFIG, NOOP_CONFIG};
use actix_secure_headers::prelude::*;
use actix_secure_headers::{SecureHeader, UaFamily};
use helpers::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_before_any_registration() {
        let registry = Registry::new();

        assert!(!registry.is_configured());
        assert!(matches!(
            registry.get(DEFAULT_CONFIG),
            Err(SecureHeadersError::NotYetConfigured(_))
        ));
        assert!(matches!(
            registry.get_default(),
            Err(SecureHeadersError::NotYetConfigured(_))
        ));
    }

    #[test]
    fn test_configure_end_to_end() {
        init_logger();
        let registry = Registry::new();
        registry
            .configure(|config| {
                config.hsts(Hsts::new(100));
                config.csp(self_only_policy())?;
                Ok(())
            })
            .unwrap();

        let config = registry.get_default().unwrap();
        let cache = config.cached_headers();

        let (hsts_name, hsts_value) = Hsts::new(100).make_header().unwrap();
        assert_eq!(hsts_value, "max-age=100");
        let hsts = cache.get(HeaderKind::Hsts).unwrap();
        assert_eq!(hsts.name(), &hsts_name);
        assert_eq!(hsts.value_for(UaFamily::Modern), Some(&hsts_value));

        assert_eq!(cache.csp(UaFamily::Modern).unwrap(), "default-src 'self'");
    }

    #[test]
    fn test_configure_creates_noop() {
        let registry = configured_registry();

        assert_eq!(registry.names(), vec![DEFAULT_CONFIG, NOOP_CONFIG]);
    }

    #[test]
    fn test_noop_configuration_sends_nothing() {
        let registry = configured_registry();
        let noop = registry.get(NOOP_CONFIG).unwrap().unwrap();

        assert!(noop.cached_headers().is_empty());
        for kind in HeaderKind::ALL {
            assert!(!noop.cached_headers().contains(kind), "{} is cached", kind);
        }
        assert!(noop.headers(CHROME_UA).is_empty());
        assert!(noop.current_csp().is_opt_out());
    }

    #[test]
    fn test_define_uses_defaults() {
        init_logger();
        let registry = Registry::new();
        let config = registry.define("plain", |_| Ok(())).unwrap();

        assert_eq!(config.hsts(), &Setting::Set(Hsts::default()));
        assert!(config.hpkp().is_opt_out());
        assert!(!config.secure_cookies());
        assert!(registry.get(NOOP_CONFIG).unwrap().is_some());
        assert!(registry.get(DEFAULT_CONFIG).unwrap().is_none());
    }

    #[test]
    fn test_unknown_name_is_none() {
        let registry = configured_registry();

        assert!(registry.get("missing").unwrap().is_none());
    }

    #[test]
    fn test_define_rejects_existing_name() {
        let registry = configured_registry();
        registry.define("api", |_| Ok(())).unwrap();

        let result = registry.define("api", |config| {
            config.opt_out(HeaderKind::Hsts);
            Ok(())
        });

        assert!(matches!(result, Err(SecureHeadersError::AlreadyDefined(name)) if name == "api"));
        let api = registry.get("api").unwrap().unwrap();
        assert!(api.cached_headers().contains(HeaderKind::Hsts));
    }

    #[test]
    fn test_reserved_noop_name() {
        let registry = configured_registry();

        let result = registry.define(NOOP_CONFIG, |_| Ok(()));
        assert!(matches!(result, Err(SecureHeadersError::AlreadyDefined(_))));
    }

    #[test]
    fn test_registration_inside_closure() {
        let registry = configured_registry();

        registry
            .define("outer", |_| {
                registry.define("inner", |_| Ok(()))?;
                Ok(())
            })
            .unwrap();
        assert!(registry.get("outer").unwrap().is_some());
        assert!(registry.get("inner").unwrap().is_some());

        let result = registry.define("twice", |_| {
            registry.define("twice", |config| {
                config.opt_out(HeaderKind::Hsts);
                Ok(())
            })?;
            Ok(())
        });
        assert!(matches!(result, Err(SecureHeadersError::AlreadyDefined(name)) if name == "twice"));
        let twice = registry.get("twice").unwrap().unwrap();
        assert!(!twice.cached_headers().contains(HeaderKind::Hsts));
    }

    #[test]
    fn test_configure_replaces_default() {
        let registry = configured_registry();
        registry
            .configure(|config| {
                config.hsts(Hsts::new(42));
                Ok(())
            })
            .unwrap();

        let config = registry.get_default().unwrap();
        assert_eq!(config.hsts(), &Setting::Set(Hsts::new(42)));
        assert_eq!(
            config.cached_headers().csp(UaFamily::Modern).unwrap(),
            &CspPolicy::secure_default().header_value().unwrap()
        );
    }

    #[test]
    fn test_override_requires_base() {
        let registry = configured_registry();

        let result = registry.override_config("child", "nope", |_| Ok(()));
        assert!(matches!(result, Err(SecureHeadersError::NotYetConfigured(_))));
        assert!(registry.get("child").unwrap().is_none());
    }

    #[test]
    fn test_override_before_configure() {
        let registry = Registry::new();

        let result = registry.override_default("child", |_| Ok(()));
        assert!(matches!(result, Err(SecureHeadersError::NotYetConfigured(_))));
    }

    #[test]
    fn test_override_isolation() {
        let registry = configured_registry();
        let before = registry.get_default().unwrap();

        registry
            .override_default("no_hsts", |config| {
                config.opt_out(HeaderKind::Hsts);
                if let Setting::Set(policy) = config.csp_mut()? {
                    policy.append_sources("script-src", [Source::from("cdn.example.com")]);
                }
                Ok(())
            })
            .unwrap();

        let after = registry.get_default().unwrap();
        assert_eq!(*before, *after);
        assert!(after.cached_headers().contains(HeaderKind::Hsts));
        assert_eq!(
            after.cached_headers().csp(UaFamily::Modern).unwrap(),
            "default-src 'self'"
        );

        let child = registry.get("no_hsts").unwrap().unwrap();
        assert!(!child.cached_headers().contains(HeaderKind::Hsts));
        assert_eq!(
            child.cached_headers().csp(UaFamily::Modern).unwrap(),
            "default-src 'self'; script-src 'self' cdn.example.com"
        );
    }

    #[test]
    fn test_override_chain() {
        let registry = configured_registry();
        registry
            .override_default("framed", |config| {
                config.x_frame_options(XFrameOptions::Deny);
                Ok(())
            })
            .unwrap();
        let grandchild = registry
            .override_config("framed_no_sniff", "framed", |config| {
                config.opt_out(HeaderKind::XContentTypeOptions);
                Ok(())
            })
            .unwrap();

        assert_eq!(grandchild.x_frame_options(), &Setting::Set(XFrameOptions::Deny));
        assert!(grandchild.x_content_type_options().is_opt_out());
    }

    #[test]
    fn test_failed_registration_publishes_nothing() {
        let registry = configured_registry();
        let names = registry.names();

        let result = registry.define("broken", |config| {
            config.hsts(Hsts::new(100).preload());
            Ok(())
        });

        assert!(matches!(result, Err(SecureHeadersError::Configuration(_))));
        assert_eq!(registry.names(), names);
        assert!(registry.get("broken").unwrap().is_none());
    }

    #[test]
    fn test_closure_error_publishes_nothing() {
        let registry = Registry::new();

        let result = registry.configure(|_| {
            Err(SecureHeadersError::IllegalPolicyModification("stop".to_string()))
        });

        assert!(result.is_err());
        assert!(!registry.is_configured());
    }

    #[test]
    fn test_readers_keep_their_snapshot() {
        let registry = configured_registry();
        let held = registry.get_default().unwrap();

        registry
            .configure(|config| {
                config.opt_out(HeaderKind::Hsts);
                Ok(())
            })
            .unwrap();

        assert!(held.cached_headers().contains(HeaderKind::Hsts));
        assert!(!registry
            .get_default()
            .unwrap()
            .cached_headers()
            .contains(HeaderKind::Hsts));
    }

    #[test]
    fn test_concurrent_reads() {
        let registry = std::sync::Arc::new(configured_registry());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = registry.clone();
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        let config = registry.get_default().unwrap();
                        assert_eq!(config.headers(FIREFOX_UA).len(), 7);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
    }

    #[test]
    fn test_global_registry_is_shared() {
        assert!(std::ptr::eq(Registry::global(), Registry::global()));
    }
}
