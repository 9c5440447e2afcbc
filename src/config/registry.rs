use crate::config::configuration::{Configuration, ConfigurationBuilder};
use crate::constants::{DEFAULT_CONFIG, NOOP_CONFIG};
use crate::error::SecureHeadersError;
use arc_swap::ArcSwapOption;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use std::{
    borrow::Cow,
    sync::{Arc, OnceLock},
};

type ConfigurationMap = FxHashMap<Cow<'static, str>, Arc<Configuration>>;

static GLOBAL_REGISTRY: OnceLock<Registry> = OnceLock::new();

/// Named, frozen configurations.
///
/// Readers load an immutable snapshot without locking. Writers are
/// serialized and publish a whole new snapshot, so a rejected registration
/// leaves the registry exactly as it was. Registration is meant to happen
/// while the application starts.
#[derive(Debug, Default)]
pub struct Registry {
    configurations: ArcSwapOption<ConfigurationMap>,
    write_lock: Mutex<()>,
}

impl Registry {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry.
    pub fn global() -> &'static Registry {
        GLOBAL_REGISTRY.get_or_init(Registry::new)
    }

    /// Creates or replaces the `default` configuration, and (re)creates the
    /// noop configuration alongside it.
    pub fn configure<F>(&self, f: F) -> Result<Arc<Configuration>, SecureHeadersError>
    where
        F: FnOnce(&mut ConfigurationBuilder) -> Result<(), SecureHeadersError>,
    {
        self.register(DEFAULT_CONFIG.into(), ConfigurationBuilder::new(), f, true)
    }

    /// Registers a configuration under a new `name`, starting from the
    /// built-in defaults.
    pub fn define<F>(
        &self,
        name: impl Into<Cow<'static, str>>,
        f: F,
    ) -> Result<Arc<Configuration>, SecureHeadersError>
    where
        F: FnOnce(&mut ConfigurationBuilder) -> Result<(), SecureHeadersError>,
    {
        self.register(name.into(), ConfigurationBuilder::new(), f, false)
    }

    /// Registers `name` as a deep copy of `base` with `f` applied on top.
    pub fn override_config<F>(
        &self,
        name: impl Into<Cow<'static, str>>,
        base: &str,
        f: F,
    ) -> Result<Arc<Configuration>, SecureHeadersError>
    where
        F: FnOnce(&mut ConfigurationBuilder) -> Result<(), SecureHeadersError>,
    {
        let base_config = self.get(base)?.ok_or_else(|| {
            SecureHeadersError::NotYetConfigured(format!(
                "'{}' must be defined before it can be overridden",
                base
            ))
        })?;
        self.register(name.into(), base_config.to_builder(), f, false)
    }

    /// [`override_config`](Self::override_config) based on `default`.
    pub fn override_default<F>(
        &self,
        name: impl Into<Cow<'static, str>>,
        f: F,
    ) -> Result<Arc<Configuration>, SecureHeadersError>
    where
        F: FnOnce(&mut ConfigurationBuilder) -> Result<(), SecureHeadersError>,
    {
        self.override_config(name, DEFAULT_CONFIG, f)
    }

    /// `Ok(None)` when `name` is unknown; an error when nothing has been
    /// registered at all.
    pub fn get(&self, name: &str) -> Result<Option<Arc<Configuration>>, SecureHeadersError> {
        let snapshot = self.configurations.load_full();
        let configurations = snapshot.as_ref().ok_or_else(|| {
            SecureHeadersError::NotYetConfigured(
                "no configuration has been registered".to_string(),
            )
        })?;
        Ok(configurations.get(name).cloned())
    }

    /// The `default` configuration.
    pub fn get_default(&self) -> Result<Arc<Configuration>, SecureHeadersError> {
        self.get(DEFAULT_CONFIG)?.ok_or_else(|| {
            SecureHeadersError::NotYetConfigured(format!("'{}' is not defined", DEFAULT_CONFIG))
        })
    }

    #[inline]
    pub fn is_configured(&self) -> bool {
        self.configurations.load_full().is_some()
    }

    pub fn names(&self) -> Vec<String> {
        let snapshot = self.configurations.load_full();
        let mut names: Vec<String> = snapshot
            .as_ref()
            .map(|configurations| configurations.keys().map(|k| k.to_string()).collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    fn register<F>(
        &self,
        name: Cow<'static, str>,
        mut builder: ConfigurationBuilder,
        f: F,
        replace: bool,
    ) -> Result<Arc<Configuration>, SecureHeadersError>
    where
        F: FnOnce(&mut ConfigurationBuilder) -> Result<(), SecureHeadersError>,
    {
        // The closure may itself register configurations, so it runs before
        // the writer lock is taken.
        self.ensure_available(&name, replace)?;
        let configuration = f(&mut builder)
            .and_then(|()| builder.build())
            .map(Arc::new)
            .map_err(|err| {
                log::warn!("Rejected secure headers configuration '{}': {}", name, err);
                err
            })?;

        let _guard = self.write_lock.lock();
        self.ensure_available(&name, replace)?;

        let mut next: ConfigurationMap = self
            .configurations
            .load_full()
            .as_deref()
            .cloned()
            .unwrap_or_default();

        if replace || !next.contains_key(NOOP_CONFIG) {
            next.insert(Cow::Borrowed(NOOP_CONFIG), Arc::new(noop_configuration()?));
        }

        log::info!("Registered secure headers configuration '{}'", name);
        next.insert(name, configuration.clone());
        self.configurations.store(Some(Arc::new(next)));

        Ok(configuration)
    }

    fn ensure_available(&self, name: &str, replace: bool) -> Result<(), SecureHeadersError> {
        if replace {
            return Ok(());
        }
        let exists = name == NOOP_CONFIG
            || self
                .configurations
                .load_full()
                .as_ref()
                .is_some_and(|configurations| configurations.contains_key(name));
        if exists {
            log::warn!("Rejected duplicate secure headers configuration '{}'", name);
            return Err(SecureHeadersError::AlreadyDefined(name.to_string()));
        }
        Ok(())
    }
}

fn noop_configuration() -> Result<Configuration, SecureHeadersError> {
    ConfigurationBuilder::opted_out().build()
}
