//! Hashes of inline scripts, generated ahead of time and loaded once at
//! start-up.
//!
//! The file maps a script identifier (usually the template it lives in) to
//! the hash sources of its inline scripts:
//!
//! ```yaml
//! app/views/layouts/application.html:
//!   - sha256-2wxY3vM5yqA8D9x5+mdrhXSv3ahaR4KwQ1s94rJbm8A=
//! ```

use crate::constants::SCRIPT_SRC;
use crate::core::policy::CspPolicy;
use crate::core::source::Source;
use crate::error::{CspError, SecureHeadersError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScriptHashes {
    entries: BTreeMap<String, Vec<String>>,
}

impl ScriptHashes {
    /// Reads `path` as YAML (`.yml`/`.yaml`) or JSON. A missing file is not
    /// an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Option<Self>, SecureHeadersError> {
        let path = path.as_ref();
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                log::debug!("No script hash file at {}", path.display());
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        };

        let is_yaml = matches!(
            path.extension().and_then(|ext| ext.to_str()),
            Some("yml" | "yaml")
        );
        let hashes = if is_yaml {
            Self::from_yaml(&content)?
        } else {
            Self::from_json(&content)?
        };

        log::debug!(
            "Loaded {} script hashes for {} scripts from {}",
            hashes.len(),
            hashes.entries.len(),
            path.display()
        );
        Ok(Some(hashes))
    }

    pub fn from_json(content: &str) -> Result<Self, SecureHeadersError> {
        serde_json::from_str(content).map_err(|err| SecureHeadersError::ScriptHashes(err.to_string()))
    }

    pub fn from_yaml(content: &str) -> Result<Self, SecureHeadersError> {
        serde_yaml::from_str(content).map_err(|err| SecureHeadersError::ScriptHashes(err.to_string()))
    }

    pub fn insert(&mut self, script: impl Into<String>, hash: impl Into<String>) -> &mut Self {
        self.entries.entry(script.into()).or_default().push(hash.into());
        self
    }

    #[inline]
    pub fn get(&self, script: &str) -> Option<&[String]> {
        self.entries.get(script).map(Vec::as_slice)
    }

    /// Total number of hashes across all scripts.
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn sources(&self) -> Result<Vec<Source>, CspError> {
        self.entries
            .values()
            .flatten()
            .map(|hash| Source::parse_hash(hash))
            .collect()
    }

    /// Appends every hash to the policy's `script-src`.
    pub fn apply_to(&self, policy: &mut CspPolicy) -> Result<(), CspError> {
        let sources = self.sources()?;
        if !sources.is_empty() {
            policy.append_sources(SCRIPT_SRC, sources);
        }
        Ok(())
    }
}
