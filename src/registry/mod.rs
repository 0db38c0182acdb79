//! File based distribution registry
//!
//! The registry holds the key → distribution table that [`FileBased`] delays are
//! resolved against. It is populated once at configuration time from an ordered list
//! of config sources and then only read while requests are served.
//!
//! # Merge semantics
//!
//! Sources are applied in order and the last source wins: a key defined in a later
//! source replaces the same key from an earlier one, while keys a later source does
//! not mention are kept. This allows a base file plus environment-specific overrides.
//!
//! # Concurrency
//!
//! The table is published through an [`ArcSwapOption`]. `load` merges into a private
//! map and publishes it in a single store, `clear` publishes `None`. Readers never
//! block and always observe either the previous complete table or the new one.
//!
//! [`FileBased`]: crate::distribution::file_based::FileBased

pub mod source;

use crate::distribution::descriptor::{DescriptorTable, DocumentFormat};
use crate::distribution::DelayDistribution;
use crate::Result;
use arc_swap::ArcSwapOption;
use source::FileSource;
use std::collections::HashMap;
use std::sync::Arc;

/// Published key → distribution table
pub type DistributionTable = HashMap<String, DelayDistribution>;

/// Registry of file-defined delay distributions
///
/// Owned by the server configuration and shared (typically via `Arc`) with request
/// handling. Starts unpopulated.
pub struct DistributionRegistry {
    table: ArcSwapOption<DistributionTable>,
    descriptors: DescriptorTable,
}

impl DistributionRegistry {
    pub fn new() -> Self {
        Self {
            table: ArcSwapOption::empty(),
            descriptors: DescriptorTable::concrete(),
        }
    }

    /// Load the registry from `sources`, if any are configured.
    ///
    /// `None` means the feature is unused and leaves the registry exactly as it was.
    /// `Some` behaves like [`DistributionRegistry::load_all`].
    pub fn load<N: AsRef<str>>(&self, files: &dyn FileSource, sources: Option<&[N]>) -> Result<()> {
        match sources {
            Some(sources) => self.load_all(files, sources),
            None => {
                tracing::debug!("no distribution config files configured, registry unchanged");
                Ok(())
            }
        }
    }

    /// Replace the registry contents with the merge of `sources`, last source wins.
    ///
    /// An empty list publishes an empty (but populated) table. Any missing file,
    /// parse error or invalid descriptor aborts the load and leaves the previously
    /// published table in place.
    pub fn load_all<N: AsRef<str>>(&self, files: &dyn FileSource, sources: &[N]) -> Result<()> {
        let mut table = DistributionTable::new();

        for name in sources {
            let name = name.as_ref();
            let text = files.read_text(name)?;
            let entries = self
                .descriptors
                .parse_document(name, &text, DocumentFormat::from_name(name))?;

            tracing::debug!(
                source = name,
                entries = entries.len(),
                "read distribution config source"
            );

            for (key, distribution) in entries {
                if table.insert(key.clone(), distribution).is_some() {
                    tracing::debug!(key = %key, source = name, "distribution overridden by later source");
                }
            }
        }

        tracing::info!(
            distributions = table.len(),
            sources = sources.len(),
            "distribution registry loaded"
        );
        self.table.store(Some(Arc::new(table)));

        Ok(())
    }

    /// Look up a distribution by key.
    ///
    /// Returns `None` when the registry is unpopulated or does not define `key`.
    pub fn lookup(&self, key: &str) -> Option<DelayDistribution> {
        self.table
            .load()
            .as_deref()
            .and_then(|table| table.get(key).cloned())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.table
            .load()
            .as_deref()
            .map_or(false, |table| table.contains_key(key))
    }

    /// Whether a load has published a table since creation or the last clear.
    pub fn is_populated(&self) -> bool {
        self.table.load().is_some()
    }

    pub fn len(&self) -> usize {
        self.table.load().as_deref().map_or(0, |table| table.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Defined keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .table
            .load()
            .as_deref()
            .map(|table| table.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }

    /// The currently published table, if any.
    pub fn snapshot(&self) -> Option<Arc<DistributionTable>> {
        self.table.load_full()
    }

    /// Return the registry to the unpopulated state. Idempotent.
    pub fn clear(&self) {
        if self.table.swap(None).is_some() {
            tracing::info!("distribution registry cleared");
        }
    }
}

impl Default for DistributionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DistributionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DistributionRegistry")
            .field("populated", &self.is_populated())
            .field("distributions", &self.len())
            .finish()
    }
}
