//! Stub mapping documents
//!
//! Only the parts of a stub mapping that the delay machinery needs are modelled: the
//! request matcher is kept as opaque JSON and the response exposes its optional
//! `delayDistribution`.
//!
//! A mappings file is either a JSON array of mappings or an object with a
//! `mappings` array:
//!
//! ```json
//! { "mappings": [
//!     { "request": { "method": "GET", "url": "/a" },
//!       "response": { "status": 200, "delayDistribution": { "type": "file_based", "key": "GET:/a" } } }
//! ] }
//! ```

use crate::check::RequestMapping;
use crate::distribution::DelayDistribution;
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// One stub mapping
#[derive(Debug, Clone, Deserialize)]
pub struct StubMapping {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub request: Value,
    #[serde(default)]
    pub response: ResponseDefinition,
}

/// Response half of a stub mapping
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseDefinition {
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub delay_distribution: Option<DelayDistribution>,
}

impl StubMapping {
    /// Human readable label: the name if set, else the request matcher.
    pub fn label(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.request.to_string())
    }
}

impl RequestMapping for StubMapping {
    fn delay_distribution(&self) -> Option<&DelayDistribution> {
        self.response.delay_distribution.as_ref()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MappingsDocument {
    List(Vec<StubMapping>),
    Wrapped { mappings: Vec<StubMapping> },
}

/// Parse a mappings document
pub fn parse_mappings(contents: &str) -> Result<Vec<StubMapping>> {
    let document: MappingsDocument =
        serde_json::from_str(contents).context("Failed to parse stub mappings")?;

    Ok(match document {
        MappingsDocument::List(mappings) => mappings,
        MappingsDocument::Wrapped { mappings } => mappings,
    })
}

/// Read and parse a mappings file
pub fn load_mappings(path: &Path) -> Result<Vec<StubMapping>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read mappings file: {}", path.display()))?;

    let mappings = parse_mappings(&contents)
        .with_context(|| format!("Failed to parse mappings file: {}", path.display()))?;

    tracing::debug!(path = %path.display(), mappings = mappings.len(), "loaded stub mappings");
    Ok(mappings)
}
