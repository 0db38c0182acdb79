//! Descriptor parsing
//!
//! Distributions are described in config files as objects carrying a `type`
//! discriminator plus the variant's fields:
//!
//! ```json
//! {
//!   "GET:/fast":  { "type": "fixed", "delayMillis": 50 },
//!   "GET:/jitter": { "type": "uniform", "lowerMillis": 20, "upperMillis": 40 },
//!   "GET:/slow":  { "type": "capped_lognormal", "medianMillis": 90, "sigma": 0.1, "maxValueMillis": 150 }
//! }
//! ```
//!
//! A [`DescriptorTable`] maps each discriminator to a constructor. Constructors
//! deserialize the variant's fields strictly (unknown fields are rejected) and run
//! the variant's validating constructor, so every descriptor is fully checked at
//! parse time.

use super::file_based::FileBased;
use super::fixed::Fixed;
use super::lognormal::{CappedLogNormal, LogNormal};
use super::uniform::Uniform;
use super::DelayDistribution;
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Field holding the variant discriminator
pub const TYPE_FIELD: &str = "type";

/// Discriminators of the file based indirection
const FILE_BASED_TAGS: [&str; 2] = ["file_based", "file"];

/// Builds a distribution from a descriptor's fields (discriminator removed)
pub type Constructor = fn(Map<String, Value>) -> Result<DelayDistribution>;

/// Text format of a distribution config source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Toml,
}

impl DocumentFormat {
    /// Pick the format from a file name; anything not ending in `.toml` is JSON.
    pub fn from_name(name: &str) -> Self {
        if name.to_ascii_lowercase().ends_with(".toml") {
            Self::Toml
        } else {
            Self::Json
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "JSON"),
            Self::Toml => write!(f, "TOML"),
        }
    }
}

/// Discriminator to constructor table
#[derive(Clone)]
pub struct DescriptorTable {
    entries: Vec<(&'static str, Constructor)>,
}

impl DescriptorTable {
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Every variant, including file based indirections.
    ///
    /// Used for distributions attached directly to stub mappings.
    pub fn standard() -> Self {
        FILE_BASED_TAGS
            .into_iter()
            .fold(Self::concrete(), |table, tag| table.register(tag, build_file_based))
    }

    /// Concrete samplers only.
    ///
    /// Used for registry config sources, so a registry entry can never point back
    /// into the registry.
    pub fn concrete() -> Self {
        Self::empty()
            .register("fixed", build_fixed)
            .register("uniform", build_uniform)
            .register("lognormal", build_lognormal)
            .register("log_normal", build_lognormal)
            .register("capped_lognormal", build_capped_lognormal)
            .register("capped_log_normal", build_capped_lognormal)
    }

    /// Add or replace the constructor for `tag`.
    pub fn register(mut self, tag: &'static str, constructor: Constructor) -> Self {
        match self.entries.iter_mut().find(|(t, _)| *t == tag) {
            Some(entry) => entry.1 = constructor,
            None => self.entries.push((tag, constructor)),
        }
        self
    }

    pub fn is_registered(&self, tag: &str) -> bool {
        self.constructor(tag).is_some()
    }

    /// Registered discriminators, in registration order.
    pub fn tags(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(t, _)| *t)
    }

    fn constructor(&self, tag: &str) -> Option<Constructor> {
        self.entries
            .iter()
            .find(|(t, _)| *t == tag)
            .map(|(_, c)| *c)
    }

    /// Parse a single descriptor.
    pub fn parse(&self, value: Value) -> Result<DelayDistribution> {
        let mut fields = match value {
            Value::Object(fields) => fields,
            other => {
                return Err(Error::invalid(format!(
                    "distribution descriptor must be an object, got {}",
                    other
                )))
            }
        };

        let tag = match fields.remove(TYPE_FIELD) {
            Some(Value::String(tag)) => tag,
            Some(other) => {
                return Err(Error::invalid(format!(
                    "distribution '{}' must be a string, got {}",
                    TYPE_FIELD, other
                )))
            }
            None => {
                return Err(Error::invalid(format!(
                    "distribution descriptor is missing the '{}' field",
                    TYPE_FIELD
                )))
            }
        };

        let constructor = match self.constructor(&tag) {
            Some(constructor) => constructor,
            None if FILE_BASED_TAGS.contains(&tag.as_str()) => {
                return Err(Error::invalid(
                    "file based distributions cannot be defined inside distribution config files",
                ))
            }
            None => {
                return Err(Error::invalid(format!(
                    "unrecognized distribution type '{}'",
                    tag
                )))
            }
        };

        constructor(fields)
    }

    /// Parse a whole config source into key → distribution.
    ///
    /// `name` only labels error messages. Document-level failures are
    /// [`Error::Parse`]; a bad entry is [`Error::InvalidConfiguration`] naming its key.
    pub fn parse_document(
        &self,
        name: &str,
        text: &str,
        format: DocumentFormat,
    ) -> Result<BTreeMap<String, DelayDistribution>> {
        let entries = read_document(name, text, format)?;

        let mut parsed = BTreeMap::new();
        for (key, value) in entries {
            let distribution = self.parse(value).map_err(|e| match e {
                Error::InvalidConfiguration(reason) => Error::invalid(format!(
                    "key '{}' in '{}': {}",
                    key, name, reason
                )),
                other => other,
            })?;
            parsed.insert(key, distribution);
        }

        Ok(parsed)
    }
}

impl Default for DescriptorTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for DescriptorTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.tags()).finish()
    }
}

fn read_document(name: &str, text: &str, format: DocumentFormat) -> Result<Map<String, Value>> {
    let parse_error = |reason: String| Error::Parse {
        name: name.to_string(),
        reason,
    };

    match format {
        DocumentFormat::Json => {
            serde_json::from_str::<Map<String, Value>>(text).map_err(|e| parse_error(e.to_string()))
        }
        DocumentFormat::Toml => {
            let table = ::toml::from_str::<::toml::Table>(text)
                .map_err(|e| parse_error(e.to_string()))?;
            match serde_json::to_value(table).map_err(|e| parse_error(e.to_string()))? {
                Value::Object(map) => Ok(map),
                _ => Err(parse_error(format!("{} document is not a table", format))),
            }
        }
    }
}

fn fields<P: DeserializeOwned>(tag: &str, fields: Map<String, Value>) -> Result<P> {
    serde_json::from_value(Value::Object(fields))
        .map_err(|e| Error::invalid(format!("{} distribution: {}", tag, e)))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct FixedParams {
    #[serde(alias = "milliseconds")]
    delay_millis: Number,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct UniformParams {
    #[serde(alias = "lower")]
    lower_millis: f64,
    #[serde(alias = "upper")]
    upper_millis: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct LogNormalParams {
    #[serde(alias = "median")]
    median_millis: f64,
    sigma: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct CappedLogNormalParams {
    #[serde(alias = "median")]
    median_millis: f64,
    sigma: f64,
    #[serde(alias = "maxValue")]
    max_value_millis: f64,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct FileBasedParams {
    key: String,
}

fn build_fixed(f: Map<String, Value>) -> Result<DelayDistribution> {
    let p: FixedParams = fields("fixed", f)?;
    Ok(Fixed::new(whole_millis("fixed delayMillis", &p.delay_millis)?).into())
}

/// Accept a non-negative integer, written either as an integer or as an integral
/// float such as `50.0`.
fn whole_millis(field: &str, n: &Number) -> Result<u64> {
    if let Some(millis) = n.as_u64() {
        return Ok(millis);
    }

    match n.as_f64() {
        Some(v) if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v < u64::MAX as f64 => {
            Ok(v as u64)
        }
        _ => Err(Error::invalid(format!(
            "{} must be a non-negative whole number of milliseconds, got {}",
            field, n
        ))),
    }
}

fn build_uniform(f: Map<String, Value>) -> Result<DelayDistribution> {
    let p: UniformParams = fields("uniform", f)?;
    Ok(Uniform::new(p.lower_millis, p.upper_millis)?.into())
}

fn build_lognormal(f: Map<String, Value>) -> Result<DelayDistribution> {
    let p: LogNormalParams = fields("lognormal", f)?;
    Ok(LogNormal::new(p.median_millis, p.sigma)?.into())
}

fn build_capped_lognormal(f: Map<String, Value>) -> Result<DelayDistribution> {
    let p: CappedLogNormalParams = fields("capped_lognormal", f)?;
    Ok(CappedLogNormal::new(p.median_millis, p.sigma, p.max_value_millis)?.into())
}

fn build_file_based(f: Map<String, Value>) -> Result<DelayDistribution> {
    let p: FileBasedParams = fields("file_based", f)?;
    if p.key.is_empty() {
        return Err(Error::invalid("file_based key must not be empty"));
    }
    Ok(FileBased::new(p.key).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_every_variant() {
        let table = DescriptorTable::standard();

        assert_eq!(
            table.parse(json!({"type": "fixed", "delayMillis": 50})).unwrap(),
            DelayDistribution::from(Fixed::new(50))
        );
        assert_eq!(
            table.parse(json!({"type": "uniform", "lowerMillis": 1, "upperMillis": 9})).unwrap(),
            DelayDistribution::from(Uniform::new(1.0, 9.0).unwrap())
        );
        assert_eq!(
            table.parse(json!({"type": "lognormal", "medianMillis": 80, "sigma": 0.4})).unwrap(),
            DelayDistribution::from(LogNormal::new(80.0, 0.4).unwrap())
        );
        assert_eq!(
            table
                .parse(json!({
                    "type": "capped_lognormal",
                    "medianMillis": 90,
                    "sigma": 0.1,
                    "maxValueMillis": 150
                }))
                .unwrap(),
            DelayDistribution::from(CappedLogNormal::new(90.0, 0.1, 150.0).unwrap())
        );
        assert_eq!(
            table.parse(json!({"type": "file_based", "key": "GET:/a"})).unwrap(),
            DelayDistribution::from(FileBased::new("GET:/a"))
        );
    }

    #[test]
    fn test_parse_legacy_aliases() {
        let table = DescriptorTable::standard();

        assert_eq!(
            table.parse(json!({"type": "fixed", "milliseconds": 5})).unwrap(),
            DelayDistribution::from(Fixed::new(5))
        );
        assert_eq!(
            table
                .parse(json!({"type": "log_normal", "median": 10, "sigma": 0.2}))
                .unwrap(),
            DelayDistribution::from(LogNormal::new(10.0, 0.2).unwrap())
        );
        assert_eq!(
            table
                .parse(json!({"type": "capped_lognormal", "median": 10, "sigma": 0.2, "maxValue": 30}))
                .unwrap(),
            DelayDistribution::from(CappedLogNormal::new(10.0, 0.2, 30.0).unwrap())
        );
    }

    #[test]
    fn test_parse_rejects_bad_descriptors() {
        let table = DescriptorTable::standard();
        let cases = [
            json!({"type": "gamma", "shape": 2}),
            json!({"delayMillis": 5}),
            json!({"type": 3, "delayMillis": 5}),
            json!({"type": "fixed"}),
            json!({"type": "fixed", "delayMillis": -5}),
            json!({"type": "fixed", "delayMillis": -5.0}),
            json!({"type": "fixed", "delayMillis": 20.5}),
            json!({"type": "fixed", "delayMillis": "50"}),
            json!({"type": "uniform", "lowerMillis": -0.5, "upperMillis": 3}),
            json!({"type": "fixed", "delayMillis": 5, "jitter": 1}),
            json!({"type": "uniform", "lowerMillis": 9, "upperMillis": 1}),
            json!({"type": "capped_lognormal", "medianMillis": 90, "sigma": 0.1, "maxValueMillis": 10}),
            json!({"type": "file_based", "key": ""}),
            json!(42),
        ];

        for case in cases {
            let err = table.parse(case.clone()).unwrap_err();
            assert!(
                matches!(err, Error::InvalidConfiguration(_)),
                "expected invalid configuration for {}, got {:?}",
                case,
                err
            );
        }
    }

    #[test]
    fn test_parse_float_millis() {
        let table = DescriptorTable::concrete();

        assert_eq!(
            table.parse(json!({"type": "fixed", "delayMillis": 50.0})).unwrap(),
            DelayDistribution::from(Fixed::new(50))
        );
        assert_eq!(
            table
                .parse(json!({"type": "uniform", "lowerMillis": 20.5, "upperMillis": 30}))
                .unwrap(),
            DelayDistribution::from(Uniform::new(20.5, 30.0).unwrap())
        );

        let err = table.parse(json!({"type": "fixed", "delayMillis": 20.5})).unwrap_err();
        assert!(err.to_string().contains("whole number"), "unexpected message: {}", err);
    }

    #[test]
    fn test_concrete_table_has_no_file_based() {
        let table = DescriptorTable::concrete();
        assert!(!table.is_registered("file_based"));
        assert!(table.is_registered("capped_lognormal"));

        for tag in ["file_based", "file"] {
            let err = table.parse(json!({"type": tag, "key": "k"})).unwrap_err();
            let message = err.to_string();
            assert!(matches!(err, Error::InvalidConfiguration(_)));
            assert!(
                message.contains("file based distributions cannot be defined inside distribution config files"),
                "unexpected message: {}",
                message
            );
        }

        let err = table.parse(json!({"type": "weibull"})).unwrap_err();
        assert!(err.to_string().contains("unrecognized distribution type 'weibull'"));
    }

    #[test]
    fn test_register_replaces_existing_tag() {
        fn always_zero(_: Map<String, Value>) -> Result<DelayDistribution> {
            Ok(Fixed::new(0).into())
        }

        let table = DescriptorTable::concrete().register("fixed", always_zero);
        assert_eq!(
            table.parse(json!({"type": "fixed", "delayMillis": 50})).unwrap(),
            DelayDistribution::from(Fixed::new(0))
        );
        assert_eq!(table.tags().filter(|t| *t == "fixed").count(), 1);
    }

    #[test]
    fn test_parse_document_names_offending_key() {
        let text = r#"{
            "GET:/ok": {"type": "fixed", "delayMillis": 1},
            "GET:/bad": {"type": "weibull"}
        }"#;

        let err = DescriptorTable::concrete()
            .parse_document("dists.json", text, DocumentFormat::Json)
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("GET:/bad"), "unexpected message: {}", message);
        assert!(message.contains("dists.json"), "unexpected message: {}", message);
        assert!(message.contains("weibull"), "unexpected message: {}", message);
    }

    #[test]
    fn test_parse_document_syntax_error() {
        let err = DescriptorTable::concrete()
            .parse_document("broken.json", "{ not json", DocumentFormat::Json)
            .unwrap_err();
        assert!(matches!(err, Error::Parse { ref name, .. } if name == "broken.json"));

        let err = DescriptorTable::concrete()
            .parse_document("list.json", "[1, 2]", DocumentFormat::Json)
            .unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn test_parse_toml_document() {
        let text = r#"
            ["GET:/fixed"]
            type = "fixed"
            delayMillis = 50

            ["GET:/slow"]
            type = "lognormal"
            medianMillis = 120.0
            sigma = 0.3
        "#;

        let parsed = DescriptorTable::concrete()
            .parse_document("dists.toml", text, DocumentFormat::Toml)
            .unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed["GET:/fixed"], DelayDistribution::from(Fixed::new(50)));
        assert_eq!(parsed["GET:/slow"], DelayDistribution::from(LogNormal::new(120.0, 0.3).unwrap()));
    }

    #[test]
    fn test_document_format_from_name() {
        assert_eq!(DocumentFormat::from_name("a/b/dists.toml"), DocumentFormat::Toml);
        assert_eq!(DocumentFormat::from_name("DISTS.TOML"), DocumentFormat::Toml);
        assert_eq!(DocumentFormat::from_name("dists.json"), DocumentFormat::Json);
        assert_eq!(DocumentFormat::from_name("dists"), DocumentFormat::Json);
    }
}
