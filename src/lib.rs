//! stubdelay - response delay distributions for mock servers
//!
//! stubdelay produces artificial response latencies for stubbed requests so the
//! timing behaviour a client sees can be reproduced, or overridden, without
//! redeploying the mock server.
//!
//! # Architecture
//!
//! - **Distributions**: fixed, uniform, log-normal, capped log-normal, and file based
//!   indirections resolved by key
//! - **Registry**: key → distribution table loaded once from one or more config
//!   files, later files overriding earlier ones
//! - **Consistency check**: startup validation that every file based reference in
//!   the stub mappings resolves
//!
//! # Example
//!
//! ```
//! use stubdelay::check::check_distributions;
//! use stubdelay::distribution::{DelayDistribution, file_based::FileBased};
//! use stubdelay::registry::{DistributionRegistry, source::InMemoryFileSource};
//!
//! let files = InMemoryFileSource::new()
//!     .with_file("latency.json", r#"{"svc:/a": {"type": "fixed", "delayMillis": 50}}"#);
//!
//! let registry = DistributionRegistry::new();
//! registry.load_all(&files, &["latency.json"]).unwrap();
//!
//! let delay = DelayDistribution::from(FileBased::new("svc:/a"));
//! check_distributions(&registry, [&delay]).unwrap();
//! assert_eq!(delay.sample_millis(&registry).unwrap(), 50);
//! ```

pub mod check;
pub mod config;
pub mod delay;
pub mod distribution;
pub mod error;
pub mod logging;
pub mod mapping;
pub mod registry;
pub mod stats;

// Re-export commonly used types
pub use config::Config;
pub use distribution::DelayDistribution;
pub use error::Error;
pub use registry::DistributionRegistry;

/// Result type used throughout stubdelay
pub type Result<T> = std::result::Result<T, Error>;
