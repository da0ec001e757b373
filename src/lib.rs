//! Kubernetes Resource Statistics Library
//!
//! This library turns `kubectl get pods,pvc -o json` snapshots into indexed
//! container and volume claim sets, compares a snapshot against a reference
//! snapshot, and renders the result as tables, trees or CSV.

pub mod lib {
    pub mod cli;
    pub mod config;
    pub mod container;
    pub mod error;
    pub mod fields;
    pub mod filter;
    pub mod kubernetes;
    pub mod loader;
    pub mod logger;
    pub mod output;
    pub mod pvc;
    pub mod render;
    pub mod resource_set;
    pub mod units;
}

// Re-export commonly used types at the root level for convenience
pub use lib::cli::{Cli, ColorMode, OutputFormat};
pub use lib::config::{Config, Palette, RenderConfig};
pub use lib::container::{Change, Container, ContainerType, ResourceField, Resources};
pub use lib::error::{
    ConfigError, DocumentError, KubestatError, QuantityError, Result, SourceError,
};
pub use lib::fields::Field;
pub use lib::filter::Filter;
pub use lib::kubernetes::ingest_document;
pub use lib::loader::{Loader, Source};
pub use lib::logger::init_logger;
pub use lib::output::{DumpMetadata, SnapshotDump};
pub use lib::pvc::PersistentVolumeClaim;
pub use lib::render::{FieldWidths, Renderer};
pub use lib::resource_set::{ResourceSet, Summary};
pub use lib::units::UnitMode;
