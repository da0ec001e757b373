use log::info;
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::lib::container::Container;
use crate::lib::error::Result;
use crate::lib::loader::Source;
use crate::lib::pvc::PersistentVolumeClaim;
use crate::lib::resource_set::ResourceSet;

/// Diagnostic dump of a processed resource set
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotDump<'a> {
    pub metadata: DumpMetadata,
    pub containers: &'a [Container],
    pub pvcs: &'a [PersistentVolumeClaim],
}

/// Metadata about the run that produced the dump
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DumpMetadata {
    pub timestamp: String,
    pub inputs: Vec<String>,
    pub references: Vec<String>,
    pub with_changes: bool,
    pub total_containers: usize,
    pub total_pvcs: usize,
}

impl<'a> SnapshotDump<'a> {
    pub fn new(set: &'a ResourceSet, inputs: &[Source], references: &[Source]) -> Self {
        Self {
            metadata: DumpMetadata {
                timestamp: chrono::Utc::now().to_rfc3339(),
                inputs: inputs.iter().map(Source::to_string).collect(),
                references: references.iter().map(Source::to_string).collect(),
                with_changes: !references.is_empty(),
                total_containers: set.containers.len(),
                total_pvcs: set.pvcs.len(),
            },
            containers: &set.containers,
            pvcs: &set.pvcs,
        }
    }

    /// Write the dump as pretty-printed JSON
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        info!("Wrote dump to {}", path.display());
        Ok(())
    }
}
