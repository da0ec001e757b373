//! Output columns and their rendering metadata.

use std::fmt;

use crate::lib::container::ResourceField;
use crate::lib::error::{ConfigError, Result};

/// Cell alignment inside a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// Static rendering metadata of one column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub header: &'static str,
    pub align: Align,
    /// Scalable columns shrink when the output exceeds the target width
    pub scalable: bool,
    pub min_width: usize,
}

/// A column of the table or tree view
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    AppName,
    WorkloadType,
    PodIndex,
    PodName,
    Type,
    Name,
    CpuRequests,
    CpuLimits,
    MemoryRequests,
    MemoryLimits,
    EphemeralRequests,
    EphemeralLimits,
    PvcQuantity,
    PvcRequests,
    MissingPvc,
    Change,
    RefCpuRequests,
    RefCpuLimits,
    RefMemoryRequests,
    RefMemoryLimits,
    RefEphemeralRequests,
    RefEphemeralLimits,
    RefPvcQuantity,
    RefPvcRequests,
    /// Combined pod/container branch text of the tree view
    TreeItem,
}

impl Field {
    /// Columns selectable with `--columns`
    pub const SELECTABLE: [Field; 24] = [
        Field::AppName,
        Field::WorkloadType,
        Field::PodIndex,
        Field::PodName,
        Field::Type,
        Field::Name,
        Field::CpuRequests,
        Field::CpuLimits,
        Field::MemoryRequests,
        Field::MemoryLimits,
        Field::EphemeralRequests,
        Field::EphemeralLimits,
        Field::PvcQuantity,
        Field::PvcRequests,
        Field::MissingPvc,
        Field::Change,
        Field::RefCpuRequests,
        Field::RefCpuLimits,
        Field::RefMemoryRequests,
        Field::RefMemoryLimits,
        Field::RefEphemeralRequests,
        Field::RefEphemeralLimits,
        Field::RefPvcQuantity,
        Field::RefPvcRequests,
    ];

    pub fn spec(&self) -> FieldSpec {
        use Align::*;
        let (header, align, scalable, min_width) = match self {
            Field::AppName => ("Application", Left, false, 0),
            Field::WorkloadType => ("Workload", Left, false, 0),
            Field::PodIndex => ("#", Right, false, 0),
            Field::PodName => ("Pod", Left, true, 12),
            Field::Type => ("Type", Left, false, 0),
            Field::Name => ("Container", Left, true, 12),
            Field::CpuRequests => ("CPU_R", Right, false, 6),
            Field::CpuLimits => ("CPU_L", Right, false, 6),
            Field::MemoryRequests => ("Mem_R", Right, false, 6),
            Field::MemoryLimits => ("Mem_L", Right, false, 6),
            Field::EphemeralRequests => ("Eph_R", Right, false, 6),
            Field::EphemeralLimits => ("Eph_L", Right, false, 6),
            Field::PvcQuantity => ("PVC_Q", Right, false, 5),
            Field::PvcRequests => ("PVC_R", Right, false, 6),
            Field::MissingPvc => ("Missing_PVC", Left, false, 0),
            Field::Change => ("Change", Left, false, 17),
            Field::RefCpuRequests => ("rCPU_R", Right, false, 6),
            Field::RefCpuLimits => ("rCPU_L", Right, false, 6),
            Field::RefMemoryRequests => ("rMem_R", Right, false, 6),
            Field::RefMemoryLimits => ("rMem_L", Right, false, 6),
            Field::RefEphemeralRequests => ("rEph_R", Right, false, 6),
            Field::RefEphemeralLimits => ("rEph_L", Right, false, 6),
            Field::RefPvcQuantity => ("rPVC_Q", Right, false, 6),
            Field::RefPvcRequests => ("rPVC_R", Right, false, 6),
            Field::TreeItem => ("Item", Left, true, 24),
        };
        FieldSpec {
            header,
            align,
            scalable,
            min_width,
        }
    }

    /// The resource value shown by this column, and whether it is the reference side
    pub fn resource(&self) -> Option<(ResourceField, bool)> {
        let resource = match self {
            Field::CpuRequests => (ResourceField::CpuRequests, false),
            Field::CpuLimits => (ResourceField::CpuLimits, false),
            Field::MemoryRequests => (ResourceField::MemoryRequests, false),
            Field::MemoryLimits => (ResourceField::MemoryLimits, false),
            Field::EphemeralRequests => (ResourceField::EphemeralRequests, false),
            Field::EphemeralLimits => (ResourceField::EphemeralLimits, false),
            Field::PvcQuantity => (ResourceField::PvcQuantity, false),
            Field::PvcRequests => (ResourceField::PvcRequests, false),
            Field::RefCpuRequests => (ResourceField::CpuRequests, true),
            Field::RefCpuLimits => (ResourceField::CpuLimits, true),
            Field::RefMemoryRequests => (ResourceField::MemoryRequests, true),
            Field::RefMemoryLimits => (ResourceField::MemoryLimits, true),
            Field::RefEphemeralRequests => (ResourceField::EphemeralRequests, true),
            Field::RefEphemeralLimits => (ResourceField::EphemeralLimits, true),
            Field::RefPvcQuantity => (ResourceField::PvcQuantity, true),
            Field::RefPvcRequests => (ResourceField::PvcRequests, true),
            _ => return None,
        };
        Some(resource)
    }

    /// Columns describing pod or container identity, replaced by the branch text in the tree view
    pub fn is_identity(&self) -> bool {
        matches!(
            self,
            Field::AppName
                | Field::WorkloadType
                | Field::PodIndex
                | Field::PodName
                | Field::Type
                | Field::Name
                | Field::TreeItem
        )
    }

    /// Columns only meaningful when a reference snapshot was compared
    pub fn needs_reference(&self) -> bool {
        *self == Field::Change || self.resource().is_some_and(|(_, reference)| reference)
    }

    /// Look up a column by header text, case-insensitively
    pub fn from_header(name: &str) -> Option<Field> {
        Field::SELECTABLE
            .into_iter()
            .find(|f| f.spec().header.eq_ignore_ascii_case(name))
    }

    /// Parse a comma-separated list of column headers
    pub fn parse_list(list: &str) -> Result<Vec<Field>> {
        list.split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| {
                Field::from_header(name).ok_or_else(|| {
                    ConfigError::InvalidColumn {
                        column: name.to_string(),
                        expected: Field::SELECTABLE
                            .iter()
                            .map(|f| f.spec().header)
                            .collect::<Vec<_>>()
                            .join(", "),
                    }
                    .into()
                })
            })
            .collect()
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.spec().header)
    }
}

/// Table columns shown by default
pub fn default_columns() -> Vec<Field> {
    vec![
        Field::AppName,
        Field::WorkloadType,
        Field::PodIndex,
        Field::PodName,
        Field::Type,
        Field::Name,
        Field::CpuRequests,
        Field::CpuLimits,
        Field::MemoryRequests,
        Field::MemoryLimits,
        Field::EphemeralRequests,
        Field::EphemeralLimits,
        Field::PvcQuantity,
        Field::PvcRequests,
        Field::MissingPvc,
    ]
}

/// Columns appended when a reference snapshot is compared
pub fn default_change_columns() -> Vec<Field> {
    vec![
        Field::Change,
        Field::RefCpuRequests,
        Field::RefCpuLimits,
        Field::RefMemoryRequests,
        Field::RefMemoryLimits,
        Field::RefEphemeralRequests,
        Field::RefEphemeralLimits,
        Field::RefPvcQuantity,
        Field::RefPvcRequests,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list() {
        let fields = Field::parse_list("pod, container,cpu_r,rMem_L").unwrap();
        assert_eq!(
            fields,
            vec![
                Field::PodName,
                Field::Name,
                Field::CpuRequests,
                Field::RefMemoryLimits
            ]
        );
    }

    #[test]
    fn test_parse_list_rejects_unknown() {
        let err = Field::parse_list("Pod,Namespace").unwrap_err();
        assert!(err.to_string().contains("Unknown column 'Namespace'"));
    }

    #[test]
    fn test_tree_item_not_selectable() {
        assert_eq!(Field::from_header("Item"), None);
    }

    #[test]
    fn test_reference_columns() {
        assert!(default_change_columns().iter().all(Field::needs_reference));
        assert!(!default_columns().iter().any(Field::needs_reference));
        assert_eq!(
            Field::RefPvcRequests.resource(),
            Some((ResourceField::PvcRequests, true))
        );
    }
}
