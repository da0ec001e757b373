use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Kind of a container inside a pod
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ContainerType {
    #[serde(rename = "init")]
    Init,
    #[serde(rename = "reg")]
    Regular,
}

impl ContainerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerType::Init => "init",
            ContainerType::Regular => "reg",
        }
    }
}

impl fmt::Display for ContainerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of an entity after comparing against a reference snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Change {
    #[default]
    Unchanged,
    /// Claim only present in the current snapshot
    New,
    /// Claim only present in the reference snapshot
    Deleted,
    #[serde(rename = "New Container")]
    NewContainer,
    #[serde(rename = "New Pod")]
    NewPod,
    #[serde(rename = "Deleted Container")]
    DeletedContainer,
    #[serde(rename = "Deleted Pod")]
    DeletedPod,
    Modified,
}

impl Change {
    pub fn as_str(&self) -> &'static str {
        match self {
            Change::Unchanged => "Unchanged",
            Change::New => "New",
            Change::Deleted => "Deleted",
            Change::NewContainer => "New Container",
            Change::NewPod => "New Pod",
            Change::DeletedContainer => "Deleted Container",
            Change::DeletedPod => "Deleted Pod",
            Change::Modified => "Modified",
        }
    }

    pub fn is_deleted(&self) -> bool {
        matches!(
            self,
            Change::Deleted | Change::DeletedContainer | Change::DeletedPod
        )
    }

    pub fn is_new(&self) -> bool {
        matches!(self, Change::New | Change::NewContainer | Change::NewPod)
    }
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a resource value is measured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceUnit {
    Millicores,
    Bytes,
    Count,
}

/// Resource-bearing fields compared between snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ResourceField {
    #[serde(rename = "CPURequests")]
    CpuRequests,
    #[serde(rename = "CPULimits")]
    CpuLimits,
    #[serde(rename = "MemoryRequests")]
    MemoryRequests,
    #[serde(rename = "MemoryLimits")]
    MemoryLimits,
    #[serde(rename = "EphemeralStorageRequests")]
    EphemeralRequests,
    #[serde(rename = "EphemeralStorageLimits")]
    EphemeralLimits,
    #[serde(rename = "PVCQuantity")]
    PvcQuantity,
    #[serde(rename = "PVCRequests")]
    PvcRequests,
}

impl ResourceField {
    pub const ALL: [ResourceField; 8] = [
        ResourceField::CpuRequests,
        ResourceField::CpuLimits,
        ResourceField::MemoryRequests,
        ResourceField::MemoryLimits,
        ResourceField::EphemeralRequests,
        ResourceField::EphemeralLimits,
        ResourceField::PvcQuantity,
        ResourceField::PvcRequests,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ResourceField::CpuRequests => "CPURequests",
            ResourceField::CpuLimits => "CPULimits",
            ResourceField::MemoryRequests => "MemoryRequests",
            ResourceField::MemoryLimits => "MemoryLimits",
            ResourceField::EphemeralRequests => "EphemeralStorageRequests",
            ResourceField::EphemeralLimits => "EphemeralStorageLimits",
            ResourceField::PvcQuantity => "PVCQuantity",
            ResourceField::PvcRequests => "PVCRequests",
        }
    }

    pub fn unit(&self) -> ResourceUnit {
        match self {
            ResourceField::CpuRequests | ResourceField::CpuLimits => ResourceUnit::Millicores,
            ResourceField::PvcQuantity => ResourceUnit::Count,
            _ => ResourceUnit::Bytes,
        }
    }
}

impl fmt::Display for ResourceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resource values of one container, in millicores, bytes or claim counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Resources {
    #[serde(rename = "CPURequests")]
    pub cpu_requests: u64,
    #[serde(rename = "CPULimits")]
    pub cpu_limits: u64,
    #[serde(rename = "MemoryRequests")]
    pub memory_requests: u64,
    #[serde(rename = "MemoryLimits")]
    pub memory_limits: u64,
    #[serde(rename = "EphemeralStorageRequests")]
    pub ephemeral_requests: u64,
    #[serde(rename = "EphemeralStorageLimits")]
    pub ephemeral_limits: u64,
    #[serde(rename = "PVCQuantity")]
    pub pvc_quantity: u64,
    #[serde(rename = "PVCRequests")]
    pub pvc_requests: u64,
}

impl Resources {
    pub fn get(&self, field: ResourceField) -> u64 {
        match field {
            ResourceField::CpuRequests => self.cpu_requests,
            ResourceField::CpuLimits => self.cpu_limits,
            ResourceField::MemoryRequests => self.memory_requests,
            ResourceField::MemoryLimits => self.memory_limits,
            ResourceField::EphemeralRequests => self.ephemeral_requests,
            ResourceField::EphemeralLimits => self.ephemeral_limits,
            ResourceField::PvcQuantity => self.pvc_quantity,
            ResourceField::PvcRequests => self.pvc_requests,
        }
    }

    pub fn get_mut(&mut self, field: ResourceField) -> &mut u64 {
        match field {
            ResourceField::CpuRequests => &mut self.cpu_requests,
            ResourceField::CpuLimits => &mut self.cpu_limits,
            ResourceField::MemoryRequests => &mut self.memory_requests,
            ResourceField::MemoryLimits => &mut self.memory_limits,
            ResourceField::EphemeralRequests => &mut self.ephemeral_requests,
            ResourceField::EphemeralLimits => &mut self.ephemeral_limits,
            ResourceField::PvcQuantity => &mut self.pvc_quantity,
            ResourceField::PvcRequests => &mut self.pvc_requests,
        }
    }

    /// Fields whose values differ from `other`, in declaration order
    pub fn differing_fields(
        &self,
        other: &Resources,
    ) -> impl Iterator<Item = ResourceField> + use<> {
        let (this, other) = (*self, *other);
        ResourceField::ALL
            .into_iter()
            .filter(move |field| this.get(*field) != other.get(*field))
    }
}

/// One container (init or regular) inside one pod.
///
/// A pod without containers is kept as a single placeholder record whose
/// container fields are empty. Keys and indices are derived by
/// [`ResourceSet::renew_indices`](crate::ResourceSet::renew_indices) and are
/// never carried over between loads.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    pub key: String,
    pub pod_key: String,
    pub app_key: String,

    pub index: usize,
    pub app_index: usize,
    pub pod_index: usize,
    pub pod_local_index: usize,
    pub local_index: usize,

    pub app_name: String,
    pub workload_type: String,
    pub pod_name: String,
    #[serde(rename = "type")]
    pub container_type: Option<ContainerType>,
    pub name: String,

    #[serde(flatten)]
    pub resources: Resources,

    #[serde(rename = "PVCList")]
    pub pvc_list: BTreeSet<String>,
    #[serde(rename = "PVCList_not_found")]
    pub pvc_list_not_found: BTreeSet<String>,

    pub change: Change,
    pub changed_fields: BTreeSet<ResourceField>,
    #[serde(rename = "ref")]
    pub reference: Resources,
}

impl Container {
    /// Placeholder for a pod whose containers have not been parsed (yet)
    pub fn placeholder(app_name: String, workload_type: String, pod_name: String) -> Self {
        Self {
            app_name,
            workload_type,
            pod_name,
            ..Default::default()
        }
    }

    /// Copy of this record's pod fields describing one of its containers
    pub fn with_container(&self, container_type: ContainerType, name: &str) -> Self {
        Self {
            container_type: Some(container_type),
            name: name.to_string(),
            ..Self::placeholder(
                self.app_name.clone(),
                self.workload_type.clone(),
                self.pod_name.clone(),
            )
        }
    }

    pub fn has_container(&self) -> bool {
        !self.name.is_empty()
    }

    pub fn generate_keys(&mut self) {
        self.app_key = self.app_name.clone();
        self.pod_key = format!("{}/{:03}", self.app_key, self.pod_local_index);
        self.key = format!("{}/{}", self.pod_key, self.name);
    }

    /// Same pod as `other`.
    ///
    /// With `trust_key` the generated pod keys are compared; without it the
    /// pod identity is compared directly, which is what grouping has to do
    /// before keys exist.
    pub fn is_same_pod(&self, other: &Container, trust_key: bool) -> bool {
        if trust_key {
            self.pod_key == other.pod_key
        } else {
            self.app_name == other.app_name && self.pod_name == other.pod_name
        }
    }

    pub fn is_same_app(&self, other: &Container) -> bool {
        self.app_name == other.app_name
    }

    pub fn is_deleted(&self) -> bool {
        self.change.is_deleted()
    }

    pub fn is_init(&self) -> bool {
        self.container_type == Some(ContainerType::Init)
    }

    pub fn is_job(&self) -> bool {
        self.workload_type == "Job"
    }

    /// Compare every resource field against its reference value.
    ///
    /// All fields are scanned so that `changed_fields` is complete.
    pub fn check_if_modified(&mut self) {
        for field in self.resources.differing_fields(&self.reference) {
            self.change = Change::Modified;
            self.changed_fields.insert(field);
        }
    }

    /// Turn a record borrowed from the reference snapshot into a deleted entry
    pub fn mark_deleted(&mut self) {
        self.change = Change::DeletedContainer;
        self.changed_fields.clear();
        self.pod_index = 0;
        self.index = 0;
        self.reference = self.resources;
        self.resources = Resources::default();
        self.pvc_list_not_found.clear();
        self.generate_keys();
    }

    /// Position in key order; deleted entries come before live ones of the same pod
    pub fn order_key(&self) -> (&str, usize, usize, &str) {
        (&self.app_key, self.pod_local_index, self.pod_index, &self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn container(pod: &str, name: &str) -> Container {
        Container::placeholder("web".to_string(), "ReplicaSet".to_string(), pod.to_string())
            .with_container(ContainerType::Regular, name)
    }

    #[test]
    fn test_generate_keys() {
        let mut c = container("web-abc", "app");
        c.pod_local_index = 2;
        c.generate_keys();

        assert_eq!(c.app_key, "web");
        assert_eq!(c.pod_key, "web/002");
        assert_eq!(c.key, "web/002/app");
    }

    #[test]
    fn test_is_same_pod_modes() {
        let mut a = container("web-abc", "app");
        let mut b = container("web-xyz", "app");

        assert!(!a.is_same_pod(&b, false));

        // Keys derived from position make pods of a ReplicaSet interchangeable
        a.pod_local_index = 1;
        b.pod_local_index = 1;
        a.generate_keys();
        b.generate_keys();
        assert!(a.is_same_pod(&b, true));
    }

    #[test]
    fn test_check_if_modified_collects_all_fields() {
        let mut c = container("web-abc", "app");
        c.resources.cpu_requests = 500;
        c.resources.memory_limits = 1024;
        c.reference.cpu_requests = 250;
        c.reference.memory_limits = 2048;

        c.check_if_modified();

        assert_eq!(c.change, Change::Modified);
        assert_eq!(
            c.changed_fields.iter().copied().collect::<Vec<_>>(),
            vec![ResourceField::CpuRequests, ResourceField::MemoryLimits]
        );
    }

    #[test]
    fn test_check_if_modified_keeps_unchanged() {
        let mut c = container("web-abc", "app");
        c.resources.cpu_requests = 500;
        c.reference = c.resources;

        c.check_if_modified();

        assert_eq!(c.change, Change::Unchanged);
        assert!(c.changed_fields.is_empty());
    }

    #[test]
    fn test_mark_deleted_moves_values_to_reference() {
        let mut c = container("web-abc", "app");
        c.pod_index = 4;
        c.index = 7;
        c.resources.cpu_requests = 100;
        c.resources.pvc_quantity = 1;

        c.mark_deleted();

        assert_eq!(c.change, Change::DeletedContainer);
        assert_eq!(c.pod_index, 0);
        assert_eq!(c.index, 0);
        assert_eq!(c.resources, Resources::default());
        assert_eq!(c.reference.cpu_requests, 100);
        assert_eq!(c.reference.pvc_quantity, 1);
    }

    #[test]
    fn test_change_serializes_with_display_name() {
        assert_eq!(
            serde_json::to_string(&Change::DeletedPod).unwrap(),
            "\"Deleted Pod\""
        );
        assert_eq!(Change::NewContainer.to_string(), "New Container");
    }
}
