use serde::Serialize;
use std::collections::BTreeSet;

use crate::lib::container::Change;

/// One PersistentVolumeClaim of a snapshot
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistentVolumeClaim {
    pub key: String,
    pub index: usize,

    pub name: String,
    pub uid: String,
    pub storage_class_name: String,
    /// Requested storage in bytes
    pub requests: u64,

    /// Keys of the containers mounting this claim, maintained by relation linking
    pub container_list: BTreeSet<String>,
    pub container_quantity: usize,

    pub change: Change,
    pub changed_fields: BTreeSet<&'static str>,
    pub ref_requests: u64,
}

impl PersistentVolumeClaim {
    pub fn new(name: String, uid: String, storage_class_name: String, requests: u64) -> Self {
        Self {
            name,
            uid,
            storage_class_name,
            requests,
            ..Default::default()
        }
    }

    pub fn generate_keys(&mut self) {
        self.key = self.name.clone();
    }

    pub fn is_deleted(&self) -> bool {
        self.change.is_deleted()
    }

    pub fn check_if_modified(&mut self) {
        if self.requests != self.ref_requests {
            self.change = Change::Modified;
            self.changed_fields.insert("requests");
        }
    }

    /// Turn a claim borrowed from the reference snapshot into a deleted entry
    pub fn mark_deleted(&mut self) {
        self.change = Change::Deleted;
        self.changed_fields.clear();
        self.index = 0;
        self.uid.clear();
        self.ref_requests = self.requests;
        self.requests = 0;
        self.container_list.clear();
        self.container_quantity = 0;
        self.generate_keys();
    }
}
