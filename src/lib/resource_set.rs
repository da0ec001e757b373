use log::{debug, info, warn};
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use crate::lib::container::{Change, Container, ResourceField, Resources};
use crate::lib::error::Result;
use crate::lib::filter::Filter;
use crate::lib::kubernetes::ingest_document;
use crate::lib::pvc::PersistentVolumeClaim;

/// Containers and claims of one snapshot, or of one comparison result
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResourceSet {
    pub containers: Vec<Container>,
    pub pvcs: Vec<PersistentVolumeClaim>,
    #[serde(skip)]
    indexed: bool,
}

/// Aggregated totals rendered below the container rows
#[derive(Debug, Clone, Default)]
pub struct Summary {
    pub pods_label: String,
    pub containers_label: String,
    pub resources: Resources,
    pub reference: Resources,
    /// Distinct claims referenced by the counted containers / all live claims
    pub claims_used: usize,
    pub claims_total: usize,
    pub ref_claims_used: usize,
    pub ref_claims_total: usize,
    pub change: Change,
    pub changed_fields: BTreeSet<ResourceField>,
}

impl ResourceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from one or more parsed snapshot documents.
    ///
    /// All documents are merged before indices and relations are renewed.
    pub fn load(documents: &[Value]) -> Result<Self> {
        let mut set = Self::new();
        for document in documents {
            ingest_document(&mut set, document)?;
        }
        set.renew_indices();
        set.renew_relations();

        let missing: usize = set
            .containers
            .iter()
            .map(|c| c.pvc_list_not_found.len())
            .sum();
        if missing > 0 {
            warn!("{} volume claim references point to claims missing from the snapshot", missing);
        }

        info!(
            "Loaded {} containers and {} volume claims",
            set.containers.len(),
            set.pvcs.len()
        );
        Ok(set)
    }

    pub fn is_indexed(&self) -> bool {
        self.indexed
    }

    /// Start a new pod, represented by a placeholder until its first container arrives
    pub fn add_pod(&mut self, placeholder: Container) {
        self.indexed = false;
        self.containers.push(placeholder);
    }

    /// Add a container, replacing the placeholder of its pod if there is one
    pub fn add_container(&mut self, container: Container) {
        self.indexed = false;
        if let Some(last) = self.containers.last_mut()
            && !last.has_container()
            && last.is_same_pod(&container, false)
        {
            *last = container;
        } else {
            self.containers.push(container);
        }
    }

    pub fn add_pvc(&mut self, pvc: PersistentVolumeClaim) {
        self.indexed = false;
        self.pvcs.push(pvc);
    }

    /// Sort containers and claims and recompute all indices and keys.
    ///
    /// Must run once per freshly loaded snapshot and before [`compare`](Self::compare);
    /// running it afterwards would split deleted entries into separate pods.
    pub fn renew_indices(&mut self) {
        self.containers.sort_by(|a, b| {
            a.app_name
                .cmp(&b.app_name)
                .then_with(|| a.pod_name.cmp(&b.pod_name))
                .then_with(|| a.name.cmp(&b.name))
        });
        self.pvcs.sort_by(|a, b| a.name.cmp(&b.name));

        let (mut app_index, mut pod_index, mut pod_local_index, mut local_index) = (0, 0, 0, 0);

        for i in 0..self.containers.len() {
            let (new_app, new_pod) = match i {
                0 => (true, true),
                _ => {
                    let (prev, current) = (&self.containers[i - 1], &self.containers[i]);
                    (!current.is_same_app(prev), !current.is_same_pod(prev, false))
                }
            };

            if new_app {
                app_index += 1;
                pod_local_index = 0;
            }
            if new_pod {
                pod_index += 1;
                pod_local_index += 1;
                local_index = 0;
            } else {
                local_index += 1;
            }

            let container = &mut self.containers[i];
            container.index = i;
            container.app_index = app_index;
            container.pod_index = pod_index;
            container.pod_local_index = pod_local_index;
            container.local_index = local_index;
            container.generate_keys();
        }

        for (i, pvc) in self.pvcs.iter_mut().enumerate() {
            pvc.index = i;
            pvc.generate_keys();
        }

        self.indexed = true;
        debug!(
            "Renewed indices: {} apps, {} pods, {} containers",
            app_index,
            pod_index,
            self.containers.len()
        );
    }

    /// Look up a claim by name; deleted claims are only returned when asked for
    pub fn find_pvc(&self, name: &str, include_deleted: bool) -> Option<&PersistentVolumeClaim> {
        pvc_position(&self.pvcs, name, include_deleted).map(|i| &self.pvcs[i])
    }

    /// Recompute container ↔ claim links and the derived claim totals
    pub fn renew_relations(&mut self) {
        for pvc in self.pvcs.iter_mut().filter(|p| !p.is_deleted()) {
            pvc.container_list.clear();
            pvc.container_quantity = 0;
        }

        let pvcs = &mut self.pvcs;
        for container in self.containers.iter_mut().filter(|c| !c.is_deleted()) {
            container.resources.pvc_quantity = 0;
            container.resources.pvc_requests = 0;
            container.pvc_list_not_found.clear();

            for claim in &container.pvc_list {
                match pvc_position(pvcs, claim, false) {
                    Some(i) => {
                        let pvc = &mut pvcs[i];
                        container.resources.pvc_quantity += 1;
                        container.resources.pvc_requests += pvc.requests;
                        pvc.container_list.insert(container.key.clone());
                        pvc.container_quantity = pvc.container_list.len();
                    }
                    None => {
                        debug!("Container '{}' uses unknown claim '{}'", container.key, claim);
                        container.pvc_list_not_found.insert(claim.clone());
                    }
                }
            }
        }
    }

    /// Turn this set into the comparison result against `reference`.
    ///
    /// Entities are matched purely by key. Entities only present in the
    /// reference are copied in as deleted entries.
    pub fn compare(&mut self, reference: &ResourceSet) {
        assert!(
            self.indexed && reference.indexed,
            "resource sets must be index-renewed before comparison"
        );

        self.compare_pvcs(reference);
        self.compare_containers(reference);
        self.promote_pod_changes();

        self.containers.sort_by(|a, b| a.order_key().cmp(&b.order_key()));
        self.pvcs.sort_by(|a, b| a.key.cmp(&b.key));
        self.renew_relations();

        info!(
            "Compared against reference: {} containers, {} volume claims",
            self.containers.len(),
            self.pvcs.len()
        );
    }

    fn compare_pvcs(&mut self, reference: &ResourceSet) {
        let mut by_key: HashMap<&str, &PersistentVolumeClaim> = HashMap::new();
        for pvc in &reference.pvcs {
            by_key.entry(pvc.key.as_str()).or_insert(pvc);
        }

        for pvc in self.pvcs.iter_mut() {
            match by_key.get(pvc.key.as_str()) {
                None => pvc.change = Change::New,
                Some(ref_pvc) => {
                    pvc.ref_requests = ref_pvc.requests;
                    pvc.check_if_modified();
                }
            }
        }

        let current: HashSet<&str> = self.pvcs.iter().map(|p| p.key.as_str()).collect();
        let deleted: Vec<PersistentVolumeClaim> = reference
            .pvcs
            .iter()
            .filter(|p| !current.contains(p.key.as_str()))
            .cloned()
            .map(|mut p| {
                p.mark_deleted();
                p
            })
            .collect();

        debug!("{} volume claims deleted since reference", deleted.len());
        self.pvcs.extend(deleted);
    }

    fn compare_containers(&mut self, reference: &ResourceSet) {
        let mut by_key: HashMap<&str, &Container> = HashMap::new();
        for container in &reference.containers {
            by_key.entry(container.key.as_str()).or_insert(container);
        }

        for container in self.containers.iter_mut() {
            match by_key.get(container.key.as_str()) {
                None => container.change = Change::NewContainer,
                Some(ref_container) => {
                    container.reference = ref_container.resources;
                    container.check_if_modified();
                }
            }
        }

        let current: HashSet<&str> = self.containers.iter().map(|c| c.key.as_str()).collect();
        let deleted: Vec<Container> = reference
            .containers
            .iter()
            .filter(|c| !current.contains(c.key.as_str()))
            .cloned()
            .map(|mut c| {
                c.mark_deleted();
                c
            })
            .collect();

        debug!("{} containers deleted since reference", deleted.len());
        self.containers.extend(deleted);
    }

    /// Promote container-level New/Deleted to pod level when the whole pod agrees
    fn promote_pod_changes(&mut self) {
        let mut pods: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
        for (i, container) in self.containers.iter().enumerate() {
            pods.entry(container.pod_key.as_str()).or_default().push(i);
        }

        let promotions: Vec<(usize, Change)> = pods
            .values()
            .filter_map(|members| {
                let first = self.containers[members[0]].change;
                let promoted = match first {
                    Change::NewContainer => Change::NewPod,
                    Change::DeletedContainer => Change::DeletedPod,
                    _ => return None,
                };
                members
                    .iter()
                    .all(|&i| self.containers[i].change == first)
                    .then(|| members.iter().map(move |&i| (i, promoted)))
            })
            .flatten()
            .collect();

        for (i, change) in promotions {
            self.containers[i].change = change;
        }
    }

    /// Containers matching `filter`; all claims are kept
    pub fn filter(&self, filter: &Filter) -> ResourceSet {
        if filter.is_empty() {
            return self.clone();
        }

        let containers: Vec<Container> = self
            .containers
            .iter()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect();
        debug!(
            "Filter kept {} of {} containers",
            containers.len(),
            self.containers.len()
        );

        ResourceSet {
            containers,
            pvcs: self.pvcs.clone(),
            indexed: self.indexed,
        }
    }

    /// Totals over the containers accepted by `include`.
    ///
    /// Current values and counts cover live containers only; reference
    /// values also cover deleted entries so both sides stay comparable.
    pub fn totals<F>(&self, include: F, with_changes: bool) -> Summary
    where
        F: Fn(&Container) -> bool,
    {
        let mut summary = Summary::default();
        let mut pods: BTreeSet<&str> = BTreeSet::new();
        let mut claims: BTreeSet<&str> = BTreeSet::new();
        let mut ref_claims: BTreeSet<&str> = BTreeSet::new();
        let mut containers = 0;

        for container in self.containers.iter().filter(|c| include(c)) {
            for field in ResourceField::ALL {
                if !matches!(field, ResourceField::PvcQuantity | ResourceField::PvcRequests) {
                    *summary.resources.get_mut(field) += container.resources.get(field);
                    *summary.reference.get_mut(field) += container.reference.get(field);
                }
            }

            if !container.change.is_new() {
                ref_claims.extend(container.pvc_list.iter().map(String::as_str));
            }
            if container.is_deleted() {
                continue;
            }

            pods.insert(&container.pod_key);
            if container.has_container() {
                containers += 1;
            }
            claims.extend(
                container
                    .pvc_list
                    .iter()
                    .filter(|c| !container.pvc_list_not_found.contains(*c))
                    .map(String::as_str),
            );
        }

        for pvc in claims.iter().filter_map(|name| self.find_pvc(name, false)) {
            summary.claims_used += 1;
            summary.resources.pvc_requests += pvc.requests;
        }
        for pvc in ref_claims.iter().filter_map(|name| self.find_pvc(name, true)) {
            if !pvc.change.is_new() {
                summary.ref_claims_used += 1;
                summary.reference.pvc_requests += pvc.ref_requests;
            }
        }
        summary.resources.pvc_quantity = summary.claims_used as u64;
        summary.reference.pvc_quantity = summary.ref_claims_used as u64;
        summary.claims_total = self.pvcs.iter().filter(|p| !p.is_deleted()).count();
        summary.ref_claims_total = self.pvcs.iter().filter(|p| !p.change.is_new()).count();

        summary.pods_label = pods.len().to_string();
        summary.containers_label = containers.to_string();

        if with_changes {
            for field in summary.resources.differing_fields(&summary.reference) {
                summary.change = Change::Modified;
                summary.changed_fields.insert(field);
            }
        }

        summary
    }

    /// The two summary rows: everything, and non-Job non-init containers only
    pub fn summaries(&self, with_changes: bool) -> [Summary; 2] {
        let mut all = self.totals(|_| true, with_changes);
        all.pods_label = format!("{} pods", all.pods_label);
        all.containers_label = format!("{} containers", all.containers_label);

        let mut running = self.totals(|c| !c.is_job() && !c.is_init(), with_changes);
        running.pods_label = format!("{} non-jobs", running.pods_label);
        running.containers_label = format!("{} non-init containers", running.containers_label);

        [all, running]
    }
}

fn pvc_position(pvcs: &[PersistentVolumeClaim], name: &str, include_deleted: bool) -> Option<usize> {
    pvcs.iter()
        .position(|p| p.name == name && (include_deleted || !p.is_deleted()))
}
