//! Conversion of `kubectl get -o json` style documents into containers and claims.

use std::collections::{BTreeMap, BTreeSet};

use k8s_openapi::api::core::v1::{
    Container as PodContainer, PersistentVolumeClaim as ClaimResource, Pod, Volume,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use log::{debug, info};
use serde_json::Value;

use crate::lib::container::{Container, ContainerType};
use crate::lib::error::{DocumentError, QuantityError, Result};
use crate::lib::pvc::PersistentVolumeClaim;
use crate::lib::resource_set::ResourceSet;
use crate::lib::units::{cpu_to_millicores, memory_to_bytes};

const POD: &str = "Pod";
const CLAIM: &str = "PersistentVolumeClaim";

/// Add every Pod and PersistentVolumeClaim item of `document` to `set`.
///
/// The document must be a `v1` list. Any contract violation aborts the
/// ingestion; `set` is then left partially filled and should be dropped.
pub fn ingest_document(set: &mut ResourceSet, document: &Value) -> Result<()> {
    let api_version = document
        .get("apiVersion")
        .and_then(Value::as_str)
        .unwrap_or_default();
    if api_version != "v1" {
        return Err(DocumentError::UnsupportedApiVersion(api_version.to_string()).into());
    }

    let items = document
        .get("items")
        .and_then(Value::as_array)
        .ok_or(DocumentError::MissingItems)?;

    let (mut pods, mut claims) = (0, 0);
    for (index, item) in items.iter().enumerate() {
        match item.get("kind").and_then(Value::as_str) {
            Some(POD) => {
                ingest_pod(set, index, item)?;
                pods += 1;
            }
            Some(CLAIM) => {
                set.add_pvc(parse_claim(index, item)?);
                claims += 1;
            }
            other => {
                return Err(DocumentError::UnsupportedKind {
                    index,
                    kind: other.unwrap_or("<missing>").to_string(),
                }
                .into());
            }
        }
    }

    info!("Ingested {} pods and {} volume claims", pods, claims);
    Ok(())
}

fn ingest_pod(set: &mut ResourceSet, index: usize, item: &Value) -> Result<()> {
    let pod: Pod = serde_json::from_value(item.clone()).map_err(|source| {
        DocumentError::Malformed {
            index,
            kind: POD,
            source,
        }
    })?;

    let pod_name = pod.metadata.name.clone().ok_or(DocumentError::MissingField {
        index,
        kind: POD,
        field: "metadata.name",
    })?;

    let owners = pod.metadata.owner_references.as_deref().unwrap_or_default();
    let [owner] = owners else {
        return Err(DocumentError::OwnerReferences {
            index,
            pod: pod_name,
            count: owners.len(),
        }
        .into());
    };
    let app_name = app_name(&owner.kind, &owner.name);

    let spec = pod.spec.as_ref().ok_or(DocumentError::MissingField {
        index,
        kind: POD,
        field: "spec",
    })?;

    check_volume_types(&pod_name, item)?;
    let volumes = spec.volumes.as_deref().unwrap_or_default();

    debug!(
        "Pod '{}' of {} '{}' (app '{}')",
        pod_name, owner.kind, owner.name, app_name
    );
    let placeholder = Container::placeholder(app_name, owner.kind.clone(), pod_name);
    set.add_pod(placeholder.clone());

    let init = spec.init_containers.iter().flatten().map(|c| (ContainerType::Init, c));
    let regular = spec.containers.iter().map(|c| (ContainerType::Regular, c));
    for (container_type, spec_container) in init.chain(regular) {
        let container = parse_container(&placeholder, container_type, spec_container, volumes)?;
        set.add_container(container);
    }

    Ok(())
}

/// Owning workload name; ReplicaSet names carry a generated suffix
fn app_name(kind: &str, owner: &str) -> String {
    match (kind, owner.rsplit_once('-')) {
        ("ReplicaSet", Some((app, _))) => app.to_string(),
        _ => owner.to_string(),
    }
}

/// Every volume must declare exactly one source type besides its name.
///
/// Checked on the raw item since typed volumes drop unknown source keys.
fn check_volume_types(pod: &str, item: &Value) -> Result<()> {
    let volumes = item
        .pointer("/spec/volumes")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    for volume in volumes {
        let Some(fields) = volume.as_object() else {
            continue;
        };
        let count = fields.keys().filter(|k| k.as_str() != "name").count();
        if count != 1 {
            return Err(DocumentError::VolumeType {
                pod: pod.to_string(),
                volume: fields
                    .get("name")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                count,
            }
            .into());
        }
    }
    Ok(())
}

fn parse_container(
    pod: &Container,
    container_type: ContainerType,
    spec: &PodContainer,
    volumes: &[Volume],
) -> Result<Container> {
    let mut container = pod.with_container(container_type, &spec.name);

    let requests = spec.resources.as_ref().and_then(|r| r.requests.as_ref());
    let limits = spec.resources.as_ref().and_then(|r| r.limits.as_ref());
    let context = |resource: &str, kind: &str| {
        format!(
            "pod '{}' container '{}' {} {}",
            container.pod_name, container.name, resource, kind
        )
    };

    let resources = &mut container.resources;
    resources.cpu_requests = quantity(requests, "cpu", cpu_to_millicores, || context("cpu", "request"))?;
    resources.cpu_limits = quantity(limits, "cpu", cpu_to_millicores, || context("cpu", "limit"))?;
    resources.memory_requests =
        quantity(requests, "memory", memory_to_bytes, || context("memory", "request"))?;
    resources.memory_limits =
        quantity(limits, "memory", memory_to_bytes, || context("memory", "limit"))?;
    resources.ephemeral_requests = quantity(requests, "ephemeral-storage", memory_to_bytes, || {
        context("ephemeral-storage", "request")
    })?;
    resources.ephemeral_limits = quantity(limits, "ephemeral-storage", memory_to_bytes, || {
        context("ephemeral-storage", "limit")
    })?;

    container.pvc_list = claim_names(&container, spec, volumes)?;
    Ok(container)
}

/// Parse one quantity of a requests/limits map; absent values count as 0
fn quantity<P, C>(
    map: Option<&BTreeMap<String, Quantity>>,
    resource: &str,
    parse: P,
    context: C,
) -> Result<u64>
where
    P: Fn(&str) -> std::result::Result<u64, QuantityError>,
    C: FnOnce() -> String,
{
    match map.and_then(|m| m.get(resource)) {
        None => Ok(0),
        Some(q) => parse(&q.0).map_err(|source| {
            DocumentError::InvalidQuantity {
                context: context(),
                source,
            }
            .into()
        }),
    }
}

/// Claims mounted by a container, resolved through the pod's volume list
fn claim_names(
    container: &Container,
    spec: &PodContainer,
    volumes: &[Volume],
) -> Result<BTreeSet<String>> {
    let mut claims = BTreeSet::new();

    for mount in spec.volume_mounts.iter().flatten() {
        let volume = volumes
            .iter()
            .find(|v| v.name == mount.name)
            .ok_or_else(|| DocumentError::UnknownVolume {
                pod: container.pod_name.clone(),
                container: container.name.clone(),
                volume: mount.name.clone(),
            })?;

        if let Some(source) = &volume.persistent_volume_claim {
            claims.insert(source.claim_name.clone());
        }
    }

    Ok(claims)
}

fn parse_claim(index: usize, item: &Value) -> Result<PersistentVolumeClaim> {
    let claim: ClaimResource = serde_json::from_value(item.clone()).map_err(|source| {
        DocumentError::Malformed {
            index,
            kind: CLAIM,
            source,
        }
    })?;
    let missing = |field| DocumentError::MissingField {
        index,
        kind: CLAIM,
        field,
    };

    let name = claim.metadata.name.clone().ok_or(missing("metadata.name"))?;
    let uid = claim.metadata.uid.clone().ok_or(missing("metadata.uid"))?;
    let spec = claim.spec.as_ref().ok_or(missing("spec"))?;
    let storage_class = spec
        .storage_class_name
        .clone()
        .ok_or(missing("spec.storageClassName"))?;
    let storage = spec
        .resources
        .as_ref()
        .and_then(|r| r.requests.as_ref())
        .and_then(|r| r.get("storage"))
        .ok_or(missing("spec.resources.requests.storage"))?;

    let requests = memory_to_bytes(&storage.0).map_err(|source| DocumentError::InvalidQuantity {
        context: format!("volume claim '{}' storage request", name),
        source,
    })?;

    debug!("Volume claim '{}' ({}) requests {} bytes", name, storage_class, requests);
    Ok(PersistentVolumeClaim::new(name, uid, storage_class, requests))
}
