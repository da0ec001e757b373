//! Table, tree and flat (CSV) rendering of a resource set.

use anstyle::Style;
use log::debug;
use std::collections::HashMap;
use std::iter;

use crate::lib::cli::OutputFormat;
use crate::lib::config::RenderConfig;
use crate::lib::container::{Change, Container, ResourceField, ResourceUnit};
use crate::lib::fields::{Align, Field};
use crate::lib::resource_set::{ResourceSet, Summary};
use crate::lib::units::{bytes_to_string, millicores_to_string};

const SEPARATOR: &str = "  ";
const CONTAINER_INDENT: &str = "      ";
const SET_SEPARATOR: &str = ";";

/// Display width of every rendered column
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldWidths(HashMap<Field, usize>);

impl FieldWidths {
    pub fn get(&self, field: Field) -> usize {
        self.0.get(&field).copied().unwrap_or_default()
    }

    fn widen(&mut self, field: Field, width: usize) {
        let current = self.0.entry(field).or_default();
        *current = (*current).max(width);
    }

    /// Full line width for `columns`, separators included
    pub fn line_width(&self, columns: &[Field]) -> usize {
        let cells: usize = columns.iter().map(|f| self.get(*f)).sum();
        cells + SEPARATOR.len() * columns.len().saturating_sub(1)
    }
}

/// One output line of the table or tree view
#[derive(Debug, Clone, Copy)]
enum Row<'a> {
    Header,
    Separator,
    Data(&'a Container),
    Summary(&'a Summary),
}

pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn render(&self, set: &ResourceSet, format: OutputFormat) -> String {
        match format {
            OutputFormat::Pretty => self.render_table(set, true),
            OutputFormat::Table => self.render_table(set, false),
            OutputFormat::Tree => self.render_tree(set),
            OutputFormat::Csv => self.render_flat(&set.containers),
        }
    }

    /// Configured table columns, followed by the change columns when comparing
    pub fn table_columns(&self) -> Vec<Field> {
        let mut columns = self.config.table_columns.clone();
        if self.config.with_changes {
            columns.extend(&self.config.change_columns);
        }
        columns
    }

    /// Branch text column followed by the non-identity table columns
    pub fn tree_columns(&self) -> Vec<Field> {
        iter::once(Field::TreeItem)
            .chain(self.table_columns().into_iter().filter(|f| !f.is_identity()))
            .collect()
    }

    /// One line per container. With `pretty`, repeated application cells are
    /// left blank and pod cells are only shown on the pod's head line.
    pub fn render_table(&self, set: &ResourceSet, pretty: bool) -> String {
        let columns = self.table_columns();
        let summaries = set.summaries(self.config.with_changes);
        let widths = self.compute_field_widths(set, &summaries, &columns);

        let blanks = if pretty {
            repeated_fields(&set.containers)
        } else {
            Vec::new()
        };

        let mut out = String::new();
        for row in [Row::Header, Row::Separator] {
            out.push_str(&self.line(row, &columns, &widths, &[]));
            out.push('\n');
        }
        for (i, container) in set.containers.iter().enumerate() {
            let blank = blanks.get(i).map_or(&[][..], Vec::as_slice);
            out.push_str(&self.line(Row::Data(container), &columns, &widths, blank));
            out.push('\n');
        }

        out.push_str(&self.line(Row::Separator, &columns, &widths, &[]));
        out.push('\n');
        for summary in &summaries {
            out.push_str(&self.line(Row::Summary(summary), &columns, &widths, &[]));
            out.push('\n');
        }
        out
    }

    /// Pods with their containers indented below
    pub fn render_tree(&self, set: &ResourceSet) -> String {
        let columns = self.tree_columns();
        let summaries = set.summaries(self.config.with_changes);
        let widths = self.compute_field_widths(set, &summaries, &columns);

        let mut out = String::new();
        for row in [Row::Header, Row::Separator] {
            out.push_str(&self.line(row, &columns, &widths, &[]));
            out.push('\n');
        }

        for group in pod_groups(&set.containers) {
            if let Some(head) = group.get(pod_head(group)) {
                out.push_str(&self.pod_line(head, widths.get(Field::TreeItem)));
                out.push('\n');
            }
            for container in group.iter().filter(|c| c.has_container()) {
                out.push_str(&self.line(Row::Data(container), &columns, &widths, &[]));
                out.push('\n');
            }
        }

        out.push_str(&self.line(Row::Separator, &columns, &widths, &[]));
        out.push('\n');
        for summary in &summaries {
            out.push_str(&self.line(Row::Summary(summary), &columns, &widths, &[]));
            out.push('\n');
        }
        out
    }

    /// Header row of literal field names, then one row of raw values per container
    pub fn render_flat(&self, containers: &[Container]) -> String {
        let mut out = csv_line(FLAT_HEADERS.iter().map(|h| h.to_string()));
        for container in containers {
            out.push_str(&csv_line(flat_values(container)));
        }
        out
    }

    /// Column widths fitting every header, row, summary and tree branch,
    /// shrunk to the configured maximum line width when there is one.
    pub fn compute_field_widths(
        &self,
        set: &ResourceSet,
        summaries: &[Summary],
        columns: &[Field],
    ) -> FieldWidths {
        let mut widths = FieldWidths::default();

        for &field in columns {
            widths.widen(field, field.spec().header.chars().count());
            for container in &set.containers {
                widths.widen(field, self.container_cell(container, field).chars().count());
                if field == Field::TreeItem {
                    widths.widen(field, pod_branch(container).chars().count());
                }
            }
            for summary in summaries {
                widths.widen(field, self.summary_cell(summary, field).chars().count());
            }
        }

        if let Some(target) = self.config.max_width {
            self.scale_widths(&mut widths, columns, target);
        }
        widths
    }

    /// Shrink scalable columns by one common ratio so the line fits `target`
    fn scale_widths(&self, widths: &mut FieldWidths, columns: &[Field], target: usize) {
        let (scalable, fixed): (Vec<Field>, Vec<Field>) =
            columns.iter().partition(|f| f.spec().scalable);
        let scalable_width: usize = scalable.iter().map(|f| widths.get(*f)).sum();
        if scalable_width == 0 {
            return;
        }

        let fixed_width = fixed.iter().map(|f| widths.get(*f)).sum::<usize>()
            + SEPARATOR.len() * columns.len().saturating_sub(1);
        let ratio = (target.saturating_sub(fixed_width) as f64 / scalable_width as f64).min(1.0);

        for field in scalable {
            let width = widths.get(field);
            let scaled = ((width as f64 * ratio).floor() as usize)
                .max(field.spec().min_width)
                .min(width);
            widths.0.insert(field, scaled);
        }
        debug!(
            "Scaled columns to {} of {} characters (ratio {:.2})",
            widths.line_width(columns),
            target,
            ratio
        );
    }

    fn line(&self, row: Row, columns: &[Field], widths: &FieldWidths, blank: &[Field]) -> String {
        if let Row::Separator = row {
            return "-".repeat(widths.line_width(columns));
        }

        let mut line = columns
            .iter()
            .enumerate()
            .map(|(i, &field)| {
                let text = if blank.contains(&field) {
                    String::new()
                } else {
                    match row {
                        Row::Header => field.spec().header.to_string(),
                        Row::Data(container) => self.container_cell(container, field),
                        Row::Summary(summary) => self.summary_cell(summary, field),
                        Row::Separator => String::new(),
                    }
                };
                let cell = fit(&text, widths.get(field), field.spec().align, i + 1 == columns.len());
                match self.cell_style(row, field) {
                    Some(style) => format!("{style}{cell}{style:#}"),
                    None => cell,
                }
            })
            .collect::<Vec<_>>()
            .join(SEPARATOR);
        line.truncate(line.trim_end_matches(' ').len());
        line
    }

    fn pod_line(&self, container: &Container, width: usize) -> String {
        let text = fit(&pod_branch(container), width, Align::Left, true);
        if !self.config.color {
            return text;
        }
        let style = self.config.palette.pod_style(container.change);
        format!("{style}{text}{style:#}")
    }

    /// Modified rows only highlight the changed fields and the change column
    fn cell_style(&self, row: Row, field: Field) -> Option<Style> {
        if !self.config.color {
            return None;
        }
        let (change, changed_fields) = match row {
            Row::Data(container) => (container.change, &container.changed_fields),
            Row::Summary(summary) => (summary.change, &summary.changed_fields),
            _ => return None,
        };

        if change != Change::Modified {
            return self.config.palette.row_style(change);
        }
        let changed = field == Field::Change
            || field
                .resource()
                .is_some_and(|(resource, _)| changed_fields.contains(&resource));
        changed.then_some(self.config.palette.modified)
    }

    fn container_cell(&self, container: &Container, field: Field) -> String {
        if let Some((resource, reference)) = field.resource() {
            let values = if reference {
                &container.reference
            } else {
                &container.resources
            };
            return self.format_value(resource, values.get(resource));
        }

        match field {
            Field::AppName => container.app_name.clone(),
            Field::WorkloadType => container.workload_type.clone(),
            Field::PodIndex => pod_index(container),
            Field::PodName => container.pod_name.clone(),
            Field::Type => container
                .container_type
                .map(|t| t.to_string())
                .unwrap_or_default(),
            Field::Name => container.name.clone(),
            Field::MissingPvc => join(&container.pvc_list_not_found, ","),
            Field::Change => container.change.to_string(),
            Field::TreeItem => container_branch(container),
            _ => String::new(),
        }
    }

    fn summary_cell(&self, summary: &Summary, field: Field) -> String {
        match field {
            Field::PodName => summary.pods_label.clone(),
            Field::Name => summary.containers_label.clone(),
            Field::TreeItem => format!("{}, {}", summary.pods_label, summary.containers_label),
            Field::PvcQuantity => format!("{}/{}", summary.claims_used, summary.claims_total),
            Field::RefPvcQuantity => {
                format!("{}/{}", summary.ref_claims_used, summary.ref_claims_total)
            }
            Field::Change if self.config.with_changes => summary.change.to_string(),
            _ => match field.resource() {
                Some((resource, false)) => self.format_value(resource, summary.resources.get(resource)),
                Some((resource, true)) => self.format_value(resource, summary.reference.get(resource)),
                None => String::new(),
            },
        }
    }

    fn format_value(&self, resource: ResourceField, value: u64) -> String {
        match resource.unit() {
            ResourceUnit::Millicores => millicores_to_string(value, self.config.units),
            ResourceUnit::Bytes => bytes_to_string(value, self.config.units),
            ResourceUnit::Count => value.to_string(),
        }
    }
}

/// Runs of consecutive containers sharing a pod key
fn pod_groups(containers: &[Container]) -> impl Iterator<Item = &[Container]> {
    containers.chunk_by(|a, b| b.is_same_pod(a, true))
}

/// Position of the member whose pod name and index represent the group.
///
/// Deleted entries sort first but carry the reference pod, so the first live
/// member is used; a fully deleted pod falls back to its first entry.
fn pod_head(group: &[Container]) -> usize {
    group.iter().position(|c| !c.is_deleted()).unwrap_or(0)
}

/// Cells left blank per container in the pretty view: application cells
/// repeating the previous line, and pod cells on every line but the pod head
fn repeated_fields(containers: &[Container]) -> Vec<Vec<Field>> {
    let mut blanks = Vec::with_capacity(containers.len());
    let mut previous: Option<&Container> = None;
    for group in pod_groups(containers) {
        let head = pod_head(group);
        for (i, container) in group.iter().enumerate() {
            let mut fields = Vec::new();
            if previous.is_some_and(|p| container.is_same_app(p)) {
                fields.extend([Field::AppName, Field::WorkloadType]);
            }
            if i != head {
                fields.extend([Field::PodIndex, Field::PodName]);
            }
            blanks.push(fields);
            previous = Some(container);
        }
    }
    blanks
}

/// Deleted entries have no live position
fn pod_index(container: &Container) -> String {
    match container.pod_index {
        0 => String::new(),
        index => index.to_string(),
    }
}

fn pod_branch(container: &Container) -> String {
    format!(
        "{:<4}{:<13}{}",
        pod_index(container),
        container.workload_type,
        container.pod_name
    )
}

fn container_branch(container: &Container) -> String {
    match container.container_type {
        Some(container_type) => format!(
            "{}({:<4}) {}",
            CONTAINER_INDENT,
            container_type.as_str(),
            container.name
        ),
        None => String::new(),
    }
}

/// Pad or truncate `text` to `width` characters; a trailing left-aligned cell is not padded
fn fit(text: &str, width: usize, align: Align, last: bool) -> String {
    let length = text.chars().count();
    let text = if length > width {
        match width {
            0 => String::new(),
            _ => text.chars().take(width - 1).chain(iter::once('…')).collect(),
        }
    } else {
        text.to_string()
    };

    match align {
        Align::Left if last => text,
        Align::Left => format!("{:<width$}", text),
        Align::Right => format!("{:>width$}", text),
    }
}

fn join<'a>(values: impl IntoIterator<Item = &'a String>, separator: &str) -> String {
    values
        .into_iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(separator)
}

const FLAT_HEADERS: [&str; 33] = [
    "key",
    "podKey",
    "appKey",
    "index",
    "appIndex",
    "podIndex",
    "podLocalIndex",
    "localIndex",
    "appName",
    "workloadType",
    "podName",
    "type",
    "name",
    "CPURequests",
    "CPULimits",
    "MemoryRequests",
    "MemoryLimits",
    "EphemeralStorageRequests",
    "EphemeralStorageLimits",
    "PVCQuantity",
    "PVCRequests",
    "PVCList",
    "PVCList_not_found",
    "change",
    "changedFields",
    "ref_CPURequests",
    "ref_CPULimits",
    "ref_MemoryRequests",
    "ref_MemoryLimits",
    "ref_EphemeralStorageRequests",
    "ref_EphemeralStorageLimits",
    "ref_PVCQuantity",
    "ref_PVCRequests",
];

fn flat_values(container: &Container) -> Vec<String> {
    let mut values = vec![
        container.key.clone(),
        container.pod_key.clone(),
        container.app_key.clone(),
        container.index.to_string(),
        container.app_index.to_string(),
        container.pod_index.to_string(),
        container.pod_local_index.to_string(),
        container.local_index.to_string(),
        container.app_name.clone(),
        container.workload_type.clone(),
        container.pod_name.clone(),
        container
            .container_type
            .map(|t| t.to_string())
            .unwrap_or_default(),
        container.name.clone(),
    ];
    values.extend(ResourceField::ALL.map(|f| container.resources.get(f).to_string()));
    values.push(join(&container.pvc_list, SET_SEPARATOR));
    values.push(join(&container.pvc_list_not_found, SET_SEPARATOR));
    values.push(container.change.to_string());
    values.push(
        container
            .changed_fields
            .iter()
            .map(|f| f.name())
            .collect::<Vec<_>>()
            .join(SET_SEPARATOR),
    );
    values.extend(ResourceField::ALL.map(|f| container.reference.get(f).to_string()));
    values
}

fn csv_line(values: impl IntoIterator<Item = String>) -> String {
    let mut line = values
        .into_iter()
        .map(|value| {
            if value.contains([',', '"', '\n', '\r']) {
                format!("\"{}\"", value.replace('"', "\"\""))
            } else {
                value
            }
        })
        .collect::<Vec<_>>()
        .join(",");
    line.push('\n');
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lib::container::ContainerType;
    use crate::lib::pvc::PersistentVolumeClaim;

    fn add(set: &mut ResourceSet, app: &str, kind: &str, pod: &str, name: &str, cpu: u64, mem: u64) {
        let placeholder = Container::placeholder(app.to_string(), kind.to_string(), pod.to_string());
        set.add_pod(placeholder.clone());
        let mut container = placeholder.with_container(ContainerType::Regular, name);
        container.resources.cpu_requests = cpu;
        container.resources.memory_requests = mem;
        set.add_container(container);
    }

    fn web_set(cpu: u64) -> ResourceSet {
        let mut set = ResourceSet::new();
        add(&mut set, "web", "ReplicaSet", "web-abc", "app", cpu, 256 * 1024 * 1024);
        set.renew_indices();
        set.renew_relations();
        set
    }

    fn renderer(config: RenderConfig) -> Renderer {
        Renderer::new(config)
    }

    #[test]
    fn test_table_without_reference() {
        let out = renderer(RenderConfig::default()).render_table(&web_set(500), false);
        let lines: Vec<&str> = out.lines().collect();

        assert!(lines[0].starts_with("Application"));
        assert!(!lines[0].contains("Change"));
        assert!(!lines[0].contains("rCPU_R"));
        assert!(lines[1].chars().all(|c| c == '-'));

        let row = lines[2];
        assert!(row.contains("web-abc"));
        assert!(row.contains("500m"));
        assert!(row.contains("256.0Mi"));

        assert!(lines.iter().any(|l| l.contains("1 pods") && l.contains("1 containers")));
        assert!(lines.iter().any(|l| l.contains("1 non-jobs")));
        assert!(!out.contains('\u{1b}'));
    }

    #[test]
    fn test_table_with_reference_shows_changes() {
        let mut current = web_set(500);
        current.compare(&web_set(250));
        let config = RenderConfig {
            with_changes: true,
            ..RenderConfig::default()
        };

        let out = renderer(config).render_table(&current, false);
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].contains("Change"));
        assert!(lines[0].contains("rCPU_R"));
        assert!(lines[2].contains("Modified"));
        assert!(lines[2].contains("250m"));
    }

    #[test]
    fn test_pretty_blanks_repeated_cells() {
        let mut set = ResourceSet::new();
        add(&mut set, "web", "ReplicaSet", "web-abc", "app", 100, 0);
        let sidecar = set.containers[0].with_container(ContainerType::Regular, "proxy");
        set.add_container(sidecar);
        set.renew_indices();

        let renderer = renderer(RenderConfig::default());
        let pretty = renderer.render_table(&set, true);
        let full = renderer.render_table(&set, false);

        assert_eq!(pretty.matches("web-abc").count(), 1);
        assert_eq!(full.matches("web-abc").count(), 2);
    }

    #[test]
    fn test_tree_groups_containers_under_pod() {
        let mut set = ResourceSet::new();
        add(&mut set, "web", "ReplicaSet", "web-abc", "app", 100, 0);
        let sidecar = set.containers[0].with_container(ContainerType::Init, "setup");
        set.add_container(sidecar);
        add(&mut set, "db", "StatefulSet", "db-0", "pg", 100, 0);
        set.renew_indices();

        let out = renderer(RenderConfig::default()).render_tree(&set);
        let lines: Vec<&str> = out.lines().collect();

        assert!(lines[0].starts_with("Item"));
        assert_eq!(lines[2], "1   StatefulSet  db-0");
        assert!(lines[3].starts_with("      (reg ) pg"));
        assert_eq!(lines[4], "2   ReplicaSet   web-abc");
        assert!(lines[5].starts_with("      (reg ) app"));
        assert!(lines[6].starts_with("      (init) setup"));
    }

    #[test]
    fn test_live_pod_heads_group_with_deleted_members() {
        let mut current = ResourceSet::new();
        add(&mut current, "web", "ReplicaSet", "web-new", "app", 100, 0);
        current.renew_indices();

        let mut reference = ResourceSet::new();
        add(&mut reference, "web", "ReplicaSet", "web-old", "app", 100, 0);
        let proxy = reference.containers[0].with_container(ContainerType::Regular, "proxy");
        reference.add_container(proxy);
        reference.renew_indices();

        current.compare(&reference);
        assert!(current.containers[0].is_deleted());

        let renderer = renderer(RenderConfig {
            with_changes: true,
            ..RenderConfig::default()
        });

        let tree = renderer.render_tree(&current);
        let lines: Vec<&str> = tree.lines().collect();
        assert_eq!(lines[2], "1   ReplicaSet   web-new");
        assert!(lines[3].starts_with("      (reg ) proxy"));
        assert!(lines[4].starts_with("      (reg ) app"));
        assert!(!tree.contains("web-old"));

        let pretty = renderer.render_table(&current, true);
        assert_eq!(pretty.matches("web-new").count(), 1);
        assert!(!pretty.contains("web-old"));
        let head = pretty.lines().find(|l| l.contains("web-new")).unwrap();
        assert!(head.contains("Unchanged"));
        assert!(!head.contains("proxy"));
    }

    #[test]
    fn test_deleted_pod_heads_its_own_group() {
        let mut current = web_set(500);
        let mut reference = web_set(500);
        add(&mut reference, "batch", "Job", "batch-1", "run", 100, 0);
        reference.renew_indices();

        current.compare(&reference);

        let out = renderer(RenderConfig {
            with_changes: true,
            ..RenderConfig::default()
        })
        .render_tree(&current);
        assert!(out.lines().any(|l| l == "    Job          batch-1"));
    }

    #[test]
    fn test_lines_have_no_trailing_spaces() {
        let renderer = renderer(RenderConfig::default());
        let set = web_set(500);
        for out in [renderer.render_table(&set, false), renderer.render_tree(&set)] {
            assert!(out.lines().all(|l| !l.ends_with(' ')), "{}", out);
        }
    }

    #[test]
    fn test_tree_colors_modified_fields_only() {
        let mut current = web_set(500);
        current.compare(&web_set(250));
        let config = RenderConfig {
            with_changes: true,
            color: true,
            ..RenderConfig::default()
        };
        let palette = config.palette.clone();
        let renderer = renderer(config);

        let out = renderer.render_tree(&current);
        let container_line = out
            .lines()
            .find(|l| l.contains("(reg )"))
            .unwrap();

        let modified = palette.modified.render().to_string();
        // CPU_R, rCPU_R and Change are highlighted, Mem_R is not
        assert_eq!(container_line.matches(&modified).count(), 3);
        assert!(container_line.contains(&format!("{}Modified", modified)));
        assert!(out.contains(&palette.pod.render().to_string()));
    }

    #[test]
    fn test_compute_field_widths() {
        let set = web_set(500);
        let renderer = renderer(RenderConfig::default());
        let summaries = set.summaries(false);
        let columns = [Field::PodName, Field::CpuRequests, Field::Name];

        let widths = renderer.compute_field_widths(&set, &summaries, &columns);
        assert_eq!(widths.get(Field::PodName), "web-abc".len());
        assert_eq!(widths.get(Field::CpuRequests), "CPU_R".len());
        // Summary label "1 containers" is the longest container cell
        assert_eq!(widths.get(Field::Name), "1 containers".len());
        assert_eq!(widths.line_width(&columns), 7 + 5 + 12 + 4);
    }

    #[test]
    fn test_scaling_shrinks_only_scalable_columns() {
        let mut set = ResourceSet::new();
        let long_pod = "p".repeat(60);
        let long_name = "c".repeat(40);
        add(&mut set, "web", "ReplicaSet", &long_pod, &long_name, 100, 0);
        set.renew_indices();
        let summaries = set.summaries(false);
        let columns = [Field::AppName, Field::PodName, Field::Name, Field::CpuRequests];

        let unlimited = renderer(RenderConfig::default());
        let full = unlimited.compute_field_widths(&set, &summaries, &columns);
        assert_eq!(full.get(Field::PodName), 60);

        let narrow = renderer(RenderConfig {
            max_width: Some(70),
            ..RenderConfig::default()
        });
        let widths = narrow.compute_field_widths(&set, &summaries, &columns);

        assert_eq!(widths.get(Field::AppName), full.get(Field::AppName));
        assert_eq!(widths.get(Field::CpuRequests), full.get(Field::CpuRequests));
        assert!(widths.get(Field::PodName) < 60);
        assert!(widths.get(Field::Name) < 40);
        assert!(widths.line_width(&columns) <= 70);

        let tiny = renderer(RenderConfig {
            max_width: Some(10),
            ..RenderConfig::default()
        });
        let widths = tiny.compute_field_widths(&set, &summaries, &columns);
        assert_eq!(widths.get(Field::PodName), Field::PodName.spec().min_width);
        assert_eq!(widths.get(Field::Name), Field::Name.spec().min_width);
    }

    #[test]
    fn test_scaling_never_grows_columns() {
        let set = web_set(500);
        let summaries = set.summaries(false);
        let columns = [Field::PodName];
        let wide = renderer(RenderConfig {
            max_width: Some(500),
            ..RenderConfig::default()
        });
        assert_eq!(
            wide.compute_field_widths(&set, &summaries, &columns)
                .get(Field::PodName),
            "web-abc".len()
        );
    }

    #[test]
    fn test_truncated_cells_end_with_ellipsis() {
        assert_eq!(fit("abcdefgh", 5, Align::Left, false), "abcd…");
        assert_eq!(fit("ab", 5, Align::Right, false), "   ab");
        assert_eq!(fit("ab", 5, Align::Left, true), "ab");
    }

    #[test]
    fn test_flat_rows() {
        let mut set = web_set(500);
        set.containers[0].pvc_list.insert("data,1".to_string());
        set.containers[0].pvc_list.insert("logs".to_string());
        set.add_pvc(PersistentVolumeClaim::new(
            "logs".to_string(),
            "uid".to_string(),
            "std".to_string(),
            1024,
        ));
        set.renew_indices();
        set.renew_relations();

        let out = renderer(RenderConfig::default()).render(&set, OutputFormat::Csv);
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("key,podKey,appKey,index"));
        assert!(lines[0].contains(",CPURequests,"));
        assert!(lines[0].ends_with(",ref_PVCRequests"));
        assert_eq!(lines[0].split(',').count(), FLAT_HEADERS.len());

        assert!(lines[1].starts_with("web/001/app,web/001,web,0,1,1,1,0,web,ReplicaSet,web-abc,reg,app,500,0,268435456,"));
        assert!(lines[1].contains(",\"data,1;logs\",\"data,1\",Unchanged,,"));
    }
}
