//! Record validation and normalization.
//! 记录校验与规范化。
//!
//! Raw records arrive as untyped JSON. Each record is matched against the
//! known shapes in a fixed priority order; the first matching shape wins and
//! records matching no shape are dropped with a diagnostic. Nothing in here
//! returns an error: a bad record never poisons the rest of the dataset.

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use super::model::{Lead, LegacyProjectRecord, Project};

/// Keys whose presence encodes the status of a legacy project record.
const LEGACY_STATUS_KEYS: [&str; 3] = ["precon", "construction", "permanent"];

const LEAD_OPTIONAL_KEYS: [&str; 2] = ["role", "project"];

/// Outcome of normalizing one dataset.
///
/// `accepted.len() + dropped` always equals the number of input records.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport<T> {
    pub accepted: Vec<T>,
    pub dropped: usize,
}

impl<T> ValidationReport<T> {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            accepted: Vec::with_capacity(capacity),
            dropped: 0,
        }
    }

    pub fn into_accepted(self) -> Vec<T> {
        self.accepted
    }
}

/// A raw project record recognised as one of the supported shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectShape {
    /// Current export with an explicit `status` field.
    Direct(Project),
    /// Older export where the status is encoded by key presence.
    Legacy(LegacyProjectRecord),
}

type ShapeMatcher = fn(&Value) -> Option<ProjectShape>;

/// Shape matchers in priority order.
const PROJECT_SHAPES: [ShapeMatcher; 2] = [match_direct_project, match_legacy_project];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DropReason {
    NoShapeMatched,
    MissingStatusKeys,
}

/// Normalize raw project records, keeping valid entries in input order.
pub fn normalize_projects(raw: &[Value]) -> ValidationReport<Project> {
    let mut report = ValidationReport::with_capacity(raw.len());
    for record in raw {
        match resolve_project(record) {
            Ok(project) => report.accepted.push(project),
            Err(DropReason::MissingStatusKeys) => {
                warn!(record = %record, "Legacy project missing status keys, dropped");
                report.dropped += 1;
            }
            Err(DropReason::NoShapeMatched) => {
                warn!(record = %record, "Invalid project entry dropped");
                report.dropped += 1;
            }
        }
    }
    report
}

/// Normalize raw lead records, keeping valid entries in input order.
pub fn normalize_leads(raw: &[Value]) -> ValidationReport<Lead> {
    let mut report = ValidationReport::with_capacity(raw.len());
    for record in raw {
        match match_lead(record) {
            Some(lead) => report.accepted.push(lead),
            None => {
                warn!(record = %record, "Invalid lead entry dropped");
                report.dropped += 1;
            }
        }
    }
    report
}

/// Classify a raw record against the known project shapes.
pub fn classify_project(raw: &Value) -> Option<ProjectShape> {
    PROJECT_SHAPES.iter().find_map(|matcher| matcher(raw))
}

fn resolve_project(raw: &Value) -> Result<Project, DropReason> {
    match classify_project(raw) {
        Some(ProjectShape::Direct(project)) => Ok(project),
        Some(ProjectShape::Legacy(legacy)) => {
            let status = legacy
                .derived_status()
                .ok_or(DropReason::MissingStatusKeys)?;
            Ok(Project {
                name: legacy.name,
                postcode: legacy.postcode,
                status,
            })
        }
        None => Err(DropReason::NoShapeMatched),
    }
}

fn match_direct_project(raw: &Value) -> Option<ProjectShape> {
    if !raw.is_object() {
        return None;
    }
    Project::deserialize(raw).ok().map(ProjectShape::Direct)
}

fn match_legacy_project(raw: &Value) -> Option<ProjectShape> {
    if !optional_keys_are_strings(raw, &LEGACY_STATUS_KEYS) {
        return None;
    }
    LegacyProjectRecord::deserialize(raw)
        .ok()
        .map(ProjectShape::Legacy)
}

fn match_lead(raw: &Value) -> Option<Lead> {
    if !optional_keys_are_strings(raw, &LEAD_OPTIONAL_KEYS) {
        return None;
    }
    Lead::deserialize(raw).ok()
}

/// Optional string fields must be absent or hold a string. `null` does not
/// count as absent.
fn optional_keys_are_strings(raw: &Value, keys: &[&str]) -> bool {
    match raw.as_object() {
        Some(object) => keys
            .iter()
            .all(|key| object.get(*key).map_or(true, Value::is_string)),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::ProjectStatus;
    use serde_json::json;

    #[test]
    fn test_direct_project_is_accepted() {
        let raw = vec![json!({"name": "Site A", "postcode": "LS1 4DY", "status": "precon"})];
        let report = normalize_projects(&raw);

        assert_eq!(report.dropped, 0);
        assert_eq!(
            report.accepted,
            vec![Project {
                name: "Site A".to_string(),
                postcode: "LS1 4DY".to_string(),
                status: ProjectStatus::Precon,
            }]
        );
    }

    #[test]
    fn test_legacy_project_derives_construction() {
        let raw = vec![json!({"name": "Site A", "postcode": "LS1 4DY", "construction": "x"})];
        let report = normalize_projects(&raw);

        assert_eq!(report.accepted.len(), 1);
        assert_eq!(report.accepted[0].name, "Site A");
        assert_eq!(report.accepted[0].postcode, "LS1 4DY");
        assert_eq!(report.accepted[0].status, ProjectStatus::Construction);
    }

    #[test]
    fn test_legacy_precedence_construction_over_precon() {
        let raw = vec![
            json!({"name": "B", "postcode": "M1 1AE", "precon": "y", "construction": "x"}),
            json!({"name": "C", "postcode": "M1 1AE", "permanent": "z", "precon": "y"}),
        ];
        let report = normalize_projects(&raw);

        assert_eq!(report.accepted[0].status, ProjectStatus::Construction);
        assert_eq!(report.accepted[1].status, ProjectStatus::Precon);
    }

    #[test]
    fn test_legacy_keys_count_even_when_empty_string() {
        let raw = vec![json!({"name": "D", "postcode": "LS2", "permanent": ""})];
        let report = normalize_projects(&raw);

        assert_eq!(report.accepted[0].status, ProjectStatus::Permanent);
    }

    #[test]
    fn test_unknown_status_falls_back_to_legacy_shape() {
        let raw = vec![
            json!({"name": "E", "postcode": "LS3", "status": "demolished", "precon": "1"}),
            json!({"name": "F", "postcode": "LS3", "status": "demolished"}),
        ];
        let report = normalize_projects(&raw);

        assert_eq!(report.accepted.len(), 1);
        assert_eq!(report.accepted[0].name, "E");
        assert_eq!(report.accepted[0].status, ProjectStatus::Precon);
        assert_eq!(report.dropped, 1);
    }

    #[test]
    fn test_legacy_without_status_keys_is_dropped() {
        let raw = vec![json!({"name": "G", "postcode": "LS4", "notes": "n/a"})];
        let report = normalize_projects(&raw);

        assert!(report.accepted.is_empty());
        assert_eq!(report.dropped, 1);
    }

    #[test]
    fn test_malformed_project_records_are_dropped() {
        let raw = vec![
            json!({"name": 42, "postcode": "LS5", "status": "precon"}),
            json!({"postcode": "LS5", "construction": "x"}),
            json!({"name": "H", "postcode": "LS5", "construction": null}),
            json!({"name": "I", "postcode": "LS5", "precon": 1}),
            json!(["J", "LS5", "precon"]),
            json!("K"),
            Value::Null,
        ];
        let report = normalize_projects(&raw);

        assert!(report.accepted.is_empty());
        assert_eq!(report.dropped, raw.len());
    }

    #[test]
    fn test_accepted_plus_dropped_equals_input_and_order_is_kept() {
        let raw = vec![
            json!({"name": "1", "postcode": "A", "status": "permanent"}),
            json!({"name": "2"}),
            json!({"name": "3", "postcode": "C", "precon": "x", "extra": {"k": 1}}),
            json!(null),
            json!({"name": "5", "postcode": "E", "status": "construction"}),
        ];
        let report = normalize_projects(&raw);

        assert_eq!(report.accepted.len() + report.dropped, raw.len());
        let names: Vec<&str> = report.accepted.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["1", "3", "5"]);
    }

    #[test]
    fn test_classify_project_prefers_direct_shape() {
        let raw = json!({"name": "L", "postcode": "LS6", "status": "permanent", "precon": "x"});
        match classify_project(&raw) {
            Some(ProjectShape::Direct(project)) => {
                assert_eq!(project.status, ProjectStatus::Permanent)
            }
            other => panic!("expected direct shape, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_project_keeps_legacy_extra_fields() {
        let raw = json!({"name": "M", "postcode": "LS7", "precon": "x", "owner": "acme"});
        match classify_project(&raw) {
            Some(ProjectShape::Legacy(record)) => {
                assert_eq!(record.extra.get("owner"), Some(&json!("acme")));
                assert!(!record.extra.contains_key("precon"));
            }
            other => panic!("expected legacy shape, got {:?}", other),
        }
    }

    #[test]
    fn test_lead_with_optional_fields() {
        let raw = vec![
            json!({"name": "Jo", "postcode": "LS1 4DY"}),
            json!({"name": "Sam", "postcode": "M1 1AE", "role": "Buyer", "project": "Site A"}),
        ];
        let report = normalize_leads(&raw);

        assert_eq!(report.dropped, 0);
        assert_eq!(report.accepted[0].role, None);
        assert_eq!(report.accepted[1].role.as_deref(), Some("Buyer"));
        assert_eq!(report.accepted[1].project.as_deref(), Some("Site A"));
    }

    #[test]
    fn test_invalid_leads_are_dropped() {
        let raw = vec![
            json!({"name": "Jo"}),
            json!({"name": "Jo", "postcode": "LS1", "role": null}),
            json!({"name": "Jo", "postcode": 7}),
            json!({"name": "Ok", "postcode": "LS1", "unused": true}),
        ];
        let report = normalize_leads(&raw);

        assert_eq!(report.dropped, 3);
        assert_eq!(report.accepted.len(), 1);
        assert_eq!(report.accepted[0].name, "Ok");
    }
}
