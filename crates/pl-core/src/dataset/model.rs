use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle stage of a project site.
/// 项目站点的生命周期阶段。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Precon,
    Construction,
    Permanent,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Precon => "precon",
            ProjectStatus::Construction => "construction",
            ProjectStatus::Permanent => "permanent",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical project record.
/// 规范化后的项目记录。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub postcode: String,
    pub status: ProjectStatus,
}

/// Older project export where the status is encoded by which key is present.
///
/// Unknown columns from the export are kept in `extra` and otherwise ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LegacyProjectRecord {
    pub name: String,
    pub postcode: String,
    #[serde(default)]
    pub precon: Option<String>,
    #[serde(default)]
    pub construction: Option<String>,
    #[serde(default)]
    pub permanent: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl LegacyProjectRecord {
    /// Derive the status from the first present key, in the order
    /// construction, precon, permanent.
    pub fn derived_status(&self) -> Option<ProjectStatus> {
        if self.construction.is_some() {
            Some(ProjectStatus::Construction)
        } else if self.precon.is_some() {
            Some(ProjectStatus::Precon)
        } else if self.permanent.is_some() {
            Some(ProjectStatus::Permanent)
        } else {
            None
        }
    }
}

/// Sales lead record.
/// 销售线索记录。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub name: String,
    pub postcode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
}

/// The two raw resources the loader fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatasetResource {
    Projects,
    Leads,
}

impl DatasetResource {
    /// File name of the resource inside the data directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            DatasetResource::Projects => "projects.json",
            DatasetResource::Leads => "leads.json",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetResource::Projects => "projects",
            DatasetResource::Leads => "leads",
        }
    }
}

impl fmt::Display for DatasetResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized dataset pair. Rebuilt wholesale on every load.
/// 规范化后的数据集对，每次加载整体重建。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Datasets {
    pub projects: Vec<Project>,
    pub leads: Vec<Lead>,
}

impl Datasets {
    pub fn new(projects: Vec<Project>, leads: Vec<Lead>) -> Self {
        Self { projects, leads }
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty() && self.leads.is_empty()
    }

    /// Total number of records across both datasets.
    pub fn len(&self) -> usize {
        self.projects.len() + self.leads.len()
    }
}
