//! Dataset entities and the normalization policy that produces them.
//! 数据集实体以及生成它们的规范化策略。

mod model;
pub mod validation;

pub use model::{DatasetResource, Datasets, Lead, LegacyProjectRecord, Project, ProjectStatus};
pub use validation::{
    classify_project, normalize_leads, normalize_projects, ProjectShape, ValidationReport,
};
