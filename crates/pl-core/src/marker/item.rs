use crate::dataset::{Datasets, Lead, Project, ProjectStatus};

use super::content::{LabelElement, LabelVariant, MarkerContent, MarkerIcon};
use super::entry::MarkerKind;

pub const LEAD_ICON: &str = "./images/person-icon.png";

/// Icon and text colour for one project status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusStyle {
    pub icon: &'static str,
    pub color: &'static str,
    pub label: &'static str,
}

pub fn status_style(status: ProjectStatus) -> StatusStyle {
    match status {
        ProjectStatus::Construction => StatusStyle {
            icon: "./images/construction.png",
            color: "#059669",
            label: "construction",
        },
        ProjectStatus::Precon => StatusStyle {
            icon: "./images/precon.png",
            color: "#b45309",
            label: "precon",
        },
        ProjectStatus::Permanent => StatusStyle {
            icon: "./images/permanent.png",
            color: "#111111",
            label: "permanent",
        },
    }
}

/// One record queued for geocoding in a render generation.
/// 渲染代中等待地理编码的一条记录。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderItem {
    pub kind: MarkerKind,
    pub name: String,
    pub postcode: String,
    pub status: Option<ProjectStatus>,
}

impl RenderItem {
    pub fn from_project(project: &Project) -> Self {
        Self {
            kind: MarkerKind::Project,
            name: project.name.clone(),
            postcode: project.postcode.clone(),
            status: Some(project.status),
        }
    }

    pub fn from_lead(lead: &Lead) -> Self {
        Self {
            kind: MarkerKind::Lead,
            name: lead.name.clone(),
            postcode: lead.postcode.clone(),
            status: None,
        }
    }

    /// Label text: `"<name> • <status>"` for projects, the bare name for leads.
    pub fn label_text(&self) -> String {
        match self.status {
            Some(status) => format!("{} • {}", self.name, status_style(status).label),
            None => self.name.clone(),
        }
    }

    /// Build a fresh composite visual for this item.
    pub fn content(&self) -> MarkerContent {
        let (icon, color, variant) = match self.status {
            Some(status) => {
                let style = status_style(status);
                (style.icon, Some(style.color.to_string()), LabelVariant::Project)
            }
            None => (LEAD_ICON, None, LabelVariant::Lead),
        };
        MarkerContent {
            label: LabelElement::new(self.label_text(), color, variant),
            icon: MarkerIcon {
                src: icon.to_string(),
                alt: self.name.clone(),
            },
        }
    }
}

/// All projects followed by all leads, each in dataset order.
pub fn render_items(datasets: &Datasets) -> Vec<RenderItem> {
    datasets
        .projects
        .iter()
        .map(RenderItem::from_project)
        .chain(datasets.leads.iter().map(RenderItem::from_lead))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn datasets() -> Datasets {
        Datasets::new(
            vec![
                Project {
                    name: "Site A".to_string(),
                    postcode: "LS1 4DY".to_string(),
                    status: ProjectStatus::Construction,
                },
                Project {
                    name: "Site B".to_string(),
                    postcode: "M1 1AE".to_string(),
                    status: ProjectStatus::Precon,
                },
            ],
            vec![Lead {
                name: "Jo".to_string(),
                postcode: "YO1 7HH".to_string(),
                role: Some("Buyer".to_string()),
                project: None,
            }],
        )
    }

    #[test]
    fn test_render_items_lists_projects_before_leads() {
        let items = render_items(&datasets());
        let kinds: Vec<MarkerKind> = items.iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![MarkerKind::Project, MarkerKind::Project, MarkerKind::Lead]
        );
        assert_eq!(items[0].name, "Site A");
        assert_eq!(items[2].postcode, "YO1 7HH");
    }

    #[test]
    fn test_project_content_uses_status_style() {
        let items = render_items(&datasets());
        let content = items[0].content();

        assert_eq!(content.label.text(), "Site A • construction");
        assert_eq!(content.label.color(), Some("#059669"));
        assert_eq!(content.label.variant(), LabelVariant::Project);
        assert_eq!(content.icon.src, "./images/construction.png");
        assert_eq!(content.icon.alt, "Site A");
    }

    #[test]
    fn test_lead_content_uses_person_icon() {
        let items = render_items(&datasets());
        let content = items[2].content();

        assert_eq!(content.label.text(), "Jo");
        assert_eq!(content.label.color(), None);
        assert_eq!(content.label.variant(), LabelVariant::Lead);
        assert_eq!(content.icon.src, LEAD_ICON);
    }
}
