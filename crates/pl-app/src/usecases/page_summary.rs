//! Page text derived from the loaded datasets.
//! 由已加载数据集派生的页面文本。

use pl_core::dataset::Datasets;

/// Shown when neither dataset produced a record.
pub const DATASETS_MISSING_BANNER: &str =
    "Datasets failed to load. Map will still initialize when API key is valid.";

const FOOTER_SEPARATOR: &str = " • ";
const EMPTY_FOOTER: &str = "—";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSummary {
    pub projects_footer: String,
    pub leads_footer: String,
    pub banner: Option<String>,
}

impl PageSummary {
    pub fn from_datasets(datasets: &Datasets) -> Self {
        let projects_footer = footer(
            datasets
                .projects
                .iter()
                .map(|p| (p.name.as_str(), p.postcode.as_str())),
        );
        let leads_footer = footer(
            datasets
                .leads
                .iter()
                .map(|l| (l.name.as_str(), l.postcode.as_str())),
        );
        let banner = datasets
            .is_empty()
            .then(|| DATASETS_MISSING_BANNER.to_string());

        Self {
            projects_footer,
            leads_footer,
            banner,
        }
    }
}

fn footer<'a>(entries: impl Iterator<Item = (&'a str, &'a str)>) -> String {
    let parts: Vec<String> = entries
        .map(|(name, postcode)| format!("{name} {postcode}"))
        .collect();
    if parts.is_empty() {
        EMPTY_FOOTER.to_string()
    } else {
        parts.join(FOOTER_SEPARATOR)
    }
}
