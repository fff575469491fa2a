use super::entry::{MarkerEntry, MarkerKind};

/// Per-dataset toggles. Both datasets are shown by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityFlags {
    pub show_projects: bool,
    pub show_leads: bool,
}

impl Default for VisibilityFlags {
    fn default() -> Self {
        Self {
            show_projects: true,
            show_leads: true,
        }
    }
}

impl VisibilityFlags {
    pub fn new(show_projects: bool, show_leads: bool) -> Self {
        Self {
            show_projects,
            show_leads,
        }
    }
}

pub fn is_visible(kind: MarkerKind, flags: VisibilityFlags) -> bool {
    match kind {
        MarkerKind::Project => flags.show_projects,
        MarkerKind::Lead => flags.show_leads,
    }
}

/// Project the toggles onto every entry. Idempotent; membership is untouched.
/// 将开关投射到每个条目上。幂等，不改变条目集合。
pub fn apply_visibility<'a, I>(entries: I, flags: VisibilityFlags)
where
    I: IntoIterator<Item = &'a MarkerEntry>,
{
    for entry in entries {
        entry.set_visible(is_visible(entry.kind, flags));
    }
}
