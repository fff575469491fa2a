use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Icon image shown under the label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerIcon {
    pub src: String,
    pub alt: String,
}

/// Callout styling of a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelVariant {
    Project,
    Lead,
}

/// Text callout attached to a marker.
/// 附着在标记上的文字标注。
///
/// Clones share state: the map surface renders the same element the
/// lifecycle manager shows, hides and removes.
#[derive(Clone)]
pub struct LabelElement {
    inner: Arc<LabelState>,
}

struct LabelState {
    text: String,
    color: Option<String>,
    variant: LabelVariant,
    displayed: AtomicBool,
    removed: AtomicBool,
}

impl LabelElement {
    pub fn new(text: impl Into<String>, color: Option<String>, variant: LabelVariant) -> Self {
        Self {
            inner: Arc::new(LabelState {
                text: text.into(),
                color,
                variant,
                displayed: AtomicBool::new(true),
                removed: AtomicBool::new(false),
            }),
        }
    }

    pub fn text(&self) -> &str {
        &self.inner.text
    }

    pub fn color(&self) -> Option<&str> {
        self.inner.color.as_deref()
    }

    pub fn variant(&self) -> LabelVariant {
        self.inner.variant
    }

    pub fn set_displayed(&self, displayed: bool) {
        self.inner.displayed.store(displayed, Ordering::SeqCst);
    }

    pub fn is_displayed(&self) -> bool {
        self.inner.displayed.load(Ordering::SeqCst)
    }

    /// Detach the element from wherever it is rendered.
    pub fn remove(&self) {
        self.inner.removed.store(true, Ordering::SeqCst);
    }

    pub fn is_removed(&self) -> bool {
        self.inner.removed.load(Ordering::SeqCst)
    }

    /// True when both handles point at the same element.
    pub fn same_element(&self, other: &LabelElement) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for LabelElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LabelElement")
            .field("text", &self.inner.text)
            .field("color", &self.inner.color)
            .field("variant", &self.inner.variant)
            .field("displayed", &self.is_displayed())
            .field("removed", &self.is_removed())
            .finish()
    }
}

/// Composite visual of a rich marker: a label callout above an icon.
/// 富标记的组合视觉：图标上方的文字标注。
#[derive(Debug, Clone)]
pub struct MarkerContent {
    pub label: LabelElement,
    pub icon: MarkerIcon,
}

/// Escape text for inclusion in popup HTML.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
