use std::fmt;

use crate::ports::MarkerHandle;

use super::content::{LabelElement, MarkerContent};

/// Which dataset a marker belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    Project,
    Lead,
}

impl MarkerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarkerKind::Project => "project",
            MarkerKind::Lead => "lead",
        }
    }
}

impl fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Marker representation chosen when the entry was created.
/// 创建条目时选定的标记表示形式，在条目生命周期内不变。
///
/// `Rich` carries arbitrary content; `Fallback` is a plain titled marker with
/// a click popup. Both expose the same attach/detach surface.
pub enum MarkerRepresentation {
    Rich(Box<dyn MarkerHandle>),
    Fallback(Box<dyn MarkerHandle>),
}

impl MarkerRepresentation {
    fn handle(&self) -> &dyn MarkerHandle {
        match self {
            MarkerRepresentation::Rich(handle) | MarkerRepresentation::Fallback(handle) => {
                handle.as_ref()
            }
        }
    }

    pub fn is_rich(&self) -> bool {
        matches!(self, MarkerRepresentation::Rich(_))
    }

    pub fn attach(&self) {
        self.handle().attach();
    }

    pub fn detach(&self) {
        self.handle().detach();
    }

    pub fn set_content(&self, content: &MarkerContent) {
        self.handle().set_content(content);
    }

    pub fn is_attached(&self) -> bool {
        self.handle().is_attached()
    }
}

impl fmt::Debug for MarkerRepresentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let variant = if self.is_rich() { "Rich" } else { "Fallback" };
        f.debug_struct(variant)
            .field("attached", &self.is_attached())
            .finish()
    }
}

/// A marker placed on the map, owned by the render session that created it.
/// 地图上的标记，由创建它的渲染会话独占。
#[derive(Debug)]
pub struct MarkerEntry {
    pub kind: MarkerKind,
    pub marker: MarkerRepresentation,
    pub label: Option<LabelElement>,
}

impl MarkerEntry {
    pub fn new(
        kind: MarkerKind,
        marker: MarkerRepresentation,
        label: Option<LabelElement>,
    ) -> Self {
        Self {
            kind,
            marker,
            label,
        }
    }

    /// Show or hide both the marker and its label.
    pub fn set_visible(&self, visible: bool) {
        if visible {
            self.marker.attach();
        } else {
            self.marker.detach();
        }
        if let Some(label) = &self.label {
            label.set_displayed(visible);
        }
    }

    pub fn is_visible(&self) -> bool {
        self.marker.is_attached()
    }

    /// Remove the marker from the map and drop its label element.
    pub fn dispose(&self) {
        self.marker.detach();
        if let Some(label) = &self.label {
            label.remove();
        }
    }
}
