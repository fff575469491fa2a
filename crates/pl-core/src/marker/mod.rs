//! Marker domain: what gets drawn for each geocoded record and how its
//! visibility follows the dataset toggles.
//! 标记领域：每条已地理编码记录的绘制内容，以及其可见性如何跟随数据集开关。

mod content;
mod entry;
mod item;
mod visibility;

pub use content::{escape_html, LabelElement, LabelVariant, MarkerContent, MarkerIcon};
pub use entry::{MarkerEntry, MarkerKind, MarkerRepresentation};
pub use item::{render_items, status_style, RenderItem, StatusStyle, LEAD_ICON};
pub use visibility::{apply_visibility, is_visible, VisibilityFlags};
