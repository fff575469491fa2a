//! Business logic use cases
//!
//! [DatasetSourcePort]
//         ↓
// LoadDatasets            → normalized projects + leads
//         ↓
// MapView                 → owns map handle, toggles, current datasets
//         ↓
// RenderSession           → one render generation at a time
//         ↓
// GeocodeResolver         → one lookup per item, sequential

pub mod load_datasets;
pub mod map_view;
pub mod page_summary;
pub mod render_session;
pub mod resolve_postcode;

pub use load_datasets::LoadDatasets;
pub use map_view::{MapSettings, MapView};
pub use page_summary::{PageSummary, DATASETS_MISSING_BANNER};
pub use render_session::{
    Generation, GenerationOutcome, GenerationToken, MarkerSnapshot, RenderSession, RenderState,
    FIT_BOUNDS_PADDING_PX,
};
pub use resolve_postcode::{GeocodeOutcome, GeocodeResolver};
