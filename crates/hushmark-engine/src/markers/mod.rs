//! Live marker hiding: markdown delimiters disappear once the construct is
//! unambiguous from rendering, and reappear while the selection is on them.
//!
//! ```text
//! syntax tree ──► builder (candidates per catalog entry)
//!                   │
//! selection ─────► filter (hide / show) ──► hider ──► DecorationSet + AtomicRanges
//! ```

pub mod atomic;
pub mod builder;
pub mod catalog;
pub mod filter;
pub mod hider;

pub use atomic::{AtomicRanges, Direction};
pub use catalog::{CATALOG, FilterMode, MarkerSpec};
pub use filter::{MarkerContext, should_hide};
pub use hider::{HiddenMarkers, LiveMarkers, MarkerHider};
