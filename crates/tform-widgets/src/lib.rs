#![forbid(unsafe_code)]

//! Page widget state for tform.
//!
//! Two small state machines that sit next to the upload field group on the
//! same pages: the click-to-zoom image overlay and the users table filter.
//! Neither renders anything; the web layer turns their output into DOM
//! changes.

pub mod image_modal;
pub mod row_filter;

pub use image_modal::{
    DEFAULT_EXCLUDED_MARKER, ImageModalAction, ImageModalConfig, ImageModalEvent, ImageModalState,
};
pub use row_filter::RowFilter;
