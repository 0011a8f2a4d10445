#![forbid(unsafe_code)]

//! Index bookkeeping for repeatable upload field groups.
//!
//! A page offers a group of file inputs named `track_image_<N>`. Users add
//! rows and remove arbitrary ones; the submitted names must stay unique and
//! an index, once issued, must keep pointing at the same field.
//!
//! # Role in tform
//! `tform-core` owns that state. It does not know about the DOM: rendering
//! goes through the [`FieldSurface`] trait so the browser layer
//! (`tform-web`) and tests can plug in their own surface.
//!
//! # Example
//!
//! ```
//! use tform_core::{FieldGroupConfig, FieldIndexManager, MemorySurface};
//!
//! let surface = MemorySurface::with_names(["track_image_0", "track_image_1", "track_image_2"]);
//! let mut fields = FieldIndexManager::initialize(FieldGroupConfig::default(), surface).unwrap();
//!
//! fields.remove(1).unwrap();
//! assert_eq!(fields.registry().indices(), &[0, 2]);
//! assert_eq!(fields.add().unwrap(), 3);
//! ```

pub mod config;
pub mod error;
pub mod manager;
pub mod name;
pub mod registry;
pub mod surface;

pub use config::{DEFAULT_FIELD_PREFIX, FieldGroupConfig};
pub use error::FieldError;
pub use manager::FieldIndexManager;
pub use name::{format_field_name, parse_field_index};
pub use registry::FieldRegistry;
pub use surface::{FieldSurface, MemorySurface};
