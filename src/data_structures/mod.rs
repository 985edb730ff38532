//! CPU-side scene data and GPU texture wrappers.
//!
//! - `color` holds an sRGB color type with `#rrggbb` parsing for the panel
//! - `material` holds the relief material parameters and texture slot states
//! - `plane` builds the subdivided flat grid the whole demo renders
//! - `scene` contains the root scene container and its three objects
//! - `texture` contains the GPU texture wrapper and creation utilities

pub mod color;
pub mod material;
pub mod plane;
pub mod scene;
pub mod texture;
