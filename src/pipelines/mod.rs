//! Render pipeline definitions. The demo draws everything with the single
//! relief pipeline; the panel rides on egui's own renderer.

pub mod relief;
