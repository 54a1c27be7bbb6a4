// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # VMF-Lite Geometry Processing
//!
//! Brush reconstruction for parsed VMF documents. This crate works on the
//! generic class tree from `vmf-lite-model`, making it independent of any
//! specific parser implementation.
//!
//! ## Overview
//!
//! - **Solid Conversion**: Typed `Solid`, `Side` and `EditorInfo` views built
//!   from `solid` classes by named property lookup
//! - **Vertex Extraction**: Three-plane intersection with half-space
//!   containment tests
//! - **Winding Detection**: Decide per solid which side of each plane is inside
//! - **Welding**: Optional proximity merge of duplicate vertices
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use vmf_lite_geometry::{solids, ExtractionOptions, Winding};
//!
//! let document = vmf_lite_parser::parse(&text)?;
//! let options = ExtractionOptions::new()
//!     .with_winding(Winding::Auto)
//!     .with_parallel(true);
//!
//! for solid in solids(&document)? {
//!     let vertices = solid.vertices_with(&options);
//!     println!("solid {}: {} vertices", solid.id, vertices.len());
//! }
//! ```

pub mod error;
pub mod solid;
pub mod vertices;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};

// Re-export main types
pub use error::{Error, Result};
pub use solid::{solid_vertices, solids, EditorInfo, Side, Solid, DEFAULT_LIGHTMAP_SCALE};
pub use vertices::{
    detect_winding, extract_vertices, extract_vertices_with, half_spaces, intersect,
    to_point, weld_vertices, ExtractionOptions, HalfSpace, Tolerances, Winding,
    DEFAULT_CONTAINMENT_EPSILON, DEFAULT_DEGENERATE_EPSILON,
};
