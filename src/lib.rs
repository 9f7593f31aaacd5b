//! Dotqr renders QR module matrices as scanner-friendly graphics.
//!
//! The engine is a set of stateless pure functions:
//!
//! - Obtain a [`ModuleMatrix`] (from [`encode_matrix`] or your own
//!   encoder)
//! - [`compile_plan`] turns matrix + [`RenderConfig`] into an ordered
//!   list of drawing primitives
//! - The raster backend draws the plan at native density and resamples
//!   it to a fixed-size bitmap; the vector backend serializes the same
//!   geometry as SVG
//!
//! Two styles are supported: `Circular` draws every data module as a
//! dot and each finder pattern as three concentric rings; `Square` is
//! the classic per-module rule. [`pipeline::render_all`] produces the
//! full 2x2 style/backend grid from one matrix.
#![forbid(unsafe_code)]

pub mod config;
pub mod foundation;
pub mod matrix;
pub mod pipeline;
pub mod plan;
pub mod provider;
pub mod render;

pub use crate::config::{RenderConfig, Style};
pub use crate::foundation::color::Rgb;
pub use crate::foundation::error::{DotqrError, DotqrResult};
pub use crate::matrix::{FinderRegion, ModuleMatrix};
pub use crate::pipeline::{
    MatrixOutputs, StyleOutputs, SymbolOutputs, render_all, render_raster, render_text,
    render_vector,
};
pub use crate::plan::{DOT_FILL_RATIO, DrawCmd, FINDER_RING_RADII, RenderPlan, compile_plan};
pub use crate::provider::{EcLevel, EncodedSymbol, encode_matrix};
