//! Gradient model and the backend-independent parts of evaluation
//!
//! - [`spec`]: the normalized gradient description
//! - [`normalize`]: stop repair and simplification
//! - [`tile`]: tile-mode folding
//! - [`table`]: the scale/bias lookup table
//! - [`degenerate`]: replacements for collapsed geometry
//! - [`flatten`]: byte serialization
//! - [`cache`]: shared table cache

pub mod cache;
pub mod degenerate;
pub mod flatten;
pub mod normalize;
pub mod spec;
pub mod table;
pub mod tile;

pub use cache::{CacheStats, TableCache, TableKey};
pub use degenerate::{
    average_gradient_color, degenerate_shader, make_degenerate, DEGENERATE_THRESHOLD,
};
pub use normalize::{make_gradient, normalize_stops, NormalizedStops};
pub use spec::{GradientSpec, Interpolation, TileMode};
pub use table::{GradientTable, ScaleBias, SearchStrategy, TableBuilder, TableLayout};
pub use tile::{lower_tile, TileLowering, TileMapper, Tiled};
