//! Spherical brush painting into mask volumes
//!
//! A [`PaintFilter`] takes a read-only background volume and a list of
//! points, and stamps a filled sphere of the brush color around each point
//! into a mask volume with the same geometry.

pub mod brush;
pub mod config;
pub mod filter;

// Re-exports
pub use brush::Brush;
pub use config::{PaintConfig, PaintJob};
pub use filter::{FilterState, PaintFilter, PaintStats, PointSpace};
