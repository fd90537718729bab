//! Volumes: voxel grid geometry and typed scalar storage
//!
//! Storage order is x fastest, then y, then z. A voxel's tuple of
//! `number_of_components` values is contiguous.

pub mod geometry;
pub mod image;
pub mod scalars;

pub use geometry::ImageGeometry;
pub use image::ImageData;
pub use scalars::{Element, ScalarArray, ScalarData, ScalarType, ScalarVisitorMut};
