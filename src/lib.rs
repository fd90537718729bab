//! Voxpaint - spherical brush painting into 3D mask volumes

pub mod core;
pub mod math;
pub mod volume;
pub mod paint;
