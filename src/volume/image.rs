//! Image data: a voxel grid with optional point scalars

use crate::core::{DMat3, DVec3, Result, UVec3};
use super::geometry::ImageGeometry;
use super::scalars::ScalarArray;

/// A 3D scalar field: geometry plus an optional scalar array holding one
/// tuple per voxel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageData {
    geometry: ImageGeometry,
    scalars: Option<ScalarArray>,
    generation: u32,
}

impl ImageData {
    /// Create an image with the given geometry and no scalars
    pub fn new(geometry: ImageGeometry) -> Self {
        Self {
            geometry,
            scalars: None,
            generation: 0,
        }
    }

    /// Attach scalars, builder style
    pub fn with_scalars(mut self, scalars: ScalarArray) -> Self {
        self.scalars = Some(scalars);
        self
    }

    pub fn geometry(&self) -> &ImageGeometry {
        &self.geometry
    }

    pub fn dimensions(&self) -> UVec3 {
        self.geometry.dimensions
    }

    /// Resize the grid. Existing scalars are left as they are.
    pub fn set_dimensions(&mut self, dimensions: UVec3) {
        if self.geometry.dimensions != dimensions {
            self.geometry.dimensions = dimensions;
            self.modified();
        }
    }

    pub fn spacing(&self) -> DVec3 {
        self.geometry.spacing
    }

    pub fn origin(&self) -> DVec3 {
        self.geometry.origin
    }

    pub fn direction(&self) -> DMat3 {
        self.geometry.direction
    }

    /// Total voxel count. Fails if it does not fit in `usize`.
    pub fn number_of_points(&self) -> Result<usize> {
        self.geometry.number_of_points()
    }

    pub fn scalars(&self) -> Option<&ScalarArray> {
        self.scalars.as_ref()
    }

    pub fn scalars_mut(&mut self) -> Option<&mut ScalarArray> {
        self.scalars.as_mut()
    }

    /// Replace (or remove) the point scalars
    pub fn set_scalars(&mut self, scalars: Option<ScalarArray>) {
        self.scalars = scalars;
        self.modified();
    }

    /// Components per voxel, if scalars are present
    pub fn number_of_components(&self) -> Option<usize> {
        self.scalars.as_ref().map(ScalarArray::number_of_components)
    }

    /// Scalar tuple stored at voxel (i, j, k)
    pub fn voxel(&self, ijk: UVec3) -> Option<Vec<f64>> {
        let scalars = self.scalars.as_ref()?;
        if !ijk.cmplt(self.dimensions()).all() {
            return None;
        }
        scalars.tuple(self.geometry.voxel_index(ijk)).ok()
    }

    pub fn world_to_index(&self, world: DVec3) -> DVec3 {
        self.geometry.world_to_index(world)
    }

    pub fn index_to_world(&self, index: DVec3) -> DVec3 {
        self.geometry.index_to_world(index)
    }

    /// Mark the image as changed for downstream caches
    pub fn modified(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    /// Modification counter, bumped by [`ImageData::modified`]
    pub fn generation(&self) -> u32 {
        self.generation
    }
}
