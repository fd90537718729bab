//! Volume geometry: voxel grid placement in world space

use serde::{Deserialize, Serialize};

use crate::core::{DMat3, DVec3, Error, Result, UVec3};

/// Placement of a voxel grid in world space.
///
/// Index-to-world mapping is `origin + direction * (spacing * ijk)`, with
/// column `i` of `direction` giving the world direction of index axis `i`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageGeometry {
    /// Voxel count per axis (nx, ny, nz)
    pub dimensions: UVec3,
    /// World distance between neighbouring voxels per axis
    pub spacing: DVec3,
    /// World position of voxel (0, 0, 0)
    pub origin: DVec3,
    /// Orientation of the index axes
    pub direction: DMat3,
}

impl Default for ImageGeometry {
    fn default() -> Self {
        Self {
            dimensions: UVec3::ZERO,
            spacing: DVec3::ONE,
            origin: DVec3::ZERO,
            direction: DMat3::IDENTITY,
        }
    }
}

impl ImageGeometry {
    /// Unit-spaced, axis-aligned grid at the origin
    pub fn new(dimensions: UVec3) -> Self {
        Self { dimensions, ..Default::default() }
    }

    pub fn with_spacing(mut self, spacing: DVec3) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn with_origin(mut self, origin: DVec3) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_direction(mut self, direction: DMat3) -> Self {
        self.direction = direction;
        self
    }

    /// Total voxel count. Fails if it does not fit in `usize`.
    pub fn number_of_points(&self) -> Result<usize> {
        let d = self.dimensions;
        (d.x as usize)
            .checked_mul(d.y as usize)
            .and_then(|n| n.checked_mul(d.z as usize))
            .ok_or_else(|| Error::InvalidDimensions(format!("voxel count of {d} overflows")))
    }

    /// Linear voxel index of (i, j, k), x fastest
    pub fn voxel_index(&self, ijk: UVec3) -> usize {
        let nx = self.dimensions.x as usize;
        let ny = self.dimensions.y as usize;
        ijk.x as usize + ijk.y as usize * nx + ijk.z as usize * nx * ny
    }

    /// Fails unless every spacing component is finite and positive
    pub fn validate_spacing(&self) -> Result<()> {
        let s = self.spacing;
        if s.is_finite() && s.cmpgt(DVec3::ZERO).all() {
            Ok(())
        } else {
            Err(Error::InvalidSpacing(s.to_array()))
        }
    }

    /// Continuous index coordinates to world position
    pub fn index_to_world(&self, index: DVec3) -> DVec3 {
        self.origin + self.direction * (index * self.spacing)
    }

    /// World position to continuous index coordinates (not rounded)
    pub fn world_to_index(&self, world: DVec3) -> DVec3 {
        self.direction.inverse() * (world - self.origin) / self.spacing
    }

    /// Check if a continuous index lies within the grid extent
    pub fn contains_index(&self, index: DVec3) -> bool {
        let upper = self.dimensions.as_dvec3() - DVec3::ONE;
        index.cmpge(DVec3::ZERO).all() && index.cmple(upper).all()
    }
}
