//! Inclusive box of voxel indices

use crate::core::types::{DVec3, UVec3};

/// Axis-aligned box of voxel indices, `min` and `max` both inclusive
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexBox {
    pub min: UVec3,
    pub max: UVec3,
}

impl IndexBox {
    /// Create box from inclusive min and max corners
    pub fn new(min: UVec3, max: UVec3) -> Self {
        Self { min, max }
    }

    /// Box covering `center ± half_extent` in continuous index space,
    /// clamped to a volume of `dims` voxels.
    ///
    /// Each bound is clamped to `[0, dim - 1]` and then floored. A point far
    /// outside the volume still yields a (single-layer) box on the nearest
    /// face; callers test membership per voxel. Returns `None` when the
    /// volume has zero extent on any axis.
    pub fn clamped(center: DVec3, half_extent: DVec3, dims: UVec3) -> Option<Self> {
        if dims.min_element() == 0 {
            return None;
        }
        let upper = (dims - UVec3::ONE).as_dvec3();
        let lo = (center - half_extent).max(DVec3::ZERO).min(upper).floor();
        let hi = (center + half_extent).max(DVec3::ZERO).min(upper).floor();
        Some(Self::new(lo.as_uvec3(), hi.as_uvec3()))
    }

    /// Number of voxels along each axis
    pub fn size(&self) -> UVec3 {
        self.max - self.min + UVec3::ONE
    }

    /// Total number of voxels in the box
    pub fn voxel_count(&self) -> usize {
        let s = self.size();
        s.x as usize * s.y as usize * s.z as usize
    }

    /// Check if voxel index is inside the box
    pub fn contains(&self, ijk: UVec3) -> bool {
        ijk.cmpge(self.min).all() && ijk.cmple(self.max).all()
    }

    /// Iterate all voxel indices, x fastest then y then z
    pub fn iter(&self) -> impl Iterator<Item = UVec3> + use<> {
        let (min, max) = (self.min, self.max);
        (min.z..=max.z).flat_map(move |k| {
            (min.y..=max.y).flat_map(move |j| (min.x..=max.x).map(move |i| UVec3::new(i, j, k)))
        })
    }
}
