//! Spherical brush and the per-voxel stamp

use crate::core::{DVec3, Error, Result, UVec3};
use crate::math::IndexBox;
use crate::volume::{Element, ImageGeometry, ScalarVisitorMut};

/// Default brush radius, in world units
pub const DEFAULT_RADIUS: f64 = 1.0;

/// A filled sphere of `radius` world units written with `color`.
///
/// With anisotropic spacing the sphere becomes an axis-aligned ellipsoid in
/// voxel space.
#[derive(Debug, Clone, PartialEq)]
pub struct Brush {
    radius: f64,
    color: Vec<f64>,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            radius: DEFAULT_RADIUS,
            color: vec![1.0],
        }
    }
}

impl Brush {
    /// Create a brush, rejecting non-positive or non-finite radii
    pub fn new(radius: f64, color: Vec<f64>) -> Result<Self> {
        Ok(Self {
            radius: validate_radius(radius)?,
            color,
        })
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn set_radius(&mut self, radius: f64) -> Result<()> {
        self.radius = validate_radius(radius)?;
        Ok(())
    }

    /// Value per scalar component written into painted voxels
    pub fn color(&self) -> &[f64] {
        &self.color
    }

    pub fn set_color(&mut self, color: Vec<f64>) {
        self.color = color;
    }

    /// Per-axis radius in voxel units (`radius / spacing`)
    pub fn voxel_radii(&self, geometry: &ImageGeometry) -> Result<DVec3> {
        geometry.validate_spacing()?;
        Ok(DVec3::splat(self.radius) / geometry.spacing)
    }

    /// Ellipsoid membership: `u² + v² + w² <= 1` with offsets normalized by
    /// the voxel radii
    pub fn contains(center: DVec3, radii: DVec3, ijk: UVec3) -> bool {
        let offset = (ijk.as_dvec3() - center) / radii;
        offset.length_squared() <= 1.0
    }
}

fn validate_radius(radius: f64) -> Result<f64> {
    if radius.is_finite() && radius > 0.0 {
        Ok(radius)
    } else {
        Err(Error::InvalidRadius(radius))
    }
}

/// Writes one brush sphere per center into a mask buffer.
///
/// Centers are in voxel-index space. Later centers overwrite earlier ones.
/// Voxel (i, j, k) starts at slot `nc * (i + j * nx + k * nx * ny)`: `i` is
/// scaled by `nc` as well, so each voxel's components stay contiguous.
pub(crate) struct SphereStamp<'a> {
    pub centers: &'a [DVec3],
    pub radii: DVec3,
    pub dims: UVec3,
    pub components: usize,
    pub color: &'a [f64],
}

impl ScalarVisitorMut for SphereStamp<'_> {
    /// Number of voxel writes performed
    type Output = usize;

    fn visit<T: Element>(self, data: &mut [T]) -> usize {
        let color: Vec<T> = self.color.iter().map(|&c| T::from_f64(c)).collect();
        let nc = self.components;
        let nx = self.dims.x as usize;
        let nxy = nx * self.dims.y as usize;
        let mut written = 0;

        for &center in self.centers {
            let Some(bounds) = IndexBox::clamped(center, self.radii, self.dims) else {
                continue;
            };
            for ijk in bounds.iter() {
                if !Brush::contains(center, self.radii, ijk) {
                    continue;
                }
                let start = nc * (ijk.x as usize + ijk.y as usize * nx + ijk.z as usize * nxy);
                data[start..start + nc].copy_from_slice(&color);
                written += 1;
            }
        }
        written
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_brush() {
        let brush = Brush::default();
        assert_eq!(brush.radius(), 1.0);
        assert_eq!(brush.color(), &[1.0]);
    }

    #[test]
    fn test_radius_validation() {
        assert!(Brush::new(0.5, vec![2.0]).is_ok());
        assert!(matches!(Brush::new(0.0, vec![1.0]), Err(Error::InvalidRadius(_))));
        assert!(Brush::new(-1.0, vec![1.0]).is_err());
        assert!(Brush::new(f64::INFINITY, vec![1.0]).is_err());

        let mut brush = Brush::default();
        assert!(brush.set_radius(f64::NAN).is_err());
        assert_eq!(brush.radius(), 1.0);
    }

    #[test]
    fn test_voxel_radii_anisotropic() {
        let brush = Brush::new(2.0, vec![1.0]).unwrap();
        let g = ImageGeometry::new(UVec3::splat(4)).with_spacing(DVec3::new(0.5, 1.0, 4.0));
        assert_eq!(brush.voxel_radii(&g).unwrap(), DVec3::new(4.0, 2.0, 0.5));

        let flat = g.with_spacing(DVec3::new(1.0, 1.0, 0.0));
        assert!(brush.voxel_radii(&flat).is_err());
    }

    #[test]
    fn test_contains_boundary_inclusive() {
        let c = DVec3::splat(5.0);
        let r = DVec3::splat(2.0);
        assert!(Brush::contains(c, r, UVec3::new(7, 5, 5)));
        assert!(!Brush::contains(c, r, UVec3::new(7, 6, 5)));
        assert!(Brush::contains(c, r, UVec3::new(5, 5, 5)));
    }

    #[test]
    fn test_contains_ellipsoid() {
        let c = DVec3::splat(4.0);
        let r = DVec3::new(3.0, 1.0, 1.0);
        assert!(Brush::contains(c, r, UVec3::new(7, 4, 4)));
        assert!(!Brush::contains(c, r, UVec3::new(4, 6, 4)));
    }

    #[test]
    fn test_stamp_writes_all_components() {
        let dims = UVec3::new(3, 3, 1);
        let mut data = vec![0u16; 9 * 2];
        let written = SphereStamp {
            centers: &[DVec3::new(1.0, 1.0, 0.0)],
            radii: DVec3::splat(1.0),
            dims,
            components: 2,
            color: &[3.0, 4.0],
        }
        .visit(data.as_mut_slice());

        // plus-shaped footprint in the single z slice
        assert_eq!(written, 5);
        let center = 2 * (1 + 3);
        assert_eq!(&data[center..center + 2], &[3, 4]);
        assert_eq!(&data[0..2], &[0, 0]);
        // (2, 1, 0) and (1, 0, 0): the x offset is scaled by the component count
        assert_eq!(&data[2 * (2 + 3)..2 * (2 + 3) + 2], &[3, 4]);
        assert_eq!(&data[2..4], &[3, 4]);
        assert_eq!(&data[4..6], &[0, 0]);
    }

    #[test]
    fn test_stamp_clamps_to_grid() {
        let dims = UVec3::new(2, 2, 2);
        let mut data = vec![0u8; 8];
        let written = SphereStamp {
            centers: &[DVec3::new(-1.0, 0.0, 0.0), DVec3::splat(9.0)],
            radii: DVec3::splat(1.0),
            dims,
            components: 1,
            color: &[7.0],
        }
        .visit(data.as_mut_slice());

        assert_eq!(written, 1);
        assert_eq!(data, vec![7, 0, 0, 0, 0, 0, 0, 0]);
    }
}
