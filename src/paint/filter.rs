//! Paint filter: stamps brush spheres into a mask volume shaped like a
//! background volume.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::{DVec3, Error, Result};
use crate::math::round_half_up;
use crate::volume::{ImageData, ScalarArray};
use super::brush::{Brush, SphereStamp};
use super::config::PaintConfig;

/// Coordinate space of pending paint points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointSpace {
    /// World coordinates, mapped through the background geometry and rounded
    World,
    /// Voxel indices, used verbatim
    #[default]
    Index,
}

/// Whether the filter has unapplied changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterState {
    /// Nothing changed since the last successful execute
    Clean,
    /// Points or parameters changed; execute needed
    Dirty,
}

/// Summary of one successful execute
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaintStats {
    /// Points stamped
    pub points: usize,
    /// Centers that fell outside the mask extent
    pub points_outside: usize,
    /// Voxel writes (overlapping spheres count each write)
    pub voxels_written: usize,
    /// Whether the mask was allocated by this execute
    pub mask_created: bool,
}

/// Paints filled spheres into a mask volume.
///
/// The mask is created lazily from the background's geometry and element
/// type, then accumulates strokes across executes until replaced.
///
/// World points are rounded half-up to integer indices after mapping; index
/// points are NOT rounded. Callers passing fractional index points get
/// spheres centered between voxels.
///
/// ```
/// use voxpaint::core::{DVec3, UVec3};
/// use voxpaint::paint::PaintFilter;
/// use voxpaint::volume::{ImageData, ImageGeometry, ScalarArray, ScalarType};
/// use std::sync::Arc;
///
/// let geometry = ImageGeometry::new(UVec3::splat(10));
/// let scalars = ScalarArray::zeros(ScalarType::Uint8, 1, geometry.number_of_points().unwrap()).unwrap();
/// let background = Arc::new(ImageData::new(geometry).with_scalars(scalars));
///
/// let mut filter = PaintFilter::new();
/// filter.set_background(Some(background));
/// filter.set_radius(1.5).unwrap();
/// filter.set_color(vec![9.0]);
/// filter.set_points_from_index(vec![DVec3::splat(5.0)]);
///
/// let mask = filter.execute().unwrap();
/// assert_eq!(mask.voxel(UVec3::new(6, 6, 5)), Some(vec![9.0]));
/// assert_eq!(mask.voxel(UVec3::new(6, 6, 6)), Some(vec![0.0]));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PaintFilter {
    background: Option<Arc<ImageData>>,
    mask: Option<ImageData>,
    brush: Brush,
    points: Vec<DVec3>,
    point_space: PointSpace,
    /// Bumped on every public mutation
    generation: u32,
    /// `generation` at the end of the last successful execute
    executed_generation: u32,
    last_stats: Option<PaintStats>,
}

impl PaintFilter {
    /// Create a filter with the default brush (radius 1, color [1])
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a filter with brush parameters from a config
    pub fn from_config(config: &PaintConfig) -> Result<Self> {
        Ok(Self {
            brush: config.brush()?,
            ..Self::default()
        })
    }

    // -- Points ------------------------------------------------------------

    /// Replace pending points with world-space coordinates
    pub fn set_points_from_world(&mut self, points: Vec<DVec3>) {
        self.set_points(points, PointSpace::World);
    }

    /// Replace pending points with voxel indices. Expects integer values;
    /// they are not validated or rounded.
    pub fn set_points_from_index(&mut self, points: Vec<DVec3>) {
        self.set_points(points, PointSpace::Index);
    }

    fn set_points(&mut self, points: Vec<DVec3>, space: PointSpace) {
        self.points = points;
        self.point_space = space;
        self.modified();
    }

    /// Drop pending points without flagging the filter as changed
    fn clear_points(&mut self) {
        self.points.clear();
    }

    pub fn points(&self) -> &[DVec3] {
        &self.points
    }

    pub fn point_space(&self) -> PointSpace {
        self.point_space
    }

    // -- Properties --------------------------------------------------------

    pub fn background(&self) -> Option<&Arc<ImageData>> {
        self.background.as_ref()
    }

    pub fn set_background(&mut self, background: Option<Arc<ImageData>>) {
        self.background = background;
        self.modified();
    }

    pub fn mask(&self) -> Option<&ImageData> {
        self.mask.as_ref()
    }

    /// Replace the mask. No check against the background geometry is made.
    pub fn set_mask(&mut self, mask: Option<ImageData>) {
        self.mask = mask;
        self.modified();
    }

    /// Take ownership of the mask, leaving the filter without one
    pub fn take_mask(&mut self) -> Option<ImageData> {
        let mask = self.mask.take();
        self.modified();
        mask
    }

    pub fn radius(&self) -> f64 {
        self.brush.radius()
    }

    /// Set the brush radius. Rejects zero, negative and non-finite values.
    pub fn set_radius(&mut self, radius: f64) -> Result<()> {
        self.brush.set_radius(radius)?;
        self.modified();
        Ok(())
    }

    pub fn color(&self) -> &[f64] {
        self.brush.color()
    }

    /// Set the value written per scalar component. Its length must match the
    /// mask's component count at execute time.
    pub fn set_color(&mut self, color: Vec<f64>) {
        self.brush.set_color(color);
        self.modified();
    }

    pub fn brush(&self) -> &Brush {
        &self.brush
    }

    // -- State -------------------------------------------------------------

    /// The mask as published by the last successful execute
    pub fn output(&self) -> Option<&ImageData> {
        if self.last_stats.is_some() { self.mask.as_ref() } else { None }
    }

    pub fn state(&self) -> FilterState {
        if self.is_dirty() { FilterState::Dirty } else { FilterState::Clean }
    }

    pub fn is_dirty(&self) -> bool {
        self.generation != self.executed_generation
    }

    /// Modification counter of the filter itself
    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn last_stats(&self) -> Option<PaintStats> {
        self.last_stats
    }

    fn modified(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    // -- Execute -----------------------------------------------------------

    /// Paint all pending points into the mask and return it.
    ///
    /// On a configuration error the error is logged and returned, the mask
    /// is left untouched and the pending points are kept for a retry.
    pub fn execute(&mut self) -> Result<&ImageData> {
        let stats = match self.paint() {
            Ok(stats) => stats,
            Err(err) => {
                log::error!("Paint aborted: {err}");
                return Err(err);
            }
        };

        log::debug!(
            "Painted {} points ({} outside, {} voxel writes, mask created: {})",
            stats.points,
            stats.points_outside,
            stats.voxels_written,
            stats.mask_created
        );

        self.clear_points();
        self.executed_generation = self.generation;
        self.last_stats = Some(stats);

        self.mask.as_ref().ok_or(Error::MissingMaskScalars)
    }

    /// Validate everything, then write. Nothing is mutated on error.
    fn paint(&mut self) -> Result<PaintStats> {
        let background = self.background.as_deref().ok_or(Error::MissingBackground)?;
        let background_scalars = background.scalars().ok_or(Error::MissingBackgroundScalars)?;

        let mut created = None;
        let mask = match self.mask.as_mut() {
            Some(mask) => mask,
            None => created.insert(blank_mask(background, background_scalars)?),
        };

        let geometry = *mask.geometry();
        let scalars = mask.scalars_mut().ok_or(Error::MissingMaskScalars)?;

        let components = scalars.number_of_components();
        let expected = geometry
            .number_of_points()?
            .checked_mul(components)
            .ok_or_else(|| Error::InvalidDimensions(format!("mask of {} overflows", geometry.dimensions)))?;
        if scalars.len() < expected {
            return Err(Error::MaskSizeMismatch { expected, actual: scalars.len() });
        }
        let color = self.brush.color();
        if color.len() != components {
            return Err(Error::ColorMismatch { color: color.len(), components });
        }
        let radii = self.brush.voxel_radii(&geometry)?;

        let centers: Vec<DVec3> = match self.point_space {
            PointSpace::Index => self.points.clone(),
            PointSpace::World => self
                .points
                .iter()
                .map(|&p| round_half_up(background.world_to_index(p)))
                .collect(),
        };
        let mut points_outside = 0;
        for c in centers.iter().filter(|c| !geometry.contains_index(**c)) {
            points_outside += 1;
            match self.point_space {
                PointSpace::World => log::warn!("World point maps to index {c}, outside the mask extent"),
                PointSpace::Index => log::trace!("Paint center {c} lies outside the mask extent"),
            }
        }

        let voxels_written = scalars.data_mut().visit_mut(SphereStamp {
            centers: &centers,
            radii,
            dims: geometry.dimensions,
            components,
            color,
        });
        scalars.modified();
        mask.modified();

        let mask_created = created.is_some();
        if let Some(mask) = created {
            self.mask = Some(mask);
        }

        Ok(PaintStats {
            points: centers.len(),
            points_outside,
            voxels_written,
            mask_created,
        })
    }
}

/// Zero mask with the background's geometry, component count and element type
fn blank_mask(background: &ImageData, scalars: &ScalarArray) -> Result<ImageData> {
    let geometry = *background.geometry();
    let mask_scalars = ScalarArray::zeros(
        scalars.scalar_type(),
        scalars.number_of_components(),
        geometry.number_of_points()?,
    )?;
    log::trace!(
        "Created {:?} mask {} with {} components",
        mask_scalars.scalar_type(),
        geometry.dimensions,
        mask_scalars.number_of_components()
    );
    Ok(ImageData::new(geometry).with_scalars(mask_scalars))
}
