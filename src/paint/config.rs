//! Brush configuration and JSON paint jobs

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::{DVec3, Result};
use crate::volume::{ImageData, ImageGeometry, ScalarArray, ScalarType};
use super::brush::{Brush, DEFAULT_RADIUS};
use super::filter::{PaintFilter, PointSpace};

/// Brush parameters as stored in configuration files
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaintConfig {
    /// Brush radius in world units. Must be finite and positive.
    pub radius: f64,
    /// Value per scalar component written into painted voxels
    pub color: Vec<f64>,
}

impl Default for PaintConfig {
    fn default() -> Self {
        Self {
            radius: DEFAULT_RADIUS,
            color: vec![1.0],
        }
    }
}

impl PaintConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.brush()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Validated brush for these parameters
    pub fn brush(&self) -> Result<Brush> {
        Brush::new(self.radius, self.color.clone())
    }
}

/// A self-contained paint request: a blank background description plus the
/// points to stamp into its mask.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PaintJob {
    pub geometry: ImageGeometry,
    #[serde(default)]
    pub scalar_type: ScalarType,
    #[serde(default = "default_components")]
    pub components: usize,
    #[serde(default)]
    pub brush: PaintConfig,
    #[serde(default)]
    pub space: PointSpace,
    #[serde(default)]
    pub points: Vec<DVec3>,
}

fn default_components() -> usize {
    1
}

impl PaintJob {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Paint into a fresh zero mask and return it
    pub fn run(&self) -> Result<ImageData> {
        let scalars = ScalarArray::zeros(
            self.scalar_type,
            self.components,
            self.geometry.number_of_points()?,
        )?;
        let background = Arc::new(ImageData::new(self.geometry).with_scalars(scalars));

        let mut filter = PaintFilter::from_config(&self.brush)?;
        filter.set_background(Some(background));
        match self.space {
            PointSpace::World => filter.set_points_from_world(self.points.clone()),
            PointSpace::Index => filter.set_points_from_index(self.points.clone()),
        }
        filter.execute()?;

        Ok(filter.take_mask().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Error, UVec3};
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = PaintConfig::default();
        assert_eq!(config.radius, 1.0);
        assert_eq!(config.color, vec![1.0]);
        assert_eq!(config.brush().unwrap(), Brush::default());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = PaintConfig::from_json_str(r#"{"radius": 2.5}"#).unwrap();
        assert_eq!(config.radius, 2.5);
        assert_eq!(config.color, vec![1.0]);
    }

    #[test]
    fn test_invalid_radius_rejected() {
        let err = PaintConfig::from_json_str(r#"{"radius": 0.0}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidRadius(_)));
        assert!(matches!(PaintConfig::from_json_str("{radius"), Err(Error::Config(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"radius": 3.0, "color": [1.0, 0.5, 0.25]}}"#).unwrap();

        let config = PaintConfig::load(file.path()).unwrap();
        assert_eq!(config.color, vec![1.0, 0.5, 0.25]);

        let missing = PaintConfig::load(file.path().with_extension("missing"));
        assert!(matches!(missing, Err(Error::Io(_))));
    }

    #[test]
    fn test_job_run_index_points() {
        let job = PaintJob::from_json_str(
            r#"{
                "geometry": {"dimensions": [5, 5, 5]},
                "scalar_type": "int16",
                "brush": {"radius": 1.0, "color": [-4.0]},
                "space": "index",
                "points": [[2.0, 2.0, 2.0]]
            }"#,
        )
        .unwrap();

        let mask = job.run().unwrap();
        let scalars = mask.scalars().unwrap();
        assert_eq!(scalars.scalar_type(), ScalarType::Int16);
        assert_eq!(mask.voxel(UVec3::new(2, 2, 3)), Some(vec![-4.0]));
        assert_eq!(mask.voxel(UVec3::new(2, 3, 3)), Some(vec![0.0]));
    }

    #[test]
    fn test_job_run_world_points() {
        let job = PaintJob::from_json_str(
            r#"{
                "geometry": {"dimensions": [6, 6, 6], "spacing": [2.0, 2.0, 2.0], "origin": [-6.0, -6.0, -6.0]},
                "brush": {"radius": 1.0, "color": [200.0]},
                "space": "world",
                "points": [[0.2, -0.1, 1.9]]
            }"#,
        )
        .unwrap();

        // world (0.2, -0.1, 1.9) -> index (3.1, 2.95, 3.95) -> (3, 3, 4)
        let mask = job.run().unwrap();
        assert_eq!(mask.voxel(UVec3::new(3, 3, 4)), Some(vec![200.0]));
        let painted = mask.scalars().unwrap().as_bytes().iter().filter(|&&b| b != 0).count();
        assert_eq!(painted, 1);
    }

    #[test]
    fn test_job_color_mismatch() {
        let job = PaintJob::from_json_str(
            r#"{"geometry": {"dimensions": [2, 2, 2]}, "components": 3, "points": [[0, 0, 0]]}"#,
        )
        .unwrap();
        assert!(matches!(job.run(), Err(Error::ColorMismatch { color: 1, components: 3 })));
    }

    #[test]
    fn test_job_rejects_overflowing_dimensions() {
        let job = PaintJob::from_json_str(
            r#"{"geometry": {"dimensions": [4194304, 4194304, 1048576]}, "points": [[0, 0, 0]]}"#,
        )
        .unwrap();
        assert!(matches!(job.run(), Err(Error::InvalidDimensions(_))));
    }
}
