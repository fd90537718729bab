//! Typed scalar buffers attached to volumes
//!
//! The element type is carried explicitly by [`ScalarType`] so a mask can be
//! allocated with the same numeric type as its background without inspecting
//! the buffer at runtime.

use bytemuck::Pod;
use half::f16;
use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};

/// Numeric element type of a scalar buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarType {
    Int8,
    #[default]
    Uint8,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Float16,
    Float32,
    Float64,
}

impl ScalarType {
    /// Size of one element in bytes
    pub fn size_of(self) -> usize {
        match self {
            ScalarType::Int8 | ScalarType::Uint8 => 1,
            ScalarType::Int16 | ScalarType::Uint16 | ScalarType::Float16 => 2,
            ScalarType::Int32 | ScalarType::Uint32 | ScalarType::Float32 => 4,
            ScalarType::Float64 => 8,
        }
    }
}

/// Element of a scalar buffer.
///
/// Conversions from `f64` saturate for integer types (NaN becomes 0).
pub trait Element: Pod + Default + PartialEq + std::fmt::Debug + Send + Sync + 'static {
    fn from_f64(v: f64) -> Self;
    fn to_f64(self) -> f64;
}

macro_rules! impl_element {
    ($($t:ty),*) => {
        $(
            impl Element for $t {
                fn from_f64(v: f64) -> Self {
                    v as $t
                }

                fn to_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_element!(i8, u8, i16, u16, i32, u32, f32, f64);

impl Element for f16 {
    fn from_f64(v: f64) -> Self {
        f16::from_f64(v)
    }

    fn to_f64(self) -> f64 {
        f16::to_f64(self)
    }
}

/// Flat typed storage, one variant per [`ScalarType`]
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarData {
    Int8(Vec<i8>),
    Uint8(Vec<u8>),
    Int16(Vec<i16>),
    Uint16(Vec<u16>),
    Int32(Vec<i32>),
    Uint32(Vec<u32>),
    Float16(Vec<f16>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
}

/// Operation over a mutable buffer of any element type.
///
/// Lets generic code (e.g. the sphere stamp) run once per call on the
/// concrete slice instead of matching per voxel.
pub trait ScalarVisitorMut {
    type Output;

    fn visit<T: Element>(self, data: &mut [T]) -> Self::Output;
}

macro_rules! each_variant {
    ($data:expr, $v:ident => $body:expr) => {
        match $data {
            ScalarData::Int8($v) => $body,
            ScalarData::Uint8($v) => $body,
            ScalarData::Int16($v) => $body,
            ScalarData::Uint16($v) => $body,
            ScalarData::Int32($v) => $body,
            ScalarData::Uint32($v) => $body,
            ScalarData::Float16($v) => $body,
            ScalarData::Float32($v) => $body,
            ScalarData::Float64($v) => $body,
        }
    };
}

impl ScalarData {
    /// Zero-filled buffer of `len` elements
    pub fn zeros(scalar_type: ScalarType, len: usize) -> Self {
        match scalar_type {
            ScalarType::Int8 => ScalarData::Int8(vec![0; len]),
            ScalarType::Uint8 => ScalarData::Uint8(vec![0; len]),
            ScalarType::Int16 => ScalarData::Int16(vec![0; len]),
            ScalarType::Uint16 => ScalarData::Uint16(vec![0; len]),
            ScalarType::Int32 => ScalarData::Int32(vec![0; len]),
            ScalarType::Uint32 => ScalarData::Uint32(vec![0; len]),
            ScalarType::Float16 => ScalarData::Float16(vec![f16::ZERO; len]),
            ScalarType::Float32 => ScalarData::Float32(vec![0.0; len]),
            ScalarType::Float64 => ScalarData::Float64(vec![0.0; len]),
        }
    }

    /// Copy a raw native-endian byte buffer. `bytes.len()` must be a
    /// multiple of the element size.
    fn from_bytes(scalar_type: ScalarType, bytes: &[u8]) -> Self {
        match scalar_type {
            ScalarType::Int8 => ScalarData::Int8(collect(bytes)),
            ScalarType::Uint8 => ScalarData::Uint8(bytes.to_vec()),
            ScalarType::Int16 => ScalarData::Int16(collect(bytes)),
            ScalarType::Uint16 => ScalarData::Uint16(collect(bytes)),
            ScalarType::Int32 => ScalarData::Int32(collect(bytes)),
            ScalarType::Uint32 => ScalarData::Uint32(collect(bytes)),
            ScalarType::Float16 => ScalarData::Float16(collect(bytes)),
            ScalarType::Float32 => ScalarData::Float32(collect(bytes)),
            ScalarType::Float64 => ScalarData::Float64(collect(bytes)),
        }
    }

    /// Element type descriptor
    pub fn scalar_type(&self) -> ScalarType {
        match self {
            ScalarData::Int8(_) => ScalarType::Int8,
            ScalarData::Uint8(_) => ScalarType::Uint8,
            ScalarData::Int16(_) => ScalarType::Int16,
            ScalarData::Uint16(_) => ScalarType::Uint16,
            ScalarData::Int32(_) => ScalarType::Int32,
            ScalarData::Uint32(_) => ScalarType::Uint32,
            ScalarData::Float16(_) => ScalarType::Float16,
            ScalarData::Float32(_) => ScalarType::Float32,
            ScalarData::Float64(_) => ScalarType::Float64,
        }
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        each_variant!(self, v => v.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element at `index` widened to f64
    pub fn get(&self, index: usize) -> Option<f64> {
        each_variant!(self, v => v.get(index).map(|&x| x.to_f64()))
    }

    /// Raw bytes in native layout
    pub fn as_bytes(&self) -> &[u8] {
        each_variant!(self, v => bytemuck::cast_slice(v.as_slice()))
    }

    /// Run a visitor on the concrete mutable slice
    pub fn visit_mut<V: ScalarVisitorMut>(&mut self, visitor: V) -> V::Output {
        each_variant!(self, v => visitor.visit(v.as_mut_slice()))
    }
}

fn collect<T: Pod>(bytes: &[u8]) -> Vec<T> {
    bytes
        .chunks_exact(std::mem::size_of::<T>())
        .map(bytemuck::pod_read_unaligned)
        .collect()
}

/// Scalar point data: a typed buffer interpreted as tuples of
/// `number_of_components` values, one tuple per voxel.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarArray {
    data: ScalarData,
    components: usize,
    generation: u32,
}

impl ScalarArray {
    /// Zero-initialized array of `tuples` tuples
    pub fn zeros(scalar_type: ScalarType, components: usize, tuples: usize) -> Result<Self> {
        check_components(components)?;
        let len = components.checked_mul(tuples).ok_or_else(|| {
            Error::InvalidDimensions(format!("{tuples} tuples of {components} components overflows"))
        })?;
        Ok(Self {
            data: ScalarData::zeros(scalar_type, len),
            components,
            generation: 0,
        })
    }

    /// Build from a raw backing buffer of native-endian elements
    pub fn from_raw(scalar_type: ScalarType, components: usize, bytes: &[u8]) -> Result<Self> {
        check_components(components)?;
        let tuple_bytes = scalar_type.size_of() * components;
        if bytes.len() % tuple_bytes != 0 {
            return Err(Error::BufferLength { scalar_type, len: bytes.len(), tuple_bytes });
        }
        Ok(Self {
            data: ScalarData::from_bytes(scalar_type, bytes),
            components,
            generation: 0,
        })
    }

    /// Wrap existing typed data
    pub fn from_data(components: usize, data: ScalarData) -> Result<Self> {
        check_components(components)?;
        check_tuple_multiple(&data, components)?;
        Ok(Self { data, components, generation: 0 })
    }

    pub fn data(&self) -> &ScalarData {
        &self.data
    }

    /// Mutable access to the buffer. Callers mutating through this are
    /// expected to call [`ScalarArray::modified`] afterwards.
    pub fn data_mut(&mut self) -> &mut ScalarData {
        &mut self.data
    }

    /// Replace the buffer, keeping the component count
    pub fn set_data(&mut self, data: ScalarData) -> Result<()> {
        check_tuple_multiple(&data, self.components)?;
        self.data = data;
        self.modified();
        Ok(())
    }

    pub fn number_of_components(&self) -> usize {
        self.components
    }

    pub fn number_of_tuples(&self) -> usize {
        self.data.len() / self.components
    }

    /// Number of scalar values (tuples * components)
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn scalar_type(&self) -> ScalarType {
        self.data.scalar_type()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.data.as_bytes()
    }

    /// Read one tuple widened to f64
    pub fn tuple(&self, index: usize) -> Result<Vec<f64>> {
        let start = self.tuple_start(index)?;
        Ok((start..start + self.components)
            .filter_map(|i| self.data.get(i))
            .collect())
    }

    /// Write one tuple, converting each value to the element type
    pub fn set_tuple(&mut self, index: usize, values: &[f64]) -> Result<()> {
        if values.len() != self.components {
            return Err(Error::InvalidDimensions(format!(
                "tuple has {} values, array has {} components",
                values.len(),
                self.components
            )));
        }
        let start = self.tuple_start(index)?;
        self.data.visit_mut(WriteTuple { start, values });
        self.modified();
        Ok(())
    }

    /// Mark the buffer as changed for downstream caches
    pub fn modified(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    /// Modification counter, bumped by [`ScalarArray::modified`]
    pub fn generation(&self) -> u32 {
        self.generation
    }

    fn tuple_start(&self, index: usize) -> Result<usize> {
        let tuples = self.number_of_tuples();
        if index >= tuples {
            return Err(Error::TupleOutOfRange { index, tuples });
        }
        Ok(index * self.components)
    }
}

struct WriteTuple<'a> {
    start: usize,
    values: &'a [f64],
}

impl ScalarVisitorMut for WriteTuple<'_> {
    type Output = ();

    fn visit<T: Element>(self, data: &mut [T]) {
        for (slot, &v) in data[self.start..].iter_mut().zip(self.values) {
            *slot = T::from_f64(v);
        }
    }
}

fn check_components(components: usize) -> Result<()> {
    if components == 0 {
        return Err(Error::InvalidDimensions("scalar arrays need at least one component".into()));
    }
    Ok(())
}

fn check_tuple_multiple(data: &ScalarData, components: usize) -> Result<()> {
    if data.len() % components != 0 {
        return Err(Error::InvalidDimensions(format!(
            "{} values is not a whole number of {}-component tuples",
            data.len(),
            components
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros() {
        let arr = ScalarArray::zeros(ScalarType::Int16, 3, 4).unwrap();
        assert_eq!(arr.len(), 12);
        assert_eq!(arr.number_of_tuples(), 4);
        assert_eq!(arr.scalar_type(), ScalarType::Int16);
        assert_eq!(arr.as_bytes().len(), 24);
        assert!(arr.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_zeros_length_overflow() {
        let err = ScalarArray::zeros(ScalarType::Uint8, 3, usize::MAX / 2).unwrap_err();
        assert!(matches!(err, Error::InvalidDimensions(_)));
    }

    #[test]
    fn test_zero_components_rejected() {
        assert!(ScalarArray::zeros(ScalarType::Uint8, 0, 4).is_err());
    }

    #[test]
    fn test_from_raw() {
        let values: [f32; 4] = [1.0, 2.5, -3.0, 4.0];
        let arr = ScalarArray::from_raw(ScalarType::Float32, 2, bytemuck::cast_slice(&values)).unwrap();
        assert_eq!(arr.number_of_tuples(), 2);
        assert_eq!(arr.tuple(1).unwrap(), vec![-3.0, 4.0]);
    }

    #[test]
    fn test_from_raw_bad_length() {
        let bytes = [0u8; 6];
        let err = ScalarArray::from_raw(ScalarType::Float32, 1, &bytes).unwrap_err();
        assert!(matches!(err, Error::BufferLength { len: 6, tuple_bytes: 4, .. }));
    }

    #[test]
    fn test_set_tuple_saturates() {
        let mut arr = ScalarArray::zeros(ScalarType::Uint8, 2, 3).unwrap();
        arr.set_tuple(2, &[300.0, -5.0]).unwrap();
        assert_eq!(arr.tuple(2).unwrap(), vec![255.0, 0.0]);
        assert_eq!(arr.tuple(0).unwrap(), vec![0.0, 0.0]);
        assert_eq!(arr.generation(), 1);
    }

    #[test]
    fn test_set_tuple_errors() {
        let mut arr = ScalarArray::zeros(ScalarType::Float64, 1, 3).unwrap();
        assert!(matches!(arr.set_tuple(3, &[1.0]), Err(Error::TupleOutOfRange { index: 3, tuples: 3 })));
        assert!(arr.set_tuple(0, &[1.0, 2.0]).is_err());
        assert_eq!(arr.generation(), 0);
    }

    #[test]
    fn test_float16_roundtrip_value() {
        let mut arr = ScalarArray::zeros(ScalarType::Float16, 1, 1).unwrap();
        arr.set_tuple(0, &[0.5]).unwrap();
        assert_eq!(arr.tuple(0).unwrap(), vec![0.5]);
    }

    #[test]
    fn test_set_data_checks_components() {
        let mut arr = ScalarArray::zeros(ScalarType::Uint8, 3, 1).unwrap();
        assert!(arr.set_data(ScalarData::Uint8(vec![1, 2])).is_err());
        arr.set_data(ScalarData::Uint8(vec![1, 2, 3, 4, 5, 6])).unwrap();
        assert_eq!(arr.number_of_tuples(), 2);
        assert_eq!(arr.generation(), 1);
    }

    #[test]
    fn test_scalar_type_serde() {
        let t: ScalarType = serde_json::from_str("\"float32\"").unwrap();
        assert_eq!(t, ScalarType::Float32);
        assert_eq!(t.size_of(), 4);
    }
}
