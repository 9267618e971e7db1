//! Labeled array operations.
//!
//! A [`DataArray`] is an n-dimensional `f32` array whose axes carry
//! dimension names, together with the attributes of the variable it was read
//! from. The importers only need a handful of label-aware operations on it:
//! renaming an axis, selecting one index along an axis, differencing along an
//! axis and reordering the axes so that time comes first.

use ndarray::{Array3, ArrayD, ArrayViewD, Axis, ErrorKind, Ix3, ShapeError, Slice};
use std::collections::HashMap;

use crate::dataset::AttributeValue;
use crate::error::Result;

/// Name given to a de-accumulated precipitation variable
pub const PRECIPITATION_NAME: &str = "precipitation";

/// Standard name given to a de-accumulated precipitation variable
pub const PRECIPITATION_STANDARD_NAME: &str = "precipitation_amount";

/// An n-dimensional array with named axes and variable attributes
#[derive(Debug, Clone, PartialEq)]
pub struct DataArray {
    /// Name of the variable
    pub name: String,
    /// Dimension names, one per axis
    pub dims: Vec<String>,
    /// Array values
    pub values: ArrayD<f32>,
    /// Variable attributes
    pub attributes: HashMap<String, AttributeValue>,
}

impl DataArray {
    /// Create a new labeled array.
    ///
    /// Fails if the number of dimension names does not match the array rank.
    pub fn new(name: impl Into<String>, dims: Vec<String>, values: ArrayD<f32>) -> Result<Self> {
        if dims.len() != values.ndim() {
            return Err(ShapeError::from_kind(ErrorKind::IncompatibleShape).into());
        }

        Ok(Self {
            name: name.into(),
            dims,
            values,
            attributes: HashMap::new(),
        })
    }

    /// Add an attribute, returning the updated array
    pub fn with_attribute(mut self, name: &str, value: AttributeValue) -> Self {
        self.attributes.insert(name.to_string(), value);
        self
    }

    /// Get a text attribute
    pub fn text_attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).and_then(AttributeValue::as_text)
    }

    /// Find the axis carrying the given dimension name
    pub fn axis_of(&self, dim: &str) -> Option<Axis> {
        self.dims.iter().position(|d| d == dim).map(Axis)
    }

    /// Length of the named dimension
    pub fn len_of(&self, dim: &str) -> Option<usize> {
        self.axis_of(dim).map(|axis| self.values.len_of(axis))
    }

    /// Rename a dimension. Returns false if no axis carries `from`.
    pub fn rename_dim(&mut self, from: &str, to: &str) -> bool {
        match self.dims.iter_mut().find(|d| d.as_str() == from) {
            Some(dim) => {
                *dim = to.to_string();
                true
            }
            None => false,
        }
    }

    /// Select a single index along the named dimension
    pub fn isel(&self, dim: &str, index: usize) -> Option<ArrayViewD<'_, f32>> {
        let axis = self.axis_of(dim)?;
        if index >= self.values.len_of(axis) {
            return None;
        }
        Some(self.values.index_axis(axis, index))
    }

    /// Subtract from every element its predecessor along `dim`.
    ///
    /// The first index has no predecessor and is dropped, so the result is one
    /// element shorter along `dim`. Name and attributes are carried over.
    pub fn shift_subtract(&self, dim: &str) -> Option<DataArray> {
        let axis = self.axis_of(dim)?;
        let len = self.values.len_of(axis);
        if len == 0 {
            return None;
        }

        let current = self.values.slice_axis(axis, Slice::from(1..));
        let previous = self.values.slice_axis(axis, Slice::from(..len - 1));

        Some(DataArray {
            name: self.name.clone(),
            dims: self.dims.clone(),
            values: &current - &previous,
            attributes: self.attributes.clone(),
        })
    }

    /// Consume the array and return it as a 3-D array with `dim` on axis 0.
    ///
    /// The remaining axes keep their relative order.
    pub fn into_time_major(self, dim: &str) -> Result<Array3<f32>> {
        let first = self
            .axis_of(dim)
            .ok_or_else(|| ShapeError::from_kind(ErrorKind::IncompatibleShape))?;

        let mut order = vec![first.index()];
        order.extend((0..self.values.ndim()).filter(|&i| i != first.index()));

        let cube = self
            .values
            .permuted_axes(order)
            .into_dimensionality::<Ix3>()?;

        Ok(cube.as_standard_layout().into_owned())
    }
}

/// De-accumulate a field holding totals accumulated since forecast start.
///
/// Each step becomes the difference with the previous step; the first step
/// is dropped. The result is renamed to `precipitation` and marked as a
/// precipitation amount, keeping the other descriptive attributes.
pub fn deaccumulate(accumulated: &DataArray, dim: &str) -> Option<DataArray> {
    let mut precipitation = accumulated.shift_subtract(dim)?;
    precipitation.name = PRECIPITATION_NAME.to_string();
    precipitation.attributes.insert(
        "standard_name".to_string(),
        AttributeValue::Text(PRECIPITATION_STANDARD_NAME.to_string()),
    );
    Some(precipitation)
}

/// Minimum over the finite values, or None if there are none
pub fn finite_min<I>(values: I) -> Option<f32>
where
    I: IntoIterator<Item = f32>,
{
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| Some(acc.map_or(v, |m: f32| m.min(v))))
}

/// Maximum over the finite values, or None if there are none
pub fn finite_max<I>(values: I) -> Option<f32>
where
    I: IntoIterator<Item = f32>,
{
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| Some(acc.map_or(v, |m: f32| m.max(v))))
}
