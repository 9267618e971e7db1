//! Labeled dataset access.
//!
//! Importers do not talk to the NetCDF library directly. They go through the
//! [`LabeledDataset`] trait, which exposes the few capabilities they need:
//! attribute lookup, coordinate values and labeled data arrays. Two backends
//! implement it: [`NetcdfDataset`] reads a file on disk and [`MemoryDataset`]
//! holds everything in memory.

use ndarray::ArrayD;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::{ImportError, Result};
use crate::field::DataArray;

/// Possible attribute values in a dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// String attribute
    Text(String),
    /// Numeric attribute (stored as f64 for simplicity)
    Number(f64),
    /// Array of numbers
    NumberArray(Vec<f64>),
}

impl AttributeValue {
    /// The value as text, if it is a string attribute
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The value as a single number.
    ///
    /// Single-element arrays are accepted as numbers.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Number(v) => Some(*v),
            AttributeValue::NumberArray(values) if values.len() == 1 => Some(values[0]),
            _ => None,
        }
    }

    /// The value as a list of numbers
    pub fn as_f64_array(&self) -> Option<Vec<f64>> {
        match self {
            AttributeValue::Number(v) => Some(vec![*v]),
            AttributeValue::NumberArray(values) => Some(values.clone()),
            AttributeValue::Text(_) => None,
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Number(value)
    }
}

impl From<Vec<f64>> for AttributeValue {
    fn from(value: Vec<f64>) -> Self {
        AttributeValue::NumberArray(value)
    }
}

/// A one-dimensional coordinate variable
#[derive(Debug, Clone, PartialEq)]
pub struct Coordinate {
    /// Name of the coordinate
    pub name: String,
    /// Coordinate values
    pub values: Vec<f64>,
    /// Coordinate attributes
    pub attributes: HashMap<String, AttributeValue>,
}

impl Coordinate {
    /// Create a coordinate without attributes
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
            attributes: HashMap::new(),
        }
    }

    /// Add an attribute, returning the updated coordinate
    pub fn with_attribute(mut self, name: &str, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(name.to_string(), value.into());
        self
    }

    /// The `units` attribute, if present and textual
    pub fn units(&self) -> Option<&str> {
        self.attributes.get("units").and_then(AttributeValue::as_text)
    }

    /// Multiply every value by `factor` and relabel the units
    pub fn rescaled(&self, factor: f64, units: &str) -> Self {
        let mut attributes = self.attributes.clone();
        attributes.insert("units".to_string(), AttributeValue::Text(units.to_string()));
        Self {
            name: self.name.clone(),
            values: self.values.iter().map(|v| v * factor).collect(),
            attributes,
        }
    }
}

/// Read access to a self-describing dataset with named variables,
/// coordinates and attributes.
pub trait LabeledDataset {
    /// Where the dataset came from, used in error messages
    fn source(&self) -> &str;

    /// Check if a variable (data or coordinate) exists
    fn has_variable(&self, name: &str) -> bool;

    /// Get a dataset-level attribute
    fn global_attribute(&self, name: &str) -> Result<Option<AttributeValue>>;

    /// Get all attributes of a variable
    fn variable_attributes(&self, name: &str) -> Result<HashMap<String, AttributeValue>>;

    /// Read a one-dimensional coordinate variable
    fn coordinate(&self, name: &str) -> Result<Coordinate>;

    /// Read a variable as a labeled array
    fn data_array(&self, name: &str) -> Result<DataArray>;

    /// Get a single attribute of a variable
    fn variable_attribute(&self, variable: &str, name: &str) -> Result<Option<AttributeValue>> {
        Ok(self.variable_attributes(variable)?.remove(name))
    }
}

/// Verify that the NetCDF backend is compiled into this build.
///
/// Called before any file is touched so a build without the backend fails
/// fast with a dependency error instead of an IO error.
pub fn check_dependencies() -> Result<()> {
    if cfg!(feature = "netcdf") {
        Ok(())
    } else {
        Err(missing_backend())
    }
}

fn missing_backend() -> ImportError {
    ImportError::MissingDependency {
        dependency: "netcdf".to_string(),
        message: "the NetCDF backend is required to import NWP rainfall products \
                  but this build was compiled without the 'netcdf' feature"
            .to_string(),
    }
}

/// An in-memory dataset
#[derive(Debug, Clone, Default)]
pub struct MemoryDataset {
    source: String,
    global_attributes: HashMap<String, AttributeValue>,
    coordinates: HashMap<String, Coordinate>,
    variables: HashMap<String, DataArray>,
}

impl MemoryDataset {
    /// Create an empty dataset labeled with `source`
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Default::default()
        }
    }

    /// Add a dataset-level attribute
    pub fn with_global_attribute(mut self, name: &str, value: impl Into<AttributeValue>) -> Self {
        self.global_attributes.insert(name.to_string(), value.into());
        self
    }

    /// Add a coordinate variable
    pub fn with_coordinate(mut self, coordinate: Coordinate) -> Self {
        self.coordinates.insert(coordinate.name.clone(), coordinate);
        self
    }

    /// Add a data variable
    pub fn with_variable(mut self, variable: DataArray) -> Self {
        self.variables.insert(variable.name.clone(), variable);
        self
    }

    fn missing(&self, kind: &str, name: &str) -> ImportError {
        ImportError::dataset(&self.source, format!("{} '{}' not found", kind, name))
    }
}

impl LabeledDataset for MemoryDataset {
    fn source(&self) -> &str {
        &self.source
    }

    fn has_variable(&self, name: &str) -> bool {
        self.variables.contains_key(name) || self.coordinates.contains_key(name)
    }

    fn global_attribute(&self, name: &str) -> Result<Option<AttributeValue>> {
        Ok(self.global_attributes.get(name).cloned())
    }

    fn variable_attributes(&self, name: &str) -> Result<HashMap<String, AttributeValue>> {
        if let Some(variable) = self.variables.get(name) {
            return Ok(variable.attributes.clone());
        }
        self.coordinates
            .get(name)
            .map(|coordinate| coordinate.attributes.clone())
            .ok_or_else(|| self.missing("Variable", name))
    }

    fn coordinate(&self, name: &str) -> Result<Coordinate> {
        self.coordinates
            .get(name)
            .cloned()
            .ok_or_else(|| self.missing("Coordinate", name))
    }

    fn data_array(&self, name: &str) -> Result<DataArray> {
        if let Some(variable) = self.variables.get(name) {
            return Ok(variable.clone());
        }

        // A coordinate read as data is a 1-D array along itself
        let coordinate = self
            .coordinates
            .get(name)
            .ok_or_else(|| self.missing("Variable", name))?;
        let values: Vec<f32> = coordinate.values.iter().map(|&v| v as f32).collect();
        let array = ArrayD::from_shape_vec(vec![values.len()], values)?;
        let mut data = DataArray::new(name, vec![name.to_string()], array)?;
        data.attributes = coordinate.attributes.clone();
        Ok(data)
    }
}

/// Unpacking parameters of a stored variable
#[cfg_attr(not(feature = "netcdf"), allow(dead_code))]
#[derive(Debug, Clone, Copy, PartialEq)]
struct Packing {
    fill_values: [Option<f64>; 2],
    scale_factor: f64,
    add_offset: f64,
}

#[cfg_attr(not(feature = "netcdf"), allow(dead_code))]
impl Packing {
    fn from_attributes(attributes: &HashMap<String, AttributeValue>) -> Self {
        let number = |name: &str| attributes.get(name).and_then(AttributeValue::as_f64);
        Self {
            fill_values: [number("_FillValue"), number("missing_value")],
            scale_factor: number("scale_factor").unwrap_or(1.0),
            add_offset: number("add_offset").unwrap_or(0.0),
        }
    }

    /// Map fill values to NaN and apply scale and offset
    fn decode(&self, raw: f64) -> f64 {
        if self.fill_values.iter().flatten().any(|&fill| fill == raw) {
            return f64::NAN;
        }
        raw * self.scale_factor + self.add_offset
    }
}

#[cfg(feature = "netcdf")]
mod backend {
    use super::*;
    use tracing::debug;

    /// A NetCDF file opened for reading.
    ///
    /// The file handle is released when the dataset is dropped.
    pub struct NetcdfDataset {
        path: String,
        file: netcdf::File,
    }

    impl std::fmt::Debug for NetcdfDataset {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("NetcdfDataset")
                .field("path", &self.path)
                .finish()
        }
    }

    impl NetcdfDataset {
        /// Open a NetCDF file
        pub fn open(path: &Path) -> Result<Self> {
            check_dependencies()?;

            if !path.exists() {
                return Err(ImportError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path.display()),
                )));
            }

            let file = netcdf::open(path)?;
            debug!(
                path = %path.display(),
                variables = file.variables().count(),
                dimensions = file.dimensions().count(),
                "Opened NetCDF file"
            );

            Ok(Self {
                path: path.display().to_string(),
                file,
            })
        }

        fn variable(&self, name: &str) -> Result<netcdf::Variable<'_>> {
            self.file.variable(name).ok_or_else(|| {
                ImportError::dataset(&self.path, format!("Variable '{}' not found", name))
            })
        }

        fn read_attributes(
            &self,
            variable: &netcdf::Variable<'_>,
        ) -> Result<HashMap<String, AttributeValue>> {
            let mut attributes = HashMap::new();
            for attr in variable.attributes() {
                let value = convert_attribute(&attr)?;
                attributes.insert(attr.name().to_string(), value);
            }
            Ok(attributes)
        }
    }

    impl LabeledDataset for NetcdfDataset {
        fn source(&self) -> &str {
            &self.path
        }

        fn has_variable(&self, name: &str) -> bool {
            self.file.variable(name).is_some()
        }

        fn global_attribute(&self, name: &str) -> Result<Option<AttributeValue>> {
            match self.file.attribute(name) {
                Some(attr) => Ok(Some(convert_attribute(&attr)?)),
                None => Ok(None),
            }
        }

        fn variable_attributes(&self, name: &str) -> Result<HashMap<String, AttributeValue>> {
            let variable = self.variable(name)?;
            self.read_attributes(&variable)
        }

        fn coordinate(&self, name: &str) -> Result<Coordinate> {
            let variable = self.variable(name)?;
            if variable.dimensions().len() != 1 {
                return Err(ImportError::dataset(
                    &self.path,
                    format!(
                        "Coordinate '{}' must be one-dimensional, found {} dimensions",
                        name,
                        variable.dimensions().len()
                    ),
                ));
            }

            let attributes = self.read_attributes(&variable)?;
            let packing = Packing::from_attributes(&attributes);
            let raw: Vec<f64> = variable.get_values::<f64, _>(..)?;

            Ok(Coordinate {
                name: name.to_string(),
                values: raw.into_iter().map(|v| packing.decode(v)).collect(),
                attributes,
            })
        }

        fn data_array(&self, name: &str) -> Result<DataArray> {
            let variable = self.variable(name)?;
            let dims: Vec<String> = variable
                .dimensions()
                .iter()
                .map(|dim| dim.name().to_string())
                .collect();
            let shape: Vec<usize> = variable.dimensions().iter().map(|dim| dim.len()).collect();

            let attributes = self.read_attributes(&variable)?;
            let packing = Packing::from_attributes(&attributes);
            let raw: Vec<f64> = variable.get_values::<f64, _>(..)?;
            let values: Vec<f32> = raw.into_iter().map(|v| packing.decode(v) as f32).collect();

            let array = ArrayD::from_shape_vec(shape, values)?;
            let mut data = DataArray::new(name, dims, array)?;
            data.attributes = attributes;
            Ok(data)
        }
    }

    /// Convert a NetCDF attribute to our AttributeValue enum
    fn convert_attribute(attr: &netcdf::Attribute<'_>) -> Result<AttributeValue> {
        use netcdf::AttributeValue as NcAttributeValue;

        let value = attr.value()?;

        let converted = match value {
            NcAttributeValue::Str(s) => AttributeValue::Text(s),
            NcAttributeValue::Strs(s) => AttributeValue::Text(s.join(" ")),

            NcAttributeValue::Uchar(v) => AttributeValue::Number(v as f64),
            NcAttributeValue::Schar(v) => AttributeValue::Number(v as f64),
            NcAttributeValue::Short(v) => AttributeValue::Number(v as f64),
            NcAttributeValue::Ushort(v) => AttributeValue::Number(v as f64),
            NcAttributeValue::Int(v) => AttributeValue::Number(v as f64),
            NcAttributeValue::Uint(v) => AttributeValue::Number(v as f64),
            NcAttributeValue::Longlong(v) => AttributeValue::Number(v as f64),
            NcAttributeValue::Ulonglong(v) => AttributeValue::Number(v as f64),
            NcAttributeValue::Float(v) => AttributeValue::Number(v as f64),
            NcAttributeValue::Double(v) => AttributeValue::Number(v),

            NcAttributeValue::Shorts(v) => to_number_array(v),
            NcAttributeValue::Ints(v) => to_number_array(v),
            NcAttributeValue::Floats(v) => to_number_array(v),
            NcAttributeValue::Doubles(v) => AttributeValue::NumberArray(v),

            other => AttributeValue::Text(format!("{:?}", other)),
        };

        Ok(converted)
    }

    fn to_number_array<T: Into<f64>>(values: Vec<T>) -> AttributeValue {
        AttributeValue::NumberArray(values.into_iter().map(Into::into).collect())
    }
}

#[cfg(feature = "netcdf")]
pub use backend::NetcdfDataset;

/// Placeholder for builds without the NetCDF backend.
///
/// Opening always fails with [`ImportError::MissingDependency`].
#[cfg(not(feature = "netcdf"))]
#[derive(Debug)]
pub struct NetcdfDataset {
    never: std::convert::Infallible,
}

#[cfg(not(feature = "netcdf"))]
impl NetcdfDataset {
    /// Open a NetCDF file
    pub fn open(_path: &Path) -> Result<Self> {
        Err(missing_backend())
    }
}

#[cfg(not(feature = "netcdf"))]
impl LabeledDataset for NetcdfDataset {
    fn source(&self) -> &str {
        match self.never {}
    }

    fn has_variable(&self, _name: &str) -> bool {
        match self.never {}
    }

    fn global_attribute(&self, _name: &str) -> Result<Option<AttributeValue>> {
        match self.never {}
    }

    fn variable_attributes(&self, _name: &str) -> Result<HashMap<String, AttributeValue>> {
        match self.never {}
    }

    fn coordinate(&self, _name: &str) -> Result<Coordinate> {
        match self.never {}
    }

    fn data_array(&self, _name: &str) -> Result<DataArray> {
        match self.never {}
    }
}
