//! Import orchestration.
//!
//! [`import`] is the single entry point shared by all providers: it opens the
//! file, derives the metadata, resolves accumulated fields into per-step
//! amounts and hands everything back to the caller. Provider specifics live
//! behind the [`Importer`] trait.

use ndarray::{Array2, Array3};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;
use tracing::{info, info_span};

use crate::dataset::{check_dependencies, AttributeValue, LabeledDataset, NetcdfDataset};
use crate::error::{ImportError, Result};
use crate::field::deaccumulate;
use crate::geodata::extract_geodata;
use crate::logging::{generate_import_id, log_error, log_import_stats, log_timed_operation};
use crate::metadata::{Metadata, YOrigin};
use crate::time::decode_time_axis;

/// Variable name marking precipitation accumulated since forecast start
pub const ACCUMULATED_VARNAME: &str = "accum_prcp";

/// Default name of the time coordinate
pub const DEFAULT_VARNAME_TIME: &str = "time";

/// Label the time axis carries once the variable has been read
pub const CANONICAL_TIME_DIM: &str = "t";

/// A provider-specific importer
pub trait Importer: Send + Sync {
    /// Name the importer is registered under
    fn name(&self) -> &str;

    /// Institution providing the data
    fn institution(&self) -> &str;

    /// Row convention of the provider's rasters
    fn yorigin(&self) -> YOrigin;

    /// Precipitation variable read when no `varname` option is given
    fn default_varname(&self) -> &str;

    /// Names of the x and y coordinate variables
    fn spatial_coordinates(&self) -> (&str, &str) {
        ("x", "y")
    }

    /// PROJ.4 definition of the grid, if known
    fn projection(&self, dataset: &dyn LabeledDataset) -> Result<Option<String>>;
}

/// Options recognized by every importer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImportOptions {
    /// Name of the precipitation variable (None = importer default)
    #[serde(default)]
    pub varname: Option<String>,

    /// Name of the time coordinate
    #[serde(default = "default_varname_time")]
    pub varname_time: String,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            varname: None,
            varname_time: default_varname_time(),
        }
    }
}

fn default_varname_time() -> String {
    DEFAULT_VARNAME_TIME.to_string()
}

impl ImportOptions {
    /// Set the precipitation variable name
    pub fn with_varname(mut self, varname: impl Into<String>) -> Self {
        self.varname = Some(varname.into());
        self
    }

    /// Set the time coordinate name
    pub fn with_varname_time(mut self, varname_time: impl Into<String>) -> Self {
        self.varname_time = varname_time.into();
        self
    }

    /// The configured variable name, or `default` if none was given
    pub fn varname_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.varname.as_deref().unwrap_or(default)
    }

    /// Build options from keyword pairs, rejecting unknown keys
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut options = Self::default();
        for (key, value) in pairs {
            match key {
                "varname" => options.varname = Some(value.to_string()),
                "varname_time" => options.varname_time = value.to_string(),
                other => {
                    return Err(ImportError::InvalidOption {
                        option: other.to_string(),
                        message: "unknown option; expected one of: varname, varname_time"
                            .to_string(),
                    })
                }
            }
        }
        options.validate()?;
        Ok(options)
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        if self.varname.as_deref().is_some_and(str::is_empty) {
            return Err(ImportError::InvalidOption {
                option: "varname".to_string(),
                message: "variable name cannot be empty".to_string(),
            });
        }
        if self.varname_time.is_empty() {
            return Err(ImportError::InvalidOption {
                option: "varname_time".to_string(),
                message: "time coordinate name cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Result of one import call
#[derive(Debug, Clone)]
pub struct ImportResult {
    /// Precipitation values indexed [time, row, col]
    pub precipitation: Array3<f32>,
    /// Quality layer; none of the supported sources provides one
    pub quality: Option<Array2<f32>>,
    /// Normalized metadata
    pub metadata: Metadata,
    /// Name of the returned variable
    pub variable: String,
    /// Descriptive attributes of the returned variable
    pub attributes: HashMap<String, AttributeValue>,
}

impl ImportResult {
    /// Split into the (precipitation, quality, metadata) triple
    pub fn into_parts(self) -> (Array3<f32>, Option<Array2<f32>>, Metadata) {
        (self.precipitation, self.quality, self.metadata)
    }
}

/// Import a NetCDF file with the given importer.
///
/// The file is opened for the duration of the call and closed on every exit
/// path.
pub fn import(
    importer: &dyn Importer,
    path: &Path,
    options: &ImportOptions,
) -> Result<ImportResult> {
    check_dependencies()?;
    options.validate()?;

    let import_id = generate_import_id();
    let span = info_span!("import", importer = importer.name(), import_id = %import_id);
    let _entered = span.enter();

    let start = Instant::now();
    info!(path = %path.display(), varname = ?options.varname, "Starting import");

    let result = NetcdfDataset::open(path)
        .and_then(|dataset| import_dataset(importer, &dataset, options));

    match &result {
        Ok(imported) => log_import_stats(
            importer.name(),
            &path.display().to_string(),
            imported.precipitation.shape(),
            &imported.variable,
            start.elapsed(),
        ),
        Err(e) => log_error(e, &format!("{} import of {}", importer.name(), path.display())),
    }

    result
}

/// Run the import pipeline on an already open dataset
pub fn import_dataset(
    importer: &dyn Importer,
    dataset: &dyn LabeledDataset,
    options: &ImportOptions,
) -> Result<ImportResult> {
    options.validate()?;
    let path = dataset.source();
    let varname = options.varname_or(importer.default_varname());

    let mut field = dataset.data_array(varname)?;
    if field.values.ndim() != 3 {
        return Err(ImportError::dataset(
            path,
            format!(
                "Variable '{}' must have 3 dimensions [time, y, x], found {:?}",
                varname, field.dims
            ),
        ));
    }

    let geodata = extract_geodata(importer, dataset, &field, options)?;

    let time = dataset.coordinate(&options.varname_time)?;
    let mut time_stamps = decode_time_axis(&time, path)?;

    if !field.rename_dim(&options.varname_time, CANONICAL_TIME_DIM) {
        return Err(ImportError::dataset(
            path,
            format!(
                "Variable '{}' has no '{}' dimension",
                varname, options.varname_time
            ),
        ));
    }
    let steps = field.len_of(CANONICAL_TIME_DIM).unwrap_or(0);
    if steps != time_stamps.len() {
        return Err(ImportError::dataset(
            path,
            format!(
                "Variable '{}' has {} time steps but '{}' has {} values",
                varname,
                steps,
                options.varname_time,
                time_stamps.len()
            ),
        ));
    }

    if varname == ACCUMULATED_VARNAME {
        info!("Rainfall values are accumulated. Disaggregating by time step");
        field = log_timed_operation("deaccumulate", || {
            deaccumulate(&field, CANONICAL_TIME_DIM)
        })
        .ok_or_else(|| {
            ImportError::dataset(path, format!("Variable '{}' has no time steps", varname))
        })?;
        time_stamps.remove(0);
    }

    let variable = std::mem::take(&mut field.name);
    let attributes = std::mem::take(&mut field.attributes);
    let precipitation = field.into_time_major(CANONICAL_TIME_DIM)?;

    Ok(ImportResult {
        precipitation,
        quality: None,
        metadata: Metadata::new(geodata, time_stamps),
        variable,
        attributes,
    })
}
