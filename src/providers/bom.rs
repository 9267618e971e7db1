//! Australian Bureau of Meteorology (BoM) NWP rainfall forecasts.
//!
//! Files hold rainfall accumulated since forecast start (`accum_prcp`) on an
//! Albers equal-area grid described by an auxiliary `proj` variable, with
//! coordinates in kilometres.

use std::collections::HashMap;
use std::path::Path;

use crate::dataset::{AttributeValue, LabeledDataset};
use crate::error::{ImportError, Result};
use crate::importer::{import, ImportOptions, ImportResult, Importer, ACCUMULATED_VARNAME};
use crate::metadata::YOrigin;

/// Registry name
pub const NAME: &str = "bom_nwp";

/// Grid mapping variable
const PROJECTION_VARIABLE: &str = "proj";

const ALBERS: &str = "albers_conical_equal_area";

/// BoM importer
#[derive(Debug, Clone, Copy, Default)]
pub struct BomImporter;

impl Importer for BomImporter {
    fn name(&self) -> &str {
        NAME
    }

    fn institution(&self) -> &str {
        "Commonwealth of Australia, Bureau of Meteorology"
    }

    fn yorigin(&self) -> YOrigin {
        YOrigin::Upper
    }

    fn default_varname(&self) -> &str {
        ACCUMULATED_VARNAME
    }

    fn projection(&self, dataset: &dyn LabeledDataset) -> Result<Option<String>> {
        if !dataset.has_variable(PROJECTION_VARIABLE) {
            return Ok(None);
        }

        let attributes = dataset.variable_attributes(PROJECTION_VARIABLE)?;
        let grid_mapping = attributes
            .get("grid_mapping_name")
            .and_then(AttributeValue::as_text);
        if grid_mapping != Some(ALBERS) {
            return Ok(None);
        }

        albers_projection(&attributes, dataset.source()).map(Some)
    }
}

/// Compose the PROJ.4 definition of an Albers equal-area grid mapping
fn albers_projection(attributes: &HashMap<String, AttributeValue>, path: &str) -> Result<String> {
    let number = |name: &str| {
        attributes
            .get(name)
            .and_then(AttributeValue::as_f64)
            .ok_or_else(|| missing_parameter(name, path))
    };

    let lon_0 = number("longitude_of_central_meridian")?;
    let lat_0 = number("latitude_of_projection_origin")?;
    let parallels = attributes
        .get("standard_parallel")
        .and_then(AttributeValue::as_f64_array)
        .ok_or_else(|| missing_parameter("standard_parallel", path))?;

    let (lat_1, lat_2) = match parallels.as_slice() {
        [lat_1, lat_2, ..] => (*lat_1, *lat_2),
        _ => {
            return Err(ImportError::dataset(
                path,
                format!(
                    "'{}' needs two standard parallels, found {}",
                    PROJECTION_VARIABLE,
                    parallels.len()
                ),
            ))
        }
    };

    Ok(format!(
        "+proj=aea +lon_0={:.3} +lat_0={:.3} +lat_1={:.3} +lat_2={:.3}",
        lon_0, lat_0, lat_1, lat_2
    ))
}

fn missing_parameter(name: &str, path: &str) -> ImportError {
    ImportError::dataset(
        path,
        format!("'{}' has no numeric '{}' attribute", PROJECTION_VARIABLE, name),
    )
}

/// Import a BoM NWP rainfall file
pub fn import_bom_nwp(path: &Path, options: &ImportOptions) -> Result<ImportResult> {
    import(&BomImporter, path, options)
}
