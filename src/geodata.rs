//! Geodata extraction.
//!
//! Derives the normalized metadata of a precipitation field from an open
//! dataset. The steps are shared by all providers; the provider only decides
//! the projection, the coordinate variable names and a few constants.
//! Every failure is reported as [`ImportError::MetadataExtraction`] naming
//! the metadata field being derived.

use tracing::{debug, warn};

use crate::dataset::{Coordinate, LabeledDataset};
use crate::error::{ImportError, Result};
use crate::field::DataArray;
use crate::importer::{ImportOptions, Importer};
use crate::metadata::{normalize_unit, Geodata};
use crate::threshold::{estimate_threshold, zero_value};
use crate::time::{accumulation_minutes, decode_time_axis, is_regular};

/// Extract the geodata of `precipitation`, a variable read from `dataset`.
///
/// `precipitation` must still be in its stored form (before any
/// de-accumulation): zerovalue and threshold describe its first time step.
pub fn extract_geodata(
    importer: &dyn Importer,
    dataset: &dyn LabeledDataset,
    precipitation: &DataArray,
    options: &ImportOptions,
) -> Result<Geodata> {
    let path = dataset.source();
    let field_error = move |field: &'static str| move |e: ImportError| e.in_field(field, path);

    let projection = importer.projection(dataset).map_err(field_error("projection"))?;

    let accutime =
        accumulation_period(dataset, &options.varname_time).map_err(field_error("accutime"))?;

    let unit = precipitation_unit(precipitation, path).map_err(field_error("unit"))?;

    let (x_name, y_name) = importer.spatial_coordinates();
    let x = dataset.coordinate(x_name).map_err(field_error("x1"))?;
    let y = dataset.coordinate(y_name).map_err(field_error("y1"))?;
    let (x, y) = normalize_coordinates(x, y);

    let cartesian_unit = x
        .units()
        .map(str::to_string)
        .ok_or_else(|| missing_units(&x, path).in_field("cartesian_unit", path))?;

    let (x1, x2) = bounds(&x, path).map_err(field_error("x1"))?;
    let (y1, y2) = bounds(&y, path).map_err(field_error("y1"))?;
    let xpixelsize = pixel_size(&x, path).map_err(field_error("xpixelsize"))?;
    let ypixelsize = pixel_size(&y, path).map_err(field_error("ypixelsize"))?;

    let first_step = precipitation.isel(&options.varname_time, 0).ok_or_else(|| {
        ImportError::MetadataExtraction {
            field: "zerovalue".to_string(),
            path: path.to_string(),
            message: format!(
                "Variable '{}' has no time step along '{}'",
                precipitation.name, options.varname_time
            ),
        }
    })?;
    let zerovalue = zero_value(first_step.view()) as f64;
    let threshold = estimate_threshold(first_step.view()) as f64;

    debug!(
        importer = importer.name(),
        projection = ?projection,
        accutime,
        unit = ?unit,
        x1, x2, y1, y2,
        xpixelsize,
        ypixelsize,
        zerovalue,
        threshold,
        "Derived geodata"
    );

    Ok(Geodata {
        projection,
        x1,
        y1,
        x2,
        y2,
        xpixelsize,
        ypixelsize,
        cartesian_unit,
        yorigin: importer.yorigin(),
        institution: importer.institution().to_string(),
        unit,
        transform: None,
        accutime,
        threshold,
        zerovalue,
    })
}

/// Minutes between forecast steps, taken from the second element of the
/// time difference sequence. A warning is logged when the axis is irregular.
fn accumulation_period(dataset: &dyn LabeledDataset, varname_time: &str) -> Result<f64> {
    let time = dataset.coordinate(varname_time)?;
    let time_stamps = decode_time_axis(&time, dataset.source())?;

    let minutes = accumulation_minutes(&time_stamps).ok_or_else(|| {
        ImportError::dataset(
            dataset.source(),
            format!(
                "Time coordinate '{}' needs at least 2 steps, found {}",
                varname_time,
                time_stamps.len()
            ),
        )
    })?;

    if !is_regular(&time_stamps) {
        warn!(
            path = dataset.source(),
            accutime = minutes,
            "Time axis is irregular; accumulation period taken from the first interval"
        );
    }

    Ok(minutes)
}

/// Normalized rainfall unit. A missing `units` attribute gives `None`,
/// one that is not a string is an error.
fn precipitation_unit(precipitation: &DataArray, path: &str) -> Result<Option<String>> {
    match precipitation.attributes.get("units") {
        None => Ok(None),
        Some(value) => value.as_text().map(|u| Some(normalize_unit(u))).ok_or_else(|| {
            ImportError::dataset(
                path,
                format!(
                    "Attribute 'units' of '{}' is not a string: {:?}",
                    precipitation.name, value
                ),
            )
        }),
    }
}

/// Move kilometre coordinates to metres.
///
/// The decision is taken on the x-axis units and applied to both axes.
pub fn normalize_coordinates(x: Coordinate, y: Coordinate) -> (Coordinate, Coordinate) {
    if x.units() == Some("km") {
        (x.rescaled(1000.0, "m"), y.rescaled(1000.0, "m"))
    } else {
        (x, y)
    }
}

/// Minimum and maximum of a coordinate
fn bounds(coordinate: &Coordinate, path: &str) -> Result<(f64, f64)> {
    let finite = coordinate.values.iter().copied().filter(|v| v.is_finite());
    let min = finite.clone().fold(f64::INFINITY, f64::min);
    let max = finite.fold(f64::NEG_INFINITY, f64::max);

    if min.is_finite() && max.is_finite() {
        Ok((min, max))
    } else {
        Err(ImportError::dataset(
            path,
            format!("Coordinate '{}' has no finite values", coordinate.name),
        ))
    }
}

/// Spacing between the first two samples of a coordinate.
///
/// Uniform spacing is assumed and not checked.
fn pixel_size(coordinate: &Coordinate, path: &str) -> Result<f64> {
    match coordinate.values.as_slice() {
        [first, second, ..] => Ok((second - first).abs()),
        _ => Err(ImportError::dataset(
            path,
            format!(
                "Coordinate '{}' needs at least 2 samples, found {}",
                coordinate.name,
                coordinate.values.len()
            ),
        )),
    }
}

fn missing_units(coordinate: &Coordinate, path: &str) -> ImportError {
    ImportError::dataset(
        path,
        format!("Coordinate '{}' has no 'units' attribute", coordinate.name),
    )
}
