//! Test data generation utilities.
//!
//! This module writes small NetCDF files that follow the conventions of each
//! provider, with known values so the import results can be checked exactly.

use std::path::Path;

// Use the netcdf crate's error type directly
use netcdf::Error;
type Result<T> = std::result::Result<T, Error>;

/// Grid size used by the BoM fixture
pub const BOM_SIZE: usize = 3;

/// Number of time steps stored in the BoM fixture
pub const BOM_STEPS: usize = 4;

/// PROJ.4 string the RMI fixture carries
pub const RMI_PROJ4: &str = "+proj=lcc +lon_0=4.55 +lat_1=50.8 +lat_2=50.8 +a=6371229 +es=0 +lat_0=50.8 +x_0=365950 +y_0=-365950.000000001";

/// Value marking missing pixels in the RMI fixture
pub const RMI_MISSING: f32 = -1.0;

/// Accumulated BoM rainfall at `step` for the pixel with flat index `pixel`.
///
/// Each step adds `0.1 * (pixel + 1) * step` on top of the previous total,
/// starting from zero.
pub fn bom_accumulated(step: usize, pixel: usize) -> f32 {
    0.1 * (pixel + 1) as f32 * (step * (step + 1)) as f32 / 2.0
}

/// Creates a BoM-like file: accumulated rainfall, coordinates in km, an
/// Albers `proj` variable and 10-minute steps.
pub fn create_bom_nwp_nc(path: &Path, steps: usize) -> Result<()> {
    let mut file = netcdf::create(path)?;

    file.add_dimension("time", steps)?;
    file.add_dimension("y", BOM_SIZE)?;
    file.add_dimension("x", BOM_SIZE)?;

    file.add_attribute("title", "BoM NWP test data")?;

    let x_values = vec![-0.5f64, 0.0, 0.5];
    let y_values = vec![0.5f64, 0.0, -0.5];
    let time_values: Vec<f64> = (0..steps).map(|t| t as f64 * 600.0).collect();

    let pixels = BOM_SIZE * BOM_SIZE;
    let data_values: Vec<f32> = (0..steps)
        .flat_map(|t| (0..pixels).map(move |i| bom_accumulated(t, i)))
        .collect();

    {
        let mut proj = file.add_variable::<i32>("proj", &[])?;
        proj.put_attribute("grid_mapping_name", "albers_conical_equal_area")?;
        proj.put_attribute("longitude_of_central_meridian", 153.24f64)?;
        proj.put_attribute("latitude_of_projection_origin", -27.718f64)?;
        proj.put_attribute("standard_parallel", vec![-26.2f64, -29.3])?;
    }

    {
        let mut x_var = file.add_variable::<f64>("x", &["x"])?;
        x_var.put_attribute("units", "km")?;
        x_var.put_values(&x_values, &[..])?;
    }

    {
        let mut y_var = file.add_variable::<f64>("y", &["y"])?;
        y_var.put_attribute("units", "km")?;
        y_var.put_values(&y_values, &[..])?;
    }

    {
        let mut time_var = file.add_variable::<f64>("time", &["time"])?;
        time_var.put_attribute("units", "seconds since 2020-10-31 00:00:00")?;
        time_var.put_attribute("calendar", "proleptic_gregorian")?;
        time_var.put_values(&time_values, &[..])?;
    }

    {
        let mut data_var = file.add_variable::<f32>("accum_prcp", &["time", "y", "x"])?;
        data_var.put_attribute("units", "kg m-2")?;
        data_var.put_attribute("standard_name", "thickness_of_rainfall_amount")?;
        data_var.put_attribute("grid_mapping", "proj")?;
        data_var.put_values(&data_values, &[.., .., ..])?;
    }

    Ok(())
}

/// Creates an RMI-like file: rainfall per step in mm, coordinates in m, the
/// projection as a global attribute and 5-minute steps.
///
/// The first step is zero except for one pixel holding 0.2; the last pixel
/// of the last step is missing.
pub fn create_rmi_nwp_nc(path: &Path) -> Result<()> {
    let mut file = netcdf::create(path)?;

    file.add_unlimited_dimension("time")?;
    file.add_dimension("y", 2)?;
    file.add_dimension("x", 2)?;

    file.add_attribute("proj4string", RMI_PROJ4)?;
    file.add_attribute("institution", "RMI")?;

    let x_values = vec![0.0f64, 1300.0];
    let y_values = vec![0.0f64, -1300.0];
    let time_values = vec![5.0f64, 10.0, 15.0];
    let data_values = vec![
        0.0f32, 0.0, 0.0, 0.2, //
        0.5, 1.0, 0.0, 0.3, //
        2.0, 0.0, 0.1, RMI_MISSING,
    ];

    {
        let mut x_var = file.add_variable::<f64>("x", &["x"])?;
        x_var.put_attribute("units", "m")?;
        x_var.put_values(&x_values, &[..])?;
    }

    {
        let mut y_var = file.add_variable::<f64>("y", &["y"])?;
        y_var.put_attribute("units", "m")?;
        y_var.put_values(&y_values, &[..])?;
    }

    {
        let mut time_var = file.add_variable::<f64>("time", &["time"])?;
        time_var.put_attribute("units", "minutes since 2021-07-04 16:00:00")?;
        time_var.put_values(&time_values, &[..])?;
    }

    {
        let mut data_var = file.add_variable::<f32>("precipitation", &["time", "y", "x"])?;
        data_var.put_attribute("units", "mm")?;
        data_var.put_attribute("missing_value", RMI_MISSING)?;
        data_var.put_values(&data_values, &[.., .., ..])?;
    }

    Ok(())
}

/// Creates a KNMI-like file: `P_fc` on a lon/lat grid with hourly steps.
///
/// With `time_last` the variable is stored as `[lat, lon, time]`. The value
/// of step `t` at row `j`, column `i` is `t * 10 + j * 3 + i` either way.
pub fn create_knmi_nwp_nc(path: &Path, time_last: bool) -> Result<()> {
    let mut file = netcdf::create(path)?;

    let (steps, rows, cols) = (4usize, 2usize, 3usize);
    file.add_dimension("time", steps)?;
    file.add_dimension("lat", rows)?;
    file.add_dimension("lon", cols)?;

    let lon_values = vec![0.0f64, 0.037, 0.074];
    let lat_values = vec![49.0f64, 49.023];
    let time_values: Vec<f64> = (0..steps).map(|t| t as f64).collect();

    let value = |t: usize, j: usize, i: usize| (t * 10 + j * 3 + i) as f32;
    let mut data_values = Vec::with_capacity(steps * rows * cols);
    if time_last {
        for j in 0..rows {
            for i in 0..cols {
                for t in 0..steps {
                    data_values.push(value(t, j, i));
                }
            }
        }
    } else {
        for t in 0..steps {
            for j in 0..rows {
                for i in 0..cols {
                    data_values.push(value(t, j, i));
                }
            }
        }
    }

    {
        let mut lon_var = file.add_variable::<f64>("lon", &["lon"])?;
        lon_var.put_attribute("units", "degrees_east")?;
        lon_var.put_values(&lon_values, &[..])?;
    }

    {
        let mut lat_var = file.add_variable::<f64>("lat", &["lat"])?;
        lat_var.put_attribute("units", "degrees_north")?;
        lat_var.put_values(&lat_values, &[..])?;
    }

    {
        let mut time_var = file.add_variable::<f64>("time", &["time"])?;
        time_var.put_attribute("units", "hours since 2018-09-05 06:00:00")?;
        time_var.put_values(&time_values, &[..])?;
    }

    {
        let dims: &[&str] = if time_last {
            &["lat", "lon", "time"]
        } else {
            &["time", "lat", "lon"]
        };
        let mut data_var = file.add_variable::<f32>("P_fc", dims)?;
        data_var.put_attribute("units", "kg m-2")?;
        data_var.put_values(&data_values, &[.., .., ..])?;
    }

    Ok(())
}

/// Creates a file whose `precipitation` variable has no time dimension
pub fn create_two_dimensional_nc(path: &Path) -> Result<()> {
    let mut file = netcdf::create(path)?;

    file.add_dimension("time", 2)?;
    file.add_dimension("y", 2)?;
    file.add_dimension("x", 2)?;

    {
        let mut time_var = file.add_variable::<f64>("time", &["time"])?;
        time_var.put_attribute("units", "minutes since 2021-07-04 16:00:00")?;
        time_var.put_values(&[0.0f64, 5.0], &[..])?;
    }

    {
        let mut data_var = file.add_variable::<f32>("precipitation", &["y", "x"])?;
        data_var.put_attribute("units", "mm")?;
        data_var.put_values(&[0.0f32, 1.0, 2.0, 3.0], &[.., ..])?;
    }

    Ok(())
}

/// Creates an RMI-like file on a square grid of `size` pixels of 1300 m,
/// with `steps` 5-minute steps.
///
/// The grid starts at x = 0 and runs down from y = 0. Every value is zero
/// except pixel (0, 0), which holds `0.1 * t` at step `t`.
pub fn create_rmi_grid_nc(path: &Path, steps: usize, size: usize) -> Result<()> {
    let mut file = netcdf::create(path)?;

    file.add_dimension("time", steps)?;
    file.add_dimension("y", size)?;
    file.add_dimension("x", size)?;

    file.add_attribute("proj4string", RMI_PROJ4)?;

    let x_values: Vec<f64> = (0..size).map(|i| i as f64 * 1300.0).collect();
    let y_values: Vec<f64> = (0..size).map(|j| j as f64 * -1300.0).collect();
    let time_values: Vec<f64> = (1..=steps).map(|t| t as f64 * 5.0).collect();

    let mut data_values = vec![0.0f32; steps * size * size];
    for t in 0..steps {
        data_values[t * size * size] = 0.1 * t as f32;
    }

    {
        let mut x_var = file.add_variable::<f64>("x", &["x"])?;
        x_var.put_attribute("units", "m")?;
        x_var.put_values(&x_values, &[..])?;
    }

    {
        let mut y_var = file.add_variable::<f64>("y", &["y"])?;
        y_var.put_attribute("units", "m")?;
        y_var.put_values(&y_values, &[..])?;
    }

    {
        let mut time_var = file.add_variable::<f64>("time", &["time"])?;
        time_var.put_attribute("units", "minutes since 2021-07-04 16:00:00")?;
        time_var.put_values(&time_values, &[..])?;
    }

    {
        let mut data_var = file.add_variable::<f32>("precipitation", &["time", "y", "x"])?;
        data_var.put_attribute("units", "mm")?;
        data_var.put_values(&data_values, &[.., .., ..])?;
    }

    Ok(())
}
