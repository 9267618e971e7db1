//! nwp-import - import one NWP rainfall forecast file
//!
//! Runs a registered importer on a NetCDF file and prints the normalized
//! metadata together with a short summary of the precipitation field as JSON.

use std::time::Instant;
use tracing::{error, info};

use nwp_importers::field::{finite_max, finite_min};
use nwp_importers::providers::get_importer;
use nwp_importers::{
    import, init_tracing, log_operation_end, log_operation_start, Config, ImportResult, Result,
};

fn main() -> Result<()> {
    // Load configuration
    let (config, request) = Config::load()?;

    // Validate configuration
    config.validate()?;

    init_tracing(&config.log_level);
    info!("Starting nwp-import v{}", env!("CARGO_PKG_VERSION"));

    let start = Instant::now();
    log_operation_start(
        "nwp-import",
        Some(&format!("{} {}", request.importer, request.path.display())),
    );

    let importer = get_importer(&request.importer).map_err(|e| {
        error!("{}", e);
        e
    })?;

    let result = import(importer.as_ref(), &request.path, &request.options).map_err(|e| {
        log_operation_end("nwp-import", start, false);
        e
    })?;

    let report = report(importer.name(), &request.path.display().to_string(), &result)?;
    let output = if request.compact {
        serde_json::to_string(&report)?
    } else {
        serde_json::to_string_pretty(&report)?
    };
    println!("{}", output);

    log_operation_end("nwp-import", start, true);
    Ok(())
}

/// Metadata plus a summary of the imported field
fn report(importer: &str, path: &str, result: &ImportResult) -> Result<serde_json::Value> {
    let values = result.precipitation.iter().copied();
    let missing = result
        .precipitation
        .iter()
        .filter(|v| !v.is_finite())
        .count();

    Ok(serde_json::json!({
        "importer": importer,
        "file": path,
        "variable": result.variable,
        "attributes": result.attributes,
        "shape": result.precipitation.shape(),
        "quality": serde_json::Value::Null,
        "summary": {
            "min": finite_min(values.clone()),
            "max": finite_max(values),
            "missing": missing,
        },
        "metadata": result.metadata.to_json()?,
    }))
}
