//! # nwp_importers
//!
//! Importers for numerical weather prediction (NWP) rainfall forecasts
//! stored as NetCDF.
//!
//! Each supported provider ships its forecasts with its own conventions for
//! variable names, coordinate units, projections and accumulation. This
//! library reads such a file and returns the same three things for every
//! provider: a `[time, row, col]` precipitation array, an optional quality
//! field and a flat, normalized metadata record.
//!
//! ## Providers
//!
//! - **`bom_nwp`**: Australian Bureau of Meteorology, accumulated rainfall on
//!   an Albers equal-area grid
//! - **`knmi_nwp`**: KNMI Harmonie, regular longitude/latitude grid
//! - **`rmi_nwp`**: Royal Meteorological Institute of Belgium, projection
//!   given as a PROJ.4 global attribute
//!
//! ## Architecture
//!
//! - **Dataset layer**: [`dataset::LabeledDataset`] abstracts the NetCDF
//!   backend (cargo feature `netcdf`) and in-memory fixtures
//! - **Pipeline**: [`importer::import`] extracts geodata, decodes time and
//!   de-accumulates where needed
//! - **Providers**: [`providers`] holds the provider strategies and the
//!   registry they are looked up in

pub mod config;
pub mod dataset;
pub mod error;
pub mod field;
pub mod geodata;
pub mod importer;
pub mod logging;
pub mod metadata;
pub mod providers;
pub mod threshold;
pub mod time;

pub use config::Config;
pub use dataset::{AttributeValue, Coordinate, LabeledDataset, MemoryDataset, NetcdfDataset};
pub use error::{ImportError, Result};
pub use field::DataArray;
pub use importer::{import, import_dataset, ImportOptions, ImportResult, Importer};
pub use logging::{
    generate_import_id, init_tracing, log_error, log_import_stats, log_operation_end,
    log_operation_start, log_timed_operation,
};
pub use metadata::{Geodata, Metadata, YOrigin};
pub use providers::{
    get_importer, import_bom_nwp, import_by_name, import_knmi_nwp, import_rmi_nwp,
    importer_names,
};
pub use threshold::estimate_threshold;
