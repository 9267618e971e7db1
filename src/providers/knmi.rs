//! Royal Netherlands Meteorological Institute (KNMI) Harmonie forecasts.
//!
//! The grid is regular in longitude and latitude, so the coordinates are
//! read from `lon`/`lat` and the projection is fixed.

use std::path::Path;

use crate::dataset::LabeledDataset;
use crate::error::Result;
use crate::importer::{import, ImportOptions, ImportResult, Importer};
use crate::metadata::YOrigin;

/// Registry name
pub const NAME: &str = "knmi_nwp";

/// Geographic WGS84 coordinates
pub const PROJECTION: &str = "+proj=longlat +ellps=WGS84 +datum=WGS84 +no_defs";

/// KNMI importer
#[derive(Debug, Clone, Copy, Default)]
pub struct KnmiImporter;

impl Importer for KnmiImporter {
    fn name(&self) -> &str {
        NAME
    }

    fn institution(&self) -> &str {
        "Royal Netherlands Meteorological Institute (KNMI)"
    }

    fn yorigin(&self) -> YOrigin {
        YOrigin::Lower
    }

    fn default_varname(&self) -> &str {
        "P_fc"
    }

    fn spatial_coordinates(&self) -> (&str, &str) {
        ("lon", "lat")
    }

    fn projection(&self, _dataset: &dyn LabeledDataset) -> Result<Option<String>> {
        Ok(Some(PROJECTION.to_string()))
    }
}

/// Import a KNMI NWP rainfall file
pub fn import_knmi_nwp(path: &Path, options: &ImportOptions) -> Result<ImportResult> {
    import(&KnmiImporter, path, options)
}
