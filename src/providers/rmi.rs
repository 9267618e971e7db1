//! Royal Meteorological Institute of Belgium (RMI) NWP rainfall forecasts.

use std::path::Path;

use crate::dataset::{AttributeValue, LabeledDataset};
use crate::error::{ImportError, Result};
use crate::importer::{import, ImportOptions, ImportResult, Importer};
use crate::metadata::YOrigin;

/// Registry name
pub const NAME: &str = "rmi_nwp";

/// Global attribute holding the PROJ.4 definition of the grid
const PROJECTION_ATTRIBUTE: &str = "proj4string";

/// RMI importer
#[derive(Debug, Clone, Copy, Default)]
pub struct RmiImporter;

impl Importer for RmiImporter {
    fn name(&self) -> &str {
        NAME
    }

    fn institution(&self) -> &str {
        "Royal Meteorological Institute of Belgium"
    }

    fn yorigin(&self) -> YOrigin {
        YOrigin::Upper
    }

    fn default_varname(&self) -> &str {
        "precipitation"
    }

    fn projection(&self, dataset: &dyn LabeledDataset) -> Result<Option<String>> {
        match dataset.global_attribute(PROJECTION_ATTRIBUTE)? {
            None => Ok(None),
            Some(AttributeValue::Text(projection)) => Ok(Some(projection)),
            Some(other) => Err(ImportError::dataset(
                dataset.source(),
                format!(
                    "Global attribute '{}' must be text, found {:?}",
                    PROJECTION_ATTRIBUTE, other
                ),
            )),
        }
    }
}

/// Import an RMI NWP rainfall file
pub fn import_rmi_nwp(path: &Path, options: &ImportOptions) -> Result<ImportResult> {
    import(&RmiImporter, path, options)
}
