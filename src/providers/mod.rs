//! Provider-specific importers.
//!
//! Each provider implements [`Importer`] and is registered here under the
//! name the host looks it up by.

pub mod bom;
pub mod knmi;
pub mod rmi;

use std::path::Path;

use crate::error::{ImportError, Result};
use crate::importer::{import, ImportOptions, ImportResult, Importer};

pub use bom::{import_bom_nwp, BomImporter};
pub use knmi::{import_knmi_nwp, KnmiImporter};
pub use rmi::{import_rmi_nwp, RmiImporter};

/// Names of all registered importers
pub fn importer_names() -> &'static [&'static str] {
    &[bom::NAME, knmi::NAME, rmi::NAME]
}

/// Registry key for a user-supplied importer name.
///
/// Matching is case-insensitive and the `import_` prefix of the plugin entry
/// points is accepted, so `import_bom_nwp` and `bom_nwp` name the same
/// importer.
pub fn canonical_name(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    match lowered.strip_prefix("import_") {
        Some(stripped) => stripped.to_string(),
        None => lowered,
    }
}

/// Get an importer by name
pub fn get_importer(name: &str) -> Result<Box<dyn Importer>> {
    match canonical_name(name).as_str() {
        bom::NAME => Ok(Box::new(BomImporter)),
        knmi::NAME => Ok(Box::new(KnmiImporter)),
        rmi::NAME => Ok(Box::new(RmiImporter)),
        _ => Err(ImportError::UnknownImporter {
            name: name.to_string(),
        }),
    }
}

/// Import a file with the importer registered under `name`
pub fn import_by_name(name: &str, path: &Path, options: &ImportOptions) -> Result<ImportResult> {
    let importer = get_importer(name)?;
    import(importer.as_ref(), path, options)
}
