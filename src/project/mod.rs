//! Directory scanning and the extraction driver.
//!
//! The driver owns the run shape the engine relies on: walk every file
//! once in a deterministic order (pass 1), then run deferred resolution
//! exactly once (pass 2), then hand the finished package over. Failure is
//! tolerated at file granularity only — a file that does not read or parse
//! is logged and skipped, and the run continues.

use std::path::{Path, PathBuf};

use crate::ecore::Package;
use crate::error::ModelError;
use crate::interchange::export_model;
use crate::mapping::{resolve_deferred, walk_unit, MetamodelStore};
use crate::parser::{parse_java, CompilationUnit};

/// Recursively collect every `.java` file under `root`, sorted for a
/// deterministic traversal order.
pub fn scan_java_files(root: &Path) -> Result<Vec<PathBuf>, ModelError> {
    let mut files = Vec::new();
    collect_java_files(root, &mut files)?;
    files.sort();
    Ok(files)
}

fn collect_java_files(dir: &Path, results: &mut Vec<PathBuf>) -> Result<(), ModelError> {
    for entry in std::fs::read_dir(dir)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => {
                tracing::warn!(dir = %dir.display(), %error, "skipping unreadable entry");
                continue;
            }
        };
        let path = entry.path();
        if path.is_dir() {
            if let Err(error) = collect_java_files(&path, results) {
                tracing::warn!(dir = %path.display(), %error, "skipping unreadable directory");
            }
        } else if path.extension().and_then(|e| e.to_str()) == Some("java") {
            results.push(path);
        }
    }
    Ok(())
}

/// Read and parse a single source file.
pub fn load_and_parse(path: &Path) -> Result<CompilationUnit, ModelError> {
    let text = std::fs::read_to_string(path)?;
    parse_java(&text).map_err(|e| ModelError::parse(path, e))
}

/// Extract the metamodel from every `.java` file under `root`.
///
/// Pass 2 runs strictly after the last file of pass 1; running it earlier
/// would drop legitimate forward references.
pub fn generate_metamodel(root: &Path) -> Result<Package, ModelError> {
    let files = scan_java_files(root)?;
    let mut store = MetamodelStore::new();

    for path in &files {
        match load_and_parse(path) {
            Ok(unit) => {
                tracing::debug!(file = %path.display(), "walked source file");
                walk_unit(&mut store, &unit);
            }
            Err(error) => {
                tracing::warn!(file = %path.display(), %error, "skipping source file");
            }
        }
    }

    resolve_deferred(&mut store);
    Ok(store.into_package())
}

/// Full run: extract the metamodel and export it as Ecore XMI.
pub fn generate(root: &Path, out: &Path) -> Result<Package, ModelError> {
    let package = generate_metamodel(root)?;
    export_model(&package, out)?;
    Ok(package)
}
