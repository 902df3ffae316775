//! On-disk persistence of datasets.
//!
//! Each dataset is stored as a JSON array of records in
//! `<dir>/<id>_<kind>.json`. Ids never contain an underscore, so the last
//! underscore in a file stem separates the id from the kind.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use insight_core::{DatasetKind, Record};

use crate::dataset::{validate_dataset_id, Dataset};
use crate::error::Result;

const EXTENSION: &str = "json";

/// Returns the file name a dataset is stored under.
pub fn file_name(id: &str, kind: DatasetKind) -> String {
    format!("{}_{}.{}", id, kind, EXTENSION)
}

/// Writes a dataset to `dir`, creating the directory if needed. The file is
/// written under a temporary name and renamed into place.
pub fn save(dir: &Path, dataset: &Dataset) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(file_name(dataset.id(), dataset.kind()));
    let tmp = path.with_extension("json.tmp");

    let bytes = serde_json::to_vec(dataset.records())?;
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, &path)?;

    log::debug!("saved dataset {} to {}", dataset.id(), path.display());
    Ok(path)
}

/// Deletes the stored file of a dataset. A file that is already gone is not
/// an error.
pub fn remove(dir: &Path, id: &str, kind: DatasetKind) -> Result<()> {
    match fs::remove_file(dir.join(file_name(id, kind))) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err.into()),
    }
}

/// Loads every stored dataset in `dir`, sorted by id then kind. A missing directory
/// holds no datasets. Files whose name or contents cannot be read as a
/// dataset are skipped with a warning.
pub fn load_all(dir: &Path) -> Result<Vec<Dataset>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(err.into()),
    };

    let mut datasets = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
            continue;
        }
        let Some((id, kind)) = parse_file_name(&path) else {
            log::warn!("skipping {}: not a dataset file name", path.display());
            continue;
        };
        match load_records(&path) {
            Ok(records) => datasets.push(Dataset::new(id, kind, records)),
            Err(err) => log::warn!("skipping {}: {}", path.display(), err),
        }
    }

    datasets.sort_by(|a, b| (a.id(), a.kind().as_str()).cmp(&(b.id(), b.kind().as_str())));
    Ok(datasets)
}

/// Splits `<id>_<kind>.json` into its id and kind.
fn parse_file_name(path: &Path) -> Option<(String, DatasetKind)> {
    let stem = path.file_stem()?.to_str()?;
    let (id, kind) = stem.rsplit_once('_')?;
    validate_dataset_id(id).ok()?;
    let kind = kind.parse().ok()?;
    Some((id.to_string(), kind))
}

fn load_records(path: &Path) -> Result<Vec<Record>> {
    let bytes = fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}
