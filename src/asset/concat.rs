//! Concatenation of bundle sources into the temp artifact.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::core::BundleError;

/// Append the raw bytes of every source, in order, into `dest`.
///
/// The first unreadable source aborts the bundle; the partial `dest` is
/// removed so no stale temp artifact survives.
pub fn concat_files(sources: &[PathBuf], dest: &Path) -> Result<(), BundleError> {
    let result = write_concat(sources, dest);
    if result.is_err() {
        let _ = fs::remove_file(dest);
    }
    result
}

fn write_concat(sources: &[PathBuf], dest: &Path) -> Result<(), BundleError> {
    let file = File::create(dest).map_err(|e| BundleError::from_io(dest, e))?;
    let mut writer = BufWriter::new(file);

    for source in sources {
        let mut input = File::open(source).map_err(|e| BundleError::from_io(source, e))?;
        io::copy(&mut input, &mut writer).map_err(|e| BundleError::from_io(source, e))?;
    }

    writer.flush().map_err(|e| BundleError::from_io(dest, e))
}
