use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use polars::prelude::*;
use tempfile::Builder;
use thiserror::Error;
use tracing::info;

use crate::error::{PipelineError, Result};

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV serialization failed: {0}")]
    Polars(#[from] PolarsError),
    #[error("could not move temporary file into place: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// Writes the enriched table as CSV, replacing `destination` atomically.
///
/// The frame is serialized into a temporary file next to the destination and renamed over it
/// only once fully flushed, so a failed run never leaves a truncated file behind.
pub fn write_enriched(df: &mut DataFrame, destination: &Path) -> Result<()> {
    write_atomically(df, destination).map_err(|source| PipelineError::Write {
        path: destination.to_path_buf(),
        source,
    })?;

    info!(
        path = %destination.display(),
        rows = df.height(),
        columns = df.width(),
        "enriched table written"
    );
    Ok(())
}

fn write_atomically(df: &mut DataFrame, destination: &Path) -> std::result::Result<(), WriteError> {
    let directory = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staging = staging_builder().tempfile_in(directory)?;
    if let Ok(existing) = fs::metadata(destination) {
        staging.as_file().set_permissions(existing.permissions())?;
    }
    {
        let mut writer = BufWriter::new(staging.as_file_mut());
        CsvWriter::new(&mut writer)
            .include_header(true)
            .finish(df)?;
        writer.flush()?;
    }
    staging.as_file().sync_all()?;
    staging.persist(destination)?;

    Ok(())
}

/// New outputs get the mode a plain file create would give them (0666 minus the umask) rather
/// than the owner-only mode of a temporary file.
#[cfg(unix)]
fn staging_builder() -> Builder<'static, 'static> {
    use std::os::unix::fs::PermissionsExt;

    let mut builder = Builder::new();
    builder.permissions(fs::Permissions::from_mode(0o666));
    builder
}

#[cfg(not(unix))]
fn staging_builder() -> Builder<'static, 'static> {
    Builder::new()
}
