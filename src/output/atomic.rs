//! Temp-file-then-rename writes.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use super::OutputError;

/// Write `path` atomically: `render` fills a temp file in the same directory,
/// which is then renamed over `path`. Readers never observe a partial file.
pub fn write_atomic<F>(path: &Path, render: F) -> Result<(), OutputError>
where
    F: FnOnce(&mut File) -> Result<(), OutputError>,
{
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    let mut tmp = NamedTempFile::new_in(dir)?;
    render(tmp.as_file_mut())?;
    tmp.as_file_mut().flush()?;
    tmp.persist(path).map_err(|e| OutputError::Io(e.error))?;
    Ok(())
}
