use crate::infrastructure::error::InfrastructureError;
use std::io::Write;
use std::path::Path;

/// Writes `content` to `path` through a temporary file in the same directory,
/// so readers only ever see the old file or the complete new one.
/// Missing parent directories are created.
pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(
    path: P,
    content: C,
) -> Result<(), InfrastructureError> {
    let path = path.as_ref();
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut temp_file = tempfile::NamedTempFile::new_in(parent)?;
    temp_file.write_all(content.as_ref())?;
    temp_file.flush()?;
    temp_file
        .persist(path)
        .map_err(|e| InfrastructureError::Io(e.error))?;

    Ok(())
}

/// Reads a text file, mapping a missing file to `ConfigNotFound`.
pub fn read_config_file(path: &Path) -> Result<String, InfrastructureError> {
    if !path.exists() {
        return Err(InfrastructureError::ConfigNotFound(
            path.display().to_string(),
        ));
    }
    Ok(std::fs::read_to_string(path)?)
}
