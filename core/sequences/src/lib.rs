//! Carves fixed-offset sequence files out of a ROM image.

mod error;

pub use error::{Result, SequenceError};

use std::path::Path;

/// For every `(filename, size, offset)` triple, copies `rom[offset..offset+size]`
/// into `filename` (relative to `out_root`), creating parent directories as
/// needed. Entries are written in the order given, matching the
/// iteration order of the embedded sequence-address table.
pub fn extract_all(rom: &[u8], entries: &[(&str, u32, u32)], out_root: &Path) -> Result<()> {
    for &(filename, size, offset) in entries {
        let offset = offset as usize;
        let end = offset + size as usize;
        if end > rom.len() {
            return Err(SequenceError::OutOfBounds {
                offset,
                end,
                rom_len: rom.len(),
            });
        }

        let path = out_root.join(filename);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| SequenceError::Write {
                path: path.display().to_string(),
                source,
            })?;
        }
        std::fs::write(&path, &rom[offset..end]).map_err(|source| SequenceError::Write {
            path: path.display().to_string(),
            source,
        })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carves_and_writes_exact_range() {
        let rom = (0u8..=255).collect::<Vec<u8>>();
        let dir = tempfile::tempdir().unwrap();
        extract_all(&rom, &[("seq/a.m64", 16, 32)], dir.path()).unwrap();
        let written = std::fs::read(dir.path().join("seq/a.m64")).unwrap();
        assert_eq!(written, rom[32..48]);
    }

    #[test]
    fn rejects_out_of_bounds_range() {
        let rom = vec![0u8; 10];
        let dir = tempfile::tempdir().unwrap();
        let err = extract_all(&rom, &[("seq/a.m64", 16, 0)], dir.path());
        assert!(err.is_err());
    }
}
