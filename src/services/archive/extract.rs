use crate::types::ArchiveError;
use std::fs;
use std::io;
use std::path::Path;

/// Unpack every entry of a zip-format file (KMZ is zip under another suffix)
/// into `dest_dir`, creating it if needed. Returns the number of files
/// written. Entries with unsafe paths (traversal, absolute) are skipped.
pub fn extract_archive(archive_path: &Path, dest_dir: &Path) -> Result<usize, ArchiveError> {
    fs::create_dir_all(dest_dir)?;

    let file = fs::File::open(archive_path).map_err(|e| ArchiveError::Open {
        path: archive_path.to_path_buf(),
        source: e,
    })?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| ArchiveError::Corrupt {
        path: archive_path.to_path_buf(),
        source: e,
    })?;

    let mut count: usize = 0;
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(|e| ArchiveError::Corrupt {
            path: archive_path.to_path_buf(),
            source: e,
        })?;

        let entry_path = match entry.enclosed_name() {
            Some(p) => p.to_path_buf(),
            None => {
                log::warn!("Skipping unsafe entry path: {}", entry.name());
                continue;
            }
        };

        let output_path = dest_dir.join(&entry_path);

        if entry.is_dir() {
            fs::create_dir_all(&output_path)?;
        } else {
            if let Some(parent) = output_path.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut outfile = fs::File::create(&output_path)?;
            io::copy(&mut entry, &mut outfile)?;
            count += 1;
        }
    }
    Ok(count)
}

#[cfg(test)]
#[path = "tests/extract_tests.rs"]
mod tests;
