use crate::types::ArchiveError;
use std::fs;
use std::io;
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::CompressionMethod;

/// Write a new compressed zip at `output_path` containing exactly the given
/// entries, each stored under its paired internal name (so the cleaned KML
/// can be renamed to `doc.kml` on the way in). Overwrites any existing file.
///
/// Entry timestamps are pinned to the zip epoch so the same inputs always
/// produce byte-identical output.
pub fn create_archive(
    output_path: &Path,
    entries: &[(&Path, &str)],
) -> Result<(), ArchiveError> {
    let file = fs::File::create(output_path).map_err(|e| ArchiveError::Create {
        path: output_path.to_path_buf(),
        source: e,
    })?;
    let mut writer = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(zip::DateTime::default());

    for (source_path, internal_name) in entries {
        writer
            .start_file(*internal_name, options)
            .map_err(|e| ArchiveError::Write {
                name: internal_name.to_string(),
                source: e,
            })?;
        let mut source = fs::File::open(source_path).map_err(|e| ArchiveError::Open {
            path: source_path.to_path_buf(),
            source: e,
        })?;
        io::copy(&mut source, &mut writer)?;
    }

    writer.finish().map_err(|e| ArchiveError::Write {
        name: output_path.display().to_string(),
        source: e,
    })?;
    Ok(())
}

#[cfg(test)]
#[path = "tests/create_tests.rs"]
mod tests;
