use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const LOG_FILE_NAME: &str = "processed_kmz_log.txt";
const LOG_HEADER: &str = "Processed KMZ Files:";

/// Ordered record of successful conversions, flushed to a text file once per
/// run. Owned exclusively by the pipeline driver.
#[derive(Debug, Default)]
pub struct ProcessingLog {
    entries: Vec<(String, PathBuf)>,
}

impl ProcessingLog {
    pub fn record(&mut self, input_name: &str, output_path: &Path) {
        self.entries
            .push((input_name.to_string(), output_path.to_path_buf()));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Write the log into `dir` and return the file's path.
    pub fn write_to(&self, dir: &Path) -> io::Result<PathBuf> {
        let mut contents = String::new();
        let _ = writeln!(contents, "{LOG_HEADER}");
        for (input_name, output_path) in &self.entries {
            let _ = writeln!(contents, "{input_name} -> {}", output_path.display());
        }

        let path = dir.join(LOG_FILE_NAME);
        fs::write(&path, contents)?;
        Ok(path)
    }
}
