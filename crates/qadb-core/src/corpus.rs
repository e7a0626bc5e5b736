use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::types::CorpusEntry;

/// Reads question/answer pairs from JSON.
///
/// A file holds a JSON array of `{"question": ..., "answer": ...}` objects.
/// A directory is walked recursively and every `*.json` file is loaded in
/// sorted path order, so the resulting positions are reproducible.
#[derive(Debug, Default)]
pub struct CorpusLoader;

impl CorpusLoader {
    pub fn new() -> Self { Self }

    pub fn load(&self, path: &Path) -> Result<Vec<CorpusEntry>> {
        if path.is_dir() {
            self.load_directory(path)
        } else if path.is_file() {
            self.load_file(path)
        } else {
            Err(Error::NotFound(format!("corpus path {}", path.display())))
        }
    }

    pub fn load_file(&self, path: &Path) -> Result<Vec<CorpusEntry>> {
        let bytes = fs::read(path).map_err(|source| Error::CorpusIo { path: path.to_path_buf(), source })?;
        let entries: Vec<CorpusEntry> = serde_json::from_slice(&bytes)
            .map_err(|source| Error::CorpusFormat { path: path.to_path_buf(), source })?;
        debug!(path = %path.display(), entries = entries.len(), "loaded corpus file");
        Ok(entries)
    }

    pub fn load_directory(&self, dir: &Path) -> Result<Vec<CorpusEntry>> {
        let files = self.list_json_files(dir)?;
        let mut all_entries = Vec::new();
        for file_path in &files {
            all_entries.extend(self.load_file(file_path)?);
        }
        info!(dir = %dir.display(), files = files.len(), entries = all_entries.len(), "loaded corpus directory");
        Ok(all_entries)
    }

    fn list_json_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let mut json_files = Vec::new();
        // Symlinked files count; broken links and unreadable entries are errors.
        for entry in walkdir::WalkDir::new(root).follow_links(true) {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(root).to_path_buf();
                let source = e.into_io_error().unwrap_or_else(|| io::Error::other("symlink loop in corpus directory"));
                Error::CorpusIo { path, source }
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) == Some("json") {
                json_files.push(path.to_path_buf());
            }
        }
        json_files.sort();
        Ok(json_files)
    }
}
