//! Build output for the search index.
//!
//! Second half of a build: takes the compiled [`SearchIndex`] and writes it
//! where the ranking engine's loader expects it, then copies the engine's
//! browser runtime through unchanged.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── search-index.json          # [index] file
//! └── assets/js/
//!     └── lunr.min.js            # [search] runtime_library, copied as-is
//! ```

use crate::config::SiteConfig;
use crate::types::SearchIndex;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Search runtime library not found: {}", .0.display())]
    MissingRuntimeLibrary(PathBuf),
}

/// Files written by [`emit`], relative to the output directory.
#[derive(Debug, Clone, PartialEq)]
pub struct EmitReport {
    pub index_path: PathBuf,
    pub records: usize,
    pub runtime_library: Option<PathBuf>,
}

/// Write the index and the passthrough runtime into `output_dir`.
pub fn emit(
    index: &SearchIndex,
    config: &SiteConfig,
    source_root: &Path,
    output_dir: &Path,
) -> Result<EmitReport, GenerateError> {
    fs::create_dir_all(output_dir)?;

    let index_rel = PathBuf::from(&config.index.file);
    let index_path = output_dir.join(&index_rel);
    if let Some(parent) = index_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&index_path, serde_json::to_string(index)?)?;
    info!(path = %index_path.display(), records = index.records.len(), "wrote search index");

    let runtime_library = match &config.search.runtime_library {
        Some(lib) => Some(copy_runtime(
            &source_root.join(lib),
            output_dir,
            Path::new(&config.search.output_dir),
        )?),
        None => None,
    };

    Ok(EmitReport {
        index_path: index_rel,
        records: index.records.len(),
        runtime_library,
    })
}

fn copy_runtime(src: &Path, output_dir: &Path, dest_dir: &Path) -> Result<PathBuf, GenerateError> {
    if !src.is_file() {
        return Err(GenerateError::MissingRuntimeLibrary(src.to_path_buf()));
    }
    let file_name = src
        .file_name()
        .ok_or_else(|| GenerateError::MissingRuntimeLibrary(src.to_path_buf()))?;
    let rel = dest_dir.join(file_name);
    let dest = output_dir.join(&rel);
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(src, &dest)?;
    info!(from = %src.display(), to = %dest.display(), "copied search runtime");
    Ok(rel)
}
