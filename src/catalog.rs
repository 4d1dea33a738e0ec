//! Formula and candidate documents on disk. Format follows the extension:
//! `.toml` or `.json`.

use crate::error::{RekrutError, Result};
use crate::formula::Formula;
use crate::scores::CandidateScores;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Toml,
    Json,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path
            .extension()
            .and_then(|extension| extension.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("toml") => Some(DocumentFormat::Toml),
            Some("json") => Some(DocumentFormat::Json),
            _ => None,
        }
    }
}

pub fn load_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(RekrutError::PathNotFound(path.display().to_string()));
    }
    let format = DocumentFormat::from_path(path)
        .ok_or_else(|| RekrutError::UnsupportedFormat(path.display().to_string()))?;
    let content = std::fs::read_to_string(path)?;
    debug!(path = %path.display(), ?format, "loading document");
    let document = match format {
        DocumentFormat::Toml => toml::from_str(&content)?,
        DocumentFormat::Json => serde_json::from_str(&content)?,
    };
    Ok(document)
}

pub fn load_formula(path: &Path) -> Result<Formula> {
    let formula: Formula = load_document(path)?;
    info!(
        path = %path.display(),
        program = %formula.program_id,
        stages = formula.stages.len(),
        "formula loaded"
    );
    Ok(formula)
}

pub fn load_scores(path: &Path) -> Result<CandidateScores> {
    load_document(path)
}

/// Formula documents under `root`, sorted by path.
pub fn list_formula_files(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.exists() {
        return Err(RekrutError::PathNotFound(root.display().to_string()));
    }
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.path().to_path_buf())
        .filter(|path| DocumentFormat::from_path(path).is_some())
        .collect();
    files.sort();
    Ok(files)
}
