use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

pub const EMBEDDINGS_DIR: &str = "embeddings";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddingFiles {
    pub label: String,
    pub embedding: PathBuf,
    pub pseudotime: Option<PathBuf>,
    pub curves: Option<PathBuf>,
}

/// First existing `<name>` or `<name>.gz` in `dir`.
pub fn find_maybe_gz(dir: &Path, names: &[&str]) -> Option<PathBuf> {
    for name in names {
        for candidate in [dir.join(name), dir.join(format!("{}.gz", name))] {
            if candidate.is_file() {
                return Some(candidate);
            }
        }
    }
    None
}

pub fn resolve_mtx_input_files(
    input_dir: &Path,
) -> (Option<PathBuf>, Option<PathBuf>, Option<PathBuf>) {
    (
        find_maybe_gz(input_dir, &["matrix.mtx"]),
        find_maybe_gz(input_dir, &["features.tsv", "genes.tsv"]),
        find_maybe_gz(input_dir, &["barcodes.tsv"]),
    )
}

/// One entry per `embeddings/<label>/` directory, sorted by label.
pub fn discover_embeddings(input_dir: &Path) -> Result<Vec<EmbeddingFiles>> {
    let root = input_dir.join(EMBEDDINGS_DIR);
    if !root.is_dir() {
        bail!("missing {} directory", root.display());
    }

    let mut dirs: Vec<PathBuf> = fs::read_dir(&root)
        .with_context(|| format!("failed to list {}", root.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_dir())
        .collect();
    dirs.sort();

    let mut out = Vec::with_capacity(dirs.len());
    for dir in dirs {
        let label = dir
            .file_name()
            .and_then(|s| s.to_str())
            .context("embedding directory name is not valid UTF-8")?
            .to_string();
        let embedding = find_maybe_gz(&dir, &["embedding.tsv"])
            .with_context(|| format!("embedding '{}' has no embedding.tsv", label))?;
        let pseudotime = find_maybe_gz(&dir, &["pseudotime.tsv"]);
        let curves = find_maybe_gz(&dir, &["curves.tsv"]);
        if pseudotime.is_some() != curves.is_some() {
            bail!(
                "embedding '{}' must provide both pseudotime.tsv and curves.tsv, or neither",
                label
            );
        }
        out.push(EmbeddingFiles {
            label,
            embedding,
            pseudotime,
            curves,
        });
    }

    if out.is_empty() {
        bail!("no embeddings found under {}", root.display());
    }
    Ok(out)
}
