use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Result, bail};

use crate::io::open_maybe_gz;

/// Gene ids from a 10x features/genes file; the first column is the id.
pub fn read_features(path: &Path) -> Result<Vec<String>> {
    let reader = BufReader::new(open_maybe_gz(path)?);

    let mut genes = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim_end();
        if trimmed.is_empty() {
            continue;
        }
        let id = trimmed.split('\t').next().unwrap_or(trimmed);
        genes.push(id.to_string());
    }

    if genes.is_empty() {
        bail!("features.tsv is empty");
    }

    Ok(genes)
}
