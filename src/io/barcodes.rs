use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Result, bail};

use crate::io::open_maybe_gz;

/// Cell ids from a 10x barcodes file (first column of each non-empty line).
pub fn read_barcodes(path: &Path) -> Result<Vec<String>> {
    let reader = BufReader::new(open_maybe_gz(path)?);

    let mut barcodes = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let id = trimmed.split('\t').next().unwrap_or(trimmed);
        barcodes.push(id.to_string());
    }

    if barcodes.is_empty() {
        bail!("barcodes.tsv is empty");
    }

    Ok(barcodes)
}
