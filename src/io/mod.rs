use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use flate2::read::GzDecoder;

pub mod barcodes;
pub mod features;
pub mod json_writer;
pub mod metrics_table;
pub mod mtx;
pub mod summary;
pub mod tables;
pub mod tsv_writer;

pub(crate) fn open_maybe_gz(path: &Path) -> Result<Box<dyn Read>> {
    let file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    if path.extension().and_then(|s| s.to_str()) == Some("gz") {
        let decoder = GzDecoder::new(file);
        Ok(Box::new(decoder))
    } else {
        Ok(Box::new(file))
    }
}

/// `NA` for a missing value, fixed six decimals otherwise.
pub(crate) fn fmt_opt_f64(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.6}", v),
        None => "NA".to_string(),
    }
}

pub(crate) fn fmt_opt_bool(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => "TRUE",
        Some(false) => "FALSE",
        None => "NA",
    }
}
