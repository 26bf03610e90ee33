use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::io::tables::{is_missing, read_tsv};
use crate::scores::MetricsRow;

const COLUMNS: [&str; 5] = ["embedding", "DCcheck", "SimiRetain", "GOF", "USHAPE"];

/// Reads a precomputed metrics table. Columns are located by header name;
/// extra columns are ignored.
pub fn read_metrics_tsv(path: &Path) -> Result<Vec<MetricsRow>> {
    let table = read_tsv(path)?;
    let mut idx = [0usize; 5];
    for (slot, name) in idx.iter_mut().zip(COLUMNS) {
        *slot = table
            .header
            .iter()
            .position(|h| h == name)
            .with_context(|| format!("{}: missing column '{}'", path.display(), name))?;
    }
    let width = idx.iter().copied().max().unwrap_or(0) + 1;

    let mut rows = Vec::with_capacity(table.rows.len());
    for (line_no, fields) in &table.rows {
        if fields.len() < width {
            bail!(
                "{}:{}: expected at least {} fields, got {}",
                path.display(),
                line_no,
                width,
                fields.len()
            );
        }
        let embedding = fields[idx[0]].clone();
        if embedding.is_empty() {
            bail!("{}:{}: empty embedding name", path.display(), line_no);
        }
        if rows.iter().any(|r: &MetricsRow| r.embedding == embedding) {
            bail!(
                "{}:{}: duplicate embedding '{}'",
                path.display(),
                line_no,
                embedding
            );
        }
        let rate = |col: usize| -> Result<Option<f64>> {
            let field = &fields[idx[col]];
            if is_missing(field) {
                return Ok(None);
            }
            let v = field.parse::<f64>().with_context(|| {
                format!(
                    "{}:{}: invalid {} value '{}'",
                    path.display(),
                    line_no,
                    COLUMNS[col],
                    field
                )
            })?;
            Ok(Some(v))
        };
        rows.push(MetricsRow {
            dc_check: parse_flag(&fields[idx[1]])
                .with_context(|| format!("{}:{}: invalid DCcheck", path.display(), line_no))?,
            simi_retain: rate(2)?,
            gof: rate(3)?,
            ushape: rate(4)?,
            embedding,
        });
    }
    Ok(rows)
}

fn parse_flag(field: &str) -> Result<Option<bool>> {
    match field {
        "TRUE" | "True" | "true" | "1" => Ok(Some(true)),
        "FALSE" | "False" | "false" | "0" => Ok(Some(false)),
        f if is_missing(f) => Ok(None),
        other => bail!("expected TRUE, FALSE or NA, got '{}'", other),
    }
}
