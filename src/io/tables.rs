use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::io::open_maybe_gz;
use crate::math::geometry::Point2;
use crate::model::{Embedding, FittedCurve, PseudotimeTable};

pub struct TsvTable {
    pub header: Vec<String>,
    /// (1-based line number, fields)
    pub rows: Vec<(usize, Vec<String>)>,
}

pub fn read_tsv(path: &Path) -> Result<TsvTable> {
    let reader = BufReader::new(open_maybe_gz(path)?);
    let mut header: Option<Vec<String>> = None;
    let mut rows = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("failed to read {}", path.display()))?;
        let trimmed = line.trim_end_matches(['\r', '\n']);
        if trimmed.trim().is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let fields: Vec<String> = trimmed.split('\t').map(|f| f.trim().to_string()).collect();
        if header.is_none() {
            header = Some(fields);
            continue;
        }
        rows.push((i + 1, fields));
    }
    let header = header.with_context(|| format!("{} has no header line", path.display()))?;
    Ok(TsvTable { header, rows })
}

/// `cell_id  x  y`
pub fn read_embedding(path: &Path) -> Result<Embedding> {
    let table = read_tsv(path)?;
    if table.header.len() < 3 {
        bail!(
            "{}: embedding header needs cell_id, x, y columns",
            path.display()
        );
    }
    let mut cells = Vec::with_capacity(table.rows.len());
    let mut coords: Vec<Point2> = Vec::with_capacity(table.rows.len());
    for (line_no, fields) in &table.rows {
        if fields.len() < 3 {
            bail!("{}:{}: expected 3 fields", path.display(), line_no);
        }
        let x = parse_f64(&fields[1], path, *line_no)?;
        let y = parse_f64(&fields[2], path, *line_no)?;
        cells.push(fields[0].clone());
        coords.push([x, y]);
    }
    let embedding = Embedding::new(cells, coords)
        .with_context(|| format!("invalid embedding {}", path.display()))?;
    Ok(embedding)
}

/// `cell_id  <lineage>...`; `NA`, `NaN` and empty fields are undefined.
pub fn read_pseudotime(path: &Path) -> Result<PseudotimeTable> {
    let table = read_tsv(path)?;
    if table.header.len() < 2 {
        bail!(
            "{}: pseudotime header needs cell_id and at least one lineage",
            path.display()
        );
    }
    let lineages: Vec<String> = table.header[1..].to_vec();
    let mut cells = Vec::with_capacity(table.rows.len());
    let mut values = Vec::with_capacity(table.rows.len());
    for (line_no, fields) in &table.rows {
        if fields.len() != table.header.len() {
            bail!(
                "{}:{}: expected {} fields, got {}",
                path.display(),
                line_no,
                table.header.len(),
                fields.len()
            );
        }
        let mut row = Vec::with_capacity(lineages.len());
        for field in &fields[1..] {
            row.push(parse_optional(field, path, *line_no)?);
        }
        cells.push(fields[0].clone());
        values.push(row);
    }
    let table = PseudotimeTable::new(cells, lineages, values)
        .with_context(|| format!("invalid pseudotime table {}", path.display()))?;
    Ok(table)
}

/// `lineage  x  y`, rows in path order per lineage.
pub fn read_curves(path: &Path) -> Result<FittedCurve> {
    let table = read_tsv(path)?;
    if table.header.len() < 3 {
        bail!("{}: curves header needs lineage, x, y columns", path.display());
    }
    let mut curves: Vec<(String, Vec<Point2>)> = Vec::new();
    for (line_no, fields) in &table.rows {
        if fields.len() < 3 {
            bail!("{}:{}: expected 3 fields", path.display(), line_no);
        }
        let x = parse_f64(&fields[1], path, *line_no)?;
        let y = parse_f64(&fields[2], path, *line_no)?;
        match curves.iter_mut().find(|(l, _)| l == &fields[0]) {
            Some((_, points)) => points.push([x, y]),
            None => curves.push((fields[0].clone(), vec![[x, y]])),
        }
    }
    let curve = FittedCurve::from_points(curves)
        .with_context(|| format!("invalid curves {}", path.display()))?;
    Ok(curve)
}

pub fn is_missing(field: &str) -> bool {
    matches!(field, "" | "NA" | "na" | "NaN" | "nan" | "null")
}

fn parse_f64(field: &str, path: &Path, line_no: usize) -> Result<f64> {
    field
        .parse::<f64>()
        .with_context(|| format!("{}:{}: invalid number '{}'", path.display(), line_no, field))
}

fn parse_optional(field: &str, path: &Path, line_no: usize) -> Result<Option<f64>> {
    if is_missing(field) {
        return Ok(None);
    }
    parse_f64(field, path, line_no).map(Some)
}
