use std::collections::HashMap;

use crate::error::{EvalResult, precondition};
use crate::model::index_ids;

/// Per-cell pseudotime, one column per lineage; `None` where a cell is not on the lineage.
#[derive(Debug, Clone)]
pub struct PseudotimeTable {
    cells: Vec<String>,
    lineages: Vec<String>,
    values: Vec<Vec<Option<f64>>>,
    cell_index: HashMap<String, usize>,
}

impl PseudotimeTable {
    pub fn new(
        cells: Vec<String>,
        lineages: Vec<String>,
        values: Vec<Vec<Option<f64>>>,
    ) -> EvalResult<Self> {
        if lineages.is_empty() {
            return Err(precondition("pseudotime table has no lineage columns"));
        }
        if values.len() != cells.len() {
            return Err(precondition(format!(
                "pseudotime table has {} cell ids but {} rows",
                cells.len(),
                values.len()
            )));
        }
        for (cell, row) in cells.iter().zip(&values) {
            if row.len() != lineages.len() {
                return Err(precondition(format!(
                    "pseudotime row for '{}' has {} values, expected {}",
                    cell,
                    row.len(),
                    lineages.len()
                )));
            }
        }
        index_ids(&lineages, "lineage")?;
        let values = values
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|v| v.filter(|x| x.is_finite()))
                    .collect()
            })
            .collect();
        let cell_index = index_ids(&cells, "pseudotime cell")?;
        Ok(Self {
            cells,
            lineages,
            values,
            cell_index,
        })
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    pub fn lineages(&self) -> &[String] {
        &self.lineages
    }

    pub fn value(&self, row: usize, lineage: usize) -> Option<f64> {
        self.values[row][lineage]
    }

    pub fn row_of(&self, cell: &str) -> Option<usize> {
        self.cell_index.get(cell).copied()
    }

    /// Rows with a defined pseudotime on `lineage`.
    pub fn assigned_rows(&self, lineage: usize) -> Vec<usize> {
        (0..self.cells.len())
            .filter(|&r| self.values[r][lineage].is_some())
            .collect()
    }

    pub fn is_assigned_anywhere(&self, row: usize) -> bool {
        self.values[row].iter().any(|v| v.is_some())
    }
}
