use std::collections::HashMap;

use crate::error::{EvalResult, precondition};
use crate::math::points::DenseMatrix;
use crate::model::index_ids;

/// Cells x genes expression values.
#[derive(Debug, Clone)]
pub struct ExpressionMatrix {
    cells: Vec<String>,
    genes: Vec<String>,
    values: DenseMatrix,
    cell_index: HashMap<String, usize>,
}

impl ExpressionMatrix {
    pub fn new(cells: Vec<String>, genes: Vec<String>, values: DenseMatrix) -> EvalResult<Self> {
        if values.n_rows() != cells.len() {
            return Err(precondition(format!(
                "expression rows ({}) do not match cell ids ({})",
                values.n_rows(),
                cells.len()
            )));
        }
        if values.n_cols() != genes.len() {
            return Err(precondition(format!(
                "expression columns ({}) do not match gene ids ({})",
                values.n_cols(),
                genes.len()
            )));
        }
        if values.as_slice().iter().any(|v| !v.is_finite()) {
            return Err(precondition("expression matrix contains non-finite values"));
        }
        let cell_index = index_ids(&cells, "cell")?;
        Ok(Self {
            cells,
            genes,
            values,
            cell_index,
        })
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    pub fn genes(&self) -> &[String] {
        &self.genes
    }

    pub fn values(&self) -> &DenseMatrix {
        &self.values
    }

    pub fn n_cells(&self) -> usize {
        self.cells.len()
    }

    pub fn n_genes(&self) -> usize {
        self.genes.len()
    }

    pub fn row_of(&self, cell: &str) -> Option<usize> {
        self.cell_index.get(cell).copied()
    }

    /// Expression rows for `cells`, in that order.
    pub fn rows_for(&self, cells: &[String]) -> EvalResult<Vec<usize>> {
        cells
            .iter()
            .map(|c| {
                self.row_of(c).ok_or_else(|| {
                    precondition(format!("cell '{}' is missing from the expression matrix", c))
                })
            })
            .collect()
    }
}
