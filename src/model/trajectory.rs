use crate::error::{EvalResult, precondition};
use crate::model::curve::LineageCurve;
use crate::model::{Embedding, FittedCurve, PseudotimeTable};

/// Embedding, pseudotime and fitted curve of one trajectory fit, validated together.
#[derive(Debug, Clone)]
pub struct TrajectoryObject {
    embedding: Embedding,
    pseudotime: PseudotimeTable,
    curve: FittedCurve,
    /// Embedding row of every pseudotime row.
    embedding_rows: Vec<usize>,
    /// Curve index of every pseudotime lineage.
    curve_of_lineage: Vec<usize>,
}

impl TrajectoryObject {
    pub fn new(
        embedding: Embedding,
        pseudotime: PseudotimeTable,
        curve: FittedCurve,
    ) -> EvalResult<Self> {
        let mut embedding_rows = Vec::with_capacity(pseudotime.cells().len());
        for cell in pseudotime.cells() {
            let row = embedding.row_of(cell).ok_or_else(|| {
                precondition(format!(
                    "pseudotime cell '{}' is not present in the embedding",
                    cell
                ))
            })?;
            embedding_rows.push(row);
        }

        let mut curve_of_lineage = Vec::with_capacity(pseudotime.lineages().len());
        for (li, lineage) in pseudotime.lineages().iter().enumerate() {
            let ci = curve
                .lineages()
                .iter()
                .position(|c| &c.lineage == lineage)
                .ok_or_else(|| {
                    precondition(format!("no fitted curve for lineage '{}'", lineage))
                })?;
            let assigned = pseudotime.assigned_rows(li).len();
            if assigned > 0 && curve.lineages()[ci].segments.is_empty() {
                return Err(precondition(format!(
                    "lineage '{}' has {} cells with pseudotime but an empty curve",
                    lineage, assigned
                )));
            }
            curve_of_lineage.push(ci);
        }

        Ok(Self {
            embedding,
            pseudotime,
            curve,
            embedding_rows,
            curve_of_lineage,
        })
    }

    pub fn embedding(&self) -> &Embedding {
        &self.embedding
    }

    pub fn pseudotime(&self) -> &PseudotimeTable {
        &self.pseudotime
    }

    pub fn embedding_row(&self, pseudotime_row: usize) -> usize {
        self.embedding_rows[pseudotime_row]
    }

    pub fn lineage_curve(&self, lineage: usize) -> &LineageCurve {
        &self.curve.lineages()[self.curve_of_lineage[lineage]]
    }
}
