use anyhow::{Context, Result, bail};
use tracing::info;

use crate::ctx::Ctx;
use crate::input;
use crate::io::{barcodes, features, mtx, tables};
use crate::model::ExpressionMatrix;
use crate::pipeline::Stage;
use crate::scores::EmbeddingInput;

pub struct Stage1Input;

impl Stage1Input {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage1Input {
    fn name(&self) -> &'static str {
        "stage1_input"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let (matrix_path, features_path, barcodes_path) =
            input::resolve_mtx_input_files(&ctx.input);
        let matrix_path = matrix_path.context("missing matrix.mtx or matrix.mtx.gz")?;
        let features_path = features_path.context("missing features.tsv/genes.tsv (or .gz)")?;
        let barcodes_path = barcodes_path.context("missing barcodes.tsv or barcodes.tsv.gz")?;

        info!(
            matrix = %matrix_path.display(),
            features = %features_path.display(),
            barcodes = %barcodes_path.display(),
            "input_files"
        );

        let genes = features::read_features(&features_path)?;
        let cells = barcodes::read_barcodes(&barcodes_path)?;
        let (summary, values) = mtx::read_mtx_dense_transposed(&matrix_path)?;

        if summary.nrows != genes.len() {
            bail!(
                "MTX rows ({}) do not match features.tsv lines ({})",
                summary.nrows,
                genes.len()
            );
        }
        if summary.ncols != cells.len() {
            bail!(
                "MTX cols ({}) do not match barcodes.tsv lines ({})",
                summary.ncols,
                cells.len()
            );
        }

        let warnings = duplicate_gene_warnings(&genes);
        let expression = ExpressionMatrix::new(cells, genes, values)
            .context("invalid expression matrix")?;

        ctx.mtx_matrix_path = Some(matrix_path);
        ctx.mtx_features_path = Some(features_path);
        ctx.mtx_barcodes_path = Some(barcodes_path);
        ctx.input_meta.genes = Some(summary.nrows as u64);
        ctx.input_meta.cells = Some(summary.ncols as u64);
        ctx.input_meta.nnz = Some(summary.nnz as u64);
        ctx.warnings.extend(warnings);
        ctx.expression = Some(expression);

        let mut embeddings = Vec::new();
        for files in input::discover_embeddings(&ctx.input)? {
            let embedding = tables::read_embedding(&files.embedding)?;
            let mut entry = EmbeddingInput::new(files.label.clone(), embedding);
            if let (Some(pt), Some(curves)) = (&files.pseudotime, &files.curves) {
                let pseudotime = tables::read_pseudotime(pt)?;
                let curve = tables::read_curves(curves)?;
                entry = entry
                    .with_trajectory(pseudotime, curve)
                    .with_context(|| format!("invalid trajectory for '{}'", files.label))?;
            } else {
                ctx.warnings.push(format!(
                    "embedding '{}' has no trajectory fit; USHAPE is unavailable",
                    files.label
                ));
            }
            info!(
                embedding = %files.label,
                cells = entry.embedding.len(),
                trajectory = entry.trajectory.is_some(),
                "embedding_loaded"
            );
            embeddings.push(entry);
        }
        ctx.embeddings = embeddings;

        Ok(())
    }
}

fn duplicate_gene_warnings(genes: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashMap::new();
    let mut warnings = Vec::new();
    for (i, gene) in genes.iter().enumerate() {
        if let Some(first) = seen.get(gene) {
            warnings.push(format!(
                "duplicate gene id '{}' at row {} (first at row {})",
                gene,
                i + 1,
                first + 1
            ));
        } else {
            seen.insert(gene, i);
        }
    }
    warnings
}
