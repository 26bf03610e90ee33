use std::path::PathBuf;

use crate::config::EvalConfig;
use crate::model::ExpressionMatrix;
use crate::schema::v1::PseudotimeQcV1;
use crate::scores::{EmbeddingEvaluation, EmbeddingInput, HighDimSummary, RankedScore, ScoreResult};

#[derive(Debug, Clone)]
pub struct InputMeta {
    pub genes: Option<u64>,
    pub cells: Option<u64>,
    pub nnz: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct OutputPaths {
    pub out_dir: PathBuf,
    pub json_path: PathBuf,
    pub tsv_path: PathBuf,
    pub cells_path: PathBuf,
}

#[derive(Debug)]
pub struct Ctx {
    pub input: PathBuf,
    pub config: EvalConfig,
    pub run_homogeneity: bool,
    pub write_json: bool,
    pub write_tsv: bool,
    pub threads: usize,
    pub mtx_matrix_path: Option<PathBuf>,
    pub mtx_features_path: Option<PathBuf>,
    pub mtx_barcodes_path: Option<PathBuf>,
    pub expression: Option<ExpressionMatrix>,
    pub embeddings: Vec<EmbeddingInput>,
    pub highdim: Option<HighDimSummary>,
    pub advisories: Vec<String>,
    pub evaluations: Vec<EmbeddingEvaluation>,
    pub scores: Vec<ScoreResult>,
    pub ranking: Vec<RankedScore>,
    pub warnings: Vec<String>,
    pub input_meta: InputMeta,
    pub output: OutputPaths,
    pub report: PseudotimeQcV1,
}

impl Ctx {
    pub fn new(
        input: PathBuf,
        out_dir: PathBuf,
        config: EvalConfig,
        write_json: bool,
        write_tsv: bool,
        tool_version: &str,
    ) -> Self {
        let json_path = out_dir.join("pseudotimeqc.json");
        let tsv_path = out_dir.join("pseudotimeqc.tsv");
        let cells_path = out_dir.join("cells.tsv");
        let report = PseudotimeQcV1::empty(tool_version, config.clone());
        Self {
            input,
            config,
            run_homogeneity: true,
            write_json,
            write_tsv,
            threads: 0,
            mtx_matrix_path: None,
            mtx_features_path: None,
            mtx_barcodes_path: None,
            expression: None,
            embeddings: Vec::new(),
            highdim: None,
            advisories: Vec::new(),
            evaluations: Vec::new(),
            scores: Vec::new(),
            ranking: Vec::new(),
            warnings: Vec::new(),
            input_meta: InputMeta {
                genes: None,
                cells: None,
                nnz: None,
            },
            output: OutputPaths {
                out_dir,
                json_path,
                tsv_path,
                cells_path,
            },
            report,
        }
    }

    pub fn expression(&self) -> anyhow::Result<&ExpressionMatrix> {
        self.expression
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("expression matrix not loaded"))
    }

    pub fn highdim(&self) -> anyhow::Result<&HighDimSummary> {
        self.highdim
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("high-dimensional summary missing"))
    }
}
