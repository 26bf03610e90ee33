use serde::{Deserialize, Serialize};

use crate::config::EvalConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputMeta {
    pub genes: Option<u64>,
    pub cells: Option<u64>,
    pub nnz: Option<u64>,
    pub embeddings: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterSeparation {
    pub a: usize,
    pub b: usize,
    pub min_distance: f64,
    pub within_scale: f64,
    /// `None` when the ratio is unbounded.
    pub ratio: Option<f64>,
    pub separated: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connectivity {
    pub label: String,
    pub connected: bool,
    pub n_components: usize,
    pub n_major: usize,
    pub n_groups: usize,
    pub separations: Vec<ClusterSeparation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Homogeneity {
    pub statistic: f64,
    pub p_value: f64,
    pub decision: String,
    pub num_permutations: usize,
    pub seed: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighDim {
    pub connectivity: Connectivity,
    pub homogeneity: Option<Homogeneity>,
    pub advisories: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preservation {
    pub good_rate: f64,
    pub preserved_cells: usize,
    pub cells: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Density {
    pub occupied_rate: f64,
    pub occupied_bins: usize,
    pub candidate_bins: usize,
    pub grid_cols: usize,
    pub grid_rows: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineageAmbiguity {
    pub lineage: String,
    pub curve_length: f64,
    pub cells: usize,
    pub folded: usize,
    pub outliers: usize,
    pub ambiguous: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ambiguity {
    pub ambpct: f64,
    pub flagged_memberships: usize,
    pub total_memberships: usize,
    pub excluded_cells: usize,
    pub lineages: Vec<LineageAmbiguity>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metrics {
    #[serde(rename = "DCcheck")]
    pub dc_check: Option<bool>,
    #[serde(rename = "SimiRetain")]
    pub simi_retain: Option<f64>,
    #[serde(rename = "GOF")]
    pub gof: Option<f64>,
    #[serde(rename = "USHAPE")]
    pub ushape: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageError {
    pub stage: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingReport {
    pub label: String,
    pub metrics: Metrics,
    pub connectivity: Option<Connectivity>,
    pub preservation: Option<Preservation>,
    pub density: Option<Density>,
    pub ambiguity: Option<Ambiguity>,
    pub errors: Vec<StageError>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contributions {
    #[serde(rename = "DCcheck")]
    pub dc_check: f64,
    #[serde(rename = "SimiRetain")]
    pub simi_retain: f64,
    #[serde(rename = "GOF")]
    pub gof: f64,
    #[serde(rename = "USHAPE")]
    pub ushape: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Score {
    pub embedding: String,
    pub score: Option<f64>,
    pub recommendation: String,
    pub rank: Option<usize>,
    pub contributions: Option<Contributions>,
    pub missing: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PseudotimeQcV1 {
    pub tool: String,
    pub version: String,
    pub schema_version: String,
    pub input_meta: InputMeta,
    pub config: EvalConfig,
    pub highdim: Option<HighDim>,
    pub embeddings: Vec<EmbeddingReport>,
    pub scores: Vec<Score>,
    pub warnings: Vec<String>,
}

impl PseudotimeQcV1 {
    pub fn empty(tool_version: &str, config: EvalConfig) -> Self {
        Self {
            tool: "kira-pseudotimeqc".to_string(),
            version: tool_version.to_string(),
            schema_version: "v1".to_string(),
            input_meta: InputMeta {
                genes: None,
                cells: None,
                nnz: None,
                embeddings: Vec::new(),
            },
            config,
            highdim: None,
            embeddings: Vec::new(),
            scores: Vec::new(),
            warnings: Vec::new(),
        }
    }
}
