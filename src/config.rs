use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EvalError, EvalResult, configuration};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutlierMode {
    Neutral,
    Asymmetric,
}

impl OutlierMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Asymmetric => "asymmetric",
        }
    }
}

impl fmt::Display for OutlierMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutlierMode {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "neutral" => Ok(Self::Neutral),
            "asymmetric" => Ok(Self::Asymmetric),
            other => Err(configuration(format!(
                "outlier_mode must be 'neutral' or 'asymmetric', got '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectivityParams {
    pub k_neighbors: usize,
    /// Min inter-cluster distance over within-cluster kNN scale above which two clusters are separated.
    pub separation_ratio: f64,
    pub min_cluster_fraction: f64,
    pub min_cluster_size: usize,
}

impl Default for ConnectivityParams {
    fn default() -> Self {
        Self {
            k_neighbors: 5,
            separation_ratio: 3.0,
            min_cluster_fraction: 0.02,
            min_cluster_size: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HomogeneityParams {
    pub num_permutations: usize,
    pub seed: u64,
    pub alpha: f64,
    pub power_iterations: usize,
    pub tolerance: f64,
}

impl Default for HomogeneityParams {
    fn default() -> Self {
        Self {
            num_permutations: 20,
            seed: 42,
            alpha: 0.05,
            power_iterations: 100,
            tolerance: 1e-9,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreservationParams {
    pub k_neighbors: usize,
    pub min_overlap: f64,
    pub cross_cluster_weight: f64,
}

impl Default for PreservationParams {
    fn default() -> Self {
        Self {
            k_neighbors: 10,
            min_overlap: 0.5,
            cross_cluster_weight: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DensityParams {
    /// Grid cell side length, in embedding units.
    pub bin_width: f64,
    pub min_cells_per_bin: usize,
    pub max_bins: usize,
}

impl Default for DensityParams {
    fn default() -> Self {
        Self {
            bin_width: 0.5,
            min_cells_per_bin: 1,
            max_bins: 4_000_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbiguityParams {
    pub outlier_mode: OutlierMode,
    pub mad_multiplier: f64,
    pub local_window: usize,
    /// Lower bound on the residual scale, as a fraction of lineage curve length.
    pub residual_floor_fraction: f64,
    pub fold_ratio: f64,
    pub fold_min_arc_fraction: f64,
}

impl Default for AmbiguityParams {
    fn default() -> Self {
        Self {
            outlier_mode: OutlierMode::Neutral,
            mad_multiplier: 3.0,
            local_window: 25,
            residual_floor_fraction: 0.01,
            fold_ratio: 1.25,
            fold_min_arc_fraction: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub simi_midpoint: f64,
    pub gof_midpoint: f64,
    pub ushape_weight: f64,
    pub disconnect_penalty: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            simi_midpoint: 0.5,
            gof_midpoint: 0.5,
            ushape_weight: 1.0,
            disconnect_penalty: 10.0,
        }
    }
}

impl ScoreWeights {
    /// Largest total the rate metrics can contribute (SimiRetain = GOF = 1, USHAPE = 0).
    pub fn max_positive(&self) -> f64 {
        (1.0 - self.simi_midpoint) + (1.0 - self.gof_midpoint)
    }

    pub fn validate(&self) -> EvalResult<()> {
        check_unit_open("scoring.simi_midpoint", self.simi_midpoint)?;
        check_unit_open("scoring.gof_midpoint", self.gof_midpoint)?;
        check_positive("scoring.ushape_weight", self.ushape_weight)?;
        if !(self.disconnect_penalty > self.max_positive()) {
            return Err(configuration(format!(
                "scoring.disconnect_penalty ({}) must exceed the maximum positive contribution ({})",
                self.disconnect_penalty,
                self.max_positive()
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    pub connectivity: ConnectivityParams,
    pub homogeneity: HomogeneityParams,
    pub preservation: PreservationParams,
    pub density: DensityParams,
    pub ambiguity: AmbiguityParams,
    pub scoring: ScoreWeights,
}

impl EvalConfig {
    pub fn default_v1() -> Self {
        Self::default()
    }

    pub fn from_json_str(text: &str) -> EvalResult<Self> {
        serde_json::from_str(text)
            .map_err(|e| configuration(format!("invalid thresholds file: {}", e)))
    }

    pub fn from_json_file(path: &Path) -> EvalResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            configuration(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> EvalResult<()> {
        let c = &self.connectivity;
        check_k("connectivity.k_neighbors", c.k_neighbors)?;
        check_positive("connectivity.separation_ratio", c.separation_ratio)?;
        if !(0.0..1.0).contains(&c.min_cluster_fraction) {
            return Err(configuration(format!(
                "connectivity.min_cluster_fraction must be in [0, 1), got {}",
                c.min_cluster_fraction
            )));
        }
        if c.min_cluster_size == 0 {
            return Err(configuration("connectivity.min_cluster_size must be >= 1"));
        }

        let h = &self.homogeneity;
        if h.num_permutations == 0 {
            return Err(configuration("homogeneity.num_permutations must be >= 1"));
        }
        check_unit_open("homogeneity.alpha", h.alpha)?;
        if h.power_iterations == 0 {
            return Err(configuration("homogeneity.power_iterations must be >= 1"));
        }
        check_positive("homogeneity.tolerance", h.tolerance)?;

        let p = &self.preservation;
        check_k("preservation.k_neighbors", p.k_neighbors)?;
        if !(0.0..1.0).contains(&p.min_overlap) {
            return Err(configuration(format!(
                "preservation.min_overlap must be in [0, 1), got {}",
                p.min_overlap
            )));
        }
        if !(p.cross_cluster_weight > 0.0 && p.cross_cluster_weight <= 1.0) {
            return Err(configuration(format!(
                "preservation.cross_cluster_weight must be in (0, 1], got {}",
                p.cross_cluster_weight
            )));
        }

        let d = &self.density;
        check_positive("density.bin_width", d.bin_width)?;
        if d.min_cells_per_bin == 0 {
            return Err(configuration("density.min_cells_per_bin must be >= 1"));
        }
        if d.max_bins == 0 {
            return Err(configuration("density.max_bins must be >= 1"));
        }

        let a = &self.ambiguity;
        check_positive("ambiguity.mad_multiplier", a.mad_multiplier)?;
        if a.local_window < 3 {
            return Err(configuration("ambiguity.local_window must be >= 3"));
        }
        if !(a.residual_floor_fraction >= 0.0 && a.residual_floor_fraction.is_finite()) {
            return Err(configuration(
                "ambiguity.residual_floor_fraction must be finite and >= 0",
            ));
        }
        if !(a.fold_ratio >= 1.0 && a.fold_ratio.is_finite()) {
            return Err(configuration("ambiguity.fold_ratio must be finite and >= 1"));
        }
        check_unit_open("ambiguity.fold_min_arc_fraction", a.fold_min_arc_fraction)?;

        self.scoring.validate()
    }
}

fn check_k(name: &str, k: usize) -> EvalResult<()> {
    if k == 0 {
        return Err(configuration(format!("{} must be >= 1", name)));
    }
    Ok(())
}

fn check_positive(name: &str, v: f64) -> EvalResult<()> {
    if !(v > 0.0 && v.is_finite()) {
        return Err(configuration(format!(
            "{} must be finite and positive, got {}",
            name, v
        )));
    }
    Ok(())
}

fn check_unit_open(name: &str, v: f64) -> EvalResult<()> {
    if !(v > 0.0 && v < 1.0) {
        return Err(configuration(format!("{} must be in (0, 1), got {}", name, v)));
    }
    Ok(())
}
