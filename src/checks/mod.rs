pub mod ambiguity;
pub mod connectivity;
pub mod density;
pub mod homogeneity;
pub mod preservation;

pub use ambiguity::{AmbiguityResult, detect_ambiguous};
pub use connectivity::{ClusterCheckResult, StructureLabel, check_connectivity};
pub use density::{DensityResult, evaluate_density};
pub use homogeneity::{HomogeneityDecision, HomogeneityResult, test_homogeneity};
pub use preservation::{PreservationResult, check_preservation};
