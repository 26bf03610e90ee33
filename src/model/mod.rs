pub mod curve;
pub mod embedding;
pub mod expression;
pub mod pseudotime;
pub mod trajectory;

pub use curve::{CurveSegment, FittedCurve, LineageCurve, curve_segments};
pub use embedding::Embedding;
pub use expression::ExpressionMatrix;
pub use pseudotime::PseudotimeTable;
pub use trajectory::TrajectoryObject;

use std::collections::HashMap;

use crate::error::{EvalResult, precondition};

/// Id -> row index; duplicate ids are rejected.
pub(crate) fn index_ids(ids: &[String], what: &str) -> EvalResult<HashMap<String, usize>> {
    let mut index = HashMap::with_capacity(ids.len());
    for (i, id) in ids.iter().enumerate() {
        if let Some(first) = index.insert(id.clone(), i) {
            return Err(precondition(format!(
                "duplicate {} id '{}' at rows {} and {}",
                what,
                id,
                first + 1,
                i + 1
            )));
        }
    }
    Ok(index)
}
