use crate::error::{EvalResult, precondition};
use crate::math::geometry::{Point2, distance};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveSegment {
    pub start: Point2,
    pub end: Point2,
}

impl CurveSegment {
    pub fn length(&self) -> f64 {
        distance(self.start, self.end)
    }
}

/// Converts an ordered point sequence into consecutive segments.
///
/// Repeated consecutive points are collapsed; a curve with a single distinct point
/// becomes one zero-length segment.
pub fn curve_segments(points: &[Point2]) -> Vec<CurveSegment> {
    let mut distinct: Vec<Point2> = Vec::with_capacity(points.len());
    for &p in points {
        if distinct.last() != Some(&p) {
            distinct.push(p);
        }
    }
    match distinct.len() {
        0 => Vec::new(),
        1 => vec![CurveSegment {
            start: distinct[0],
            end: distinct[0],
        }],
        _ => distinct
            .windows(2)
            .map(|w| CurveSegment {
                start: w[0],
                end: w[1],
            })
            .collect(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineageCurve {
    pub lineage: String,
    pub segments: Vec<CurveSegment>,
}

impl LineageCurve {
    pub fn total_length(&self) -> f64 {
        self.segments.iter().map(|s| s.length()).sum()
    }

    /// Arc length at the start of every segment.
    pub fn cumulative_starts(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.segments.len());
        let mut acc = 0.0;
        for s in &self.segments {
            out.push(acc);
            acc += s.length();
        }
        out
    }
}

/// Piecewise-linear trajectory, one segment path per lineage.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FittedCurve {
    lineages: Vec<LineageCurve>,
}

impl FittedCurve {
    pub fn from_points(curves: Vec<(String, Vec<Point2>)>) -> EvalResult<Self> {
        let mut lineages: Vec<LineageCurve> = Vec::with_capacity(curves.len());
        for (lineage, points) in curves {
            if lineages.iter().any(|l| l.lineage == lineage) {
                return Err(precondition(format!("duplicate curve for lineage '{}'", lineage)));
            }
            if points.iter().any(|p| !p[0].is_finite() || !p[1].is_finite()) {
                return Err(precondition(format!(
                    "curve for lineage '{}' has non-finite points",
                    lineage
                )));
            }
            lineages.push(LineageCurve {
                segments: curve_segments(&points),
                lineage,
            });
        }
        Ok(Self { lineages })
    }

    pub fn lineages(&self) -> &[LineageCurve] {
        &self.lineages
    }

    pub fn get(&self, lineage: &str) -> Option<&LineageCurve> {
        self.lineages.iter().find(|l| l.lineage == lineage)
    }
}
