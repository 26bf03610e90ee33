use std::collections::HashMap;

use crate::error::{EvalResult, precondition};
use crate::math::geometry::Point2;
use crate::math::points::PointView;
use crate::model::index_ids;

#[derive(Debug, Clone)]
pub struct Embedding {
    cells: Vec<String>,
    coords: Vec<Point2>,
    cell_index: HashMap<String, usize>,
}

impl Embedding {
    pub fn new(cells: Vec<String>, coords: Vec<Point2>) -> EvalResult<Self> {
        if cells.len() != coords.len() {
            return Err(precondition(format!(
                "embedding has {} cell ids but {} coordinates",
                cells.len(),
                coords.len()
            )));
        }
        for (cell, c) in cells.iter().zip(&coords) {
            if !c[0].is_finite() || !c[1].is_finite() {
                return Err(precondition(format!(
                    "embedding coordinate for cell '{}' is not finite",
                    cell
                )));
            }
        }
        let cell_index = index_ids(&cells, "embedding cell")?;
        Ok(Self {
            cells,
            coords,
            cell_index,
        })
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    pub fn coords(&self) -> &[Point2] {
        &self.coords
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn row_of(&self, cell: &str) -> Option<usize> {
        self.cell_index.get(cell).copied()
    }

    pub fn points(&self) -> PointView<'_> {
        PointView::from_xy(&self.coords)
    }
}
