use crate::error::{EvalResult, precondition};

/// Row-major matrix, one row per cell.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix {
    n_rows: usize,
    n_cols: usize,
    data: Vec<f64>,
}

impl DenseMatrix {
    pub fn new(n_rows: usize, n_cols: usize, data: Vec<f64>) -> EvalResult<Self> {
        if data.len() != n_rows * n_cols {
            return Err(precondition(format!(
                "matrix data length {} does not match {} x {}",
                data.len(),
                n_rows,
                n_cols
            )));
        }
        Ok(Self {
            n_rows,
            n_cols,
            data,
        })
    }

    pub fn zeros(n_rows: usize, n_cols: usize) -> Self {
        Self {
            n_rows,
            n_cols,
            data: vec![0.0; n_rows * n_cols],
        }
    }

    pub fn from_rows(rows: &[Vec<f64>]) -> EvalResult<Self> {
        let n_cols = rows.first().map(|r| r.len()).unwrap_or(0);
        let mut data = Vec::with_capacity(rows.len() * n_cols);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n_cols {
                return Err(precondition(format!(
                    "row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    n_cols
                )));
            }
            data.extend_from_slice(row);
        }
        Self::new(rows.len(), n_cols, data)
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.n_cols..(i + 1) * self.n_cols]
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n_cols + j]
    }

    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        self.data[i * self.n_cols + j] = value;
    }

    pub fn add(&mut self, i: usize, j: usize, value: f64) {
        self.data[i * self.n_cols + j] += value;
    }

    pub fn column(&self, j: usize) -> Vec<f64> {
        (0..self.n_rows).map(|i| self.get(i, j)).collect()
    }

    pub fn set_column(&mut self, j: usize, values: &[f64]) {
        for (i, &v) in values.iter().enumerate() {
            self.set(i, j, v);
        }
    }

    pub fn select_rows(&self, rows: &[usize]) -> Self {
        let mut data = Vec::with_capacity(rows.len() * self.n_cols);
        for &r in rows {
            data.extend_from_slice(self.row(r));
        }
        Self {
            n_rows: rows.len(),
            n_cols: self.n_cols,
            data,
        }
    }

    pub fn view(&self) -> PointView<'_> {
        PointView {
            data: &self.data,
            dim: self.n_cols,
        }
    }
}

/// Borrowed row-major point cloud.
#[derive(Debug, Clone, Copy)]
pub struct PointView<'a> {
    data: &'a [f64],
    dim: usize,
}

impl<'a> PointView<'a> {
    pub fn new(data: &'a [f64], dim: usize) -> EvalResult<Self> {
        if dim == 0 {
            return Err(precondition("points must have at least one dimension"));
        }
        if data.len() % dim != 0 {
            return Err(precondition(format!(
                "point buffer length {} is not a multiple of dimension {}",
                data.len(),
                dim
            )));
        }
        Ok(Self { data, dim })
    }

    pub fn from_xy(coords: &'a [[f64; 2]]) -> Self {
        Self {
            data: coords.as_flattened(),
            dim: 2,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len() / self.dim
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn point(&self, i: usize) -> &'a [f64] {
        &self.data[i * self.dim..(i + 1) * self.dim]
    }

    pub fn distance(&self, i: usize, j: usize) -> f64 {
        euclidean(self.point(i), self.point(j))
    }
}

pub fn squared_euclidean(a: &[f64], b: &[f64]) -> f64 {
    let mut acc = 0.0;
    for (x, y) in a.iter().zip(b) {
        let d = x - y;
        acc += d * d;
    }
    acc
}

pub fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    squared_euclidean(a, b).sqrt()
}
