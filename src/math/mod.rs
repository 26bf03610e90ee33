pub mod geometry;
pub mod graph;
pub mod knn;
pub mod points;
pub mod stats;
