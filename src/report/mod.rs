pub mod barchart;
pub mod enrichment;
pub mod heatmap;
pub mod matrix;
