//! Clustered fold-change heatmap.
//!
//! Rows (genes) and columns (indications) are ordered by average-linkage
//! clustering on Euclidean distance; cells use a blue-white-red diverging
//! scale and missing values render grey. Each indication keeps a fixed
//! annotation color regardless of where clustering places its column.

use std::path::Path;

use anyhow::{bail, Result};
use plotters::prelude::*;

use crate::cluster;
use crate::report::matrix::FoldChangeMatrix;

const NA_COLOR: RGBColor = RGBColor(210, 210, 210);

/// Fixed annotation palette; indications cycle through it by their position
/// in the built-in list order, so colors are stable run to run.
pub const ANNOTATION_PALETTE: [RGBColor; 15] = [
    RGBColor(228, 26, 28),
    RGBColor(55, 126, 184),
    RGBColor(77, 175, 74),
    RGBColor(152, 78, 163),
    RGBColor(255, 127, 0),
    RGBColor(255, 217, 47),
    RGBColor(166, 86, 40),
    RGBColor(247, 129, 191),
    RGBColor(153, 153, 153),
    RGBColor(102, 194, 165),
    RGBColor(252, 141, 98),
    RGBColor(141, 160, 203),
    RGBColor(231, 138, 195),
    RGBColor(166, 216, 84),
    RGBColor(229, 196, 148),
];

pub fn annotation_color(project_index: usize) -> RGBColor {
    ANNOTATION_PALETTE[project_index % ANNOTATION_PALETTE.len()]
}

/// Blue-white-red diverging map over [-limit, limit].
pub fn diverging_color(value: f64, limit: f64) -> RGBColor {
    let t = if limit > 0.0 {
        (value / limit).clamp(-1.0, 1.0)
    } else {
        0.0
    };
    if t >= 0.0 {
        let f = 1.0 - t;
        RGBColor(255, (255.0 * f) as u8, (255.0 * f) as u8)
    } else {
        let f = 1.0 + t;
        RGBColor((255.0 * f) as u8, (255.0 * f) as u8, 255)
    }
}

pub fn render_heatmap(matrix: &FoldChangeMatrix, path: &Path) -> Result<()> {
    if matrix.n_genes() == 0 || matrix.n_projects() == 0 {
        bail!("empty fold-change matrix");
    }

    let row_order = cluster::leaf_order(&matrix.imputed_rows());
    let col_order = cluster::leaf_order(&matrix.imputed_cols());

    let limit = matrix
        .to_long()
        .iter()
        .filter_map(|r| r.value)
        .fold(0.0f64, |acc, v| acc.max(v.abs()));

    let left = 110u32; // gene labels
    let top = 70u32; // title + annotation strip
    let bottom = 60u32; // project labels
    let cell = 14u32;
    let width = left + cell * matrix.n_projects() as u32 + 20;
    let height = top + cell * matrix.n_genes() as u32 + bottom;

    let root = SVGBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| anyhow::anyhow!("heatmap fill failed: {}", e))?;

    root.draw(&Text::new(
        "GESP log2 fold-change across indications",
        (10, 8),
        ("sans-serif", 18),
    ))
    .map_err(|e| anyhow::anyhow!("heatmap title failed: {}", e))?;

    // column annotation strip
    for (cx, &j) in col_order.iter().enumerate() {
        let x0 = (left + cell * cx as u32) as i32;
        root.draw(&Rectangle::new(
            [(x0, (top - 18) as i32), (x0 + cell as i32, (top - 6) as i32)],
            annotation_color(j).filled(),
        ))
        .map_err(|e| anyhow::anyhow!("heatmap annotation failed: {}", e))?;
    }

    // cells
    for (ry, &i) in row_order.iter().enumerate() {
        let y0 = (top + cell * ry as u32) as i32;
        for (cx, &j) in col_order.iter().enumerate() {
            let x0 = (left + cell * cx as u32) as i32;
            let color = match matrix.get(i, j) {
                Some(v) => diverging_color(v, limit),
                None => NA_COLOR,
            };
            root.draw(&Rectangle::new(
                [(x0, y0), (x0 + cell as i32, y0 + cell as i32)],
                color.filled(),
            ))
            .map_err(|e| anyhow::anyhow!("heatmap cell failed: {}", e))?;
        }
    }

    // row labels
    for (ry, &i) in row_order.iter().enumerate() {
        let y0 = (top + cell * ry as u32) as i32;
        root.draw(&Text::new(
            matrix.genes[i].clone(),
            (4, y0 + 2),
            ("sans-serif", 11),
        ))
        .map_err(|e| anyhow::anyhow!("heatmap row label failed: {}", e))?;
    }

    // column labels
    let label_y = (top + cell * matrix.n_genes() as u32 + 6) as i32;
    for (cx, &j) in col_order.iter().enumerate() {
        let x0 = (left + cell * cx as u32) as i32;
        let label = matrix.projects[j].trim_start_matches("TCGA-").to_string();
        root.draw(&Text::new(label, (x0, label_y), ("sans-serif", 11)))
            .map_err(|e| anyhow::anyhow!("heatmap column label failed: {}", e))?;
    }

    root.present()
        .map_err(|e| anyhow::anyhow!("heatmap write failed: {}", e))?;
    Ok(())
}
