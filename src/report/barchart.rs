//! Up/down count bar chart across indications.

use std::path::Path;

use anyhow::{bail, Result};
use plotters::prelude::*;

use crate::schema::v1::IndicationSummary;

const UP_COLOR: RGBColor = RGBColor(202, 56, 46);
const DOWN_COLOR: RGBColor = RGBColor(51, 98, 171);

pub fn render_counts_bar(summaries: &[IndicationSummary], path: &Path) -> Result<()> {
    let rows: Vec<&IndicationSummary> = summaries.iter().filter(|s| !s.skipped).collect();
    if rows.is_empty() {
        bail!("no indications to chart");
    }

    let max_count = rows
        .iter()
        .map(|s| s.n_up.max(s.n_down))
        .max()
        .unwrap_or(1)
        .max(1) as f64;
    let n = rows.len();

    let root = SVGBackend::new(path, (120 + 70 * n as u32, 600)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| anyhow::anyhow!("bar chart fill failed: {}", e))?;

    let labels: Vec<String> = rows
        .iter()
        .map(|s| s.project.trim_start_matches("TCGA-").to_string())
        .collect();

    let mut chart = ChartBuilder::on(&root)
        .caption("GESP regulation per indication", ("sans-serif", 22))
        .margin(16)
        .x_label_area_size(60)
        .y_label_area_size(56)
        .build_cartesian_2d(0f64..n as f64, 0f64..max_count * 1.1)
        .map_err(|e| anyhow::anyhow!("bar chart build failed: {}", e))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n)
        .x_label_formatter(&|x| {
            let i = *x as usize;
            labels.get(i).cloned().unwrap_or_default()
        })
        .y_desc("GESP genes")
        .draw()
        .map_err(|e| anyhow::anyhow!("bar chart mesh failed: {}", e))?;

    for (i, s) in rows.iter().enumerate() {
        let x = i as f64;
        chart
            .draw_series(std::iter::once(Rectangle::new(
                [(x + 0.10, 0.0), (x + 0.48, s.n_up as f64)],
                UP_COLOR.filled(),
            )))
            .map_err(|e| anyhow::anyhow!("bar chart draw failed: {}", e))?;
        chart
            .draw_series(std::iter::once(Rectangle::new(
                [(x + 0.52, 0.0), (x + 0.90, s.n_down as f64)],
                DOWN_COLOR.filled(),
            )))
            .map_err(|e| anyhow::anyhow!("bar chart draw failed: {}", e))?;
    }

    chart
        .draw_series(std::iter::empty::<Rectangle<(f64, f64)>>())
        .map_err(|e| anyhow::anyhow!("bar chart legend failed: {}", e))?
        .label("up")
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], UP_COLOR.filled()));
    chart
        .draw_series(std::iter::empty::<Rectangle<(f64, f64)>>())
        .map_err(|e| anyhow::anyhow!("bar chart legend failed: {}", e))?
        .label("down")
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], DOWN_COLOR.filled()));
    chart
        .configure_series_labels()
        .border_style(BLACK)
        .background_style(WHITE.mix(0.8))
        .draw()
        .map_err(|e| anyhow::anyhow!("bar chart legend failed: {}", e))?;

    root.present()
        .map_err(|e| anyhow::anyhow!("bar chart write failed: {}", e))?;
    Ok(())
}
