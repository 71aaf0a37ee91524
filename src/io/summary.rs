use anyhow::Result;

use crate::ctx::Ctx;

pub fn format_summary(ctx: &Ctx) -> Result<String> {
    let version = env!("CARGO_PKG_VERSION");
    let profiled = ctx.report.indications.iter().filter(|s| !s.skipped).count();
    let skipped = ctx.report.indications.len() - profiled;

    let mut out = String::new();
    out.push_str(&format!("gespscan v{}\n", version));
    out.push_str(&format!(
        "Indications: {} profiled, {} skipped\n",
        profiled, skipped
    ));
    for s in &ctx.report.indications {
        if s.skipped {
            out.push_str(&format!(
                "{}: skipped ({} normal samples)\n",
                s.project, s.n_normal
            ));
        } else {
            out.push_str(&format!(
                "{}: {} GESP rows, {} up, {} down\n",
                s.project, s.gesp_rows, s.n_up, s.n_down
            ));
        }
    }
    Ok(out)
}
