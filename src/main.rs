use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use gespscan::cli::{Cli, Commands, GenesetCommand, GenesetShowArgs, ReportArgs, RunArgs};
use gespscan::ctx::Ctx;
use gespscan::geneset;
use gespscan::io;
use gespscan::pipeline::Pipeline;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => run(args),
        Commands::Report(args) => report(args),
        Commands::Geneset(args) => match args.command {
            GenesetCommand::Show(show) => geneset_show(show),
        },
    }
}

fn run(args: RunArgs) -> Result<()> {
    init_threads(args.threads)?;

    let projects = if args.projects.is_empty() {
        geneset::builtin_projects()
    } else {
        args.projects.clone()
    };

    // The reference list is read once and shared across the loop.
    let gesp = match &args.gesp {
        Some(path) => geneset::load_tsv(path)?,
        None => geneset::load_builtin()?,
    };
    tracing::info!(
        entries = gesp.len(),
        surface = gesp.n_surface(),
        "gesp_reference_loaded"
    );

    let mut master = Ctx::new("cohort", &args.out, env!("CARGO_PKG_VERSION"));
    apply_run_args(&mut master, &args);
    master.sync_thresholds();

    for project in &projects {
        let mut ctx = Ctx::new(project, &args.out, env!("CARGO_PKG_VERSION"));
        apply_run_args(&mut ctx, &args);
        ctx.sync_thresholds();
        ctx.gesp = Some(gesp.clone());

        Pipeline::indication().run(&mut ctx)?;

        master.report.indications.push(ctx.build_indication_summary());
        master.report.warnings.extend(ctx.warnings);
    }

    io::write_json(&master.output.run_summary(), &master.report)?;

    Pipeline::aggregate().run(&mut master)?;

    print_summary(&master)?;
    Ok(())
}

fn report(args: ReportArgs) -> Result<()> {
    init_threads(args.threads)?;

    let mut master = Ctx::new("cohort", &args.out, env!("CARGO_PKG_VERSION"));
    master.gmt_paths = args.gmt;
    master.permutations = args.permutations;
    master.seed = args.seed;
    master.plots = !args.no_plots;

    master.report = io::read_json(&master.output.run_summary())
        .context("run summary not found; run `gespscan run` first")?;

    Pipeline::aggregate().run(&mut master)?;

    print_summary(&master)?;
    Ok(())
}

fn geneset_show(args: GenesetShowArgs) -> Result<()> {
    let gesp = match &args.gesp {
        Some(path) => geneset::load_tsv(path)?,
        None => geneset::load_builtin()?,
    };
    println!("gesp reference (version {}):", gesp.version);
    for entry in &gesp.entries {
        println!(
            "{}\t{}\t{}\t{}",
            entry.symbol,
            if entry.surface { "surface" } else { "excluded" },
            entry.enzyme_class,
            entry.gene_family
        );
    }
    println!(
        "{} entries, {} surface-flagged",
        gesp.len(),
        gesp.n_surface()
    );

    if args.collections {
        for collection in geneset::gmt::load_builtin_collections()? {
            println!("collection {} ({} sets):", collection.name, collection.sets.len());
            for set in &collection.sets {
                println!("{}\t{}", set.name, set.genes.len());
            }
        }
    }
    Ok(())
}

fn apply_run_args(ctx: &mut Ctx, args: &RunArgs) {
    ctx.counts_dir = args.counts_dir.clone();
    ctx.gdc_endpoint = args.gdc_endpoint.clone();
    ctx.gesp_path = args.gesp.clone();
    ctx.gmt_paths = args.gmt.clone();
    ctx.sample_sheet_path = args.sample_sheet.clone();
    ctx.min_normals = args.min_normals;
    ctx.lfc_cutoff = args.lfc_cutoff;
    ctx.fdr_cutoff = args.fdr_cutoff;
    ctx.filter_quantile = args.filter_quantile;
    ctx.permutations = args.permutations;
    ctx.seed = args.seed;
    ctx.plots = !args.no_plots;
}

fn init_threads(threads: usize) -> Result<()> {
    if threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
    }
    Ok(())
}

fn print_summary(ctx: &Ctx) -> Result<()> {
    let summary = io::summary::format_summary(ctx)?;
    print!("{}", summary);
    let warnings: Vec<&String> = ctx
        .report
        .warnings
        .iter()
        .chain(ctx.warnings.iter())
        .collect();
    if !warnings.is_empty() {
        println!("warnings:");
        for warning in warnings {
            println!("- {}", warning);
        }
    }
    Ok(())
}
