//! CLI entrypoint for `roster`.
//!
//! Loads one or more directory exports, then either prints the group catalog
//! or resolves the selected group's nested membership, applies the
//! presentation filter, prints the member list, and optionally writes a print
//! document and a spreadsheet when an output directory is provided.
use std::fs;
use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::{Parser, ValueEnum};
use log::{LevelFilter, error, warn};
use roster::{
    engine::Engine,
    export::{export_file_stem, save_print_document, save_spreadsheet_csv},
    filter::{DEFAULT_EXCLUDED_SUBSTRING, MemberFilter},
    report::{render_catalog, render_members},
};

#[derive(Parser, Debug)]
#[command(
    name = "roster",
    version,
    about = "Resolve nested directory group membership"
)]
struct Args {
    /// Path to the directory export file(s)
    #[arg(short = 'd', long = "directory", required = true)]
    directory: Vec<PathBuf>,

    /// Group to resolve; lists all groups when omitted
    #[arg(short = 'g', long = "group")]
    group: Option<String>,

    /// Path to the output directory for the print document and spreadsheet
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Hide members whose display name matches this regex
    /// (default: names containing "Like")
    #[arg(long = "exclude", conflicts_with = "no_filter")]
    exclude: Option<String>,

    /// Show every resolved member
    #[arg(long = "no-filter")]
    no_filter: bool,

    /// Increase verbosity (-v, -vv)
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,

    /// Enable parallel loading of export files
    #[arg(long = "parallel")]
    parallel: bool,

    /// Log counts of loaded and malformed export rows
    #[arg(long = "log-parse-stats")]
    log_parse_stats: bool,

    /// Control color output (auto, always, never)
    #[arg(long = "color", value_enum, default_value_t = ColorChoice::Auto)]
    color: ColorChoice,

    /// Suppress terminal output (still writes exports if -o is provided)
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

fn init_logger(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    let _ = env_logger::Builder::from_default_env()
        .filter_level(level)
        .try_init();
}

fn verify_inputs(args: &Args) -> Result<()> {
    if args.directory.is_empty() {
        bail!("no directory exports provided (-d/--directory)");
    }
    for p in &args.directory {
        if !p.exists() {
            bail!("directory export not found: {}", p.display());
        }
    }
    if args.output.is_some() && args.group.is_none() {
        warn!("--output has no effect without --group (continuing)");
    }
    Ok(())
}

fn build_filter(args: &Args) -> Result<MemberFilter> {
    if args.no_filter {
        return Ok(MemberFilter::none());
    }
    match &args.exclude {
        Some(pattern) => Ok(MemberFilter::from_pattern(pattern)?),
        None => Ok(MemberFilter::excluding_substring(
            DEFAULT_EXCLUDED_SUBSTRING,
        )),
    }
}

fn main() {
    let args = Args::parse();
    init_logger(args.verbose);
    match args.color {
        ColorChoice::Always => {
            colored::control::set_override(true);
        }
        ColorChoice::Never => {
            colored::control::set_override(false);
        }
        ColorChoice::Auto => {}
    }
    if let Err(e) = verify_inputs(&args) {
        error!("{}", e);
        std::process::exit(2);
    }
    let filter = match build_filter(&args) {
        Ok(f) => f,
        Err(e) => {
            error!("invalid --exclude pattern: {}", e);
            std::process::exit(2);
        }
    };

    let mut engine = Engine::new();
    let load_res = if args.parallel {
        engine.load_from_file_paths_parallel(&args.directory)
    } else {
        engine.load_from_file_paths(&args.directory)
    };
    if let Err(e) = load_res {
        error!("failed to load directory exports: {:#}", e);
        std::process::exit(3);
    }
    if args.log_parse_stats {
        if let Some(stats) = engine.parse_stats {
            log::info!(
                "parse stats: records={}, malformed={}, groups={}",
                stats.records,
                stats.malformed,
                engine.directory.group_count()
            );
        }
    }
    if engine.directory.is_empty() {
        warn!("directory exports contain no groups");
    }

    let Some(group) = args.group.as_deref() else {
        match engine.list_all_groups() {
            Ok(groups) => {
                if !args.quiet {
                    println!("{}", render_catalog(&groups));
                }
            }
            Err(e) => {
                error!("failed to list groups: {}", e);
                std::process::exit(7);
            }
        }
        return;
    };

    let resolution = match engine.resolve(group) {
        Ok(r) => r,
        Err(e) => {
            error!("failed to resolve {}: {}", group, e);
            std::process::exit(7);
        }
    };
    if resolution.stats.groups_expanded == 0 {
        warn!("group not found: {}", group);
    }
    let shown = filter.apply(&resolution.members);
    let hidden = resolution.members.len() - shown.len();

    if !args.quiet {
        println!("{}", render_members(group, &shown, hidden));
    }

    if let Some(outdir) = args.output {
        if let Err(e) = fs::create_dir_all(&outdir) {
            error!(
                "failed to create output directory {}: {}",
                outdir.display(),
                e
            );
            std::process::exit(4);
        }
        let ts = chrono::Local::now().format("%Y.%m.%d_%H.%M.%S");
        let stem = export_file_stem(group);
        let txt = outdir.join(format!("roster_{}_print_{}.txt", stem, ts));
        let csv = outdir.join(format!("roster_{}_members_{}.csv", stem, ts));
        if let Err(e) = save_print_document(group, &shown, &txt) {
            error!("failed to write {}: {:#}", txt.display(), e);
            std::process::exit(5);
        }
        if let Err(e) = save_spreadsheet_csv(group, &shown, &csv) {
            error!("failed to write {}: {:#}", csv.display(), e);
            std::process::exit(6);
        }
    }
}
