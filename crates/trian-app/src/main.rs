//! The binary entry point for the Trian LOD fix tool.

use clap::Parser;

use trian_app::platform::PlatformDirs;
use trian_app::{AppError, RunSummary, output_path, run};
use trian_config::{CliArgs, Config};

/// Stack for the worker thread. Scene loading, the fix walk, and saving all
/// recurse once per hierarchy level.
const WORKER_STACK_SIZE: usize = 64 * 1024 * 1024;

fn main() {
    let args = CliArgs::parse();

    match run_on_worker(args) {
        Ok(summary) => {
            let report = &summary.report;
            println!("Trian LOD fix");
            println!("  nodes:     {}", report.nodes_visited);
            println!("  groups:    {}", report.groups_closed);
            println!("  rewritten: {}", report.groups_rewritten);
            println!("  removed:   {}", report.renderers_removed);
            if summary.last_levels_pinned > 0 {
                println!("  pinned:    {}", summary.last_levels_pinned);
            }
            match &summary.written_to {
                Some(path) => println!("  output:    {}", path.display()),
                None => println!("  output:    (dry run)"),
            }
        }
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("trian-lodfix: {e}");
            std::process::exit(1);
        }
    }
}

fn run_on_worker(args: CliArgs) -> Result<RunSummary, AppError> {
    let worker = std::thread::Builder::new()
        .name("trian-lodfix".to_string())
        .stack_size(WORKER_STACK_SIZE)
        .spawn(move || try_main(&args))
        .map_err(AppError::Worker)?;

    match worker.join() {
        Ok(result) => result,
        Err(panic) => std::panic::resume_unwind(panic),
    }
}

fn try_main(args: &CliArgs) -> Result<RunSummary, AppError> {
    let dirs = match &args.config {
        Some(dir) => PlatformDirs::with_config_dir(dir),
        None => PlatformDirs::resolve()?,
    };
    dirs.create_dirs()?;

    // Installed before the config is read so its load messages are kept.
    let logging = trian_log::init_logging(Some(&dirs.log_dir), cfg!(debug_assertions))?;

    let mut config = Config::load_or_create(&dirs.config_dir)?;
    config.apply_cli_overrides(args);

    if let Some(log_file) = logging.apply_config(&config)? {
        tracing::debug!(path = %log_file.display(), "logging to file");
    }

    let output = output_path(&args.input, &config, args.output.as_deref());
    run(&config, &args.input, &output)
}
