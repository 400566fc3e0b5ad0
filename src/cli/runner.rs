use tracing::{info, warn};

use annobatch::RunParams;

use super::args::CliArgs;
use super::errors::AppError;

pub fn run(args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.log {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .init();
    }

    // Validated by hand rather than by clap so a missing run directory
    // exits 1 with a message like every other precondition failure.
    let run_dir = args.run_dir.ok_or(AppError::MissingArgument {
        arg: "<RUN_DIR>".to_string(),
    })?;
    if !run_dir.is_dir() {
        return Err(AppError::InvalidRunDirectory(run_dir).into());
    }

    let params = RunParams {
        bin_dir: args.bin_dir,
        concepts: args.concepts,
        source_filter: args.sources,
        keep_servers: args.keep_servers,
        wsd_port: args.wsd_port,
        tagger_port: args.tagger_port,
        ready_timeout_secs: args.ready_timeout,
    };

    let report = annobatch::run_batch(&run_dir, &params)?;

    info!("Processed: {}", report.processed);
    info!("Skipped: {}", report.skipped);
    info!("Errors: {}", report.errors);
    if report.errors > 0 {
        warn!(
            "{} document(s) failed to annotate; see messages above",
            report.errors
        );
    }

    Ok(())
}
