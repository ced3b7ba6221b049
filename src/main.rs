use airq_stats::cli::Args;
use airq_stats::io::write_table;
use airq_stats::{ProcessingOutput, StatsProcessor};
use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::process;
use tracing::{debug, info};

fn main() {
    let args = Args::parse();

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        tokio::select! {
            result = run(args) => result,
            _ = tokio::signal::ctrl_c() => {
                eprintln!("\nReceived CTRL+C, shutting down...");
                Err(anyhow::anyhow!("Processing interrupted by user"))
            }
        }
    });

    if let Err(error) = result {
        eprintln!("{} {:#}", "Error:".bright_red().bold(), error);
        process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    setup_logging(&args);
    debug!("Command line arguments: {:?}", args);

    let config = args.to_config().context("Invalid command line options")?;
    let output_format = args.get_output_format()?;

    info!(
        "Processing {} as {} input",
        args.input.display(),
        config.format
    );

    let processor = StatsProcessor::new(config)?;
    let output = processor
        .process_file(&args.input)
        .await
        .with_context(|| format!("Failed to process {}", args.input.display()))?;

    match (&args.output, output_format) {
        (Some(path), Some(format)) => {
            write_table(&output.table, path, format)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            print_summary(&output);
            println!(
                "   {} {}",
                "Output:".bright_white(),
                path.display().to_string().bright_cyan()
            );
        }
        _ => {
            let df = output.table.to_dataframe()?;
            println!("{}", df);
            print_summary(&output);
        }
    }

    Ok(())
}

/// Set up structured logging on stderr; `RUST_LOG` overrides `--verbose`
fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("airq_stats={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .init();

    debug!("Logging initialized at level: {}", log_level);
}

fn print_summary(output: &ProcessingOutput) {
    let stats = &output.stats;

    println!();
    println!("{}", "Processing complete".bright_green().bold());
    println!(
        "   {} {} read, {} decoded, {} skipped, {} discarded",
        "Rows:".bright_white(),
        stats.rows_read,
        stats.rows_decoded,
        stats.rows_skipped,
        stats.records_discarded
    );
    println!(
        "   {} {} valid, {} invalid, {} rejected ({:.1}% valid)",
        "Readings:".bright_white(),
        stats.valid_readings,
        stats.invalid_readings,
        stats.rejected_readings,
        stats.valid_rate()
    );
    println!(
        "   {} {}",
        "Stations:".bright_white(),
        stats.stations.to_string().bright_cyan()
    );
    if stats.stations_without_readings > 0 {
        println!(
            "   {} {} stations have no valid reading (statistics are NaN)",
            "Warning:".bright_yellow(),
            stats.stations_without_readings
        );
    }
    if stats.rows_skipped > 0 {
        println!(
            "   {} {} rows skipped",
            "Warning:".bright_yellow(),
            stats.rows_skipped
        );
        for message in stats.error_messages.iter().take(5) {
            println!("      {}", message.bright_black());
        }
    }
    println!(
        "   {} {} ms",
        "Time:".bright_white(),
        stats.processing_time_ms
    );
}
