use clap::Parser;
use results_dashboard::cli::commands::{cmd_clear, cmd_record, cmd_report};
use results_dashboard::cli::config::{Cli, Commands, build_store_config, load_config};
use results_dashboard::telemetry::{init_tracing, level_for_verbosity};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.log_json, level_for_verbosity(cli.verbose));
    let config = load_config(cli.config.as_deref());

    match cli.command {
        Commands::Report {
            results,
            format,
            output,
            fail_on_failure,
        } => {
            let store_config = build_store_config(results.as_deref(), &config);
            // Resolve report settings: CLI > config > defaults
            let format = format.unwrap_or_else(|| config.report.format.clone());
            let output = output.or_else(|| config.report.output.clone());

            let all_passed = cmd_report(&store_config, &format, output.as_deref())?;
            if fail_on_failure && !all_passed {
                std::process::exit(1);
            }
        }
        Commands::Record {
            results,
            suite,
            id,
            name,
            status,
            duration,
            details,
        } => {
            let store_config = build_store_config(results.as_deref(), &config);
            cmd_record(&store_config, &suite, &id, &name, &status, duration, &details)?;
        }
        Commands::Clear { results } => {
            let store_config = build_store_config(results.as_deref(), &config);
            cmd_clear(&store_config)?;
        }
    }

    Ok(())
}
