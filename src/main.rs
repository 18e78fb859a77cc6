use anyhow::Result;
use clap::Parser;
use log::{ debug, info };

use presumption_validator::ValidatorConfig;

mod cli;
use cli::{ ValidatorCli, Commands };

#[tokio::main]
async fn main() -> Result<()> {
    // Parse the command line arguments
    let cli = ValidatorCli::parse();

    // Setup logging
    setup_logging(&cli.log_level);

    match dotenv::dotenv() {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(_) => debug!("No .env file found, using the process environment"),
    }

    let config = match ValidatorConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            cli::ui::print_error(&e.to_string());
            return Err(e.into());
        }
    };
    // Fail before any work starts when the model key is missing
    if let Err(e) = config.model_api_key() {
        cli::ui::print_error(&e.to_string());
        cli::ui::print_info("Create a .env file with: ANTHROPIC_API_KEY=your-key-here");
        return Err(e.into());
    }

    let json_output = cli.output_format.eq_ignore_ascii_case("json");

    match &cli.command {
        Commands::Check { prompt, prompt_file, consolidate, output } => {
            cli::commands::check::execute(
                &config,
                prompt.as_deref(),
                prompt_file.as_deref(),
                *consolidate,
                output.as_deref(),
                json_output
            ).await?;
        }

        Commands::Batch { dataset, split, start, count, output, fail_fast } => {
            cli::commands::batch::execute(
                &config,
                dataset,
                split,
                *start,
                *count,
                output,
                *fail_fast,
                json_output
            ).await?;
        }

        Commands::Evaluate {
            dataset,
            split,
            results,
            start,
            count,
            output,
            judge_model,
            fail_fast,
        } => {
            cli::commands::evaluate::execute(
                &config,
                dataset,
                split,
                results,
                *start,
                *count,
                output,
                judge_model.as_deref(),
                *fail_fast,
                json_output
            ).await?;
        }
    }

    Ok(())
}

fn setup_logging(log_level: &str) {
    // Set up the logger based on the log level
    let level = match log_level.to_lowercase().as_str() {
        "trace" => log::LevelFilter::Trace,
        "debug" => log::LevelFilter::Debug,
        "info" => log::LevelFilter::Info,
        "warn" => log::LevelFilter::Warn,
        "error" => log::LevelFilter::Error,
        _ => log::LevelFilter::Info,
    };

    env_logger::Builder::new().filter_level(level).init();

    info!("Logger initialized with level: {}", log_level);
}
