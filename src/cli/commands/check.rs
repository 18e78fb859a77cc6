use anyhow::{ anyhow, Result };
use std::fs;
use std::path::{ Path, PathBuf };

use crate::cli::ui;
use presumption_validator::{ PresumptionValidator, ValidatorConfig };

/// Single-prompt command: extract, fact-check, optionally consolidate and save
pub async fn execute(
    config: &ValidatorConfig,
    prompt: Option<&str>,
    prompt_file: Option<&Path>,
    consolidate: bool,
    output_dir: Option<&Path>,
    json_output: bool
) -> Result<()> {
    let prompt = match (prompt, prompt_file) {
        (Some(text), _) => text.to_string(),
        (None, Some(path)) =>
            fs
                ::read_to_string(path)
                .map_err(|e| anyhow!("Failed to read prompt file {}: {}", path.display(), e))?,
        (None, None) => ui::get_prompt()?,
    };
    if prompt.trim().is_empty() {
        return Err(anyhow!("Prompt is empty"));
    }

    let validator = PresumptionValidator::from_config(config)?;
    if !validator.uses_web_search() && !json_output {
        ui::print_warning("No BRAVE_API_KEY found. Fact-checks will use the model's knowledge only.");
        ui::print_info("To enable web search, get an API key at https://brave.com/search/api/");
    }

    let spinner = ui::spinner_with_message("Fact-checking presumptions...");
    let report = validator.validate_prompt(&prompt).await;
    spinner.finish_and_clear();
    let report = report?;

    let consolidated = if consolidate {
        let spinner = ui::spinner_with_message("Consolidating inaccurate presumptions...");
        let summary = validator.consolidate(&report).await;
        spinner.finish_and_clear();
        Some(summary?)
    } else {
        None
    };

    if json_output {
        let output =
            serde_json::json!({
            "model": validator.model_id(),
            "presumptions_found": report.presumptions_found(),
            "report": report,
            "consolidated": consolidated,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        ui::print_report(&report);
        if let Some(summary) = &consolidated {
            ui::print_header("Consolidated Summary of Incorrect Presumptions");
            ui::print_text(summary);
        }
    }

    if let Some(dir) = output_dir {
        let stamp = chrono::Utc::now().format("%Y%m%dT%H%M%S").to_string();
        let report_path: PathBuf = dir.join(format!("full_results_{}.txt", stamp));
        PresumptionValidator::save_report(&report, &report_path)?;
        ui::print_success(&format!("Report saved to {}", report_path.display()));

        if let Some(summary) = &consolidated {
            let summary_path = dir.join(format!("consolidated_results_{}.txt", stamp));
            PresumptionValidator::save_consolidated(summary, &summary_path)?;
            ui::print_success(&format!("Summary saved to {}", summary_path.display()));
        }
    }

    Ok(())
}
