use anyhow::Result;
use std::path::Path;

use crate::cli::ui;
use presumption_validator::{
    run_batch,
    Dataset,
    FailurePolicy,
    PresumptionValidator,
    ValidatorConfig,
};

/// Dataset command: one full report and one consolidated summary per question
pub async fn execute(
    config: &ValidatorConfig,
    dataset_dir: &Path,
    split: &str,
    start: usize,
    count: usize,
    output_dir: &Path,
    fail_fast: bool,
    json_output: bool
) -> Result<()> {
    ui::print_header("Presumption Validation Batch");

    let dataset = Dataset::load_from_disk(dataset_dir, split)?;
    ui::print_info(&format!("Loaded {} item(s) from the '{}' split", dataset.len(), split));

    let validator = PresumptionValidator::from_config(config)?;
    ui::print_result("Model", validator.model_id());
    ui::print_result("Web search", if validator.uses_web_search() { "enabled" } else { "disabled" });

    let policy = if fail_fast { FailurePolicy::Abort } else { FailurePolicy::Skip };
    let progress = ui::create_progress_bar(count as u64, "Validating prompts");
    let summary = run_batch(&validator, &dataset, start, count, output_dir, policy, |_| {
        progress.inc(1)
    }).await;
    progress.finish_and_clear();
    let summary = summary?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    ui::print_success(
        &format!("{} item(s) saved to {}", summary.completed.len(), output_dir.display())
    );
    for (index, message) in &summary.failed {
        ui::print_error(&format!("Item {} failed: {}", index, message));
    }

    Ok(())
}
