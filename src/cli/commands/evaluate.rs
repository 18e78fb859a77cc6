use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use crate::cli::ui;
use presumption_validator::{
    run_evaluation,
    Dataset,
    FailurePolicy,
    HttpLanguageModel,
    Judge,
    ValidatorConfig,
};

/// Judge command: score saved summaries against the reference corrections
pub async fn execute(
    config: &ValidatorConfig,
    dataset_dir: &Path,
    split: &str,
    results_dir: &Path,
    start: usize,
    count: usize,
    output_dir: &Path,
    judge_model: Option<&str>,
    fail_fast: bool,
    json_output: bool
) -> Result<()> {
    ui::print_header("Presumption Detection Evaluation");

    let dataset = Dataset::load_from_disk(dataset_dir, split)?;
    let model_id = judge_model.unwrap_or(config.judge_model()).to_string();
    let model = HttpLanguageModel::new(config)?.with_model(model_id.clone());
    let judge = Judge::from_config(config, Arc::new(model))?;
    ui::print_result("Judge model", &model_id);

    let policy = if fail_fast { FailurePolicy::Abort } else { FailurePolicy::Skip };
    let progress = ui::create_progress_bar(count as u64, "Judging summaries");
    let outcome = run_evaluation(
        &judge,
        &dataset,
        start,
        count,
        results_dir,
        output_dir,
        policy,
        |_| progress.inc(1)
    ).await;
    progress.finish_and_clear();
    let outcome = outcome?;

    let tally = outcome.tally();
    if json_output {
        let output =
            serde_json::json!({
            "judge_model": model_id,
            "scores": outcome.scores,
            "tally": tally,
            "mean": tally.mean(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    for (offset, raw) in outcome.scores.iter().enumerate() {
        ui::print_judge_score(start + offset, raw.as_deref());
    }
    ui::print_header("Score Distribution");
    ui::print_tally(&tally);
    ui::print_success(&format!("Scores saved to {}", outcome.output_path.display()));

    Ok(())
}
