use std::fs;
use std::path::{ Path, PathBuf };
use log::{ error, info };
use serde::Serialize;

use crate::errors::ValidatorResult;
use crate::implementations::dataset::Dataset;
use crate::implementations::judge::Judge;
use crate::implementations::presumption_validator::PresumptionValidator;
use crate::models::judge::ScoreTally;

pub const EVALUATION_FILE: &str = "eval_save.json";

/// What to do when one dataset item fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop the batch at the first failing item
    Abort,
    /// Log the failure and continue with the next item
    Skip,
}

pub fn full_results_path(dir: &Path, index: usize) -> PathBuf {
    dir.join(format!("full_results_{}.txt", index))
}

pub fn consolidated_results_path(dir: &Path, index: usize) -> PathBuf {
    dir.join(format!("consolidated_results_{}.txt", index))
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct BatchSummary {
    /// Dataset indices whose files were written, in order
    pub completed: Vec<usize>,
    /// Dataset indices that failed, with the error message
    pub failed: Vec<(usize, String)>,
}

/// Files and text produced for one dataset item
#[derive(Debug, Clone)]
pub struct ItemArtifacts {
    pub index: usize,
    pub presumptions_found: usize,
    pub consolidated: String,
    pub full_results: PathBuf,
    pub consolidated_results: PathBuf,
}

/// Run the pipeline and consolidation for one question and persist both texts
pub async fn process_item(
    validator: &PresumptionValidator,
    index: usize,
    question: &str,
    output_dir: &Path
) -> ValidatorResult<ItemArtifacts> {
    let report = validator.validate_prompt(question).await?;
    let consolidated = validator.consolidate(&report).await?;

    let consolidated_results = consolidated_results_path(output_dir, index);
    let full_results = full_results_path(output_dir, index);
    // The summary goes last: evaluation treats its presence as a finished item
    PresumptionValidator::save_report(&report, &full_results)?;
    PresumptionValidator::save_consolidated(&consolidated, &consolidated_results)?;

    Ok(ItemArtifacts {
        index,
        presumptions_found: report.presumptions_found(),
        consolidated,
        full_results,
        consolidated_results,
    })
}

/// Validate dataset questions `start..start + count` one after another,
/// writing a full report and a consolidated summary per index.
/// `on_item` is called after every item, failed or not.
pub async fn run_batch(
    validator: &PresumptionValidator,
    dataset: &Dataset,
    start: usize,
    count: usize,
    output_dir: &Path,
    policy: FailurePolicy,
    mut on_item: impl FnMut(usize)
) -> ValidatorResult<BatchSummary> {
    fs::create_dir_all(output_dir)?;
    let mut summary = BatchSummary::default();

    for (index, item) in dataset.range(start, count)? {
        info!("=== Validating prompt {} ({}/{}) ===", index, index - start + 1, count);
        match process_item(validator, index, &item.question, output_dir).await {
            Ok(artifacts) => {
                info!(
                    "Item {}: {} presumption(s), saved to {}",
                    index,
                    artifacts.presumptions_found,
                    artifacts.full_results.display()
                );
                summary.completed.push(index);
            }
            Err(e) if policy == FailurePolicy::Skip => {
                error!("Item {} failed, skipping: {}", index, e);
                summary.failed.push((index, e.to_string()));
            }
            Err(e) => {
                error!("Item {} failed, aborting batch: {}", index, e);
                return Err(e);
            }
        }
        on_item(index);
    }

    Ok(summary)
}

#[derive(Debug, Clone)]
pub struct EvaluationOutcome {
    /// Raw judge answers in index order; `None` where the item was skipped
    pub scores: Vec<Option<String>>,
    pub output_path: PathBuf,
}

impl EvaluationOutcome {
    pub fn tally(&self) -> ScoreTally {
        ScoreTally::from_raw(self.scores.iter().map(|s| s.as_deref()))
    }
}

async fn judge_item(
    judge: &Judge,
    question: &str,
    reference: &str,
    consolidated_path: &Path
) -> ValidatorResult<String> {
    let consolidated = fs::read_to_string(consolidated_path).map_err(|e| {
        std::io::Error::new(
            e.kind(),
            format!("Failed to read {}: {}", consolidated_path.display(), e)
        )
    })?;
    judge.score(question, reference, &consolidated).await
}

/// Score the consolidated summaries in `results_dir` against the dataset's
/// reference corrections and write the raw answers, as a JSON array in index
/// order, to `<output_dir>/eval_save.json`
pub async fn run_evaluation(
    judge: &Judge,
    dataset: &Dataset,
    start: usize,
    count: usize,
    results_dir: &Path,
    output_dir: &Path,
    policy: FailurePolicy,
    mut on_item: impl FnMut(usize)
) -> ValidatorResult<EvaluationOutcome> {
    let mut scores = Vec::with_capacity(count);

    for (index, item) in dataset.range(start, count)? {
        info!("Evaluating on item {}", index);
        let consolidated_path = consolidated_results_path(results_dir, index);
        match
            judge_item(
                judge,
                &item.question,
                &item.presupposition_correction,
                &consolidated_path
            ).await
        {
            Ok(raw) => scores.push(Some(raw)),
            Err(e) if policy == FailurePolicy::Skip => {
                error!("Judging item {} failed, recording null: {}", index, e);
                scores.push(None);
            }
            Err(e) => {
                error!("Judging item {} failed, aborting evaluation: {}", index, e);
                return Err(e);
            }
        }
        on_item(index);
    }

    fs::create_dir_all(output_dir)?;
    let output_path = output_dir.join(EVALUATION_FILE);
    fs::write(&output_path, serde_json::to_string_pretty(&scores)?)?;
    info!("Wrote {} judge score(s) to {}", scores.len(), output_path.display());

    Ok(EvaluationOutcome { scores, output_path })
}
