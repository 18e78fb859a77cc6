use crate::errors::ValidatorError;
use crate::implementations::presumption_validator::PresumptionValidator;
use crate::models::claim::Claim;
use crate::models::report::{ ValidationReport, Verdict };
use crate::tests::support::{
    is_adjudication,
    model_failure,
    setup,
    stage_answer,
    validator,
    FakeModel,
    FakeRetriever,
};

const THREE_CLAIMS: &str =
    "Here are the presumptions:\n1. Is lymphoma at an advanced stage untreatable?\n2. Is treatment withheld for 70-year-olds?\n3. Do companions decide on treatment?";

#[tokio::test]
async fn claims_and_verdicts_stay_aligned() {
    setup();
    let model = FakeModel::pipeline(THREE_CLAIMS);
    let validator = validator(model.clone(), None);

    let report = validator.validate_prompt("My mom has advanced lymphoma...").await.unwrap();

    assert_eq!(report.presumptions_found(), 3);
    assert_eq!(report.claims().len(), report.verdicts().len());
    for (claim, verdict) in report.claims().iter().zip(report.verdicts()) {
        assert_eq!(claim.text(), verdict.claim.text());
    }
    assert_eq!(report.claims()[1].text(), "Is treatment withheld for 70-year-olds?");

    // One extraction, then one adjudication per claim in order
    let prompts = model.prompts();
    assert_eq!(prompts.len(), 4);
    for (i, claim) in report.claims().iter().enumerate() {
        assert!(is_adjudication(&prompts[i + 1]));
        assert!(prompts[i + 1].contains(claim.text()));
    }
}

#[tokio::test]
async fn lymphoma_end_to_end_without_search() {
    setup();
    let model = FakeModel::pipeline("1. Is Stage IV lymphoma always untreatable?");
    let validator = validator(model, None);

    let report = validator.validate_prompt("Stage IV lymphoma is always untreatable.").await.unwrap();

    assert_eq!(report.presumptions_found(), 1);
    assert!(!report.used_web_search());
    let verdict = &report.verdicts()[0];
    assert_eq!(verdict.claim.text(), "Is Stage IV lymphoma always untreatable?");
    assert!(!verdict.narrative.is_empty());
    assert!(!verdict.used_retrieval);
}

#[tokio::test]
async fn web_search_flag_applies_to_every_verdict() {
    setup();
    let validator = validator(FakeModel::pipeline(THREE_CLAIMS), Some(FakeRetriever::with_results(2)));

    let report = validator.validate_prompt("prompt").await.unwrap();

    assert!(report.used_web_search());
    assert!(report.verdicts().iter().all(|v| v.used_retrieval && v.evidence.len() == 2));
}

#[tokio::test]
async fn sentinel_yields_empty_report_after_one_call() {
    setup();
    let model = FakeModel::pipeline("No presumptions found.\n1. stray line");
    let validator = validator(model.clone(), None);

    let report = validator.validate_prompt("What time is it?").await.unwrap();

    assert_eq!(report.presumptions_found(), 0);
    assert!(report.verdicts().is_empty());
    assert_eq!(model.call_count(), 1);
}

#[tokio::test]
async fn adjudication_failure_aborts_the_run() {
    setup();
    let model = FakeModel::new(|prompt| {
        if prompt.contains("Is treatment withheld") {
            Err(model_failure())
        } else {
            Ok(stage_answer(prompt, THREE_CLAIMS))
        }
    });
    let validator = validator(model.clone(), None);

    let result = validator.validate_prompt("prompt").await;

    assert!(matches!(result, Err(ValidatorError::ExternalServiceError { .. })));
    // The third claim is never attempted
    assert_eq!(model.call_count(), 3);
}

#[tokio::test]
async fn render_is_deterministic_and_complete() {
    setup();
    let validator = validator(FakeModel::pipeline(THREE_CLAIMS), Some(FakeRetriever::with_results(1)));
    let report = validator.validate_prompt("My mom has advanced lymphoma...").await.unwrap();

    let first = report.render();
    let second = report.render();
    assert_eq!(first, second);
    assert_eq!(first, report.to_string());

    assert!(first.contains("PRESUMPTION VALIDATION REPORT"));
    assert!(first.contains("(Using real-time web search)"));
    assert!(first.contains("ORIGINAL PROMPT:\n"));
    assert!(first.contains("PRESUMPTIONS FOUND: 3"));
    assert!(first.contains("\n2. PRESUMPTION:\n"));
    assert!(first.contains("SOURCES FOUND:"));
    assert!(first.contains("  1. Source 1\n     https://example.org/article-1"));
    assert!(first.contains("FACT-CHECK:"));
}

#[tokio::test]
async fn render_without_search_omits_sources() {
    setup();
    let validator = validator(FakeModel::pipeline("1. Is X true?"), None);
    let report = validator.validate_prompt("X is true.").await.unwrap();

    let text = report.render();
    assert!(text.contains("(Using model knowledge only - no web search)"));
    assert!(!text.contains("SOURCES FOUND:"));
}

#[tokio::test]
async fn consolidation_embeds_rendered_report() {
    setup();
    let model = FakeModel::pipeline(THREE_CLAIMS);
    let validator = validator(model.clone(), None);
    let report = validator.validate_prompt("prompt").await.unwrap();

    let summary = validator.consolidate(&report).await.unwrap();

    assert_eq!(summary, "Inaccurate presumption: advanced stage does not mean no treatment.");
    let prompts = model.prompts();
    let last = prompts.last().unwrap();
    assert!(last.starts_with("Create a concise version"));
    assert!(last.contains(&report.render()));
    assert_eq!(*model.max_tokens().last().unwrap(), 2048);
}

#[tokio::test]
async fn saved_files_hold_rendered_text() {
    setup();
    let validator = validator(FakeModel::pipeline("1. Is X true?"), None);
    let report = validator.validate_prompt("X is true.").await.unwrap();
    let dir = tempfile::tempdir().unwrap();

    let report_path = dir.path().join("nested").join("full_results_0.txt");
    PresumptionValidator::save_report(&report, &report_path).unwrap();
    let summary_path = dir.path().join("consolidated_results_0.txt");
    PresumptionValidator::save_consolidated("summary text", &summary_path).unwrap();

    assert_eq!(std::fs::read_to_string(report_path).unwrap(), report.render());
    assert_eq!(std::fs::read_to_string(summary_path).unwrap(), "summary text");
}

#[test]
fn report_rejects_misaligned_verdicts() {
    let verdict = Verdict {
        claim: Claim::new("Is Y true?"),
        narrative: "No.".to_string(),
        evidence: vec![],
        used_retrieval: false,
    };

    let mismatched = ValidationReport::new("p", vec![Claim::new("Is X true?")], vec![verdict.clone()], false);
    assert!(matches!(mismatched, Err(ValidatorError::InvalidInput(_))));

    let short = ValidationReport::new("p", vec![Claim::new("Is Y true?"), Claim::new("Z?")], vec![verdict], false);
    assert!(matches!(short, Err(ValidatorError::InvalidInput(_))));
}
