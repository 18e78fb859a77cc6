use crate::config::ValidatorConfig;
use crate::errors::ValidatorError;
use crate::implementations::claim_extractor::{ parse_claim_lines, ClaimExtractor };
use crate::models::claim::Claim;
use crate::tests::support::{ model_failure, setup, FakeModel };

#[test]
fn numbered_list_is_stripped_in_order() {
    let claims = parse_claim_lines("1. Is X true?\n2. Does Y cause Z?");
    assert_eq!(claims, vec!["Is X true?", "Does Y cause Z?"]);
}

#[test]
fn sentinel_wins_over_list_lines() {
    let response = "1. Is X true?\nNo presumptions found.\n2. Does Y cause Z?";
    assert!(parse_claim_lines(response).is_empty());
    assert!(parse_claim_lines("No presumptions found.").is_empty());
}

#[test]
fn preamble_and_headers_are_discarded() {
    let response =
        "Here are the presumptions to check:\n\n\
        Presumptions:\n\
        1. Is advanced lymphoma untreatable?\n\
        \n\
        These need verification.";
    assert_eq!(parse_claim_lines(response), vec!["Is advanced lymphoma untreatable?"]);
}

#[test]
fn bullets_and_parenthesised_numbers() {
    let response = "- Is A safe?\n• Does B work?\n3) Is C common?\n  10. Is D rare?  ";
    assert_eq!(parse_claim_lines(response), vec![
        "Is A safe?",
        "Does B work?",
        "Is C common?",
        "Is D rare?",
    ]);
}

#[test]
fn bare_markers_are_dropped() {
    assert!(parse_claim_lines("1.\n-\n•  \n2)").is_empty());
}

#[test]
fn marker_run_eats_leading_numbers_in_the_claim() {
    // The prefix run includes digits and dots, so a leading quantity is lost
    assert_eq!(parse_claim_lines("- 2.5 mg is a safe dose?"), vec!["mg is a safe dose?"]);
}

#[test]
fn non_ascii_digit_opens_a_claim_line() {
    // Only ASCII markers are stripped, so the full-width numeral stays
    assert_eq!(parse_claim_lines("１. Is X true?\n٣. Is Y true?"), vec!["１. Is X true?", "٣. Is Y true?"]);
}

#[test]
fn lines_starting_with_other_markers_are_ignored() {
    assert!(parse_claim_lines("* Is X true?\n# Is Y true?\nQ: Is Z true?").is_empty());
}

#[tokio::test]
async fn extract_sends_prompt_with_extraction_cap() {
    setup();
    let model = FakeModel::answering("1. Is Stage IV lymphoma always untreatable?");
    let extractor = ClaimExtractor::from_config(&ValidatorConfig::default(), model.clone()).unwrap();

    let claims = extractor.extract("Stage IV lymphoma is always untreatable.").await.unwrap();

    assert_eq!(claims, vec![Claim::new("Is Stage IV lymphoma always untreatable?")]);
    assert_eq!(model.call_count(), 1);
    assert!(model.prompts()[0].contains("User prompt:\nStage IV lymphoma is always untreatable."));
    assert_eq!(model.max_tokens(), vec![1024]);
}

#[tokio::test]
async fn extract_propagates_model_failure() {
    setup();
    let model = FakeModel::new(|_| Err(model_failure()));
    let extractor = ClaimExtractor::from_config(&ValidatorConfig::default(), model).unwrap();

    let result = extractor.extract("Is chemo always needed?").await;
    assert!(matches!(result, Err(ValidatorError::ExternalServiceError { .. })));
}
