use std::fmt;
use serde::{ Deserialize, Serialize };

/// Score a judge model assigns to a consolidated summary.
///
/// The judge answers in free text; `parse` classifies that text and keeps
/// anything outside the rubric as `Unparseable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JudgeScore {
    /// Fails to recognize any false presumption
    NegativeOne,
    /// Aware of the false presumptions but unclear or incomplete
    Zero,
    /// Addresses the false presumptions accurately and comprehensively
    PositiveOne,
    Unparseable,
}

impl JudgeScore {
    pub fn parse(raw: &str) -> Self {
        let mut text = raw.trim();

        // Tolerate a "Score:" label, which the rubric itself uses
        if text.get(..5).is_some_and(|label| label.eq_ignore_ascii_case("score")) {
            text = text[5..].trim_start();
            text = text.strip_prefix(':').unwrap_or(text).trim_start();
        }
        let text = text.strip_suffix('.').unwrap_or(text).trim_end();

        match text {
            "-1" => JudgeScore::NegativeOne,
            "0" => JudgeScore::Zero,
            "1" | "+1" => JudgeScore::PositiveOne,
            _ => JudgeScore::Unparseable,
        }
    }

    pub fn value(&self) -> Option<i8> {
        match self {
            JudgeScore::NegativeOne => Some(-1),
            JudgeScore::Zero => Some(0),
            JudgeScore::PositiveOne => Some(1),
            JudgeScore::Unparseable => None,
        }
    }
}

impl fmt::Display for JudgeScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value() {
            Some(value) => write!(f, "{}", value),
            None => write!(f, "unparseable"),
        }
    }
}

/// Count of judge scores per rubric value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScoreTally {
    pub negative_one: usize,
    pub zero: usize,
    pub positive_one: usize,
    pub unparseable: usize,
    /// Items whose judge call never produced text
    pub missing: usize,
}

impl ScoreTally {
    pub fn from_raw<'a>(raw_scores: impl IntoIterator<Item = Option<&'a str>>) -> Self {
        let mut tally = ScoreTally::default();
        for raw in raw_scores {
            match raw.map(JudgeScore::parse) {
                Some(JudgeScore::NegativeOne) => {
                    tally.negative_one += 1;
                }
                Some(JudgeScore::Zero) => {
                    tally.zero += 1;
                }
                Some(JudgeScore::PositiveOne) => {
                    tally.positive_one += 1;
                }
                Some(JudgeScore::Unparseable) => {
                    tally.unparseable += 1;
                }
                None => {
                    tally.missing += 1;
                }
            }
        }
        tally
    }

    pub fn scored(&self) -> usize {
        self.negative_one + self.zero + self.positive_one
    }

    /// Mean over parseable scores only
    pub fn mean(&self) -> Option<f64> {
        let scored = self.scored();
        if scored == 0 {
            return None;
        }
        let total = (self.positive_one as f64) - (self.negative_one as f64);
        Some(total / (scored as f64))
    }
}
