use serde::{ Deserialize, Serialize };

/// One evaluation question with its ground-truth correction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetItem {
    pub question: String,
    /// Reference text explaining which presumptions in the question are false
    pub presupposition_correction: String,
}
