use std::fs;
use std::path::Path;
use log::info;

use crate::errors::{ ValidatorError, ValidatorResult };
use crate::models::dataset::DatasetItem;

pub const VALIDATION_SPLIT: &str = "validation";

/// One split of an on-disk question/correction dataset, indexed by position
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    items: Vec<DatasetItem>,
}

impl Dataset {
    pub fn new(items: Vec<DatasetItem>) -> Self {
        Self { items }
    }

    /// Load `<dir>/<split>.jsonl`, or `<dir>/<split>.json` holding a JSON array
    pub fn load_from_disk(dir: &Path, split: &str) -> ValidatorResult<Self> {
        let jsonl_path = dir.join(format!("{}.jsonl", split));
        let json_path = dir.join(format!("{}.json", split));

        let items = if jsonl_path.is_file() {
            info!("Loading dataset split from {}", jsonl_path.display());
            parse_jsonl(&fs::read_to_string(&jsonl_path)?)?
        } else if json_path.is_file() {
            info!("Loading dataset split from {}", json_path.display());
            serde_json
                ::from_str(&fs::read_to_string(&json_path)?)
                .map_err(|e| {
                    ValidatorError::DatasetError(format!("{}: {}", json_path.display(), e))
                })?
        } else {
            return Err(
                ValidatorError::DatasetError(
                    format!("No '{}' split found in {}", split, dir.display())
                )
            );
        };

        info!("Loaded {} dataset item(s)", items.len());
        Ok(Self::new(items))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> ValidatorResult<&DatasetItem> {
        self.items
            .get(index)
            .ok_or_else(||
                ValidatorError::DatasetError(
                    format!("Index {} out of range for {} item(s)", index, self.items.len())
                )
            )
    }

    /// Items `start..start + count` paired with their dataset index, in order
    pub fn range(
        &self,
        start: usize,
        count: usize
    ) -> ValidatorResult<impl Iterator<Item = (usize, &DatasetItem)>> {
        let end = start.saturating_add(count);
        if end > self.items.len() {
            return Err(
                ValidatorError::DatasetError(
                    format!(
                        "Requested items {}..{} but the split has {}",
                        start,
                        end,
                        self.items.len()
                    )
                )
            );
        }
        Ok(self.items[start..end].iter().enumerate().map(move |(i, item)| (start + i, item)))
    }
}

fn parse_jsonl(contents: &str) -> ValidatorResult<Vec<DatasetItem>> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(n, line)| {
            serde_json
                ::from_str(line)
                .map_err(|e| ValidatorError::DatasetError(format!("line {}: {}", n + 1, e)))
        })
        .collect()
}
