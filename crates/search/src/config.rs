use finder_core::FIELD_WIDTH;
use finder_engine::DropType;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Pieces placed along every path.
    pub max_depth: usize,
    /// Blocks must stay below this row.
    pub max_height: i32,
    pub use_hold: bool,
    pub drop: DropType,
    /// Worker threads; `None` shares rayon's global pool.
    pub threads: Option<usize>,
}

impl SearchConfig {
    /// Fill and clear `max_height` empty rows.
    pub fn perfect_clear(max_height: i32) -> Self {
        Self {
            max_depth: (max_height * FIELD_WIDTH / 4).max(0) as usize,
            max_height,
            use_hold: true,
            drop: DropType::Softdrop,
            threads: None,
        }
    }

    pub fn with_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_height(mut self, max_height: i32) -> Self {
        self.max_height = max_height;
        self
    }

    pub fn with_hold(mut self, use_hold: bool) -> Self {
        self.use_hold = use_hold;
        self
    }

    pub fn with_drop(mut self, drop: DropType) -> Self {
        self.drop = drop;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::perfect_clear(4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_clear_depth() {
        assert_eq!(SearchConfig::perfect_clear(4).max_depth, 10);
        assert_eq!(SearchConfig::perfect_clear(2).max_depth, 5);
    }

    #[test]
    fn test_builders() {
        let config = SearchConfig::default()
            .with_depth(3)
            .with_hold(false)
            .with_drop(DropType::Harddrop)
            .with_threads(2);
        assert_eq!(config.max_depth, 3);
        assert_eq!(config.max_height, 4);
        assert!(!config.use_hold);
        assert_eq!(config.drop, DropType::Harddrop);
        assert_eq!(config.threads, Some(2));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SearchConfig =
            serde_json::from_str(r#"{"max_depth": 2, "drop": "harddrop"}"#).unwrap();
        assert_eq!(config.max_depth, 2);
        assert_eq!(config.max_height, 4);
        assert!(config.use_hold);
        assert_eq!(config.drop, DropType::Harddrop);
    }
}
