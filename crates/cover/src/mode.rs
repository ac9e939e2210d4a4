//! What a replay must achieve besides placing every operation.

use std::str::FromStr;

use finder_core::{ParseError, SpinType};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverMode {
    /// Any build order that places every operation.
    #[default]
    Normal,
    /// Some T locks with a spin.
    #[serde(rename = "anytspin")]
    AnyTSpin,
    /// Some T locks as a full T-spin clearing at least one line.
    #[serde(rename = "tss")]
    TSpinSingle,
    #[serde(rename = "tsd")]
    TSpinDouble,
    #[serde(rename = "tst")]
    TSpinTriple,
    /// Some placement clears four lines.
    Tetris,
    /// The last placement clears four lines.
    #[serde(rename = "tetrisend")]
    TetrisEnd,
    /// Every line clear keeps back-to-back: four lines or a T-spin.
    #[serde(rename = "b2b")]
    B2BContinuous,
}

impl CoverMode {
    pub fn name(self) -> &'static str {
        match self {
            CoverMode::Normal => "normal",
            CoverMode::AnyTSpin => "anytspin",
            CoverMode::TSpinSingle => "tss",
            CoverMode::TSpinDouble => "tsd",
            CoverMode::TSpinTriple => "tst",
            CoverMode::Tetris => "tetris",
            CoverMode::TetrisEnd => "tetrisend",
            CoverMode::B2BContinuous => "b2b",
        }
    }

    fn required_tspin(self) -> Option<u32> {
        match self {
            CoverMode::AnyTSpin => Some(0),
            CoverMode::TSpinSingle => Some(1),
            CoverMode::TSpinDouble => Some(2),
            CoverMode::TSpinTriple => Some(3),
            _ => None,
        }
    }

    /// Whether a lock clearing `lines` rows needs its spin looked up.
    pub(crate) fn needs_spin(self, lines: u32) -> bool {
        match self {
            CoverMode::AnyTSpin => true,
            CoverMode::TSpinSingle
            | CoverMode::TSpinDouble
            | CoverMode::TSpinTriple
            | CoverMode::B2BContinuous => lines > 0,
            _ => false,
        }
    }
}

impl FromStr for CoverMode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mode = match s.trim().to_ascii_lowercase().as_str() {
            "normal" => CoverMode::Normal,
            "b2b" => CoverMode::B2BContinuous,
            "any" | "any-tspin" | "anytspin" | "tspin0" => CoverMode::AnyTSpin,
            "tss" | "tspin1" => CoverMode::TSpinSingle,
            "tsd" | "tspin2" => CoverMode::TSpinDouble,
            "tst" | "tspin3" => CoverMode::TSpinTriple,
            "tetris" => CoverMode::Tetris,
            "tetris-end" | "tetrisend" => CoverMode::TetrisEnd,
            _ => {
                return Err(ParseError::UnknownName {
                    kind: "cover mode",
                    name: s.to_string(),
                })
            }
        };
        Ok(mode)
    }
}

/// Conditions on a replay.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverRules {
    pub mode: CoverMode,
    /// Only the last this many placements may use the drop rule; earlier ones
    /// must hard drop. `None` lifts the limit.
    pub last_softdrop: Option<usize>,
    /// Line clears at the start of a back-to-back run that may be plain.
    pub starting_b2b: usize,
}

/// One locked piece, as the mode sees it.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Lock {
    pub lines: u32,
    pub spin: SpinType,
    pub last: bool,
}

/// What a replay has achieved so far.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Progress {
    achieved: bool,
    clears: usize,
}

impl CoverRules {
    pub fn new(mode: CoverMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn with_last_softdrop(mut self, pieces: usize) -> Self {
        self.last_softdrop = Some(pieces);
        self
    }

    pub fn with_starting_b2b(mut self, clears: usize) -> Self {
        self.starting_b2b = clears;
        self
    }

    /// May placement `depth` of `total` use the drop rule?
    pub(crate) fn allows_softdrop(&self, depth: usize, total: usize) -> bool {
        self.last_softdrop.map_or(true, |last| depth + last >= total)
    }

    /// Fold one lock into `progress`; `None` when the lock breaks the mode.
    pub(crate) fn advance(&self, progress: Progress, lock: Lock) -> Option<Progress> {
        let Progress { achieved, clears } = progress;
        let clears = clears + usize::from(lock.lines > 0);
        let achieved = match self.mode {
            CoverMode::Normal => true,
            CoverMode::Tetris => achieved || lock.lines == 4,
            CoverMode::TetrisEnd => {
                if lock.last && lock.lines != 4 {
                    return None;
                }
                lock.last
            }
            CoverMode::B2BContinuous => {
                let keeps = lock.lines == 4 || lock.spin != SpinType::None;
                if lock.lines > 0 && !keeps && clears > self.starting_b2b {
                    return None;
                }
                true
            }
            mode => {
                let min_lines = mode.required_tspin().unwrap_or_default();
                achieved || lock.spin.is_tspin(lock.lines, min_lines)
            }
        };
        Some(Progress { achieved, clears })
    }

    pub(crate) fn is_met(&self, progress: Progress) -> bool {
        self.mode == CoverMode::Normal || progress.achieved
    }
}
