use serde::{Deserialize, Serialize};

const EASY_MAX_SIZE: usize = 11;
const NORMAL_MAX_SIZE: usize = 17;

pub const DIFFICULTIES: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
}

impl Difficulty {
    /// Classify a grid size into a tier.
    pub fn from_size(size: usize) -> Self {
        if size <= EASY_MAX_SIZE {
            Difficulty::Easy
        } else if size <= NORMAL_MAX_SIZE {
            Difficulty::Normal
        } else {
            Difficulty::Hard
        }
    }

    /// Grid side length used when starting a game at this tier.
    pub fn grid_size(self) -> usize {
        match self {
            Difficulty::Easy => 11,
            Difficulty::Normal => 17,
            Difficulty::Hard => 21,
        }
    }

    /// Minimum shortest-path length as a fraction of the grid diagonal.
    pub fn quality_threshold(self) -> f32 {
        match self {
            Difficulty::Easy => 0.4,
            Difficulty::Normal => 0.5,
            Difficulty::Hard => 0.6,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Difficulty::Easy),
            "normal" => Ok(Difficulty::Normal),
            "hard" => Ok(Difficulty::Hard),
            other => {
                let expected = DIFFICULTIES.map(|d| format!("'{}'", d)).join(", ");
                Err(format!(
                    "'{}' is not a difficulty (expected one of {})",
                    other, expected
                ))
            }
        }
    }
}
