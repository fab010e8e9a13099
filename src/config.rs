use crate::status::MaterialRule;
use serde::{Deserialize, Serialize};

/// Per-game settings. The default plays every game to its natural end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Once this many plies are played the side to move resigns.
    /// `None` lets the game run until it ends on its own.
    pub max_plies: Option<u32>,
    /// Seed for the movers' random sources.
    pub seed: Option<u64>,
    /// Which material balances count as drawn.
    pub material: MaterialRule,
}

impl GameConfig {
    pub fn with_max_plies(mut self, max_plies: Option<u32>) -> Self {
        self.max_plies = max_plies;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_material(mut self, material: MaterialRule) -> Self {
        self.material = material;
        self
    }
}
