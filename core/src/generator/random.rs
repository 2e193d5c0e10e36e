use alloc::vec::Vec;
use ndarray::Array2;

use super::*;

/// Uniform shuffle of the pair multiset, reproducible from its seed.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomBoardGenerator {
    seed: u64,
}

impl RandomBoardGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl BoardGenerator for RandomBoardGenerator {
    fn generate(self, config: &GameConfig) -> Result<AnswerLayout> {
        use rand::prelude::*;

        config.validate()?;

        let mut symbols: Vec<Symbol> = config
            .alphabet
            .symbols(config.pair_count())
            .flat_map(|symbol| [symbol, symbol])
            .collect();

        let mut rng = SmallRng::seed_from_u64(self.seed);
        symbols.shuffle(&mut rng);

        let side = usize::from(config.size);
        let grid = Array2::from_shape_vec((side, side), symbols)
            .map_err(|_| ConfigError::InvalidLayout)?;

        log::debug!(
            "Generated {}x{} layout with {} pairs (seed {})",
            config.size,
            config.size,
            config.pair_count(),
            self.seed
        );
        AnswerLayout::from_symbols(grid)
    }
}
