use core::num::Saturating;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundState {
    #[default]
    AwaitingFirstFlip,
    AwaitingSecondFlip,
    /// Two tiles are face up and the pair waits for [`PlayEngine::resolve_match`].
    Resolving,
    Complete,
}

impl RoundState {
    pub const fn is_complete(self) -> bool {
        matches!(self, Self::Complete)
    }

    pub const fn is_processing(self) -> bool {
        matches!(self, Self::Resolving)
    }
}

/// Rules of a single round: flip protocol, pair evaluation and completion.
///
/// The engine never waits. A second flip leaves both tiles face up with the processing lock held, and the caller
/// decides when to call [`PlayEngine::resolve_match`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EngineParts")]
pub struct PlayEngine {
    layout: AnswerLayout,
    board: Array2<Option<Symbol>>,
    flipped: Array2<bool>,
    flipped_count: Saturating<CellCount>,
    moves: Saturating<u32>,
    first: Option<Coord2>,
    second: Option<Coord2>,
    state: RoundState,
}

impl PlayEngine {
    pub fn new(layout: AnswerLayout) -> Self {
        let size = layout.size();
        let shape = (size, size).to_nd_index();
        log::debug!("New {}x{} round with {} pairs", size, size, layout.pair_count());
        Self {
            layout,
            board: Array2::from_elem(shape, None),
            flipped: Array2::from_elem(shape, false),
            flipped_count: Saturating(0),
            moves: Saturating(0),
            first: None,
            second: None,
            state: Default::default(),
        }
    }

    /// Starts a round on a freshly generated layout.
    pub fn generate(config: &GameConfig, generator: impl BoardGenerator) -> Result<Self> {
        Ok(Self::new(generator.generate(config)?))
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn is_complete(&self) -> bool {
        self.state.is_complete()
    }

    pub fn is_processing(&self) -> bool {
        self.state.is_processing()
    }

    pub fn size(&self) -> Coord {
        self.layout.size()
    }

    pub fn move_count(&self) -> u32 {
        self.moves.0
    }

    pub fn visible_board(&self) -> &Array2<Option<Symbol>> {
        &self.board
    }

    pub fn cell_at(&self, coords: Coord2) -> Option<Symbol> {
        self.board[coords.to_nd_index()]
    }

    pub fn is_flipped(&self, coords: Coord2) -> bool {
        self.flipped[coords.to_nd_index()]
    }

    pub fn pending_pair(&self) -> (Option<Coord2>, Option<Coord2>) {
        (self.first, self.second)
    }

    pub fn total_pairs(&self) -> CellCount {
        self.layout.pair_count()
    }

    /// Pairs that are permanently face up; a pending pair is not counted.
    pub fn matched_pairs(&self) -> CellCount {
        let pending = [self.first, self.second].iter().flatten().count() as CellCount;
        (self.flipped_count.0 - pending) / 2
    }

    pub fn flip_card(&mut self, coords: Coord2) -> Result<FlipOutcome> {
        use RoundState::*;

        let coords = self.layout.validate_coords(coords)?;
        self.check_not_processing()?;
        if self.is_flipped(coords) {
            return Err(Violation::AlreadyFlipped.into());
        }

        let outcome = match self.state {
            AwaitingFirstFlip => {
                let symbol = self.reveal(coords);
                self.first = Some(coords);
                self.state = AwaitingSecondFlip;
                FlipOutcome::First(symbol)
            }
            AwaitingSecondFlip => {
                let symbol = self.reveal(coords);
                self.second = Some(coords);
                self.state = Resolving;
                FlipOutcome::Second(symbol)
            }
            Resolving => return Err(Violation::Processing.into()),
            Complete => return Err(Violation::RoundComplete.into()),
        };

        log::trace!("Flipped {:?}: {:?}", coords, outcome);
        Ok(outcome)
    }

    pub fn resolve_match(&mut self) -> Result<MatchOutcome> {
        let (Some(first), Some(second)) = (self.first, self.second) else {
            return Err(Violation::NoPairSelected.into());
        };

        self.moves += 1;

        let outcome = if self.layout[first] == self.layout[second] {
            MatchOutcome::Matched
        } else {
            self.conceal(first);
            self.conceal(second);
            MatchOutcome::Mismatched
        };
        self.first = None;
        self.second = None;

        self.state = if self.flipped_count == Saturating(self.layout.total_cells()) {
            RoundState::Complete
        } else {
            RoundState::AwaitingFirstFlip
        };

        log::debug!(
            "Move {}: {:?} {:?} -> {:?}, state {:?}",
            self.moves.0,
            first,
            second,
            outcome,
            self.state
        );
        Ok(outcome)
    }

    fn reveal(&mut self, coords: Coord2) -> Symbol {
        let symbol = self.layout[coords];
        self.board[coords.to_nd_index()] = Some(symbol);
        self.flipped[coords.to_nd_index()] = true;
        self.flipped_count += 1;
        symbol
    }

    fn conceal(&mut self, coords: Coord2) {
        self.board[coords.to_nd_index()] = None;
        self.flipped[coords.to_nd_index()] = false;
        self.flipped_count -= 1;
    }

    fn check_not_processing(&self) -> Result<()> {
        if self.state.is_processing() {
            Err(Violation::Processing.into())
        } else {
            Ok(())
        }
    }

    /// Checks that the trackers, the pending pair and the state agree with each other and with the layout.
    fn validate(&self) -> Result<()> {
        let size = self.layout.size();
        let shape = (size, size).to_nd_index();
        if self.board.shape() != shape || self.flipped.shape() != shape {
            return Err(GameError::InvalidRoundState);
        }

        let pending = [self.first, self.second];
        let mut flipped_count: CellCount = 0;
        for pos in iter_positions(size) {
            let shown = self.cell_at(pos);
            let wrong_symbol = shown.is_some_and(|symbol| symbol != self.layout[pos]);
            if shown.is_some() != self.is_flipped(pos) || wrong_symbol {
                return Err(GameError::InvalidRoundState);
            }
            if !self.is_flipped(pos) {
                continue;
            }
            flipped_count += 1;
            // matched tiles stay face up in pairs
            let matched = !pending.contains(&Some(pos));
            let partner_up = self
                .layout
                .partner_of(pos)
                .is_some_and(|partner| self.is_flipped(partner));
            if matched && !partner_up {
                return Err(GameError::InvalidRoundState);
            }
        }
        if self.flipped_count != Saturating(flipped_count) {
            return Err(GameError::InvalidRoundState);
        }

        for pos in pending.into_iter().flatten() {
            if self.layout.validate_coords(pos).is_err() || !self.is_flipped(pos) {
                return Err(GameError::InvalidRoundState);
            }
        }

        let all_flipped = flipped_count == self.layout.total_cells();
        let consistent = match (self.state, self.first, self.second) {
            (RoundState::AwaitingFirstFlip, None, None) => !all_flipped,
            (RoundState::AwaitingSecondFlip, Some(_), None) => !all_flipped,
            (RoundState::Resolving, Some(first), Some(second)) => first != second,
            (RoundState::Complete, None, None) => all_flipped,
            _ => false,
        };
        if !consistent {
            return Err(GameError::InvalidRoundState);
        }
        Ok(())
    }
}

/// Serialized form of [`PlayEngine`], checked before it becomes one.
#[derive(Deserialize)]
struct EngineParts {
    layout: AnswerLayout,
    board: Array2<Option<Symbol>>,
    flipped: Array2<bool>,
    flipped_count: Saturating<CellCount>,
    moves: Saturating<u32>,
    first: Option<Coord2>,
    second: Option<Coord2>,
    state: RoundState,
}

impl TryFrom<EngineParts> for PlayEngine {
    type Error = GameError;

    fn try_from(parts: EngineParts) -> Result<Self> {
        let engine = Self {
            layout: parts.layout,
            board: parts.board,
            flipped: parts.flipped,
            flipped_count: parts.flipped_count,
            moves: parts.moves,
            first: parts.first,
            second: parts.second,
            state: parts.state,
        };
        engine.validate()?;
        Ok(engine)
    }
}
