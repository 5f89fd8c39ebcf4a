//! Session module - orchestrates board, selector, hand, and score
//!
//! The session is the single owner of all engine state and the only mutation
//! point a presentation layer talks to. Every operation runs to completion
//! synchronously; a placement attempt is atomic from the caller's
//! perspective: either fully validated, committed, and scored, or rejected
//! with zero side effects. Malformed calls (bad index, blocked cell) are
//! rejected as no-ops, never as panics, since the engine is probed repeatedly
//! during interactive drags.

use arrayvec::ArrayVec;

use crate::board::{Board, BOARD_CELLS};
use crate::scoring::{line_clear_points, placement_points};
use crate::selector::{Piece, PieceSelector};
use crate::shapes::Shape;
use crate::snapshot::{PieceSnapshot, SessionSnapshot};
use gridfall_types::{ClearedCell, FamilyId, PlacementRejection, GRID_SIZE, HAND_SIZE};

/// Result of a placement attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementOutcome {
    pub accepted: bool,
    pub rejection: Option<PlacementRejection>,
    /// Cells emptied by line clears triggered by this placement
    pub cleared: ArrayVec<ClearedCell, BOARD_CELLS>,
    pub lines_cleared: u32,
    pub score_delta: u32,
    pub game_over: bool,
}

impl PlacementOutcome {
    fn rejected(reason: PlacementRejection, game_over: bool) -> Self {
        Self {
            accepted: false,
            rejection: Some(reason),
            cleared: ArrayVec::new(),
            lines_cleared: 0,
            score_delta: 0,
            game_over,
        }
    }
}

/// Complete game session: Playing -> GameOver -> (new_game) -> Playing
#[derive(Debug, Clone)]
pub struct GameSession {
    board: Board,
    selector: PieceSelector,
    hand: ArrayVec<Piece, HAND_SIZE>,
    score: u32,
    game_over: bool,
}

impl GameSession {
    /// Create a session with an empty board, zero score, and a full hand
    pub fn new(seed: u32) -> Self {
        let mut session = Self {
            board: Board::new(),
            selector: PieceSelector::new(seed),
            hand: ArrayVec::new(),
            score: 0,
            game_over: false,
        };
        session.refill_hand();
        session
    }

    /// Reset all engine state for a new game
    ///
    /// The RNG sequence continues so a restart sees fresh pieces.
    pub fn new_game(&mut self) {
        self.board.clear();
        self.selector.reset();
        self.hand.clear();
        self.score = 0;
        self.game_over = false;
        self.refill_hand();
    }

    /// The pieces currently available for placement, in hand order
    pub fn hand(&self) -> &[Piece] {
        &self.hand
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Current RNG state (continues the sequence on restart)
    pub fn seed(&self) -> u32 {
        self.selector.seed()
    }

    /// Selection diagnostics
    pub fn selector(&self) -> &PieceSelector {
        &self.selector
    }

    /// Live drag-preview check: would this placement be accepted?
    ///
    /// Read-only; safe to call on every pointer move.
    pub fn preview_validity(&self, hand_index: usize, x: i8, y: i8) -> bool {
        match self.hand.get(hand_index) {
            Some(piece) => !self.game_over && self.board.is_valid_placement(x, y, &piece.shape),
            None => false,
        }
    }

    /// Attempt to place a hand piece at the given origin
    ///
    /// On success: commits the piece, scores its blocks, replaces the hand
    /// slot, clears any completed lines, scores the clear bonus, and
    /// evaluates the terminal condition. On rejection nothing changes.
    pub fn attempt_placement(&mut self, hand_index: usize, x: i8, y: i8) -> PlacementOutcome {
        if self.game_over {
            return PlacementOutcome::rejected(PlacementRejection::InvalidPlacement, true);
        }

        let Some(&piece) = self.hand.get(hand_index) else {
            return PlacementOutcome::rejected(PlacementRejection::InvalidIndex, false);
        };

        if !self.board.is_valid_placement(x, y, &piece.shape) {
            return PlacementOutcome::rejected(PlacementRejection::InvalidPlacement, false);
        }

        self.board.place(x, y, &piece.shape, piece.family);
        let mut score_delta = placement_points(&piece.shape);

        self.hand.remove(hand_index);
        self.refill_hand();

        let clear = self.board.clear_completed_lines();
        if clear.lines > 0 {
            score_delta += line_clear_points(clear.lines);
        }
        self.score += score_delta;

        if !self.has_valid_moves() {
            self.game_over = true;
        }

        PlacementOutcome {
            accepted: true,
            rejection: None,
            cleared: clear.cells,
            lines_cleared: clear.lines,
            score_delta,
            game_over: self.game_over,
        }
    }

    /// Terminal-state check: can any hand piece be placed anywhere?
    ///
    /// Exhaustive origin scan per piece, short-circuiting on the first fit.
    pub fn has_valid_moves(&self) -> bool {
        self.hand
            .iter()
            .any(|piece| self.fits_anywhere(&piece.shape))
    }

    fn fits_anywhere(&self, shape: &Shape) -> bool {
        let max_x = GRID_SIZE - shape.width();
        let max_y = GRID_SIZE - shape.height();
        for y in 0..=max_y {
            for x in 0..=max_x {
                if self.board.is_valid_placement(x as i8, y as i8, shape) {
                    return true;
                }
            }
        }
        false
    }

    fn refill_hand(&mut self) {
        while self.hand.len() < HAND_SIZE {
            let families: ArrayVec<FamilyId, HAND_SIZE> =
                self.hand.iter().map(|p| p.family).collect();
            let piece = self.selector.next_piece(&families);
            self.hand.push(piece);
        }
    }

    /// Write the session state into a reusable snapshot buffer
    pub fn snapshot_into(&self, out: &mut SessionSnapshot) {
        self.board.write_u8_grid(&mut out.board);
        for (slot, piece) in out.hand.iter_mut().zip(self.hand.iter()) {
            *slot = PieceSnapshot::from(*piece);
        }
        out.score = self.score;
        out.game_over = self.game_over;
        out.seed = self.selector.seed();
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let mut s = SessionSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    #[cfg(test)]
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    #[cfg(test)]
    pub fn selector_mut(&mut self) -> &mut PieceSelector {
        &mut self.selector
    }

    #[cfg(test)]
    pub fn set_hand(&mut self, pieces: [Piece; HAND_SIZE]) {
        self.hand.clear();
        self.hand.extend(pieces);
    }
}
