//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains all the game rules, state management, and simulation
//! logic for the 10x10 block-placement puzzle. It has **zero dependencies**
//! on UI, networking, or I/O, making it:
//!
//! - **Deterministic**: Same seed produces identical games
//! - **Testable**: Comprehensive unit tests for all game rules
//! - **Portable**: Can run in any environment (host binary, bot, headless)
//!
//! # Module Structure
//!
//! - [`board`]: 10x10 placement grid with validation and line clearing
//! - [`session`]: Complete session state including hand, score, terminal check
//! - [`shapes`]: Polyomino matrices and derived rotation sets
//! - [`selector`]: Weighted-bag piece generation with anti-repeat bias
//! - [`scoring`]: Placement and line-clear points
//! - [`rng`]: Seeded deterministic random source
//! - [`snapshot`]: Read-only state export for hosts and observers
//!
//! # Game Rules
//!
//! - **Placement**: Drop any of 3 hand pieces onto empty cells; the hand
//!   refills immediately after a piece is consumed
//! - **Clearing**: Full rows and full columns clear simultaneously, judged
//!   against a single pre-clear snapshot; no gravity
//! - **Scoring**: 1 point per placed block, plus 10/20/40/... per line
//!   cleared in one placement
//! - **Selection**: Weighted shuffled bag with duplicate suppression and a
//!   drought boost so rare pieces never disappear for long
//! - **Terminal**: The game ends when no hand piece fits anywhere
//!
//! # Example
//!
//! ```
//! use gridfall_core::GameSession;
//!
//! let mut session = GameSession::new(12345);
//! let shape = session.hand()[0].shape;
//!
//! // An empty board accepts the first piece at the origin
//! assert!(session.preview_validity(0, 0, 0));
//! let outcome = session.attempt_placement(0, 0, 0);
//! assert!(outcome.accepted);
//! assert_eq!(session.score(), shape.block_count());
//! ```

pub mod board;
pub mod rng;
pub mod scoring;
pub mod selector;
pub mod session;
pub mod shapes;
pub mod snapshot;

// Re-export commonly used types
pub use board::{Board, LineClear, BOARD_CELLS};
pub use rng::SimpleRng;
pub use scoring::{line_clear_points, placement_points};
pub use selector::{bag_copies, drought_modifier, Piece, PieceSelector};
pub use session::{GameSession, PlacementOutcome};
pub use shapes::{all_rotations, base_shape, RotationTable, Shape};
pub use snapshot::{PieceSnapshot, SessionSnapshot};
