//! Selector module - weighted-bag piece generation
//!
//! Produces the next piece so that shape variety feels fair: common families
//! appear often, rare families stay rare without vanishing, immediate
//! duplicates in the hand are discouraged, and long droughts of any family
//! are corrected.
//!
//! The bag holds `max(1, round(weight * 4))` copies of each family id,
//! shuffled, and is drawn from without replacement until empty. Each draw
//! runs up to three accept/reject attempts against a final weight of
//! `base * 0.4^(duplicates in hand) * drought modifier`, with the third
//! attempt accepting unconditionally. This bounds selection cost to O(3)
//! while biasing long-run frequency toward the base weights.

use arrayvec::ArrayVec;

use crate::rng::SimpleRng;
use crate::shapes::{RotationTable, Shape};
use gridfall_types::{
    FamilyId, BAG_COPIES_SCALE, DROUGHT_BOOST_STEP, DROUGHT_GRACE_PICKS, DUPLICATE_PENALTY,
    MAX_PICK_ATTEMPTS, PICK_HISTORY_CAP,
};

/// An instantiated drawable unit: a family in one concrete rotation
///
/// Ephemeral: created when drawn into the hand, destroyed when placed.
/// The display color is fixed per family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub family: FamilyId,
    pub shape: Shape,
}

impl Piece {
    pub fn color(&self) -> &'static str {
        self.family.color()
    }

    pub fn block_count(&self) -> u32 {
        self.shape.block_count()
    }
}

/// Number of copies of a family in a freshly refilled bag
pub fn bag_copies(family: FamilyId) -> usize {
    ((family.weight() * BAG_COPIES_SCALE).round() as usize).max(1)
}

/// Probability boost for a family that has gone unseen
///
/// No boost until the family has missed `DROUGHT_GRACE_PICKS` picks, then a
/// linear increase per further miss.
pub fn drought_modifier(drought: u32) -> f32 {
    1.0 + drought.saturating_sub(DROUGHT_GRACE_PICKS) as f32 * DROUGHT_BOOST_STEP
}

/// Weighted non-repeating piece source
#[derive(Debug, Clone)]
pub struct PieceSelector {
    /// Shuffled multiset of family ids remaining before the next refill
    bag: Vec<FamilyId>,
    /// Picks since each family was last chosen
    drought: [u32; FamilyId::COUNT],
    /// Bounded history of accepted picks (diagnostics only)
    history: ArrayVec<FamilyId, PICK_HISTORY_CAP>,
    rotations: RotationTable,
    rng: SimpleRng,
}

impl PieceSelector {
    /// Create a selector with the given RNG seed
    pub fn new(seed: u32) -> Self {
        Self {
            bag: Vec::new(),
            drought: [0; FamilyId::COUNT],
            history: ArrayVec::new(),
            rotations: RotationTable::new(),
            rng: SimpleRng::new(seed),
        }
    }

    /// Reset selection state for a new game
    ///
    /// The RNG keeps advancing so a restarted game sees a fresh sequence.
    pub fn reset(&mut self) {
        self.bag.clear();
        self.drought = [0; FamilyId::COUNT];
        self.history.clear();
    }

    fn refill_bag(&mut self) {
        for family in FamilyId::ALL {
            for _ in 0..bag_copies(family) {
                self.bag.push(family);
            }
        }
        self.rng.shuffle(&mut self.bag);
    }

    /// Pick the next family given the families currently in the hand
    pub fn pick_family(&mut self, hand: &[FamilyId]) -> FamilyId {
        if self.bag.is_empty() {
            self.refill_bag();
        }

        let family = 'pick: {
            for _ in 0..MAX_PICK_ATTEMPTS - 1 {
                let idx = self.rng.next_range(self.bag.len() as u32) as usize;
                let candidate = self.bag[idx];

                let duplicates = hand.iter().filter(|&&f| f == candidate).count();
                let final_weight = candidate.weight()
                    * DUPLICATE_PENALTY.powi(duplicates as i32)
                    * drought_modifier(self.drought[candidate.index()]);

                if self.rng.next_unit() < final_weight {
                    break 'pick self.bag.remove(idx);
                }
            }

            // Final attempt accepts unconditionally
            let idx = self.rng.next_range(self.bag.len() as u32) as usize;
            self.bag.remove(idx)
        };

        for other in FamilyId::ALL {
            if other == family {
                self.drought[other.index()] = 0;
            } else {
                self.drought[other.index()] += 1;
            }
        }

        if self.history.len() == PICK_HISTORY_CAP {
            self.history.remove(0);
        }
        self.history.push(family);

        family
    }

    /// Draw the next piece: a picked family in a uniformly random rotation
    pub fn next_piece(&mut self, hand: &[FamilyId]) -> Piece {
        let family = self.pick_family(hand);
        let rotations = self.rotations.rotations(family);
        let idx = self.rng.next_range(rotations.len() as u32) as usize;

        Piece {
            family,
            shape: rotations[idx],
        }
    }

    /// Family ids left in the bag before the next refill
    pub fn bag_remaining(&self) -> usize {
        self.bag.len()
    }

    /// Picks since `family` was last chosen
    pub fn drought(&self, family: FamilyId) -> u32 {
        self.drought[family.index()]
    }

    /// Recent accepted picks, oldest first
    pub fn history(&self) -> &[FamilyId] {
        &self.history
    }

    /// Precomputed rotation sets
    pub fn rotation_table(&self) -> &RotationTable {
        &self.rotations
    }

    /// Current RNG state (for restarting with the same sequence)
    pub fn seed(&self) -> u32 {
        self.rng.state()
    }

    /// Current bag contents for testing/debugging
    #[cfg(test)]
    pub fn current_bag(&self) -> &[FamilyId] {
        &self.bag
    }

    /// Remove every copy of a family from the bag (test scaffolding)
    #[cfg(test)]
    pub fn remove_family_from_bag(&mut self, family: FamilyId) {
        self.bag.retain(|&f| f != family);
    }
}
