//! Pluggable randomness for the scheduler.
//!
//! Every random decision the engine makes (stage shuffles, intent choice,
//! variant choice, follow-up trigger) goes through [`RandomSource`], so a
//! session can be replayed exactly from a seed or driven by a mock.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Source of every random decision a session makes.
///
/// A session owns exactly one source for its whole lifetime and calls it in a
/// fixed order, so two sessions over the same bank and configuration make the
/// same choices whenever their sources return the same values. Production code
/// uses [`RngSource`]; tests substitute a mock to force particular choices.
#[cfg_attr(test, mockall::automock)]
pub trait RandomSource: Send {
    /// Picks an index into a collection of `len` candidates.
    ///
    /// # Arguments
    ///
    /// * `len` - Number of candidates; callers never pass zero.
    ///
    /// # Returns
    ///
    /// A value uniformly drawn from `0..len`. Callers clamp anything larger to
    /// the last candidate.
    fn pick_index(&mut self, len: usize) -> usize;

    /// Returns `true` with the given probability.
    ///
    /// Values below `0.0` behave as `0.0` and values above `1.0` as `1.0`.
    /// `NaN` never fires.
    fn chance(&mut self, probability: f64) -> bool;

    /// Applies a uniformly random permutation to `stages`.
    fn shuffle(&mut self, stages: &mut [String]);
}

/// Adapts any [`rand::Rng`] to a [`RandomSource`].
pub struct RngSource<R> {
    rng: R,
}

impl<R: Rng + Send> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngSource<StdRng> {
    /// A reproducible source: equal seeds produce equal sessions.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_os_rng())
    }
}

impl<R: Rng + Send> RandomSource for RngSource<R> {
    fn pick_index(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }

    fn chance(&mut self, probability: f64) -> bool {
        if probability.is_nan() {
            return false;
        }
        self.rng.random_bool(probability.clamp(0.0, 1.0))
    }

    fn shuffle(&mut self, stages: &mut [String]) {
        stages.shuffle(&mut self.rng);
    }
}
