use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::PlanError;

/// Supplies whole-second segment lengths to the planner.
///
/// Implementations should return a value in `min..=max`; the planner clamps
/// anything outside that range.
pub trait LengthSource {
    fn next_length(&mut self, min: u32, max: u32) -> u32;
}

impl<S: LengthSource + ?Sized> LengthSource for &mut S {
    fn next_length(&mut self, min: u32, max: u32) -> u32 {
        (**self).next_length(min, max)
    }
}

/// Uniform integer draws from an RNG
#[derive(Debug, Clone)]
pub struct RandomLengths<R = StdRng> {
    rng: R,
}

impl RandomLengths<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> RandomLengths<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> LengthSource for RandomLengths<R> {
    fn next_length(&mut self, min: u32, max: u32) -> u32 {
        self.rng.gen_range(min..=max)
    }
}

/// Replays a fixed list of draws, wrapping around when exhausted
#[derive(Debug, Clone)]
pub struct ScriptedLengths {
    draws: Vec<u32>,
    cursor: usize,
}

impl ScriptedLengths {
    pub fn new(draws: Vec<u32>) -> Result<Self, PlanError> {
        if draws.is_empty() {
            return Err(PlanError::InvalidArgument(
                "scripted lengths need at least one draw".to_string(),
            ));
        }
        Ok(Self { draws, cursor: 0 })
    }

    /// Number of draws handed out so far
    pub fn consumed(&self) -> usize {
        self.cursor
    }
}

impl LengthSource for ScriptedLengths {
    fn next_length(&mut self, _min: u32, _max: u32) -> u32 {
        let draw = self.draws[self.cursor % self.draws.len()];
        self.cursor += 1;
        draw
    }
}
