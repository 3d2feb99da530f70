//! Injectable random source for AI decisions.

use rand::Rng;

/// Uniform samples in `[0, 1)`. Any `rand::Rng` qualifies, so a seeded
/// `StdRng` or `thread_rng()` can be handed straight to the world.
pub trait RandomSource {
    fn unit(&mut self) -> f32;

    /// `true` with probability `1 - threshold`, i.e. `unit() > threshold`.
    fn above(&mut self, threshold: f32) -> bool {
        self.unit() > threshold
    }
}

impl<R: Rng> RandomSource for R {
    fn unit(&mut self) -> f32 {
        self.gen::<f32>()
    }
}

/// Replays a fixed sequence, wrapping around at the end. An empty script
/// always yields `0.0`.
#[derive(Clone, Debug, Default)]
pub struct ScriptedRandom {
    values: Vec<f32>,
    cursor: usize,
}

impl ScriptedRandom {
    pub fn new(values: impl Into<Vec<f32>>) -> Self {
        ScriptedRandom { values: values.into(), cursor: 0 }
    }

    /// How many samples have been drawn so far.
    pub fn drawn(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedRandom {
    fn unit(&mut self) -> f32 {
        if self.values.is_empty() {
            self.cursor += 1;
            return 0.0;
        }
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        v
    }
}
