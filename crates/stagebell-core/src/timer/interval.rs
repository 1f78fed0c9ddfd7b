use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

/// Source of the next random reminder offset.
///
/// Drawn once per entry into a stage span: at engine start and on every
/// break-to-stage transition. A trait so tests can substitute a
/// deterministic source.
pub trait IntervalPicker: Send {
    /// Uniform draw from `[min_secs, max_secs]`, both bounds inclusive.
    fn pick(&mut self, min_secs: u64, max_secs: u64) -> u64;
}

/// Production picker backed by a PCG generator.
pub struct UniformPicker {
    rng: Pcg64,
}

impl UniformPicker {
    pub fn new() -> Self {
        Self {
            rng: Pcg64::from_entropy(),
        }
    }

    /// Deterministic picker for reproducible runs and tests.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Pcg64::seed_from_u64(seed),
        }
    }
}

impl Default for UniformPicker {
    fn default() -> Self {
        Self::new()
    }
}

impl IntervalPicker for UniformPicker {
    fn pick(&mut self, min_secs: u64, max_secs: u64) -> u64 {
        if min_secs >= max_secs {
            return min_secs;
        }
        self.rng.gen_range(min_secs..=max_secs)
    }
}

/// Always returns its fixed value. Test helper.
#[cfg(test)]
pub struct FixedPicker(pub u64);

#[cfg(test)]
impl IntervalPicker for FixedPicker {
    fn pick(&mut self, _min_secs: u64, _max_secs: u64) -> u64 {
        self.0
    }
}
