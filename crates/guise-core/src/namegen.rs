//! Substitute display-name allocation
//!
//! A [`NameSource`] produces candidate names; the [`NameAllocator`] turns
//! candidates into a name guaranteed absent from the caller-supplied
//! exclusion set. Uniqueness is checked against the registry's live
//! reservation set at allocation time; the allocator keeps no state of its
//! own and never recycles names.

use std::collections::HashSet;

use rand_core::RngCore;
use tracing::debug;

use crate::config::NameConfig;
use crate::errors::{GuiseError, Result};

// ----------------------------------------------------------------------------
// Name Source
// ----------------------------------------------------------------------------

/// Candidate-name generator consumed by the allocator.
///
/// Implementations are expected to draw from a space much larger than the
/// concurrent population; collisions are handled by the allocator, not here.
pub trait NameSource: Send + Sync {
    /// Produce one candidate name
    fn candidate(&self) -> String;
}

impl<F> NameSource for F
where
    F: Fn() -> String + Send + Sync,
{
    fn candidate(&self) -> String {
        self()
    }
}

/// Default name source: a word from a fixed list plus two digits.
///
/// Roughly 8,000 distinct candidates, which keeps retry counts negligible
/// for realistic session populations.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordlistNameSource;

const WORDS: &[&str] = &[
    "Ghost", "Wolf", "Raven", "Falcon", "Shadow", "Ember", "Frost", "Drift",
    "Comet", "Lynx", "Viper", "Onyx", "Cinder", "Blaze", "Storm", "Vortex",
    "Echo", "Flint", "Hawk", "Jasper", "Kestrel", "Lumen", "Marten", "Nimbus",
    "Orbit", "Pike", "Quartz", "Rogue", "Sable", "Talon", "Umber", "Vesper",
    "Willow", "Zephyr", "Aspen", "Birch", "Cobalt", "Dusk", "Fable", "Grove",
    "Heron", "Iris", "Juniper", "Krait", "Larch", "Mistral", "Nova", "Oriole",
    "Petrel", "Quill", "Reef", "Sparrow", "Thistle", "Umbra", "Vale", "Wren",
    "Auric", "Basalt", "Cirrus", "Delta", "Errant", "Fjord", "Gale", "Halcyon",
    "Ingot", "Jade", "Karst", "Loam", "Mica", "Nether", "Opal", "Pumice",
    "Quasar", "Rime", "Slate", "Tundra", "Updraft", "Verdant", "Wisp", "Xenon",
];

impl NameSource for WordlistNameSource {
    fn candidate(&self) -> String {
        let mut rng = rand_core::OsRng;
        let word = WORDS[rng.next_u32() as usize % WORDS.len()];
        let digits = 10 + rng.next_u32() % 90;
        format!("{}{}", word, digits)
    }
}

// ----------------------------------------------------------------------------
// Name Allocator
// ----------------------------------------------------------------------------

/// Allocates substitute names that are collision-free against a live
/// exclusion set.
///
/// Retry-until-unique is bounded: after `max_random_attempts` random
/// candidates the allocator widens one candidate deterministically with
/// numeric suffixes, and after `max_suffix_widening` of those it fails with
/// [`GuiseError::NamePoolExhausted`] rather than looping. The bound is a
/// correctness requirement: the exclusion set grows with the concurrent
/// population.
pub struct NameAllocator {
    source: Box<dyn NameSource>,
    config: NameConfig,
}

impl NameAllocator {
    /// Create an allocator over the given candidate source
    pub fn new(source: Box<dyn NameSource>, config: NameConfig) -> Self {
        Self { source, config }
    }

    /// Create an allocator over the default wordlist source
    pub fn with_defaults() -> Self {
        Self::new(Box::new(WordlistNameSource), NameConfig::default())
    }

    /// Produce a name guaranteed not present in `excluding`.
    pub fn allocate(&self, excluding: &HashSet<String>) -> Result<String> {
        let mut last_candidate = None;
        for _ in 0..self.config.max_random_attempts {
            let candidate = self.source.candidate();
            if !excluding.contains(&candidate) {
                return Ok(candidate);
            }
            last_candidate = Some(candidate);
        }

        // Random space is too crowded; widen the last candidate with numeric
        // suffixes so termination no longer depends on the source.
        let base = last_candidate.unwrap_or_else(|| self.source.candidate());
        debug!(
            %base,
            attempts = self.config.max_random_attempts,
            "random candidates exhausted, widening with numeric suffixes"
        );
        for suffix in 2..2 + self.config.max_suffix_widening {
            let widened = format!("{}_{}", base, suffix);
            if !excluding.contains(&widened) {
                return Ok(widened);
            }
        }

        Err(GuiseError::NamePoolExhausted {
            attempts: self.config.max_random_attempts + self.config.max_suffix_widening,
        })
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
