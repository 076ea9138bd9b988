//! Substitute avatar pool
//!
//! Holds the bounded collection of avatar descriptors prefetched at startup
//! and hands one out at random per disguise. Selection is uniform with
//! replacement: the same descriptor may back several simultaneous disguises,
//! which is accepted since avatar collision is cosmetically harmless while
//! name collision is not.

use rand_core::RngCore;

use crate::errors::{GuiseError, Result};
use crate::profile::AvatarDescriptor;

/// Bounded, immutable pool of substitute avatar descriptors.
#[derive(Debug, Default)]
pub struct SkinPool {
    descriptors: Vec<AvatarDescriptor>,
}

impl SkinPool {
    /// Populate the pool once from the external fetch result.
    pub fn new(descriptors: Vec<AvatarDescriptor>) -> Self {
        Self { descriptors }
    }

    /// An empty pool, used when the fetch source was unavailable.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of descriptors in the pool
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether the pool holds no descriptors
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Pick a descriptor uniformly at random, with replacement.
    ///
    /// Fails with [`GuiseError::EmptyPool`] if the pool never got populated;
    /// callers treat that as non-fatal and fall back to
    /// [`AvatarDescriptor::placeholder`].
    pub fn random_pick(&self) -> Result<AvatarDescriptor> {
        if self.descriptors.is_empty() {
            return Err(GuiseError::EmptyPool);
        }
        let index = rand_core::OsRng.next_u32() as usize % self.descriptors.len();
        Ok(self.descriptors[index].clone())
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
