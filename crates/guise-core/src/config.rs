//! Centralized Configuration Management
//!
//! Consolidates the tunable knobs of the overlay engine into one
//! serde-friendly structure with documented defaults.

use serde::{Deserialize, Serialize};

// ----------------------------------------------------------------------------
// Name Allocation Configuration
// ----------------------------------------------------------------------------

/// Configuration for substitute-name allocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NameConfig {
    /// Random candidates tried before falling back to deterministic widening
    pub max_random_attempts: usize,
    /// Numeric suffixes tried during deterministic widening before the
    /// allocation fails with pool exhaustion
    pub max_suffix_widening: usize,
}

impl Default for NameConfig {
    fn default() -> Self {
        Self {
            max_random_attempts: 16,
            max_suffix_widening: 64,
        }
    }
}

// ----------------------------------------------------------------------------
// Skin Pool Configuration
// ----------------------------------------------------------------------------

/// Configuration for the substitute avatar pool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkinConfig {
    /// Number of avatar descriptors requested from the source at startup
    pub fetch_count: usize,
}

impl Default for SkinConfig {
    fn default() -> Self {
        Self { fetch_count: 100 }
    }
}

// ----------------------------------------------------------------------------
// Channel Configuration
// ----------------------------------------------------------------------------

/// Buffer sizes for the runtime's internal channels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Buffer size for visibility refresh requests (registry -> host context)
    pub refresh_buffer: usize,
    /// Buffer size for the overlay notification bus
    pub event_buffer: usize,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            refresh_buffer: 64,
            event_buffer: 256,
        }
    }
}

// ----------------------------------------------------------------------------
// Aggregated Configuration
// ----------------------------------------------------------------------------

/// Complete configuration for the Guise engine
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GuiseConfig {
    pub names: NameConfig,
    pub skins: SkinConfig,
    pub channels: ChannelConfig,
}
