// crates/xbe-harness/src/unique.rs
// ============================================================================
// Module: Unique Fixture Values
// Description: Collision-avoiding names, emails, and phone numbers.
// Purpose: Keep fixtures from concurrent or repeated runs apart on shared servers.
// Dependencies: rand
// ============================================================================

//! ## Overview
//! Every generator draws from one process-wide sequence, so no two values
//! handed out within a run are equal. The random parts only keep separate
//! runs against the same server apart.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::OnceLock;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use rand::Rng;

use crate::report::now_millis;

// ============================================================================
// SECTION: Generators
// ============================================================================

/// Per-process sequence; guarantees distinct values within one run.
static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Size of the subscriber-number space after `+1555`.
const MOBILE_SPACE: u64 = 10_000_000;

/// Random per-process offset into the subscriber-number space.
static MOBILE_BASE: OnceLock<u64> = OnceLock::new();

/// Returns `<millis>-<seq><6 random hex digits>`.
#[must_use]
pub fn unique_suffix() -> String {
    let sequence = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    let noise: u32 = rand::thread_rng().gen_range(0..0x0100_0000);
    format!("{}-{sequence:x}{noise:06x}", now_millis())
}

/// Returns `<prefix>-<suffix>`.
#[must_use]
pub fn unique_name(prefix: &str) -> String {
    format!("{prefix}-{}", unique_suffix())
}

/// Returns a plus-addressed, lowercased email on `example.com`.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    let local: String = prefix
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-'))
        .collect();
    let local = if local.is_empty() { "xbe-test".to_string() } else { local };
    format!("{local}+{}@example.com", unique_suffix()).to_ascii_lowercase()
}

/// Returns a `+1555` mobile number with seven digits.
///
/// The digits are a random per-process base plus the sequence, so numbers
/// repeat only after the whole seven-digit space is used up.
#[must_use]
pub fn unique_mobile() -> String {
    let base = *MOBILE_BASE.get_or_init(|| rand::thread_rng().gen_range(0..MOBILE_SPACE));
    let sequence = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    let digits = (base + sequence % MOBILE_SPACE) % MOBILE_SPACE;
    format!("+1555{digits:07}")
}
