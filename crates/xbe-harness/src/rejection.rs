// crates/xbe-harness/src/rejection.rs
// ============================================================================
// Module: Rejection Classification
// Description: Maps server rejection text onto a small typed taxonomy.
// Purpose: Tell expected server-side refusals apart from genuine failures.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Neither the CLI nor the API exposes structured error codes on stdout, so
//! rejections are recognized by substrings of the captured output.
//! [`classify`] finds the first matching kind in a fixed order, and a
//! [`RejectionPolicy`] decides whether that kind counts as pass or skip for
//! a given check. Unclassified failures are always failures.

// ============================================================================
// SECTION: Types
// ============================================================================

/// Recognized rejection kinds, in classification order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// Authentication or authorization refusal.
    NotAuthorized,
    /// Validation failure (422 / Record Invalid).
    Unprocessable,
    /// Conflict with existing state (409).
    Conflict,
    /// Missing resource (404).
    NotFound,
}

impl Rejection {
    /// Every kind, in classification order.
    pub const ALL: [Self; 4] =
        [Self::NotAuthorized, Self::Unprocessable, Self::Conflict, Self::NotFound];

    /// Substrings that identify this kind.
    #[must_use]
    pub const fn markers(self) -> &'static [&'static str] {
        match self {
            Self::NotAuthorized => &["Not Authorized", "not authorized", "401", "403", "Forbidden"],
            Self::Unprocessable => &["422", "Record Invalid", "Unprocessable"],
            Self::Conflict => &["409", "Conflict"],
            Self::NotFound => &["404", "Not Found", "not found"],
        }
    }

    /// Stable label for messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotAuthorized => "not authorized",
            Self::Unprocessable => "unprocessable",
            Self::Conflict => "conflict",
            Self::NotFound => "not found",
        }
    }
}

/// Returns the first rejection kind whose markers occur in `text`.
#[must_use]
pub fn classify(text: &str) -> Option<Rejection> {
    Rejection::ALL
        .into_iter()
        .find(|kind| kind.markers().iter().any(|marker| text.contains(marker)))
}

/// What a tolerated rejection counts as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tolerance {
    /// The rejection is the expected server behavior.
    Pass,
    /// The environment cannot exercise this check.
    Skip,
}

/// Verdict for one observed CLI/API result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Record a pass.
    Pass,
    /// Record a pass noting the tolerated rejection.
    PassTolerated(Rejection),
    /// Record a skip for the tolerated rejection.
    Skip(Rejection),
    /// Record a failure.
    Fail,
}

/// Rejection kinds tolerated by a single check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RejectionPolicy {
    /// Tolerated kinds and how they count.
    rules: Vec<(Rejection, Tolerance)>,
}

impl RejectionPolicy {
    /// Policy that tolerates nothing.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            rules: Vec::new(),
        }
    }

    /// Permission and validation refusals mean the environment cannot run
    /// the check; they are skipped.
    #[must_use]
    pub fn skip_unavailable() -> Self {
        Self::strict()
            .tolerate(Rejection::NotAuthorized, Tolerance::Skip)
            .tolerate(Rejection::Unprocessable, Tolerance::Skip)
    }

    /// Adds or replaces the tolerance for `kind`.
    #[must_use]
    pub fn tolerate(mut self, kind: Rejection, tolerance: Tolerance) -> Self {
        self.rules.retain(|(existing, _)| *existing != kind);
        self.rules.push((kind, tolerance));
        self
    }

    /// Decides the verdict for a result.
    #[must_use]
    pub fn judge(&self, succeeded: bool, output: &str) -> Verdict {
        if succeeded {
            return Verdict::Pass;
        }
        let Some(kind) = classify(output) else {
            return Verdict::Fail;
        };
        match self.rules.iter().find(|(existing, _)| *existing == kind) {
            Some((_, Tolerance::Pass)) => Verdict::PassTolerated(kind),
            Some((_, Tolerance::Skip)) => Verdict::Skip(kind),
            None => Verdict::Fail,
        }
    }
}
