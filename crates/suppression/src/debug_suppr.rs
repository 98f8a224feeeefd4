//! Structured tracing for suppression reading and evaluation.
//!
//! Every function is compiled to an inline no-op unless the `tracing` feature
//! is enabled. Events are emitted at debug level under the
//! `abi::suppression` target.

/// Target name for tracing events.
#[cfg(feature = "tracing")]
const SUPPRESSION_TARGET: &str = "abi::suppression";

// ============================================================================
// Reading
// ============================================================================

/// Traces a section accepted as a suppression.
#[cfg(feature = "tracing")]
#[inline]
pub fn trace_section_accepted(section: &str, line: usize, label: &str) {
    tracing::debug!(
        target: SUPPRESSION_TARGET,
        section = %section,
        line = line,
        label = %label,
        "section_accepted"
    );
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub fn trace_section_accepted(_section: &str, _line: usize, _label: &str) {}

/// Traces a rejected section.
#[cfg(feature = "tracing")]
#[inline]
pub fn trace_section_rejected(error: &crate::SectionError) {
    tracing::debug!(
        target: SUPPRESSION_TARGET,
        section = %error.section(),
        line = error.line(),
        reason = %error.kind(),
        "section_rejected"
    );
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub fn trace_section_rejected(_error: &crate::SectionError) {}

/// Traces a recoverable problem in an accepted section.
#[cfg(feature = "tracing")]
#[inline]
pub fn trace_warning(warning: &crate::SuppressionWarning) {
    tracing::warn!(target: SUPPRESSION_TARGET, warning = %warning, "section_warning");
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub fn trace_warning(_warning: &crate::SuppressionWarning) {}

// ============================================================================
// Evaluation
// ============================================================================

/// Traces a suppression matching an artifact or a diff node.
///
/// * `kind` - The section kind, e.g. `suppress_function`.
/// * `label` - The suppression label, possibly empty.
/// * `subject` - What was matched: a name, a path or a diff description.
#[cfg(feature = "tracing")]
#[inline]
pub fn trace_suppressed(kind: &str, label: &str, subject: &str) {
    tracing::debug!(
        target: SUPPRESSION_TARGET,
        kind = %kind,
        label = %label,
        subject = %subject,
        "suppressed"
    );
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub fn trace_suppressed(_kind: &str, _label: &str, _subject: &str) {}

/// Traces a generated suppression.
#[cfg(feature = "tracing")]
#[inline]
pub fn trace_generated(label: &str, entries: usize) {
    tracing::debug!(
        target: SUPPRESSION_TARGET,
        label = %label,
        entries = entries,
        "suppression_generated"
    );
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub fn trace_generated(_label: &str, _entries: usize) {}
