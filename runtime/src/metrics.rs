//! Metric descriptions for the store runtime and the features built on it.
//!
//! The runtime records through the [`metrics`] facade only. Installing a
//! recorder (and choosing an exporter) is left to the binary; without one,
//! every recording is a no-op.
//!
//! # Example
//!
//! ```rust
//! use recipebook_runtime::metrics::register_metrics;
//!
//! // Once at startup, after installing a recorder.
//! register_metrics();
//! ```

use metrics::{describe_counter, describe_histogram};

// Re-export metrics macros for use in other modules
pub use metrics::{counter, gauge, histogram};

/// Actions reduced by a store
pub const ACTIONS_TOTAL: &str = "store.actions.total";
/// Time spent inside a reducer
pub const REDUCER_DURATION: &str = "store.reducer.duration_seconds";
/// Effects started, labelled by `type`
pub const EFFECTS_EXECUTED: &str = "store.effects.executed";
/// Cancellable effects aborted before completion
pub const EFFECTS_CANCELLED: &str = "store.effects.cancelled";
/// Values pushed to selection subscribers
pub const SELECTION_EMITTED: &str = "store.selection.emitted";
/// Dispatches rejected by a guard
pub const ACTIONS_REJECTED: &str = "store.actions.rejected";

/// Register all metric descriptions.
///
/// Safe to call more than once; later descriptions overwrite earlier ones.
pub fn register_metrics() {
    // Store
    describe_counter!(ACTIONS_TOTAL, "Total number of actions reduced by the store");
    describe_counter!(
        ACTIONS_REJECTED,
        "Total number of dispatches rejected before reaching the reducer"
    );
    describe_histogram!(REDUCER_DURATION, "Time taken to execute reducers");

    // Effects
    describe_counter!(EFFECTS_EXECUTED, "Total number of effects executed");
    describe_counter!(
        EFFECTS_CANCELLED,
        "Total number of cancellable effects aborted while in flight"
    );

    // Selections
    describe_counter!(
        SELECTION_EMITTED,
        "Total number of values delivered to selection subscribers"
    );
}
