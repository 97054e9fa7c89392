//! Assignment algorithms: greedy insertion, the locking gate, and the
//! multi-pass reassignment pipeline.
//!
//! All three operate on the fleet registry and look bookings up by id on the
//! board. The pipeline mutates a cloned registry and swaps it in whole, so a
//! half-finished pass can never leak into observable state.

pub mod greedy;
pub mod locking;
pub mod pipeline;

pub use greedy::{greedy_pass, insertion_delta, reaches_in_time, AssignContext, ClassRule};
pub use locking::{run_lock_gate, LockBoard};
pub use pipeline::{run_final_sweep, run_reassignment, PipelineOutcome};
