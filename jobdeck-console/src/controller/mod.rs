//! Controller layer
//!
//! Controllers own the console's behavior: the job run/poll/stop state
//! machine, the schedule cache and form, and the output actions. They talk to
//! the server through a `JobGateway` and draw through a `Presenter`; neither
//! is looked up globally.
//!
//! Failures never escape a controller. Each one ends in a visible render and a
//! state the operator can act from again.

pub mod lifecycle;
pub mod output;
pub mod schedule;

pub use lifecycle::{Followup, JobLifecycle};
pub use output::OutputActions;
pub use schedule::ScheduleSynchronizer;
