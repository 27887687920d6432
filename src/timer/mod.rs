//! Deferred, cancellable work on a logical clock.
//!
//! The only deferred transition in the game is hiding a mismatched pair
//! after the reveal delay. Scheduling it as a task with a handle lets a
//! new deal cancel it before it can touch the next board.

pub mod scheduler;

pub use scheduler::{ScheduledTask, Scheduler, TimerHandle};
