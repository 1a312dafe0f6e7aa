//! Client-side job lifecycle controller.
//!
//! [`JobController`] submits one video at a time through a
//! [`SubmissionProxy`](vidlate_core::proxy::SubmissionProxy), then polls a
//! [`StatusProxy`](vidlate_core::proxy::StatusProxy) every
//! [`POLL_INTERVAL`] until the job completes, fails, or the controller is
//! torn down. Notifications are broadcast as [`JobEvent`]s.

pub mod controller;
pub mod events;

pub use controller::{JobController, POLL_INTERVAL};
pub use events::JobEvent;
