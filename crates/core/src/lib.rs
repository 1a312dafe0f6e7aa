//! Domain types shared by the vidlate proxy service and job controller.
//!
//! - [`language`]: the static target-language catalog.
//! - [`upload`]: video payloads and validated upload requests.
//! - [`job`]: job identifiers, lifecycle states and the job record.
//! - [`status`]: the backend status vocabulary and snapshot wire type.
//! - [`proxy`]: the Submission Proxy / Status Proxy contracts.
//! - [`error`]: the job error taxonomy.

pub mod error;
pub mod job;
pub mod language;
pub mod proxy;
pub mod status;
pub mod types;
pub mod upload;
