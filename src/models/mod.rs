pub mod email;
pub mod task;

pub use email::{DispatchResult, EmailRequest, JobState};
pub use task::{HealthState, HealthStatus, TaskHandle};
