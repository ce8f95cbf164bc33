pub mod operator_service;
pub mod replay_coordinator;
pub mod retry_service;

pub use operator_service::{BulkSubmitSummary, HealthReport, OperatorService};
pub use replay_coordinator::{ReplayCoordinator, ReplayOutcome};
pub use retry_service::{NoRetryPolicy, RetryContext, RetryPolicy, RetryScheduler};
