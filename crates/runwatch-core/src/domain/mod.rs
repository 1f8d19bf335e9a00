//! Domain types: runs, criteria, results and errors.

pub mod criteria;
pub mod error;
pub mod result;
pub mod run;

pub use criteria::{MatchCriteria, TokenPolicy};
pub use error::{ApiError, ApiResult, CoreError, Result, WatchError};
pub use result::{WaitOutcome, WaitResult};
pub use run::{Conclusion, PipelineRun, RunId, RunStatus, Workflow, WorkflowId};
