use crate::optimizer::OptimizerError;
use crate::planner::PlannerError;
use crate::session::ConfigurationError;

/// The statement-boundary error: whatever goes wrong during compilation, the
/// statement fails with one of these and no partial plan is handed on.
#[derive(thiserror::Error, Debug)]
pub enum CompilerError {
    #[error("planner error: {0}")]
    PlannerError(
        #[source]
        #[from]
        PlannerError,
    ),
    #[error("configuration error: {0}")]
    ConfigurationError(
        #[source]
        #[from]
        ConfigurationError,
    ),
    #[error("optimizer error: {0}")]
    OptimizerError(
        #[source]
        #[from]
        OptimizerError,
    ),
}
