mod errors;
mod statement_executor;

pub use errors::*;
pub use statement_executor::*;
