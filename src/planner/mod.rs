mod errors;
mod hint;
mod statement_context;

pub use errors::*;
pub use hint::*;
pub use statement_context::*;
