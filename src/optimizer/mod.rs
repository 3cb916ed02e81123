mod core;
mod errors;
mod heuristic;
mod plan_node;
mod rules;

pub use errors::*;
pub use heuristic::*;
pub use plan_node::*;
pub use rules::*;
pub use self::core::*;
