mod opt_expr;
mod pattern;
mod rule;

pub use opt_expr::*;
pub use pattern::*;
pub use rule::*;
