#[derive(thiserror::Error, Debug)]
pub enum PlannerError {
    #[error("invalid hint syntax: {0}")]
    InvalidHint(String),
}
