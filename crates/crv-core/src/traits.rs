use crate::error::Result;

/// Validate a curve configuration once, before any evaluation.
pub trait Validate {
    fn validate(&self) -> Result<()>;
}
