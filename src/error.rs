use thiserror::Error;

use crate::models::Outcome;

/// Why a resolution stage produced no value.
#[derive(Debug, Error)]
pub enum Unresolved {
    /// The looked-up thing does not exist (no repository, no license file, no
    /// registry record, no search hit).
    #[error("not found: {0}")]
    NotFound(String),
    /// The oracle gave no usable answer within its retry budget.
    #[error("oracle gave no answer while {0}")]
    NoAnswer(&'static str),
    /// An external lookup failed.
    #[error("lookup failed: {0:#}")]
    Failed(#[from] anyhow::Error),
}

impl Unresolved {
    pub fn not_found(what: impl Into<String>) -> Self {
        Unresolved::NotFound(what.into())
    }

    /// Map onto the report outcome shown to the user.
    pub fn outcome(&self) -> Outcome {
        match self {
            Unresolved::NotFound(_) => Outcome::NotFound,
            Unresolved::NoAnswer(_) | Unresolved::Failed(_) => Outcome::Failed,
        }
    }
}

pub type Resolution<T> = std::result::Result<T, Unresolved>;

/// Turn an adapter's `Ok(None)` into [`Unresolved::NotFound`].
pub trait OrNotFound<T> {
    fn or_not_found(self, what: impl Into<String>) -> Resolution<T>;
}

impl<T> OrNotFound<T> for anyhow::Result<Option<T>> {
    fn or_not_found(self, what: impl Into<String>) -> Resolution<T> {
        match self {
            Ok(Some(value)) => Ok(value),
            Ok(None) => Err(Unresolved::not_found(what)),
            Err(e) => Err(Unresolved::Failed(e)),
        }
    }
}
