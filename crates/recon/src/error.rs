use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconError {
    /// The bank sheet has no locatable description column; nothing can be
    /// compared against it.
    MissingDescriptionColumn,
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingDescriptionColumn => {
                write!(f, "description column not found in the bank sheet")
            }
        }
    }
}

impl std::error::Error for ReconError {}
