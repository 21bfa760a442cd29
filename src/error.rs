use thiserror::Error;

/// Structural errors in a set of declarations.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum Error {
    /// The constraint governing variable `index` refers to variable `pivot`,
    /// which is not declared before it.
    #[error("constraint {index} depends on variable {pivot}")]
    ForwardReference { index: usize, pivot: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
