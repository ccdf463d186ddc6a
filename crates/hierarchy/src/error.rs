use thiserror::Error;

pub type Result<T> = std::result::Result<T, HierarchyError>;

#[derive(Error, Debug)]
pub enum HierarchyError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Ambiguous name '{name}': matches {}", candidates.join(", "))]
    AmbiguousName {
        name: String,
        candidates: Vec<String>,
    },
}

impl HierarchyError {
    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
