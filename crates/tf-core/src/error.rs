use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Mount path had fewer than two non-empty segments.
    InvalidPath { path: String, segments: usize },
    /// Spawn requested at or beyond the persona's recursion ceiling.
    RecursionLimit { level: u32, depth: u32 },
    /// No tensor is mounted at the given path.
    NotMounted(String),
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::InvalidPath { path, segments } => write!(
                f,
                "invalid mount path '{path}': need at least 2 segments, got {segments}"
            ),
            CoreError::RecursionLimit { level, depth } => write!(
                f,
                "recursion limit reached: level {level} >= depth {depth}"
            ),
            CoreError::NotMounted(path) => write!(f, "no tensor mounted at '{path}'"),
        }
    }
}

impl std::error::Error for CoreError {}

pub type Result<T> = std::result::Result<T, CoreError>;
