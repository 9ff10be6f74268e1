pub type GeomotionResult<T> = Result<T, GeomotionError>;

#[derive(thiserror::Error, Debug)]
pub enum GeomotionError {
    #[error("validation error: {0}")]
    Validation(String),

    /// Fatal: the dependency graph has no valid evaluation order.
    #[error("dependency cycle detected at node {node}")]
    Cycle { node: String },

    #[error("unsupported operand: {0}")]
    Unsupported(String),

    #[error("animation error: {0}")]
    Animation(String),

    #[error("construction error: {0}")]
    Construction(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GeomotionError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn cycle(node: impl Into<String>) -> Self {
        Self::Cycle { node: node.into() }
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }

    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    pub fn construction(msg: impl Into<String>) -> Self {
        Self::Construction(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// `true` for errors that leave no usable evaluation order behind.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Cycle { .. })
    }
}

impl From<serde_json::Error> for GeomotionError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
