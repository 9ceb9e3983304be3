/// Rejections at the closed (category, action) schema boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("unknown category: {category}")]
    UnknownCategory { category: String },

    #[error("unknown action: {action}")]
    UnknownAction { action: String },

    #[error("action {action} is not allowed for category {category}")]
    ActionMismatch { category: String, action: String },
}
