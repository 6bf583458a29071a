pub type Result<T, E = ActionError> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("Unknown emergency action `{0}`")]
    /// The tag names no action of the registry
    UnknownAction(String),
    #[error("Invalid parameter `{field}`: {reason}")]
    /// A parameter is missing, unexpected or of the wrong type
    SchemaValidation { field: String, reason: String },
    #[error("Action parameters must be a JSON object")]
    /// The parameters are not a JSON object
    NotAnObject,
}

impl ActionError {
    pub(crate) fn field(field: &str, reason: impl Into<String>) -> Self {
        Self::SchemaValidation { field: field.to_string(), reason: reason.into() }
    }
}
