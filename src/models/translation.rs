use serde::Serialize;

/// UI-facing description of one input parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: String,
    pub default_value: String,
    pub description: String,
}

/// Everything one translation produces.
#[derive(Debug, Clone, Serialize)]
pub struct TranslationResult {
    /// Generated JavaScript program.
    pub code: String,
    /// One descriptor per input parameter, in declaration order.
    pub metadata: Vec<InputDescriptor>,
    /// Non-fatal findings (name collisions, skipped declarations).
    pub warnings: Vec<String>,
}
