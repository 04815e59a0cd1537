use serde::Serialize;
use utoipa::ToSchema;

/// One generated practice question.
#[derive(Debug, Serialize, ToSchema)]
pub struct QuestionResponse {
    /// Human-readable prompt, e.g. `"3 + 7"`.
    pub question: String,
    pub answer: u32,
}
