//! Structured-output schema sent with every text request.

use serde_json::{Value, json};

/// Returns the declarative shape the text model must answer with.
///
/// The upstream is trusted to honor it; only `story` and `choices` are
/// checked on the way back.
#[must_use]
pub fn story_response_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "story": {
                "type": "string",
                "description": "O próximo parágrafo da história. Deve ser dramático e envolvente, em estilo de quadrinhos. 2-4 frases."
            },
            "choices": {
                "type": "array",
                "description": "Um array de exatamente três escolhas distintas e empolgantes para o usuário fazer a seguir.",
                "items": { "type": "string" }
            }
        },
        "required": ["story", "choices"]
    })
}
