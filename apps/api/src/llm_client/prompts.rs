// Shared prompt fragments. Each pipeline keeps its own templates in
// generation/prompts.rs; only cross-cutting pieces live here.

/// Appended to every prompt whose reply is parsed as JSON.
pub const JSON_ONLY_INSTRUCTION: &str = "Provide only valid JSON. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Used by prompts whose reply is shown to a person verbatim.
pub const PLAIN_OUTPUT_INSTRUCTION: &str =
    "Output only the requested text, with no preamble and no closing remarks.";
