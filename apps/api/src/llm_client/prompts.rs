// Cross-cutting prompt fragments. Prompts specific to one service live in a
// prompts.rs next to that service.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Fairness guard appended to every prompt that evaluates a person.
pub const FAIR_EVALUATION_INSTRUCTION: &str = "\
    Evaluate only job-relevant qualifications: skills, experience and education. \
    Ignore name, age, gender, nationality, marital status, photos, and any other \
    protected characteristic, even when the resume mentions them.";
