// Prompts for the qualitative match judgment requested from LLM providers.

pub const MATCH_ANALYSIS_SYSTEM: &str = "You are an experienced technical recruiter. \
    You compare a candidate resume with a job description and return a calibrated \
    match assessment. You MUST respond with a single JSON object and nothing else.";

/// Placeholders: {resume_skills}, {resume_experience}, {resume_education},
/// {job_skills}, {job_experience}, {resume_text}, {job_text}, {fairness}
pub const MATCH_ANALYSIS_PROMPT_TEMPLATE: &str = r#"Assess how well this candidate matches the job.

CANDIDATE
Skills: {resume_skills}
Experience: {resume_experience}
Education: {resume_education}

Full resume:
{resume_text}

JOB
Required skills: {job_skills}
Experience requirement: {job_experience}

Full job description:
{job_text}

{fairness}

Return JSON with exactly these fields:
{
  "match_percentage": <integer 0-100>,
  "matched_skills": [<job skills the candidate demonstrably has>],
  "missing_skills": [<job skills the candidate lacks>],
  "candidate_strengths": [<short strings>],
  "candidate_weaknesses": [<short strings>],
  "recommendations": [<short, actionable strings>]
}"#;
