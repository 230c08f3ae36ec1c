//! Concrete LLM providers registered with the gateway.

use async_trait::async_trait;
use tracing::debug;

use crate::llm_client::prompts::{FAIR_EVALUATION_INSTRUCTION, JSON_ONLY_SYSTEM};
use crate::llm_client::{LlmClient, LlmError};
use crate::matching::gateway::{LlmProvider, ProviderRawResult};
use crate::matching::models::{JobProfile, ResumeProfile};
use crate::matching::prompts::{MATCH_ANALYSIS_PROMPT_TEMPLATE, MATCH_ANALYSIS_SYSTEM};

/// Longest slice of each full text sent to the model.
const MAX_PROMPT_TEXT_CHARS: usize = 12_000;

pub struct AnthropicProvider {
    client: LlmClient,
}

impl AnthropicProvider {
    pub const NAME: &'static str = "anthropic";

    pub fn new(client: LlmClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn is_available(&self) -> bool {
        self.client.has_credentials()
    }

    async fn analyze_match(
        &self,
        resume: &ResumeProfile,
        job: &JobProfile,
        resume_full_text: Option<&str>,
        job_full_text: Option<&str>,
    ) -> Result<ProviderRawResult, LlmError> {
        let prompt = build_match_prompt(resume, job, resume_full_text, job_full_text);
        let system = format!("{MATCH_ANALYSIS_SYSTEM} {JSON_ONLY_SYSTEM}");
        debug!(
            model = self.client.model(),
            prompt_chars = prompt.len(),
            "Requesting match analysis"
        );
        self.client.call_json(&prompt, &system).await
    }
}

pub fn build_match_prompt(
    resume: &ResumeProfile,
    job: &JobProfile,
    resume_full_text: Option<&str>,
    job_full_text: Option<&str>,
) -> String {
    let resume_text = resume_full_text
        .or(resume.full_text.as_deref())
        .map(truncate_chars)
        .unwrap_or("(not provided)");
    let job_text = job_full_text
        .or(job.full_text.as_deref())
        .map(truncate_chars)
        .unwrap_or("(not provided)");

    MATCH_ANALYSIS_PROMPT_TEMPLATE
        .replace("{resume_skills}", &or_none(&resume.skills.join(", ")))
        .replace("{resume_experience}", &or_none(&resume.experience))
        .replace("{resume_education}", &or_none(&resume.education))
        .replace("{job_skills}", &or_none(&job.skills.join(", ")))
        .replace("{job_experience}", &or_none(&job.experience))
        .replace("{resume_text}", resume_text)
        .replace("{job_text}", job_text)
        .replace("{fairness}", FAIR_EVALUATION_INSTRUCTION)
}

fn or_none(value: &str) -> String {
    if value.trim().is_empty() {
        "(none)".to_string()
    } else {
        value.trim().to_string()
    }
}

fn truncate_chars(text: &str) -> &str {
    match text.char_indices().nth(MAX_PROMPT_TEXT_CHARS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::DEFAULT_MODEL;

    #[test]
    fn test_availability_follows_credentials() {
        let with_key = AnthropicProvider::new(LlmClient::new("sk-test", DEFAULT_MODEL).unwrap());
        let without_key = AnthropicProvider::new(LlmClient::new("", DEFAULT_MODEL).unwrap());
        assert!(with_key.is_available());
        assert!(!without_key.is_available());
        assert_eq!(with_key.name(), "anthropic");
    }

    #[test]
    fn test_prompt_fills_every_placeholder() {
        let resume = ResumeProfile {
            skills: vec!["Rust".to_string(), "Tokio".to_string()],
            experience: "6 years of experience".to_string(),
            education: "BSc Computer Science".to_string(),
            full_text: None,
        };
        let job = JobProfile {
            skills: vec!["Rust".to_string()],
            experience: String::new(),
            full_text: Some("Senior Rust engineer".to_string()),
        };

        let prompt = build_match_prompt(&resume, &job, Some("Full resume body"), None);
        assert!(prompt.contains("Rust, Tokio"));
        assert!(prompt.contains("Full resume body"));
        assert!(prompt.contains("Senior Rust engineer"));
        assert!(prompt.contains("Experience requirement: (none)"));
        assert!(!prompt.contains("{resume_skills}"));
        assert!(!prompt.contains("{fairness}"));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let long = "é".repeat(MAX_PROMPT_TEXT_CHARS + 10);
        assert_eq!(truncate_chars(&long).chars().count(), MAX_PROMPT_TEXT_CHARS);
        assert_eq!(truncate_chars("short"), "short");
    }
}
