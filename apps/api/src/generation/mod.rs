// Generation pipelines: job descriptions, resume scoring and candidate emails.
// All model calls go through llm_client::TextGenerator.

pub mod email;
pub mod handlers;
pub mod job_description;
pub mod prompts;
pub mod response_parser;
pub mod scoring;
