// All prompt templates for the generation pipelines, plus the renderer that
// fills them. Shared fragments come from llm_client::prompts.

/// Headings every generated job description must contain, in order.
pub const JD_HEADINGS: [&str; 6] = [
    "## Company Overview",
    "## Role Overview",
    "## Key Responsibilities",
    "## Required Qualifications",
    "## Preferred Qualifications",
    "## Benefits",
];

/// Job description prompt. Replace: {headings}, {inputs}
pub const JD_PROMPT_TEMPLATE: &str = r#"You are an expert HR recruiter and technical writer. Produce a polished, inclusive, search-friendly job description in Markdown.

The output MUST contain these headings, in this order: {headings}.
Key Responsibilities: 6-10 bullet points. Required Qualifications: concrete skills and years of experience.
Tone: professional and engaging. Length: roughly 250-400 words.

Inputs:
{inputs}

Write the job description now in Markdown using the required headings."#;

/// Resume scoring prompt. Replace: {json_only}, {jd_text}, {resume_text}
pub const SCORING_PROMPT_TEMPLATE: &str = r#"You are an expert technical recruiter. Given the job description (JD) and a candidate's resume text, evaluate how well the candidate fits the JD.

Return a JSON object with exactly these keys:
  - "score": integer between 0 and 100 representing fit (100 = perfect fit).
  - "missing_skills": array of strings listing important JD skills or requirements not found in the resume (at most 20).
  - "remarks": short string (1-2 sentences) summarizing strengths, weaknesses and fit level.

Evaluation guidance:
- Consider technical skills, experience level, role fit and relevant keywords.
- Be conservative: if something is not clearly present in the resume, count it as missing.
- Use the JD to tell must-have requirements from nice-to-have ones.

{json_only} Example:
{"score": 78, "missing_skills": ["aws sagemaker", "production monitoring"], "remarks": "Good ML background but lacks specific AWS MLOps experience."}

JD:
"""
{jd_text}
"""

Resume:
"""
{resume_text}
""""#;

/// Interview invitation. Replace: {plain_output}, {candidate_name}, {role_line},
/// {context}, {interview_date}, {location}, {tone}, {max_words}
pub const ACCEPT_EMAIL_TEMPLATE: &str = r#"Write a short professional interview invitation email. {plain_output} The first line must be the subject.
Candidate: {candidate_name}
Role: {role_line}
{context}Interview date/time: {interview_date}
Location/mode: {location}

Tone: {tone}. Include what to expect in the interview and ask the candidate to confirm. Keep it under {max_words} words."#;

/// Rejection. Replace: {plain_output}, {candidate_name}, {role_line}, {context},
/// {tone}, {max_words}
pub const REJECT_EMAIL_TEMPLATE: &str = r#"Write a short, empathetic rejection email. {plain_output} The first line must be the subject.
Candidate: {candidate_name}
Role: {role_line}
{context}
Tone: {tone}. Thank them for their time, give a brief reason (for example, a stronger match for this role) and encourage them to apply in the future. Keep it under {max_words} words."#;

/// Optional job description context block for emails. Replace: {jd_text}
pub const EMAIL_CONTEXT_TEMPLATE: &str = r#"Context: use this job description for background but do not repeat it.
"""
{jd_text}
"""
"#;

pub const ACCEPT_DEFAULT_TONE: &str = "Warm, professional, concise";
pub const REJECT_DEFAULT_TONE: &str = "Respectful and encouraging";
pub const ACCEPT_DEFAULT_MAX_WORDS: u32 = 180;
pub const REJECT_DEFAULT_MAX_WORDS: u32 = 130;

/// JD and resume text are cut to this many characters before embedding.
pub const MAX_EMBEDDED_CHARS: usize = 2500;

/// Fills `{name}` placeholders in a single pass, so substituted values are
/// never rescanned. Braces that do not name a variable are kept verbatim.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open + 1..];
        let hit = vars.iter().find(|(name, _)| {
            tail.strip_prefix(*name)
                .is_some_and(|after| after.starts_with('}'))
        });
        match hit {
            Some((name, value)) => {
                out.push_str(value);
                rest = &tail[name.len() + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Cuts `text` to `max_chars` characters, backing up to the last line break
/// inside the window when there is one.
pub fn shorten(text: &str, max_chars: usize) -> &str {
    let Some((cut, _)) = text.char_indices().nth(max_chars) else {
        return text;
    };
    let window = &text[..cut];
    match window.rfind('\n') {
        Some(newline) => &window[..newline],
        None => window,
    }
}
