// Prompt templates for the provider-backed analysis stages.
// Placeholders are filled with `str::replace`; see skills.rs and recommendations.rs.

pub const SKILLS_SYSTEM: &str =
    "You are a resume parser that extracts skills and keywords from resume text.";

pub const SKILLS_PROMPT_TEMPLATE: &str = r#"Extract the technical skills and keywords from the resume text below.
Return a JSON array of skill names and nothing else.

Cover:
- Programming languages
- Frameworks and libraries
- Tools and technologies
- Soft skills
- Industry-specific terms

RESUME TEXT:
{resume_text}"#;

pub const RECOMMENDATIONS_SYSTEM: &str = "You are a resume optimization expert. \
    You give specific, actionable advice that improves how applicant tracking systems read a resume.";

pub const RECOMMENDATIONS_PROMPT_TEMPLATE: &str = r#"Review this resume and suggest concrete improvements.
Focus on ATS compatibility, skills, experience descriptions, and formatting.

RESUME TEXT:
{resume_text}

CURRENT SKILLS: {skills}

SCORES: Skills {skills_score}/100, Experience {experience_score}/100, Education {education_score}/100, Format {format_score}/100

Give 5-8 specific recommendations as a JSON array of strings."#;

/// The first `max_chars` characters of `text`, cut on a char boundary.
pub fn excerpt(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
