//! Prompt text and applicant details

use serde::{Deserialize, Serialize};

/// System instruction for drafting the application email
pub const SYSTEM_PROMPT: &str = "\
You are an AI assistant applying for a job at Unravel.tech as per their X post instructions.

Your tasks IN ORDER:
1. Use the provided evidence to find the founders of Unravel.tech
   (the AI-focused startup founded in 2023, NOT Unravel Data or travel apps).
2. Identify the founder whose name contains the letters 'PR' (case-insensitive).
3. Use their first name (lowercase) to construct the email address: <first_name>@unravel.tech
4. Write a professional cover letter for the applicant using the details provided.
5. Subject must be: \"Apply with DSPy: <rhyming_word>\" where rhyming_word is given by the user.

IMPORTANT:
- Never mention model knowledge cutoffs or inability to browse.
- Base founder identification only on provided evidence.
- Output ONLY the final email draft in this exact format (no extra text before/after):

To: [email]
Subject: [subject]
Body:
[body text]
Attachment: [resume filename]";

/// System instruction for founder fact extraction
pub const EXTRACTOR_PROMPT: &str = "\
You are extracting facts from evidence about Unravel.tech.
Rules:
- Use only the provided evidence.
- Do not guess.
- Choose target_founder only if the name contains letters \"pr\" (case-insensitive).
- Return valid JSON only.

Output schema:
{
  \"founders\": [{\"name\": \"...\", \"source_url\": \"...\"}],
  \"target_founder\": \"...\",
  \"target_source_url\": \"...\",
  \"confidence\": \"high|medium|low\",
  \"notes\": \"short reason\"
}";

/// Appended after a draft that breaks the output format
pub const FORMAT_REMINDER: &str = "\n\nYour previous output was invalid. Return ONLY:\n\
To: ...\nSubject: ...\nBody:\n...\nAttachment: ...";

/// Appended after a draft that talks about model limitations
pub const CONTENT_REMINDER: &str = "\n\nDo not mention knowledge cutoff or browsing limits. \
Use provided snippets.";

/// User content for the extraction call
pub fn extraction_input(evidence: &str) -> String {
    format!(
        "Evidence:\n{}\n\nExtract founders and select the PR-matching founder.",
        evidence
    )
}

/// Applicant details posted to `/apply`; every field is optional
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicantDetails {
    pub name: String,
    pub bio: String,
    pub skills: String,
    pub role: String,
    pub resume_path: String,
    pub rhyming_word: String,
}

impl Default for ApplicantDetails {
    fn default() -> Self {
        Self {
            name: "Mainak Mukherjee".to_string(),
            bio: "Software engineer with internships at Accenture, Graet, and CodemateAI, \
                  passionate about building end-to-end applications."
                .to_string(),
            skills: "Proficient in Python and TypeScript, interested in AI agents, \
                     system design (REST vs. GraphQL)."
                .to_string(),
            role: "SDE-1".to_string(),
            resume_path: "resume.pdf".to_string(),
            rhyming_word: "Why".to_string(),
        }
    }
}

impl ApplicantDetails {
    /// Render the user prompt for the drafting call
    pub fn render(&self) -> String {
        format!(
            "Applicant details:\n\
             - Name: {}\n\
             - Bio: {}\n\
             - Skills/Experience: {}\n\
             - Applying for role: {}\n\
             - Resume filename: {}\n\
             - Rhyming word for subject line: {}\n\
             \n\
             Now perform your tasks. Start by searching for Unravel.tech founders.",
            self.name, self.bio, self.skills, self.role, self.resume_path, self.rhyming_word
        )
    }
}
