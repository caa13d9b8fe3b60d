//! Email draft validation and parsing

use serde::Serialize;

const DISALLOWED_PHRASES: &[&str] = &[
    "knowledge cutoff",
    "unable to browse",
    "could not be identified",
    "recommend calling web_search again",
];

const SECTIONS: [&str; 3] = ["Subject:", "Body:", "Attachment:"];

/// Whether the text is a draft in `To:/Subject:/Body:/Attachment:` form
pub fn is_valid_email_draft(text: &str) -> bool {
    let text = text.trim();
    let Some(mut rest) = text.strip_prefix("To:") else {
        return false;
    };
    for marker in SECTIONS {
        match rest.find(marker) {
            Some(pos) => rest = &rest[pos + marker.len()..],
            None => return false,
        }
    }
    true
}

/// Whether the text contains a known failure phrase
pub fn has_disallowed_phrases(text: &str) -> bool {
    let lowered = text.to_lowercase();
    DISALLOWED_PHRASES
        .iter()
        .any(|phrase| lowered.contains(phrase))
}

/// A validated draft split into its sections
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailDraft {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub attachment: String,
}

impl EmailDraft {
    /// Split a draft; `None` when it fails [`is_valid_email_draft`]
    pub fn parse(text: &str) -> Option<Self> {
        if !is_valid_email_draft(text) {
            return None;
        }
        let text = text.trim();

        let subject_at = text.find("Subject:")?;
        let to = first_line(&text["To:".len()..subject_at]);

        let after_subject = &text[subject_at + "Subject:".len()..];
        let body_at = after_subject.find("Body:")?;
        let subject = first_line(&after_subject[..body_at]);

        // The attachment line is the last one; the body may quote the word
        let after_body = &after_subject[body_at + "Body:".len()..];
        let attachment_at = after_body.rfind("Attachment:")?;
        let body = after_body[..attachment_at].trim().to_string();
        let attachment = first_line(&after_body[attachment_at + "Attachment:".len()..]);

        Some(Self {
            to,
            subject,
            body,
            attachment,
        })
    }
}

fn first_line(section: &str) -> String {
    section
        .trim()
        .lines()
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}
