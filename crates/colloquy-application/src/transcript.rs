//! Markdown projections of conversation history and copy drafts.
//!
//! Pure functions over domain values; nothing here mutates core state.

use chrono::{DateTime, Utc};

use colloquy_core::Message;

use crate::copy_usecase::CopyDraft;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Renders the full message log as a Markdown transcript.
pub fn render_transcript(
    messages: &[Message],
    exported_at: DateTime<Utc>,
) -> String {
    let mut doc = String::from("# Conversation transcript\n\n");
    doc.push_str(&format!(
        "Exported: {}\n",
        exported_at.format(TIMESTAMP_FORMAT)
    ));
    doc.push_str(&format!("Messages: {}\n\n", messages.len()));

    for (index, message) in messages.iter().enumerate() {
        doc.push_str(&format!("## Message {}\n", index + 1));
        doc.push_str(&format!("**Sender**: {}\n", message.role.label()));
        doc.push_str(&format!(
            "**Time**: {}\n",
            message.timestamp.format(TIMESTAMP_FORMAT)
        ));
        doc.push_str(&format!("**Content**: {}\n\n", message.content));
    }

    doc
}

/// Derives the download file name for a transcript.
pub fn transcript_file_name(conversation_id: Option<&str>) -> String {
    format!("conversation_{}.md", conversation_id.unwrap_or("unknown"))
}

/// Renders a generated copy draft as a Markdown download document.
pub fn render_copy_draft(draft: &CopyDraft) -> String {
    let mut doc = String::from("# Generated marketing copy\n\n");
    doc.push_str(&format!(
        "Generated: {}\n\n",
        draft.generated_at.format(TIMESTAMP_FORMAT)
    ));
    doc.push_str(&draft.content);
    doc.push('\n');

    if let Some(usage) = &draft.usage {
        if let Some(total) = usage.total_tokens {
            doc.push_str(&format!("\n---\nTokens used: {total}\n"));
        }
    }

    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use colloquy_interaction::TokenUsage;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 30, 0).unwrap()
    }

    #[test]
    fn test_transcript_has_one_section_per_message() {
        let messages = vec![Message::user("Hello"), Message::assistant("Hi there")];
        let doc = render_transcript(&messages, fixed_time());

        assert!(doc.starts_with("# Conversation transcript"));
        assert!(doc.contains("Exported: 2025-06-01 12:30:00 UTC"));
        assert!(doc.contains("Messages: 2"));
        assert!(doc.contains("## Message 1"));
        assert!(doc.contains("**Sender**: User"));
        assert!(doc.contains("## Message 2"));
        assert!(doc.contains("**Sender**: Assistant"));
        assert!(doc.contains("**Content**: Hi there"));
        assert!(!doc.contains("## Message 3"));
    }

    #[test]
    fn test_empty_transcript_still_renders_a_header() {
        let doc = render_transcript(&[], fixed_time());
        assert!(doc.contains("Messages: 0"));
        assert!(!doc.contains("## Message"));
    }

    #[test]
    fn test_file_name_falls_back_to_unknown() {
        assert_eq!(
            transcript_file_name(Some("conv-1")),
            "conversation_conv-1.md"
        );
        assert_eq!(transcript_file_name(None), "conversation_unknown.md");
    }

    #[test]
    fn test_copy_draft_rendering_includes_usage_footer() {
        let draft = CopyDraft {
            content: "Buy more widgets".to_string(),
            usage: Some(TokenUsage {
                total_tokens: Some(42),
                ..Default::default()
            }),
            generated_at: fixed_time(),
        };
        let doc = render_copy_draft(&draft);

        assert!(doc.contains("Generated: 2025-06-01 12:30:00 UTC"));
        assert!(doc.contains("Buy more widgets"));
        assert!(doc.contains("Tokens used: 42"));
    }

    #[test]
    fn test_copy_draft_rendering_without_usage() {
        let draft = CopyDraft {
            content: "Plain copy".to_string(),
            usage: None,
            generated_at: fixed_time(),
        };
        let doc = render_copy_draft(&draft);
        assert!(!doc.contains("Tokens used"));
    }
}
