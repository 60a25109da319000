//! Transcript export - serializes the ordered message sequence to JSON

use crate::models::Message;
use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Serialize a transcript as pretty-printed JSON. An empty transcript is a
/// valid empty array.
pub fn transcript_to_json(messages: &[Message]) -> Result<String> {
    Ok(serde_json::to_string_pretty(messages)?)
}

/// Write the transcript to `conversation-{millis}.json` under `dir` and
/// return the path. Best-effort: the caller surfaces failures as a notice.
pub fn export_transcript(messages: &[Message], dir: &Path) -> Result<PathBuf> {
    let filename = format!("conversation-{}.json", chrono::Utc::now().timestamp_millis());
    let path = dir.join(filename);
    fs::write(&path, transcript_to_json(messages)?)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PromptParameters, Role};
    use tempfile::tempdir;

    fn message(id: &str, role: Role, content: &str) -> Message {
        Message {
            id: id.to_string(),
            role,
            content: content.to_string(),
            timestamp: 1_700_000_000_000,
            model: Some("gpt-4".to_string()),
            parameters: Some(PromptParameters::default()),
        }
    }

    #[test]
    fn test_empty_transcript_is_empty_array() {
        let json = transcript_to_json(&[]).unwrap();
        assert_eq!(json, "[]");
        let parsed: Vec<Message> = serde_json::from_str(&json).unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_export_round_trips() {
        let messages = vec![
            message("msg-1", Role::User, "Hello"),
            message("msg-2", Role::Assistant, "Hi there\nSecond line"),
        ];

        let json = transcript_to_json(&messages).unwrap();
        let parsed: Vec<Message> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, messages);
    }

    #[test]
    fn test_export_writes_timestamped_file() {
        let dir = tempdir().unwrap();
        let messages = vec![message("msg-1", Role::User, "Hello")];

        let path = export_transcript(&messages, dir.path()).unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("conversation-"));
        assert!(name.ends_with(".json"));

        let content = fs::read_to_string(&path).unwrap();
        let parsed: Vec<Message> = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed, messages);
    }
}
