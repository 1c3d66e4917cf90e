//! Chat-completion wire types.
//!
//! The request body is the OpenAI chat-completions shape:
//! `{model, messages: [{role, content}], temperature}`. The reply keeps
//! the raw JSON body so callers can check the status first and only
//! then pull out `choices[0].message.content` and the usage object.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: String, // "system" | "user" | "assistant"
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub temperature: f32,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Message>, temperature: f32) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature,
        }
    }
}

/// Token accounting reported by the endpoint on success.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

/// An HTTP-level reply from the chat endpoint.
///
/// Non-200 replies are returned as-is by the client after retries are
/// spent; callers decide what a failure means for their scope.
#[derive(Debug, Clone)]
pub struct ChatReply {
    pub status: u16,
    pub body: serde_json::Value,
}

impl ChatReply {
    pub fn is_success(&self) -> bool {
        self.status == 200
    }

    /// The answer text, if the body carries one.
    pub fn content(&self) -> Option<&str> {
        self.body["choices"][0]["message"]["content"].as_str()
    }

    /// The usage object, if present and well-formed.
    pub fn usage(&self) -> Option<Usage> {
        serde_json::from_value(self.body["usage"].clone()).ok()
    }

    /// Error message from an OpenAI-style error body, for diagnostics.
    pub fn error_message(&self) -> Option<&str> {
        self.body["error"]["message"]
            .as_str()
            .or_else(|| self.body["message"].as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_serializes_to_wire_shape() {
        let req = ChatRequest::new(
            "gpt-4-turbo-preview",
            vec![Message::system("sys"), Message::user("hi")],
            0.7,
        );
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body["model"], "gpt-4-turbo-preview");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "hi");
        assert!((body["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_reply_content_extraction() {
        let reply = ChatReply {
            status: 200,
            body: json!({"choices": [{"message": {"content": "  answer  "}}]}),
        };
        assert!(reply.is_success());
        assert_eq!(reply.content(), Some("  answer  "));
    }

    #[test]
    fn test_reply_usage_missing_is_none() {
        let reply = ChatReply {
            status: 200,
            body: json!({"choices": []}),
        };
        assert!(reply.usage().is_none());
    }

    #[test]
    fn test_reply_usage_parsed() {
        let reply = ChatReply {
            status: 200,
            body: json!({"usage": {"prompt_tokens": 12, "completion_tokens": 8, "total_tokens": 20}}),
        };
        let usage = reply.usage().unwrap();
        assert_eq!(usage.prompt_tokens, 12);
        assert_eq!(usage.total_tokens, 20);
    }
}
