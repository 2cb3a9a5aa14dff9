//! Wire types for the OpenAI-compatible chat completions endpoint.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub stream: bool,
}

impl<'a> ChatCompletionRequest<'a> {
    /// A single user turn carrying the rendered prompt.
    pub fn single_prompt(model: &'a str, prompt: &'a str) -> Self {
        Self {
            model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            stream: false,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_body_has_single_user_message() {
        let body = serde_json::to_value(ChatCompletionRequest::single_prompt(
            "mixtral-8x7b-32768",
            "Summarize this",
        ))
        .unwrap();

        assert_eq!(
            body,
            json!({
                "model": "mixtral-8x7b-32768",
                "messages": [{ "role": "user", "content": "Summarize this" }],
                "stream": false
            })
        );
    }

    #[test]
    fn response_exposes_first_choice_content() {
        let response: ChatCompletionResponse = serde_json::from_value(json!({
            "id": "chatcmpl-1",
            "choices": [
                { "index": 0, "message": { "role": "assistant", "content": "First" }, "finish_reason": "stop" },
                { "index": 1, "message": { "role": "assistant", "content": "Second" } }
            ]
        }))
        .unwrap();

        assert_eq!(response.first_content(), Some("First"));
        assert_eq!(response.choices[0].finish_reason.as_deref(), Some("stop"));
    }

    #[test]
    fn response_without_choices_has_no_content() {
        let response: ChatCompletionResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(response.first_content(), None);

        let response: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [{ "message": { "role": "assistant", "content": null } }]
        }))
        .unwrap();
        assert_eq!(response.first_content(), None);
    }
}
