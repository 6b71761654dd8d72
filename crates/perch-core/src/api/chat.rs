//! Conversation history and message exchange.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::expect_success;
use crate::session::{Session, SessionClient};

/// Who produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// One message of a conversation, oldest first in history responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    pub sender: Sender,
}

#[derive(Debug, Serialize)]
struct HistoryRequest {
    conversation_id: i64,
}

#[derive(Debug, Deserialize)]
struct HistoryResponse {
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct AskRequest<'a> {
    conversation_id: i64,
    persona: &'a str,
    prompt: &'a str,
    temperature: f32,
}

/// Loads the full message history of one conversation.
pub async fn history(
    client: &SessionClient,
    conversation_id: i64,
) -> Result<Session<Vec<Message>>> {
    let body = HistoryRequest { conversation_id };

    let Session::Active(response) = client
        .execute(client.post("/api/chat_history").json(&body))
        .await?
    else {
        return Ok(Session::Expired);
    };

    let payload: HistoryResponse = expect_success(response)
        .await?
        .json()
        .await
        .context("Failed to decode chat history")?;

    Ok(Session::Active(payload.messages))
}

/// Sends a prompt and returns the persona's generated reply.
///
/// The backend persists both sides of the exchange before answering; the
/// reply body is a bare JSON string.
pub async fn ask(
    client: &SessionClient,
    conversation_id: i64,
    persona: &str,
    prompt: &str,
    temperature: f32,
) -> Result<Session<String>> {
    let body = AskRequest {
        conversation_id,
        persona,
        prompt,
        temperature,
    };

    let Session::Active(response) = client
        .execute(client.post("/api/get_answer").json(&body))
        .await?
    else {
        return Ok(Session::Expired);
    };

    let reply: String = expect_success(response)
        .await?
        .json()
        .await
        .context("Failed to decode chat reply")?;

    Ok(Session::Active(reply))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test: wire format of history messages ({text, sender} with lowercase
    /// sender values).
    #[test]
    fn test_message_wire_format() {
        let history: HistoryResponse = serde_json::from_str(
            r#"{"messages":[{"text":"hi","sender":"user"},{"text":"hello","sender":"bot"}]}"#,
        )
        .unwrap();

        assert_eq!(history.messages.len(), 2);
        assert_eq!(history.messages[0].sender, Sender::User);
        assert_eq!(history.messages[1].sender, Sender::Bot);
        assert_eq!(history.messages[1].text, "hello");
    }

    /// Test: ask request carries all four fields.
    #[test]
    fn test_ask_request_shape() {
        let body = AskRequest {
            conversation_id: 7,
            persona: "ada",
            prompt: "hey",
            temperature: 0.1,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["conversation_id"], 7);
        assert_eq!(json["persona"], "ada");
        assert_eq!(json["prompt"], "hey");
        assert!((json["temperature"].as_f64().unwrap() - 0.1).abs() < 1e-6);
    }
}
