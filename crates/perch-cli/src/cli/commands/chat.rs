//! Chat command handlers.

use anyhow::Result;
use perch_core::api::chat::{self, Message, Sender};
use perch_core::api::personas;
use perch_core::config::Config;
use perch_core::session::Session;

/// Sends one prompt to a persona, printing prior history first.
///
/// Mirrors the original chat window sequence: open the persona
/// (create-or-get), load its history, send the prompt, print the reply.
pub async fn run(
    config: &Config,
    persona: &str,
    prompt: &str,
    temperature: f32,
    no_history: bool,
) -> Result<()> {
    let client = super::session_client(config)?;

    // first contact seeds the description with the persona name
    let Session::Active(handle) = personas::open(&client, persona, persona).await? else {
        return Ok(());
    };

    if !no_history {
        let Session::Active(messages) = chat::history(&client, handle.conversation_id).await?
        else {
            return Ok(());
        };
        print_messages(persona, &messages);
    }

    println!("you: {prompt}");

    let Session::Active(reply) = chat::ask(
        &client,
        handle.conversation_id,
        persona,
        prompt,
        temperature,
    )
    .await?
    else {
        return Ok(());
    };

    println!("{persona}: {reply}");
    Ok(())
}

/// Prints the message history of one conversation.
pub async fn history(config: &Config, conversation_id: i64) -> Result<()> {
    let client = super::session_client(config)?;

    let Session::Active(messages) = chat::history(&client, conversation_id).await? else {
        return Ok(());
    };

    if messages.is_empty() {
        println!("No messages yet.");
        return Ok(());
    }
    print_messages("bot", &messages);
    Ok(())
}

fn print_messages(persona: &str, messages: &[Message]) {
    for message in messages {
        match message.sender {
            Sender::User => println!("you: {}", message.text),
            Sender::Bot => println!("{persona}: {}", message.text),
        }
    }
}
