//! Persona command handlers.

use anyhow::Result;
use perch_core::api::personas;
use perch_core::config::Config;
use perch_core::session::Session;

pub async fn list(config: &Config) -> Result<()> {
    let client = super::session_client(config)?;

    let Session::Active(names) = personas::list(&client).await? else {
        return Ok(());
    };

    if names.is_empty() {
        println!("No personas yet.");
        return Ok(());
    }
    for name in names {
        println!("{name}");
    }
    Ok(())
}

pub async fn create(config: &Config, name: &str, description: &str) -> Result<()> {
    let client = super::session_client(config)?;

    let Session::Active(handle) = personas::create(&client, name, description).await? else {
        return Ok(());
    };

    println!(
        "Created persona '{}' (id {}, conversation {})",
        handle.persona_name, handle.persona_id, handle.conversation_id
    );
    Ok(())
}

pub async fn describe(config: &Config, persona_id: i64) -> Result<()> {
    let client = super::session_client(config)?;

    if let Session::Active(description) = personas::description(&client, persona_id).await? {
        println!("{description}");
    }
    Ok(())
}

pub async fn set_description(config: &Config, persona_id: i64, description: &str) -> Result<()> {
    let client = super::session_client(config)?;

    if let Session::Active(()) =
        personas::update_description(&client, persona_id, description).await?
    {
        println!("Description updated.");
    }
    Ok(())
}

pub async fn rate(config: &Config, name: &str, rating: u8) -> Result<()> {
    let client = super::session_client(config)?;

    if let Session::Active(()) = personas::rate(&client, name, rating).await? {
        println!("Rated '{name}' {rating}.");
    }
    Ok(())
}
