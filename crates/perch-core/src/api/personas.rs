//! Persona management bindings.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::expect_success;
use crate::session::{Session, SessionClient};

#[derive(Debug, Deserialize)]
struct PersonaNamesResponse {
    persona_names: Vec<PersonaName>,
}

#[derive(Debug, Deserialize)]
struct PersonaName {
    persona_name: String,
}

#[derive(Debug, Serialize)]
struct OpenPersonaRequest<'a> {
    persona_name: &'a str,
    persona_description: &'a str,
}

#[derive(Debug, Serialize)]
struct UpdateDescriptionRequest<'a> {
    persona_id: i64,
    new_description: &'a str,
}

#[derive(Debug, Serialize)]
struct RatingRequest<'a> {
    persona_name: &'a str,
    rating: u8,
}

#[derive(Debug, Deserialize)]
struct DescriptionResponse {
    description: String,
}

/// Handle returned when opening a persona: the persona row plus the
/// conversation attached to it.
#[derive(Debug, Clone, Deserialize)]
pub struct PersonaHandle {
    pub persona_id: i64,
    pub persona_name: String,
    pub user_id: String,
    pub conversation_id: i64,
}

/// Lists the names of the user's personas.
pub async fn list(client: &SessionClient) -> Result<Session<Vec<String>>> {
    let Session::Active(response) = client.execute(client.post("/api/get_user_personas")).await?
    else {
        return Ok(Session::Expired);
    };

    let payload: PersonaNamesResponse = expect_success(response)
        .await?
        .json()
        .await
        .context("Failed to decode persona list")?;

    Ok(Session::Active(
        payload
            .persona_names
            .into_iter()
            .map(|p| p.persona_name)
            .collect(),
    ))
}

/// Creates the persona if needed and returns its handle (create-or-get).
pub async fn open(
    client: &SessionClient,
    name: &str,
    description: &str,
) -> Result<Session<PersonaHandle>> {
    open_at(client, "/api/add_persona", name, description).await
}

/// Creates a persona with server-side profile seeding and embedding.
pub async fn create(
    client: &SessionClient,
    name: &str,
    description: &str,
) -> Result<Session<PersonaHandle>> {
    open_at(client, "/api/new_persona", name, description).await
}

async fn open_at(
    client: &SessionClient,
    path: &str,
    name: &str,
    description: &str,
) -> Result<Session<PersonaHandle>> {
    let body = OpenPersonaRequest {
        persona_name: name,
        persona_description: description,
    };

    let Session::Active(response) = client.execute(client.post(path).json(&body)).await? else {
        return Ok(Session::Expired);
    };

    let handle: PersonaHandle = expect_success(response)
        .await?
        .json()
        .await
        .context("Failed to decode persona handle")?;

    // Remembered alongside the token; the 401 teardown removes them too.
    client.store().set_user_id(&handle.user_id)?;
    client.store().set_persona_id(handle.persona_id)?;

    Ok(Session::Active(handle))
}

/// Fetches a persona's description.
pub async fn description(client: &SessionClient, persona_id: i64) -> Result<Session<String>> {
    let path = format!("/api/get_persona_description/{persona_id}");
    let Session::Active(response) = client.execute(client.get(&path)).await? else {
        return Ok(Session::Expired);
    };

    let payload: DescriptionResponse = expect_success(response)
        .await?
        .json()
        .await
        .context("Failed to decode persona description")?;

    Ok(Session::Active(payload.description))
}

/// Replaces a persona's description (the backend reseeds its profile).
pub async fn update_description(
    client: &SessionClient,
    persona_id: i64,
    new_description: &str,
) -> Result<Session<()>> {
    let body = UpdateDescriptionRequest {
        persona_id,
        new_description,
    };

    let Session::Active(response) = client
        .execute(client.post("/api/update_persona_description").json(&body))
        .await?
    else {
        return Ok(Session::Expired);
    };

    expect_success(response).await?;
    Ok(Session::Active(()))
}

/// Submits a rating for a persona.
pub async fn rate(client: &SessionClient, name: &str, rating: u8) -> Result<Session<()>> {
    let body = RatingRequest {
        persona_name: name,
        rating,
    };

    let Session::Active(response) = client
        .execute(client.post("/api/persona_rating").json(&body))
        .await?
    else {
        return Ok(Session::Expired);
    };

    expect_success(response).await?;
    Ok(Session::Active(()))
}
