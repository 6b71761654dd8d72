//! Login/logout command handlers.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use perch_core::auth;
use perch_core::config::Config;
use perch_core::session::Session;
use perch_core::session::store::{CredentialStore, FileCredentialStore, mask_token};

pub async fn login(config: &Config) -> Result<()> {
    let client = super::session_client(config)?;

    let url = auth::authorization_url(&client).await?;

    println!("Opening browser for Google sign-in...");
    if open::that(&url).is_err() {
        println!("Could not open a browser. Visit this URL manually:\n\n  {url}\n");
    }

    print!("Paste the callback redirect URL (or its query string): ");
    io::stdout().flush().context("flush prompt")?;
    let mut input = String::new();
    io::stdin()
        .lock()
        .read_line(&mut input)
        .context("read callback input")?;

    let token = auth::complete_login(&client, &input).await?;
    println!("Logged in ({}).", mask_token(&token));
    Ok(())
}

pub fn logout() -> Result<()> {
    let store = FileCredentialStore::open_default();
    let had_session = store.session_token()?.is_some();
    auth::logout(&store)?;

    if had_session {
        println!("Logged out.");
    } else {
        println!("No active session.");
    }
    Ok(())
}

pub async fn whoami(config: &Config) -> Result<()> {
    let client = super::session_client(config)?;

    match auth::verify(&client).await? {
        Session::Active(payload) => {
            println!(
                "{}",
                serde_json::to_string_pretty(&payload).context("render response")?
            );
            Ok(())
        }
        // the landing hint was already printed
        Session::Expired => Ok(()),
    }
}
