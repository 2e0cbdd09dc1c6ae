//! Settings stored with the data
//!
//! Holds the anti-forgery form secret: a random non-zero i64 generated on
//! first startup and persisted in the settings table, so every worker
//! process in front of the same database validates the same tokens.

use crate::{Error, Result};
use sqlx::SqlitePool;

const FORM_SECRET_KEY: &str = "form_secret";

/// Load the form secret, generating and storing one if missing
pub async fn load_form_secret(pool: &SqlitePool) -> Result<i64> {
    let result: Option<(String,)> =
        sqlx::query_as("SELECT value FROM settings WHERE key = ?")
            .bind(FORM_SECRET_KEY)
            .fetch_optional(pool)
            .await?;

    match result {
        Some((value,)) => value
            .parse::<i64>()
            .map_err(|e| Error::Config(format!("Invalid form secret: {}", e))),
        None => initialize_form_secret(pool).await,
    }
}

/// Generate a random non-zero secret and persist it
pub async fn initialize_form_secret(pool: &SqlitePool) -> Result<i64> {
    use rand::Rng;

    let mut rng = rand::thread_rng();
    let secret: i64 = loop {
        let val = rng.gen::<i64>();
        if val != 0 {
            break val;
        }
    };

    sqlx::query("INSERT OR REPLACE INTO settings (key, value) VALUES (?, ?)")
        .bind(FORM_SECRET_KEY)
        .bind(secret.to_string())
        .execute(pool)
        .await?;

    Ok(secret)
}
