//! Token management commands.
//!
//! `folio token mint` - Mint a new API token.
//! `folio token hash` - Digest a secret for the tokens file.
//! `folio token inspect` - Resolve a secret against the configured tokens.

use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::{Duration, Utc};
use folio_auth::{CollectionScope, TokenRecord, hash_token};
use serde_json::json;
use uuid::Uuid;

use super::{build_resolver, load_config};

/// Parse a duration string like "24h", "7d", "30m" into a chrono::Duration.
fn parse_duration(s: &str) -> Result<Duration> {
    let s = s.trim().to_lowercase();
    let (number, unit) = s.split_at(s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len()));
    let n: i64 = number
        .parse()
        .with_context(|| format!("Invalid duration '{}'", s))?;
    match unit {
        "d" => Ok(Duration::days(n)),
        "h" | "" => Ok(Duration::hours(n)),
        "m" => Ok(Duration::minutes(n)),
        "s" => Ok(Duration::seconds(n)),
        other => bail!("Unknown duration unit '{}' (use d, h, m or s)", other),
    }
}

fn new_secret() -> String {
    format!("folio_{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

fn build_record(
    id: String,
    secret: &str,
    scopes: Vec<String>,
    expires: Option<&str>,
    user: Option<String>,
    role: Option<String>,
) -> Result<TokenRecord> {
    for scope in &scopes {
        if scope.starts_with("collections:") && CollectionScope::parse(scope).is_none() {
            bail!("Malformed scope '{}' (expected collections:<slug|*>:<action>)", scope);
        }
    }

    let mut record = TokenRecord::new(id, secret, scopes);
    if let Some(lifetime) = expires {
        record = record.with_expiry(Utc::now() + parse_duration(lifetime)?);
    }
    record.user_id = user;
    record.user_role = role;
    Ok(record)
}

/// Mint a token and print its secret and tokens-file record.
pub fn mint(
    id: String,
    scopes: Vec<String>,
    expires: Option<&str>,
    user: Option<String>,
    role: Option<String>,
) -> Result<()> {
    let secret = new_secret();
    let record = build_record(id, &secret, scopes, expires, user, role)?;
    let yaml = serde_yaml::to_string(&json!({ "tokens": [record] }))?;

    println!("🔑 Token secret (shown once):\n   {}", secret);
    println!("\n📄 Add to your tokens file:\n{}", yaml);
    Ok(())
}

pub fn hash(secret: &str) {
    println!("{}", hash_token(secret.trim()));
}

/// Resolve a secret the way the server would and print the outcome.
pub async fn inspect(config_path: &Path, secret: &str) -> Result<()> {
    let config = load_config(config_path)?;
    let resolver = build_resolver(&config)?;
    match resolver.resolve(Some(secret)).await {
        Ok(auth) => {
            println!("✅ Token accepted");
            if let Some(id) = &auth.token_id {
                println!("   Id: {}", id);
            }
            if let Some(user) = &auth.user_id {
                println!("   User: {}", user);
            }
            println!("   Scopes:");
            for scope in &auth.scopes {
                println!("   • {}", scope);
            }
            Ok(())
        }
        Err(denial) => bail!("Token rejected ({}): {}", denial.code(), denial),
    }
}
