use lazy_static::lazy_static;
use tracing::error;

pub const BCRYPT_COST: u32 = 12;

lazy_static! {
    /// Compared against when the account is unknown so failed logins cost the same.
    static ref DUMMY_HASH: Option<String> = bcrypt::hash("educreate-dummy-password", BCRYPT_COST).ok();
}

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    bcrypt::hash(plain, BCRYPT_COST).map_err(|e| {
        error!(error = %e, "bcrypt hash error");
        anyhow::anyhow!(e.to_string())
    })
}

pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    bcrypt::verify(plain, hash).map_err(|e| {
        error!(error = %e, "bcrypt verify error");
        anyhow::anyhow!(e.to_string())
    })
}

/// Burns one comparison's worth of work and always reports a mismatch.
pub fn verify_dummy(plain: &str) -> bool {
    if let Some(hash) = DUMMY_HASH.as_deref() {
        let _ = bcrypt::verify(plain, hash);
    }
    false
}

/// Runs the hash on the blocking pool; bcrypt at cost 12 takes hundreds of milliseconds.
pub async fn hash_password_blocking(plain: String) -> anyhow::Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&plain)).await?
}

pub async fn verify_password_blocking(plain: String, hash: Option<String>) -> anyhow::Result<bool> {
    tokio::task::spawn_blocking(move || match hash {
        Some(hash) => verify_password(&plain, &hash),
        None => Ok(verify_dummy(&plain)),
    })
    .await?
}
