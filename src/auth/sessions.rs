// src/auth/sessions.rs
//
// Cookie sessions. Raw tokens go to the browser; only SHA-256 hashes are
// stored, so a leaked database cannot be replayed as cookies.

use crate::db::auth as db_auth;
use crate::errors::ServerError;
use base64::Engine;
use rand::{rngs::OsRng, RngCore};
use rusqlite::Connection;
use sha2::{Digest, Sha256};

pub const TOKEN_BYTES: usize = 32;
pub const SESSION_TTL_SECS: i64 = 60 * 60 * 24 * 7; // 7 days

/// Generate a URL-safe random token (base64, no padding) with the OS RNG.
pub fn generate_token() -> String {
    let mut rng = OsRng;
    generate_token_with(&mut rng, TOKEN_BYTES)
}

/// RNG-generic variant so tests can use a seeded generator.
pub fn generate_token_with<R: RngCore>(rng: &mut R, nbytes: usize) -> String {
    let mut buf = vec![0u8; nbytes];
    rng.fill_bytes(&mut buf);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buf)
}

/// Hash a token for storage (BLOB column).
pub fn hash_token(token: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    let out = hasher.finalize();
    let mut arr = [0u8; 32];
    arr.copy_from_slice(&out);
    arr
}

/// Create a session row and return the raw cookie token.
pub fn create_session(conn: &Connection, user_id: i64, now: i64) -> Result<String, ServerError> {
    let raw_token = generate_token();
    let hash = hash_token(&raw_token);
    db_auth::insert_session(conn, user_id, &hash, now, now + SESSION_TTL_SECS)?;
    Ok(raw_token)
}

/// Resolve a raw cookie token to (user_id, email), if the session is live.
pub fn load_user_from_session(
    conn: &Connection,
    raw_token: &str,
    now: i64,
) -> Result<Option<(i64, String)>, ServerError> {
    let hash = hash_token(raw_token);
    db_auth::find_session_user(conn, &hash, now)
}

pub fn revoke_session(conn: &Connection, raw_token: &str, now: i64) -> Result<(), ServerError> {
    let hash = hash_token(raw_token);
    db_auth::revoke_session(conn, &hash, now)
}
