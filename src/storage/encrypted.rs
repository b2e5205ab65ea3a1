//! SQLite-backed artifact store with AES-GCM encryption of every payload.
//! Key derived from a deployment secret (in production: OS keystore / KMS).

use super::{ArtifactError, ArtifactStore};
use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use rand::RngCore;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;

const NONCE_LEN: usize = 12;
const KEY_LEN: usize = 32;

fn derive_key(seed: &[u8]) -> [u8; KEY_LEN] {
    use ring::digest;
    let mut out = [0u8; KEY_LEN];
    let h = digest::digest(&digest::SHA256, seed);
    out[..h.as_ref().len().min(KEY_LEN)].copy_from_slice(h.as_ref());
    out
}

fn encrypt(key: &[u8; KEY_LEN], plaintext: &[u8]) -> Result<String, aes_gcm::Error> {
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| aes_gcm::Error)?;
    let mut nonce = [0u8; NONCE_LEN];
    rand::thread_rng().fill_bytes(&mut nonce);
    let ciphertext = cipher.encrypt((&nonce).into(), plaintext)?;
    let mut out = nonce.to_vec();
    out.extend(ciphertext);
    Ok(BASE64.encode(&out))
}

fn decrypt(key: &[u8; KEY_LEN], encoded: &str) -> Result<Vec<u8>, String> {
    let raw = BASE64.decode(encoded).map_err(|e| e.to_string())?;
    if raw.len() < NONCE_LEN {
        return Err("payload too short".into());
    }
    let (nonce, ct) = raw.split_at(NONCE_LEN);
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|e| format!("{:?}", e))?;
    cipher
        .decrypt(nonce.into(), ct)
        .map_err(|_| "decryption failed (wrong secret or tampered payload)".to_string())
}

pub struct SecureArtifactStore {
    conn: Mutex<Connection>,
    key: [u8; KEY_LEN],
}

impl SecureArtifactStore {
    /// Open or create the database at `path`. The key is derived from `secret`.
    pub fn open(path: &Path, secret: &[u8]) -> Result<Self, ArtifactError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS artifacts (
                name TEXT PRIMARY KEY,
                created_ts INTEGER NOT NULL,
                payload_enc TEXT NOT NULL
            );
            "#,
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
            key: derive_key(secret),
        })
    }

    /// Milliseconds since epoch at which `name` was last written.
    pub fn created_ts(&self, name: &str) -> Result<Option<i64>, ArtifactError> {
        let conn = self.lock();
        let ts = conn
            .query_row(
                "SELECT created_ts FROM artifacts WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(ts)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ArtifactStore for SecureArtifactStore {
    fn write(&self, name: &str, bytes: &[u8]) -> Result<(), ArtifactError> {
        let enc = encrypt(&self.key, bytes)
            .map_err(|_| ArtifactError::Encoding("encryption failed".to_string()))?;
        let ts = chrono::Utc::now().timestamp_millis();
        self.lock().execute(
            "INSERT OR REPLACE INTO artifacts (name, created_ts, payload_enc) VALUES (?1, ?2, ?3)",
            params![name, ts, enc],
        )?;
        Ok(())
    }

    fn read(&self, name: &str) -> Result<Option<Vec<u8>>, ArtifactError> {
        let enc: Option<String> = self
            .lock()
            .query_row(
                "SELECT payload_enc FROM artifacts WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?;
        match enc {
            Some(enc) => decrypt(&self.key, &enc)
                .map(Some)
                .map_err(|reason| ArtifactError::Corrupt {
                    name: name.to_string(),
                    reason,
                }),
            None => Ok(None),
        }
    }
}
