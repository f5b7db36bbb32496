//! Export & encryption pipeline.
//!
//! Serializes structured data to durable JSON artifacts and tabular CSV,
//! and optionally encrypts produced artifacts at rest. Encryption is
//! additive: the plaintext is never deleted, the `.enc` sibling is written
//! alongside it.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use aes_gcm::aead::{Aead, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Key, KeyInit, Nonce};
use anyhow::{anyhow, Context, Result};
use log::{error, info};
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

const NONCE_LEN: usize = 12;
const ENCRYPTED_SUFFIX: &str = "enc";

/// Writes run artifacts under one output directory and remembers what it
/// produced so the encryption stage can sweep them afterwards.
pub struct Exporter {
    output_dir: PathBuf,
    produced: Vec<PathBuf>,
}

impl Exporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Exporter { output_dir: output_dir.into(), produced: Vec::new() }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Paths of every artifact written so far, in write order.
    pub fn produced(&self) -> &[PathBuf] {
        &self.produced
    }

    /// Write a pretty-printed JSON artifact named `<name>.json`.
    ///
    /// Idempotent overwrite within a run: last write to a name wins. The
    /// output directory is created on first use.
    pub fn export_json(&mut self, data: &impl Serialize, name: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)
            .context(format!("Failed to create {}", self.output_dir.display()))?;

        let path = self.output_dir.join(format!("{}.json", name));
        let json = serde_json::to_string_pretty(data)
            .context(format!("Failed to serialize artifact '{}'", name))?;
        fs::write(&path, json)
            .context(format!("Failed to write {}", path.display()))?;

        info!("Exported JSON -> {}", path.display());
        if !self.produced.contains(&path) {
            self.produced.push(path.clone());
        }
        Ok(path)
    }

    /// Write a CSV artifact whose column set is the sorted union of all
    /// row keys. Empty rows are a no-op: nothing is written, no path is
    /// returned.
    pub fn export_csv(
        &mut self,
        rows: &[BTreeMap<String, Value>],
        name: &str,
    ) -> Result<Option<PathBuf>> {
        if rows.is_empty() {
            return Ok(None);
        }

        fs::create_dir_all(&self.output_dir)
            .context(format!("Failed to create {}", self.output_dir.display()))?;

        let columns: Vec<&String> = rows
            .iter()
            .flat_map(|row| row.keys())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let path = self.output_dir.join(format!("{}.csv", name));
        let mut writer = csv::Writer::from_path(&path)
            .context(format!("Failed to open {}", path.display()))?;

        writer.write_record(columns.iter().map(|c| c.as_str()))?;
        for row in rows {
            let record: Vec<String> = columns
                .iter()
                .map(|col| match row.get(*col) {
                    Some(Value::String(s)) => s.clone(),
                    Some(other) => other.to_string(),
                    None => String::new(),
                })
                .collect();
            writer.write_record(&record)?;
        }
        writer.flush()?;

        info!("Exported CSV -> {}", path.display());
        Ok(Some(path))
    }

    /// Encrypt every JSON artifact produced during this run. Per-file
    /// errors are logged and do not stop the sweep.
    pub fn encrypt_produced(&self, passphrase: &str) {
        for path in &self.produced {
            match encrypt_file(path, passphrase) {
                Ok(enc_path) => info!("Encrypted artifact saved to {}", enc_path.display()),
                Err(e) => error!("Encryption error for {}: {}", path.display(), e),
            }
        }
    }
}

fn derive_key(passphrase: &str) -> Key<Aes256Gcm> {
    let digest = Sha256::digest(passphrase.as_bytes());
    *Key::<Aes256Gcm>::from_slice(digest.as_slice())
}

/// Encrypt an artifact under the passphrase-derived AES-256-GCM key.
///
/// The envelope is `nonce || ciphertext`, written to `<path>.enc`. The
/// plaintext stays in place; encryption at rest is additive, not
/// destructive.
pub fn encrypt_file(path: &Path, passphrase: &str) -> Result<PathBuf> {
    let plaintext = fs::read(path)
        .context(format!("Failed to read {}", path.display()))?;

    let cipher = Aes256Gcm::new(&derive_key(passphrase));
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
    let ciphertext = cipher
        .encrypt(&nonce, plaintext.as_slice())
        .map_err(|e| anyhow!("Encryption failed for {}: {}", path.display(), e))?;

    let mut envelope = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    envelope.extend_from_slice(&nonce);
    envelope.extend_from_slice(&ciphertext);

    let enc_path = suffixed(path);
    fs::write(&enc_path, envelope)
        .context(format!("Failed to write {}", enc_path.display()))?;
    Ok(enc_path)
}

/// Decrypt an encrypted artifact back to its plaintext bytes.
///
/// A wrong passphrase fails the authentication tag and returns an error;
/// it never yields silently corrupted output.
pub fn decrypt_file(path: &Path, passphrase: &str) -> Result<Vec<u8>> {
    let envelope = fs::read(path)
        .context(format!("Failed to read {}", path.display()))?;
    if envelope.len() < NONCE_LEN {
        return Err(anyhow!("{} is too short to be an encrypted artifact", path.display()));
    }

    let (nonce, ciphertext) = envelope.split_at(NONCE_LEN);
    let cipher = Aes256Gcm::new(&derive_key(passphrase));
    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| anyhow!("Decryption failed for {} (wrong key or corrupted data)", path.display()))
}

fn suffixed(path: &Path) -> PathBuf {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => path.with_extension(format!("{}.{}", ext, ENCRYPTED_SUFFIX)),
        None => path.with_extension(ENCRYPTED_SUFFIX),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_export_json_writes_pretty_artifact() -> Result<()> {
        let dir = TempDir::new()?;
        let mut exporter = Exporter::new(dir.path().join("out"));

        let path = exporter.export_json(&json!({"a": 1}), "sample")?;
        assert!(path.exists());
        let content = fs::read_to_string(&path)?;
        assert!(content.contains('\n'));
        assert_eq!(exporter.produced(), &[path]);
        Ok(())
    }

    #[test]
    fn test_export_json_overwrite_last_wins() -> Result<()> {
        let dir = TempDir::new()?;
        let mut exporter = Exporter::new(dir.path());

        exporter.export_json(&json!({"version": 1}), "artifact")?;
        let path = exporter.export_json(&json!({"version": 2}), "artifact")?;

        let reread: Value = serde_json::from_str(&fs::read_to_string(&path)?)?;
        assert_eq!(reread["version"], 2);
        // Overwrites do not double-count in the produced list
        assert_eq!(exporter.produced().len(), 1);
        Ok(())
    }

    #[test]
    fn test_export_csv_empty_rows_is_noop() -> Result<()> {
        let dir = TempDir::new()?;
        let mut exporter = Exporter::new(dir.path().join("never-created"));

        let result = exporter.export_csv(&[], "empty")?;
        assert!(result.is_none());
        assert!(!dir.path().join("never-created").exists());
        Ok(())
    }

    #[test]
    fn test_export_csv_columns_are_sorted_union() -> Result<()> {
        let dir = TempDir::new()?;
        let mut exporter = Exporter::new(dir.path());

        let rows = vec![
            BTreeMap::from([
                ("zeta".to_string(), json!("z1")),
                ("alpha".to_string(), json!(1)),
            ]),
            BTreeMap::from([("mid".to_string(), json!("m2"))]),
        ];
        let path = exporter.export_csv(&rows, "table")?.unwrap();

        let content = fs::read_to_string(&path)?;
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("alpha,mid,zeta"));
        assert_eq!(lines.next(), Some("1,,z1"));
        assert_eq!(lines.next(), Some(",m2,"));
        Ok(())
    }

    #[test]
    fn test_encrypt_round_trip() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("artifact.json");
        fs::write(&path, b"{\"secret\": true}")?;

        let enc_path = encrypt_file(&path, "correct horse")?;
        assert_eq!(enc_path, dir.path().join("artifact.json.enc"));
        assert!(path.exists(), "plaintext must never be deleted");

        let decrypted = decrypt_file(&enc_path, "correct horse")?;
        assert_eq!(decrypted, b"{\"secret\": true}");
        Ok(())
    }

    #[test]
    fn test_wrong_key_fails_loudly() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("artifact.json");
        fs::write(&path, b"payload")?;

        let enc_path = encrypt_file(&path, "right key")?;
        let result = decrypt_file(&enc_path, "wrong key");
        assert!(result.is_err());
        Ok(())
    }

    #[test]
    fn test_encrypt_produced_sweeps_artifacts() -> Result<()> {
        let dir = TempDir::new()?;
        let mut exporter = Exporter::new(dir.path());

        exporter.export_json(&json!({"n": 1}), "one")?;
        exporter.export_json(&json!({"n": 2}), "two")?;
        exporter.encrypt_produced("sweep key");

        assert!(dir.path().join("one.json.enc").exists());
        assert!(dir.path().join("two.json.enc").exists());
        assert!(dir.path().join("one.json").exists());
        Ok(())
    }

    #[test]
    fn test_nonce_is_fresh_per_encryption() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("artifact.json");
        fs::write(&path, b"same plaintext")?;

        let first = fs::read(encrypt_file(&path, "key")?)?;
        let second = fs::read(encrypt_file(&path, "key")?)?;
        assert_ne!(
            hex::encode(&first[..NONCE_LEN]),
            hex::encode(&second[..NONCE_LEN])
        );
        Ok(())
    }

    #[test]
    fn test_truncated_envelope_rejected() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("short.enc");
        fs::write(&path, b"tiny")?;
        assert!(decrypt_file(&path, "any").is_err());
        Ok(())
    }
}
