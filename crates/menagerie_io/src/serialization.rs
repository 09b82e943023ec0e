//! JSON, HexDNA and gzip helpers shared by save files and pool exchange.
//!
//! HexDNA is hex-encoded JSON, used for single-genome share codes.

use crate::error::{IoError, Result};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{de::DeserializeOwned, Serialize};
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

pub fn to_json<T: Serialize>(data: &T) -> Result<String> {
    serde_json::to_string(data)
        .map_err(|e| IoError::serialization(format!("JSON serialization failed: {e}")))
}

pub fn to_json_pretty<T: Serialize>(data: &T) -> Result<String> {
    serde_json::to_string_pretty(data)
        .map_err(|e| IoError::serialization(format!("JSON serialization failed: {e}")))
}

/// Parses JSON, rejecting blank input up front.
pub fn from_json<T: DeserializeOwned>(json: &str) -> Result<T> {
    if json.trim().is_empty() {
        return Err(IoError::validation("Empty JSON string"));
    }
    serde_json::from_str(json)
        .map_err(|e| IoError::serialization(format!("JSON deserialization failed: {e}")))
}

pub fn to_hex_dna<T: Serialize>(data: &T) -> Result<String> {
    Ok(hex::encode(to_json(data)?.as_bytes()))
}

pub fn from_hex_dna<T: DeserializeOwned>(hex_str: &str) -> Result<T> {
    let trimmed = hex_str.trim();
    if trimmed.is_empty() {
        return Err(IoError::validation("Empty hex string"));
    }
    let bytes = hex::decode(trimmed)
        .map_err(|e| IoError::validation(format!("Invalid hex encoding: {e}")))?;
    let json = String::from_utf8(bytes)
        .map_err(|e| IoError::validation(format!("Invalid UTF-8 in hex: {e}")))?;
    from_json(&json)
}

#[must_use]
pub fn is_valid_hex_dna(hex_str: &str) -> bool {
    let trimmed = hex_str.trim();
    !trimmed.is_empty() && hex::decode(trimmed).is_ok()
}

/// Writes bytes next to `path` first and renames into place, so a failed
/// write never truncates an existing file.
fn write_atomically<P: AsRef<Path>>(
    path: P,
    write: impl FnOnce(&mut BufWriter<File>) -> Result<()>,
) -> Result<()> {
    let path = path.as_ref();
    let tmp_path = path.with_extension("tmp");
    {
        let file = File::create(&tmp_path)?;
        let mut writer = BufWriter::new(file);
        write(&mut writer)?;
        writer.flush()?;
    }
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

pub fn write_json_file<T: Serialize, P: AsRef<Path>>(data: &T, path: P) -> Result<()> {
    let json = to_json_pretty(data)?;
    write_atomically(&path, |w| Ok(w.write_all(json.as_bytes())?))
        .map_err(|e| e.with_context(format!("writing JSON to {:?}", path.as_ref())))
}

pub fn read_json_file<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let json = std::fs::read_to_string(&path).map_err(|e| {
        IoError::FileSystem(e).with_context(format!("reading JSON from {:?}", path.as_ref()))
    })?;
    from_json(&json)
}

pub fn write_gzip_json<T: Serialize, P: AsRef<Path>>(data: &T, path: P) -> Result<()> {
    let json = to_json(data)?;
    write_atomically(&path, |w| {
        let mut encoder = GzEncoder::new(w, Compression::default());
        encoder
            .write_all(json.as_bytes())
            .map_err(|e| IoError::compression(e.to_string()))?;
        encoder
            .finish()
            .map_err(|e| IoError::compression(e.to_string()))?;
        Ok(())
    })
    .map_err(|e| e.with_context(format!("writing gzip to {:?}", path.as_ref())))
}

pub fn read_gzip_json<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let file = File::open(&path).map_err(|e| {
        IoError::FileSystem(e).with_context(format!("reading gzip from {:?}", path.as_ref()))
    })?;
    let mut json = String::new();
    GzDecoder::new(file)
        .read_to_string(&mut json)
        .map_err(|e| IoError::compression(e.to_string()))?;
    from_json(&json)
}
