//! Save files for the living population.
//!
//! Three formats share one record layout: pretty JSON, gzip JSON (`.gz`) and
//! rkyv binary checkpoints (`.rkyv`). Loading is all-or-nothing. A version
//! mismatch alone never fails a load; it comes back as a warning.

use crate::error::{IoError, Result};
use crate::serialization::{read_gzip_json, read_json_file, write_gzip_json, write_json_file};
use menagerie_data::{Individual, Position, TraitSet};
use rkyv::de::deserializers::SharedDeserializeMap;
use rkyv::ser::serializers::AllocSerializer;
use rkyv::ser::Serializer;
use rkyv::{Archive, Deserialize as RkyvDeserialize, Serialize as RkyvSerialize};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use uuid::Uuid;

pub const SCHEMA_VERSION: u32 = 1;

/// Flat, persisted view of one individual. Runtime state such as position
/// and resting is not saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Archive, RkyvSerialize, RkyvDeserialize)]
#[archive(check_bytes)]
pub struct IndividualRecord {
    pub id: Uuid,
    pub name: String,
    pub traits: TraitSet,
    pub generation: u32,
    pub parent_ids: Option<[Uuid; 2]>,
    pub born_at_ms: u64,
    pub energy: f64,
}

impl From<&Individual> for IndividualRecord {
    fn from(ind: &Individual) -> Self {
        Self {
            id: ind.id,
            name: ind.name.clone(),
            traits: ind.traits,
            generation: ind.generation,
            parent_ids: ind.parent_ids,
            born_at_ms: ind.born_at_ms,
            energy: ind.energy,
        }
    }
}

impl IndividualRecord {
    /// Rejects records that would break the individual invariants.
    pub fn validate(&self) -> Result<()> {
        if !self.traits.is_well_formed() {
            return Err(IoError::validation(format!(
                "{} has non-finite or negative traits",
                self.id
            )));
        }
        if !self.energy.is_finite() || self.energy < 0.0 {
            return Err(IoError::validation(format!(
                "{} has invalid energy {}",
                self.id, self.energy
            )));
        }
        if self.generation == 0 {
            return Err(IoError::validation(format!("{} has generation 0", self.id)));
        }
        Ok(())
    }

    /// Rebuilds the live individual. Energy above stamina is clamped.
    #[must_use]
    pub fn into_individual(self, position: Position) -> Individual {
        let stamina = self.traits.physique.stamina;
        Individual {
            id: self.id,
            name: self.name,
            generation: self.generation,
            energy: self.energy.min(stamina),
            traits: self.traits,
            parent_ids: self.parent_ids,
            born_at_ms: self.born_at_ms,
            position,
            resting: false,
            rest_elapsed_ms: 0.0,
            wander_target: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Archive, RkyvSerialize, RkyvDeserialize)]
#[archive(check_bytes)]
pub struct SaveFile {
    pub version: u32,
    /// RFC3339 wall-clock time of the save.
    pub saved_at: String,
    #[serde(default)]
    pub config_fingerprint: String,
    pub individuals: Vec<IndividualRecord>,
}

impl SaveFile {
    #[must_use]
    pub fn capture(population: &[Individual], config_fingerprint: &str) -> Self {
        Self {
            version: SCHEMA_VERSION,
            saved_at: chrono::Utc::now().to_rfc3339(),
            config_fingerprint: config_fingerprint.to_string(),
            individuals: population.iter().map(IndividualRecord::from).collect(),
        }
    }
}

/// Result of a successful load.
#[derive(Debug)]
pub struct LoadedPopulation {
    pub individuals: Vec<Individual>,
    pub config_fingerprint: String,
    pub warnings: Vec<IoError>,
}

/// Validates every record and rebuilds the population. Any bad record or
/// duplicate id fails the whole restore.
pub fn restore(file: SaveFile) -> Result<LoadedPopulation> {
    let mut warnings = Vec::new();
    if file.version != SCHEMA_VERSION {
        tracing::warn!(
            expected = SCHEMA_VERSION,
            found = file.version,
            "Save file version mismatch"
        );
        warnings.push(IoError::VersionMismatch {
            expected: SCHEMA_VERSION,
            found: file.version,
        });
    }

    let mut seen = HashSet::with_capacity(file.individuals.len());
    for (index, record) in file.individuals.iter().enumerate() {
        record
            .validate()
            .map_err(|e| e.with_context(format!("record #{index}")))?;
        if !seen.insert(record.id) {
            return Err(IoError::validation(format!("duplicate id {}", record.id)));
        }
    }

    let individuals = file
        .individuals
        .into_iter()
        .map(|r| r.into_individual(Position::default()))
        .collect();

    Ok(LoadedPopulation {
        individuals,
        config_fingerprint: file.config_fingerprint,
        warnings,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveFormat {
    Json,
    Gzip,
    Rkyv,
}

impl SaveFormat {
    /// Picks the format from the file extension, JSON by default.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("gz") => Self::Gzip,
            Some("rkyv") | Some("bin") => Self::Rkyv,
            _ => Self::Json,
        }
    }
}

pub fn save_population<P: AsRef<Path>>(file: &SaveFile, path: P) -> Result<()> {
    let path = path.as_ref();
    match SaveFormat::from_path(path) {
        SaveFormat::Json => write_json_file(file, path),
        SaveFormat::Gzip => write_gzip_json(file, path),
        SaveFormat::Rkyv => save_rkyv(file, path),
    }?;
    tracing::info!(
        path = %path.display(),
        individuals = file.individuals.len(),
        "Population saved"
    );
    Ok(())
}

pub fn load_population<P: AsRef<Path>>(path: P) -> Result<LoadedPopulation> {
    let path = path.as_ref();
    let file: SaveFile = match SaveFormat::from_path(path) {
        SaveFormat::Json => read_json_file(path),
        SaveFormat::Gzip => read_gzip_json(path),
        SaveFormat::Rkyv => load_rkyv(path),
    }?;
    let loaded = restore(file).map_err(|e| e.with_context(format!("loading {}", path.display())))?;
    tracing::info!(
        path = %path.display(),
        individuals = loaded.individuals.len(),
        "Population loaded"
    );
    Ok(loaded)
}

pub fn save_rkyv<T, P>(data: &T, path: P) -> Result<()>
where
    T: RkyvSerialize<AllocSerializer<4096>>,
    P: AsRef<Path>,
{
    let mut serializer = AllocSerializer::<4096>::default();
    serializer
        .serialize_value(data)
        .map_err(|e| IoError::rkyv(format!("serialization failed: {e:?}")))?;
    let bytes = serializer.into_serializer().into_inner();
    std::fs::write(path, &bytes)?;
    Ok(())
}

pub fn load_rkyv<T, P>(path: P) -> Result<T>
where
    T: Archive,
    T::Archived: RkyvDeserialize<T, SharedDeserializeMap>
        + for<'a> rkyv::CheckBytes<rkyv::validation::validators::DefaultValidator<'a>>,
    P: AsRef<Path>,
{
    let bytes = std::fs::read(path)?;
    let mut aligned = rkyv::AlignedVec::with_capacity(bytes.len());
    aligned.extend_from_slice(&bytes);
    let archived = rkyv::check_archived_root::<T>(&aligned)
        .map_err(|e| IoError::rkyv(format!("validation failed: {e:?}")))?;
    let mut deserializer = SharedDeserializeMap::default();
    archived
        .deserialize(&mut deserializer)
        .map_err(|e| IoError::rkyv(format!("deserialization failed: {e:?}")))
}
