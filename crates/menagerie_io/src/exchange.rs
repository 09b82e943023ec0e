//! Gene-pool exchange between simulations.
//!
//! Exported records keep their lineage and generation for reference, but an
//! import always produces fresh founders: new ids, generation 1, no parents
//! and full energy. Each record is checked on its own, so one malformed
//! entry only skips itself.

use crate::error::{IoError, Result};
use crate::serialization::{from_hex_dna, read_json_file, to_hex_dna, write_json_file};
use menagerie_core::config::WorldConfig;
use menagerie_core::lifecycle::random_position;
use menagerie_core::random::RandomSource;
use menagerie_data::{Individual, TraitSet};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

pub const POOL_VERSION: u32 = 1;

/// One exported genome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolRecord {
    pub name: String,
    pub traits: TraitSet,
    #[serde(default = "default_generation")]
    pub generation: u32,
    #[serde(default)]
    pub parent_ids: Option<[Uuid; 2]>,
}

fn default_generation() -> u32 {
    1
}

impl From<&Individual> for PoolRecord {
    fn from(ind: &Individual) -> Self {
        Self {
            name: ind.name.clone(),
            traits: ind.traits,
            generation: ind.generation,
            parent_ids: ind.parent_ids,
        }
    }
}

/// Exchange file. Records stay as raw JSON until import so that a single
/// bad entry does not poison the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolFile {
    pub version: u32,
    #[serde(default)]
    pub exported_at: String,
    pub records: Vec<serde_json::Value>,
}

#[derive(Debug, Default)]
pub struct ImportReport {
    pub imported: Vec<Individual>,
    /// One `MalformedImportRecord` per skipped entry.
    pub skipped: Vec<IoError>,
    pub warnings: Vec<IoError>,
}

/// Exports the members whose ids are listed, in population order. An empty
/// id list exports everyone.
pub fn export_pool(population: &[Individual], ids: &[Uuid]) -> Result<PoolFile> {
    let records = population
        .iter()
        .filter(|ind| ids.is_empty() || ids.contains(&ind.id))
        .map(|ind| serde_json::to_value(PoolRecord::from(ind)).map_err(IoError::from))
        .collect::<Result<Vec<_>>>()?;

    Ok(PoolFile {
        version: POOL_VERSION,
        exported_at: chrono::Utc::now().to_rfc3339(),
        records,
    })
}

/// Turns a record into a fresh founder.
#[must_use]
pub fn adopt<R: RandomSource + ?Sized>(
    record: PoolRecord,
    clock_ms: u64,
    world: &WorldConfig,
    rng: &mut R,
) -> Individual {
    let energy = record.traits.physique.stamina;
    Individual {
        id: Uuid::new_v4(),
        name: record.name,
        generation: 1,
        traits: record.traits,
        parent_ids: None,
        energy,
        born_at_ms: clock_ms,
        position: random_position(world, rng),
        resting: false,
        rest_elapsed_ms: 0.0,
        wander_target: None,
    }
}

fn parse_record(index: usize, value: &serde_json::Value) -> Result<PoolRecord> {
    let record = PoolRecord::deserialize(value).map_err(|e| IoError::malformed(index, e.to_string()))?;
    if record.name.trim().is_empty() {
        return Err(IoError::malformed(index, "empty name"));
    }
    if !record.traits.is_well_formed() {
        return Err(IoError::malformed(index, "non-finite or negative traits"));
    }
    Ok(record)
}

pub fn import_pool<R: RandomSource + ?Sized>(
    file: &PoolFile,
    clock_ms: u64,
    world: &WorldConfig,
    rng: &mut R,
) -> ImportReport {
    let mut report = ImportReport::default();

    if file.version != POOL_VERSION {
        tracing::warn!(
            expected = POOL_VERSION,
            found = file.version,
            "Pool file version mismatch"
        );
        report.warnings.push(IoError::VersionMismatch {
            expected: POOL_VERSION,
            found: file.version,
        });
    }

    for (index, value) in file.records.iter().enumerate() {
        match parse_record(index, value) {
            Ok(record) => report.imported.push(adopt(record, clock_ms, world, rng)),
            Err(e) => {
                tracing::warn!(index, error = %e, "Skipping import record");
                report.skipped.push(e);
            }
        }
    }

    tracing::info!(
        imported = report.imported.len(),
        skipped = report.skipped.len(),
        "Pool imported"
    );
    report
}

pub fn write_pool<P: AsRef<Path>>(file: &PoolFile, path: P) -> Result<()> {
    write_json_file(file, path)
}

pub fn read_pool<P: AsRef<Path>>(path: P) -> Result<PoolFile> {
    read_json_file(path)
}

/// Single-genome share code.
pub fn share_code(individual: &Individual) -> Result<String> {
    to_hex_dna(&PoolRecord::from(individual))
}

pub fn from_share_code(code: &str) -> Result<PoolRecord> {
    let record: PoolRecord = from_hex_dna(code)?;
    if !record.traits.is_well_formed() {
        return Err(IoError::validation("share code carries invalid traits"));
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use menagerie_core::lifecycle::create_founder_with_rng;
    use menagerie_core::random::RngSource;
    use menagerie_data::Position;
    use serde_json::json;

    fn founders(n: usize) -> Vec<Individual> {
        let mut rng = RngSource::seeded(9);
        (0..n)
            .map(|_| create_founder_with_rng(Position::default(), 0, &mut rng))
            .collect()
    }

    #[test]
    fn test_export_selected_ids() {
        let pop = founders(4);
        let file = export_pool(&pop, &[pop[1].id, pop[3].id]).unwrap();
        assert_eq!(file.version, POOL_VERSION);
        assert_eq!(file.records.len(), 2);
        assert_eq!(file.records[0]["name"], json!(pop[1].name));
        assert_eq!(export_pool(&pop, &[]).unwrap().records.len(), 4);
    }

    #[test]
    fn test_import_makes_fresh_founders() {
        let mut pop = founders(1);
        pop[0].generation = 7;
        pop[0].parent_ids = Some([Uuid::new_v4(), Uuid::new_v4()]);
        pop[0].energy = 0.0;
        let file = export_pool(&pop, &[]).unwrap();

        let mut rng = RngSource::seeded(1);
        let report = import_pool(&file, 500, &WorldConfig::default(), &mut rng);
        assert!(report.skipped.is_empty());
        let imported = &report.imported[0];
        assert_eq!(imported.generation, 1);
        assert_eq!(imported.parent_ids, None);
        assert_ne!(imported.id, pop[0].id);
        assert_eq!(imported.energy, imported.stamina());
        assert_eq!(imported.born_at_ms, 500);
        assert_eq!(imported.traits, pop[0].traits);
    }

    #[test]
    fn test_malformed_records_are_skipped() {
        let pop = founders(2);
        let mut file = export_pool(&pop, &[]).unwrap();
        file.records.insert(1, json!({ "name": "Nobody" }));
        let mut bad_traits = file.records[0].clone();
        bad_traits["traits"]["physique"]["size"] = json!(-3.0);
        file.records.push(bad_traits);

        let mut rng = RngSource::seeded(2);
        let report = import_pool(&file, 0, &WorldConfig::default(), &mut rng);
        assert_eq!(report.imported.len(), 2);
        assert_eq!(report.skipped.len(), 2);
        assert!(matches!(
            report.skipped[0],
            IoError::MalformedImportRecord { index: 1, .. }
        ));
        assert!(matches!(
            report.skipped[1],
            IoError::MalformedImportRecord { index: 3, .. }
        ));
    }

    #[test]
    fn test_version_mismatch_still_imports() {
        let mut file = export_pool(&founders(1), &[]).unwrap();
        file.version = 9;
        let mut rng = RngSource::seeded(3);
        let report = import_pool(&file, 0, &WorldConfig::default(), &mut rng);
        assert_eq!(report.imported.len(), 1);
        assert!(matches!(
            report.warnings[0],
            IoError::VersionMismatch { expected: 1, found: 9 }
        ));
    }

    #[test]
    fn test_share_code() {
        let pop = founders(1);
        let code = share_code(&pop[0]).unwrap();
        let record = from_share_code(&code).unwrap();
        assert_eq!(record.name, pop[0].name);
        assert_eq!(record.traits, pop[0].traits);
        assert!(from_share_code("00").is_err());
    }
}
