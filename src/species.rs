use crate::errors::{SpeciesDataError, SpeciesDataResult};
use std::collections::HashMap;
use std::sync::LazyLock;

// Re-export the Species enum from the schema crate
pub use schema::{Species, SpeciesData};

const SPECIES_CATALOG_RON: &str = include_str!("../data/species.ron");

// Global species data storage - parsed once on first access
static SPECIES_DATA: LazyLock<SpeciesDataResult<HashMap<Species, SpeciesData>>> =
    LazyLock::new(|| parse_species_catalog(SPECIES_CATALOG_RON));

/// Get the catalog entry for a species
pub fn get_species_data(species: Species) -> SpeciesDataResult<&'static SpeciesData> {
    match &*SPECIES_DATA {
        Ok(map) => map
            .get(&species)
            .ok_or(SpeciesDataError::SpeciesNotFound(species)),
        Err(err) => Err(err.clone()),
    }
}

/// Parse and validate a RON species list into a lookup table.
pub fn parse_species_catalog(source: &str) -> SpeciesDataResult<HashMap<Species, SpeciesData>> {
    let entries: Vec<SpeciesData> =
        ron::from_str(source).map_err(|e| SpeciesDataError::MalformedData(e.to_string()))?;

    let mut map = HashMap::with_capacity(entries.len());
    for data in entries {
        if data.moves.is_empty() {
            return Err(SpeciesDataError::MalformedData(format!(
                "{} has no moves",
                data.species
            )));
        }
        if data.base_stats.hp == 0 {
            return Err(SpeciesDataError::MalformedData(format!(
                "{} has zero base HP",
                data.species
            )));
        }
        if map.insert(data.species, data.clone()).is_some() {
            return Err(SpeciesDataError::MalformedData(format!(
                "duplicate entry for {}",
                data.species
            )));
        }
    }
    Ok(map)
}
