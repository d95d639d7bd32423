// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Program catalog: the registration-link lookup table, pricing, and the
//! training modes each activity/segment pairing offers.

use crate::models::program::{Program, ProgramCategory, ProgramKey};
use crate::models::selection::{
    ActivityType, Selection, Segment, Track, TrainingMode, UserType,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Registration links shipped with the binary.
const STANDARD_PROGRAMS: &str = include_str!("../../data/programs.json");

const COACH_ASSISTED_MODES: &[TrainingMode] =
    &[TrainingMode::Std, TrainingMode::Exp, TrainingMode::Speed];
const SELF_SERVE_MODES: &[TrainingMode] = &[TrainingMode::Std, TrainingMode::Exp];
const WALKING_MODES: &[TrainingMode] = &[TrainingMode::Std];

/// Price of a (possibly partial) selection, in whole dollars.
///
/// Anything other than Running or Walking is free. A missing user type
/// prices as a new user.
pub fn resolve_cost(selection: &Selection) -> u32 {
    let coach_assisted = selection.segment.is_some_and(Segment::is_coach_assisted);
    let returning = selection.user_type == Some(UserType::Return);

    match selection.activity_type {
        Some(ActivityType::Running) => match (coach_assisted, returning) {
            (true, false) => 60,
            // Coach-assisted returning and self-serve new share a price.
            (true, true) | (false, false) => 35,
            (false, true) => 20,
        },
        Some(ActivityType::Walking) => {
            if coach_assisted {
                30
            } else {
                15
            }
        }
        _ => 0,
    }
}

/// Training modes offered for an activity and segment, in display order.
pub fn available_training_modes(
    activity_type: Option<ActivityType>,
    segment: Option<Segment>,
) -> &'static [TrainingMode] {
    match (activity_type, segment) {
        (Some(ActivityType::Walking), _) => WALKING_MODES,
        (_, Some(Segment::CoachGuided)) => COACH_ASSISTED_MODES,
        _ => SELF_SERVE_MODES,
    }
}

/// One row of the catalog data file.
#[derive(Debug, Deserialize)]
struct CatalogEntry {
    track: Track,
    segment: Segment,
    activity_type: ActivityType,
    user_type: UserType,
    training_mode: TrainingMode,
    url: String,
}

impl CatalogEntry {
    fn key(&self) -> ProgramKey {
        ProgramKey {
            track: self.track,
            segment: self.segment,
            activity_type: self.activity_type,
            user_type: self.user_type,
            training_mode: self.training_mode,
        }
    }
}

/// Immutable map from program key to registration URL.
#[derive(Debug, Default, Clone)]
pub struct ProgramCatalog {
    /// Entries in file order, for listings
    entries: Vec<(ProgramKey, String)>,
    index: HashMap<ProgramKey, usize>,
}

impl ProgramCatalog {
    /// The catalog compiled into the binary.
    pub fn standard() -> Result<Self, CatalogError> {
        Self::load_from_json(STANDARD_PROGRAMS)
    }

    /// Load a catalog from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let json_data =
            fs::read_to_string(path.as_ref()).map_err(|e| CatalogError::IoError(e.to_string()))?;
        Self::load_from_json(&json_data)
    }

    /// Load a catalog from a JSON array of entries.
    pub fn load_from_json(json_data: &str) -> Result<Self, CatalogError> {
        let rows: Vec<CatalogEntry> =
            serde_json::from_str(json_data).map_err(|e| CatalogError::ParseError(e.to_string()))?;

        let mut catalog = Self::default();
        for row in rows {
            let key = row.key();
            if row.url.trim().is_empty() {
                return Err(CatalogError::EmptyUrl(key.to_string()));
            }
            if catalog.index.insert(key, catalog.entries.len()).is_some() {
                return Err(CatalogError::DuplicateKey(key.to_string()));
            }
            catalog.entries.push((key, row.url));
        }

        tracing::info!(count = catalog.entries.len(), "Loaded program catalog");
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All keys, in file order.
    pub fn keys(&self) -> impl Iterator<Item = &ProgramKey> {
        self.entries.iter().map(|(key, _)| key)
    }

    pub fn lookup(&self, key: &ProgramKey) -> Option<&str> {
        self.index
            .get(key)
            .map(|&i| self.entries[i].1.as_str())
    }

    /// Registration URL for a selection. `None` when the selection is
    /// incomplete or names a combination with no program.
    pub fn resolve_url(&self, selection: &Selection) -> Option<&str> {
        ProgramKey::from_selection(selection).and_then(|key| self.lookup(&key))
    }

    /// Keys whose training mode the form would never offer.
    pub fn mismatched_keys(&self) -> Vec<ProgramKey> {
        self.keys()
            .filter(|key| {
                !available_training_modes(Some(key.activity_type), Some(key.segment))
                    .contains(&key.training_mode)
            })
            .copied()
            .collect()
    }

    /// Every program, grouped by track in catalog order.
    pub fn programs(&self) -> Vec<ProgramCategory> {
        let mut categories: Vec<ProgramCategory> = Vec::new();

        for (key, url) in &self.entries {
            let category_name = track_title(key.track);
            let cost = resolve_cost(&key.to_selection());
            let program = Program {
                name: format!(
                    "{} {} ({}, {} user, {})",
                    category_name, key.activity_type, key.segment, key.user_type, key.training_mode
                ),
                url: url.clone(),
                description: Some(if cost == 0 {
                    "No charge".to_string()
                } else {
                    format!("${cost}")
                }),
                category: Some(category_name.to_string()),
            };

            match categories.iter_mut().find(|c| c.name == category_name) {
                Some(category) => category.programs.push(program),
                None => categories.push(ProgramCategory {
                    name: category_name.to_string(),
                    programs: vec![program],
                }),
            }
        }

        categories
    }
}

fn track_title(track: Track) -> &'static str {
    match track {
        Track::Spring => "Spring",
        Track::Summer => "Summer",
        Track::Fall => "Fall",
    }
}

/// Errors from loading a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read file: {0}")]
    IoError(String),

    #[error("Failed to parse catalog: {0}")]
    ParseError(String),

    #[error("Duplicate program key: {0}")]
    DuplicateKey(String),

    #[error("Program {0} has no URL")]
    EmptyUrl(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog_loads() {
        let catalog = ProgramCatalog::standard().expect("embedded catalog should parse");
        assert_eq!(catalog.len(), 62);
        assert!(catalog.mismatched_keys().is_empty());
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let json = r#"[
            {"track":"spring","segment":"Coach Guided","activity_type":"Running","user_type":"new","training_mode":"Std","url":"https://a"},
            {"track":"spring","segment":"Pro","activity_type":"Running","user_type":"New","training_mode":"Standard","url":"https://b"}
        ]"#;
        let err = ProgramCatalog::load_from_json(json).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateKey(ref k) if k == "spring|Coach Guided|Running|new|Std"));
    }

    #[test]
    fn test_empty_url_rejected() {
        let json = r#"[{"track":"fall","segment":"Self Serve","activity_type":"Walking","user_type":"new","training_mode":"Std","url":" "}]"#;
        assert!(matches!(
            ProgramCatalog::load_from_json(json),
            Err(CatalogError::EmptyUrl(_))
        ));
    }

    #[test]
    fn test_mismatched_keys_reported() {
        let json = r#"[{"track":"fall","segment":"Self Serve","activity_type":"Running","user_type":"new","training_mode":"Speed","url":"https://x"}]"#;
        let catalog = ProgramCatalog::load_from_json(json).unwrap();
        assert_eq!(catalog.mismatched_keys().len(), 1);
    }

    #[test]
    fn test_masters_is_free() {
        let selection = Selection {
            activity_type: Some(ActivityType::Masters),
            segment: Some(Segment::CoachGuided),
            user_type: Some(UserType::New),
            ..Default::default()
        };
        assert_eq!(resolve_cost(&selection), 0);
        assert_eq!(resolve_cost(&Selection::default()), 0);
    }
}
