//! Static step content.
//!
//! A [`StepDefinition`] is what the host knows about a step before any view
//! has mounted its anchor: the route it lives on and the text shown in the
//! callout. The controller reads definitions through the [`StepCatalog`]
//! trait; [`StaticCatalog`] is the stock in-memory implementation, loadable
//! from TOML or JSON:
//!
//! ```toml
//! [[steps]]
//! id = "cluster-list"
//! route = "/clusters"
//! title = "Your clusters"
//! text = "Every cluster you can reach is listed here."
//! side = "right"
//! ```

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use wayfinder_layout::Side;

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDefinition {
    pub id: String,
    pub route: String,
    pub title: String,
    #[serde(default)]
    pub text: String,
    /// Preferred side. `None` defers to `TourOptions::default_side`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
}

impl StepDefinition {
    pub fn new(id: impl Into<String>, route: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            route: route.into(),
            title: title.into(),
            text: String::new(),
            side: None,
        }
    }

    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    #[must_use]
    pub fn side(mut self, side: Side) -> Self {
        self.side = Some(side);
        self
    }
}

/// Read access to step definitions by id.
pub trait StepCatalog {
    fn get(&self, id: &str) -> Option<StepDefinition>;
}

impl<C: StepCatalog + ?Sized> StepCatalog for &C {
    fn get(&self, id: &str) -> Option<StepDefinition> {
        (**self).get(id)
    }
}

impl StepCatalog for HashMap<String, StepDefinition> {
    fn get(&self, id: &str) -> Option<StepDefinition> {
        HashMap::get(self, id).cloned()
    }
}

#[derive(Serialize, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    steps: Vec<StepDefinition>,
}

/// Ordered, id-indexed collection of [`StepDefinition`]s.
///
/// Inserting an id that already exists replaces the earlier definition in
/// place. Files are parsed as-is; duplicate ids in a file are reported by
/// [`validate`](Self::validate) and resolve to the last occurrence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "CatalogFile", into = "CatalogFile")]
pub struct StaticCatalog {
    steps: Vec<StepDefinition>,
    index: HashMap<String, usize>,
    duplicates: Vec<String>,
}

impl From<CatalogFile> for StaticCatalog {
    fn from(file: CatalogFile) -> Self {
        Self::from_definitions(file.steps)
    }
}

impl From<StaticCatalog> for CatalogFile {
    fn from(catalog: StaticCatalog) -> Self {
        Self {
            steps: catalog.steps,
        }
    }
}

impl StaticCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_definitions(definitions: impl IntoIterator<Item = StepDefinition>) -> Self {
        let mut catalog = Self::new();
        for def in definitions {
            if catalog.insert(def.clone()).is_some() {
                catalog.duplicates.push(def.id);
            }
        }
        catalog
    }

    /// Insert or replace a definition. Returns the replaced one, if any.
    pub fn insert(&mut self, def: StepDefinition) -> Option<StepDefinition> {
        match self.index.get(&def.id) {
            Some(&slot) => Some(std::mem::replace(&mut self.steps[slot], def)),
            None => {
                self.index.insert(def.id.clone(), self.steps.len());
                self.steps.push(def);
                None
            }
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StepDefinition> {
        self.steps.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().map(|def| def.id.as_str())
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Problems with the loaded definitions, one message each.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let mut reported = HashSet::new();
        for id in &self.duplicates {
            if reported.insert(id.as_str()) {
                errors.push(format!("step `{id}` is defined more than once"));
            }
        }
        for def in &self.steps {
            if def.id.trim().is_empty() {
                errors.push("a step has an empty id".to_string());
            }
            if def.route.trim().is_empty() {
                errors.push(format!("step `{}` has an empty route", def.id));
            }
        }
        errors
    }

    /// Ids in `sequence` that this catalog does not define.
    pub fn missing<'a>(&self, sequence: &'a [String]) -> Vec<&'a str> {
        sequence
            .iter()
            .map(String::as_str)
            .filter(|id| !self.contains(id))
            .collect()
    }
}

impl StepCatalog for StaticCatalog {
    fn get(&self, id: &str) -> Option<StepDefinition> {
        self.index.get(id).map(|&slot| self.steps[slot].clone())
    }
}

impl FromIterator<StepDefinition> for StaticCatalog {
    fn from_iter<T: IntoIterator<Item = StepDefinition>>(iter: T) -> Self {
        Self::from_definitions(iter)
    }
}
