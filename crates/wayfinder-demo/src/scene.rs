//! Input files: step catalog, tour options and the simulated page.
//!
//! A scene stands in for the host document: the viewport the tour starts
//! with and one anchor box per step that "mounts" on the page.

use std::path::Path;

use serde::{Deserialize, Serialize};
use wayfinder::{BoundingBox, ConfigError, StaticCatalog, TourOptions, ViewportSnapshot};

use crate::error::{DemoError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportSpec {
    pub width: f64,
    pub height: f64,
    pub document_height: f64,
}

impl Default for ViewportSpec {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            document_height: 720.0,
        }
    }
}

impl ViewportSpec {
    #[must_use]
    pub fn snapshot(&self) -> ViewportSnapshot {
        ViewportSnapshot::new(self.width, self.height, self.document_height)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnchorSpec {
    pub step: String,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub fixed: bool,
}

impl AnchorSpec {
    #[must_use]
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::new(self.left, self.top, self.width, self.height)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scene {
    pub viewport: ViewportSpec,
    pub anchors: Vec<AnchorSpec>,
}

impl Scene {
    pub fn from_toml_str(s: &str) -> std::result::Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_json_str(s: &str) -> std::result::Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Load tour options, picking the format from the file extension.
pub fn load_options(path: &Path) -> Result<TourOptions> {
    let loaded = if is_json(path) {
        TourOptions::from_json_file(path)
    } else {
        TourOptions::from_toml_file(path)
    };
    loaded.map_err(|err| DemoError::config(path, err))
}

pub fn load_catalog(path: &Path) -> Result<StaticCatalog> {
    let loaded = if is_json(path) {
        StaticCatalog::from_json_file(path)
    } else {
        StaticCatalog::from_toml_file(path)
    };
    loaded.map_err(|err| DemoError::config(path, err))
}

pub fn load_scene(path: &Path) -> Result<Scene> {
    let content = std::fs::read_to_string(path)?;
    let parsed = if is_json(path) {
        Scene::from_json_str(&content)
    } else {
        Scene::from_toml_str(&content)
    };
    parsed.map_err(|err| DemoError::config(path, err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_from_toml() {
        let scene = Scene::from_toml_str(
            r#"
            [viewport]
            width = 800.0
            document_height = 3000.0

            [[anchors]]
            step = "a"
            left = 1.0
            top = 2.0
            width = 3.0
            height = 4.0
            "#,
        )
        .expect("parse");
        assert_eq!(scene.viewport.width, 800.0);
        assert_eq!(scene.viewport.height, 720.0);
        assert_eq!(scene.anchors.len(), 1);
        assert!(!scene.anchors[0].fixed);
        assert_eq!(scene.anchors[0].bounding_box(), BoundingBox::new(1.0, 2.0, 3.0, 4.0));
    }

    #[test]
    fn extension_selects_format() {
        assert!(is_json(Path::new("tour.JSON")));
        assert!(!is_json(Path::new("tour.toml")));
        assert!(!is_json(Path::new("tour")));
    }

    #[test]
    fn load_errors_name_the_file() {
        let err = load_options(Path::new("/no/such/tour.toml")).unwrap_err();
        assert!(err.to_string().starts_with("/no/such/tour.toml:"));
    }
}
