//! Showcase configuration.
//!
//! [`FolioConfig::default`] carries the values the portfolio ships with. A
//! `folio.json` placed next to the scene asset can override any subset of
//! them; missing fields keep their defaults.

use std::collections::BTreeMap;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::{modal::ProjectInfo, resources::load_string};

/// File name looked up in the asset directory at start-up.
pub const CONFIG_FILE: &str = "folio.json";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FolioConfig {
    /// glTF/GLB scene loaded at start-up.
    pub scene_file: String,
    /// Name of the group (or mesh) whose meshes are used for collisions only.
    pub collision_group: String,
    pub character: CharacterConfig,
    pub camera: CameraConfig,
    pub lighting: LightingConfig,
    pub sky: Vec<SkyStop>,
    /// Clickable scene nodes by name and what the modal shows for them.
    pub projects: BTreeMap<String, ProjectInfo>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterConfig {
    pub node_name: String,
    pub move_distance: f32,
    pub jump_height: f32,
    pub move_duration_secs: f32,
    /// Heights above the character's origin at which collision rays are cast.
    pub ray_heights: Vec<f32>,
    /// A wall closer than `move_distance + collision_margin` blocks a step.
    pub collision_margin: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Half of the orthographic frustum height before zoom.
    pub half_height: f32,
    pub near: f32,
    pub far: f32,
    pub zoom: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub initial_position: [f32; 3],
    pub initial_target: [f32; 3],
    /// Offset from the character to the camera. The Y component is absolute.
    pub follow_offset: [f32; 3],
    /// Height of the look-at target while following.
    pub target_height: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    pub sun_position: [f32; 3],
    pub sun_color: [f32; 3],
    pub sun_intensity: f32,
    pub ambient_color: [f32; 3],
    pub ambient_intensity: f32,
    pub exposure: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SkyStop {
    /// 0.0 is the top of the screen, 1.0 the bottom.
    pub offset: f32,
    /// `#rrggbb`
    pub colour: String,
}

impl Default for FolioConfig {
    fn default() -> Self {
        let project = |title: &str, content: &str| ProjectInfo {
            title: title.to_string(),
            content: content.to_string(),
            link: Some("https://cadesarkin.com".to_string()),
        };
        let projects = BTreeMap::from([
            (
                "Project_1".to_string(),
                project("Project One", "this is project one. hello world"),
            ),
            (
                "Project_2".to_string(),
                project("Project Two", "this is project two. hello world"),
            ),
            (
                "Project_3".to_string(),
                project("Project Three", "this is project three. hello world"),
            ),
        ]);
        Self {
            scene_file: "Portfolio_3.glb".to_string(),
            collision_group: "Collision".to_string(),
            character: CharacterConfig::default(),
            camera: CameraConfig::default(),
            lighting: LightingConfig::default(),
            sky: vec![
                SkyStop::new(0.0, "#87ceeb"),
                SkyStop::new(0.3, "#a8d8f0"),
                SkyStop::new(0.7, "#c9e4f6"),
                SkyStop::new(1.0, "#e8f4fc"),
            ],
            projects,
        }
    }
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self {
            node_name: "Character".to_string(),
            move_distance: 5.0,
            jump_height: 2.0,
            move_duration_secs: 0.2,
            ray_heights: vec![1.0, 3.0, 5.0, 10.0],
            collision_margin: 1.0,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            half_height: 50.0,
            near: 0.1,
            far: 2000.0,
            zoom: 0.75,
            min_zoom: 0.1,
            max_zoom: 10.0,
            initial_position: [252.0, 175.0, 381.0],
            initial_target: [98.0, -32.0, 7.0],
            follow_offset: [154.0, 207.0, 374.0],
            target_height: 0.0,
        }
    }
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            sun_position: [-264.0, 800.0, -262.0],
            sun_color: [1.0, 1.0, 1.0],
            sun_intensity: 1.0,
            ambient_color: [1.0, 1.0, 1.0],
            ambient_intensity: 2.0,
            exposure: 1.3,
        }
    }
}

impl SkyStop {
    pub fn new(offset: f32, colour: &str) -> Self {
        Self {
            offset,
            colour: colour.to_string(),
        }
    }
}

impl FolioConfig {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("folio config is not valid JSON")
    }

    /// Loads `file_name` from the asset directory. A missing or broken file is
    /// not fatal: the defaults are used and a warning is logged.
    pub async fn load(file_name: &str) -> Self {
        let parsed = match load_string(file_name).await {
            Ok(json) => Self::from_json(&json),
            Err(e) => {
                log::warn!("No {} found ({}), using the built-in defaults.", file_name, e);
                return Self::default();
            }
        };
        match parsed {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Ignoring {}: {:#}", file_name, e);
                Self::default()
            }
        }
    }

    /// Names of the scene nodes that can be clicked.
    pub fn interactive_names(&self) -> Vec<&str> {
        self.projects.keys().map(String::as_str).collect()
    }
}
