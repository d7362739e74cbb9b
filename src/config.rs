use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;

const MIN_CANVAS_WIDTH: u32 = 200;
const MIN_CANVAS_HEIGHT: u32 = 100;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub grass: [u8; 4],
    pub stripe: [u8; 4],
    pub lines: [u8; 4],
    pub zone: [u8; 4],
    pub arrow: [u8; 4],
    pub home: [u8; 4],
    pub away: [u8; 4],
    pub marker_edge: [u8; 4],
    pub marker_text: [u8; 4],
    pub overlay_background: [u8; 4],
    pub overlay_text: [u8; 4],
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            grass: [0x1f, 0x8f, 0x3a, 255],
            stripe: [0x1b, 0x7f, 0x34, 255],
            lines: [255, 255, 255, 255],
            // 35% yellow
            zone: [255, 255, 0, 89],
            arrow: [255, 0, 0, 255],
            home: [0x3b, 0x82, 0xf6, 255],
            away: [0xef, 0x44, 0x44, 255],
            marker_edge: [255, 255, 255, 255],
            marker_text: [255, 255, 255, 255],
            overlay_background: [0, 0, 0, 255],
            overlay_text: [255, 255, 255, 255],
        }
    }
}

/// Read-only settings for the rendered board.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub font_path: Option<PathBuf>,
    pub palette: Palette,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1800,
            canvas_height: 1000,
            font_path: None,
            palette: Palette::default(),
        }
    }
}

impl BoardConfig {
    fn file_path() -> Option<PathBuf> {
        let dirs = ProjectDirs::from("", "", "tactical-board")?;
        Some(dirs.config_dir().join("config.json"))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw).context("cannot parse board config")?;
        Ok(config.sanitized())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        Self::from_json(&raw)
    }

    /// Load the user config, falling back to defaults when it is missing or broken.
    pub fn load_or_default() -> Self {
        let Some(path) = Self::file_path() else {
            log::warn!("no config directory available, using default board config");
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => {
                log::info!("loaded board config from {}", path.display());
                config
            }
            Err(err) => {
                log::warn!("{err:#}; using default board config");
                Self::default()
            }
        }
    }

    /// Clamp canvas size and keep the pitch background solid; every layer
    /// is composited on top of it.
    pub fn sanitized(mut self) -> Self {
        self.canvas_width = self.canvas_width.max(MIN_CANVAS_WIDTH);
        self.canvas_height = self.canvas_height.max(MIN_CANVAS_HEIGHT);
        self.palette.grass[3] = 255;
        self.palette.stripe[3] = 255;
        self
    }

    /// Scale a length given for a 1000 px tall canvas to this canvas.
    pub fn px(&self, reference: f32) -> f32 {
        reference * self.canvas_height as f32 / 1000.0
    }
}
