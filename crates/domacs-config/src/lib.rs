mod keymap;

pub use keymap::{Key, KeyChord, Keymap, Modifiers};

use domacs_engine::Action;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid key chord {chord:?}: {reason}")]
    InvalidChord { chord: String, reason: String },
}

/// User configuration, stored as TOML:
///
/// ```toml
/// use_default_bindings = true
///
/// [bindings]
/// "Ctrl+j" = "next-line"
/// "Ctrl+Alt+c" = "codify-selection"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Start from the emacs defaults before applying `bindings`.
    #[serde(default = "default_true")]
    pub use_default_bindings: bool,

    /// Chord (as written, e.g. `Ctrl+f`) to action.
    #[serde(default)]
    pub bindings: BTreeMap<String, Action>,
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            use_default_bindings: true,
            bindings: BTreeMap::new(),
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Surface bad chords at load time rather than on first key press
        config.keymap()?;

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/domacs");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// The effective keymap: defaults (if enabled) overridden by `bindings`.
    pub fn keymap(&self) -> Result<Keymap, ConfigError> {
        let mut keymap = if self.use_default_bindings {
            Keymap::emacs()
        } else {
            Keymap::empty()
        };
        for (chord, action) in &self.bindings {
            keymap.bind(chord.parse()?, *action);
        }
        Ok(keymap)
    }

    /// Records a binding, normalising how the chord is written.
    pub fn bind(&mut self, chord: &str, action: Action) -> Result<(), ConfigError> {
        let chord: KeyChord = chord.parse()?;
        self.bindings.insert(chord.to_string(), action);
        Ok(())
    }
}
