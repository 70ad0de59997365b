//! The Rhai scripting engine for pipette
//!
//! Provides the `pipette` namespace:
//! - `pipette::config::*` - settings, themes, keybinds

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use rhai::{AST, Engine, Scope};
use thiserror::Error;

use super::api;
use crate::config::Settings;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("config parse error: {0}")]
    Parse(String),
    #[error("config error: {0}")]
    Eval(String),
}

/// The scripting engine that evaluates `init.rhai`
pub struct ScriptEngine {
    engine: Engine,
    settings: Arc<RwLock<Settings>>,
    ast: Option<AST>,
}

impl ScriptEngine {
    /// Create a new script engine with fresh settings
    pub fn new() -> Self {
        let settings = Arc::new(RwLock::new(Settings::default()));
        let engine = Self::create_engine(Arc::clone(&settings));

        Self {
            engine,
            settings,
            ast: None,
        }
    }

    /// Create the Rhai engine with the `pipette` namespace
    fn create_engine(settings: Arc<RwLock<Settings>>) -> Engine {
        let mut engine = Engine::new();

        // Safety limits
        engine.set_max_expr_depths(64, 64);
        engine.set_max_operations(100_000);

        let mut pipette_module = rhai::Module::new();
        let config_module = api::config::create_module(Arc::clone(&settings));
        pipette_module.set_sub_module("config", config_module);
        engine.register_static_module("pipette", pipette_module.into());

        engine.on_print(|msg| log::info!("[rhai] {msg}"));
        engine.on_debug(|msg, _, pos| log::debug!("[rhai] {pos:?}: {msg}"));

        engine
    }

    /// Load and execute a config file
    pub fn load_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        self.eval(&content)
    }

    /// Evaluate a Rhai script string
    pub fn eval(&mut self, script: &str) -> Result<(), ConfigError> {
        let ast = self
            .engine
            .compile(script)
            .map_err(|e| ConfigError::Parse(e.to_string()))?;

        let mut scope = Scope::new();
        self.engine
            .run_ast_with_scope(&mut scope, &ast)
            .map_err(|e| ConfigError::Eval(e.to_string()))?;

        self.ast = Some(ast);
        Ok(())
    }

    /// Get the current settings (cloned)
    pub fn settings(&self) -> Settings {
        self.settings.read().map(|s| s.clone()).unwrap_or_default()
    }

    /// Get the config directory path
    /// Uses ~/.config/pipette/ on all platforms for consistency
    pub fn config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("pipette"))
    }

    /// Get the default config file path
    pub fn config_file() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("init.rhai"))
    }

    /// Load the default config file if it exists
    pub fn load_default(&mut self) -> Result<(), ConfigError> {
        if let Some(config_file) = Self::config_file() {
            if config_file.exists() {
                return self.load_file(&config_file);
            }
        }
        Ok(()) // No config file is fine
    }
}

impl Default for ScriptEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipette_config_set_theme() {
        let mut engine = ScriptEngine::new();
        engine.eval(r#"pipette::config::set_theme("nord");"#).unwrap();
        assert_eq!(engine.settings().theme, "nord");
    }

    #[test]
    fn test_pipette_config_capacities_are_clamped() {
        let mut engine = ScriptEngine::new();
        engine
            .eval(
                r#"
                pipette::config::set_history_capacity(0);
                pipette::config::set_favorites_capacity(500);
            "#,
            )
            .unwrap();
        let settings = engine.settings();
        assert_eq!(settings.history_capacity, 1);
        assert_eq!(settings.favorites_capacity, 50);
    }

    #[test]
    fn test_pipette_config_sampler() {
        let mut engine = ScriptEngine::new();
        engine
            .eval(
                r#"
                pipette::config::set_sampler("hyprpicker");
                pipette::config::set_sampler_args(["--format", "hex"]);
            "#,
            )
            .unwrap();
        let settings = engine.settings();
        assert_eq!(settings.sampler, "hyprpicker");
        assert_eq!(settings.sampler_args, vec!["--format", "hex"]);
    }

    #[test]
    fn test_pipette_config_bind() {
        let mut engine = ScriptEngine::new();
        engine
            .eval(r#"pipette::config::bind("<A-s>", "save_favorite");"#)
            .unwrap();
        let settings = engine.settings();
        assert_eq!(
            settings.keybinds.get("<A-s>"),
            Some(&"save_favorite".to_string())
        );
    }

    #[test]
    fn test_pipette_config_multiple() {
        let mut engine = ScriptEngine::new();
        engine
            .eval(
                r#"
                pipette::config::set_theme("dracula");
                pipette::config::set_copy_on_pick(false);
                pipette::config::set_show_color_name(false);
                pipette::config::set_toast_duration(1500);
            "#,
            )
            .unwrap();

        let settings = engine.settings();
        assert_eq!(settings.theme, "dracula");
        assert!(!settings.copy_on_pick);
        assert!(!settings.show_color_name);
        assert_eq!(settings.toast_duration_ms, 1500);
    }

    #[test]
    fn test_pipette_config_list_themes() {
        let mut engine = ScriptEngine::new();
        engine
            .eval(
                r#"
                let themes = pipette::config::list_themes();
                if themes.len() == 0 {
                    throw "No themes returned";
                }
            "#,
            )
            .unwrap();
    }

    #[test]
    fn test_syntax_error_is_parse_error() {
        let mut engine = ScriptEngine::new();
        assert!(matches!(
            engine.eval("pipette::config::set_theme("),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let mut engine = ScriptEngine::new();
        assert!(matches!(
            engine.load_file(Path::new("/nonexistent/pipette/init.rhai")),
            Err(ConfigError::Read { .. })
        ));
    }
}
