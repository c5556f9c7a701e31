//! Configuration shared by the tutorial programs.
//!
//! Values are layered: built-in defaults, then an optional `Settings` file in the working
//! directory (any format `config` understands, usually `Settings.toml`), then environment
//! variables prefixed with `LEARNGL_` (nested keys separated by `__`, e.g.
//! `LEARNGL_WINDOW__WIDTH=1280`).
use crate::shader::BuildPolicy;
use config::{Config, ConfigError, Environment, File};
use std::path::{Path, PathBuf};

pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 600;
pub const DEFAULT_TITLE: &str = "LearnOpenGL";

#[derive(Clone, Debug, PartialEq)]
pub struct WindowSettings {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub vsync: bool,
}

impl Default for WindowSettings {
    fn default() -> Self {
        WindowSettings {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            title: DEFAULT_TITLE.to_string(),
            vsync: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub window: WindowSettings,
    pub shader_policy: BuildPolicy,
    pub shader_dir: PathBuf,
    pub texture_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            window: WindowSettings::default(),
            shader_policy: BuildPolicy::default(),
            shader_dir: PathBuf::from("shaders"),
            texture_dir: PathBuf::from("resources/textures"),
        }
    }
}

impl Settings {
    /// Loads the settings from the `Settings` file (if any) and the environment.
    pub fn load() -> Result<Settings, ConfigError> {
        let cfg = Config::builder()
            .add_source(File::with_name("Settings").required(false))
            .add_source(
                Environment::with_prefix("LEARNGL")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;
        Ok(Settings::from_config(&cfg))
    }

    /// Reads the settings out of an already-built configuration, falling back to defaults for
    /// missing or malformed keys.
    pub fn from_config(cfg: &Config) -> Settings {
        let defaults = Settings::default();

        let shader_policy = match cfg.get::<String>("shader.policy") {
            Ok(policy) => policy.parse().unwrap_or_else(|err| {
                warn!("{}, using {:?}", err, defaults.shader_policy);
                defaults.shader_policy
            }),
            Err(_) => defaults.shader_policy,
        };

        Settings {
            window: WindowSettings {
                width: cfg
                    .get::<u32>("window.width")
                    .unwrap_or(defaults.window.width),
                height: cfg
                    .get::<u32>("window.height")
                    .unwrap_or(defaults.window.height),
                title: cfg
                    .get::<String>("window.title")
                    .unwrap_or(defaults.window.title),
                vsync: cfg
                    .get::<bool>("window.vsync")
                    .unwrap_or(defaults.window.vsync),
            },
            shader_policy,
            shader_dir: cfg
                .get::<String>("assets.shader_dir")
                .map(PathBuf::from)
                .unwrap_or(defaults.shader_dir),
            texture_dir: cfg
                .get::<String>("assets.texture_dir")
                .map(PathBuf::from)
                .unwrap_or(defaults.texture_dir),
        }
    }

    pub fn shader_path(&self, name: impl AsRef<Path>) -> PathBuf {
        self.shader_dir.join(name)
    }

    pub fn texture_path(&self, name: impl AsRef<Path>) -> PathBuf {
        self.texture_dir.join(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn build(overrides: &[(&str, &str)]) -> Config {
        let mut builder = Config::builder();
        for &(key, value) in overrides {
            builder = builder.set_override(key, value).unwrap();
        }
        builder.build().unwrap()
    }

    #[test]
    fn empty_config_gives_defaults() {
        let settings = Settings::from_config(&build(&[]));
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.window.width, 800);
        assert_eq!(settings.window.height, 600);
        assert_eq!(settings.shader_policy, BuildPolicy::FailFast);
    }

    #[test]
    fn overrides_are_applied() {
        let settings = Settings::from_config(&build(&[
            ("window.width", "1024"),
            ("window.title", "cubes"),
            ("shader.policy", "permissive"),
            ("assets.shader_dir", "glsl"),
        ]));
        assert_eq!(settings.window.width, 1024);
        assert_eq!(settings.window.height, 600);
        assert_eq!(settings.window.title, "cubes");
        assert_eq!(settings.shader_policy, BuildPolicy::Permissive);
        assert_eq!(settings.shader_path("a.vert"), PathBuf::from("glsl/a.vert"));
    }

    #[test]
    fn unknown_policy_falls_back_to_default() {
        let settings = Settings::from_config(&build(&[("shader.policy", "sometimes")]));
        assert_eq!(settings.shader_policy, BuildPolicy::FailFast);
    }

    #[test]
    fn environment_overrides_file() {
        env::set_var("LEARNGL_WINDOW__WIDTH", "1280");
        env::set_var("LEARNGL_SHADER__POLICY", "permissive");
        let settings = Settings::load();
        env::remove_var("LEARNGL_WINDOW__WIDTH");
        env::remove_var("LEARNGL_SHADER__POLICY");

        let settings = settings.unwrap();
        assert_eq!(settings.window.width, 1280);
        assert_eq!(settings.window.height, DEFAULT_HEIGHT);
        assert_eq!(settings.shader_policy, BuildPolicy::Permissive);
    }

    #[test]
    fn malformed_width_falls_back_to_default() {
        let settings = Settings::from_config(&build(&[("window.width", "wide")]));
        assert_eq!(settings.window.width, DEFAULT_WIDTH);
    }
}
