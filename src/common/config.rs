//! Documented configuration files
//!
//! Config structs get a TOML file that explains itself: every field is written
//! with a trailing comment, and unset `Option<T>` fields are written commented
//! out so users can see what is available.
//!
//! # Example
//!
//! ```ignore
//! documented_config!(RenderConfig {
//!     fields: [
//!         frame_rate, "Output frame rate",
//!         zoom_factor, "Zoom level reached on the last frame",
//!     ],
//!     optional: [
//!         font_file, "Font file for burned-in captions",
//!     ],
//!     config_path: paths::config_file("render.toml"),
//! });
//! ```
//!
//! Fields with a serde default are always populated, so only `Option<T>`
//! fields can be missing from the written file.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Metadata about a configuration field
#[derive(Debug, Clone)]
pub struct ConfigFieldMeta {
    pub name: &'static str,
    /// TOML-serialized default value, or None if serialization failed
    pub default_value: Option<String>,
    pub description: &'static str,
    pub is_optional: bool,
}

/// Implemented by the `documented_config!` macro.
pub trait DocumentedConfig: Sized + Default {
    fn field_metadata() -> Vec<ConfigFieldMeta>;

    fn is_optional_field_set(&self, field_name: &str) -> bool;

    /// TOML-serialized value for a single field
    fn get_field_value(&self, field_name: &str) -> String;

    fn config_path() -> Result<PathBuf>;

    /// Render the config with one documented line per field
    fn to_documented_toml(&self) -> String {
        let mut output = String::new();

        for field in Self::field_metadata() {
            if field.is_optional && !self.is_optional_field_set(field.name) {
                let Some(default_val) = &field.default_value else {
                    continue;
                };
                output.push_str(&format!(
                    "# {} = {}  # {}\n",
                    field.name, default_val, field.description
                ));
            } else {
                output.push_str(&format!(
                    "{} = {}  # {}\n",
                    field.name,
                    self.get_field_value(field.name),
                    field.description
                ));
            }
        }

        output
    }

    fn save_with_documentation(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating config directory {}", parent.display()))?;
        }

        fs::write(path, self.to_documented_toml())
            .with_context(|| format!("writing config to {}", path.display()))?;
        Ok(())
    }

    /// Load from `path`, writing a documented default file if none exists yet
    fn load_from_path_documented(path: &Path) -> Result<Self>
    where
        for<'de> Self: serde::de::Deserialize<'de>,
    {
        if !path.exists() {
            let config = Self::default();
            config.save_with_documentation(path)?;
            return Ok(config);
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("parsing config {}", path.display()))
    }
}

#[macro_export]
macro_rules! documented_config {
    (
        $config_name:ident {
            fields: [
                $($field:ident, $desc:expr),* $(,)?
            ],
            optional: [
                $($opt_field:ident, $opt_desc:expr),* $(,)?
            ],
            config_path: $path:expr $(,)?
        }
    ) => {
        impl $crate::common::config::DocumentedConfig for $config_name {
            fn field_metadata() -> Vec<$crate::common::config::ConfigFieldMeta> {
                let default_config = Self::default();
                vec![
                    $(
                        $crate::common::config::ConfigFieldMeta {
                            name: stringify!($field),
                            default_value: toml::Value::try_from(&default_config.$field)
                                .map(|v| v.to_string())
                                .ok(),
                            description: $desc,
                            is_optional: false,
                        },
                    )*
                    $(
                        $crate::common::config::ConfigFieldMeta {
                            name: stringify!($opt_field),
                            default_value: {
                                let inner_default = default_config.$opt_field.clone()
                                    .unwrap_or_default();
                                toml::Value::try_from(&inner_default)
                                    .map(|v| v.to_string())
                                    .ok()
                            },
                            description: $opt_desc,
                            is_optional: true,
                        },
                    )*
                ]
            }

            fn is_optional_field_set(&self, field_name: &str) -> bool {
                match field_name {
                    $(
                        stringify!($opt_field) => self.$opt_field.is_some(),
                    )*
                    _ => false,
                }
            }

            fn get_field_value(&self, field_name: &str) -> String {
                match field_name {
                    $(
                        stringify!($field) => {
                            toml::Value::try_from(&self.$field)
                                .map(|v| v.to_string())
                                .unwrap_or_else(|_| format!("{:?}", self.$field))
                        }
                    )*
                    $(
                        stringify!($opt_field) => {
                            let value = self.$opt_field.clone().unwrap_or_default();
                            toml::Value::try_from(&value)
                                .map(|v| v.to_string())
                                .unwrap_or_else(|_| "\"\"".to_string())
                        }
                    )*
                    _ => String::new(),
                }
            }

            fn config_path() -> anyhow::Result<std::path::PathBuf> {
                $path
            }
        }
    };
}
