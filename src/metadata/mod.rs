//! App configuration from `Bundler.toml`.

use crate::bundler::AppSettings;
use crate::error::{BundlerError, CliError, Result};
use std::collections::BTreeMap;
use std::path::Path;

/// Name of the configuration file at the package root.
pub const CONFIG_FILE_NAME: &str = "Bundler.toml";

/// Parsed `Bundler.toml`.
#[derive(Clone, Debug, Default, serde::Deserialize)]
pub struct BundlerConfig {
    /// Apps keyed by name (`[apps.<Name>]`)
    #[serde(default)]
    pub apps: BTreeMap<String, AppSettings>,
}

impl BundlerConfig {
    /// Picks the app to bundle.
    ///
    /// With `name`, that app must exist. Without it, the configuration must
    /// declare exactly one app.
    pub fn select_app(&self, name: Option<&str>) -> Result<(&str, &AppSettings)> {
        if let Some(name) = name {
            return self
                .apps
                .get_key_value(name)
                .map(|(k, v)| (k.as_str(), v))
                .ok_or_else(|| {
                    BundlerError::Cli(CliError::InvalidArguments {
                        reason: format!(
                            "No app named '{}' in {}. Available apps: {}",
                            name,
                            CONFIG_FILE_NAME,
                            self.app_names()
                        ),
                    })
                });
        }

        let mut apps = self.apps.iter();
        match (apps.next(), apps.next()) {
            (Some((name, app)), None) => Ok((name.as_str(), app)),
            (None, _) => Err(BundlerError::Cli(CliError::InvalidArguments {
                reason: format!("No apps declared in {}", CONFIG_FILE_NAME),
            })),
            (Some(_), Some(_)) => Err(BundlerError::Cli(CliError::MissingArgument {
                argument: format!("--app (one of: {})", self.app_names()),
            })),
        }
    }

    fn app_names(&self) -> String {
        self.apps.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

/// Loads `Bundler.toml` from `package_root`.
pub fn load_config(package_root: &Path) -> Result<BundlerConfig> {
    let config_path = package_root.join(CONFIG_FILE_NAME);
    log::debug!("Reading {}", config_path.display());

    let contents = std::fs::read_to_string(&config_path).map_err(|source| {
        CliError::ConfigUnreadable {
            path: config_path.clone(),
            source,
        }
    })?;

    parse_config(&contents).map_err(|source| {
        CliError::ConfigInvalid {
            path: config_path,
            source,
        }
        .into()
    })
}

/// Parses the contents of a `Bundler.toml`.
pub fn parse_config(contents: &str) -> std::result::Result<BundlerConfig, toml::de::Error> {
    toml::from_str(contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_APPS: &str = r#"
        [apps.Hello]
        product = "Hello"
        version = "0.1.0"
        identifier = "com.example.Hello"

        [apps.World]
        product = "WorldExecutable"
        version = "2.0.0"
        identifier = "com.example.World"
        minimum_macos_version = "13.0"
        category = "public.app-category.games"
    "#;

    #[test]
    fn parses_apps() {
        let config = parse_config(TWO_APPS).unwrap();
        assert_eq!(config.apps.len(), 2);

        let world = &config.apps["World"];
        assert_eq!(world.product, "WorldExecutable");
        assert_eq!(world.minimum_macos_version(), "13.0");
        assert_eq!(world.category.as_deref(), Some("public.app-category.games"));
        assert_eq!(config.apps["Hello"].minimum_macos_version(), "11.0");
    }

    #[test]
    fn selects_named_app() {
        let config = parse_config(TWO_APPS).unwrap();
        let (name, app) = config.select_app(Some("World")).unwrap();
        assert_eq!(name, "World");
        assert_eq!(app.version, "2.0.0");
    }

    #[test]
    fn ambiguous_selection_requires_app_argument() {
        let config = parse_config(TWO_APPS).unwrap();
        let err = config.select_app(None).unwrap_err();
        assert!(err.to_string().contains("--app"));
    }

    #[test]
    fn single_app_is_selected_implicitly() {
        let config = parse_config(
            r#"
            [apps.Solo]
            product = "Solo"
            version = "1.0"
            identifier = "com.example.Solo"
            "#,
        )
        .unwrap();
        assert_eq!(config.select_app(None).unwrap().0, "Solo");
    }

    #[test]
    fn unknown_app_lists_available() {
        let config = parse_config(TWO_APPS).unwrap();
        let err = config.select_app(Some("Nope")).unwrap_err();
        assert!(err.to_string().contains("Hello, World"));
    }

    #[test]
    fn missing_required_field_is_parse_error() {
        let err = parse_config("[apps.X]\nproduct = \"X\"\n").unwrap_err();
        assert!(err.to_string().contains("version"));
    }

    #[test]
    fn invalid_file_names_its_path() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(temp.path().join(CONFIG_FILE_NAME), "[apps.X").unwrap();

        let err = load_config(temp.path()).unwrap_err();
        assert!(matches!(
            err,
            BundlerError::Cli(CliError::ConfigInvalid { .. })
        ));
        assert!(err.to_string().contains(CONFIG_FILE_NAME));
    }

    #[test]
    fn missing_file_is_unreadable() {
        let temp = tempfile::tempdir().unwrap();
        let err = load_config(temp.path()).unwrap_err();
        assert!(matches!(
            err,
            BundlerError::Cli(CliError::ConfigUnreadable { .. })
        ));
    }
}
