//! Named configuration for the config-reference run style.
//!
//! A config reference is a TOML file path plus an optional `#fragment`
//! naming a section inside the file, so one file can describe several
//! databases. Keys use kebab-case.

use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

use crate::pipeline::PipelineError;

/// Parsed config reference: `path` or `path#section`.
#[derive(Debug, Clone)]
pub struct ConfigRef {
    pub path: PathBuf,
    pub section: Option<String>,
}

impl ConfigRef {
    /// Split a reference on the first `#`. An empty fragment means the
    /// file's top level, same as no fragment at all.
    pub fn parse(reference: &str) -> Self {
        match reference.split_once('#') {
            Some((path, section)) if !section.is_empty() => Self {
                path: PathBuf::from(path),
                section: Some(section.to_string()),
            },
            Some((path, _)) => Self {
                path: PathBuf::from(path),
                section: None,
            },
            None => Self {
                path: PathBuf::from(reference),
                section: None,
            },
        }
    }
}

/// One database entry in a configuration file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DatabaseConfig {
    /// Driver identifier, resolved against the registry.
    pub driver: String,
    /// Whether the driver expression names a shared instance (`true`,
    /// the default) or a constructor call.
    #[serde(default = "default_true")]
    pub singleton: bool,
    pub url: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// Apply the catalog/schema correction. On by default.
    #[serde(default = "default_true")]
    pub swap_namespaces: bool,
    /// Restrict extraction to these schemas.
    #[serde(default)]
    pub schemas: Option<Vec<String>>,
    #[serde(default)]
    pub codegen: CodegenConfig,
}

/// Code generation keys of a database entry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CodegenConfig {
    /// Package the generated sources land in. Required; checked when the
    /// run is assembled so the error names the file.
    #[serde(default)]
    pub package: Option<String>,
    /// Output directory; the explicit command-line argument wins over
    /// this, and the working directory is the last resort.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

fn default_true() -> bool {
    true
}

impl DatabaseConfig {
    /// Expression recorded in generated artifacts: the driver name as-is
    /// for a singleton, a constructor call otherwise.
    pub fn driver_expr(&self) -> String {
        if self.singleton {
            self.driver.clone()
        } else {
            format!("{}::new()", self.driver)
        }
    }
}

/// Load and deserialize the entry a reference points at.
pub fn load_database_config(reference: &ConfigRef) -> Result<DatabaseConfig, PipelineError> {
    let raw = fs::read_to_string(&reference.path).map_err(|err| {
        PipelineError::Configuration(format!("cannot read {}: {err}", reference.path.display()))
    })?;
    parse_database_config(&raw, reference.section.as_deref()).map_err(|message| {
        PipelineError::Configuration(format!("{}: {message}", reference.path.display()))
    })
}

fn parse_database_config(raw: &str, section: Option<&str>) -> Result<DatabaseConfig, String> {
    let value: toml::Value = toml::from_str(raw).map_err(|err| err.to_string())?;
    let value = match section {
        Some(fragment) => section_value(&value, fragment)
            .cloned()
            .ok_or_else(|| format!("section '{fragment}' not found"))?,
        None => value,
    };
    value
        .try_into()
        .map_err(|err: toml::de::Error| err.to_string())
}

/// Walk a dotted fragment (`databases.main`) through nested tables.
fn section_value<'a>(value: &'a toml::Value, fragment: &str) -> Option<&'a toml::Value> {
    let mut current = value;
    for segment in fragment.split('.') {
        current = current.get(segment)?;
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_path_references() {
        let reference = ConfigRef::parse("databases.toml");
        assert_eq!(reference.path, PathBuf::from("databases.toml"));
        assert_eq!(reference.section, None);
    }

    #[test]
    fn parses_fragment_references() {
        let reference = ConfigRef::parse("databases.toml#staging");
        assert_eq!(reference.path, PathBuf::from("databases.toml"));
        assert_eq!(reference.section.as_deref(), Some("staging"));

        let reference = ConfigRef::parse("databases.toml#");
        assert_eq!(reference.section, None);
    }

    #[test]
    fn reads_top_level_entries_with_defaults() {
        let raw = r#"
            driver = "postgres"
            url = "postgres://localhost/app"

            [codegen]
            package = "acme.db"
        "#;
        let config = parse_database_config(raw, None).expect("config parses");
        assert_eq!(config.driver, "postgres");
        assert!(config.singleton);
        assert!(config.swap_namespaces);
        assert_eq!(config.user, None);
        assert_eq!(config.codegen.package.as_deref(), Some("acme.db"));
        assert_eq!(config.codegen.output_dir, None);
        assert_eq!(config.driver_expr(), "postgres");
    }

    #[test]
    fn reads_nested_sections_by_fragment() {
        let raw = r#"
            [databases.main]
            driver = "postgres"
            singleton = false
            url = "postgres://db.internal/app"
            swap-namespaces = false

            [databases.main.codegen]
            package = "acme.main"
            output-dir = "generated"
        "#;
        let config =
            parse_database_config(raw, Some("databases.main")).expect("section parses");
        assert!(!config.singleton);
        assert!(!config.swap_namespaces);
        assert_eq!(config.driver_expr(), "postgres::new()");
        assert_eq!(
            config.codegen.output_dir,
            Some(PathBuf::from("generated"))
        );
    }

    #[test]
    fn missing_section_is_an_error() {
        let raw = "driver = \"postgres\"\nurl = \"postgres://localhost/app\"\n";
        let err = parse_database_config(raw, Some("nope")).expect_err("must fail");
        assert!(err.contains("section 'nope' not found"));
    }
}
