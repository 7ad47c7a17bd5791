// src/config/parser.rs

//! Parser for `pak.yml` configuration files.

use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::{ConfigError, ConfigResult};

/// `$VAR` or `${VAR}` inside a string value
static VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_-]*)\}|\$([A-Za-z_][A-Za-z0-9_-]*)").unwrap());

/// Top-level `pak.yml` contents
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PakConfig {
    /// Config schema version (only version 1 is understood)
    #[serde(default)]
    pub version: Option<u32>,

    /// Env var holding a git hosting token
    #[serde(default)]
    pub token_key: Option<String>,

    /// Env var holding a GitHub token (older spelling of `token_key`)
    #[serde(default)]
    pub github_key: Option<String>,

    /// Env var holding a Bitbucket app password
    #[serde(default)]
    pub bitbucket_key: Option<String>,

    /// Env var whose value selects one of `envs`
    #[serde(default)]
    pub env_key: Option<String>,

    /// Project environments by name
    #[serde(default)]
    pub envs: BTreeMap<String, EnvironmentConfig>,

    /// Directory the config was loaded from; relative paths resolve here
    #[serde(skip)]
    pub base_dir: PathBuf,
}

/// One `envs.<name>` block
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// Value of `$<env_key>` that selects this environment
    #[serde(default)]
    pub key_value: Option<String>,

    /// Directory VCS packages are cloned under
    #[serde(default)]
    pub clone_dir: Option<String>,

    /// Requirements files, relative to the config file
    #[serde(default)]
    pub files: Option<Vec<String>>,

    /// Default index for every file
    #[serde(default)]
    pub index_url: Option<String>,

    /// Default extra indexes for every file
    #[serde(default)]
    pub extra_index_urls: Vec<String>,

    /// Pass `-q` to pip
    #[serde(default)]
    pub run_silently: bool,

    /// Refuse to install outside an activated virtualenv
    #[serde(default)]
    pub use_virtual: bool,
}

/// Parse and validate a config file, expanding variables from the process environment
pub fn parse_config_file(path: &Path) -> ConfigResult<PakConfig> {
    parse_config_file_with(path, &|name| std::env::var(name).ok())
}

/// Parse and validate a config file with an explicit variable lookup
pub fn parse_config_file_with(path: &Path, lookup: &dyn Fn(&str) -> Option<String>) -> ConfigResult<PakConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut config = parse_config_str(&content, lookup)?;
    config.base_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    let problems = config.validate();
    if !problems.is_empty() {
        return Err(ConfigError::Invalid {
            path: path.to_path_buf(),
            problems,
        });
    }

    Ok(config)
}

/// Parse config text without validating it
pub fn parse_config_str(content: &str, lookup: &dyn Fn(&str) -> Option<String>) -> ConfigResult<PakConfig> {
    let mut value: Value = serde_yaml::from_str(content)?;
    expand_value(&mut value, lookup);
    Ok(serde_yaml::from_value(value)?)
}

/// Replace `$VAR` / `${VAR}` references; unset variables become empty
pub fn expand_vars(value: &str, lookup: &dyn Fn(&str) -> Option<String>) -> String {
    VAR_RE
        .replace_all(value, |caps: &Captures<'_>| {
            let name = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map(|m| m.as_str())
                .unwrap_or_default();
            lookup(name).unwrap_or_default()
        })
        .into_owned()
}

fn expand_value(value: &mut Value, lookup: &dyn Fn(&str) -> Option<String>) {
    match value {
        Value::String(s) => {
            if s.contains('$') {
                *s = expand_vars(s, lookup);
            }
        }
        Value::Sequence(items) => {
            for item in items {
                expand_value(item, lookup);
            }
        }
        Value::Mapping(map) => {
            for (_, item) in map.iter_mut() {
                expand_value(item, lookup);
            }
        }
        _ => {}
    }
}

impl PakConfig {
    /// Check the config, returning every problem found
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if let Some(version) = self.version {
            if version != 1 {
                problems.push(format!("Unsupported config version {}, expected 1", version));
            }
        }

        if self.git_token_key().is_none() && self.bitbucket_key.is_none() {
            problems.push(
                "You must define an environment variable for the Git token or Bitbucket app password \
                 (token_key, github_key or bitbucket_key)"
                    .to_string(),
            );
        }

        if self.env_key.as_deref().is_none_or(str::is_empty) {
            problems.push("You must define env_key, the environment variable selecting the project environment".to_string());
        }

        if self.envs.is_empty() {
            problems.push("You must configure at least one project environment under envs".to_string());
        }

        for (name, env) in &self.envs {
            if env.key_value.is_none() {
                problems.push(format!("You must define the key_value key inside {} environment", name));
            }
            if env.clone_dir.is_none() {
                problems.push(format!("You must define the clone_dir key inside {} environment", name));
            }
            if env.files.is_none() {
                problems.push(format!("You must define the files key inside {} environment", name));
            }
        }

        problems
    }

    /// Env var name for the generic git token
    pub fn git_token_key(&self) -> Option<&str> {
        self.token_key.as_deref().or(self.github_key.as_deref())
    }

    /// Resolve a config-relative path
    pub fn resolve(&self, path: &str) -> PathBuf {
        self.base_dir.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_vars(_: &str) -> Option<String> {
        None
    }

    const FULL: &str = r#"
token_key: GIT_TOKEN
bitbucket_key: BB_PASS
env_key: PROJECT_ENV
envs:
  prod:
    key_value: production
    clone_dir: /tmp/pak
    files:
      - requirements.txt
  dev:
    key_value: development
    clone_dir: /tmp/pak-dev
    files: [requirements.txt, requirements-dev.txt]
    index_url: https://pypi.example/simple
    extra_index_urls: [https://extra.example/simple]
    run_silently: true
    use_virtual: true
"#;

    #[test]
    fn test_parse_full_config() {
        let config = parse_config_str(FULL, &no_vars).unwrap();
        assert!(config.validate().is_empty());
        assert_eq!(config.git_token_key(), Some("GIT_TOKEN"));
        assert_eq!(config.envs.len(), 2);

        let dev = &config.envs["dev"];
        assert_eq!(dev.files.as_ref().unwrap().len(), 2);
        assert_eq!(dev.index_url.as_deref(), Some("https://pypi.example/simple"));
        assert!(dev.run_silently);
        assert!(dev.use_virtual);
        assert!(!config.envs["prod"].run_silently);
        assert!(!config.envs["prod"].use_virtual);
    }

    #[test]
    fn test_github_key_alias() {
        let config = parse_config_str("github_key: GH\n", &no_vars).unwrap();
        assert_eq!(config.git_token_key(), Some("GH"));
    }

    #[test]
    fn test_validation_reports_everything() {
        let config = parse_config_str("envs:\n  prod:\n    key_value: production\n", &no_vars).unwrap();
        let problems = config.validate();
        assert_eq!(problems.len(), 4, "{:?}", problems);
        assert!(problems.iter().any(|p| p.contains("env_key")));
        assert!(problems.iter().any(|p| p.contains("clone_dir")));
        assert!(problems.iter().any(|p| p.contains("files")));
    }

    #[test]
    fn test_empty_envs_is_invalid() {
        let config = parse_config_str("token_key: T\nenv_key: E\n", &no_vars).unwrap();
        let problems = config.validate();
        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("at least one"));
    }

    #[test]
    fn test_expand_vars() {
        let lookup = |name: &str| match name {
            "HOME" => Some("/home/ci".to_string()),
            "BUILD" => Some("42".to_string()),
            _ => None,
        };
        assert_eq!(expand_vars("$HOME/clones", &lookup), "/home/ci/clones");
        assert_eq!(expand_vars("${HOME}/b-${BUILD}", &lookup), "/home/ci/b-42");
        assert_eq!(expand_vars("$UNSET", &lookup), "");
        assert_eq!(expand_vars("no vars", &lookup), "no vars");
    }

    #[test]
    fn test_expansion_applies_inside_envs() {
        let lookup = |name: &str| (name == "CLONE_ROOT").then(|| "/srv/clones".to_string());
        let config = parse_config_str(
            "envs:\n  prod:\n    clone_dir: ${CLONE_ROOT}\n    files: [$CLONE_ROOT/req.txt]\n",
            &lookup,
        )
        .unwrap();
        let prod = &config.envs["prod"];
        assert_eq!(prod.clone_dir.as_deref(), Some("/srv/clones"));
        assert_eq!(prod.files.as_ref().unwrap()[0], "/srv/clones/req.txt");
    }

    #[test]
    fn test_bad_yaml() {
        assert!(matches!(
            parse_config_str("envs: [unclosed", &no_vars),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_load_from_file_sets_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pak.yml");
        std::fs::write(&path, FULL).unwrap();

        let config = parse_config_file_with(&path, &no_vars).unwrap();
        assert_eq!(config.base_dir, dir.path());
        assert_eq!(config.resolve("requirements.txt"), dir.path().join("requirements.txt"));
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pak.yml");
        std::fs::write(&path, "token_key: T\n").unwrap();

        match parse_config_file_with(&path, &no_vars) {
            Err(ConfigError::Invalid { problems, .. }) => assert_eq!(problems.len(), 2),
            other => panic!("expected invalid config, got {:?}", other),
        }
    }
}
