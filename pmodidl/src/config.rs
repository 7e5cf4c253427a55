//! Configuration du moteur DIDL-Lite.
//!
//! La configuration est construite en trois couches :
//! 1. la configuration par défaut intégrée (`pmodidl.yaml`) ;
//! 2. un fichier YAML externe optionnel, fusionné par-dessus ;
//! 3. les variables d'environnement préfixées par `PMODIDL_CONFIG__`
//!    (`__` sépare les niveaux, la valeur est lue comme un scalaire YAML).
//!
//! ```no_run
//! use pmodidl::config::DidlConfig;
//!
//! let config = DidlConfig::load(None)?;
//! println!("protocol version: {}", config.protocol_version);
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use tracing::{debug, info};

const DEFAULT_CONFIG: &str = include_str!("pmodidl.yaml");

const ENV_PREFIX: &str = "PMODIDL_CONFIG__";

/// Clé racine de la section DIDL dans le fichier YAML.
const ROOT_KEY: &str = "didl";

pub const DEFAULT_PROTOCOL_VERSION: u8 = 4;
pub const DIDL_LITE_NAMESPACE: &str = "urn:schemas-upnp-org:metadata-1-0/DIDL-Lite/";
pub const DC_NAMESPACE: &str = "http://purl.org/dc/elements/1.1/";
pub const UPNP_NAMESPACE: &str = "urn:schemas-upnp-org:metadata-1-0/upnp/";
pub const DLNA_NAMESPACE: &str = "urn:schemas-dlna-org:metadata-1-0/";

/// Paramètres de (dé)sérialisation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DidlConfig {
    pub protocol_version: u8,
    pub requested_fields: String,
    pub lenient_names: bool,
    pub namespaces: BTreeMap<String, String>,
}

impl Default for DidlConfig {
    fn default() -> Self {
        let namespaces = [
            ("", DIDL_LITE_NAMESPACE),
            ("dc", DC_NAMESPACE),
            ("upnp", UPNP_NAMESPACE),
            ("dlna", DLNA_NAMESPACE),
        ]
        .into_iter()
        .map(|(prefix, uri)| (prefix.to_string(), uri.to_string()))
        .collect();

        Self {
            protocol_version: DEFAULT_PROTOCOL_VERSION,
            requested_fields: "*".to_string(),
            lenient_names: true,
            namespaces,
        }
    }
}

impl DidlConfig {
    /// Charge la configuration : défauts intégrés, fichier optionnel puis
    /// variables d'environnement.
    ///
    /// # Arguments
    ///
    /// * `path` - Fichier YAML externe. Ignoré s'il n'existe pas.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut value: Value = serde_yaml::from_str(DEFAULT_CONFIG)?;

        if let Some(path) = path {
            match fs::read(path) {
                Ok(data) => {
                    info!(config_file = %path.display(), "Loaded DIDL config file");
                    let external: Value = serde_yaml::from_slice(&data)
                        .with_context(|| format!("Invalid YAML in {}", path.display()))?;
                    merge_yaml(&mut value, &lower_keys(external));
                }
                Err(_) => {
                    info!(config_file = %path.display(), "DIDL config file not found, using defaults");
                }
            }
        }

        apply_overrides(&mut value, env::vars());
        Self::from_value(&value)
    }

    /// Construit la configuration depuis un document YAML complet.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let mut value: Value = serde_yaml::from_str(DEFAULT_CONFIG)?;
        let external: Value = serde_yaml::from_str(yaml)?;
        merge_yaml(&mut value, &lower_keys(external));
        Self::from_value(&value)
    }

    fn from_value(value: &Value) -> Result<Self> {
        let section = match value {
            Value::Mapping(map) => map
                .get(Value::String(ROOT_KEY.to_string()))
                .cloned()
                .unwrap_or(Value::Mapping(Mapping::new())),
            _ => return Err(anyhow!("DIDL configuration root is not a map")),
        };
        let config: DidlConfig = serde_yaml::from_value(section)?;
        if !(1..=4).contains(&config.protocol_version) {
            return Err(anyhow!(
                "Unsupported protocol version {}",
                config.protocol_version
            ));
        }
        Ok(config)
    }
}

/// Applique les variables `PMODIDL_CONFIG__SECTION__KEY=value`.
fn apply_overrides(config: &mut Value, vars: impl Iterator<Item = (String, String)>) {
    for (key, value) in vars {
        let Some(path) = key.strip_prefix(ENV_PREFIX) else {
            continue;
        };
        let path: Vec<String> = path.split("__").map(str::to_lowercase).collect();
        debug!(key = %key, "Applying DIDL config override");
        let yaml_value = serde_yaml::from_str::<Value>(&value).unwrap_or(Value::String(value));
        set_value(config, &path, yaml_value);
    }
}

fn set_value(data: &mut Value, path: &[String], value: Value) {
    let Some((first, rest)) = path.split_first() else {
        *data = value;
        return;
    };
    if !matches!(data, Value::Mapping(_)) {
        *data = Value::Mapping(Mapping::new());
    }
    if let Value::Mapping(map) = data {
        let entry = map
            .entry(Value::String(first.clone()))
            .or_insert(Value::Mapping(Mapping::new()));
        set_value(entry, rest, value);
    }
}

fn merge_yaml(default: &mut Value, external: &Value) {
    match (default, external) {
        (Value::Mapping(dmap), Value::Mapping(emap)) => {
            for (k, v) in emap {
                match dmap.get_mut(k) {
                    Some(dv) => merge_yaml(dv, v),
                    None => {
                        dmap.insert(k.clone(), v.clone());
                    }
                }
            }
        }
        (d, e) => *d = e.clone(),
    }
}

/// Met en minuscules les clés de premier niveau et de section ; les
/// préfixes de namespaces sont laissés intacts.
fn lower_keys(value: Value) -> Value {
    match value {
        Value::Mapping(map) => Value::Mapping(
            map.into_iter()
                .map(|(k, v)| match k {
                    Value::String(s) if s.eq_ignore_ascii_case("namespaces") => {
                        (Value::String(s.to_lowercase()), v)
                    }
                    Value::String(s) => (Value::String(s.to_lowercase()), lower_keys(v)),
                    other => (other, lower_keys(v)),
                })
                .collect(),
        ),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_config_matches_defaults() {
        let value: Value = serde_yaml::from_str(DEFAULT_CONFIG).unwrap();
        let config = DidlConfig::from_value(&value).unwrap();
        assert_eq!(config, DidlConfig::default());
    }

    #[test]
    fn test_overrides() {
        let mut value: Value = serde_yaml::from_str(DEFAULT_CONFIG).unwrap();
        let vars = vec![
            ("PMODIDL_CONFIG__DIDL__PROTOCOL_VERSION".to_string(), "2".to_string()),
            ("PMODIDL_CONFIG__DIDL__REQUESTED_FIELDS".to_string(), "dc:title,res".to_string()),
            ("OTHER_VAR".to_string(), "ignored".to_string()),
        ];
        apply_overrides(&mut value, vars.into_iter());

        let config = DidlConfig::from_value(&value).unwrap();
        assert_eq!(config.protocol_version, 2);
        assert_eq!(config.requested_fields, "dc:title,res");
        assert!(config.lenient_names);
    }

    #[test]
    fn test_from_yaml_merges_over_defaults() {
        let config = DidlConfig::from_yaml("didl:\n  lenient_names: false\n  namespaces:\n    sec: \"http://www.sec.co.kr/\"\n").unwrap();
        assert!(!config.lenient_names);
        assert_eq!(config.protocol_version, DEFAULT_PROTOCOL_VERSION);
        assert_eq!(config.namespaces.get("sec").map(String::as_str), Some("http://www.sec.co.kr/"));
        assert_eq!(config.namespaces.get("dc").map(String::as_str), Some(DC_NAMESPACE));
    }

    #[test]
    fn test_rejects_unknown_version() {
        assert!(DidlConfig::from_yaml("didl:\n  protocol_version: 9\n").is_err());
    }
}
