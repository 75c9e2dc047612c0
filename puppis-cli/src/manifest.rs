//! Manifest loading and conversion into resources
//!
//! A manifest is a single YAML document with a `connection` block, an
//! optional `state` block, and `data` / `resources` block lists. String
//! attributes of the form `${binding.attribute}` become references that
//! are resolved against other blocks during plan and apply.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use puppis_awx::{AwxAuth, AwxConfig};
use puppis_core::resource::{Resource, Value};
use puppis_state::BackendConfig;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid manifest: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid reference '{0}': expected ${{binding.attribute}}")]
    InvalidRef(String),

    #[error("Map keys must be strings (found {0})")]
    InvalidMapKey(String),

    #[error("Invalid connection: {0}")]
    Connection(String),
}

/// Top-level manifest document
#[derive(Debug, Deserialize)]
pub struct Manifest {
    pub connection: Connection,
    #[serde(default)]
    pub state: Option<StateConfig>,
    #[serde(default)]
    pub data: Vec<Block>,
    #[serde(default)]
    pub resources: Vec<Block>,
}

/// Connection settings for the AWX server
#[derive(Debug, Deserialize)]
pub struct Connection {
    pub base_url: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default = "default_verify_tls")]
    pub verify_tls: bool,
}

fn default_verify_tls() -> bool {
    true
}

/// Where the state file lives
#[derive(Debug, Deserialize)]
pub struct StateConfig {
    #[serde(default = "default_backend")]
    pub backend: String,
    #[serde(flatten)]
    pub attributes: HashMap<String, String>,
}

fn default_backend() -> String {
    "local".to_string()
}

/// One data or resource block
#[derive(Debug, Deserialize)]
pub struct Block {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub name: String,
    #[serde(default)]
    pub attributes: HashMap<String, serde_yaml::Value>,
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ManifestError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// All blocks as resources: data blocks first, then managed blocks,
    /// each list in manifest order.
    pub fn to_resources(&self) -> Result<Vec<Resource>, ManifestError> {
        let mut resources = Vec::new();
        for block in &self.data {
            resources.push(block.to_resource(true)?);
        }
        for block in &self.resources {
            resources.push(block.to_resource(false)?);
        }
        Ok(resources)
    }

    pub fn backend_config(&self) -> BackendConfig {
        match &self.state {
            Some(state) => BackendConfig {
                backend_type: state.backend.clone(),
                attributes: state
                    .attributes
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                    .collect(),
            },
            None => BackendConfig {
                backend_type: default_backend(),
                attributes: HashMap::new(),
            },
        }
    }
}

impl Connection {
    /// Build the client configuration. A token in the manifest wins over
    /// one taken from the environment; basic auth is the fallback.
    pub fn to_awx_config(&self, env_token: Option<String>) -> Result<AwxConfig, ManifestError> {
        let token = self.token.clone().or(env_token).filter(|t| !t.is_empty());

        let auth = if let Some(token) = token {
            AwxAuth::Bearer { token }
        } else if let (Some(username), Some(password)) = (&self.username, &self.password) {
            AwxAuth::Basic {
                username: username.clone(),
                password: password.clone(),
            }
        } else {
            return Err(ManifestError::Connection(
                "set token (or PUPPIS_AWX_TOKEN) or username and password".to_string(),
            ));
        };

        let mut config = AwxConfig::new(&self.base_url, auth);
        if let Some(secs) = self.timeout_secs {
            config.timeout = Duration::from_secs(secs);
        }
        config.verify_tls = self.verify_tls;
        Ok(config)
    }
}

impl Block {
    fn to_resource(&self, data_source: bool) -> Result<Resource, ManifestError> {
        let resource_type = if data_source {
            format!("data.{}", self.resource_type)
        } else {
            self.resource_type.clone()
        };

        let mut resource =
            Resource::new(resource_type, self.name.as_str()).with_read_only(data_source);
        for (key, raw) in &self.attributes {
            if let Some(value) = yaml_to_value(raw)? {
                resource = resource.with_attribute(key.as_str(), value);
            }
        }
        Ok(resource)
    }
}

/// Convert one YAML value into an attribute value. `${...}` strings become
/// references and explicit nulls are dropped.
fn yaml_to_value(raw: &serde_yaml::Value) -> Result<Option<Value>, ManifestError> {
    let value = match raw {
        serde_yaml::Value::Null => return Ok(None),
        serde_yaml::Value::Bool(b) => Value::Bool(*b),
        serde_yaml::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::String(n.to_string()),
        },
        serde_yaml::Value::String(s) => parse_string(s)?,
        serde_yaml::Value::Sequence(items) => {
            let mut list = Vec::with_capacity(items.len());
            for item in items {
                if let Some(v) = yaml_to_value(item)? {
                    list.push(v);
                }
            }
            Value::List(list)
        }
        serde_yaml::Value::Mapping(mapping) => {
            let mut map = HashMap::new();
            for (k, v) in mapping {
                let key = k
                    .as_str()
                    .ok_or_else(|| ManifestError::InvalidMapKey(format!("{:?}", k)))?;
                if let Some(value) = yaml_to_value(v)? {
                    map.insert(key.to_string(), value);
                }
            }
            Value::Map(map)
        }
        serde_yaml::Value::Tagged(tagged) => return yaml_to_value(&tagged.value),
    };
    Ok(Some(value))
}

fn parse_string(s: &str) -> Result<Value, ManifestError> {
    let Some(inner) = s.strip_prefix("${").and_then(|rest| rest.strip_suffix('}')) else {
        return Ok(Value::String(s.to_string()));
    };

    match inner.split_once('.') {
        Some((binding, attribute)) if !binding.is_empty() && !attribute.is_empty() => {
            Ok(Value::Ref(binding.to_string(), attribute.to_string()))
        }
        _ => Err(ManifestError::InvalidRef(s.to_string())),
    }
}
