use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::NoticeError;

/// License identifier(s) as written by license-checker
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum Licenses {
    /// A single identifier or expression, e.g. `MIT` or `(MIT OR Apache-2.0)`
    One(String),
    /// Several identifiers
    Many(Vec<String>),
}

impl Licenses {
    /// Text shown in the notice, `None` if there is nothing to show
    pub fn display(&self) -> Option<String> {
        let text = match self {
            Licenses::One(x) => x.clone(),
            Licenses::Many(x) => x.join(","),
        };
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// Information about a single dependency in the manifest.
///
/// Fields are read leniently: numbers and booleans are kept as text, and a value of any
/// other unexpected shape is treated as absent rather than rejecting the manifest.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DependencyRecord {
    /// license identification
    #[serde(default, deserialize_with = "lenient_licenses")]
    pub licenses: Option<Licenses>,
    /// license file inside the installed package
    #[serde(default, deserialize_with = "lenient_path")]
    pub license_file: Option<PathBuf>,
    /// source repository URL
    #[serde(default, deserialize_with = "lenient_text")]
    pub repository: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub publisher: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub email: Option<String>,
    /// where the package is installed locally, never part of the notice
    #[serde(default, deserialize_with = "lenient_path")]
    pub path: Option<PathBuf>,
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(x) => Some(x.clone()),
        Value::Number(x) => Some(x.to_string()),
        Value::Bool(x) => Some(x.to_string()),
        _ => None,
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(&Value::deserialize(deserializer)?))
}

fn lenient_path<'de, D>(deserializer: D) -> Result<Option<PathBuf>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(x) => Some(PathBuf::from(x)),
        _ => None,
    })
}

fn lenient_licenses<'de, D>(deserializer: D) -> Result<Option<Licenses>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => Some(Licenses::Many(
            items.iter().filter_map(scalar_text).collect(),
        )),
        other => scalar_text(&other).map(Licenses::One),
    })
}

/// Name and version taken from a manifest key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyId {
    pub name: String,
    pub version: Option<String>,
}

impl DependencyId {
    /// Split `name@version` or `@scope/name@version`.
    ///
    /// Scoped keys split on the last `@` so the scope stays in the name. Other keys
    /// split on the first `@`, and anything after a second `@` is dropped.
    pub fn parse(key: &str) -> Self {
        let (name, version) = match key.strip_prefix('@') {
            Some(rest) => match rest.rfind('@') {
                Some(pos) => (&key[..pos + 1], Some(&rest[pos + 1..])),
                None => (key, None),
            },
            None => {
                let mut parts = key.split('@');
                (parts.next().unwrap_or_default(), parts.next())
            }
        };

        Self {
            name: name.to_string(),
            version: version.filter(|x| !x.is_empty()).map(str::to_string),
        }
    }
}

/// The JSON document written by `license-checker --json`, in document order
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    pub entries: Vec<(String, DependencyRecord)>,
}

impl Manifest {
    /// Read and parse a manifest, failing if it is missing or malformed
    pub fn load(path: &Path) -> Result<Self, NoticeError> {
        if !path.exists() {
            return Err(NoticeError::NotFound(path.to_path_buf()));
        }

        let file = std::fs::File::open(path).map_err(|source| NoticeError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(std::io::BufReader::new(file)).map_err(|source| NoticeError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse manifest JSON from a reader
    pub fn from_reader<R>(reader: R) -> Result<Self, serde_json::Error>
    where
        R: std::io::Read,
    {
        let map: serde_json::Map<String, serde_json::Value> = serde_json::from_reader(reader)?;
        Self::from_map(map)
    }

    /// Parse the manifest text, keeping the key order of the document
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        Self::from_map(serde_json::from_str(text)?)
    }

    fn from_map(
        map: serde_json::Map<String, serde_json::Value>,
    ) -> Result<Self, serde_json::Error> {
        let mut entries = Vec::with_capacity(map.len());
        for (key, value) in map {
            // an entry that is not an object still gets a section, just without details
            let record: DependencyRecord = match value {
                Value::Object(_) => serde_json::from_value(value)?,
                _ => DependencyRecord::default(),
            };
            entries.push((key, record));
        }

        Ok(Self { entries })
    }
}
