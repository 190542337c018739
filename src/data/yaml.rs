//! YAML processing utilities

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;
use tracing::debug;
use yaml_rust_davvid::YamlEmitter;

use crate::setops::SetOpError;

/// Serialize data structure to YAML string with proper multi-line formatting
///
/// The document must read back as the same value. When the yaml-rust output
/// does not (tags, or strings it leaves unquoted such as `0o17`), serde_yaml's
/// own serializer is used instead.
pub fn to_yaml<T: Serialize>(data: &T) -> Result<String> {
    // yaml-rust's emitter writes multi-line strings as literal blocks
    let serde_value = serde_yaml::to_value(data).context("Failed to serialize to serde value")?;
    let yaml_rust_value = convert_serde_to_yaml_rust(&serde_value)?;

    let mut output = String::new();
    let mut emitter = YamlEmitter::new(&mut output);
    emitter.multiline_strings(true);
    emitter
        .dump(&yaml_rust_value)
        .context("Failed to emit YAML")?;
    output.push('\n');

    if reads_back_as(&output, &serde_value) {
        return Ok(output);
    }

    debug!("Emitted YAML does not read back unchanged, using serde_yaml serializer");
    serde_yaml::to_string(&serde_value).context("Failed to serialize YAML")
}

fn reads_back_as(yaml: &str, expected: &Value) -> bool {
    serde_yaml::from_str::<Value>(yaml).is_ok_and(|value| value == *expected)
}

/// Convert serde_yaml::Value to yaml_rust_davvid::Yaml
fn convert_serde_to_yaml_rust(value: &Value) -> Result<yaml_rust_davvid::Yaml> {
    use yaml_rust_davvid::Yaml;

    match value {
        Value::Null => Ok(Yaml::Null),
        Value::Bool(b) => Ok(Yaml::Boolean(*b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Yaml::Integer(i))
            } else {
                // serde_yaml renders floats with a decimal point or as .inf/.nan
                Ok(Yaml::Real(n.to_string()))
            }
        }
        Value::String(s) => Ok(Yaml::String(s.clone())),
        Value::Sequence(seq) => {
            let yaml_seq: Result<Vec<_>> = seq.iter().map(convert_serde_to_yaml_rust).collect();
            Ok(Yaml::Array(yaml_seq?))
        }
        Value::Mapping(map) => {
            let mut yaml_map = yaml_rust_davvid::yaml::Hash::new();
            for (k, v) in map {
                let yaml_key = convert_serde_to_yaml_rust(k)?;
                let yaml_value = convert_serde_to_yaml_rust(v)?;
                yaml_map.insert(yaml_key, yaml_value);
            }
            Ok(Yaml::Hash(yaml_map))
        }
        // Tags are not representable in yaml-rust; to_yaml falls back for them
        Value::Tagged(tagged) => convert_serde_to_yaml_rust(&tagged.value),
    }
}

/// Deserialize YAML string to data structure
pub fn from_yaml<T: for<'de> Deserialize<'de>>(yaml: &str) -> Result<T> {
    serde_yaml::from_str(yaml).context("Failed to deserialize YAML")
}

/// Write data structure to YAML file
pub fn write_yaml_file<T: Serialize, P: AsRef<Path>>(data: &T, path: P) -> Result<()> {
    let yaml_content = to_yaml(data)?;

    fs::write(&path, yaml_content)
        .with_context(|| format!("Failed to write file: {}", path.as_ref().display()))?;

    Ok(())
}

/// Returns the root mapping of a document. An empty document is an empty mapping.
pub fn root_mapping(value: Value) -> Result<Mapping, SetOpError> {
    match value {
        Value::Mapping(map) => Ok(map),
        Value::Null => Ok(Mapping::new()),
        Value::Bool(_) => Err(SetOpError::NotAMapping { found: "boolean" }),
        Value::Number(_) => Err(SetOpError::NotAMapping { found: "number" }),
        Value::String(_) => Err(SetOpError::NotAMapping { found: "string" }),
        Value::Sequence(_) => Err(SetOpError::NotAMapping { found: "sequence" }),
        Value::Tagged(_) => Err(SetOpError::NotAMapping {
            found: "tagged value",
        }),
    }
}

/// Read a YAML file whose root must be a mapping
pub fn read_mapping_file<P: AsRef<Path>>(path: P) -> Result<Mapping> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    let value: Value = if content.trim().is_empty() {
        Value::Null
    } else {
        from_yaml(&content).with_context(|| format!("Invalid YAML in {}", path.display()))?
    };

    root_mapping(value).with_context(|| format!("Unexpected document in {}", path.display()))
}
