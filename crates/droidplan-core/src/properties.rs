use std::collections::BTreeMap;
use std::path::Path;

use droidplan_util::errors::DroidplanError;

/// Loads a `local.properties`-style file (`key=value` lines, `#` comments).
///
/// These files carry the values the host framework supplies to the module,
/// such as `flutter.compileSdkVersion`. A missing file yields an empty map.
pub fn load_properties(path: &Path) -> miette::Result<BTreeMap<String, String>> {
    if !path.is_file() {
        return Ok(BTreeMap::new());
    }
    let content = std::fs::read_to_string(path).map_err(DroidplanError::Io)?;
    Ok(parse_properties(&content))
}

/// Parse `key=value` lines into a map. Later keys override earlier ones.
pub fn parse_properties(content: &str) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
            continue;
        }
        if let Some((key, value)) = trimmed.split_once('=') {
            map.insert(key.trim().to_string(), value.trim().to_string());
        }
    }
    map
}

/// Extract `name` from a whole-value `${name}` reference.
pub fn reference_name(value: &str) -> Option<&str> {
    let inner = value.trim().strip_prefix("${")?.strip_suffix('}')?;
    let inner = inner.trim();
    if inner.is_empty() {
        None
    } else {
        Some(inner)
    }
}

/// Look up a whole-value `${name}` reference in `props`, or return `value` as written.
pub fn resolve_value<'a>(
    value: &'a str,
    props: &'a BTreeMap<String, String>,
) -> Result<&'a str, String> {
    match reference_name(value) {
        Some(name) => props
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| format!("property `{name}` is not defined")),
        None => Ok(value),
    }
}
