//! Operation: add a dependency to Droidplan.toml.

use std::path::Path;

use droidplan_core::coordinate::CoordinateRequest;
use droidplan_core::dependency::Scope;
use droidplan_core::descriptor::DEFAULT_CONFIGURATION;
use droidplan_util::errors::DroidplanError;
use toml_edit::{Array, ArrayOfTables, DocumentMut, Item, Table, Value};

/// Options for `droidplan add`.
#[derive(Debug, Clone, Default)]
pub struct AddOptions {
    /// `group:artifact:version`, or `group:artifact` when a platform import supplies the version.
    pub spec: String,
    /// Gradle configuration name (`implementation`, `kapt`, ...).
    pub scope: Option<String>,
    /// Add as a platform (bill-of-materials) import.
    pub platform: bool,
    /// Slot keys this dependency must be resolved after.
    pub requires: Vec<String>,
}

/// Append a `[[dependencies]]` entry to `Droidplan.toml` using format-preserving edits.
pub fn add_dependency(manifest_path: &Path, opts: &AddOptions) -> miette::Result<()> {
    let content = std::fs::read_to_string(manifest_path).map_err(|e| DroidplanError::Manifest {
        message: format!("Failed to read {}: {e}", manifest_path.display()),
    })?;

    let mut doc: DocumentMut = content.parse().map_err(|e| DroidplanError::Manifest {
        message: format!("Failed to parse Droidplan.toml: {e}"),
    })?;

    if opts.platform && opts.scope.is_some() {
        return Err(DroidplanError::invalid(
            "scope",
            "a platform import has no scope; drop --scope or --platform",
        )
        .into());
    }

    let has_platform = doc
        .get("dependencies")
        .and_then(Item::as_array_of_tables)
        .is_some_and(|entries| {
            entries
                .iter()
                .any(|t| t.get("platform").and_then(Item::as_bool).unwrap_or(false))
        });
    let request = CoordinateRequest::parse(&opts.spec, has_platform)?;
    if opts.platform && request.version.is_inherited() {
        return Err(DroidplanError::malformed(&opts.spec, "a platform import needs a version").into());
    }
    if let Some(scope) = &opts.scope {
        if Scope::from_configuration(scope).is_none() {
            return Err(DroidplanError::invalid("scope", format!("unknown configuration `{scope}`")).into());
        }
    }
    for required in &opts.requires {
        CoordinateRequest::parse(required, true)?;
    }

    let entries = dependency_array(&mut doc)?;
    let configuration = opts.scope.as_deref().unwrap_or(DEFAULT_CONFIGURATION);
    let duplicate = entries.iter().any(|t| {
        let same_slot = t
            .get("coordinate")
            .and_then(|c| c.as_str())
            .and_then(|c| CoordinateRequest::parse(c, true).ok())
            .is_some_and(|c| c.key() == request.key());
        let same_scope = t
            .get("scope")
            .and_then(|s| s.as_str())
            .unwrap_or(DEFAULT_CONFIGURATION)
            == configuration;
        let same_kind = t.get("platform").and_then(Item::as_bool).unwrap_or(false) == opts.platform;
        same_slot && same_scope && same_kind
    });
    if duplicate {
        return Err(DroidplanError::Generic {
            message: format!("{} is already declared for `{configuration}`", request.key()),
        }
        .into());
    }

    let mut entry = Table::new();
    entry.insert("coordinate", Item::Value(Value::from(opts.spec.as_str())));
    if opts.platform {
        entry.insert("platform", Item::Value(Value::from(true)));
    } else if let Some(scope) = &opts.scope {
        entry.insert("scope", Item::Value(Value::from(scope.as_str())));
    }
    if !opts.requires.is_empty() {
        let mut requires = Array::new();
        for r in &opts.requires {
            requires.push(r.as_str());
        }
        entry.insert("requires", Item::Value(Value::Array(requires)));
    }
    entries.push(entry);

    tracing::debug!(coordinate = %opts.spec, "added dependency");
    std::fs::write(manifest_path, doc.to_string()).map_err(|e| DroidplanError::Io(e).into())
}

/// The `[[dependencies]]` array, created if absent.
fn dependency_array(doc: &mut DocumentMut) -> miette::Result<&mut ArrayOfTables> {
    let item = doc
        .as_table_mut()
        .entry("dependencies")
        .or_insert(Item::ArrayOfTables(ArrayOfTables::new()));
    item.as_array_of_tables_mut().ok_or_else(|| {
        DroidplanError::Manifest {
            message: "`dependencies` must be an array of tables".to_string(),
        }
        .into()
    })
}
