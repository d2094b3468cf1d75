//! Name-to-factory lookup for source plugins.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::dummy::{self, DummyOptions, DummySource};
use crate::error::SourceError;
use crate::file::{self, FileOptions, FileSource};
use crate::multi::{self, Merger, MultiSource};
use crate::source::Source;

/// Builds a source from plugin arguments. The registry is passed along so
/// that composite plugins can load their children.
pub type SourceFactory =
    fn(&SourceRegistry, &toml::Table) -> Result<Box<dyn Source>, SourceError>;

/// Canonical lookup key of a plugin name.
pub(crate) fn normalise(name: &str) -> String {
    name.replace('-', "_")
}

/// Deserialises plugin arguments into typed options.
pub(crate) fn parse_args<T: DeserializeOwned>(
    plugin: &str,
    args: &toml::Table,
) -> Result<T, SourceError> {
    toml::Value::Table(args.clone())
        .try_into()
        .map_err(|e: toml::de::Error| SourceError::invalid(plugin, e.message()))
}

/// A table of source plugins keyed by normalised name.
///
/// Names are normalised by replacing `-` with `_`, so `dummy-source` and
/// `dummy_source` resolve to the same plugin.
#[derive(Debug, Clone, Default)]
pub struct SourceRegistry {
    factories: BTreeMap<String, (String, SourceFactory)>,
}

impl SourceRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding `dummy-source`, `file` and `multi`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(dummy::NAME, load_dummy);
        registry.register(file::NAME, load_file);
        registry.register(multi::NAME, load_multi);
        registry
    }

    /// Registers `factory` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: &str, factory: SourceFactory) {
        self.factories.insert(normalise(name), (name.to_string(), factory));
    }

    /// Registered plugin names, as given to [`register`](Self::register).
    pub fn names(&self) -> Vec<&str> {
        self.factories.values().map(|(name, _)| name.as_str()).collect()
    }

    /// Whether a plugin answers to `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(&normalise(name))
    }

    /// Loads the plugin `name` with `args`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::UnknownSource`] when no plugin answers to
    /// `name`, and any error raised by the plugin itself.
    pub fn load(&self, name: &str, args: &toml::Table) -> Result<Box<dyn Source>, SourceError> {
        let (_, factory) = self
            .factories
            .get(&normalise(name))
            .ok_or_else(|| SourceError::UnknownSource {
                name: name.to_string(),
            })?;
        debug!(source = name, n_args = args.len(), "loading source");
        factory(self, args)
    }
}

/// Loads a builtin source plugin.
///
/// # Errors
///
/// See [`SourceRegistry::load`].
pub fn load_source(name: &str, args: &toml::Table) -> Result<Box<dyn Source>, SourceError> {
    SourceRegistry::with_builtins().load(name, args)
}

fn load_dummy(_: &SourceRegistry, args: &toml::Table) -> Result<Box<dyn Source>, SourceError> {
    let options: DummyOptions = parse_args(dummy::NAME, args)?;
    Ok(Box::new(DummySource::new(options)?))
}

fn load_file(_: &SourceRegistry, args: &toml::Table) -> Result<Box<dyn Source>, SourceError> {
    let options: FileOptions = parse_args(file::NAME, args)?;
    Ok(Box::new(FileSource::new(options.path)))
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MultiOptions {
    sources: Vec<toml::Table>,
    #[serde(default = "default_merger")]
    merger: String,
    dim: Option<String>,
}

fn default_merger() -> String {
    "by-coords".to_string()
}

/// Splits a child entry into its plugin name and remaining arguments.
fn split_name(
    plugin: &str,
    position: usize,
    mut entry: toml::Table,
) -> Result<(String, toml::Table), SourceError> {
    match entry.remove("name") {
        Some(toml::Value::String(name)) => Ok((name, entry)),
        Some(other) => Err(SourceError::invalid(
            plugin,
            format!("entry {position}: 'name' must be a string, got {}", other.type_str()),
        )),
        None => Err(SourceError::invalid(
            plugin,
            format!("entry {position}: missing 'name'"),
        )),
    }
}

fn load_multi(
    registry: &SourceRegistry,
    args: &toml::Table,
) -> Result<Box<dyn Source>, SourceError> {
    let options: MultiOptions = parse_args(multi::NAME, args)?;
    let merger = Merger::from_parts(&options.merger, options.dim.as_deref())?;
    if options.sources.is_empty() {
        return Err(SourceError::invalid(multi::NAME, "'sources' is empty"));
    }

    let mut children = Vec::with_capacity(options.sources.len());
    for (position, entry) in options.sources.into_iter().enumerate() {
        let (name, child_args) = split_name(multi::NAME, position, entry)?;
        children.push(registry.load(&name, &child_args)?);
    }
    info!(n_sources = children.len(), merger = %merger, "loaded multi source");
    Ok(Box::new(MultiSource::new(children).with_merger(merger)))
}
