use crate::render::{RenderError, render};
use convert_case::{Case, Casing};
use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error as ThisError;
use webext_schema::model::AggregateClassModel;

///
/// SinkError
///

#[derive(Debug, ThisError)]
pub enum SinkError {
    #[error("failed to render generated source")]
    Render(#[from] RenderError),

    #[error("failed to write '{}'", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

///
/// SourceSink
///
/// Receives the finished model exactly once per successful run and persists
/// it as source text. Returns where the source ended up.
///

pub trait SourceSink {
    fn emit(&mut self, model: &AggregateClassModel) -> Result<PathBuf, SinkError>;
}

/// Relative file location for a type path.
///
/// `crate::generator::GeneratedWebSite` maps to
/// `generator/generated_web_site.rs`.
#[must_use]
pub fn source_path(type_path: &str) -> PathBuf {
    let mut segments: Vec<&str> = type_path
        .split("::")
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect();

    if segments.first() == Some(&"crate") {
        segments.remove(0);
    }

    let mut path = PathBuf::new();
    if let Some((name, modules)) = segments.split_last() {
        for module in modules {
            path.push(module);
        }
        path.push(format!("{}.rs", name.to_case(Case::Snake)));
    }

    path
}

///
/// MemorySink
///

#[derive(Debug, Default)]
pub struct MemorySink {
    files: BTreeMap<PathBuf, String>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, path: impl AsRef<Path>) -> Option<&str> {
        self.files.get(path.as_ref()).map(String::as_str)
    }

    #[must_use]
    pub const fn files(&self) -> &BTreeMap<PathBuf, String> {
        &self.files
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl SourceSink for MemorySink {
    fn emit(&mut self, model: &AggregateClassModel) -> Result<PathBuf, SinkError> {
        let source = render(model)?;
        let path = source_path(model.path());
        self.files.insert(path.clone(), source);

        Ok(path)
    }
}

///
/// OutDirSink
///
/// Writes under a root directory (usually cargo's `OUT_DIR`). The file is
/// written next to its target and renamed into place, so readers never see
/// a partial artifact.
///

#[derive(Clone, Debug)]
pub struct OutDirSink {
    root: PathBuf,
}

impl OutDirSink {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl SourceSink for OutDirSink {
    fn emit(&mut self, model: &AggregateClassModel) -> Result<PathBuf, SinkError> {
        // render before touching the filesystem
        let source = render(model)?;
        let target = self.root.join(source_path(model.path()));

        write_atomic(&target, source.as_bytes()).map_err(|source| SinkError::Io {
            path: target.clone(),
            source,
        })?;

        Ok(target)
    }
}

fn write_atomic(target: &Path, contents: &[u8]) -> io::Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }

    let staging = target.with_extension("rs.partial");
    if let Err(e) = fs::write(&staging, contents).and_then(|()| fs::rename(&staging, target)) {
        let _ = fs::remove_file(&staging);
        return Err(e);
    }

    Ok(())
}

///
/// TESTS
///
