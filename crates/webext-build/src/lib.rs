//! Build-time generator for the web site aggregate.
//!
//! [`AggregateClassGenerator::generate`] takes the page, repository and other
//! descriptors of a crate, builds one [`AggregateClassModel`] holding a public
//! field per descriptor and hands it to a [`SourceSink`]. Build scripts
//! normally go through the [`build!`] macro instead.

pub mod config;
pub mod render;
pub mod sink;

mod macros;

use crate::{config::GeneratorConfig, sink::SinkError};
use std::{error::Error as StdError, path::PathBuf};
use thiserror::Error as ThisError;
use tracing::{debug, error, info, info_span};
use webext_schema::{
    descriptor::TypeDescriptor,
    model::{AggregateClassModel, ModelBuilder, ModelError},
};

pub use crate::sink::{MemorySink, OutDirSink, SourceSink};

// Run `f` with the given variables set (`None` unsets), serialized across
// tests and restored afterwards.
#[cfg(test)]
pub(crate) fn with_env<R>(vars: &[(&str, Option<&str>)], f: impl FnOnce() -> R) -> R {
    use std::sync::{Mutex, PoisonError};

    static ENV_LOCK: Mutex<()> = Mutex::new(());
    let _lock = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);

    let saved: Vec<_> = vars
        .iter()
        .map(|(key, _)| ((*key).to_string(), std::env::var_os(key)))
        .collect();

    let apply = |key: &str, value: Option<&std::ffi::OsStr>| unsafe {
        match value {
            Some(value) => std::env::set_var(key, value),
            None => std::env::remove_var(key),
        }
    };

    for (key, value) in vars {
        apply(key, value.map(std::ffi::OsStr::new));
    }
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(f));
    for (key, value) in &saved {
        apply(key, value.as_deref());
    }

    result.unwrap_or_else(|panic| std::panic::resume_unwind(panic))
}

/// Outcome of one generation run.
pub type GenerationResult = Result<Generated, GenerateError>;

///
/// Generated
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Generated {
    pub path: String,
    pub fields: usize,
    pub location: PathBuf,
}

///
/// GenerateErrorKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GenerateErrorKind {
    ClassConflict,
    FieldNameCollision,
    SerializationFailure,
}

///
/// GenerateError
///
/// The message names the aggregate; the cause stays reachable through
/// [`std::error::Error::source`].
///

#[derive(Debug, ThisError)]
pub enum GenerateError {
    #[error("failed to generate '{output}': type name conflict")]
    ClassConflict {
        output: String,
        #[source]
        source: ModelError,
    },

    #[error("failed to generate '{output}': field name collision")]
    FieldNameCollision {
        output: String,
        #[source]
        source: ModelError,
    },

    #[error("failed to generate '{output}': serialization failed")]
    SerializationFailure {
        output: String,
        #[source]
        source: SinkError,
    },
}

impl GenerateError {
    fn from_model(output: &str, source: ModelError) -> Self {
        let output = output.to_string();

        match source {
            ModelError::ClassConflict { .. } => Self::ClassConflict { output, source },
            ModelError::FieldNameCollision { .. } => Self::FieldNameCollision { output, source },
        }
    }

    #[must_use]
    pub const fn kind(&self) -> GenerateErrorKind {
        match self {
            Self::ClassConflict { .. } => GenerateErrorKind::ClassConflict,
            Self::FieldNameCollision { .. } => GenerateErrorKind::FieldNameCollision,
            Self::SerializationFailure { .. } => GenerateErrorKind::SerializationFailure,
        }
    }

    /// The message followed by every cause in the chain.
    #[must_use]
    pub fn report(&self) -> String {
        let mut report = self.to_string();
        let mut cause = self.source();

        while let Some(err) = cause {
            report.push_str(": ");
            report.push_str(&err.to_string());
            cause = err.source();
        }

        report
    }
}

///
/// AggregateClassGenerator
///

#[derive(Clone, Debug, Default)]
pub struct AggregateClassGenerator {
    config: GeneratorConfig,
}

impl AggregateClassGenerator {
    #[must_use]
    pub const fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Build the aggregate from the three descriptor sets and emit it.
    ///
    /// The sink is only called once the model is complete; on any error
    /// nothing is emitted.
    pub fn generate<S>(
        &self,
        pages: &[TypeDescriptor],
        repositories: &[TypeDescriptor],
        others: &[TypeDescriptor],
        sink: &mut S,
    ) -> GenerationResult
    where
        S: SourceSink + ?Sized,
    {
        let output = normalize_path(&self.config.output_path);
        let span = info_span!("generate", output = %output);
        let _guard = span.enter();

        let result = self
            .build_model(pages, repositories, others)
            .map_err(|source| GenerateError::from_model(&output, source))
            .and_then(|model| {
                let location =
                    sink.emit(&model)
                        .map_err(|source| GenerateError::SerializationFailure {
                            output: output.clone(),
                            source,
                        })?;

                Ok(Generated {
                    path: model.path().to_string(),
                    fields: model.fields().len(),
                    location,
                })
            });

        match &result {
            Ok(generated) => info!(
                fields = generated.fields,
                location = %generated.location.display(),
                "generated aggregate"
            ),
            Err(e) => error!(kind = ?e.kind(), error = %e.report(), "aggregate generation failed"),
        }

        result
    }

    /// Build the model without emitting it.
    ///
    /// Pages are declared first, then repositories, then others; each set is
    /// ordered by simple name, then qualified name. Locator directives are
    /// copied from `others` only.
    pub fn build_model(
        &self,
        pages: &[TypeDescriptor],
        repositories: &[TypeDescriptor],
        others: &[TypeDescriptor],
    ) -> Result<AggregateClassModel, ModelError> {
        let mut builder = ModelBuilder::new();
        for descriptor in pages.iter().chain(repositories).chain(others) {
            builder.declare_type(descriptor.qualified_name());
        }

        let mut class = builder.create_class(
            &normalize_path(&self.config.output_path),
            &normalize_path(&self.config.base_path),
            &normalize_path(&self.config.locate_derive_path),
        )?;

        for descriptor in sorted(pages).into_iter().chain(sorted(repositories)) {
            let field = class.declare_field(descriptor)?;
            debug!(field = %field.name, ty = %field.ty, "declared field");
        }

        for descriptor in sorted(others) {
            let field = class.declare_field(descriptor)?;
            debug!(field = %field.name, ty = %field.ty, "declared field");

            if let Some(directive) = descriptor.find_bys() {
                debug!(field = %field.name, selectors = directive.selectors.len(), "propagated find_bys");
                field.attach_find_bys(directive.clone());
            }
            if let Some(directive) = descriptor.find_by() {
                debug!(field = %field.name, how = %directive.selector.how, "propagated find_by");
                field.attach_find_by(directive.clone());
            }
        }

        Ok(class.finish())
    }
}

/// Generate with the default configuration.
pub fn generate<S>(
    pages: &[TypeDescriptor],
    repositories: &[TypeDescriptor],
    others: &[TypeDescriptor],
    sink: &mut S,
) -> GenerationResult
where
    S: SourceSink + ?Sized,
{
    AggregateClassGenerator::default().generate(pages, repositories, others, sink)
}

fn sorted(descriptors: &[TypeDescriptor]) -> Vec<&TypeDescriptor> {
    let mut sorted: Vec<_> = descriptors.iter().collect();
    sorted.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

    sorted
}

// "crate :: a :: B" -> "crate::a::B"
fn normalize_path(path: &str) -> String {
    path.split_whitespace().collect()
}

///
/// TESTS
///
