//! Descriptor and model types for the generated web site aggregate.
//!
//! Descriptors name previously declared page, repository and component types.
//! The [`model::ModelBuilder`] turns them into an immutable
//! [`model::AggregateClassModel`] that a renderer can walk without touching
//! the inputs again.

pub mod descriptor;
pub mod directive;
pub mod model;
pub mod naming;

/// Default fully-qualified path of the generated aggregate.
pub const DEFAULT_OUTPUT_PATH: &str = "crate::generator::GeneratedWebSite";

/// Default base trait every generated aggregate implements.
pub const DEFAULT_BASE_PATH: &str = "::webdriver_extensions::WebSite";

/// Default derive that registers the locator helper attributes.
pub const DEFAULT_LOCATE_DERIVE_PATH: &str = "::webdriver_extensions::Locate";

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        descriptor::TypeDescriptor,
        directive::{Combination, FindBy, FindBys, How, Selector},
        model::{AggregateClassModel, FieldDef, Visibility},
        naming::field_name,
    };
    pub use serde::{Deserialize, Serialize};
}
