use crate::{
    descriptor::TypeDescriptor,
    directive::{FindBy, FindBys},
    prelude::*,
};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error as ThisError;

///
/// ModelError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum ModelError {
    #[error("type '{path}' already exists in the working model")]
    ClassConflict { path: String },

    #[error("field '{field}' of '{current}' collides with the field already declared for '{previous}'")]
    FieldNameCollision {
        field: String,
        previous: String,
        current: String,
    },
}

///
/// Visibility
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub enum Visibility {
    #[default]
    Public,
}

///
/// AggregateClassModel
///
/// The one type produced by a generation run. Immutable once returned by
/// [`ClassBuilder::finish`].
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct AggregateClassModel {
    path: String,
    base: String,
    locate_derive: String,
    visibility: Visibility,
    is_abstract: bool,
    fields: Vec<FieldDef>,
}

impl AggregateClassModel {
    /// Fully-qualified path of the generated type.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Last segment of [`Self::path`].
    #[must_use]
    pub fn name(&self) -> &str {
        self.path.rsplit("::").next().unwrap_or(&self.path)
    }

    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    #[must_use]
    pub fn locate_derive(&self) -> &str {
        &self.locate_derive
    }

    #[must_use]
    pub const fn visibility(&self) -> Visibility {
        self.visibility
    }

    #[must_use]
    pub const fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    /// Fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }
}

///
/// FieldDef
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct FieldDef {
    pub name: String,
    pub ty: String,
    pub visibility: Visibility,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub find_bys: Option<FindBys>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub find_by: Option<FindBy>,
}

impl FieldDef {
    pub fn attach_find_bys(&mut self, directive: FindBys) {
        self.find_bys = Some(directive);
    }

    pub fn attach_find_by(&mut self, directive: FindBy) {
        self.find_by = Some(directive);
    }

    #[must_use]
    pub const fn has_directives(&self) -> bool {
        self.find_bys.is_some() || self.find_by.is_some()
    }
}

///
/// ModelBuilder
///
/// Working model for one run. Types registered here are considered taken,
/// so the aggregate can never silently replace one of them.
///

#[derive(Debug, Default)]
pub struct ModelBuilder {
    types: BTreeSet<String>,
}

impl ModelBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an existing type path.
    pub fn declare_type(&mut self, path: &str) {
        self.types.insert(path.to_string());
    }

    /// Create the aggregate: public, abstract, extending `base`.
    pub fn create_class(
        mut self,
        path: &str,
        base: &str,
        locate_derive: &str,
    ) -> Result<ClassBuilder, ModelError> {
        if !self.types.insert(path.to_string()) {
            return Err(ModelError::ClassConflict {
                path: path.to_string(),
            });
        }

        Ok(ClassBuilder {
            model: AggregateClassModel {
                path: path.to_string(),
                base: base.to_string(),
                locate_derive: locate_derive.to_string(),
                visibility: Visibility::Public,
                is_abstract: true,
                fields: Vec::new(),
            },
            owners: BTreeMap::new(),
        })
    }
}

///
/// ClassBuilder
///

#[derive(Debug)]
pub struct ClassBuilder {
    model: AggregateClassModel,
    // field name -> qualified name of the descriptor that declared it
    owners: BTreeMap<String, String>,
}

impl ClassBuilder {
    /// Declare a public field typed by the descriptor's own type.
    ///
    /// Directives are not copied here; callers attach them to the returned
    /// field when the descriptor's set calls for it.
    pub fn declare_field(
        &mut self,
        descriptor: &TypeDescriptor,
    ) -> Result<&mut FieldDef, ModelError> {
        let name = descriptor.field_name();
        let current = descriptor.qualified_name().to_string();

        if let Some(previous) = self.owners.get(&name) {
            return Err(ModelError::FieldNameCollision {
                field: name,
                previous: previous.clone(),
                current,
            });
        }
        self.owners.insert(name.clone(), current.clone());

        self.model.fields.push(FieldDef {
            name,
            ty: current,
            visibility: Visibility::Public,
            find_bys: None,
            find_by: None,
        });

        let index = self.model.fields.len() - 1;
        Ok(&mut self.model.fields[index])
    }

    #[must_use]
    pub fn model(&self) -> &AggregateClassModel {
        &self.model
    }

    #[must_use]
    pub fn finish(self) -> AggregateClassModel {
        self.model
    }
}

///
/// TESTS
///
