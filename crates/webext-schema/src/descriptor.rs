use crate::{
    directive::{FindBy, FindBys},
    naming::field_name,
    prelude::*,
};
use syn::{Path, PathArguments, ext::IdentExt};
use thiserror::Error as ThisError;

///
/// DescriptorError
///

#[derive(Debug, ThisError)]
pub enum DescriptorError {
    #[error("type path is empty")]
    EmptyPath,

    #[error("invalid type path '{path}'")]
    InvalidPath {
        path: String,
        #[source]
        source: syn::Error,
    },

    #[error("type path '{path}' must not carry generic arguments")]
    GenericArguments { path: String },
}

///
/// TypeDescriptor
///
/// A previously declared type, identified by its fully-qualified path, plus
/// the locator directives declared on it.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(try_from = "DescriptorDef", into = "DescriptorDef")]
pub struct TypeDescriptor {
    qualified_name: String,
    simple_name: String,
    find_by: Option<FindBy>,
    find_bys: Option<FindBys>,
}

impl TypeDescriptor {
    /// Parse a descriptor from a type path such as `crate::pages::LoginPage`.
    pub fn new(path: &str) -> Result<Self, DescriptorError> {
        let path = path.trim();
        if path.is_empty() {
            return Err(DescriptorError::EmptyPath);
        }

        let parsed: Path = syn::parse_str(path).map_err(|source| DescriptorError::InvalidPath {
            path: path.to_string(),
            source,
        })?;

        if parsed
            .segments
            .iter()
            .any(|segment| !matches!(segment.arguments, PathArguments::None))
        {
            return Err(DescriptorError::GenericArguments {
                path: path.to_string(),
            });
        }

        let segments: Vec<String> = parsed
            .segments
            .iter()
            .map(|segment| segment.ident.to_string())
            .collect();

        // raw identifiers name the same type, so `r#type` derives `type`
        let simple_name = parsed
            .segments
            .last()
            .map(|segment| segment.ident.unraw().to_string())
            .unwrap_or_default();
        let mut qualified_name = segments.join("::");
        if parsed.leading_colon.is_some() {
            qualified_name.insert_str(0, "::");
        }

        Ok(Self {
            qualified_name,
            simple_name,
            find_by: None,
            find_bys: None,
        })
    }

    #[must_use]
    pub fn with_find_by(mut self, directive: FindBy) -> Self {
        self.find_by = Some(directive);
        self
    }

    #[must_use]
    pub fn with_find_bys(mut self, directive: FindBys) -> Self {
        self.find_bys = Some(directive);
        self
    }

    /// Normalized path, segments joined by `::` without whitespace.
    #[must_use]
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    #[must_use]
    pub fn simple_name(&self) -> &str {
        &self.simple_name
    }

    #[must_use]
    pub fn field_name(&self) -> String {
        field_name(&self.simple_name)
    }

    #[must_use]
    pub const fn find_by(&self) -> Option<&FindBy> {
        self.find_by.as_ref()
    }

    #[must_use]
    pub const fn find_bys(&self) -> Option<&FindBys> {
        self.find_bys.as_ref()
    }

    /// Stable ordering key used before field declaration.
    #[must_use]
    pub fn sort_key(&self) -> (&str, &str) {
        (&self.simple_name, &self.qualified_name)
    }
}

// serde shape: { "path": "...", "find_by": {...}, "find_bys": {...} }
#[derive(Deserialize, Serialize)]
struct DescriptorDef {
    path: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    find_by: Option<FindBy>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    find_bys: Option<FindBys>,
}

impl TryFrom<DescriptorDef> for TypeDescriptor {
    type Error = DescriptorError;

    fn try_from(def: DescriptorDef) -> Result<Self, Self::Error> {
        let mut descriptor = Self::new(&def.path)?;
        descriptor.find_by = def.find_by;
        descriptor.find_bys = def.find_bys;

        Ok(descriptor)
    }
}

impl From<TypeDescriptor> for DescriptorDef {
    fn from(descriptor: TypeDescriptor) -> Self {
        Self {
            path: descriptor.qualified_name,
            find_by: descriptor.find_by,
            find_bys: descriptor.find_bys,
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_path_and_takes_last_segment() {
        let descriptor = TypeDescriptor::new(" crate :: pages :: LoginPage ").unwrap();

        assert_eq!(descriptor.qualified_name(), "crate::pages::LoginPage");
        assert_eq!(descriptor.simple_name(), "LoginPage");
        assert_eq!(descriptor.field_name(), "loginPage");
    }

    #[test]
    fn keeps_leading_colon() {
        let descriptor = TypeDescriptor::new("::site::Menu").unwrap();

        assert_eq!(descriptor.qualified_name(), "::site::Menu");
        assert_eq!(descriptor.simple_name(), "Menu");
    }

    #[test]
    fn rejects_empty_and_malformed_paths() {
        assert!(matches!(
            TypeDescriptor::new("  "),
            Err(DescriptorError::EmptyPath)
        ));
        assert!(matches!(
            TypeDescriptor::new("pages::"),
            Err(DescriptorError::InvalidPath { .. })
        ));
        assert!(matches!(
            TypeDescriptor::new("pages::Login Page"),
            Err(DescriptorError::InvalidPath { .. })
        ));
    }

    #[test]
    fn raw_identifier_is_unrawed_for_the_simple_name() {
        let descriptor = TypeDescriptor::new("crate::parts::r#Match").unwrap();

        assert_eq!(descriptor.qualified_name(), "crate::parts::r#Match");
        assert_eq!(descriptor.simple_name(), "Match");
        assert_eq!(descriptor.field_name(), "match");

        let keyword = TypeDescriptor::new("crate::parts::r#type").unwrap();
        assert_eq!(keyword.simple_name(), "type");
        assert_eq!(keyword.field_name(), "type");
    }

    #[test]
    fn rejects_generic_arguments() {
        assert!(matches!(
            TypeDescriptor::new("pages::Table<Row>"),
            Err(DescriptorError::GenericArguments { .. })
        ));
    }

    #[test]
    fn deserialize_validates_path() {
        let json = r#"{"path":"crate::parts::Menu","find_by":{"selector":{"how":"css","using":"nav"}}}"#;
        let descriptor: TypeDescriptor = serde_json::from_str(json).unwrap();

        assert_eq!(descriptor.simple_name(), "Menu");
        assert_eq!(
            descriptor.find_by(),
            Some(&FindBy::new(Selector::css("nav")))
        );
        assert!(descriptor.find_bys().is_none());

        let bad = serde_json::from_str::<TypeDescriptor>(r#"{"path":""}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn serialize_writes_normalized_path() {
        let descriptor = TypeDescriptor::new("crate :: parts :: Menu").unwrap();
        let json = serde_json::to_string(&descriptor).unwrap();

        assert_eq!(json, r#"{"path":"crate::parts::Menu"}"#);
    }
}
