use crate::prelude::*;
use derive_more::Display;
use proc_macro2::TokenStream;
use quote::{ToTokens, format_ident, quote};

///
/// How
///
/// Lookup strategy of a single selector expression.
///

#[derive(
    Clone, Copy, Debug, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[remain::sorted]
#[serde(rename_all = "snake_case")]
pub enum How {
    #[display("class_name")]
    ClassName,
    #[display("css")]
    Css,
    #[display("id")]
    Id,
    #[display("link_text")]
    LinkText,
    #[display("name")]
    Name,
    #[display("partial_link_text")]
    PartialLinkText,
    #[display("tag_name")]
    TagName,
    #[display("xpath")]
    #[serde(rename = "xpath")]
    XPath,
}

///
/// Selector
///
/// One selector expression; `using` is kept verbatim.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Selector {
    pub how: How,
    pub using: String,
}

impl Selector {
    #[must_use]
    pub fn new(how: How, using: impl Into<String>) -> Self {
        Self {
            how,
            using: using.into(),
        }
    }

    #[must_use]
    pub fn css(using: impl Into<String>) -> Self {
        Self::new(How::Css, using)
    }

    #[must_use]
    pub fn id(using: impl Into<String>) -> Self {
        Self::new(How::Id, using)
    }

    #[must_use]
    pub fn xpath(using: impl Into<String>) -> Self {
        Self::new(How::XPath, using)
    }
}

// find_by(css = "...")
impl ToTokens for Selector {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let how = format_ident!("{}", self.how.to_string());
        let using = self.using.as_str();

        tokens.extend(quote!(#how = #using));
    }
}

///
/// Combination
///
/// How the selectors of a multi-locator directive combine.
///

#[derive(
    Clone, Copy, Debug, Default, Deserialize, Display, Eq, Hash, PartialEq, Serialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Combination {
    /// Every selector must match, each one scoped by the previous.
    #[default]
    #[display("all")]
    All,

    /// Any selector may match.
    #[display("any")]
    Any,
}

///
/// FindBy
///
/// Single-locator directive.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct FindBy {
    pub selector: Selector,
}

impl FindBy {
    #[must_use]
    pub const fn new(selector: Selector) -> Self {
        Self { selector }
    }
}

impl ToTokens for FindBy {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let selector = &self.selector;

        tokens.extend(quote!(#[find_by(#selector)]));
    }
}

///
/// FindBys
///
/// Multi-locator directive. Selector order is significant and never changed.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct FindBys {
    #[serde(default)]
    pub mode: Combination,
    pub selectors: Vec<Selector>,
}

impl FindBys {
    #[must_use]
    pub const fn new(mode: Combination, selectors: Vec<Selector>) -> Self {
        Self { mode, selectors }
    }

    #[must_use]
    pub const fn all(selectors: Vec<Selector>) -> Self {
        Self::new(Combination::All, selectors)
    }

    #[must_use]
    pub const fn any(selectors: Vec<Selector>) -> Self {
        Self::new(Combination::Any, selectors)
    }
}

impl ToTokens for FindBys {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let mode = self.mode.to_string();
        let selectors = self.selectors.iter();

        tokens.extend(quote! {
            #[find_bys(mode = #mode #(, find_by(#selectors))*)]
        });
    }
}

///
/// TESTS
///
