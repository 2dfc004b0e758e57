use proc_macro2::{Ident, Span, TokenStream};
use quote::quote;
use std::{collections::HashSet, sync::LazyLock};
use syn::Path;
use thiserror::Error as ThisError;
use webext_schema::model::{AggregateClassModel, FieldDef, Visibility};

/// First line of every rendered file.
pub const GENERATED_HEADER: &str = "// @generated by webext-build, do not edit";

///
/// RenderError
///

#[derive(Debug, ThisError)]
pub enum RenderError {
    #[error("invalid path '{path}'")]
    InvalidPath {
        path: String,
        #[source]
        source: syn::Error,
    },

    #[error("'{name}' cannot be used as a field name")]
    InvalidFieldName { name: String },

    #[error("'{name}' cannot be used as a type name")]
    InvalidTypeName { name: String },
}

///
/// KEYWORDS
/// rust keywords that are still legal as raw identifiers
///

static KEYWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    // https://doc.rust-lang.org/reference/keywords.html
    HashSet::from([
        "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
        "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
        "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
        "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe",
        "unsized", "use", "virtual", "where", "while", "yield",
    ])
});

// path keywords that have no raw form
const NON_RAW: [&str; 4] = ["crate", "self", "Self", "super"];

/// Render the model to source text.
pub fn render(model: &AggregateClassModel) -> Result<String, RenderError> {
    let tokens = render_tokens(model)?;

    Ok(format!("{GENERATED_HEADER}\n{tokens}\n"))
}

/// Render the model to a token stream: the struct plus its base impl.
pub fn render_tokens(model: &AggregateClassModel) -> Result<TokenStream, RenderError> {
    let ident = type_ident(model.name())?;
    let base = parse_path(model.base())?;
    let derive = parse_path(model.locate_derive())?;
    let vis = visibility(model.visibility());
    let abstract_attr = model.is_abstract().then(|| quote!(#[non_exhaustive]));

    let fields = model
        .fields()
        .iter()
        .map(render_field)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(quote! {
        #[derive(#derive)]
        #[allow(non_snake_case)]
        #abstract_attr
        #vis struct #ident {
            #(#fields,)*
        }

        impl #base for #ident {}
    })
}

// find_bys is emitted ahead of find_by
fn render_field(field: &FieldDef) -> Result<TokenStream, RenderError> {
    let ident = field_ident(&field.name)?;
    let ty = parse_path(&field.ty)?;
    let vis = visibility(field.visibility);
    let find_bys = field.find_bys.as_ref();
    let find_by = field.find_by.as_ref();

    Ok(quote! {
        #find_bys
        #find_by
        #vis #ident: #ty
    })
}

fn visibility(visibility: Visibility) -> TokenStream {
    match visibility {
        Visibility::Public => quote!(pub),
    }
}

fn parse_path(path: &str) -> Result<Path, RenderError> {
    syn::parse_str(path).map_err(|source| RenderError::InvalidPath {
        path: path.to_string(),
        source,
    })
}

fn type_ident(name: &str) -> Result<Ident, RenderError> {
    syn::parse_str::<Ident>(name).map_err(|_| RenderError::InvalidTypeName {
        name: name.to_string(),
    })
}

fn field_ident(name: &str) -> Result<Ident, RenderError> {
    if NON_RAW.contains(&name) {
        return Err(RenderError::InvalidFieldName {
            name: name.to_string(),
        });
    }

    if KEYWORDS.contains(name) {
        return Ok(Ident::new_raw(name, Span::call_site()));
    }

    syn::parse_str::<Ident>(name).map_err(|_| RenderError::InvalidFieldName {
        name: name.to_string(),
    })
}

///
/// TESTS
///
