/// Derive the aggregate field name from a type's simple identifier.
///
/// Only the first character is lower-cased; the remainder is kept as is, so
/// `LoginPage` becomes `loginPage` and `URLBar` becomes `uRLBar`.
#[must_use]
pub fn field_name(simple_name: &str) -> String {
    let mut chars = simple_name.chars();

    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

///
/// TESTS
///
