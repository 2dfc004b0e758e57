use syn::Path;
use webext_schema::{DEFAULT_BASE_PATH, DEFAULT_LOCATE_DERIVE_PATH, DEFAULT_OUTPUT_PATH};

pub const OUTPUT_TYPE_ENV: &str = "WEBEXT_OUTPUT_TYPE";
pub const BASE_TYPE_ENV: &str = "WEBEXT_BASE_TYPE";
pub const LOCATE_DERIVE_ENV: &str = "WEBEXT_LOCATE_DERIVE";

// Read a path override, dropping values that do not parse as a path.
fn env_path(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| syn::parse_str::<Path>(value).is_ok())
}

///
/// GeneratorConfig
///
/// Fixed paths baked into the generated aggregate. Build scripts resolve it
/// with [`GeneratorConfig::from_env`], which honours
/// `WEBEXT_OUTPUT_TYPE`, `WEBEXT_BASE_TYPE` and `WEBEXT_LOCATE_DERIVE`.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GeneratorConfig {
    pub output_path: String,
    pub base_path: String,
    pub locate_derive_path: String,
}

impl GeneratorConfig {
    #[must_use]
    pub fn new(
        output_path: impl Into<String>,
        base_path: impl Into<String>,
        locate_derive_path: impl Into<String>,
    ) -> Self {
        Self {
            output_path: output_path.into(),
            base_path: base_path.into(),
            locate_derive_path: locate_derive_path.into(),
        }
    }

    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            output_path: env_path(OUTPUT_TYPE_ENV).unwrap_or(defaults.output_path),
            base_path: env_path(BASE_TYPE_ENV).unwrap_or(defaults.base_path),
            locate_derive_path: env_path(LOCATE_DERIVE_ENV)
                .unwrap_or(defaults.locate_derive_path),
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_OUTPUT_PATH,
            DEFAULT_BASE_PATH,
            DEFAULT_LOCATE_DERIVE_PATH,
        )
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::with_env;

    const UNSET: [(&str, Option<&str>); 3] = [
        (OUTPUT_TYPE_ENV, None),
        (BASE_TYPE_ENV, None),
        (LOCATE_DERIVE_ENV, None),
    ];

    #[test]
    fn defaults_without_overrides() {
        let config = with_env(&UNSET, GeneratorConfig::from_env);

        assert_eq!(config, GeneratorConfig::default());
    }

    #[test]
    fn env_overrides_valid_paths() {
        let vars = [
            (OUTPUT_TYPE_ENV, Some(" crate::site::Shop ")),
            (BASE_TYPE_ENV, Some("::my_driver::Site")),
            (LOCATE_DERIVE_ENV, None),
        ];
        let config = with_env(&vars, GeneratorConfig::from_env);

        assert_eq!(config.output_path, "crate::site::Shop");
        assert_eq!(config.base_path, "::my_driver::Site");
        assert_eq!(config.locate_derive_path, DEFAULT_LOCATE_DERIVE_PATH);
    }

    #[test]
    fn invalid_override_keeps_default() {
        let mut vars = UNSET;
        vars[0].1 = Some("not a path!");
        let config = with_env(&vars, GeneratorConfig::from_env);

        assert_eq!(config.output_path, DEFAULT_OUTPUT_PATH);
    }

    #[test]
    fn overrides_are_restored_after_use() {
        with_env(&[(BASE_TYPE_ENV, Some("::scoped::Site"))], || {
            assert_eq!(GeneratorConfig::from_env().base_path, "::scoped::Site");
        });

        let config = with_env(&[], GeneratorConfig::from_env);
        assert_ne!(config.base_path, "::scoped::Site");
    }
}
