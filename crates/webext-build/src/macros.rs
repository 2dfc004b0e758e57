//! Build-script helper that generates the web site aggregate into `OUT_DIR`.
//!
//! Takes the page, repository and other descriptor collections. The
//! enclosing function must return a `Result` whose error type accepts
//! `std::env::VarError` and `GenerateError`, such as
//! `Box<dyn std::error::Error>`.
#[macro_export]
macro_rules! build {
    ($pages:expr, $repositories:expr, $others:expr $(,)?) => {
        //
        // CARGO
        //

        println!("cargo:rerun-if-changed=build.rs");
        for key in [
            $crate::config::OUTPUT_TYPE_ENV,
            $crate::config::BASE_TYPE_ENV,
            $crate::config::LOCATE_DERIVE_ENV,
        ] {
            println!("cargo:rerun-if-env-changed={key}");
        }

        // Get the output directory set by Cargo
        let out_dir = ::std::env::var("OUT_DIR")?;

        //
        // AGGREGATE
        //

        let mut sink = $crate::sink::OutDirSink::new(out_dir);
        $crate::AggregateClassGenerator::new($crate::config::GeneratorConfig::from_env())
            .generate(&$pages, &$repositories, &$others, &mut sink)?;
    };
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use crate::{
        config::{BASE_TYPE_ENV, LOCATE_DERIVE_ENV, OUTPUT_TYPE_ENV},
        sink::source_path,
        with_env,
    };
    use std::{error::Error, fs};
    use webext_schema::{DEFAULT_OUTPUT_PATH, descriptor::TypeDescriptor};

    fn run(pages: Vec<TypeDescriptor>) -> Result<(), Box<dyn Error>> {
        let repositories: Vec<TypeDescriptor> = Vec::new();
        let others: Vec<TypeDescriptor> = Vec::new();

        crate::build!(pages, repositories, others);

        Ok(())
    }

    #[test]
    fn build_writes_aggregate_into_out_dir() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().to_str().unwrap();
        let vars = [
            ("OUT_DIR", Some(out_dir)),
            (OUTPUT_TYPE_ENV, None),
            (BASE_TYPE_ENV, None),
            (LOCATE_DERIVE_ENV, None),
        ];

        with_env(&vars, || {
            run(vec![TypeDescriptor::new("crate::pages::Home").unwrap()])
        })
        .unwrap();

        let written = fs::read_to_string(dir.path().join(source_path(DEFAULT_OUTPUT_PATH))).unwrap();
        assert!(written.contains("home"));
    }

    #[test]
    fn build_fails_without_out_dir() {
        let result = with_env(&[("OUT_DIR", None)], || run(Vec::new()));

        assert!(result.is_err());
    }
}
