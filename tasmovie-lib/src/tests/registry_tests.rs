use super::*;
use std::io::{Cursor, Read};

use tasmovie_core::ParseResult;

/// Decoder that claims arbitrary extensions and echoes the input length
/// back as the frame count.
struct StubDecoder {
    name: &'static str,
    extensions: &'static [&'static str],
}

impl MovieDecoder for StubDecoder {
    fn decode(
        &self,
        reader: &mut dyn ReadSeek,
        _options: &ParseOptions,
    ) -> Result<ParseResult, DecodeError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let mut result = ParseResult::new(self.extensions[0]);
        result.frame_count = bytes.len() as u64;
        Ok(result)
    }

    fn format_name(&self) -> &'static str {
        self.name
    }

    fn emulator(&self) -> &'static str {
        "stub"
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        self.extensions
    }
}

fn stub(name: &'static str, extensions: &'static [&'static str]) -> StubDecoder {
    StubDecoder { name, extensions }
}

#[test]
fn test_resolve_is_case_insensitive() {
    let registry = Registry::builtin().unwrap();
    for ext in registry.extensions() {
        let lower = registry.resolve(ext).unwrap();
        let upper = registry.resolve(&ext.to_uppercase()).unwrap();
        let dotted = registry.resolve(&format!(".{ext}")).unwrap();
        assert_eq!(lower.info.name, upper.info.name);
        assert_eq!(lower.info.name, dotted.info.name);
    }
}

#[test]
fn test_resolve_is_exact() {
    let registry = Registry::builtin().unwrap();
    assert!(registry.resolve("ltm").is_some());
    assert!(registry.resolve("lt").is_none());
    assert!(registry.resolve("ltmx").is_none());
    assert!(registry.resolve("*").is_none());
    assert!(registry.resolve("").is_none());
}

#[test]
fn test_builtin_formats() {
    let registry = Registry::builtin().unwrap();
    assert_eq!(
        registry.extensions(),
        vec!["bk2", "dtm", "fm2", "lsmv", "ltm", "smv", "vbm"]
    );
    let formats = registry.formats();
    assert_eq!(formats.len(), 7);
    assert_eq!(formats[0].name, "libTAS movie");
}

#[test]
fn test_duplicate_extension_fails_fast() {
    let mut registry = Registry::new();
    registry.register(stub("First", &["abc", "def"])).unwrap();
    match registry.register(stub("Second", &["xyz", "DEF"])) {
        Err(RegistryError::DuplicateExtension {
            extension,
            existing,
            new,
        }) => {
            assert_eq!(extension, "def");
            assert_eq!(existing, "First");
            assert_eq!(new, "Second");
        }
        Err(other) => panic!("expected DuplicateExtension, got {other:?}"),
        Ok(_) => panic!("duplicate registration succeeded"),
    }
    // The failed registration left nothing behind.
    assert!(registry.resolve("xyz").is_none());
    assert_eq!(registry.decoders().count(), 1);
}

#[test]
fn test_duplicate_within_one_decoder() {
    let mut registry = Registry::new();
    assert!(matches!(
        registry.register(stub("Twice", &["abc", "ABC"])),
        Err(RegistryError::DuplicateExtension { .. })
    ));
}

#[test]
fn test_no_extensions() {
    let mut registry = Registry::new();
    assert!(matches!(
        registry.register(stub("Nothing", &[])),
        Err(RegistryError::NoExtensions { format: "Nothing" })
    ));
}

#[test]
fn test_builtin_conflicts_with_custom() {
    let mut registry = Registry::builtin().unwrap();
    assert!(registry.register(stub("Other libTAS", &["ltm"])).is_err());
    assert!(registry.register(stub("New", &["new"])).is_ok());
    assert_eq!(registry.resolve("NEW").unwrap().info.name, "New");
}

#[test]
fn test_extension_of() {
    assert_eq!(extension_of("ltm"), "ltm");
    assert_eq!(extension_of(".ltm"), "ltm");
    assert_eq!(extension_of("run.final.LTM"), "LTM");
    assert_eq!(extension_of("movies/v1.2/run.bk2"), "bk2");
    assert_eq!(extension_of("C:\\movies\\run.fm2"), "fm2");
    assert_eq!(extension_of("movies.d/README"), "README");
}

#[test]
fn test_parse_not_supported() {
    let registry = Registry::builtin().unwrap();
    let err = registry
        .parse("movie.xyz", &mut Cursor::new(b"anything".to_vec()))
        .unwrap_err();
    match err {
        ParseError::NotSupported { extension } => assert_eq!(extension, "xyz"),
        other => panic!("expected NotSupported, got {other:?}"),
    }
}

#[test]
fn test_parse_dispatches_and_rewinds() {
    let mut registry = Registry::new();
    registry.register(stub("Stub", &["stb"])).unwrap();

    let mut cursor = Cursor::new(vec![0u8; 40]);
    cursor.set_position(25);
    let result = registry.parse("clip.STB", &mut cursor).unwrap();
    assert_eq!(result.frame_count, 40);
}

#[test]
fn test_parse_rejects_oversized_input() {
    let mut registry = Registry::new();
    registry.register(stub("Stub", &["stb"])).unwrap();

    let options = ParseOptions::new().max_input_bytes(10);
    let err = registry
        .parse_with_options("stb", &mut Cursor::new(vec![0u8; 11]), &options)
        .unwrap_err();
    assert!(matches!(
        err,
        ParseError::Decode(DecodeError::TooLarge { limit: 10, actual: 11 })
    ));
    assert_eq!(err.failure_kind(), Some(tasmovie_core::FailureKind::TooLarge));

    let ok = registry.parse_with_options("stb", &mut Cursor::new(vec![0u8; 10]), &options);
    assert!(ok.is_ok());
}
