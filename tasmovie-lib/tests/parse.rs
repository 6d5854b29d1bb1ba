use std::fs;
use std::io::{Cursor, Write};
use std::thread;

use flate2::Compression;
use flate2::write::GzEncoder;
use tasmovie_lib::{
    DecodeError, FailureKind, ParseError, ParseOptions, Region, Registry, System,
    builtin_registry, parse, parse_with_options,
};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

fn ltm(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for (name, data) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_mode(0o644);
        if name.ends_with('/') {
            header.set_entry_type(tar::EntryType::Directory);
            header.set_size(0);
            builder.append_data(&mut header, name, std::io::empty()).unwrap();
        } else {
            header.set_size(data.len() as u64);
            builder.append_data(&mut header, name, *data).unwrap();
        }
    }
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&builder.into_inner().unwrap()).unwrap();
    encoder.finish().unwrap()
}

fn bk2(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, data) in entries {
        writer.start_file(*name, SimpleFileOptions::default()).unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

#[test]
fn test_init_builds_the_shared_registry() {
    let registry = tasmovie_lib::init();
    assert_eq!(registry.formats().len(), 7);
    assert!(std::ptr::eq(registry, builtin_registry()));
    assert!(std::ptr::eq(registry, tasmovie_lib::init()));
}

#[test]
fn test_case_insensitive_extension() {
    let movie = ltm(&[("config.ini", b"frame_count=1234\n")]);
    for name in ["run.ltm", "run.LTM", "ltm", ".Ltm"] {
        let result = parse(name, &mut Cursor::new(movie.clone())).unwrap();
        assert_eq!(result.frame_count, 1234, "{name}");
        assert_eq!(result.file_extension, "ltm");
    }
}

#[test]
fn test_unregistered_extension_is_not_supported() {
    let err = parse("movie.mkv", &mut Cursor::new(b"\x1A\x45\xDF\xA3".to_vec())).unwrap_err();
    assert!(err.is_not_supported());
    assert_eq!(err.failure_kind(), None);
    assert_eq!(err.to_string(), "Unsupported movie format: '.mkv'");
}

#[test]
fn test_well_formed_ltm() {
    let movie = ltm(&[
        ("config.ini", b"frame_count=1234\n"),
        ("inputs", b"|K|\n|K|\n"),
    ]);
    let result = parse("movie.ltm", &mut Cursor::new(movie)).unwrap();
    assert_eq!(result.frame_count, 1234);
    assert_eq!(result.region, Region::Ntsc);
    assert!(result.warnings.is_empty());
}

#[test]
fn test_malformed_frame_count_does_not_fail() {
    let movie = ltm(&[("config.ini", b"frame_count=abc\n")]);
    let result = parse("movie.ltm", &mut Cursor::new(movie)).unwrap();
    assert_eq!(result.frame_count, 0);
}

#[test]
fn test_missing_config_keeps_defaults() {
    let movie = ltm(&[("inputs", b"|K|\n")]);
    let result = parse("movie.ltm", &mut Cursor::new(movie)).unwrap();
    assert_eq!(result.frame_count, 0);
    assert_eq!(result.region, Region::Ntsc);
}

#[test]
fn test_non_archive_is_corrupt() {
    let err = parse("movie.ltm", &mut Cursor::new(b"definitely not an archive".to_vec()))
        .unwrap_err();
    assert!(matches!(
        err,
        ParseError::Decode(DecodeError::CorruptArchive(_))
    ));
    assert_eq!(err.failure_kind(), Some(FailureKind::CorruptArchive));
}

#[test]
fn test_parse_is_idempotent() {
    let movie = ltm(&[
        ("config.ini", b"frame_count=99\nrerecord_count=bad\n"),
        ("inputs", b"|K|\n"),
    ]);
    let first = parse("movie.ltm", &mut Cursor::new(movie.clone())).unwrap();
    let second = parse("movie.ltm", &mut Cursor::new(movie)).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.warnings.len(), 1);
}

#[test]
fn test_directories_and_unknown_entries_are_inert() {
    let plain = parse(
        "movie.ltm",
        &mut Cursor::new(ltm(&[("config.ini", b"frame_count=5\n")])),
    )
    .unwrap();
    let noisy = parse(
        "movie.ltm",
        &mut Cursor::new(ltm(&[
            ("inputs/", b""),
            ("config.ini", b"frame_count=5\n"),
            ("unknown.dat", b"frame_count=77\n"),
        ])),
    )
    .unwrap();
    assert_eq!(plain, noisy);
}

#[test]
fn test_input_size_bound() {
    let movie = ltm(&[("config.ini", b"frame_count=5\n")]);
    let options = ParseOptions::new().max_input_bytes(8);
    let err = parse_with_options("movie.ltm", &mut Cursor::new(movie), &options).unwrap_err();
    assert_eq!(err.failure_kind(), Some(FailureKind::TooLarge));
}

#[test]
fn test_bk2_through_registry() {
    let movie = bk2(&[
        ("Header.txt", b"Platform SNES\nrerecordCount 10\n"),
        ("Input Log.txt", b"|....|\n|..A.|\n"),
    ]);
    let result = parse("run.bk2", &mut Cursor::new(movie)).unwrap();
    assert_eq!(result.system, Some(System::Snes));
    assert_eq!(result.frame_count, 2);
    assert_eq!(result.rerecord_count, Some(10));
}

#[test]
fn test_parse_file_from_disk() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("Run.LTM");
    fs::write(&path, ltm(&[("config.ini", b"frame_count=321\n")])).unwrap();

    let registry = Registry::builtin().unwrap();
    let result = registry.parse_file(&path, &ParseOptions::default()).unwrap();
    assert_eq!(result.frame_count, 321);

    let other = tmp.path().join("notes.txt");
    fs::write(&other, "hello").unwrap();
    assert!(
        registry
            .parse_file(&other, &ParseOptions::default())
            .unwrap_err()
            .is_not_supported()
    );
}

#[test]
fn test_concurrent_callers_share_the_registry() {
    let movie = ltm(&[("config.ini", b"frame_count=42\n")]);
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let movie = movie.clone();
            thread::spawn(move || parse("movie.ltm", &mut Cursor::new(movie)).unwrap())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap().frame_count, 42);
    }
}
