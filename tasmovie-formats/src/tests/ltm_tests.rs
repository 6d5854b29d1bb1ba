use super::*;
use std::io::Cursor;

use crate::fixtures::{tar_gz_archive, zip_archive};

const CONFIG: &[u8] = b"[General]\n\
game_name=celeste\n\
frame_count=1234\n\
rerecord_count=56\n\
framerate_num=60\n\
framerate_den=1\n";

const INPUTS: &[u8] = b"|K20:ff51|\n|K20|\n|K|\n";

fn decode(data: Vec<u8>) -> Result<ParseResult, DecodeError> {
    LtmDecoder::new().decode(&mut Cursor::new(data), &ParseOptions::default())
}

#[test]
fn test_well_formed_movie() {
    let movie = tar_gz_archive(&[("config.ini", CONFIG), ("inputs", INPUTS)]);
    let result = decode(movie).unwrap();

    assert_eq!(result.file_extension, "ltm");
    assert_eq!(result.frame_count, 1234);
    assert_eq!(result.region, Region::Ntsc);
    assert_eq!(result.rerecord_count, Some(56));
    assert_eq!(result.system, Some(System::Linux));
    assert_eq!(result.start_type, Some(StartType::PowerOn));
    assert_eq!(result.frame_rate_override, Some(60.0));
    assert!(result.warnings.is_empty(), "warnings: {:?}", result.warnings);
}

#[test]
fn test_only_frame_count() {
    let movie = tar_gz_archive(&[("config.ini", b"frame_count=1234\n")]);
    let result = decode(movie).unwrap();
    assert_eq!(result.frame_count, 1234);
    assert_eq!(result.region, Region::Ntsc);
    assert!(result.is_clean());
    assert_eq!(result.rerecord_count, None);
    assert_eq!(result.frame_rate_override, None);
}

#[test]
fn test_malformed_frame_count() {
    let movie = tar_gz_archive(&[("config.ini", b"frame_count=abc\nrerecord_count=3\n")]);
    let result = decode(movie).unwrap();
    assert_eq!(result.frame_count, 0);
    assert_eq!(result.rerecord_count, Some(3));
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].contains("frame_count"));
}

#[test]
fn test_config_without_frame_count() {
    let movie = tar_gz_archive(&[("config.ini", b"rerecord_count=3\n"), ("inputs", INPUTS)]);
    let result = decode(movie).unwrap();
    assert_eq!(result.frame_count, 0);
    assert_eq!(result.rerecord_count, Some(3));
    assert_eq!(
        result.warnings,
        vec!["config.ini has no frame_count; frame count is unknown".to_string()]
    );

    let empty = decode(tar_gz_archive(&[("config.ini", b"")])).unwrap();
    assert_eq!(empty.frame_count, 0);
    assert_eq!(empty.warnings.len(), 1);
    assert!(empty.warnings[0].contains("no frame_count"));
}

#[test]
fn test_malformed_line_keeps_prior_value() {
    let movie = tar_gz_archive(&[("config.ini", b"frame_count=10\nframe_count=oops\n")]);
    let result = decode(movie).unwrap();
    assert_eq!(result.frame_count, 10);
    assert_eq!(result.warnings.len(), 1);
}

#[test]
fn test_unrecognized_lines_are_ignored() {
    let config = b"; comment\nframe_count\nframe_count_total=9\n=5\nframe_count = 77 \n";
    let movie = tar_gz_archive(&[("config.ini", config)]);
    let result = decode(movie).unwrap();
    assert_eq!(result.frame_count, 77);
    assert!(result.is_clean());
}

#[test]
fn test_missing_config() {
    let movie = tar_gz_archive(&[("inputs", INPUTS)]);
    let result = decode(movie).unwrap();
    assert_eq!(result.frame_count, 0);
    assert_eq!(result.region, Region::Ntsc);
    assert_eq!(result.rerecord_count, None);
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].contains("config.ini"));
}

#[test]
fn test_not_an_archive() {
    let err = decode(b"frame_count=1234\n".to_vec()).unwrap_err();
    assert!(matches!(err, DecodeError::CorruptArchive(_)), "got {err:?}");
}

#[test]
fn test_empty_input() {
    let err = decode(Vec::new()).unwrap_err();
    assert!(matches!(err, DecodeError::CorruptArchive(_)), "got {err:?}");
}

#[test]
fn test_decode_is_idempotent() {
    let movie = tar_gz_archive(&[
        ("config.ini", CONFIG),
        ("inputs", INPUTS),
        ("annotations.txt", b"notes"),
    ]);
    let decoder = LtmDecoder::new();
    let options = ParseOptions::default();
    let first = decoder.decode(&mut Cursor::new(movie.clone()), &options).unwrap();
    let second = decoder.decode(&mut Cursor::new(movie), &options).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_directory_entries_are_not_dispatched() {
    // A directory that happens to share the config entry's name.
    let movie = tar_gz_archive(&[("config.ini/", b""), ("inputs", INPUTS)]);
    let result = decode(movie).unwrap();
    assert_eq!(result.frame_count, 0);
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].contains("config.ini"));
}

#[test]
fn test_unknown_entries_are_ignored() {
    let plain = decode(tar_gz_archive(&[("config.ini", CONFIG), ("inputs", INPUTS)])).unwrap();
    let noisy = decode(tar_gz_archive(&[
        ("editor.ini", b"[General]\nframe_count=1\n"),
        ("savestates/", b""),
        ("config.ini", CONFIG),
        ("future_entry.bin", &[0xFF; 600]),
        ("inputs", INPUTS),
    ]))
    .unwrap();
    assert_eq!(plain, noisy);
}

#[test]
fn test_entry_order_does_not_matter() {
    let forward = decode(tar_gz_archive(&[("config.ini", CONFIG), ("inputs", INPUTS)])).unwrap();
    let reverse = decode(tar_gz_archive(&[("inputs", INPUTS), ("config.ini", CONFIG)])).unwrap();
    assert_eq!(forward, reverse);
}

#[test]
fn test_annotations() {
    let movie = tar_gz_archive(&[
        ("config.ini", CONFIG),
        ("annotations.txt", b"\n  Any% route, v2 \n"),
    ]);
    let result = decode(movie).unwrap();
    assert_eq!(result.annotations.as_deref(), Some("Any% route, v2"));

    let blank = decode(tar_gz_archive(&[("config.ini", CONFIG), ("annotations.txt", b"  \n")]))
        .unwrap();
    assert_eq!(blank.annotations, None);
}

#[test]
fn test_frame_rate_requires_nonzero_denominator() {
    let movie = tar_gz_archive(&[(
        "config.ini",
        b"frame_count=5\nframerate_num=60\nframerate_den=0\n",
    )]);
    let result = decode(movie).unwrap();
    assert_eq!(result.frame_rate_override, None);

    let movie = tar_gz_archive(&[(
        "config.ini",
        b"frame_count=5\nframerate_num=30000\nframerate_den=1001\n",
    )]);
    let fps = decode(movie).unwrap().frame_rate_override.unwrap();
    assert!((fps - 29.97).abs() < 0.001);
}

#[test]
fn test_zip_container() {
    let movie = zip_archive(&[("config.ini", CONFIG), ("inputs", INPUTS)]);
    let result = decode(movie).unwrap();
    assert_eq!(result.frame_count, 1234);
    assert!(result.is_clean());
}

#[test]
fn test_oversized_entry() {
    let inputs = vec![b'|'; 4096];
    let movie = tar_gz_archive(&[("config.ini", CONFIG), ("inputs", &inputs)]);
    let options = ParseOptions::new().max_entry_bytes(1024);
    let err = LtmDecoder::new()
        .decode(&mut Cursor::new(movie), &options)
        .unwrap_err();
    assert!(matches!(err, DecodeError::TooLarge { .. }), "got {err:?}");
}

#[test]
fn test_metadata() {
    let decoder = LtmDecoder::new();
    assert_eq!(decoder.file_extensions(), &["ltm"]);
    assert_eq!(decoder.emulator(), "libTAS");
}
