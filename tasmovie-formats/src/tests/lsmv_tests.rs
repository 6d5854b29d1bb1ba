use super::*;
use std::io::Cursor;

use crate::fixtures::zip_archive;

const INPUT: &[u8] = b"F. ..............|............\n\
. ..............|............\n\
F. ......B.......|............\n\
F. ...........A..|............\n";

fn decode(entries: &[(&str, &[u8])]) -> ParseResult {
    LsmvDecoder::new()
        .decode(&mut Cursor::new(zip_archive(entries)), &ParseOptions::default())
        .unwrap()
}

#[test]
fn test_well_formed_movie() {
    let result = decode(&[
        ("systemid", b"lsnes-rr1-movie"),
        ("gametype", b"snes_ntsc\n"),
        ("rerecords", b"812\n"),
        ("input", INPUT),
    ]);
    assert_eq!(result.file_extension, "lsmv");
    assert_eq!(result.frame_count, 3);
    assert_eq!(result.rerecord_count, Some(812));
    assert_eq!(result.system, Some(System::Snes));
    assert_eq!(result.region, Region::Ntsc);
    assert_eq!(result.start_type, Some(StartType::PowerOn));
    assert!(result.is_clean(), "warnings: {:?}", result.warnings);
}

#[test]
fn test_game_types() {
    let cases = [
        ("snes_pal", System::Snes, Region::Pal),
        ("sgb_ntsc", System::Sgb, Region::Ntsc),
        ("sgb_pal", System::Sgb, Region::Pal),
        ("gdmg", System::GameBoy, Region::Ntsc),
        ("ggbca", System::Gbc, Region::Ntsc),
        ("bsx", System::Snes, Region::Ntsc),
    ];
    for (game_type, system, region) in cases {
        let result = decode(&[("gametype", game_type.as_bytes()), ("input", INPUT)]);
        assert_eq!(result.system, Some(system), "{game_type}");
        assert_eq!(result.region, region, "{game_type}");
    }
}

#[test]
fn test_unknown_game_type_warns() {
    let result = decode(&[("gametype", b"nes_ntsc"), ("input", INPUT)]);
    assert_eq!(result.system, None);
    assert_eq!(result.region, Region::Ntsc);
    assert_eq!(result.warnings.len(), 1);
}

#[test]
fn test_start_types() {
    let result = decode(&[
        ("gametype", b"snes_ntsc"),
        ("moviesram.srm", &[0u8; 32]),
        ("input", INPUT),
    ]);
    assert_eq!(result.start_type, Some(StartType::Sram));

    let result = decode(&[
        ("gametype", b"snes_ntsc"),
        ("moviesram.srm", &[0u8; 32]),
        ("savestate", &[1u8; 64]),
        ("input", INPUT),
    ]);
    assert_eq!(result.start_type, Some(StartType::Savestate));
}

#[test]
fn test_bad_rerecords_warns() {
    let result = decode(&[("gametype", b"snes_ntsc"), ("rerecords", b"x1"), ("input", INPUT)]);
    assert_eq!(result.rerecord_count, None);
    assert_eq!(result.warnings.len(), 1);
}

#[test]
fn test_missing_input_warns() {
    let result = decode(&[("gametype", b"snes_ntsc")]);
    assert_eq!(result.frame_count, 0);
    assert_eq!(result.warnings.len(), 1);
}
