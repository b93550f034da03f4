//! Exercises the writer -> decode/re-encode -> final-reader path end to
//! end against a small synthetic silent sample, rather than a checked-in
//! ROM fixture.

use adpcm::{AdpcmLoop, Book};
use aiff::AiffWriter;

fn silent_book() -> Book {
    Book::from_raw(2, 2, &[0i32; 2 * 2 * 8]).unwrap()
}

#[test]
fn silent_sample_round_trips_to_plain_aiff() {
    let book = silent_book();
    let frames = vec![0u8; 9 * 4]; // four silent frames, 64 decoded samples
    let loop_ = AdpcmLoop::none();

    let out = AiffWriter::new().write_entry(&frames, &book, &loop_, &[1.0]).unwrap();

    assert_eq!(&out[0..4], b"FORM");
    assert_eq!(&out[8..12], b"AIFF");
    assert!(out.windows(4).any(|w| w == b"SSND"));
    assert!(out.windows(11).any(|w| w == b"VADPCMCODES"));
}

#[test]
fn looping_sample_emits_markers() {
    let book = silent_book();
    let frames = vec![0u8; 9 * 4];
    let loop_ = AdpcmLoop::new(0, 63, 1, vec![0i16; 16]);

    let out = AiffWriter::new().write_entry(&frames, &book, &loop_, &[1.0]).unwrap();

    assert!(out.windows(4).any(|w| w == b"MARK"));
    assert!(out.windows(4).any(|w| w == b"INST"));
}

#[test]
fn final_reader_recovers_embedded_codebook() {
    let book = silent_book();
    let frames = vec![0u8; 9 * 4];
    let out = AiffWriter::new().write_entry(&frames, &book, &AdpcmLoop::none(), &[1.0]).unwrap();

    let parsed = aiff::parse_final(&out).unwrap();
    let (order, npredictors, raw) = parsed.codebook.expect("codebook should survive a round trip");
    assert_eq!(order, 2);
    assert_eq!(npredictors, 2);
    assert_eq!(raw, vec![0i32; 2 * 2 * 8]);
    assert_eq!(parsed.pcm.len(), 64);
    assert!(parsed.pcm.iter().all(|&s| s == 0));
}
