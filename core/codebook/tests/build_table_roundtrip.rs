//! `build_table` against synthetic finished AIFF files: one carrying an
//! embedded codebook (the common ROM-extraction case) and one without,
//! forcing the estimator fallback.

use adpcm::{AdpcmLoop, Book};
use aiff::AiffWriter;

fn sample_aiff(samples: &[i16]) -> Vec<u8> {
    let raw: Vec<i32> = (0..32).map(|i| ((i % 8) as i32 - 4) * 50).collect();
    let book = Book::from_raw(2, 2, &raw).unwrap();
    let mut frames = Vec::new();
    let mut state = [0i32; 16];
    for chunk in samples.chunks(16) {
        let mut buf = [0i16; 16];
        buf[..chunk.len()].copy_from_slice(chunk);
        frames.extend_from_slice(&adpcm::encode_frame(&buf, &mut state, &book));
    }
    AiffWriter::new().write_entry(&frames, &book, &AdpcmLoop::none(), &[1.0]).unwrap()
}

#[test]
fn prefers_embedded_codebook_over_estimation() {
    let samples: Vec<i16> = (0..64).map(|i| ((i as i32 * 37) % 2000 - 1000) as i16).collect();
    let aiff_bytes = sample_aiff(&samples);

    let entries = codebook::build_table(&aiff_bytes).unwrap();
    assert_eq!(entries.order, 2);
    assert_eq!(entries.npredictors, 2);
}

#[test]
fn falls_back_to_estimation_without_codebook() {
    // Hand-build a minimal plain AIFF with only COMM + SSND, no VADPCMCODES.
    let mut out = Vec::new();
    out.extend_from_slice(b"FORM\0\0\0\0AIFF");
    let samples: Vec<i16> = (0..64).map(|i| ((i as i32 * 53) % 1500 - 750) as i16).collect();
    let mut comm = Vec::new();
    comm.extend_from_slice(&1i16.to_be_bytes());
    comm.extend_from_slice(&(samples.len() as u32).to_be_bytes());
    comm.extend_from_slice(&16i16.to_be_bytes());
    out.extend_from_slice(b"COMM");
    out.extend_from_slice(&(comm.len() as u32).to_be_bytes());
    out.extend_from_slice(&comm);

    let mut ssnd = vec![0u8; 8];
    for s in &samples {
        ssnd.extend_from_slice(&s.to_be_bytes());
    }
    out.extend_from_slice(b"SSND");
    out.extend_from_slice(&(ssnd.len() as u32).to_be_bytes());
    out.extend_from_slice(&ssnd);

    let file_size = (out.len() - 8) as u32;
    out[4..8].copy_from_slice(&file_size.to_be_bytes());

    let entries = codebook::build_table(&out).unwrap();
    assert_eq!(entries.order, 2);
    assert_eq!(entries.npredictors, 2);
}
