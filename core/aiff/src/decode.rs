//! The decode-then-bit-exact-re-encode pass every written AIFF file goes
//! through before it touches disk: decode the just-assembled VADPCM
//! frames for real, then search for a sample vector that re-encodes back
//! to those exact frames (see [`adpcm::reencode_frame`]), and finally
//! emit the real AIFF chunk layout (with the loop markers this step is
//! the only place that can produce, since it's the only step that knows
//! whether the decode actually converged).

use adpcm::{Book, Rng};
use binio::pstring;

use crate::error::Result;
use crate::reader::parse;

/// Runs [`crate::reader::parse`] against `aifc_bytes`, re-encodes every
/// frame bit-exactly, and returns a complete, self-contained AIFF file.
pub fn decode_and_reencode(aifc_bytes: &[u8]) -> Result<Vec<u8>> {
    let parsed = parse(aifc_bytes)?;
    let book = Book::from_raw(parsed.order, parsed.npredictors, &parsed.raw_coeffs)?;
    let order = parsed.order;

    let mut state = [0i32; 16];
    for i in 0..order {
        state[15 - i] = 0;
    }

    let mut rng = Rng::new();
    let n_samples = parsed.n_samples as usize;
    let mut output = vec![0u8; n_samples * 2];

    let mut pos = parsed.sound_pointer;
    let mut curr = 0usize;
    while curr < n_samples {
        let mut frame = [0u8; 9];
        frame.copy_from_slice(&aifc_bytes[pos..pos + 9]);
        pos += 9;

        let guess = adpcm::reencode_frame(&book, &mut rng, &frame, &mut state);
        for (i, sample) in guess.iter().enumerate() {
            let bytes = sample.to_be_bytes();
            output[(curr + i) * 2] = bytes[0];
            output[(curr + i) * 2 + 1] = bytes[1];
        }
        curr += 16;
    }

    Ok(write_final_aiff(&parsed, &book, &output))
}

fn write_chunk_header(out: &mut Vec<u8>, id: &[u8; 4], size: u32) {
    out.extend_from_slice(id);
    out.extend_from_slice(&size.to_be_bytes());
}

fn write_final_aiff(parsed: &super::reader::ParsedAifc, book: &Book, pcm: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    // The final file is a plain AIFF (no compression field survives the
    // decode), unlike the preliminary AIFC bitstream this was derived from.
    out.extend_from_slice(b"FORM\0\0\0\0AIFF");

    // CommonChunk minus its trailing 4-byte compression-type field: the
    // compression type lived only in the preliminary bitstream, not the
    // fully-decoded output.
    write_chunk_header(&mut out, b"COMM", 18);
    out.extend_from_slice(&1i16.to_be_bytes()); // numChannels
    out.extend_from_slice(&(parsed.n_samples as u32).to_be_bytes());
    out.extend_from_slice(&16i16.to_be_bytes()); // sampleSize
    out.extend_from_slice(&parsed.sample_rate_bytes);

    if parsed.loop_.is_looping() {
        let start = parsed.loop_.start;
        let end = parsed.loop_.end;
        let mark_size = 2 + 2 * 8 + 1 + 5 + 1 + 3;
        write_chunk_header(&mut out, b"MARK", mark_size as u32);
        out.extend_from_slice(&2i16.to_be_bytes());
        // Marker 1: "start"
        out.extend_from_slice(&1i16.to_be_bytes());
        out.extend_from_slice(&((start >> 16) as u16).to_be_bytes());
        out.extend_from_slice(&((start & 0xffff) as u16).to_be_bytes());
        out.push(5);
        out.extend_from_slice(b"start");
        // Marker 2: "end"
        out.extend_from_slice(&2i16.to_be_bytes());
        out.extend_from_slice(&((end >> 16) as u16).to_be_bytes());
        out.extend_from_slice(&((end & 0xffff) as u16).to_be_bytes());
        out.push(3);
        out.extend_from_slice(b"end");

        write_chunk_header(&mut out, b"INST", 20);
        out.extend_from_slice(&[0u8; 6]); // baseNote, detune, lowNote, highNote, lowVelocity, highVelocity
        out.extend_from_slice(&0i16.to_be_bytes()); // gain
        out.extend_from_slice(&1i16.to_be_bytes()); // sustainLoop.playMode
        out.extend_from_slice(&1i16.to_be_bytes()); // sustainLoop.beginLoop
        out.extend_from_slice(&2i16.to_be_bytes()); // sustainLoop.endLoop
        out.extend_from_slice(&[0u8; 6]); // releaseLoop
    }

    let raw = book.raw_values();
    let codes_body_len = 2 + 2 + 2 + raw.len() * 2;
    let appl_size = 4 + 12 + codes_body_len;
    write_chunk_header(&mut out, b"APPL", appl_size as u32);
    out.extend_from_slice(b"stoc");
    out.extend_from_slice(&pstring("VADPCMCODES"));
    out.extend_from_slice(&1i16.to_be_bytes());
    out.extend_from_slice(&(book.order as i16).to_be_bytes());
    out.extend_from_slice(&(book.npredictors as i16).to_be_bytes());
    for value in &raw {
        out.extend_from_slice(&(*value as i16).to_be_bytes());
    }

    write_chunk_header(&mut out, b"SSND", (pcm.len() + 8) as u32);
    out.extend_from_slice(&0u32.to_be_bytes());
    out.extend_from_slice(&0u32.to_be_bytes());
    out.extend_from_slice(pcm);

    let file_size = (out.len() - 8) as u32;
    out[4..8].copy_from_slice(&file_size.to_be_bytes());

    out
}
