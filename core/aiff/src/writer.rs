//! Assembles the preliminary AIFF-C sections for one sample (`COMM`,
//! `INST`, the embedded codebook, `SSND`, and an optional loop chunk),
//! then runs them through [`crate::decode::decode_and_reencode`] to
//! produce the final file. The intermediate bitstream this writer builds
//! is never the output itself -- `finish` always re-derives the real
//! file from it.

use adpcm::{AdpcmLoop, Book};
use binio::{pstring, serialize_f80};

use crate::error::Result;

/// Accumulates named AIFF chunks before a final `FORM`/`AIFC` pass.
#[derive(Default)]
pub struct AiffWriter {
    sections: Vec<(String, Vec<u8>)>,
}

impl AiffWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_section(&mut self, tag: &str, data: Vec<u8>) {
        self.sections.push((tag.to_string(), data));
    }

    /// Wraps `data` as an `APPL`/`stoc`-tagged custom section named `tp`.
    pub fn add_custom_section(&mut self, tp: &str, data: Vec<u8>) {
        let mut body = Vec::with_capacity(4 + tp.len() + 2 + data.len());
        body.extend_from_slice(b"stoc");
        body.extend_from_slice(&pstring(tp));
        body.extend_from_slice(&data);
        self.add_section("APPL", body);
    }

    /// Concatenates every accumulated section into a preliminary
    /// `FORM`/`AIFC` bitstream, then fuses it through the ADPCM
    /// decode/re-encode pass to produce the real output file.
    pub fn finish(self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        out.extend_from_slice(b"FORM\0\0\0\0AIFC");

        for (tag, data) in &self.sections {
            out.extend_from_slice(tag.as_bytes());
            out.extend_from_slice(&(data.len() as u32).to_be_bytes());
            out.extend_from_slice(data);
            if data.len() % 2 != 0 {
                out.push(0);
            }
        }

        crate::decode::decode_and_reencode(&out)
    }

    /// Builds every section for one sample and fuses them into a final
    /// AIFF file: `COMM` (sample-rate bucketed from `tunings`), a
    /// placeholder `INST`, the embedded `VADPCMCODES` codebook, `SSND`
    /// with the raw compressed frames, and `VADPCMLOOPS` if the sample
    /// loops.
    pub fn write_entry(mut self, data: &[u8], book: &Book, loop_: &AdpcmLoop, tunings: &[f64]) -> Result<Vec<u8>> {
        let mut frames = data.to_vec();
        if frames.len() % 9 != 0 {
            return Err(crate::error::AiffError::UnalignedFrameBuffer(frames.len()));
        }
        if frames.len() % 2 != 0 {
            frames.push(0);
        }
        // Off-by-one on odd-length data matches vadpcm_enc's own count.
        let num_frames = (frames.len() * 16 / 9) as u32;

        let sample_rate = sample_rate_for_tunings(tunings);

        let mut comm = Vec::with_capacity(18 + 4 + 12);
        comm.extend_from_slice(&1i16.to_be_bytes());
        comm.extend_from_slice(&num_frames.to_be_bytes());
        comm.extend_from_slice(&16i16.to_be_bytes());
        comm.extend_from_slice(&serialize_f80(sample_rate));
        comm.extend_from_slice(b"VAPC");
        comm.extend_from_slice(&pstring("VADPCM ~4-1"));
        self.add_section("COMM", comm);

        self.add_section("INST", vec![0u8; 20]);

        let raw = book.raw_values();
        let mut codes = Vec::with_capacity(6 + raw.len() * 2);
        codes.extend_from_slice(&1i16.to_be_bytes());
        codes.extend_from_slice(&(book.order as i16).to_be_bytes());
        codes.extend_from_slice(&(book.npredictors as i16).to_be_bytes());
        for value in &raw {
            codes.extend_from_slice(&(*value as i16).to_be_bytes());
        }
        self.add_custom_section("VADPCMCODES", codes);

        let mut ssnd = vec![0u8; 8];
        ssnd.extend_from_slice(&frames);
        self.add_section("SSND", ssnd);

        if loop_.is_looping() {
            let mut loops = Vec::with_capacity(16 + loop_.state.len() * 2);
            loops.extend_from_slice(&1i16.to_be_bytes());
            loops.extend_from_slice(&1i16.to_be_bytes());
            loops.extend_from_slice(&loop_.start.to_be_bytes());
            loops.extend_from_slice(&loop_.end.to_be_bytes());
            loops.extend_from_slice(&loop_.count.to_be_bytes());
            for value in &loop_.state {
                loops.extend_from_slice(&value.to_be_bytes());
            }
            self.add_custom_section("VADPCMLOOPS", loops);
        }

        self.finish()
    }
}

/// Buckets a sample's instrument tunings into one of the ROM's five
/// fixed sample rates, or derives one directly when only a single
/// tuning applies to this sample.
fn sample_rate_for_tunings(tunings: &[f64]) -> f64 {
    if tunings.len() == 1 {
        return 32000.0 * tunings[0];
    }

    let min_tuning = tunings.iter().cloned().fold(f64::INFINITY, f64::min);
    let max_tuning = tunings.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    if min_tuning <= 0.5 && max_tuning >= 0.5 {
        16000.0
    } else if min_tuning <= 1.0 && max_tuning >= 1.0 {
        32000.0
    } else if min_tuning <= 1.5 && max_tuning >= 1.5 {
        48000.0
    } else if min_tuning <= 2.5 && max_tuning >= 2.5 {
        80000.0
    } else {
        16000.0 * (min_tuning + max_tuning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_tuning_scales_linearly() {
        assert_eq!(sample_rate_for_tunings(&[1.0]), 32000.0);
        assert_eq!(sample_rate_for_tunings(&[0.5]), 16000.0);
    }

    #[test]
    fn mixed_tunings_pick_bucket() {
        assert_eq!(sample_rate_for_tunings(&[0.4, 0.6]), 16000.0);
        assert_eq!(sample_rate_for_tunings(&[2.0, 3.0]), 80000.0);
    }
}
