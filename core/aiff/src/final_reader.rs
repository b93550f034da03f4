//! Reads a finished AIFF/AIFC file back for table generation: the
//! embedded codebook if one survived as a `VADPCMCODES` chunk, and the
//! decoded PCM samples to fall back on when it didn't. Unlike
//! [`crate::reader::parse`], this accepts either form type and never
//! looks at the compression field -- it mirrors the original tool's
//! generic codebook-extraction chunk walk, not the preliminary-bitstream
//! fusion reader.

use binio::ByteCursor;

use crate::error::{AiffError, Result};

const FORM: u32 = 0x464f_524d;
const AIFF: u32 = 0x4149_4646;
const AIFC: u32 = 0x4149_4643;
const COMM: u32 = 0x434f_4d4d;
const SSND: u32 = 0x5353_4e44;
const APPL: u32 = 0x4150_504c;
const STOC: u32 = 0x7374_6f63;

/// The pieces of a finished AIFF file `.table` generation needs.
pub struct FinalAiff {
    /// `(order, npredictors, raw coefficients)`, present only if a
    /// `VADPCMCODES` chunk survived in the file.
    pub codebook: Option<(usize, usize, Vec<i32>)>,
    /// Decoded samples from `SSND`, in file order.
    pub pcm: Vec<i16>,
}

fn read_codebook(cursor: &mut ByteCursor<'_>) -> (usize, usize, Vec<i32>) {
    let order = cursor.read_i16() as usize;
    let npredictors = cursor.read_i16() as usize;
    let mut raw = Vec::with_capacity(npredictors * order * 8);
    for _ in 0..npredictors {
        for _ in 0..order {
            for _ in 0..8 {
                raw.push(cursor.read_i16() as i32);
            }
        }
    }
    (order, npredictors, raw)
}

pub fn parse_final(data: &[u8]) -> Result<FinalAiff> {
    let mut cursor = ByteCursor::new(data);

    let form_id = cursor.read_u32();
    let form_type = cursor.read_u32();
    if form_id != FORM || (form_type != AIFF && form_type != AIFC) {
        return Err(AiffError::NotAifc);
    }

    let mut codebook = None;
    let mut pcm = Vec::new();

    loop {
        if cursor.remaining() < 8 {
            break;
        }
        let ck_id = cursor.read_u32();
        let mut ck_size = cursor.read_i32();
        ck_size += 1;
        ck_size &= !1;
        let chunk_start = cursor.position();

        match ck_id {
            x if x == COMM => {
                let num_channels = cursor.read_i16();
                let _num_frames = cursor.read_u32();
                let sample_size = cursor.read_i16();
                if num_channels != 1 {
                    return Err(AiffError::UnsupportedChannelCount(num_channels));
                }
                if sample_size != 16 {
                    return Err(AiffError::UnsupportedSampleSize(sample_size));
                }
            }
            x if x == SSND => {
                let offset = cursor.read_u32();
                let block_size = cursor.read_u32();
                if offset != 0 || block_size != 0 {
                    return Err(AiffError::NonZeroSoundDataOffset { offset, block_size });
                }
                let body_len = chunk_start + ck_size as usize - cursor.position();
                let bytes = cursor.read_vec(body_len);
                pcm = bytes.chunks_exact(2).map(|c| i16::from_be_bytes([c[0], c[1]])).collect();
            }
            x if x == APPL => {
                let tag = cursor.read_u32();
                if tag == STOC {
                    let len = cursor.read_u8();
                    if len == 11 {
                        let name = cursor.read_vec(11);
                        if &name == b"VADPCMCODES" {
                            let version = cursor.read_i16();
                            if version == 1 {
                                codebook = Some(read_codebook(&mut cursor));
                            }
                        }
                    }
                }
            }
            _ => {}
        }

        cursor.seek_to(chunk_start + ck_size as usize);
    }

    Ok(FinalAiff { codebook, pcm })
}
