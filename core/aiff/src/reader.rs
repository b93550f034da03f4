//! Parses the preliminary AIFF-C bitstream the section writer assembles
//! (and, just as well, any real ROM-sourced `.aiff` file) down to the
//! pieces the decode/re-encode fusion needs: the codebook, the loop
//! points, and where the compressed frames start.

use adpcm::AdpcmLoop;
use binio::ByteCursor;

use crate::error::{AiffError, Result};

pub struct ParsedAifc {
    pub order: usize,
    pub npredictors: usize,
    pub raw_coeffs: Vec<i32>,
    pub n_samples: i32,
    pub sound_pointer: usize,
    pub loop_: AdpcmLoop,
    /// The raw 80-bit sample-rate bytes from the input `COMM` chunk,
    /// carried through verbatim into the final file (the fusion pass
    /// never recomputes a sample rate, only the caller that originally
    /// assembled the preliminary bitstream does).
    pub sample_rate_bytes: [u8; 10],
}

const FORM: u32 = 0x464f_524d;
const AIFC: u32 = 0x4149_4643;
const COMM: u32 = 0x434f_4d4d;
const SSND: u32 = 0x5353_4e44;
const APPL: u32 = 0x4150_504c;
const STOC: u32 = 0x7374_6f63;

/// Reads the raw `order`/`npredictors`/coefficient values out of a
/// `VADPCMCODES` chunk body, in the same traversal order
/// [`adpcm::Book::from_raw`] expects (`Book::from_raw` then performs the
/// lower-triangular extension).
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

fn read_loop_points(cursor: &mut ByteCursor<'_>) -> Result<(i16, AdpcmLoop)> {
    let nloops = cursor.read_i16();
    if nloops == 0 {
        return Ok((nloops, AdpcmLoop::none()));
    }
    let start = cursor.read_u32();
    let end = cursor.read_u32();
    let count = cursor.read_u32();
    let state: Vec<i16> = (0..16).map(|_| cursor.read_i16()).collect();
    Ok((nloops, AdpcmLoop::new(start, end, count, state)))
}

pub fn parse(data: &[u8]) -> Result<ParsedAifc> {
    let mut cursor = ByteCursor::new(data);

    let form_id = cursor.read_u32();
    let form_type = cursor.read_u32();
    if form_id != FORM || form_type != AIFC {
        return Err(AiffError::NotAifc);
    }

    let mut order = None;
    let mut npredictors = 0usize;
    let mut raw_coeffs = Vec::new();
    let mut n_samples = 0i32;
    let mut sound_pointer = 0usize;
    let mut loop_ = AdpcmLoop::none();
    let mut sample_rate_bytes = [0u8; 10];

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
                let num_frames_h = cursor.read_u16();
                let num_frames_l = cursor.read_u16();
                let sample_size = cursor.read_i16();
                sample_rate_bytes.copy_from_slice(&cursor.read_vec(10));
                let comp_h = cursor.read_u16();
                let comp_l = cursor.read_u16();
                let c_type = ((comp_h as u32) << 16) | comp_l as u32;
                if c_type != 0x5641_5043 {
                    return Err(AiffError::WrongCompressionType);
                }
                if num_channels != 1 {
                    return Err(AiffError::UnsupportedChannelCount(num_channels));
                }
                if sample_size != 16 {
                    return Err(AiffError::UnsupportedSampleSize(sample_size));
                }

                let mut samples = ((num_frames_h as i32) << 16) + num_frames_l as i32;
                if samples % 16 != 0 {
                    samples -= 1;
                }
                if samples % 16 != 0 {
                    return Err(AiffError::SampleCountNotFrameAligned(samples));
                }
                n_samples = samples;
            }
            x if x == SSND => {
                let offset = cursor.read_u32();
                let block_size = cursor.read_u32();
                if offset != 0 || block_size != 0 {
                    return Err(AiffError::NonZeroSoundDataOffset { offset, block_size });
                }
                sound_pointer = cursor.position();
            }
            x if x == APPL => {
                let tag = cursor.read_u32();
                if tag == STOC {
                    let len = cursor.read_u8();
                    if len == 11 {
                        let name = cursor.read_vec(11);
                        if &name == b"VADPCMCODES" {
                            let version = cursor.read_i16();
                            if version != 1 {
                                return Err(AiffError::UnknownCodebookVersion(version));
                            }
                            let (o, n, raw) = read_codebook(&mut cursor);
                            order = Some(o);
                            npredictors = n;
                            raw_coeffs = raw;
                        } else if &name == b"VADPCMLOOPS" {
                            let version = cursor.read_i16();
                            if version != 1 {
                                return Err(AiffError::UnknownLoopVersion(version));
                            }
                            let (nloops, parsed_loop) = read_loop_points(&mut cursor)?;
                            if nloops != 1 {
                                return Err(AiffError::UnsupportedLoopCount(nloops));
                            }
                            loop_ = parsed_loop;
                        }
                    }
                }
            }
            _ => {}
        }

        cursor.seek_to(chunk_start + ck_size as usize);
    }

    let order = order.ok_or(AiffError::MissingCodebook)?;

    Ok(ParsedAifc {
        order,
        npredictors,
        raw_coeffs,
        n_samples,
        sound_pointer,
        loop_,
        sample_rate_bytes,
    })
}
