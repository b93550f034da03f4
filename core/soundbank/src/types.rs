use adpcm::{AdpcmLoop, Book};

use crate::error::{BankError, Result};

fn read_u32(data: &[u8], addr: usize) -> u32 {
    u32::from_be_bytes([data[addr], data[addr + 1], data[addr + 2], data[addr + 3]])
}

fn read_i16(data: &[u8], addr: usize) -> i16 {
    i16::from_be_bytes([data[addr], data[addr + 1]])
}

/// A sample reference with a pitch-shift tuning, shared by instruments and
/// drums.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sound {
    pub sample_addr: u32,
    pub tuning: f64,
}

impl Sound {
    /// Parses an 8-byte `(sample_addr, tuning)` record.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let sample_addr = read_u32(data, 0);
        let tuning_bits = read_u32(data, 4);
        let tuning = f32::from_bits(tuning_bits) as f64;
        if sample_addr == 0 && tuning != 0.0 {
            return Err(BankError::ZeroSampleNonzeroTuning(tuning));
        }
        Ok(Sound { sample_addr, tuning })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drum {
    pub sound: Sound,
}

impl Drum {
    /// Parses a 16-byte drum record: `loaded@2`, `pad@3`, `Sound@4..12`,
    /// `envelope@12`.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let loaded = data[2];
        let pad = data[3];
        if loaded != 0 {
            return Err(BankError::DrumLoadedNotZero(loaded));
        }
        if pad != 0 {
            return Err(BankError::DrumPadNotZero(pad));
        }
        let envelope_addr = read_u32(data, 12);
        if envelope_addr == 0 {
            return Err(BankError::MissingDrumEnvelope);
        }
        let sound = Sound::parse(&data[4..12])?;
        Ok(Drum { sound })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Instrument {
    pub sound_lo: Sound,
    pub sound_med: Sound,
    pub sound_hi: Sound,
}

impl Instrument {
    /// Parses a 32-byte instrument record: `range_lo@1`, `range_hi@2`,
    /// `envelope@4`, then three 8-byte `Sound` records at `8`, `16`, `24`.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let range_lo = data[1];
        let range_hi = data[2];
        let envelope_addr = read_u32(data, 4);
        if envelope_addr == 0 {
            return Err(BankError::MissingInstrumentEnvelope);
        }
        let sound_lo = Sound::parse(&data[8..16])?;
        let sound_med = Sound::parse(&data[16..24])?;
        let sound_hi = Sound::parse(&data[24..32])?;
        if sound_lo.sample_addr == 0 && range_lo != 0 {
            return Err(BankError::InvalidRangeLo(range_lo));
        }
        if sound_hi.sample_addr == 0 && range_hi != 127 {
            return Err(BankError::InvalidRangeHi(range_hi));
        }
        Ok(Instrument {
            sound_lo,
            sound_med,
            sound_hi,
        })
    }
}

/// The 16-byte header fronting every CTL entry.
pub struct BankHeader {
    pub num_instrmts: u32,
    pub num_drums: u32,
}

impl BankHeader {
    pub fn parse(header: &[u8]) -> Result<Self> {
        let num_instrmts = read_u32(header, 0);
        let num_drums = read_u32(header, 4);
        let shared = read_u32(header, 8);
        if shared != 0 && shared != 1 {
            return Err(BankError::InvalidSharedFlag(shared));
        }
        Ok(BankHeader { num_instrmts, num_drums })
    }
}

/// A named, fully-parsed ADPCM sample ready for AIFF container writing.
#[derive(Clone)]
pub struct AifcEntry {
    pub filename: String,
    pub data: Vec<u8>,
    pub book: Book,
    pub loop_: AdpcmLoop,
    pub tunings: Vec<f64>,
}

/// Parses the `order`/`npredictors`/coefficient table at `addr` within
/// `bank_data`, per the 2-predictor, order-2 ROM codebook layout.
pub fn parse_book(addr: u32, bank_data: &[u8]) -> Result<Book> {
    let addr = addr as usize;
    let order = read_u32(bank_data, addr) as i32;
    let npredictors = read_u32(bank_data, addr + 4) as i32;
    if order != 2 {
        return Err(BankError::UnexpectedBookOrder(order));
    }
    if npredictors != 2 {
        return Err(BankError::UnexpectedBookNpredictors(npredictors));
    }

    let order = order as usize;
    let npredictors = npredictors as usize;
    let count = 8 * order * npredictors;
    let mut raw = Vec::with_capacity(count);
    for i in 0..count {
        raw.push(read_i16(bank_data, addr + 8 + i * 2) as i32);
    }

    Ok(Book::from_raw(order, npredictors, &raw)?)
}

/// Parses the loop record at `addr` within `bank_data`: `start`, `end`,
/// `count`, 4 bytes of padding (must be zero), and 16 `i16` state samples
/// iff `count != 0`.
pub fn parse_loop(addr: u32, bank_data: &[u8]) -> Result<AdpcmLoop> {
    let addr = addr as usize;
    let start = read_u32(bank_data, addr);
    let end = read_u32(bank_data, addr + 4);
    let count = read_u32(bank_data, addr + 8);
    let pad = read_u32(bank_data, addr + 12);
    if pad != 0 {
        return Err(BankError::LoopPaddingNonzero(pad));
    }
    if count == 0 {
        return Ok(AdpcmLoop::none());
    }
    let state: Vec<i16> = (0..16).map(|i| read_i16(bank_data, addr + 16 + i * 2)).collect();
    Ok(AdpcmLoop::new(start, end, count, state))
}
