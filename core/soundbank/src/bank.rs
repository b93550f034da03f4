use std::collections::{BTreeMap, BTreeSet};

use crate::error::{BankError, Result};
use crate::types::{parse_book, parse_loop, AifcEntry, BankHeader, Drum, Instrument};

/// A set of instrument/drum records and the ADPCM samples they reference,
/// discovered from a single TBL `(offset, size)` span. Several CTL entries
/// may point at the same TBL span (shared banks); `ctl_indices` records
/// every CTL entry this bank has been built from.
pub struct SampleBank {
    pub bank_index: u32,
    pub ctl_indices: Vec<usize>,
    pub entries: Vec<AifcEntry>,
    data: Vec<u8>,
}

impl SampleBank {
    pub fn new(bank_index: u32, data: Vec<u8>) -> Self {
        SampleBank {
            bank_index,
            ctl_indices: Vec::new(),
            entries: Vec::new(),
            data,
        }
    }

    /// Parses one CTL entry's instrument/drum tables against this bank's
    /// TBL data, resolving and appending every newly-seen sample.
    ///
    /// `address_to_filename` keys are `ctl_entry_offset + sample_record_addr`
    /// (see [`crate::seqfile::parse_seqfile`]); a sample whose key is absent
    /// is a duplicate reference and is silently skipped.
    pub fn parse_ctl(
        &mut self,
        header: &BankHeader,
        bank_data: &[u8],
        address_to_filename: &BTreeMap<u32, String>,
        ctl_entry_offset: u32,
    ) -> Result<()> {
        let drum_base_addr = read_u32(bank_data, 0);
        let mut drum_addrs = Vec::new();
        if header.num_drums != 0 {
            if drum_base_addr == 0 {
                return Err(BankError::MissingDrumBase(header.num_drums));
            }
            for i in 0..header.num_drums as usize {
                let drum_addr = read_u32(bank_data, drum_base_addr as usize + i * 4);
                if drum_addr == 0 {
                    return Err(BankError::NullDrumPointer(i));
                }
                drum_addrs.push(drum_addr);
            }
        } else if drum_base_addr != 0 {
            return Err(BankError::UnexpectedDrumBase(drum_base_addr));
        }

        let instrmt_base_addr = 4usize;
        let mut instrmt_addrs = Vec::new();
        for i in 0..header.num_instrmts as usize {
            let instrmt_addr = read_u32(bank_data, instrmt_base_addr + i * 4);
            if instrmt_addr != 0 {
                instrmt_addrs.push(instrmt_addr);
            }
        }

        if let (Some(&max_instrmt), Some(&min_drum)) = (instrmt_addrs.iter().max(), drum_addrs.iter().min()) {
            if max_instrmt >= min_drum {
                return Err(BankError::InstrumentsOverlapDrums {
                    instrmt_max: max_instrmt,
                    drum_min: min_drum,
                });
            }
        }

        if BTreeSet::from_iter(instrmt_addrs.iter().copied()).len() != instrmt_addrs.len()
            || BTreeSet::from_iter(drum_addrs.iter().copied()).len() != drum_addrs.len()
        {
            return Err(BankError::DuplicatePointer);
        }

        let mut instrmts = Vec::new();
        for addr in &instrmt_addrs {
            let addr = *addr as usize;
            instrmts.push(Instrument::parse(&bank_data[addr..addr + 32])?);
        }

        let mut drums = Vec::new();
        for addr in &drum_addrs {
            let addr = *addr as usize;
            drums.push(Drum::parse(&bank_data[addr..addr + 16])?);
        }

        let mut sample_addrs = BTreeSet::new();
        let mut tunings: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
        for instrmt in &instrmts {
            for sound in [instrmt.sound_lo, instrmt.sound_med, instrmt.sound_hi] {
                if sound.sample_addr != 0 {
                    sample_addrs.insert(sound.sample_addr);
                    tunings.entry(sound.sample_addr).or_default().push(sound.tuning);
                }
            }
        }
        for drum in &drums {
            sample_addrs.insert(drum.sound.sample_addr);
            tunings.entry(drum.sound.sample_addr).or_default().push(drum.sound.tuning);
        }

        for addr in sample_addrs {
            let sample_data = &bank_data[addr as usize..addr as usize + 20];
            let filename = address_to_filename.get(&(ctl_entry_offset + addr)).cloned();
            self.parse_sample(sample_data, bank_data, tunings.get(&addr).cloned().unwrap_or_default(), filename)?;
        }

        Ok(())
    }

    fn parse_sample(
        &mut self,
        sample_data: &[u8],
        bank_data: &[u8],
        tunings: Vec<f64>,
        filename: Option<String>,
    ) -> Result<()> {
        let Some(filename) = filename else {
            return Ok(());
        };

        let zero = read_u32(sample_data, 0);
        let addr = read_u32(sample_data, 4);
        let raw_loop = read_u32(sample_data, 8);
        let raw_book = read_u32(sample_data, 12);
        let mut sample_size = read_u32(sample_data, 16);

        if zero != 0 {
            return Err(BankError::SampleZeroFieldNonzero(zero));
        }
        if raw_loop == 0 {
            return Err(BankError::MissingSampleLoop);
        }
        if raw_book == 0 {
            return Err(BankError::MissingSampleBook);
        }
        if sample_size % 2 != 0 {
            return Err(BankError::OddSampleSize(sample_size));
        }
        if sample_size % 9 != 0 {
            if sample_size % 9 != 1 {
                return Err(BankError::UnalignedSampleSize(sample_size));
            }
            sample_size -= 1;
        }

        let book = parse_book(raw_book, bank_data)?;
        let loop_ = parse_loop(raw_loop, bank_data)?;

        if let Some(existing) = self.entries.iter().find(|e| e.filename == filename) {
            let matches = existing.book.raw_values() == book.raw_values()
                && existing.loop_.start == loop_.start
                && existing.loop_.end == loop_.end
                && existing.loop_.count == loop_.count
                && existing.loop_.state == loop_.state
                && existing.data.len() == sample_size as usize;
            if !matches {
                return Err(BankError::DuplicateEntryMismatch { filename });
            }
            return Ok(());
        }

        let start = addr as usize;
        let data = self.data[start..start + sample_size as usize].to_vec();
        self.entries.push(AifcEntry {
            filename,
            data,
            book,
            loop_,
            tunings,
        });

        Ok(())
    }
}

fn read_u32(data: &[u8], addr: usize) -> u32 {
    u32::from_be_bytes([data[addr], data[addr + 1], data[addr + 2], data[addr + 3]])
}
