use std::collections::{BTreeMap, HashMap};

use binio::align;

use crate::bank::SampleBank;
use crate::error::{BankError, Result};
use crate::types::BankHeader;

const TYPE_CTL: u16 = 1;
const TYPE_TBL: u16 = 2;

fn read_u16(data: &[u8], addr: usize) -> u16 {
    u16::from_be_bytes([data[addr], data[addr + 1]])
}

fn read_u32(data: &[u8], addr: usize) -> u32 {
    u32::from_be_bytes([data[addr], data[addr + 1], data[addr + 2], data[addr + 3]])
}

/// Parses a CTL or TBL index header: `magic`, `num_entries`, then
/// `num_entries` `(offset, length)` pairs. CTL entries must sit
/// contiguously (`offset == prev`); TBL entries may re-reference any
/// earlier offset, since that's how sample banks end up shared
/// (`offset <= prev`). Bytes after the highest-reached offset must be
/// all zero.
pub fn parse_seqfile(data: &[u8], filetype: u16) -> Result<Vec<(u32, u32)>> {
    let magic = read_u16(data, 0);
    let num_entries = read_u16(data, 2);
    if magic != filetype {
        return Err(BankError::WrongMagic {
            expected: filetype,
            found: magic,
        });
    }

    let mut prev = align(4 + num_entries as usize * 8, 16);
    let mut entries = Vec::with_capacity(num_entries as usize);

    for i in 0..num_entries as usize {
        let offset = read_u32(data, 4 + i * 8);
        let length = read_u32(data, 8 + i * 8);

        if filetype == TYPE_CTL {
            if offset as usize != prev {
                return Err(BankError::CtlOffsetMismatch {
                    index: i,
                    offset,
                    expected: prev as u32,
                });
            }
        } else if offset as usize > prev {
            return Err(BankError::TblOffsetTooLarge {
                index: i,
                offset,
                expected: prev as u32,
            });
        }
        prev = prev.max((offset + length) as usize);
        entries.push((offset, length));
    }

    if data[prev..].iter().any(|&b| b != 0) {
        return Err(BankError::TrailingBytesNotZero { offset: prev });
    }

    Ok(entries)
}

/// Groups TBL entries into [`SampleBank`]s: a new bank is created the
/// first time a given `(offset, size)` span is seen, and every
/// subsequent TBL index pointing at the same offset is recorded in that
/// bank's `ctl_indices` (the TBL index and the CTL index it will later
/// be matched against are the same integer).
pub fn parse_tbl(data: &[u8], tbl_entries: &[(u32, u32)]) -> Vec<SampleBank> {
    let mut banks = Vec::new();
    let mut bank_address_to_index: HashMap<u32, u32> = HashMap::new();
    let mut bank_index = 0u32;

    for (tbl_index, &(bank_address, bank_size)) in tbl_entries.iter().enumerate() {
        let index = *bank_address_to_index.entry(bank_address).or_insert_with(|| {
            let start = bank_address as usize;
            let bank = SampleBank::new(bank_index, data[start..start + bank_size as usize].to_vec());
            banks.push(bank);
            let assigned = bank_index;
            bank_index += 1;
            assigned
        });

        if let Some(bank) = banks.iter_mut().find(|b| b.bank_index == index) {
            bank.ctl_indices.push(tbl_index);
        }
    }

    banks
}

/// Carves the CTL/TBL sections out of `rom`, parses every sample bank,
/// and resolves each one's instrument/drum/sample tree against
/// `address_to_filename`. Returns one [`crate::types::AifcEntry`] list
/// per discovered bank, in discovery order.
pub fn extract_banks(
    rom: &[u8],
    ctl_offset: usize,
    ctl_size: usize,
    tbl_offset: usize,
    tbl_size: usize,
    address_to_filename: &BTreeMap<u32, String>,
) -> Result<Vec<SampleBank>> {
    let ctl_data = &rom[ctl_offset..ctl_offset + ctl_size];
    let tbl_data = &rom[tbl_offset..tbl_offset + tbl_size];

    let tbl_entries = parse_seqfile(tbl_data, TYPE_TBL)?;
    let ctl_entries = parse_seqfile(ctl_data, TYPE_CTL)?;
    if ctl_entries.len() != tbl_entries.len() {
        return Err(BankError::CtlTblEntryCountMismatch {
            ctl_count: ctl_entries.len(),
            tbl_count: tbl_entries.len(),
        });
    }

    let mut banks = parse_tbl(tbl_data, &tbl_entries);

    for (ctl_index, &(offset, length)) in ctl_entries.iter().enumerate() {
        for bank in banks.iter_mut() {
            if !bank.ctl_indices.contains(&ctl_index) {
                continue;
            }
            let entry = &ctl_data[offset as usize..offset as usize + length as usize];
            let header = BankHeader::parse(&entry[0..16])?;
            bank.parse_ctl(&header, &entry[16..], address_to_filename, offset)?;
        }
    }

    Ok(banks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctl_header(num_entries: u16, entries: &[(u32, u32)]) -> Vec<u8> {
        let mut data = vec![0u8; 4 + entries.len() * 8];
        data[0..2].copy_from_slice(&TYPE_CTL.to_be_bytes());
        data[2..4].copy_from_slice(&num_entries.to_be_bytes());
        for (i, &(offset, length)) in entries.iter().enumerate() {
            data[4 + i * 8..8 + i * 8].copy_from_slice(&offset.to_be_bytes());
            data[8 + i * 8..12 + i * 8].copy_from_slice(&length.to_be_bytes());
        }
        data
    }

    #[test]
    fn ctl_entries_must_be_contiguous() {
        let first_offset = align(4 + 8, 16) as u32;
        let data = ctl_header(1, &[(first_offset, 16)]);
        let mut data = data;
        data.resize(first_offset as usize + 16, 0);
        let entries = parse_seqfile(&data, TYPE_CTL).unwrap();
        assert_eq!(entries, vec![(first_offset, 16)]);
    }

    #[test]
    fn ctl_rejects_non_contiguous_offset() {
        let first_offset = align(4 + 8, 16) as u32;
        let mut data = ctl_header(1, &[(first_offset + 16, 16)]);
        data.resize(first_offset as usize + 32, 0);
        assert!(parse_seqfile(&data, TYPE_CTL).is_err());
    }

    #[test]
    fn tbl_allows_reused_offset() {
        let first_offset = align(4 + 16, 16) as u32;
        let mut data = ctl_header(2, &[(first_offset, 16), (first_offset, 16)]);
        data[0..2].copy_from_slice(&TYPE_TBL.to_be_bytes());
        data.resize(first_offset as usize + 16, 0);
        let entries = parse_seqfile(&data, TYPE_TBL).unwrap();
        assert_eq!(entries, vec![(first_offset, 16), (first_offset, 16)]);
    }

    #[test]
    fn parse_tbl_groups_shared_bank() {
        let entries = vec![(0u32, 4u32), (0u32, 4u32), (4u32, 4u32)];
        let data = vec![0u8; 8];
        let banks = parse_tbl(&data, &entries);
        assert_eq!(banks.len(), 2);
        assert_eq!(banks[0].ctl_indices, vec![0, 1]);
        assert_eq!(banks[1].ctl_indices, vec![2]);
    }
}
