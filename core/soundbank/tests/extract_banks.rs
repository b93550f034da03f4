//! Builds a minimal ROM-shaped CTL/TBL pair in-test (one bank, one
//! instrument, one non-looping sample) and exercises the full
//! `extract_banks` path end to end.

use std::collections::BTreeMap;

fn put_u32(buf: &mut Vec<u8>, at: usize, value: u32) {
    if buf.len() < at + 4 {
        buf.resize(at + 4, 0);
    }
    buf[at..at + 4].copy_from_slice(&value.to_be_bytes());
}

fn put_u16(buf: &mut Vec<u8>, at: usize, value: u16) {
    if buf.len() < at + 2 {
        buf.resize(at + 2, 0);
    }
    buf[at..at + 2].copy_from_slice(&value.to_be_bytes());
}

/// A 16-byte header + one instrument (pointing at one non-looping sample
/// through its `sound_med` slot) laid out exactly as `SampleBank::parse_ctl`
/// expects.
fn build_ctl_entry() -> Vec<u8> {
    let mut meta = vec![0u8; 156];
    // drum_base_addr = 0 (no drums)
    put_u32(&mut meta, 0, 0);
    // instrument pointer table: one instrument at offset 12
    put_u32(&mut meta, 4, 12);

    // Instrument record, 32 bytes at offset 12.
    meta[12 + 1] = 0; // range_lo (sound_lo absent)
    meta[12 + 2] = 127; // range_hi (sound_hi absent)
    put_u32(&mut meta, 12 + 4, 1); // envelope_addr, nonzero
    // sound_lo: absent
    put_u32(&mut meta, 12 + 8, 0);
    put_u32(&mut meta, 12 + 12, 0);
    // sound_med: sample record at offset 44, tuning 1.0
    put_u32(&mut meta, 12 + 16, 44);
    put_u32(&mut meta, 12 + 20, 1.0f32.to_bits());
    // sound_hi: absent
    put_u32(&mut meta, 12 + 24, 0);
    put_u32(&mut meta, 12 + 28, 0);

    // Sample record, 20 bytes at offset 44.
    put_u32(&mut meta, 44, 0); // zero field
    put_u32(&mut meta, 44 + 4, 0); // TBL-local audio offset
    put_u32(&mut meta, 44 + 8, 64); // loop record at offset 64
    put_u32(&mut meta, 44 + 12, 80); // book record at offset 80
    put_u32(&mut meta, 44 + 16, 36); // sample_size

    // Loop record, 16 bytes at offset 64: count=0 means "not looping".
    put_u32(&mut meta, 64, 0);
    put_u32(&mut meta, 68, 0);
    put_u32(&mut meta, 72, 0);
    put_u32(&mut meta, 76, 0);

    // Book record at offset 80: order=2, npredictors=2, 32 raw i16 coefficients.
    put_u32(&mut meta, 80, 2);
    put_u32(&mut meta, 84, 2);
    for i in 0..32 {
        meta[92 + i * 2..92 + i * 2 + 2].copy_from_slice(&0i16.to_be_bytes());
    }

    let mut header = vec![0u8; 16];
    put_u32(&mut header, 0, 1); // num_instrmts
    put_u32(&mut header, 4, 0); // num_drums
    put_u32(&mut header, 8, 0); // shared

    header.extend_from_slice(&meta);
    header
}

fn build_ctl_file(entry: &[u8]) -> Vec<u8> {
    let mut data = vec![0u8; 16];
    put_u16(&mut data, 0, 1); // TYPE_CTL
    put_u16(&mut data, 2, 1); // num_entries
    put_u32(&mut data, 4, 16); // offset: align(4 + 1*8, 16)
    put_u32(&mut data, 8, entry.len() as u32);
    data.truncate(16);
    data.extend_from_slice(entry);
    data
}

fn build_tbl_file() -> Vec<u8> {
    let mut data = vec![0u8; 16];
    put_u16(&mut data, 0, 2); // TYPE_TBL
    put_u16(&mut data, 2, 1); // num_entries
    put_u32(&mut data, 4, 16); // bank address
    put_u32(&mut data, 8, 36); // bank size
    data.truncate(16);
    data.extend_from_slice(&vec![0u8; 36]); // silent ADPCM frames
    data
}

#[test]
fn extracts_single_sample_from_synthetic_rom() {
    let ctl_entry = build_ctl_entry();
    let ctl_data = build_ctl_file(&ctl_entry);
    let tbl_data = build_tbl_file();

    let mut rom = vec![0u8; 4096];
    let ctl_offset = 0usize;
    rom[ctl_offset..ctl_offset + ctl_data.len()].copy_from_slice(&ctl_data);
    let tbl_offset = 1024usize;
    rom[tbl_offset..tbl_offset + tbl_data.len()].copy_from_slice(&tbl_data);

    let mut address_to_filename = BTreeMap::new();
    // ctl_entry_offset (16, per the CTL index) + sample_addr (44).
    address_to_filename.insert(60, "sound/samples/test/00_sample.aiff".to_string());

    let banks = soundbank::extract_banks(
        &rom,
        ctl_offset,
        ctl_data.len(),
        tbl_offset,
        tbl_data.len(),
        &address_to_filename,
    )
    .unwrap();

    assert_eq!(banks.len(), 1);
    assert_eq!(banks[0].entries.len(), 1);
    let entry = &banks[0].entries[0];
    assert_eq!(entry.filename, "sound/samples/test/00_sample.aiff");
    assert_eq!(entry.data.len(), 36);
    assert_eq!(entry.book.order, 2);
    assert_eq!(entry.book.npredictors, 2);
    assert!(!entry.loop_.is_looping());
    assert_eq!(entry.tunings, vec![1.0]);
}
