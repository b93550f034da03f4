//! Reads `./baserom.us.z64` and extracts the full sound asset tree under
//! `./sound/`: sequences, then sample banks (as AIFF files), then a
//! predictor `.table` for every AIFF produced or already present.
//!
//! Takes no arguments; see the embedded address tables in
//! [`rom_assets`] for what gets extracted and from where.

mod rom_assets;

use std::collections::BTreeMap;
use std::path::Path;
use std::process::ExitCode;

use rom_assets::{CTL_OFFSET, CTL_SIZE, SAMPLE_MAP, SEQUENCE_MAP, TBL_OFFSET, TBL_SIZE};
use soundbank::AifcEntry;

const ROM_FILENAME: &str = "baserom.us.z64";

fn main() -> ExitCode {
    let rom = match std::fs::read(ROM_FILENAME) {
        Ok(rom) => rom,
        Err(_) => {
            eprintln!("Failed to open {ROM_FILENAME}!");
            return ExitCode::from(1);
        }
    };

    let out_root = Path::new(".");

    if let Err(err) = sequences::extract_all(&rom, SEQUENCE_MAP, out_root) {
        eprintln!("Failed to extract all m64s! {err}");
        return ExitCode::from(2);
    }

    if let Err(code) = extract_aiffs(&rom) {
        eprintln!("Failed to extract all aiffs!");
        return ExitCode::from(code);
    }

    if let Err(code) = extract_tables(out_root) {
        eprintln!("Failed to extract all tables!");
        return ExitCode::from(code);
    }

    ExitCode::from(0)
}

/// Parses the CTL/TBL sound banks and writes one AIFF file per sample,
/// in bank discovery order.
fn extract_aiffs(rom: &[u8]) -> Result<(), u8> {
    let address_to_filename: BTreeMap<u32, String> =
        SAMPLE_MAP.iter().map(|&(addr, filename)| (addr, filename.to_string())).collect();

    let banks = soundbank::extract_banks(
        rom,
        CTL_OFFSET as usize,
        CTL_SIZE as usize,
        TBL_OFFSET as usize,
        TBL_SIZE as usize,
        &address_to_filename,
    )
    .expect("sound-bank layout invariant violated on a known ROM");

    for bank in &banks {
        for entry in &bank.entries {
            write_aiff_entry(entry)?;
        }
    }

    Ok(())
}

fn write_aiff_entry(entry: &AifcEntry) -> Result<(), u8> {
    let path = Path::new(&entry.filename);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|err| {
            eprintln!("Failed to create directory for: {}: {err}", entry.filename);
            3u8
        })?;
    }

    let bytes = aiff::AiffWriter::new()
        .write_entry(&entry.data, &entry.book, &entry.loop_, &entry.tunings)
        .expect("AIFC assembly invariant violated on a known ROM");

    std::fs::write(path, &bytes).map_err(|err| {
        eprintln!("Failed to open: {}! {err}", entry.filename);
        4u8
    })?;

    Ok(())
}

/// Walks every `.aiff` file under `root` (the ROM-sourced ones this run
/// just wrote, plus any hand-added extended soundbank assets) and writes
/// its `.table` next to it.
fn extract_tables(root: &Path) -> Result<(), u8> {
    for entry in walkdir::WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
        if entry.path().extension().is_some_and(|ext| ext == "aiff") {
            write_table(entry.path())?;
        }
    }
    Ok(())
}

fn write_table(path: &Path) -> Result<(), u8> {
    let aiff_bytes = std::fs::read(path).map_err(|err| {
        eprintln!("Failed to open: {}! {err}", path.display());
        5u8
    })?;

    let table_path = path.with_extension("table");
    let mut table_file = std::fs::File::create(&table_path).map_err(|err| {
        eprintln!("Failed to open: {}! {err}", table_path.display());
        6u8
    })?;

    let entries = codebook::build_table(&aiff_bytes).map_err(|err| {
        eprintln!("Failed to write codebook! {err}");
        7u8
    })?;
    entries.write_text(&mut table_file).map_err(|err| {
        eprintln!("Failed to write codebook! {err}");
        7u8
    })?;

    Ok(())
}
