//! Combines the embedded-codebook and estimation paths in the order
//! table generation uses: prefer whatever codebook survived in the
//! AIFF's `VADPCMCODES` chunk, fall back to estimating one from the
//! decoded waveform.

use adpcm::Book;

use crate::estimate::estimate;
use crate::table::CodebookEntries;
use crate::Result;

/// Builds the `.table` entries for one finished AIFF file. Reports an
/// overflow warning to stderr when estimation quantizes any coefficient
/// out of 16-bit range (never fatal -- matches the original tool).
pub fn build_table(aiff_bytes: &[u8]) -> Result<CodebookEntries> {
    let parsed = aiff::parse_final(aiff_bytes)?;

    if let Some((order, npredictors, raw)) = parsed.codebook {
        let book = Book::from_raw(order, npredictors, &raw)?;
        return Ok(CodebookEntries::from_book(&book));
    }

    let (entries, overflows) = estimate(&parsed.pcm);
    if overflows > 0 {
        eprintln!("There was overflow - check the table");
    }
    Ok(entries)
}
