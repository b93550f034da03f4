//! Parses the ROM's embedded sound-bank control (CTL) and sample table
//! (TBL) sections into [`AifcEntry`] records, one per distinct ADPCM
//! sample, ready to be handed to [`aiff::AiffWriter`].

mod bank;
mod error;
mod seqfile;
mod types;

pub use bank::SampleBank;
pub use error::{BankError, Result};
pub use seqfile::{extract_banks, parse_seqfile, parse_tbl};
pub use types::{AifcEntry, BankHeader, Drum, Instrument, Sound};
