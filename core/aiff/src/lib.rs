//! AIFF-C container assembly and fusion for VADPCM sound samples.
//!
//! [`writer::AiffWriter`] builds a preliminary bitstream from a sample's
//! compressed frames, codebook, and loop points; [`decode::decode_and_reencode`]
//! then decodes that bitstream for real and re-encodes it bit-exactly to
//! produce the file that actually gets written to disk. Splitting the two
//! passes mirrors the original tool: the writer never invents loop-point
//! bytes or codebook layout that the reader doesn't already know how to
//! parse back.

mod decode;
mod error;
mod final_reader;
mod reader;
mod writer;

pub use decode::decode_and_reencode;
pub use error::{AiffError, Result};
pub use final_reader::{parse_final, FinalAiff};
pub use reader::{parse, ParsedAifc};
pub use writer::AiffWriter;
