use thiserror::Error;

pub type Result<T> = std::result::Result<T, AiffError>;

/// Errors produced while assembling or fusing an AIFF-C container. Every
/// variant corresponds to a validation the original encoder/decoder pair
/// performs inline before it trusts a chunk's contents.
#[derive(Debug, Error)]
pub enum AiffError {
    #[error("not an AIFF-C file")]
    NotAifc,

    #[error("file is of the wrong compression type")]
    WrongCompressionType,

    #[error("file contains {0} channels, only 1 channel supported")]
    UnsupportedChannelCount(i16),

    #[error("file contains {0} bit samples, only 16 bit samples supported")]
    UnsupportedSampleSize(i16),

    #[error("number of chunks must be a multiple of 16, found {0}")]
    SampleCountNotFrameAligned(i32),

    #[error("unknown codebook chunk version {0}")]
    UnknownCodebookVersion(i16),

    #[error("unknown loop chunk version {0}")]
    UnknownLoopVersion(i16),

    #[error("only a single loop is supported, found {0}")]
    UnsupportedLoopCount(i16),

    #[error("codebook missing from bitstream")]
    MissingCodebook,

    #[error("SSND offset/blockSize must both be 0, found offset={offset}, block_size={block_size}")]
    NonZeroSoundDataOffset { offset: u32, block_size: u32 },

    #[error("ADPCM frame buffer length {0} is not a multiple of 9")]
    UnalignedFrameBuffer(usize),

    #[error(transparent)]
    Adpcm(#[from] adpcm::AdpcmError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
