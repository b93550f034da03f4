use thiserror::Error;

pub type Result<T> = std::result::Result<T, BankError>;

/// Every variant mirrors one of the original encoder's inline `assert`s on
/// a parsed structure -- a known-ROM contract violation, never a
/// recoverable user-facing condition.
#[derive(Debug, Error)]
pub enum BankError {
    #[error("seqfile magic mismatch: expected {expected}, found {found}")]
    WrongMagic { expected: u16, found: u16 },

    #[error("seqfile entry {index} offset {offset} does not match expected {expected}")]
    CtlOffsetMismatch { index: usize, offset: u32, expected: u32 },

    #[error("seqfile entry {index} offset {offset} exceeds expected {expected}")]
    TblOffsetTooLarge { index: usize, offset: u32, expected: u32 },

    #[error("seqfile trailing bytes after offset {offset} are not all zero")]
    TrailingBytesNotZero { offset: usize },

    #[error("ctl has {ctl_count} entries but tbl has {tbl_count}, expected matching counts")]
    CtlTblEntryCountMismatch { ctl_count: usize, tbl_count: usize },

    #[error("bank header 'shared' field must be 0 or 1, found {0}")]
    InvalidSharedFlag(u32),

    #[error("drum base address is zero but num_drums is {0}")]
    MissingDrumBase(u32),

    #[error("drum base address {0} is nonzero but num_drums is 0")]
    UnexpectedDrumBase(u32),

    #[error("drum pointer-table entry {0} is zero")]
    NullDrumPointer(usize),

    #[error("instrument address {instrmt_max} is not below the lowest drum address {drum_min}")]
    InstrumentsOverlapDrums { instrmt_max: u32, drum_min: u32 },

    #[error("duplicate pointer found in instrument or drum address list")]
    DuplicatePointer,

    #[error("drum 'loaded' byte must be 0, found {0}")]
    DrumLoadedNotZero(u8),

    #[error("drum 'pad' byte must be 0, found {0}")]
    DrumPadNotZero(u8),

    #[error("drum envelope pointer is zero")]
    MissingDrumEnvelope,

    #[error("instrument envelope pointer is zero")]
    MissingInstrumentEnvelope,

    #[error("sound sample_addr is zero but tuning {0} is not zero")]
    ZeroSampleNonzeroTuning(f64),

    #[error("instrument range_lo must be 0 when sound_lo is absent, found {0}")]
    InvalidRangeLo(u8),

    #[error("instrument range_hi must be 127 when sound_hi is absent, found {0}")]
    InvalidRangeHi(u8),

    #[error("sample record 'zero' field must be 0, found {0}")]
    SampleZeroFieldNonzero(u32),

    #[error("sample record loop address is zero")]
    MissingSampleLoop,

    #[error("sample record book address is zero")]
    MissingSampleBook,

    #[error("sample size {0} is not a multiple of 2")]
    OddSampleSize(u32),

    #[error("sample size {0} mod 9 is not 0 or 1")]
    UnalignedSampleSize(u32),

    #[error("book order {0} != 2 for ROM-extracted book")]
    UnexpectedBookOrder(i32),

    #[error("book npredictors {0} != 2 for ROM-extracted book")]
    UnexpectedBookNpredictors(i32),

    #[error("aladpcm loop padding field must be 0, found {0}")]
    LoopPaddingNonzero(u32),

    #[error("duplicate entry '{filename}' in bank disagrees with previously parsed entry")]
    DuplicateEntryMismatch { filename: String },

    #[error(transparent)]
    Adpcm(#[from] adpcm::AdpcmError),
}
