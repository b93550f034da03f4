use thiserror::Error;

pub type Result<T> = std::result::Result<T, SequenceError>;

#[derive(Debug, Error)]
pub enum SequenceError {
    #[error("sequence range [{offset}, {end}) exceeds ROM length {rom_len}")]
    OutOfBounds { offset: usize, end: usize, rom_len: usize },

    #[error("failed to write {path}: {source}")]
    Write { path: String, source: std::io::Error },
}
