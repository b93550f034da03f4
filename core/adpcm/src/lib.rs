pub mod book;
pub mod codec;
pub mod error;
pub mod loop_point;

pub use book::Book;
pub use codec::{
    clamp_to_s16, decode_frame, encode_frame, inner_product, permute, qsample, reencode_frame, Rng,
};
pub use error::{AdpcmError, Result};
pub use loop_point::AdpcmLoop;
