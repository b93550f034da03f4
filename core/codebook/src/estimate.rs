//! Drives the LPC/LBG pipeline end to end: walks a PCM sample buffer in a
//! sliding window, collects per-window LPC training vectors, then
//! split+refines a small predictor table from them.
//!
//! The parameters below are not tunable knobs; every ROM-era codebook was
//! estimated with exactly this order, bit count, frame size and
//! threshold, and a `.table` file generated with different parameters
//! would not roundtrip against the game's own decoder.

use crate::estimator::{acmat, acvect, afromk, durbin, kfroma, lubksb, lud, refine, split};
use crate::table::CodebookEntries;

const ORDER: usize = 2;
const BITS: usize = 1;
const REFINE_ITERS: usize = 2;
const FRAME_SIZE: usize = 16;
const THRESH: f64 = 10.0;

/// Estimates a 2-predictor order-2 codebook from raw PCM `samples`.
/// Returns the entries plus the total coefficient-overflow count
/// (log a warning on nonzero, per the original tool's behavior -- this
/// never fails the extraction).
pub fn estimate(samples: &[i16]) -> (CodebookEntries, usize) {
    let mut window = vec![0i16; FRAME_SIZE * 2];
    let mut data: Vec<Vec<f64>> = Vec::new();

    for chunk in samples.chunks(FRAME_SIZE) {
        if chunk.len() < FRAME_SIZE {
            break;
        }
        window[FRAME_SIZE..].copy_from_slice(chunk);

        let mut vec = vec![0.0; ORDER + 1];
        acvect(&window, FRAME_SIZE, ORDER, FRAME_SIZE, &mut vec);

        if vec[0].abs() > THRESH {
            let mut mat = vec![vec![0.0; ORDER + 1]; ORDER + 1];
            acmat(&window, FRAME_SIZE, ORDER, FRAME_SIZE, &mut mat);
            let mut indx = vec![0usize; ORDER + 1];
            let mut det = 0;
            if lud(&mut mat, ORDER, &mut indx, &mut det).is_ok() {
                lubksb(&mat, ORDER, &indx, &mut vec);
                vec[0] = 1.0;
                let mut reflection = vec![0.0; ORDER + 1];
                if kfroma(&mut vec, &mut reflection, ORDER).is_ok() {
                    for v in reflection.iter_mut().take(ORDER + 1).skip(1) {
                        if *v >= 1.0 {
                            *v = 0.9999999999;
                        }
                        if *v <= -1.0 {
                            *v = -0.9999999999;
                        }
                    }
                    let mut entry = vec![0.0; ORDER + 1];
                    entry[0] = 1.0;
                    afromk(&reflection, &mut entry, ORDER);
                    data.push(entry);
                }
            }
        }

        window.copy_within(FRAME_SIZE.., 0);
    }

    let mut mean_autocorr = vec![0.0; ORDER + 1];
    mean_autocorr[0] = 1.0;
    for entry in &data {
        let mut model = vec![0.0; ORDER + 1];
        crate::estimator::rfroma(entry, ORDER, &mut model);
        for j in 1..=ORDER {
            mean_autocorr[j] += model[j];
        }
    }
    let data_size = data.len().max(1);
    for j in 1..=ORDER {
        mean_autocorr[j] /= data_size as f64;
    }

    let mut reflection = vec![0.0; ORDER + 1];
    let mut predictors = vec![vec![0.0; ORDER + 1]; 1 << BITS];
    durbin(&mean_autocorr, ORDER, &mut reflection, &mut predictors[0]);
    for v in reflection.iter_mut().take(ORDER + 1).skip(1) {
        if *v >= 1.0 {
            *v = 0.9999999999;
        }
        if *v <= -1.0 {
            *v = -0.9999999999;
        }
    }
    let mut seeded = vec![0.0; ORDER + 1];
    afromk(&reflection, &mut seeded, ORDER);
    predictors[0] = seeded;

    for cur_bits in 0..BITS {
        let mut split_delta = vec![0.0; ORDER + 1];
        split_delta[ORDER - 1] = -1.0;
        split(&mut predictors, &split_delta, ORDER, 1 << cur_bits, 0.01);
        refine(&mut predictors, ORDER, 1 << (cur_bits + 1), &data, REFINE_ITERS);
    }

    CodebookEntries::from_estimated(&predictors, ORDER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimate_handles_silence_without_panicking() {
        let samples = vec![0i16; FRAME_SIZE * 8];
        let (entries, overflows) = estimate(&samples);
        assert_eq!(entries.order, ORDER);
        assert_eq!(entries.npredictors, 2);
        assert_eq!(overflows, 0);
    }

    #[test]
    fn estimate_handles_short_input() {
        let samples = vec![1i16, 2, 3];
        let (entries, _) = estimate(&samples);
        assert_eq!(entries.npredictors, 2);
    }
}
