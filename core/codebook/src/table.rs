//! `.table` text serialization, fed either by a codebook already embedded
//! in a ROM-extracted AIFC file (values are already in final integer
//! form) or by the LBG estimator (reflection-coefficient rows that still
//! need the `*2048` quantization step).

use std::io::Write;

use adpcm::Book;

/// A fully-expanded set of predictors ready to print as a `.table` file:
/// `rows[predictor][row][col]`, row in `0..8`, col in `0..order`.
pub struct CodebookEntries {
    pub order: usize,
    pub npredictors: usize,
    pub rows: Vec<Vec<Vec<i32>>>,
}

impl CodebookEntries {
    /// Reuses a codebook already recovered from an AIFC bitstream: its
    /// values are the final form a `.table` file stores, no rounding
    /// needed.
    pub fn from_book(book: &Book) -> Self {
        let rows = book
            .table
            .iter()
            .map(|entry| {
                entry
                    .iter()
                    .map(|row| row[..book.order].to_vec())
                    .collect()
            })
            .collect();
        CodebookEntries {
            order: book.order,
            npredictors: book.npredictors,
            rows,
        }
    }

    /// Derives predictor rows from LBG-estimated reflection-coefficient
    /// vectors (1-indexed, length `order + 1`, index 0 unused). Returns
    /// the entries plus the total count of coefficients that overflowed
    /// the 16-bit quantized range (a warning condition, never fatal).
    pub fn from_estimated(predictors: &[Vec<f64>], order: usize) -> (Self, usize) {
        let mut rows = Vec::with_capacity(predictors.len());
        let mut overflows = 0usize;
        for row in predictors {
            let (entry, entry_overflows) = quantize_entry(row, order);
            overflows += entry_overflows;
            rows.push(entry);
        }
        (
            CodebookEntries {
                order,
                npredictors: predictors.len(),
                rows,
            },
            overflows,
        )
    }

    /// Writes the `order`/`npredictors` header line pair followed by
    /// `order` lines of 8 width-5 integers per predictor, exactly the
    /// layout both the extraction path and the estimation path use.
    pub fn write_text<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writeln!(writer, "{}", self.order)?;
        writeln!(writer, "{}", self.npredictors)?;
        for entry in &self.rows {
            for j in 0..self.order {
                for row in entry.iter().take(8) {
                    write!(writer, "{:5} ", row[j])?;
                }
                writeln!(writer)?;
            }
        }
        Ok(())
    }
}

/// Expands a single LBG-estimated reflection row into the `8 x order`
/// lower-triangular-extended integer table `write_tabledesign_codebook_entry`
/// produces, quantizing by `*2048` and rounding half-away-from-zero.
fn quantize_entry(row: &[f64], order: usize) -> (Vec<Vec<i32>>, usize) {
    let mut table = vec![vec![0.0f64; order]; 8];

    for i in 0..order {
        for j in i..order {
            table[i][j] = -row[order - j + i];
        }
    }

    for i in 1..8 {
        for j in 1..=order {
            if i >= j {
                for k in 0..order {
                    let prev = table[i - j][k];
                    table[i][k] -= row[j] * prev;
                }
            }
        }
    }

    let mut overflows = 0usize;
    let mut out = vec![vec![0i32; order]; 8];
    for i in 0..order {
        for j in 0..8 {
            let fval = table[j][i] * 2048.0;
            let ival = if fval < 0.0 {
                let v = (fval - 0.5) as i32;
                if v < -0x8000 {
                    overflows += 1;
                }
                v
            } else {
                let v = (fval + 0.5) as i32;
                if v >= 0x8000 {
                    overflows += 1;
                }
                v
            };
            out[j][i] = ival;
        }
    }

    (out, overflows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_book_truncates_extension_columns() {
        let raw = vec![10i32, 20, 30, 40, 50, 60, 70, 80];
        let book = Book::from_raw(1, 1, &raw).unwrap();
        let entries = CodebookEntries::from_book(&book);
        assert_eq!(entries.rows[0].len(), 8);
        assert_eq!(entries.rows[0][0].len(), 1);
    }

    #[test]
    fn quantize_entry_scales_by_2048() {
        let row = vec![1.0, 0.0];
        let (table, overflows) = quantize_entry(&row, 1);
        assert_eq!(overflows, 0);
        assert_eq!(table.len(), 8);
    }

    #[test]
    fn write_text_emits_header_lines() {
        let entries = CodebookEntries {
            order: 1,
            npredictors: 1,
            rows: vec![vec![vec![0]; 8]],
        };
        let mut buf = Vec::new();
        entries.write_text(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("1\n1\n"));
    }
}
