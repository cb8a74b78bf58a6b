use seq_io::fasta::{Reader, Record};
use std::fmt::{Debug, Display, Formatter};
use std::path::Path;

use crate::alphabet::{Alphabet, UTF8_SPACE};
use anyhow::{Context, Result};
use rand::Rng;

/// A named biological sequence, either an aligned training
/// row (which may contain gaps) or an unaligned test sequence.
#[derive(Clone, PartialEq, Eq)]
pub struct Sequence {
    /// The name of the sequence
    pub name: String,
    /// The sequence details. If the sequence comes from a fasta, this
    /// is the information following the sequence name in the header
    pub details: Option<String>,
    /// The length of the sequence
    pub length: usize,
    /// The string data of the sequence. These are the UTF8 bytes
    /// of the residues, buffered with one byte so that position
    /// 1 of the sequence is at index 1
    pub utf8_bytes: Vec<u8>,
}

impl Sequence {
    pub fn new(name: impl Into<String>, details: Option<String>, residues: &[u8]) -> Self {
        let mut utf8_bytes: Vec<u8> = Vec::with_capacity(residues.len() + 1);
        utf8_bytes.push(255);
        utf8_bytes.extend_from_slice(residues);

        Sequence {
            name: name.into(),
            details,
            length: residues.len(),
            utf8_bytes,
        }
    }

    pub fn from_fasta<P: AsRef<Path>>(path: P) -> Result<Vec<Self>> {
        let mut seqs: Vec<Self> = vec![];

        let mut reader = Reader::from_path(&path).with_context(|| {
            format!(
                "failed to open fasta file: {}",
                path.as_ref().to_string_lossy()
            )
        })?;

        while let Some(record) = reader.next() {
            let record = record.with_context(|| "failed to read fasta record")?;
            let mut header_bytes = record.head().to_vec();
            let first_space_idx = header_bytes.iter().position(|&b| b == UTF8_SPACE);

            let error_context: fn() -> &'static str =
                || "failed to create String from fasta header bytes";

            let (name, details) = match first_space_idx {
                Some(idx) => {
                    let details_bytes = header_bytes.split_off(idx + 1);
                    header_bytes.pop();
                    (
                        String::from_utf8(header_bytes).with_context(error_context)?,
                        Some(String::from_utf8(details_bytes).with_context(error_context)?),
                    )
                }
                None => (
                    String::from_utf8(header_bytes).with_context(error_context)?,
                    None,
                ),
            };

            // We want position 1 of the sequence to be at index 1, so we'll buffer with 255
            let mut utf8_bytes: Vec<u8> = vec![255];

            for line in record.seq_lines() {
                utf8_bytes.extend(line.iter().filter(|b| !b.is_ascii_whitespace()));
            }

            seqs.push(Sequence {
                name,
                details,
                length: utf8_bytes.len() - 1,
                utf8_bytes,
            });
        }
        Ok(seqs)
    }

    /// Draws a sequence of uniformly distributed residues.
    pub fn random(alphabet: &Alphabet, length: usize, rng: &mut impl Rng) -> Self {
        let residues: Vec<u8> = (0..length)
            .map(|_| alphabet.symbol(rng.gen_range(0..alphabet.size())))
            .collect();

        Sequence::new("random", None, &residues)
    }

    /// The residues without the leading padding byte.
    pub fn residues(&self) -> &[u8] {
        &self.utf8_bytes[1..]
    }
}

impl Display for Sequence {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, ">{}", self.name)?;

        if let Some(ref details) = self.details {
            write!(f, " {details}")?
        };

        writeln!(f)?;

        // note: the utf8 bytes start with a padding byte of 255
        let mut iter = self.residues().chunks(80).peekable();

        while let Some(byte_chunk) = iter.next() {
            match std::str::from_utf8(byte_chunk) {
                Ok(seq_line) => {
                    write!(f, "{}", seq_line)?;
                    if iter.peek().is_some() {
                        // if we're not on the last
                        // line, add a linebreak
                        writeln!(f)?;
                    }
                }
                Err(_) => return Err(std::fmt::Error),
            }
        }
        Ok(())
    }
}

impl Debug for Sequence {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(self.residues()))
    }
}
