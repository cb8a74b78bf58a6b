use crate::error::InvalidInputError;
use crate::structs::Sequence;

use anyhow::Result;

pub const UTF8_SPACE: u8 = 32;
pub const UTF8_DASH: u8 = 45;

/// Marks a byte that does not belong to the alphabet in the lookup table.
pub const NO_SYMBOL: u8 = 255;

pub const RNA_ALPHABET: [u8; 4] = [b'A', b'C', b'G', b'U'];

/// An ordered set of residue symbols plus the gap symbol used in alignments.
///
/// The position of a symbol in the set is its "digital" value, which is
/// the index used for every emission table in the model.
#[derive(Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<u8>,
    gap: u8,
    /// maps from \<UTF8 byte\> -> \<digital value\> or NO_SYMBOL
    utf8_to_digital: [u8; 256],
}

impl Alphabet {
    pub fn new(symbols: &[u8], gap: u8) -> Result<Self> {
        if symbols.is_empty() {
            return Err(InvalidInputError::InvalidAlphabet("no symbols".to_string()).into());
        }

        if symbols.len() >= NO_SYMBOL as usize {
            return Err(InvalidInputError::InvalidAlphabet(format!(
                "{} symbols is too many",
                symbols.len()
            ))
            .into());
        }

        let mut utf8_to_digital = [NO_SYMBOL; 256];

        for (digital, &symbol) in symbols.iter().enumerate() {
            if symbol == gap {
                return Err(InvalidInputError::InvalidAlphabet(format!(
                    "gap symbol '{}' is also a residue",
                    gap as char
                ))
                .into());
            }

            if utf8_to_digital[symbol as usize] != NO_SYMBOL {
                return Err(InvalidInputError::InvalidAlphabet(format!(
                    "duplicate symbol '{}'",
                    symbol as char
                ))
                .into());
            }

            utf8_to_digital[symbol as usize] = digital as u8;
        }

        Ok(Self {
            symbols: symbols.to_vec(),
            gap,
            utf8_to_digital,
        })
    }

    pub fn rna() -> Self {
        Self::from_valid(&RNA_ALPHABET, UTF8_DASH)
    }

    // only for the built in alphabets, which are known to be valid
    fn from_valid(symbols: &[u8], gap: u8) -> Self {
        let mut utf8_to_digital = [NO_SYMBOL; 256];
        symbols
            .iter()
            .enumerate()
            .for_each(|(digital, &symbol)| utf8_to_digital[symbol as usize] = digital as u8);

        Self {
            symbols: symbols.to_vec(),
            gap,
            utf8_to_digital,
        }
    }

    #[inline(always)]
    pub fn size(&self) -> usize {
        self.symbols.len()
    }

    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }

    pub fn symbol(&self, digital: usize) -> u8 {
        self.symbols[digital]
    }

    pub fn gap(&self) -> u8 {
        self.gap
    }

    #[inline(always)]
    pub fn is_gap(&self, byte: u8) -> bool {
        byte == self.gap
    }

    #[inline(always)]
    pub fn digital(&self, byte: u8) -> Option<usize> {
        match self.utf8_to_digital[byte as usize] {
            NO_SYMBOL => None,
            digital => Some(digital as usize),
        }
    }

    /// Maps the residues of a sequence to their digital values.
    ///
    /// Like the sequence itself, the result is buffered with
    /// one padding byte so that position 1 is at index 1.
    pub fn digitize(&self, sequence: &Sequence) -> Result<Vec<u8>> {
        let mut digital_bytes: Vec<u8> = Vec::with_capacity(sequence.length + 1);
        digital_bytes.push(NO_SYMBOL);

        for (idx, &utf8_byte) in sequence.residues().iter().enumerate() {
            match self.utf8_to_digital[utf8_byte as usize] {
                NO_SYMBOL => {
                    return Err(InvalidInputError::UnknownSymbol {
                        name: sequence.name.clone(),
                        position: idx + 1,
                        symbol: utf8_byte as char,
                    }
                    .into())
                }
                digital => digital_bytes.push(digital),
            }
        }

        Ok(digital_bytes)
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::rna()
    }
}

impl std::fmt::Debug for Alphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Alphabet({}, gap: '{}')",
            String::from_utf8_lossy(&self.symbols),
            self.gap as char
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};

    #[test]
    fn test_rna_alphabet() {
        let alphabet = Alphabet::default();
        check!(alphabet.size() == 4);
        check!(alphabet.digital(b'A') == Some(0));
        check!(alphabet.digital(b'U') == Some(3));
        check!(alphabet.digital(b'T') == None);
        check!(alphabet.digital(b'-') == None);
        check!(alphabet.is_gap(b'-'));
        check!(alphabet.symbol(2) == b'G');
    }

    #[test]
    fn test_custom_alphabet() -> anyhow::Result<()> {
        let alphabet = Alphabet::new(b"ACGT", b'.')?;
        check!(alphabet.symbols() == b"ACGT");
        check!(alphabet != Alphabet::rna());
        check!(alphabet.digital(b'T') == Some(3));
        check!(alphabet.is_gap(b'.'));
        check!(!alphabet.is_gap(b'-'));
        Ok(())
    }

    #[test]
    fn test_invalid_alphabets() {
        for (symbols, gap) in [
            (&b""[..], b'-'),
            (&b"ACGA"[..], b'-'),
            (&b"AC-G"[..], b'-'),
        ] {
            let_assert!(Err(err) = Alphabet::new(symbols, gap));
            let_assert!(
                Some(InvalidInputError::InvalidAlphabet(_)) =
                    err.downcast_ref::<InvalidInputError>()
            );
        }
    }

    #[test]
    fn test_digitize() -> anyhow::Result<()> {
        let alphabet = Alphabet::rna();
        let seq = Sequence::new("s1", None, b"GAUC");
        check!(alphabet.digitize(&seq)? == vec![NO_SYMBOL, 2, 0, 3, 1]);

        let bad = Sequence::new("s2", None, b"GAXC");
        let_assert!(Err(err) = alphabet.digitize(&bad));
        check!(
            err.downcast_ref::<InvalidInputError>()
                == Some(&InvalidInputError::UnknownSymbol {
                    name: "s2".to_string(),
                    position: 3,
                    symbol: 'X',
                })
        );
        Ok(())
    }
}
