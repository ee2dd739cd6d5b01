use std::fmt::Display;

use crate::error::{Error, Result};

/// An ordered set of single-byte symbols.
///
/// The code of a symbol is its position in the alphabet.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Alphabet {
    symbols: Vec<u8>,
}

impl Alphabet {
    pub fn new(symbols: impl Into<Vec<u8>>) -> Result<Self> {
        let symbols = symbols.into();

        for (index, symbol) in symbols.iter().enumerate() {
            if symbols[..index].contains(symbol) {
                return Err(Error::DuplicateSymbol {
                    symbol: char::from(*symbol),
                });
            }
        }

        Ok(Self { symbols })
    }

    /// The unambiguous nucleotide alphabet `ACGT`.
    pub fn nucleotide() -> Self {
        Self {
            symbols: b"ACGT".to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }

    pub fn encode_symbol(&self, symbol: u8) -> Option<u8> {
        self.symbols
            .iter()
            .position(|s| *s == symbol)
            .and_then(|code| u8::try_from(code).ok())
    }

    pub fn decode_symbol(&self, code: u8) -> Option<u8> {
        self.symbols.get(usize::from(code)).copied()
    }

    pub fn encode(&self, symbols: &[u8]) -> Result<Vec<u8>> {
        symbols
            .iter()
            .enumerate()
            .map(|(position, &symbol)| {
                self.encode_symbol(symbol).ok_or_else(|| Error::UnknownSymbol {
                    symbol: char::from(symbol),
                    position,
                    alphabet: self.to_string(),
                })
            })
            .collect()
    }

    /// Returns true if `other` is a prefix of this alphabet.
    ///
    /// Then every code of `other` denotes the same symbol in `self`.
    pub fn extends(&self, other: &Self) -> bool {
        self.symbols.starts_with(&other.symbols)
    }
}

impl Display for Alphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for symbol in &self.symbols {
            write!(f, "{}", char::from(*symbol))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::error::Error;

    use super::Alphabet;

    #[test]
    fn encode_and_decode() {
        let alphabet = Alphabet::nucleotide();
        assert_eq!(alphabet.encode(b"GATTACA").unwrap(), vec![2, 0, 3, 3, 0, 1, 0]);
        assert_eq!(alphabet.decode_symbol(3), Some(b'T'));
        assert_eq!(alphabet.decode_symbol(4), None);
        assert_eq!(
            alphabet.encode(b"ACNT"),
            Err(Error::UnknownSymbol {
                symbol: 'N',
                position: 2,
                alphabet: "ACGT".to_string(),
            })
        );
    }

    #[test]
    fn duplicate_symbol() {
        assert_eq!(
            Alphabet::new(b"ACGA".to_vec()),
            Err(Error::DuplicateSymbol { symbol: 'A' })
        );
    }

    #[test]
    fn extension() {
        let nucleotide = Alphabet::nucleotide();
        let extended = Alphabet::new(b"ACGTN".to_vec()).unwrap();
        assert!(extended.extends(&nucleotide));
        assert!(nucleotide.extends(&nucleotide));
        assert!(!nucleotide.extends(&extended));
        assert!(!Alphabet::new(b"TGCA".to_vec()).unwrap().extends(&nucleotide));
    }
}
