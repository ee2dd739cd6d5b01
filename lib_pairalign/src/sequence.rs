use crate::{
    alphabet::Alphabet,
    error::{Error, Result},
};

/// A sequence stored as codes of its alphabet.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CodedSequence {
    alphabet: Alphabet,
    codes: Vec<u8>,
}

impl CodedSequence {
    pub fn from_codes(alphabet: Alphabet, codes: impl Into<Vec<u8>>) -> Result<Self> {
        let codes = codes.into();
        if let Some((position, &code)) = codes
            .iter()
            .enumerate()
            .find(|(_, code)| usize::from(**code) >= alphabet.len())
        {
            return Err(Error::CodeOutOfRange {
                code,
                position,
                size: alphabet.len(),
            });
        }

        Ok(Self { alphabet, codes })
    }

    pub fn from_symbols(alphabet: Alphabet, symbols: &[u8]) -> Result<Self> {
        let codes = alphabet.encode(symbols)?;
        Ok(Self { alphabet, codes })
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn codes(&self) -> &[u8] {
        &self.codes
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn symbol(&self, index: usize) -> u8 {
        // Codes are checked against the alphabet on construction.
        self.alphabet.symbols()[usize::from(self.codes[index])]
    }

    pub fn symbols(&self) -> Vec<u8> {
        (0..self.len()).map(|index| self.symbol(index)).collect()
    }
}

impl std::fmt::Display for CodedSequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for index in 0..self.len() {
            write!(f, "{}", char::from(self.symbol(index)))?;
        }
        Ok(())
    }
}
