use crate::api::{BusDirection, BusRequest, BusResponse, MemoryBus, UNMAPPED_READ};
use crate::error::MemoryImageError;

use super::DEFAULT_MEMORY_WORDS;

/// Flat array of 32-bit words, every word powered on as `0xFFFF_FFFF`.
///
/// Reads outside the array return [`UNMAPPED_READ`]; writes outside it are
/// dropped. Write cycles answer with [`UNMAPPED_READ`] on the read-data lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatMemory {
    words: Box<[u32]>,
}

impl Default for FlatMemory {
    fn default() -> Self {
        Self::new(DEFAULT_MEMORY_WORDS)
    }
}

impl FlatMemory {
    /// Memory of `depth` words in the power-on state.
    #[must_use]
    pub fn new(depth: usize) -> Self {
        Self {
            words: vec![UNMAPPED_READ; depth].into_boxed_slice(),
        }
    }

    /// Memory of `depth` words with `image` `(address, word)` pairs loaded.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryImageError::AddressOutOfRange`] for the first pair that
    /// does not fit.
    pub fn with_image<I>(depth: usize, image: I) -> Result<Self, MemoryImageError>
    where
        I: IntoIterator<Item = (u32, u32)>,
    {
        let mut memory = Self::new(depth);
        for (address, word) in image {
            memory.load(address, word)?;
        }
        Ok(memory)
    }

    /// Stores `word` at `address` outside of bus timing.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryImageError::AddressOutOfRange`] past the last word.
    pub fn load(&mut self, address: u32, word: u32) -> Result<(), MemoryImageError> {
        let depth = self.depth();
        let slot = self
            .slot_mut(address)
            .ok_or(MemoryImageError::AddressOutOfRange { address, depth })?;
        *slot = word;
        Ok(())
    }

    /// Stores consecutive `words` starting at `base`.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryImageError::AddressOutOfRange`] for the first word that
    /// does not fit; earlier words stay loaded.
    pub fn load_words(&mut self, base: u32, words: &[u32]) -> Result<(), MemoryImageError> {
        let mut address = base;
        for &word in words {
            self.load(address, word)?;
            address = address.wrapping_add(1);
        }
        Ok(())
    }

    /// Word at `address`, or [`UNMAPPED_READ`] outside the array.
    #[must_use]
    pub fn read(&self, address: u32) -> u32 {
        usize::try_from(address)
            .ok()
            .and_then(|index| self.words.get(index))
            .copied()
            .unwrap_or(UNMAPPED_READ)
    }

    /// Stores `word` at `address`; returns false when the address is unmapped.
    pub fn write(&mut self, address: u32, word: u32) -> bool {
        self.slot_mut(address).map(|slot| *slot = word).is_some()
    }

    /// Number of words.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.words.len()
    }

    /// Highest mapped word address, `None` for empty memory.
    #[must_use]
    pub fn top_address(&self) -> Option<u32> {
        self.depth()
            .checked_sub(1)
            .and_then(|top| u32::try_from(top).ok())
    }

    /// Backing words.
    #[must_use]
    pub fn as_words(&self) -> &[u32] {
        &self.words
    }

    fn slot_mut(&mut self, address: u32) -> Option<&mut u32> {
        usize::try_from(address)
            .ok()
            .and_then(|index| self.words.get_mut(index))
    }
}

impl MemoryBus for FlatMemory {
    fn transfer(&mut self, request: &BusRequest) -> BusResponse {
        match request.direction {
            BusDirection::Read => BusResponse::ready(self.read(request.address)),
            BusDirection::Write => {
                self.write(request.address, request.data_out);
                BusResponse::ready(UNMAPPED_READ)
            }
        }
    }
}
