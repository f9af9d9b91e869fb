//! Deterministic random sources for unit tests.
use rand::RngCore;

/// Replays a fixed script of `u64` words, cycling once exhausted.
#[derive(Debug, Clone)]
pub struct ScriptedRng {
    words: Vec<u64>,
    cursor: usize,
}

impl ScriptedRng {
    pub fn new(words: Vec<u64>) -> Self {
        assert!(!words.is_empty(), "script needs at least one word");
        Self { words, cursor: 0 }
    }

    /// Script words so that `rng.gen::<f64>()` yields each unit value.
    /// Exact for values of the form `k / 2^53`.
    pub fn from_units(units: &[f64]) -> Self {
        Self::new(units.iter().map(|unit| unit_to_word(*unit)).collect())
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn unit_to_word(unit: f64) -> u64 {
    let scaled = (unit.clamp(0.0, 1.0 - f64::EPSILON) * (1_u64 << 53) as f64) as u64;
    scaled << 11
}

impl RngCore for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        let word = self.words[self.cursor % self.words.len()];
        self.cursor = self.cursor.wrapping_add(1);
        word
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
