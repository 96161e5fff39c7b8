/// Number of trailing bytes the checksum depends on.
pub const ROLLING_WINDOW: usize = 7;

#[allow(clippy::cast_possible_truncation)]
const WINDOW: u32 = ROLLING_WINDOW as u32;

/// Sliding-window checksum deciding where the fuzzy hash splits its input.
///
/// `x` is the plain sum of the window, `y` weights newer bytes higher and `z`
/// is a shift-XOR term over the whole history (older bytes fall off the top).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RollingChecksum {
    x: u32,
    y: u32,
    z: u32,
    counter: u64,
    window: [u32; ROLLING_WINDOW],
}

impl Default for RollingChecksum {
    fn default() -> Self {
        Self::new()
    }
}

impl RollingChecksum {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            x: 0,
            y: 0,
            z: 0,
            counter: 0,
            window: [0; ROLLING_WINDOW],
        }
    }

    #[inline]
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.x.wrapping_add(self.y).wrapping_add(self.z)
    }

    /// Pushes `byte` into the window and returns the new checksum.
    #[allow(clippy::cast_possible_truncation)]
    pub const fn advance(&mut self, byte: u8) -> u32 {
        let new = byte as u32;
        let slot = (self.counter % ROLLING_WINDOW as u64) as usize;

        self.y = self.y.wrapping_sub(self.x);
        self.y = self.y.wrapping_add(WINDOW.wrapping_mul(new));
        self.x = self.x.wrapping_add(new);
        self.x = self.x.wrapping_sub(self.window[slot]);
        self.window[slot] = new;
        self.counter += 1;
        self.z = (self.z << 5) ^ new;

        self.value()
    }

    pub fn update(&mut self, data: &[u8]) -> u32 {
        for &byte in data {
            self.advance(byte);
        }
        self.value()
    }

    pub const fn reset(&mut self) {
        *self = Self::new();
    }

    /// Bytes consumed since the last reset.
    #[inline]
    #[must_use]
    pub const fn count(&self) -> u64 {
        self.counter
    }

    #[inline]
    #[must_use]
    pub fn compute(data: &[u8]) -> u32 {
        Self::new().update(data)
    }
}
