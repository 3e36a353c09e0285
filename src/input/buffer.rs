//! Capacity-bounded password buffer.

use zeroize::{Zeroize, Zeroizing};

/// Maximum number of characters accepted by default.
pub const DEFAULT_MAX_LEN: usize = 24;

/// Ordered characters typed since the last submit or reset.
///
/// Storage is allocated once up front and never grows, so typing does not
/// allocate. Every character slot is wiped when it is removed, when the
/// buffer is cleared, and when the buffer is dropped.
pub struct PasswordBuffer {
    chars: Zeroizing<Vec<char>>,
    max_len: usize,
}

impl PasswordBuffer {
    /// Creates an empty buffer holding at most `max_len` characters.
    pub fn new(max_len: usize) -> Self {
        Self {
            chars: Zeroizing::new(Vec::with_capacity(max_len)),
            max_len,
        }
    }

    /// Appends `c`; returns false (leaving the buffer untouched) when full.
    pub fn push(&mut self, c: char) -> bool {
        if self.is_full() {
            return false;
        }
        self.chars.push(c);
        true
    }

    /// Removes the last character; returns false when already empty.
    pub fn pop(&mut self) -> bool {
        match self.chars.last_mut() {
            Some(last) => {
                last.zeroize();
                self.chars.pop();
                true
            }
            None => false,
        }
    }

    /// Wipes and empties the buffer.
    pub fn clear(&mut self) {
        self.chars.zeroize();
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.chars.len() >= self.max_len
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Copies the contents out as a string that is wiped when dropped.
    pub fn secret(&self) -> Zeroizing<String> {
        Zeroizing::new(self.chars.iter().collect())
    }
}

impl std::fmt::Debug for PasswordBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordBuffer")
            .field("len", &self.len())
            .field("max_len", &self.max_len)
            .finish()
    }
}
