use std::fmt;

/// The correlation tag attached to every submitted operation via its `user_data`. A [Token] packs
/// the tracker slot index into the low 32 bits and a generation stamp into the high 32 bits, the
/// generation is bumped on every reservation so a recycled slot never resolves a stale completion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Token(u64);

impl Token {
    pub(crate) fn new(index: usize, generation: u32) -> Token {
        // Slot indices are bounded by the ring's completion queue size, which is far below u32.
        Token(((generation as u64) << 32) | (index as u32 as u64))
    }

    /// Reconstruct a [Token] from the `user_data` of a completion queue entry.
    pub fn from_user_data(user_data: u64) -> Token {
        Token(user_data)
    }

    /// The raw `user_data` value to attach to a submission queue entry.
    pub fn user_data(&self) -> u64 {
        self.0
    }

    /// The tracker slot this token refers to.
    pub fn index(&self) -> usize {
        (self.0 & u32::MAX as u64) as usize
    }

    /// The generation stamp this token was minted with.
    pub fn generation(&self) -> u32 {
        (self.0 >> 32) as u32
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.index(), self.generation())
    }
}
