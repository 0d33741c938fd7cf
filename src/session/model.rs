use crate::error::{Error, Result};

/// Direction for `PlaybackSession::advance`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// Playback session states.
///
/// The index always satisfies `index < len` for the store length the last
/// transition was computed against; every operation that can invalidate it
/// re-clamps or falls back to `Empty`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PlaybackSession {
    /// Nothing selected; the store is (or was) empty.
    Empty,
    Stopped(usize),
    Playing(usize),
}

impl PlaybackSession {
    /// Initial state for a store with `len` entries.
    pub fn new(len: usize) -> Self {
        if len == 0 { Self::Empty } else { Self::Stopped(0) }
    }

    pub fn current_index(&self) -> Option<usize> {
        match *self {
            Self::Empty => None,
            Self::Stopped(i) | Self::Playing(i) => Some(i),
        }
    }

    /// Intended play state; reconciled with the engine via `on_track_ended`.
    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Playing(_))
    }

    /// Select and start playing the entry at `index`.
    ///
    /// An out-of-range index is reported as an error and leaves the state
    /// unchanged.
    pub fn select(&mut self, index: usize, len: usize) -> Result<()> {
        if index >= len {
            return Err(Error::InvalidIndex { index, len });
        }
        *self = Self::Playing(index);
        Ok(())
    }

    /// Flip between `Stopped` and `Playing` without moving the cursor.
    /// No-op on `Empty`.
    pub fn toggle_play_pause(&mut self) {
        *self = match *self {
            Self::Empty => Self::Empty,
            Self::Stopped(i) => Self::Playing(i),
            Self::Playing(i) => Self::Stopped(i),
        };
    }

    /// Step the cursor one entry in `direction`, wrapping at both ends, and
    /// enter `Playing`. Returns the new index; `None` when the store is
    /// empty.
    pub fn advance(&mut self, direction: Direction, len: usize) -> Option<usize> {
        if len == 0 {
            *self = Self::Empty;
            return None;
        }

        let current = self.current_index().unwrap_or(0).min(len - 1);
        let next = match direction {
            Direction::Next => (current + 1) % len,
            Direction::Previous => (current + len - 1) % len,
        };
        *self = Self::Playing(next);
        Some(next)
    }

    /// End-of-track signal from the playback engine.
    ///
    /// Advances to the next entry only when playback was intended; a stale
    /// signal after the user stopped is ignored. Returns the index to play
    /// next, if any.
    pub fn on_track_ended(&mut self, len: usize) -> Option<usize> {
        if self.is_playing() {
            self.advance(Direction::Next, len)
        } else {
            None
        }
    }

    /// Re-clamp the cursor after the store removed the entry at
    /// `removed_index`; `new_len` is the store length after removal.
    ///
    /// Removing an entry before the cursor shifts it down; removing the
    /// current entry drops to `Stopped` on the nearest remaining neighbor.
    pub fn on_entry_removed(&mut self, removed_index: usize, new_len: usize) {
        if new_len == 0 {
            *self = Self::Empty;
            return;
        }

        let Some(index) = self.current_index() else {
            return;
        };

        if removed_index < index {
            *self = match *self {
                Self::Playing(_) => Self::Playing(index - 1),
                _ => Self::Stopped(index - 1),
            };
        } else if removed_index == index {
            // The track under the cursor is gone; whatever was playing no
            // longer exists, so stop on the clamped neighbor.
            *self = Self::Stopped(index.min(new_len - 1));
        }
    }
}
