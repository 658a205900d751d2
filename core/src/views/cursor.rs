//! Selection cursor over a list whose length changes underneath it

/// Index of the selected entry in a list
///
/// The cursor never stores the list length; every operation takes the
/// current length so a shrinking list can pull the selection back in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ListCursor {
    selected: usize,
}

impl ListCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected index; may be stale until [`ListCursor::clamp`] is called
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Move up one entry, stopping at the top
    pub fn up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Move down one entry, stopping at the last of `len` entries
    pub fn down(&mut self, len: usize) {
        if self.selected + 1 < len {
            self.selected += 1;
        } else {
            self.clamp(len);
        }
    }

    /// Pull the selection back inside a list of `len` entries
    pub fn clamp(&mut self, len: usize) {
        self.selected = self.selected.min(len.saturating_sub(1));
    }
}
