//! Owned document buffer with splice bookkeeping.
//!
//! Every mutation returns a [`Splice`] describing what changed. Callers that
//! hold byte offsets into the buffer (the scanner cursor, tag boundaries,
//! block starts) feed each of those offsets through [`Splice::rebase`] so
//! they keep pointing at the same content after the edit.

/// A single edit applied to a [`Buffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Splice {
    /// `[start, end)` was removed.
    Deleted {
        /// First removed byte.
        start: usize,
        /// One past the last removed byte.
        end: usize,
    },
    /// `len` bytes were inserted before offset `at`.
    Inserted {
        /// Insertion point.
        at: usize,
        /// Number of inserted bytes.
        len: usize,
    },
}

impl Splice {
    /// Map an offset taken before the edit onto the edited buffer.
    ///
    /// Offsets past a deleted region move left by its length, offsets inside
    /// it collapse onto its start, and offsets at or past an insertion point
    /// move right by the inserted length.
    pub fn rebase(&self, mark: usize) -> usize {
        match *self {
            Splice::Deleted { start, end } => {
                if mark >= end {
                    mark - (end - start)
                } else if mark > start {
                    start
                } else {
                    mark
                }
            }
            Splice::Inserted { at, len } => {
                if mark >= at {
                    mark + len
                } else {
                    mark
                }
            }
        }
    }

    /// Net change in buffer length.
    pub fn delta(&self) -> isize {
        match *self {
            Splice::Deleted { start, end } => -((end - start) as isize),
            Splice::Inserted { len, .. } => len as isize,
        }
    }
}

/// Growable text buffer that is scanned and rewritten in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Buffer {
    text: String,
}

impl Buffer {
    /// Wrap a loaded document.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Current contents.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Remove `[start, end)`.
    ///
    /// Both offsets must lie on character boundaries; the engine only ever
    /// cuts next to ASCII markup bytes.
    pub fn delete_span(&mut self, start: usize, end: usize) -> Splice {
        let end = end.min(self.text.len());
        let start = start.min(end);
        self.text.replace_range(start..end, "");
        Splice::Deleted { start, end }
    }

    /// Insert `text` so that its first byte lands at `at`.
    pub fn insert_before(&mut self, at: usize, text: &str) -> Splice {
        let at = at.min(self.text.len());
        self.text.insert_str(at, text);
        Splice::Inserted {
            at,
            len: text.len(),
        }
    }

    /// Replace the whole contents.
    pub fn replace_all(&mut self, text: String) {
        self.text = text;
    }

    /// Consume the buffer, returning its contents.
    pub fn into_string(self) -> String {
        self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delete_shifts_following_marks() {
        let mut buf = Buffer::new("<a><b>x</b></a>");
        let splice = buf.delete_span(3, 11);
        assert_eq!(buf.as_str(), "<a></a>");
        assert_eq!(splice.rebase(11), 3);
        assert_eq!(splice.rebase(14), 6);
        assert_eq!(splice.delta(), -8);
    }

    #[test]
    fn delete_collapses_marks_inside_region() {
        let splice = Splice::Deleted { start: 4, end: 10 };
        assert_eq!(splice.rebase(2), 2);
        assert_eq!(splice.rebase(4), 4);
        assert_eq!(splice.rebase(7), 4);
        assert_eq!(splice.rebase(10), 4);
    }

    #[test]
    fn insert_moves_marks_at_and_after_point() {
        let mut buf = Buffer::new("<o></o>");
        let splice = buf.insert_before(3, "\n  <d>1</d>");
        assert_eq!(buf.as_str(), "<o>\n  <d>1</d></o>");
        assert_eq!(splice.rebase(2), 2);
        assert_eq!(splice.rebase(3), 14);
        assert_eq!(splice.rebase(6), 17);
        assert_eq!(splice.delta(), 11);
    }

    #[test]
    fn every_mark_past_an_edit_moves_by_the_delta() {
        let splices = [
            Splice::Deleted { start: 5, end: 9 },
            Splice::Inserted { at: 5, len: 3 },
        ];
        for splice in splices {
            for mark in 9..40 {
                let moved = splice.rebase(mark) as isize - mark as isize;
                assert_eq!(moved, splice.delta(), "mark {mark} via {splice:?}");
            }
        }
    }

    #[test]
    fn out_of_range_edits_are_clamped() {
        let mut buf = Buffer::new("abc");
        buf.delete_span(1, 99);
        assert_eq!(buf.as_str(), "a");
        buf.insert_before(42, "z");
        assert_eq!(buf.as_str(), "az");
    }
}
