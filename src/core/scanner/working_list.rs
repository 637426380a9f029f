//! The shrinking list of files a scan walks over.

use crate::core::source::FileId;

/// Owned file list plus the two scan cursors.
///
/// `reference` is the outer cursor, `candidate` the inner one, and
/// `candidate > reference` always holds. Removing the candidate does not
/// move the cursor: the next file slides into the same slot.
#[derive(Debug, Clone)]
pub struct WorkingFileList {
    files: Vec<FileId>,
    reference: usize,
    candidate: usize,
}

impl WorkingFileList {
    pub fn new(files: Vec<FileId>) -> Self {
        Self {
            files,
            reference: 0,
            candidate: 1,
        }
    }

    /// The next `(reference, candidate)` pair, rolling the outer cursor
    /// forward when the inner one has run off the end.
    pub fn current_pair(&mut self) -> Option<(usize, usize)> {
        while self.reference < self.files.len() {
            if self.candidate < self.files.len() {
                return Some((self.reference, self.candidate));
            }
            self.reference += 1;
            self.candidate = self.reference + 1;
        }
        None
    }

    /// Step past the current candidate
    pub fn advance(&mut self) {
        self.candidate += 1;
    }

    /// Drop the current candidate; the cursor stays put
    pub fn remove_candidate(&mut self) -> FileId {
        self.files.remove(self.candidate)
    }

    /// Drop the current reference and restart the inner cursor behind it
    pub fn remove_reference(&mut self) -> FileId {
        let removed = self.files.remove(self.reference);
        self.candidate = self.reference + 1;
        removed
    }

    pub fn files(&self) -> &[FileId] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn into_files(self) -> Vec<FileId> {
        self.files
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn list(names: &[&str]) -> WorkingFileList {
        WorkingFileList::new(names.iter().map(PathBuf::from).collect())
    }

    #[test]
    fn empty_and_single_lists_have_no_pairs() {
        assert_eq!(list(&[]).current_pair(), None);
        assert_eq!(list(&["a"]).current_pair(), None);
    }

    #[test]
    fn visits_upper_triangle_in_order() {
        let mut files = list(&["a", "b", "c", "d"]);
        let mut pairs = Vec::new();
        while let Some(pair) = files.current_pair() {
            pairs.push(pair);
            files.advance();
        }

        assert_eq!(
            pairs,
            vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]
        );
    }

    #[test]
    fn removing_candidate_keeps_cursor() {
        let mut files = list(&["a", "b", "c"]);

        assert_eq!(files.current_pair(), Some((0, 1)));
        assert_eq!(files.remove_candidate(), PathBuf::from("b"));

        // "c" slid into slot 1
        assert_eq!(files.current_pair(), Some((0, 1)));
        assert_eq!(files.files()[1], PathBuf::from("c"));

        files.advance();
        assert_eq!(files.current_pair(), None);
        assert_eq!(files.into_files(), vec![PathBuf::from("a"), PathBuf::from("c")]);
    }

    #[test]
    fn removing_reference_restarts_inner_cursor() {
        let mut files = list(&["a", "b", "c"]);
        files.current_pair();
        files.advance();

        assert_eq!(files.current_pair(), Some((0, 2)));
        files.remove_reference();

        assert_eq!(files.current_pair(), Some((0, 1)));
        assert_eq!(files.files(), &[PathBuf::from("b"), PathBuf::from("c")]);
    }
}
