mod intake;

pub use intake::{FileIntake, DEFAULT_ACCEPT};

use crate::upload::StagedFile;
use tracing::debug;

/// Ordered list of files waiting to be shared.
///
/// Positions are the only identity an entry has; removing one shifts every
/// later entry down by one.
#[derive(Debug, Default, Clone)]
pub struct StagingArea {
    files: Vec<StagedFile>,
}

impl StagingArea {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `files` after the existing entries, keeping their order.
    pub fn add<I>(&mut self, files: I)
    where
        I: IntoIterator<Item = StagedFile>,
    {
        let before = self.files.len();
        self.files.extend(files);
        debug!(
            added = self.files.len() - before,
            staged = self.files.len(),
            "Staged files"
        );
    }

    /// Removes the entry at `index`. Out of range indices are ignored.
    pub fn remove_at(&mut self, index: usize) -> Option<StagedFile> {
        if index >= self.files.len() {
            debug!(index, staged = self.files.len(), "Ignoring out of range removal");
            return None;
        }

        let removed = self.files.remove(index);
        debug!(index, name = removed.name(), "Unstaged file");
        Some(removed)
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }

    /// Drops one entry for each file in `submitted`, leaving anything staged
    /// after the snapshot was taken. Files already removed are skipped.
    pub fn remove_submitted(&mut self, submitted: &[StagedFile]) {
        for sent in submitted {
            if let Some(index) = self.files.iter().position(|file| file == sent) {
                self.files.remove(index);
            }
        }
        debug!(
            submitted = submitted.len(),
            staged = self.files.len(),
            "Cleared submitted files"
        );
    }

    pub fn files(&self) -> &[StagedFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn file(name: &str) -> StagedFile {
        StagedFile::new(name.to_string(), name.as_bytes().to_vec())
    }

    fn names(area: &StagingArea) -> Vec<&str> {
        area.files().iter().map(StagedFile::name).collect()
    }

    #[test]
    fn add_appends_in_order() {
        let mut area = StagingArea::new();
        area.add(vec![file("a"), file("b")]);
        area.add(vec![file("c")]);
        assert_eq!(names(&area), ["a", "b", "c"]);
    }

    #[test]
    fn duplicates_are_kept_as_separate_entries() {
        let mut area = StagingArea::new();
        area.add(vec![file("same"), file("same")]);
        assert_eq!(area.len(), 2);

        area.remove_at(0);
        assert_eq!(names(&area), ["same"]);
    }

    #[test]
    fn remove_shifts_later_entries() {
        let mut area = StagingArea::new();
        area.add(vec![file("a"), file("b"), file("c")]);

        let removed = area.remove_at(1).unwrap();
        assert_eq!(removed.name(), "b");
        assert_eq!(names(&area), ["a", "c"]);

        area.remove_at(1);
        assert_eq!(names(&area), ["a"]);
    }

    #[test]
    fn out_of_range_remove_is_a_no_op() {
        let mut area = StagingArea::new();
        area.add(vec![file("a"), file("b")]);

        assert!(area.remove_at(2).is_none());
        assert!(area.remove_at(usize::MAX).is_none());
        assert_eq!(names(&area), ["a", "b"]);

        let mut empty = StagingArea::new();
        assert!(empty.remove_at(0).is_none());
        assert!(empty.is_empty());
    }

    #[test]
    fn clear_empties_everything() {
        let mut area = StagingArea::new();
        area.add(vec![file("a"), file("b")]);
        assert_eq!(area.len(), 2);

        area.clear();
        assert!(area.is_empty());
        assert!(area.files().is_empty());
    }

    #[test]
    fn remove_submitted_keeps_later_additions() {
        let mut area = StagingArea::new();
        area.add(vec![file("a"), file("b"), file("a")]);
        let submitted = area.files()[..2].to_vec();

        area.remove_at(1);
        area.add(vec![file("c")]);
        area.remove_submitted(&submitted);

        assert_eq!(names(&area), ["a", "c"]);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(Vec<u8>),
        Remove(usize),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            proptest::collection::vec(any::<u8>(), 0..4).prop_map(Op::Add),
            (0usize..8).prop_map(Op::Remove),
        ]
    }

    proptest! {
        #[test]
        fn matches_replayed_vector(ops in proptest::collection::vec(op(), 0..40)) {
            let mut area = StagingArea::new();
            let mut model: Vec<String> = Vec::new();

            for op in ops {
                match op {
                    Op::Add(ids) => {
                        let incoming: Vec<String> = ids.iter().map(|id| format!("f{id}")).collect();
                        area.add(incoming.iter().map(|name| file(name)));
                        model.extend(incoming);
                    }
                    Op::Remove(index) => {
                        area.remove_at(index);
                        if index < model.len() {
                            model.remove(index);
                        }
                    }
                }
            }

            prop_assert_eq!(names(&area), model.iter().map(String::as_str).collect::<Vec<_>>());
        }
    }
}
