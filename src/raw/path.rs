use smallvec::SmallVec;

use super::handle::Handle;

/// One step of a root-to-target descent.
///
/// For every step but the last, `index` is the child that was descended into.
/// For the last step it is the position of the matching entry, or the
/// insertion point if the key was not found.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct PathElement {
    pub(crate) node: Handle,
    pub(crate) index: usize,
}

/// The descent recorded by a lookup, root first.
///
/// Paths are rebuilt for every operation and invalidated by any structural
/// change other than the one they were recorded for.
pub(crate) type Path = SmallVec<[PathElement; 16]>;

/// Outcome of a lookup: where the key is, or where it would go.
#[derive(Clone, Debug)]
pub(crate) struct Lookup {
    pub(crate) path: Path,
    pub(crate) found: bool,
}

impl Lookup {
    /// The final step of the descent.
    pub(crate) fn target(&self) -> PathElement {
        match self.path.last() {
            Some(&element) => element,
            None => unreachable!("lookup always records the root"),
        }
    }
}
