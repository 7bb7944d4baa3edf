mod arena;
mod handle;
mod node;
mod path;
mod raw_mbtree_map;

pub(crate) use arena::Arena;
pub(crate) use handle::Handle;
pub(crate) use node::{Entry, Node};
pub(crate) use path::{Path, PathElement};
pub(crate) use raw_mbtree_map::RawMBTreeMap;
