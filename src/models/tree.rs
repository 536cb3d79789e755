use super::Entry;

/// A directory level's child: either a plain file (leaf) or a directory
/// carrying its own subtree.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Node {
    File(Entry),
    Folder(Folder),
}

impl Node {
    pub fn entry(&self) -> &Entry {
        match self {
            Node::File(entry) => entry,
            Node::Folder(folder) => &folder.entry,
        }
    }
}

/// A directory node. `children: None` means the directory was not expanded,
/// either because recursion was not requested or because reading it failed
/// (then `error` says why). `Some(vec![])` is an expanded, empty directory.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Folder {
    pub entry: Entry,
    pub error: Option<String>,
    pub children: Option<Vec<Node>>,
}

impl Folder {
    pub fn unexpanded(entry: Entry) -> Folder {
        Folder {
            entry,
            error: None,
            children: None,
        }
    }
}
