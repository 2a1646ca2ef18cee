use std::collections::HashMap;
use std::fmt;

use board_ref::{PostRef, RefError};

const COMMENT_THREAD_SUFFIX: &str = "_comment";

/// A collapsible renderer subtree. A post has two of them: the nested posts
/// below it, and its own attached comment thread, addressed as
/// `<postId>_comment` so the two can be hidden independently.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Stem {
    Post(PostRef),
    CommentThread(PostRef),
}

impl Stem {
    pub fn post_id(&self) -> &PostRef {
        match self {
            Stem::Post(post_id) | Stem::CommentThread(post_id) => post_id,
        }
    }

    pub fn level_id(&self) -> String {
        match self {
            Stem::Post(post_id) => post_id.to_string(),
            Stem::CommentThread(post_id) => format!("{}{}", post_id, COMMENT_THREAD_SUFFIX),
        }
    }

    pub fn from_level_id(level_id: &str) -> Result<Self, RefError> {
        match level_id.strip_suffix(COMMENT_THREAD_SUFFIX) {
            Some(post_id) => Ok(Stem::CommentThread(PostRef::from_string(
                post_id.to_string(),
            )?)),
            None => Ok(Stem::Post(PostRef::from_string(level_id.to_string())?)),
        }
    }
}

impl fmt::Display for Stem {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.level_id())
    }
}

/// Which stems are currently hidden, with an optional reason each. Pure UI
/// state: collapsing never touches the tree data and never cascades to
/// children. Renderers skip the children of a collapsed stem themselves.
#[derive(Clone, Debug, Default)]
pub struct CollapseManager {
    collapsed: HashMap<Stem, Option<String>>,
}

impl CollapseManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collapse(&mut self, stem: Stem) {
        self.collapsed.entry(stem).or_insert(None);
    }

    pub fn collapse_with_reason(&mut self, stem: Stem, reason: impl Into<String>) {
        self.collapsed.insert(stem, Some(reason.into()));
    }

    pub fn uncollapse(&mut self, stem: &Stem) {
        self.collapsed.remove(stem);
    }

    /// Flips the stem and returns whether it is now collapsed.
    pub fn toggle(&mut self, stem: Stem) -> bool {
        if self.collapsed.remove(&stem).is_some() {
            false
        } else {
            self.collapsed.insert(stem, None);
            true
        }
    }

    // Absent means open: stems are open by default.
    pub fn is_collapsed(&self, stem: &Stem) -> bool {
        self.collapsed.contains_key(stem)
    }

    pub fn collapse_reason(&self, stem: &Stem) -> Option<&str> {
        self.collapsed.get(stem).and_then(|reason| reason.as_deref())
    }

    pub fn collapsed_stems(&self) -> impl Iterator<Item = &Stem> {
        self.collapsed.keys()
    }

    pub fn clear(&mut self) {
        self.collapsed.clear();
    }
}
