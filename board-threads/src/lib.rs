// Derived views over a fetched thread: the post tree, per-post comment
// trees, traversal sequences, category filtering and collapse state. All of
// these are recomputed from the flat server payload on every refresh; none
// are patched incrementally.

use board_ref::{CommentRef, PostRef};
use thiserror::Error as ThisError;

pub mod collapse;
pub mod comments;
pub mod filter;
pub mod sequences;
pub mod snapshot;
pub mod tree;

pub use collapse::{CollapseManager, Stem};
pub use comments::{comment_chain, make_comments_tree, CommentsTree};
pub use filter::{
    apply_categories_filter, category_bucket, extract_categories, update_filter_state,
    CategoryFilter, UNCATEGORIZED_LABEL,
};
pub use sequences::{
    chronological_sequence, extract_answers_sequence, timeline_sequence, NewAnswer,
    TimelineViewMode,
};
pub use snapshot::ThreadSnapshot;
pub use tree::{make_posts_tree, total_contributions, total_new_contributions, PostNode, PostsTree};

#[derive(Clone, Debug, ThisError)]
pub enum ThreadError {
    #[error("Thread posts do not form a tree, repeated visit of: {0}")]
    PostCycle(PostRef),
    #[error("Thread comments do not form a tree, repeated visit of: {0}")]
    CommentCycle(CommentRef),
}
