use std::collections::HashMap;

use board_ref::{CommentRef, PostRef};
use board_types::{Comment, Post};

use crate::comments::CommentsTree;

/// Posts sorted by creation time, oldest first. The sort is stable: posts
/// created in the same instant keep their document order.
pub fn chronological_sequence(posts: &[Post]) -> Vec<PostRef> {
    let mut ordered: Vec<&Post> = posts.iter().collect();
    ordered.sort_by_key(|post| post.created);
    ordered.into_iter().map(|post| post.post_id.clone()).collect()
}

/// A jump target for unread navigation: either a new post, or a new comment
/// under the post carrying it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewAnswer {
    pub post_id: PostRef,
    pub comment_id: Option<CommentRef>,
}

/// Walks the display sequence and yields a target per new post and per new
/// comment, each comment tree in its own display order. Lazy; call again to
/// restart from the top.
pub fn extract_answers_sequence<'a>(
    display_sequence: &'a [PostRef],
    posts: &'a HashMap<PostRef, Post>,
    post_comments_map: &'a HashMap<PostRef, CommentsTree>,
    comments: &'a HashMap<CommentRef, Comment>,
) -> impl Iterator<Item = NewAnswer> + 'a {
    display_sequence.iter().flat_map(move |post_id| {
        let new_post = posts
            .get(post_id)
            .filter(|post| post.is_new)
            .map(|post| NewAnswer {
                post_id: post.post_id.clone(),
                comment_id: None,
            });
        let new_comments = post_comments_map
            .get(post_id)
            .into_iter()
            .flat_map(move |tree| {
                tree.display_sequence
                    .iter()
                    .filter(move |comment_id| {
                        comments
                            .get(*comment_id)
                            .map(|comment| comment.is_new)
                            .unwrap_or(false)
                    })
                    .map(move |comment_id| NewAnswer {
                        post_id: post_id.clone(),
                        comment_id: Some(comment_id.clone()),
                    })
            });
        new_post.into_iter().chain(new_comments)
    })
}

/// The three timeline tabs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimelineViewMode {
    /// Only posts with new activity (new themselves, or new comments).
    New,
    /// Newest first.
    Latest,
    /// Oldest first.
    All,
}

pub fn timeline_sequence(
    chronological: &[PostRef],
    posts: &HashMap<PostRef, Post>,
    mode: TimelineViewMode,
) -> Vec<PostRef> {
    match mode {
        TimelineViewMode::All => chronological.to_vec(),
        TimelineViewMode::Latest => chronological.iter().rev().cloned().collect(),
        TimelineViewMode::New => chronological
            .iter()
            .filter(|post_id| {
                posts
                    .get(*post_id)
                    .map(|post| post.has_new_activity())
                    .unwrap_or(false)
            })
            .cloned()
            .collect(),
    }
}
