use std::collections::HashMap;

use board_ref::{CommentRef, PostRef, ThreadRef};
use board_types::{Comment, DefaultView, Identity, Post, Thread};
use log::{debug, trace};

use crate::comments::{make_comments_tree, CommentsTree};
use crate::filter::{apply_categories_filter, extract_categories, update_filter_state, CategoryFilter};
use crate::sequences::{
    chronological_sequence, extract_answers_sequence, timeline_sequence, NewAnswer,
    TimelineViewMode,
};
use crate::tree::{make_posts_tree, PostsTree};
use crate::ThreadError;

/// Everything the renderers consume for one thread, derived in one go from a
/// fetched payload. Snapshots are throwaway: a refetch discards the old one
/// and builds a new one, nothing is patched in place.
#[derive(Clone, Debug)]
pub struct ThreadSnapshot {
    pub thread_id: ThreadRef,
    pub default_view: DefaultView,
    pub personal_identity: Option<Identity>,
    pub posts: HashMap<PostRef, Post>,
    pub comments: HashMap<CommentRef, Comment>,
    pub posts_tree: PostsTree,
    pub post_comments_map: HashMap<PostRef, CommentsTree>,
    pub chronological_posts_sequence: Vec<PostRef>,
    pub categories: Vec<String>,
}

impl ThreadSnapshot {
    pub fn build(thread: &Thread) -> Result<Self, ThreadError> {
        debug!("Building posts tree for thread {}", thread.thread_id);
        let posts_tree = make_posts_tree(&thread.posts, &thread.thread_id)?;

        let mut post_comments_map = HashMap::new();
        let mut comments = HashMap::new();
        for post in &thread.posts {
            if let Some(post_comments) = &post.comments {
                trace!("Creating comments tree for post {}", post.post_id);
                post_comments_map.insert(post.post_id.clone(), make_comments_tree(post_comments)?);
                for comment in post_comments {
                    comments.insert(comment.comment_id.clone(), comment.clone());
                }
            }
        }

        Ok(Self {
            thread_id: thread.thread_id.clone(),
            default_view: thread.default_view,
            personal_identity: thread.personal_identity.clone(),
            chronological_posts_sequence: chronological_sequence(&thread.posts),
            categories: extract_categories(&thread.posts),
            posts: thread
                .posts
                .iter()
                .map(|post| (post.post_id.clone(), post.clone()))
                .collect(),
            comments,
            posts_tree,
            post_comments_map,
        })
    }

    pub fn thread_root(&self) -> Option<&Post> {
        self.posts_tree
            .root
            .as_ref()
            .and_then(|root| self.posts.get(root))
    }

    /// The root the page is scoped to: the targeted post when one is given,
    /// the thread root otherwise.
    pub fn current_root(&self, post_id: Option<&PostRef>) -> Option<&Post> {
        match post_id {
            Some(post_id) => self.posts.get(post_id),
            None => self.thread_root(),
        }
    }

    pub fn post(&self, post_id: &PostRef) -> Option<&Post> {
        self.posts.get(post_id)
    }

    pub fn comment(&self, comment_id: &CommentRef) -> Option<&Comment> {
        self.comments.get(comment_id)
    }

    pub fn comments_tree(&self, post_id: &PostRef) -> Option<&CommentsTree> {
        self.post_comments_map.get(post_id)
    }

    pub fn new_answers(&self) -> impl Iterator<Item = NewAnswer> + '_ {
        extract_answers_sequence(
            &self.posts_tree.display_sequence,
            &self.posts,
            &self.post_comments_map,
            &self.comments,
        )
    }

    pub fn timeline_sequence(&self, mode: TimelineViewMode) -> Vec<PostRef> {
        timeline_sequence(&self.chronological_posts_sequence, &self.posts, mode)
    }

    pub fn category_filter_state(&self, previous: &[CategoryFilter]) -> Vec<CategoryFilter> {
        update_filter_state(&self.categories, previous)
    }

    pub fn filtered(&self, state: &[CategoryFilter]) -> PostsTree {
        apply_categories_filter(&self.posts_tree, &self.posts, state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{cid, new_comment, pid, post, thread, tid};
    use crate::filter::UNCATEGORIZED_LABEL;

    fn snapshot_thread() -> Thread {
        let mut first_reply = post(2, Some(1), 1, &["art"]);
        first_reply.comments = Some(vec![new_comment(1, None), new_comment(2, Some(1))]);
        thread(vec![
            post(1, None, 0, &[]),
            first_reply,
            post(3, Some(1), 2, &["text"]),
        ])
    }

    #[test]
    fn test_build_derives_all_views() {
        let snapshot = ThreadSnapshot::build(&snapshot_thread()).unwrap();
        assert_eq!(snapshot.thread_root().unwrap().post_id, pid(1));
        assert_eq!(
            snapshot.chronological_posts_sequence,
            [pid(1), pid(2), pid(3)]
        );
        assert_eq!(snapshot.categories, ["art", "text"]);
        assert_eq!(snapshot.comments_tree(&pid(2)).unwrap().roots, [cid(1)]);
        assert!(snapshot.comments_tree(&pid(1)).is_none());
    }

    #[test]
    fn test_current_root_targets_a_post() {
        let snapshot = ThreadSnapshot::build(&snapshot_thread()).unwrap();
        assert_eq!(
            snapshot.current_root(Some(&pid(3))).unwrap().post_id,
            pid(3)
        );
        assert_eq!(snapshot.current_root(None).unwrap().post_id, pid(1));
    }

    #[test]
    fn test_new_answers_come_from_comment_trees() {
        let snapshot = ThreadSnapshot::build(&snapshot_thread()).unwrap();
        let answers: Vec<NewAnswer> = snapshot.new_answers().collect();
        assert_eq!(
            answers,
            [
                NewAnswer {
                    post_id: pid(2),
                    comment_id: Some(cid(1))
                },
                NewAnswer {
                    post_id: pid(2),
                    comment_id: Some(cid(2))
                },
            ]
        );
    }

    #[test]
    fn test_filter_state_and_filtered_tree() {
        let snapshot = ThreadSnapshot::build(&snapshot_thread()).unwrap();
        let state = snapshot.category_filter_state(&[]);
        assert_eq!(state.len(), 3);
        assert!(state.iter().all(|filter| filter.active));
        assert_eq!(state[2].name, UNCATEGORIZED_LABEL);

        let mut state = state;
        for filter in state.iter_mut() {
            filter.active = filter.name == "art";
        }
        let filtered = snapshot.filtered(&state);
        assert_eq!(filtered.children(&pid(1)), [pid(2)]);
        assert!(!filtered.parent_children_map.contains_key(&pid(3)));
    }

    #[test]
    fn test_empty_thread_builds_an_empty_snapshot() {
        let snapshot = ThreadSnapshot::build(&thread(vec![])).unwrap();
        assert!(snapshot.posts_tree.is_empty());
        assert!(snapshot.thread_root().is_none());
        assert_eq!(snapshot.new_answers().count(), 0);
        assert_eq!(snapshot.thread_id, tid(1));
    }
}
