use std::collections::{HashMap, HashSet};

use board_ref::{PostRef, ThreadRef};
use board_types::Post;
use log::{debug, warn};

use crate::ThreadError;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PostNode {
    pub parent: Option<PostRef>,
    pub children: Vec<PostRef>,
}

/// The reconstructed shape of a thread: parent/child adjacency keyed by post
/// id, with children kept in document order (the order the server sent them,
/// not timestamp order), plus the pre-order walk used for display.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PostsTree {
    pub root: Option<PostRef>,
    pub parent_children_map: HashMap<PostRef, PostNode>,
    pub display_sequence: Vec<PostRef>,
}

impl PostsTree {
    pub fn node(&self, post_id: &PostRef) -> Option<&PostNode> {
        self.parent_children_map.get(post_id)
    }

    pub fn children(&self, post_id: &PostRef) -> &[PostRef] {
        self.node(post_id)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    // An empty tree is the "no data yet" state, not an error.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }
}

pub fn make_posts_tree(posts: &[Post], thread_id: &ThreadRef) -> Result<PostsTree, ThreadError> {
    if posts.is_empty() {
        debug!("No posts for thread {}, nothing to build yet", thread_id);
        return Ok(PostsTree::default());
    }

    let mut parent_children_map: HashMap<PostRef, PostNode> = HashMap::new();
    for post in posts {
        parent_children_map
            .entry(post.post_id.clone())
            .or_default()
            .parent = post.parent_post_id.clone();
        if let Some(parent_id) = &post.parent_post_id {
            parent_children_map
                .entry(parent_id.clone())
                .or_default()
                .children
                .push(post.post_id.clone());
        }
    }

    let root = posts
        .iter()
        .find(|post| post.post_id.as_str() == thread_id.as_str())
        .or_else(|| posts.iter().find(|post| post.parent_post_id.is_none()))
        .map(|post| post.post_id.clone());
    let root = match root {
        Some(root) => root,
        None => {
            warn!("Root not found for thread {}", thread_id);
            return Ok(PostsTree::default());
        }
    };

    let display_sequence = walk_display_sequence(&parent_children_map, &root)?;
    if display_sequence.len() < posts.len() {
        warn!(
            "{} posts in thread {} are not reachable from the root",
            posts.len() - display_sequence.len(),
            thread_id
        );
    }

    Ok(PostsTree {
        root: Some(root),
        parent_children_map,
        display_sequence,
    })
}

// Pre-order, children in document order. The visited set turns a malformed
// parent graph into an error instead of an endless walk.
fn walk_display_sequence(
    parent_children_map: &HashMap<PostRef, PostNode>,
    root: &PostRef,
) -> Result<Vec<PostRef>, ThreadError> {
    let mut sequence = Vec::new();
    let mut visited: HashSet<PostRef> = HashSet::new();
    let mut stack = vec![root.clone()];
    while let Some(post_id) = stack.pop() {
        if !visited.insert(post_id.clone()) {
            return Err(ThreadError::PostCycle(post_id));
        }
        if let Some(node) = parent_children_map.get(&post_id) {
            for child in node.children.iter().rev() {
                stack.push(child.clone());
            }
        }
        sequence.push(post_id);
    }
    Ok(sequence)
}

/// Every post below the given one, however deep.
pub fn total_contributions(tree: &PostsTree, post_id: &PostRef) -> u64 {
    descendants(tree, post_id).len() as u64
}

/// Every post below the given one that is marked new.
pub fn total_new_contributions(
    tree: &PostsTree,
    posts: &HashMap<PostRef, Post>,
    post_id: &PostRef,
) -> u64 {
    descendants(tree, post_id)
        .iter()
        .filter(|id| posts.get(*id).map(|post| post.is_new).unwrap_or(false))
        .count() as u64
}

fn descendants(tree: &PostsTree, post_id: &PostRef) -> Vec<PostRef> {
    let mut found = Vec::new();
    let mut visited: HashSet<PostRef> = HashSet::new();
    let mut stack: Vec<PostRef> = tree.children(post_id).to_vec();
    while let Some(child_id) = stack.pop() {
        if !visited.insert(child_id.clone()) {
            continue;
        }
        stack.extend(tree.children(&child_id).iter().cloned());
        found.push(child_id);
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{new_post, pid, post, tid};

    #[test]
    fn test_root_with_children_in_document_order() {
        let posts = vec![
            post(1, None, 0, &[]),
            post(2, Some(1), 2, &[]),
            post(3, Some(1), 1, &[]),
        ];
        let tree = make_posts_tree(&posts, &tid(1)).unwrap();
        assert_eq!(tree.root, Some(pid(1)));
        // document order, even though post 3 is older than post 2
        assert_eq!(tree.children(&pid(1)), [pid(2), pid(3)]);
        assert_eq!(tree.display_sequence, [pid(1), pid(2), pid(3)]);
    }

    #[test]
    fn test_display_sequence_is_pre_order() {
        let posts = vec![
            post(1, None, 0, &[]),
            post(2, Some(1), 1, &[]),
            post(3, Some(2), 2, &[]),
            post(4, Some(1), 3, &[]),
            post(5, Some(4), 4, &[]),
        ];
        let tree = make_posts_tree(&posts, &tid(1)).unwrap();
        assert_eq!(
            tree.display_sequence,
            [pid(1), pid(2), pid(3), pid(4), pid(5)]
        );
    }

    #[test]
    fn test_flattening_round_trips_the_input_set() {
        let posts = vec![
            post(1, None, 0, &[]),
            post(4, Some(2), 3, &[]),
            post(2, Some(1), 1, &[]),
            post(3, Some(1), 2, &[]),
            post(5, Some(3), 4, &[]),
        ];
        let tree = make_posts_tree(&posts, &tid(1)).unwrap();
        let mut flattened: Vec<String> = tree
            .display_sequence
            .iter()
            .map(String::from)
            .collect();
        let mut input: Vec<String> = posts.iter().map(|p| String::from(&p.post_id)).collect();
        flattened.sort();
        input.sort();
        assert_eq!(flattened, input);
    }

    #[test]
    fn test_empty_posts_is_no_data_not_an_error() {
        let tree = make_posts_tree(&[], &tid(1)).unwrap();
        assert!(tree.is_empty());
        assert!(tree.parent_children_map.is_empty());
        assert!(tree.display_sequence.is_empty());
    }

    #[test]
    fn test_missing_root_is_no_data_not_an_error() {
        // every post claims a parent, so there is no root to anchor on
        let posts = vec![post(2, Some(1), 0, &[]), post(3, Some(2), 1, &[])];
        let tree = make_posts_tree(&posts, &tid(1)).unwrap();
        assert!(tree.is_empty());
    }

    #[test]
    fn test_root_matched_by_thread_id() {
        let mut root = post(1, None, 0, &[]);
        root.post_id = PostRef::from_string(String::from(&tid(1))).unwrap();
        let posts = vec![root, post(2, Some(1), 1, &[])];
        let tree = make_posts_tree(&posts, &tid(1)).unwrap();
        assert_eq!(tree.root.unwrap().as_str(), tid(1).as_str());
    }

    #[test]
    fn test_duplicate_post_ids_are_malformed() {
        let posts = vec![
            post(1, None, 0, &[]),
            post(2, Some(1), 1, &[]),
            post(2, Some(1), 2, &[]),
        ];
        let result = make_posts_tree(&posts, &tid(1));
        assert!(matches!(result, Err(ThreadError::PostCycle(_))));
    }

    #[test]
    fn test_contribution_totals() {
        let posts = vec![
            post(1, None, 0, &[]),
            new_post(2, Some(1), 1),
            post(3, Some(2), 2, &[]),
            new_post(4, Some(3), 3),
            post(5, Some(1), 4, &[]),
        ];
        let tree = make_posts_tree(&posts, &tid(1)).unwrap();
        let by_id: HashMap<PostRef, Post> = posts
            .iter()
            .map(|p| (p.post_id.clone(), p.clone()))
            .collect();
        assert_eq!(total_contributions(&tree, &pid(1)), 4);
        assert_eq!(total_contributions(&tree, &pid(2)), 2);
        assert_eq!(total_contributions(&tree, &pid(5)), 0);
        assert_eq!(total_new_contributions(&tree, &by_id, &pid(1)), 2);
        assert_eq!(total_new_contributions(&tree, &by_id, &pid(2)), 1);
    }
}
