use std::collections::{HashMap, HashSet};

use board_ref::CommentRef;
use board_types::Comment;
use log::warn;

use crate::ThreadError;

/// The comment subtree attached to a single post. `roots` are the comments
/// replying directly to the post, in document order. `parent_chain_map`
/// links a comment to the one it chains from: the entry exists exactly when
/// the comment is the sole child of its parent, which is what lets a
/// vertical run of single replies render as one compact unit.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CommentsTree {
    pub roots: Vec<CommentRef>,
    pub parent_chain_map: HashMap<CommentRef, CommentRef>,
    pub parent_children_map: HashMap<CommentRef, Vec<CommentRef>>,
    pub display_sequence: Vec<CommentRef>,
}

impl CommentsTree {
    pub fn children(&self, comment_id: &CommentRef) -> &[CommentRef] {
        self.parent_children_map
            .get(comment_id)
            .map(|children| children.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_chained(&self, comment_id: &CommentRef) -> bool {
        self.parent_chain_map.contains_key(comment_id)
    }
}

pub fn make_comments_tree(comments: &[Comment]) -> Result<CommentsTree, ThreadError> {
    let mut roots = Vec::new();
    let mut parent_children_map: HashMap<CommentRef, Vec<CommentRef>> = HashMap::new();
    for comment in comments {
        match comment.parent_id() {
            None => roots.push(comment.comment_id.clone()),
            Some(parent_id) => parent_children_map
                .entry(parent_id.clone())
                .or_default()
                .push(comment.comment_id.clone()),
        }
    }

    let known_ids: HashSet<&CommentRef> = comments.iter().map(|c| &c.comment_id).collect();
    let mut parent_chain_map: HashMap<CommentRef, CommentRef> = HashMap::new();
    for comment in comments {
        if let Some(parent_id) = comment.parent_id() {
            let sole_child = parent_children_map
                .get(parent_id)
                .map(|siblings| siblings.len() == 1)
                .unwrap_or(false);
            if sole_child && known_ids.contains(parent_id) {
                parent_chain_map.insert(comment.comment_id.clone(), parent_id.clone());
            }
        }
    }

    let display_sequence = walk_display_sequence(&roots, &parent_children_map)?;
    if display_sequence.len() < comments.len() {
        warn!(
            "{} comments are not reachable from any root",
            comments.len() - display_sequence.len()
        );
    }

    Ok(CommentsTree {
        roots,
        parent_chain_map,
        parent_children_map,
        display_sequence,
    })
}

fn walk_display_sequence(
    roots: &[CommentRef],
    parent_children_map: &HashMap<CommentRef, Vec<CommentRef>>,
) -> Result<Vec<CommentRef>, ThreadError> {
    let mut sequence = Vec::new();
    let mut visited: HashSet<CommentRef> = HashSet::new();
    let mut stack: Vec<CommentRef> = roots.iter().rev().cloned().collect();
    while let Some(comment_id) = stack.pop() {
        if !visited.insert(comment_id.clone()) {
            return Err(ThreadError::CommentCycle(comment_id));
        }
        if let Some(children) = parent_children_map.get(&comment_id) {
            for child in children.iter().rev() {
                stack.push(child.clone());
            }
        }
        sequence.push(comment_id);
    }
    Ok(sequence)
}

/// The compact run starting at `head`: the head itself plus every comment
/// chained below it. Stops where a comment has siblings (the chain is
/// broken) or no reply at all.
pub fn comment_chain(tree: &CommentsTree, head: &CommentRef) -> Vec<CommentRef> {
    let mut chain = vec![head.clone()];
    let mut seen: HashSet<CommentRef> = HashSet::new();
    seen.insert(head.clone());
    let mut current = head.clone();
    loop {
        let next = match tree.children(&current) {
            [only] => only.clone(),
            _ => break,
        };
        if !tree.is_chained(&next) || !seen.insert(next.clone()) {
            break;
        }
        chain.push(next.clone());
        current = next;
    }
    chain
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{cid, comment};

    #[test]
    fn test_sole_child_is_chained() {
        let comments = vec![comment(1, None), comment(2, Some(1))];
        let tree = make_comments_tree(&comments).unwrap();
        assert_eq!(tree.roots, [cid(1)]);
        assert_eq!(tree.parent_chain_map.get(&cid(2)), Some(&cid(1)));
        assert_eq!(comment_chain(&tree, &cid(1)), [cid(1), cid(2)]);
    }

    #[test]
    fn test_second_sibling_breaks_the_chain() {
        let comments = vec![comment(1, None), comment(2, Some(1)), comment(3, Some(1))];
        let tree = make_comments_tree(&comments).unwrap();
        assert!(tree.parent_chain_map.get(&cid(2)).is_none());
        assert!(tree.parent_chain_map.get(&cid(3)).is_none());
        assert_eq!(comment_chain(&tree, &cid(1)), [cid(1)]);
    }

    #[test]
    fn test_chain_runs_through_several_sole_children() {
        let comments = vec![
            comment(1, None),
            comment(2, Some(1)),
            comment(3, Some(2)),
            comment(4, Some(3)),
            comment(5, Some(4)),
            comment(6, Some(4)),
        ];
        let tree = make_comments_tree(&comments).unwrap();
        // the run stops at comment 4, which has two replies
        assert_eq!(
            comment_chain(&tree, &cid(1)),
            [cid(1), cid(2), cid(3), cid(4)]
        );
        assert_eq!(tree.children(&cid(4)), [cid(5), cid(6)]);
    }

    #[test]
    fn test_roots_and_display_sequence() {
        let comments = vec![
            comment(1, None),
            comment(4, None),
            comment(2, Some(1)),
            comment(3, Some(1)),
            comment(5, Some(4)),
        ];
        let tree = make_comments_tree(&comments).unwrap();
        assert_eq!(tree.roots, [cid(1), cid(4)]);
        assert_eq!(
            tree.display_sequence,
            [cid(1), cid(2), cid(3), cid(4), cid(5)]
        );
    }

    #[test]
    fn test_chained_comment_via_chain_parent_id() {
        let mut continuation = comment(2, None);
        continuation.chain_parent_id = Some(cid(1));
        let comments = vec![comment(1, None), continuation];
        let tree = make_comments_tree(&comments).unwrap();
        assert_eq!(tree.roots, [cid(1)]);
        assert_eq!(tree.parent_chain_map.get(&cid(2)), Some(&cid(1)));
    }

    #[test]
    fn test_empty_comments() {
        let tree = make_comments_tree(&[]).unwrap();
        assert!(tree.roots.is_empty());
        assert!(tree.display_sequence.is_empty());
    }

    #[test]
    fn test_duplicate_comment_ids_are_malformed() {
        let comments = vec![comment(1, None), comment(2, Some(1)), comment(2, Some(1))];
        let result = make_comments_tree(&comments);
        assert!(matches!(result, Err(ThreadError::CommentCycle(_))));
    }
}
