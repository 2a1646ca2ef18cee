use std::collections::{HashMap, HashSet};

use board_ref::PostRef;
use board_types::Post;
use itertools::Itertools;
use log::debug;

use crate::tree::{PostNode, PostsTree};

/// The synthetic bucket for posts with no category tag. Every post belongs
/// to exactly one bucket: its category tags, or this.
pub const UNCATEGORIZED_LABEL: &str = "uncategorized";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryFilter {
    pub name: String,
    pub active: bool,
}

/// Category tags observed in the post list, deduplicated, in first-appearance
/// order.
pub fn extract_categories(posts: &[Post]) -> Vec<String> {
    posts
        .iter()
        .flat_map(|post| post.category_tags().iter().cloned())
        .unique()
        .collect()
}

/// The single bucket a post is counted under: its first category tag, or the
/// uncategorized label.
pub fn category_bucket(post: &Post) -> &str {
    post.category_tags()
        .first()
        .map(String::as_str)
        .unwrap_or(UNCATEGORIZED_LABEL)
}

/// Rebuilds the filter state for a fresh post list: one entry per observed
/// category plus the uncategorized bucket. Categories already present keep
/// their flag; newly observed ones start active.
pub fn update_filter_state(categories: &[String], previous: &[CategoryFilter]) -> Vec<CategoryFilter> {
    categories
        .iter()
        .cloned()
        .chain(std::iter::once(UNCATEGORIZED_LABEL.to_string()))
        .map(|name| {
            let active = previous
                .iter()
                .find(|filter| filter.name == name)
                .map(|filter| filter.active)
                .unwrap_or(true);
            CategoryFilter { name, active }
        })
        .collect()
}

/// Prunes the tree to the active categories. A post survives when it is
/// directly matched or some descendant survives, so a visible reply is never
/// orphaned from its ancestors. The root always stays to anchor the tree;
/// with every category inactive only the root remains.
pub fn apply_categories_filter(
    tree: &PostsTree,
    posts: &HashMap<PostRef, Post>,
    state: &[CategoryFilter],
) -> PostsTree {
    let root = match &tree.root {
        Some(root) => root.clone(),
        None => return PostsTree::default(),
    };

    let active: HashSet<&str> = state
        .iter()
        .filter(|filter| filter.active)
        .map(|filter| filter.name.as_str())
        .collect();
    debug!("Filtering thread on {} active categories", active.len());

    // Children always come after their parent in pre-order, so walking the
    // display sequence backwards settles every child before its parent.
    let mut surviving: HashSet<PostRef> = HashSet::new();
    for post_id in tree.display_sequence.iter().rev() {
        let matched = posts
            .get(post_id)
            .map(|post| is_directly_matched(post, &active))
            .unwrap_or(false);
        let child_survives = tree
            .children(post_id)
            .iter()
            .any(|child| surviving.contains(child));
        if matched || child_survives {
            surviving.insert(post_id.clone());
        }
    }
    surviving.insert(root.clone());

    let mut parent_children_map: HashMap<PostRef, PostNode> = HashMap::new();
    for post_id in &tree.display_sequence {
        if !surviving.contains(post_id) {
            continue;
        }
        if let Some(node) = tree.node(post_id) {
            parent_children_map.insert(
                post_id.clone(),
                PostNode {
                    parent: node.parent.clone(),
                    children: node
                        .children
                        .iter()
                        .filter(|child| surviving.contains(*child))
                        .cloned()
                        .collect(),
                },
            );
        }
    }

    let display_sequence = tree
        .display_sequence
        .iter()
        .filter(|post_id| surviving.contains(*post_id))
        .cloned()
        .collect();

    PostsTree {
        root: Some(root),
        parent_children_map,
        display_sequence,
    }
}

fn is_directly_matched(post: &Post, active: &HashSet<&str>) -> bool {
    let tags = post.category_tags();
    if tags.is_empty() {
        active.contains(UNCATEGORIZED_LABEL)
    } else {
        tags.iter().any(|tag| active.contains(tag.as_str()))
    }
}
