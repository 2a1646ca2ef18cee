use std::env;
use std::fs;
use std::process::exit;

use board_ref::PostRef;
use board_threads::{comment_chain, ThreadSnapshot, TimelineViewMode};
use board_types::Thread;

fn main() {
    let path = match env::args().nth(1) {
        Some(path) => path,
        None => {
            eprintln!("Usage: board-inspect <thread.json>");
            exit(1);
        }
    };

    let data = fs::read_to_string(&path).unwrap();
    let thread: Thread = serde_json::from_str(&data).unwrap();
    let snapshot = ThreadSnapshot::build(&thread).unwrap();

    println!("thread: {}", snapshot.thread_id);
    match &snapshot.posts_tree.root {
        Some(root) => print_subtree(&snapshot, root, 0),
        None => {
            println!("(no posts yet)");
            return;
        }
    }

    if !snapshot.categories.is_empty() {
        println!("categories: {}", snapshot.categories.join(", "));
    }
    println!("new answers: {}", snapshot.new_answers().count());
    println!(
        "posts with new activity: {}",
        snapshot.timeline_sequence(TimelineViewMode::New).len()
    );
}

fn print_subtree(snapshot: &ThreadSnapshot, post_id: &PostRef, depth: usize) {
    let indent = "  ".repeat(depth);
    let post = match snapshot.post(post_id) {
        Some(post) => post,
        None => return,
    };
    let marker = if post.is_new { " (new)" } else { "" };
    println!(
        "{}- {} by {}{}",
        indent, post.post_id, post.secret_identity.name, marker
    );

    if let Some(comments) = snapshot.comments_tree(post_id) {
        for root in &comments.roots {
            let chain = comment_chain(comments, root);
            if chain.len() > 1 {
                println!("{}    * comment chain of {}", indent, chain.len());
            } else {
                println!("{}    * comment {}", indent, root);
            }
        }
    }

    for child in snapshot.posts_tree.children(post_id) {
        print_subtree(snapshot, child, depth + 1);
    }
}
