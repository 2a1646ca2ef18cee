use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::fmt;
use thiserror::Error as ThisError;
use urlencoding::encode;

#[derive(Clone, Debug, ThisError)]
pub enum RefError {
    #[error("Does not match as {ref_type}: {input}")]
    BadFormat {
        ref_type: &'static str,
        input: String,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct BoardRef(String);

impl BoardRef {
    // From a board slug, without the leading !
    pub fn from_string(string: String) -> Result<Self, RefError> {
        if !Self::is_match(string.as_str()) {
            Err(RefError::BadFormat {
                ref_type: "Board",
                input: string,
            })
        } else {
            Ok(Self(string))
        }
    }

    pub fn single_regex() -> &'static Regex {
        lazy_static! {
            static ref RE: Regex = Regex::new("^[a-z0-9][a-z0-9_-]*$").unwrap();
        }
        &*RE
    }

    pub fn is_match(string: &str) -> bool {
        let regex = Self::single_regex();
        regex.is_match(string)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn to_page_url(&self) -> String {
        format!("/!{}", self.0)
    }

    // Board feed restricted to a single category, e.g. /!art?filter=dead%20dove
    pub fn to_filtered_page_url(&self, category: &str) -> String {
        format!("/!{}?filter={}", self.0, encode(category))
    }
}

impl fmt::Display for BoardRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "!{}", self.0)
    }
}

impl TryFrom<String> for BoardRef {
    type Error = RefError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        BoardRef::from_string(value)
    }
}

impl From<BoardRef> for String {
    fn from(value: BoardRef) -> String {
        value.0
    }
}

impl From<&BoardRef> for String {
    fn from(value: &BoardRef) -> String {
        value.0.clone()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct ThreadRef(String);

impl ThreadRef {
    pub fn from_string(string: String) -> Result<Self, RefError> {
        if !Self::is_match(string.as_str()) {
            Err(RefError::BadFormat {
                ref_type: "Thread",
                input: string,
            })
        } else {
            Ok(Self(string.to_lowercase()))
        }
    }

    pub fn single_regex() -> &'static Regex {
        lazy_static! {
            static ref RE: Regex = uuid_regex();
        }
        &*RE
    }

    pub fn is_match(string: &str) -> bool {
        let regex = Self::single_regex();
        regex.is_match(string)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ThreadRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for ThreadRef {
    type Error = RefError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ThreadRef::from_string(value)
    }
}

impl From<ThreadRef> for String {
    fn from(value: ThreadRef) -> String {
        value.0
    }
}

impl From<&ThreadRef> for String {
    fn from(value: &ThreadRef) -> String {
        value.0.clone()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct PostRef(String);

impl PostRef {
    pub fn from_string(string: String) -> Result<Self, RefError> {
        if !Self::is_match(string.as_str()) {
            Err(RefError::BadFormat {
                ref_type: "Post",
                input: string,
            })
        } else {
            Ok(Self(string.to_lowercase()))
        }
    }

    pub fn single_regex() -> &'static Regex {
        lazy_static! {
            static ref RE: Regex = uuid_regex();
        }
        &*RE
    }

    pub fn is_match(string: &str) -> bool {
        let regex = Self::single_regex();
        regex.is_match(string)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PostRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for PostRef {
    type Error = RefError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        PostRef::from_string(value)
    }
}

impl From<PostRef> for String {
    fn from(value: PostRef) -> String {
        value.0
    }
}

impl From<&PostRef> for String {
    fn from(value: &PostRef) -> String {
        value.0.clone()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct CommentRef(String);

impl CommentRef {
    pub fn from_string(string: String) -> Result<Self, RefError> {
        if !Self::is_match(string.as_str()) {
            Err(RefError::BadFormat {
                ref_type: "Comment",
                input: string,
            })
        } else {
            Ok(Self(string.to_lowercase()))
        }
    }

    pub fn single_regex() -> &'static Regex {
        lazy_static! {
            static ref RE: Regex = uuid_regex();
        }
        &*RE
    }

    pub fn is_match(string: &str) -> bool {
        let regex = Self::single_regex();
        regex.is_match(string)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for CommentRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for CommentRef {
    type Error = RefError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        CommentRef::from_string(value)
    }
}

impl From<CommentRef> for String {
    fn from(value: CommentRef) -> String {
        value.0
    }
}

impl From<&CommentRef> for String {
    fn from(value: &CommentRef) -> String {
        value.0.clone()
    }
}

// Thread pages live under the owning board: /!board/thread/<threadId>,
// with a trailing post segment when the page targets a single subtree.
pub fn thread_page_url(board: &BoardRef, thread: &ThreadRef, post: Option<&PostRef>) -> String {
    match post {
        Some(post) => format!("{}/thread/{}/{}", board.to_page_url(), thread, post),
        None => format!("{}/thread/{}", board.to_page_url(), thread),
    }
}

fn uuid_regex() -> Regex {
    let group = "[0-9a-fA-F]";
    let mut re = String::new();
    re.push_str("^");
    for (index, length) in [8, 4, 4, 4, 12].iter().enumerate() {
        if index > 0 {
            re.push_str("-");
        }
        re.push_str(group);
        re.push_str("{");
        re.push_str(&length.to_string());
        re.push_str("}");
    }
    re.push_str("$");
    Regex::new(&re).unwrap()
}
