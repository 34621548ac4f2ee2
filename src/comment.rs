//! Comment data model.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::time::Timestamp;

/// Quote-reference markup pointing at another comment in the same thread,
/// e.g. `>>123` or its full-width form.
static QUOTE_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[>＞]{1,2}[0-9０-９]+(?:[-,][0-9０-９]+)*").expect("quote-reference pattern")
});

static URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[hｈ]?ttps?://[^\s　]+").expect("url pattern"));

/// One fetched comment. Immutable once constructed.
///
/// `id` is unique within a thread (a board/thread/sequence composite assigned
/// by the backend); records from overlapping fetch windows may duplicate and
/// the store tolerates that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRecord {
    /// Backend-assigned identifier, unique within its thread.
    pub id: String,
    /// Title of the thread the comment was posted to.
    pub thread_title: String,
    /// Author display name.
    pub author: String,
    /// Author contact field (mail/trip), often empty.
    pub author_contact: String,
    /// Raw comment body.
    pub text: String,
    /// When the comment was posted.
    pub occurred_at: Timestamp,
}

impl CommentRecord {
    /// The comment body with quote-reference markup and URLs stripped,
    /// whitespace collapsed.
    #[must_use]
    pub fn display_text(&self) -> String {
        let stripped = QUOTE_REF.replace_all(&self.text, " ");
        let stripped = URL.replace_all(&stripped, " ");
        stripped.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(text: &str) -> CommentRecord {
        CommentRecord {
            id: "b/1/1".into(),
            thread_title: "thread".into(),
            author: "name".into(),
            author_contact: String::new(),
            text: text.into(),
            occurred_at: Timestamp(0),
        }
    }

    #[test]
    fn strips_quote_references() {
        assert_eq!(record(">>123 それな").display_text(), "それな");
        assert_eq!(record("＞＞45 同意").display_text(), "同意");
        assert_eq!(record(">>1-3,7 まとめて").display_text(), "まとめて");
    }

    #[test]
    fn strips_urls() {
        assert_eq!(
            record("詳細は https://example.com/a?b=c まで").display_text(),
            "詳細は まで"
        );
        assert_eq!(record("ttp://example.com").display_text(), "");
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(record("  a   b  ").display_text(), "a b");
        assert_eq!(record(">>1").display_text(), "");
    }

    #[test]
    fn plain_text_unchanged() {
        assert_eq!(record("キタ━━━━(゚∀゚)━━━━!!").display_text(), "キタ━━━━(゚∀゚)━━━━!!");
    }
}
