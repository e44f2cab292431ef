//! MessageKey - result の lookup key
//!
//! # 導出方法
//! 1. `namespace:queue_name:actor_name:message_id` を組み立てる
//!    （queue_name は `.DQ` / `.XQ` を除去した正規名）
//! 2. SHA-256 でハッシュし、小文字 hex（64 文字固定）にする
//!
//! 固定長にすることで、driver 側は任意長・任意文字種の ID を気にしなくてよい。
//!
//! フィールド内の `:` と `\` は `\` でエスケープする。区切り文字を含む
//! queue / actor 名でも、別の組み合わせと同じ文字列にはならない。
//! 区切り文字を含まない ID の key はエスケープの有無で変わらない。

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::borrow::Cow;
use std::fmt;

use super::Message;
use super::queue_name::canonical_queue_name;

/// Separator between identity fields in the canonical key string.
pub const KEY_SEPARATOR: char = ':';

/// Length of every derived key, in hex characters.
pub const KEY_LEN: usize = 64;

/// Opaque, fixed-width key under which a message's result is stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageKey(String);

impl MessageKey {
    /// Derive the key of `message` inside `namespace`.
    ///
    /// Pure: no I/O, never fails, and recomputed on every call.
    pub fn derive(namespace: &str, message: &Message) -> Self {
        let canonical = format!(
            "{namespace}{sep}{queue}{sep}{actor}{sep}{id}",
            namespace = escape_field(namespace),
            sep = KEY_SEPARATOR,
            queue = escape_field(canonical_queue_name(message.queue_name())),
            actor = escape_field(message.actor_name()),
            id = escape_field(message.message_id().as_str()),
        );

        let mut hasher = Sha256::new();
        hasher.update(canonical.as_bytes());
        Self(format!("{:x}", hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

const ESCAPE: char = '\\';

fn escape_field(field: &str) -> Cow<'_, str> {
    if !field.contains(|c: char| c == KEY_SEPARATOR || c == ESCAPE) {
        return Cow::Borrowed(field);
    }
    let mut escaped = String::with_capacity(field.len() + 4);
    for c in field.chars() {
        if c == KEY_SEPARATOR || c == ESCAPE {
            escaped.push(ESCAPE);
        }
        escaped.push(c);
    }
    Cow::Owned(escaped)
}

impl fmt::Display for MessageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MessageId;
    use rstest::rstest;

    fn message(queue: &str, actor: &str, id: &str) -> Message {
        Message::new(queue, actor, MessageId::new(id))
    }

    #[test]
    fn key_matches_known_digest() {
        let key = MessageKey::derive("weaver-results", &message("default", "add", "msg-1"));
        assert_eq!(
            key.as_str(),
            "f3c517930bd58cda958c4eead50a7dfa8b8a5e85ec71dfd828d9abc64350c65f"
        );
    }

    #[test]
    fn key_is_fixed_width_lowercase_hex() {
        let long_id = "x".repeat(4096);
        for m in [
            message("default", "add", "1"),
            message("q", "a", &long_id),
            message("キュー", "アクター", "ünïcødé"),
        ] {
            let key = MessageKey::derive("ns", &m);
            assert_eq!(key.as_str().len(), KEY_LEN);
            assert!(
                key.as_str()
                    .chars()
                    .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
            );
        }
    }

    #[test]
    fn identical_identity_gives_identical_key() {
        let m1 = message("default", "add", "msg-1");
        let m2 = message("default", "add", "msg-1");

        assert_eq!(
            MessageKey::derive("ns", &m1),
            MessageKey::derive("ns", &m2)
        );
    }

    #[rstest]
    #[case::namespace("other-ns", "default", "add", "msg-1")]
    #[case::queue("ns", "other", "add", "msg-1")]
    #[case::actor("ns", "default", "mul", "msg-1")]
    #[case::message_id("ns", "default", "add", "msg-2")]
    #[case::shifted_fields("ns", "defaultadd", "", "msg-1")]
    fn any_field_change_changes_key(
        #[case] namespace: &str,
        #[case] queue: &str,
        #[case] actor: &str,
        #[case] id: &str,
    ) {
        let base = MessageKey::derive("ns", &message("default", "add", "msg-1"));
        let changed = MessageKey::derive(namespace, &message(queue, actor, id));
        assert_ne!(base, changed);
    }

    #[test]
    fn keys_over_a_sample_space_do_not_collide() {
        let mut seen = std::collections::HashSet::new();
        for ns in ["a", "b"] {
            for queue in ["default", "high", "low"] {
                for actor in ["add", "mul"] {
                    for id in 0..50 {
                        let key = MessageKey::derive(ns, &message(queue, actor, &id.to_string()));
                        assert!(seen.insert(key));
                    }
                }
            }
        }
        assert_eq!(seen.len(), 2 * 3 * 2 * 50);
    }

    #[rstest]
    #[case::queue_vs_actor(("a:b", "c", "1"), ("a", "b:c", "1"))]
    #[case::actor_vs_id(("q", "a:b", "c"), ("q", "a", "b:c"))]
    #[case::escape_vs_separator(("a\\", "b", "1"), ("a", "\\b", "1"))]
    #[case::escaped_separator_literal(("a\\:b", "c", "1"), ("a\\", "b:c", "1"))]
    fn separators_inside_fields_do_not_collide(
        #[case] left: (&str, &str, &str),
        #[case] right: (&str, &str, &str),
    ) {
        let l = MessageKey::derive("ns", &message(left.0, left.1, left.2));
        let r = MessageKey::derive("ns", &message(right.0, right.1, right.2));
        assert_ne!(l, r);
    }

    #[test]
    fn escaping_leaves_plain_fields_alone() {
        assert_eq!(escape_field("default"), "default");
        assert!(matches!(escape_field("default"), Cow::Borrowed(_)));
        assert_eq!(escape_field("a:b"), "a\\:b");
        assert_eq!(escape_field("a\\b"), "a\\\\b");
    }

    #[rstest]
    #[case::delay("default.DQ")]
    #[case::dead_letter("default.XQ")]
    fn derived_queues_share_the_canonical_key(#[case] queue: &str) {
        let canonical = MessageKey::derive("ns", &message("default", "add", "msg-1"));
        let derived = MessageKey::derive("ns", &message(queue, "add", "msg-1"));
        assert_eq!(canonical, derived);
    }
}
