//! Queue naming conventions.
//!
//! Every queue may have two derived queues: a delay queue (`.DQ`) for
//! messages scheduled in the future and a dead-letter queue (`.XQ`) for
//! messages that exhausted their retries. All three share one logical name,
//! so results are keyed by the canonical name.

const DELAY_SUFFIX: &str = ".DQ";
const DEAD_LETTER_SUFFIX: &str = ".XQ";

/// Strip delay/dead-letter decorations from a queue name.
pub fn canonical_queue_name(queue_name: &str) -> &str {
    queue_name
        .strip_suffix(DELAY_SUFFIX)
        .or_else(|| queue_name.strip_suffix(DEAD_LETTER_SUFFIX))
        .unwrap_or(queue_name)
}

/// Name of the delay queue belonging to `queue_name`.
pub fn delay_queue_name(queue_name: &str) -> String {
    format!("{}{}", canonical_queue_name(queue_name), DELAY_SUFFIX)
}

/// Name of the dead-letter queue belonging to `queue_name`.
pub fn dead_letter_queue_name(queue_name: &str) -> String {
    format!("{}{}", canonical_queue_name(queue_name), DEAD_LETTER_SUFFIX)
}
