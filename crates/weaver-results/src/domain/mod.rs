//! Domain model: message identity and the keys derived from it.

pub mod ids;
pub mod key;
pub mod message;
pub mod queue_name;

pub use self::ids::MessageId;
pub use self::key::{KEY_LEN, KEY_SEPARATOR, MessageKey};
pub use self::message::Message;
pub use self::queue_name::{canonical_queue_name, dead_letter_queue_name, delay_queue_name};
