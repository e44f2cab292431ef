use serde::{Deserialize, Serialize};

use super::MessageId;

/// Identity of an enqueued unit of work: queue + actor + message id.
///
/// The namespace is not carried here. It belongs to the `ResultStore`
/// that looks results up.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Message {
    queue_name: String,
    actor_name: String,
    message_id: MessageId,
}

impl Message {
    pub fn new(
        queue_name: impl Into<String>,
        actor_name: impl Into<String>,
        message_id: MessageId,
    ) -> Self {
        Self {
            queue_name: queue_name.into(),
            actor_name: actor_name.into(),
            message_id,
        }
    }

    /// Message with a freshly generated id.
    pub fn generate(queue_name: impl Into<String>, actor_name: impl Into<String>) -> Self {
        Self::new(queue_name, actor_name, MessageId::generate())
    }

    pub fn queue_name(&self) -> &str {
        &self.queue_name
    }

    pub fn actor_name(&self) -> &str {
        &self.actor_name
    }

    pub fn message_id(&self) -> &MessageId {
        &self.message_id
    }
}
