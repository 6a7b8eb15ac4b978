//! UseCase: chat message submission.
//!
//! Accepts a message from either transport, assigns its id and timestamp,
//! appends it to the log, and fans the stored message out to every attached
//! connection. The broadcast always carries the message as stored, so it is
//! causally ordered after the append.

use std::sync::Arc;

use irori_shared::time::Clock;

use crate::domain::{
    ChatMessage, EventBroadcaster, MessageContent, MessageIdFactory, MessageLog, Sender,
    Timestamp,
};
use crate::infrastructure::dto::websocket::{MessageDto, ServerEvent};

use super::error::SendMessageError;

/// Validates, stores, and fans out a chat message.
pub struct SendChatMessageUseCase {
    log: Arc<dyn MessageLog>,
    broadcaster: Arc<dyn EventBroadcaster>,
    id_factory: Arc<MessageIdFactory>,
    clock: Arc<dyn Clock>,
}

impl SendChatMessageUseCase {
    pub fn new(
        log: Arc<dyn MessageLog>,
        broadcaster: Arc<dyn EventBroadcaster>,
        id_factory: Arc<MessageIdFactory>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            log,
            broadcaster,
            id_factory,
            clock,
        }
    }

    /// Accept a message from `sender`, append it to the log, and broadcast
    /// the stored message as a `chat message` event.
    pub async fn execute(
        &self,
        sender: Sender,
        content: String,
    ) -> Result<ChatMessage, SendMessageError> {
        let content = MessageContent::new(content)?;
        let timestamp = Timestamp::new(self.clock.now_millis());
        let id = self.id_factory.next(timestamp.value());

        let message = ChatMessage {
            id,
            content,
            sender,
            timestamp,
        };
        let message = self.log.append(message).await;

        let frame = ServerEvent::ChatMessage(MessageDto::from(&message)).to_frame();
        self.broadcaster.broadcast(&frame).await;

        Ok(message)
    }
}
