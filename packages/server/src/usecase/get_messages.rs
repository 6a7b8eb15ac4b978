//! UseCase: paginated history read.

use std::sync::Arc;

use crate::domain::{ChatMessage, MessageLog};

/// Reads a `(limit, offset)` window of the chat history.
pub struct GetMessagesUseCase {
    log: Arc<dyn MessageLog>,
}

impl GetMessagesUseCase {
    pub fn new(log: Arc<dyn MessageLog>) -> Self {
        Self { log }
    }

    /// Messages `[offset, offset + limit)` by arrival order. Callers pass
    /// signed values straight off the wire; anything non-positive for
    /// `limit` or negative for `offset` yields an empty page, never an
    /// error.
    pub async fn execute(&self, limit: i64, offset: i64) -> Vec<ChatMessage> {
        if limit <= 0 || offset < 0 {
            return Vec::new();
        }
        self.log.page(limit as usize, offset as usize).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MessageContent, MessageIdFactory, Sender, Timestamp};
    use crate::infrastructure::repository::InMemoryMessageLog;

    async fn log_with_messages(count: i64) -> Arc<InMemoryMessageLog> {
        let log = Arc::new(InMemoryMessageLog::new());
        let factory = MessageIdFactory::new();
        for i in 0..count {
            log.append(ChatMessage {
                id: factory.next(1000 + i),
                content: MessageContent::new(format!("m{i}")).unwrap(),
                sender: Sender::anonymous(),
                timestamp: Timestamp::new(1000 + i),
            })
            .await;
        }
        log
    }

    #[tokio::test]
    async fn test_returns_window_in_arrival_order() {
        // given:
        let usecase = GetMessagesUseCase::new(log_with_messages(5).await);

        // when:
        let page = usecase.execute(3, 1).await;

        // then:
        let contents: Vec<&str> = page.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["m1", "m2", "m3"]);
    }

    #[tokio::test]
    async fn test_zero_limit_yields_empty_page() {
        // given:
        let usecase = GetMessagesUseCase::new(log_with_messages(3).await);

        // when / then:
        assert!(usecase.execute(0, 0).await.is_empty());
    }

    #[tokio::test]
    async fn test_negative_limit_yields_empty_page() {
        // given:
        let usecase = GetMessagesUseCase::new(log_with_messages(3).await);

        // when / then:
        assert!(usecase.execute(-1, 0).await.is_empty());
    }

    #[tokio::test]
    async fn test_negative_offset_yields_empty_page() {
        // given:
        let usecase = GetMessagesUseCase::new(log_with_messages(3).await);

        // when / then:
        assert!(usecase.execute(10, -1).await.is_empty());
    }

    #[tokio::test]
    async fn test_offset_past_end_yields_empty_page() {
        // given:
        let usecase = GetMessagesUseCase::new(log_with_messages(3).await);

        // when / then:
        assert!(usecase.execute(10, 3).await.is_empty());
    }
}
