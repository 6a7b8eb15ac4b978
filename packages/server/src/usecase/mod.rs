//! UseCase layer: one struct per operation, depending only on the domain
//! trait seams.

pub mod disconnect_user;
pub mod error;
pub mod get_active_users;
pub mod get_messages;
pub mod identify_user;
pub mod send_chat_message;

#[cfg(test)]
pub(crate) mod test_support;

pub use disconnect_user::DisconnectUserUseCase;
pub use error::SendMessageError;
pub use get_active_users::GetActiveUsersUseCase;
pub use get_messages::GetMessagesUseCase;
pub use identify_user::IdentifyUserUseCase;
pub use send_chat_message::SendChatMessageUseCase;
