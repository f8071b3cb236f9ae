use tracing::debug;

use crate::application::ChatClient;
use crate::domain::{ChatMessage, DomainError};

/// Sends `system` instructions followed by one `user` turn and returns the
/// first choice's text.
pub async fn ask<C>(llm: &C, model: &str, system: &str, user: &str) -> Result<String, DomainError>
where
    C: ChatClient + ?Sized,
{
    converse(llm, model, vec![ChatMessage::system(system), ChatMessage::user(user)]).await
}

/// Like [`ask`] for an arbitrary ordered conversation.
pub async fn converse<C>(
    llm: &C,
    model: &str,
    messages: Vec<ChatMessage>,
) -> Result<String, DomainError>
where
    C: ChatClient + ?Sized,
{
    let result = llm.complete_short(messages, model).await?;
    let content = result.into_first_content()?;
    debug!("{} answered: {}", model, content);
    Ok(content)
}
