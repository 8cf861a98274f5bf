/**
 * Message Endpoints
 *
 * Listing, sending (JSON or multipart for attachments), read marking,
 * deletion, and the aggregate unread count.
 */
use reqwest::multipart;

use super::ApiClient;
use crate::shared::error::ClientError;
use crate::shared::messaging::{
    ChatMessage, ListMessagesResponse, SendMessageRequest, UnreadCountResponse,
    UpdateMessageRequest,
};

impl ApiClient {
    /// Fetch a conversation's messages (`GET /conversations/{id}/messages`).
    /// The backend returns them in chronological order.
    pub async fn list_messages(&self, conversation_id: u64) -> Result<Vec<ChatMessage>, ClientError> {
        let url = self.url(&format!("/conversations/{}/messages", conversation_id));
        let response = self.authorized(self.http().get(&url))?.send().await?;
        let response = Self::check(response).await?;
        let list: ListMessagesResponse = response.json().await?;
        Ok(list.messages)
    }

    /// Send a text message (`POST /conversations/{id}/messages`)
    pub async fn send_message(
        &self,
        conversation_id: u64,
        body: String,
    ) -> Result<ChatMessage, ClientError> {
        let url = self.url(&format!("/conversations/{}/messages", conversation_id));
        let request = SendMessageRequest { body };
        let response = self
            .authorized(self.http().post(&url))?
            .json(&request)
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    /// Send a message with an attachment (multipart variant of
    /// `POST /conversations/{id}/messages`)
    pub async fn send_attachment(
        &self,
        conversation_id: u64,
        body: Option<String>,
        file_name: String,
        bytes: Vec<u8>,
    ) -> Result<ChatMessage, ClientError> {
        let url = self.url(&format!("/conversations/{}/messages", conversation_id));
        let mut form = multipart::Form::new()
            .part("attachment", multipart::Part::bytes(bytes).file_name(file_name));
        if let Some(body) = body {
            form = form.text("body", body);
        }

        let response = self
            .authorized(self.http().post(&url))?
            .multipart(form)
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    /// Set a message's read timestamp (`PUT /messages/{id}`)
    pub async fn mark_read(&self, message_id: u64) -> Result<ChatMessage, ClientError> {
        let url = self.url(&format!("/messages/{}", message_id));
        let request = UpdateMessageRequest { read: true };
        let response = self
            .authorized(self.http().put(&url))?
            .json(&request)
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    /// Delete a message (`DELETE /messages/{id}`)
    pub async fn delete_message(&self, message_id: u64) -> Result<(), ClientError> {
        let url = self.url(&format!("/messages/{}", message_id));
        let response = self.authorized(self.http().delete(&url))?.send().await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Aggregate unread count (`GET /messages/unread/count`)
    pub async fn unread_count(&self) -> Result<u64, ClientError> {
        let url = self.url("/messages/unread/count");
        let response = self.authorized(self.http().get(&url))?.send().await?;
        let response = Self::check(response).await?;
        let count: UnreadCountResponse = response.json().await?;
        Ok(count.count)
    }
}
