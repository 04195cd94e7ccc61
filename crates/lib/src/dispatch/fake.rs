//! In-memory [`MessagingApi`] for dispatcher tests.

use crate::error::ApiError;
use crate::webex::{Message, MessageSendResult, MessagingApi, OutboundMessage, Person};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Default)]
pub(crate) struct FakeApi {
    messages: Mutex<HashMap<String, Message>>,
    people: Mutex<HashMap<String, Person>>,
    me: Mutex<Option<Person>>,
    fail_sends: AtomicBool,
    me_calls: AtomicUsize,
    sent: Mutex<Vec<OutboundMessage>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_message(self, id: &str, text: &str, person_email: &str) -> Self {
        self.messages.lock().unwrap().insert(
            id.to_string(),
            Message {
                id: Some(id.to_string()),
                text: Some(text.to_string()),
                person_email: Some(person_email.to_string()),
                ..Default::default()
            },
        );
        self
    }

    pub fn with_person(self, id: &str, display_name: &str, email: &str) -> Self {
        self.people.lock().unwrap().insert(
            id.to_string(),
            Person {
                id: Some(id.to_string()),
                emails: vec![email.to_string()],
                display_name: Some(display_name.to_string()),
                ..Default::default()
            },
        );
        self
    }

    pub fn with_me(self, email: &str) -> Self {
        *self.me.lock().unwrap() = Some(Person {
            id: Some("bot".to_string()),
            emails: vec![email.to_string()],
            display_name: Some("Bot".to_string()),
            ..Default::default()
        });
        self
    }

    pub fn failing_sends(self) -> Self {
        self.fail_sends.store(true, Ordering::SeqCst);
        self
    }

    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn me_calls(&self) -> usize {
        self.me_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MessagingApi for FakeApi {
    async fn get_message(&self, message_id: &str) -> Result<Message, ApiError> {
        self.messages
            .lock()
            .unwrap()
            .get(message_id)
            .cloned()
            .ok_or_else(|| ApiError::Api("404 Not Found".to_string()))
    }

    async fn get_person(&self, person_id: &str) -> Result<Person, ApiError> {
        self.people
            .lock()
            .unwrap()
            .get(person_id)
            .cloned()
            .ok_or_else(|| ApiError::Api("404 Not Found".to_string()))
    }

    async fn get_me(&self) -> Result<Person, ApiError> {
        self.me_calls.fetch_add(1, Ordering::SeqCst);
        self.me.lock().unwrap().clone().ok_or(ApiError::Empty)
    }

    async fn create_message(
        &self,
        message: &OutboundMessage,
    ) -> Result<MessageSendResult, ApiError> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(ApiError::Api("503 Service Unavailable".to_string()));
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push(message.clone());
        Ok(Message {
            id: Some(format!("sent-{}", sent.len())),
            room_id: Some(message.room_id.clone()),
            text: message.text.clone(),
            markdown: message.markdown.clone(),
            ..Default::default()
        })
    }
}
