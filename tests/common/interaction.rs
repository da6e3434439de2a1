//! Scripted interaction that records prompts and notices

#![allow(dead_code)]

use async_trait::async_trait;
use marksflow::error::Result;
use marksflow::surface::{Interaction, Notice};
use std::sync::Mutex;

pub struct ScriptedInteraction {
    answer: bool,
    prompts: Mutex<Vec<String>>,
    notices: Mutex<Vec<Notice>>,
}

impl ScriptedInteraction {
    /// Says yes to every confirmation
    pub fn accepting() -> Self {
        Self::answering(true)
    }

    /// Says no to every confirmation
    pub fn declining() -> Self {
        Self::answering(false)
    }

    fn answering(answer: bool) -> Self {
        Self {
            answer,
            prompts: Mutex::new(Vec::new()),
            notices: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    pub fn failures(&self) -> Vec<String> {
        self.notices()
            .into_iter()
            .filter(Notice::is_failure)
            .map(|n| n.to_string())
            .collect()
    }
}

#[async_trait]
impl Interaction for ScriptedInteraction {
    async fn confirm(&self, prompt: &str) -> Result<bool> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.answer)
    }

    async fn notify(&self, notice: &Notice) {
        self.notices.lock().unwrap().push(notice.clone());
    }
}
