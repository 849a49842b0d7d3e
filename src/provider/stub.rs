use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::Provider;

/// Scripted reply for one call.
#[derive(Clone, Debug)]
pub enum Reply {
    Text(String),
    Nothing,
    Fail(String),
}

/// Test provider that replays scripted replies and counts calls.
/// Once the script runs out it keeps answering with the last reply.
pub struct StubProvider {
    replies: Mutex<VecDeque<Reply>>,
    last: Mutex<Reply>,
    calls: Arc<AtomicUsize>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl StubProvider {
    pub fn replying(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            last: Mutex::new(Reply::Nothing),
            calls: Arc::new(AtomicUsize::new(0)),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn text(text: &str) -> Self {
        Self::replying(vec![Reply::Text(text.to_string())])
    }

    /// Shared call counter; stays readable after the stub is boxed.
    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }

    pub fn prompts(&self) -> Arc<Mutex<Vec<String>>> {
        self.prompts.clone()
    }
}

pub fn count(calls: &Arc<AtomicUsize>) -> usize {
    calls.load(Ordering::SeqCst)
}

#[async_trait]
impl Provider for StubProvider {
    fn name(&self) -> &str {
        "stub"
    }

    async fn complete(&self, prompt: &str) -> Result<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        let reply = match self.replies.lock().unwrap().pop_front() {
            Some(r) => {
                *self.last.lock().unwrap() = r.clone();
                r
            }
            None => self.last.lock().unwrap().clone(),
        };
        match reply {
            Reply::Text(t) => Ok(Some(t)),
            Reply::Nothing => Ok(None),
            Reply::Fail(msg) => Err(anyhow!(msg)),
        }
    }
}
