//! Canned console output for service tests.

use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;
use winops_shell::{Invoke, Result, ShellError};

struct Reply {
    prefix: String,
    output: std::result::Result<String, String>,
    delay: Duration,
}

/// Answers each invocation with the first reply whose prefix matches the
/// space-joined arguments, and records every call.
#[derive(Default)]
pub(crate) struct ScriptedInvoker {
    replies: Vec<Reply>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedInvoker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reply(mut self, prefix: &str, output: &str) -> Self {
        self.replies.push(Reply {
            prefix: prefix.to_string(),
            output: Ok(output.to_string()),
            delay: Duration::ZERO,
        });
        self
    }

    pub(crate) fn reply_after(mut self, prefix: &str, output: &str, delay: Duration) -> Self {
        self.replies.push(Reply {
            prefix: prefix.to_string(),
            output: Ok(output.to_string()),
            delay,
        });
        self
    }

    pub(crate) fn fail(mut self, prefix: &str, message: &str) -> Self {
        self.replies.push(Reply {
            prefix: prefix.to_string(),
            output: Err(message.to_string()),
            delay: Duration::ZERO,
        });
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Invoke for ScriptedInvoker {
    async fn run(&self, args: &[String]) -> Result<String> {
        let line = args.join(" ");
        self.calls.lock().unwrap().push(line.clone());
        let Some(reply) = self.replies.iter().find(|r| line.starts_with(&r.prefix)) else {
            return Err(ShellError::exit("scripted", Some(1), &format!("no reply for `{line}`")));
        };
        if !reply.delay.is_zero() {
            tokio::time::sleep(reply.delay).await;
        }
        match &reply.output {
            Ok(text) => Ok(text.clone()),
            Err(message) => Err(ShellError::exit("scripted", Some(1), message)),
        }
    }
}
