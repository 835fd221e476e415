#![allow(dead_code)]

use async_trait::async_trait;
use layout_orchestrator::utils::error::{OrchestratorError, Result};
use layout_orchestrator::CommandChannel;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone)]
pub enum Reply {
    Text(String),
    Fault(String),
}

pub fn text(s: &str) -> Reply {
    Reply::Text(s.to_string())
}

pub fn fault(s: &str) -> Reply {
    Reply::Fault(s.to_string())
}

/// 依子字串規則回應的命令通道；第一條符合的規則勝出，沒有符合時回傳空字串
#[derive(Clone)]
pub struct ScriptedChannel {
    alive: bool,
    authorized: bool,
    rules: Vec<(String, Reply)>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedChannel {
    pub fn new() -> Self {
        Self {
            alive: true,
            authorized: true,
            rules: Vec::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn offline() -> Self {
        Self {
            alive: false,
            authorized: false,
            ..Self::new()
        }
    }

    pub fn unauthorized() -> Self {
        Self {
            authorized: false,
            ..Self::new()
        }
    }

    pub fn on(mut self, fragment: &str, reply: Reply) -> Self {
        self.rules.push((fragment.to_string(), reply));
        self
    }

    pub async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }

    pub async fn calls_containing(&self, fragment: &str) -> Vec<String> {
        self.calls()
            .await
            .into_iter()
            .filter(|c| c.contains(fragment))
            .collect()
    }
}

#[async_trait]
impl CommandChannel for ScriptedChannel {
    async fn is_alive(&self) -> bool {
        self.alive
    }

    async fn is_authorized(&self) -> bool {
        self.authorized
    }

    async fn execute(&self, command: &str) -> Result<String> {
        self.calls.lock().await.push(command.to_string());
        if !self.alive {
            return Err(OrchestratorError::ChannelUnavailable {
                message: "scripted channel is offline".to_string(),
            });
        }
        let reply = self
            .rules
            .iter()
            .find(|(fragment, _)| command.contains(fragment.as_str()))
            .map(|(_, reply)| reply.clone());
        match reply {
            Some(Reply::Text(output)) => Ok(output),
            Some(Reply::Fault(message)) => Err(OrchestratorError::Transport {
                command: command.to_string(),
                message,
            }),
            None => Ok(String::new()),
        }
    }
}

pub const RUNNING_ALL: &str = "system_server\ncom.whatsapp\ncom.spotify.client\ncom.android.chrome";
