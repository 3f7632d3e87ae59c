//! Service: command handler registry and dispatch.
//!
//! `Service<L>` holds a lifecycle and a set of named command handlers.
//! Each handler receives a `Context<L>` and returns `Result<Value, HandlerError>`.

use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, warn};

use super::context::Context;
use super::error::HandlerError;
use super::session::Session;

type Guard<L> = Box<dyn Fn(&Context<L>) -> bool + Send + Sync>;
type Handle<L> = Box<dyn Fn(&Context<L>) -> Result<Value, HandlerError> + Send + Sync>;

/// A registered command handler with optional guard.
struct CommandHandler<L> {
    guard: Option<Guard<L>>,
    handle: Handle<L>,
}

/// A service that routes commands to handler functions.
pub struct Service<L> {
    lifecycle: L,
    handlers: HashMap<String, CommandHandler<L>>,
}

impl<L: Send + Sync + 'static> Service<L> {
    pub fn new(lifecycle: L) -> Self {
        Self {
            lifecycle,
            handlers: HashMap::new(),
        }
    }

    /// Register a command handler.
    pub fn command<F>(mut self, name: &str, handler: F) -> Self
    where
        F: Fn(&Context<L>) -> Result<Value, HandlerError> + Send + Sync + 'static,
    {
        self.handlers.insert(
            name.to_string(),
            CommandHandler {
                guard: None,
                handle: Box::new(handler),
            },
        );
        self
    }

    /// Register a command handler with a guard function.
    ///
    /// The guard is called before the handler. If it returns `false`,
    /// the command is rejected with `HandlerError::GuardRejected`.
    pub fn command_guarded<G, F>(mut self, name: &str, guard: G, handler: F) -> Self
    where
        G: Fn(&Context<L>) -> bool + Send + Sync + 'static,
        F: Fn(&Context<L>) -> Result<Value, HandlerError> + Send + Sync + 'static,
    {
        self.handlers.insert(
            name.to_string(),
            CommandHandler {
                guard: Some(Box::new(guard)),
                handle: Box::new(handler),
            },
        );
        self
    }

    /// Dispatch a command by name.
    pub fn dispatch(
        &self,
        command: &str,
        input: Value,
        session: Session,
    ) -> Result<Value, HandlerError> {
        let handler = self
            .handlers
            .get(command)
            .ok_or_else(|| HandlerError::UnknownCommand(command.to_string()))?;

        let ctx = Context::new(command.to_string(), input, session, &self.lifecycle);

        if let Some(guard) = &handler.guard {
            if !guard(&ctx) {
                return Err(HandlerError::GuardRejected(command.to_string()));
            }
        }

        debug!(command, identity = ctx.identity(), "dispatch");
        let result = (handler.handle)(&ctx);
        if let Err(e) = &result {
            if e.status_code() >= 500 {
                warn!(command, error = %e, "command failed");
            } else {
                debug!(command, error = %e, "command rejected");
            }
        }
        result
    }

    /// Dispatch a `CommandRequest`, returning a `CommandResponse`.
    pub fn dispatch_request(&self, request: &CommandRequest) -> CommandResponse {
        let session = Session::from_map(request.session_variables.clone());
        match self.dispatch(&request.command, request.input.clone(), session) {
            Ok(value) => CommandResponse {
                status: 200,
                body: value,
            },
            Err(e) => CommandResponse {
                status: e.status_code(),
                body: serde_json::json!({ "error": e.to_string() }),
            },
        }
    }

    /// Registered command names, sorted.
    pub fn commands(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn lifecycle(&self) -> &L {
        &self.lifecycle
    }
}

/// An inbound command request.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CommandRequest {
    pub command: String,
    pub input: Value,
    #[serde(default)]
    pub session_variables: HashMap<String, String>,
}

/// Response from dispatching a command.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CommandResponse {
    /// HTTP-style status code.
    pub status: u16,
    /// Handler result, or `{ "error": ... }`.
    pub body: Value,
}
