//! Builtin commands.
//!
//! Builtins run inside the interpreter, before any process is spawned.
//! `exit` is not registered here: the dispatcher intercepts it directly so
//! it can unwind the control loop.

mod cd;
mod pwd;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::result::ExecResult;
use crate::state::ShellState;

pub use cd::Cd;
pub use pwd::Pwd;

/// A command handled by the interpreter itself.
#[async_trait]
pub trait Builtin: Send + Sync {
    /// The builtin's name (used for lookup).
    fn name(&self) -> &str;

    /// Execute with the full argument vector (`argv[0]` is the name).
    async fn execute(&self, argv: &[String], state: &mut ShellState) -> ExecResult;
}

/// Lookup table for builtins.
#[derive(Default)]
pub struct BuiltinRegistry {
    builtins: HashMap<String, Arc<dyn Builtin>>,
}

impl BuiltinRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a builtin under its own name.
    pub fn register(&mut self, builtin: Arc<dyn Builtin>) {
        self.builtins.insert(builtin.name().to_string(), builtin);
    }

    /// Look up a builtin by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Builtin>> {
        self.builtins.get(name).cloned()
    }

    /// True if the name resolves to a builtin.
    pub fn contains(&self, name: &str) -> bool {
        self.builtins.contains_key(name)
    }
}

/// Register the standard builtins.
pub fn register_builtins(registry: &mut BuiltinRegistry) {
    registry.register(Arc::new(Cd));
    registry.register(Arc::new(Pwd));
}
