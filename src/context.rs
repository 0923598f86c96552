//! Per-run execution context handed to every node.
//!
//! The engine treats the context as opaque: it is constructed by the host
//! (which resolves configuration and secrets however it likes) and passed
//! through to the node runner unmodified. Nothing in the executor reads or
//! writes it.

use std::fmt;

use rustc_hash::FxHashMap;
use serde_json::Value;

/// Execution context shared by every node of a run.
///
/// Carries the workflow name, free-form configuration, and namespaced
/// secrets. Secrets are grouped by namespace (typically one per external
/// service) so a node asks for `("slack", "webhook_url")` rather than a
/// flat key.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use stagecraft::context::RunContext;
///
/// let ctx = RunContext::builder("pr-digest")
///     .with_config("repo", json!("acme/widgets"))
///     .with_secret("github", "token", "ghp_...")
///     .build();
///
/// assert_eq!(ctx.workflow(), "pr-digest");
/// assert_eq!(ctx.config("repo"), Some(&json!("acme/widgets")));
/// assert_eq!(ctx.secret("github", "token"), Some("ghp_..."));
/// assert_eq!(ctx.secret("github", "missing"), None);
/// ```
#[derive(Clone, Default)]
pub struct RunContext {
    workflow: String,
    config: FxHashMap<String, Value>,
    secrets: FxHashMap<String, FxHashMap<String, String>>,
}

impl RunContext {
    /// Context with no configuration or secrets, for the given workflow.
    pub fn new(workflow: impl Into<String>) -> Self {
        Self {
            workflow: workflow.into(),
            config: FxHashMap::default(),
            secrets: FxHashMap::default(),
        }
    }

    /// Start building a context for the given workflow.
    #[must_use]
    pub fn builder(workflow: impl Into<String>) -> RunContextBuilder {
        RunContextBuilder {
            ctx: Self::new(workflow),
        }
    }

    /// Name of the workflow this run belongs to.
    #[must_use]
    pub fn workflow(&self) -> &str {
        &self.workflow
    }

    /// Look up a configuration value by key.
    #[must_use]
    pub fn config(&self, key: &str) -> Option<&Value> {
        self.config.get(key)
    }

    /// The full configuration map.
    #[must_use]
    pub fn config_map(&self) -> &FxHashMap<String, Value> {
        &self.config
    }

    /// Look up a secret by namespace and key.
    #[must_use]
    pub fn secret(&self, namespace: &str, key: &str) -> Option<&str> {
        self.secrets
            .get(namespace)
            .and_then(|ns| ns.get(key))
            .map(String::as_str)
    }
}

// Secret values must never end up in logs; Debug prints namespaces and key
// counts only.
impl fmt::Debug for RunContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut namespaces: Vec<String> = self
            .secrets
            .iter()
            .map(|(ns, keys)| format!("{ns}({} keys)", keys.len()))
            .collect();
        namespaces.sort();
        f.debug_struct("RunContext")
            .field("workflow", &self.workflow)
            .field("config", &self.config)
            .field("secrets", &namespaces)
            .finish()
    }
}

/// Builder for [`RunContext`] with a fluent API.
#[derive(Clone, Debug)]
pub struct RunContextBuilder {
    ctx: RunContext,
}

impl RunContextBuilder {
    /// Adds a configuration entry.
    #[must_use]
    pub fn with_config(mut self, key: impl Into<String>, value: Value) -> Self {
        self.ctx.config.insert(key.into(), value);
        self
    }

    /// Adds a secret under the given namespace.
    #[must_use]
    pub fn with_secret(
        mut self,
        namespace: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.ctx
            .secrets
            .entry(namespace.into())
            .or_default()
            .insert(key.into(), value.into());
        self
    }

    /// Finishes building, returning the context.
    #[must_use]
    pub fn build(self) -> RunContext {
        self.ctx
    }
}
