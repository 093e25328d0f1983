//! Task dispatcher — resolves a task to a tool, skill, or LLM call and
//! normalizes the outcome into one result envelope.
//!
//! Error contract: *routing* failures (unknown tool/skill, bad sub-tool)
//! are typed [`DispatchError`]s for the caller to surface; *execution*
//! failures (a tool body erroring, a provider failing) become
//! `{success:false, error}` envelopes. Exactly one envelope per task.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, warn};

use pincer_core::{Envelope, Task};
use pincer_providers::LlmProvider;

use crate::error::DispatchError;
use crate::skills::SkillRegistry;
use crate::tools::{Tool, ToolEntry, ToolRegistry};

/// Stateless request/response resolver over the registries.
pub struct Dispatcher {
    tools: ToolRegistry,
    skills: SkillRegistry,
    provider: Option<Arc<dyn LlmProvider>>,
}

impl Dispatcher {
    /// Create a dispatcher over pre-built registries.
    pub fn new(
        tools: ToolRegistry,
        skills: SkillRegistry,
        provider: Option<Arc<dyn LlmProvider>>,
    ) -> Self {
        Self {
            tools,
            skills,
            provider,
        }
    }

    /// The tool registry (read-only after startup).
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// The skill registry (read-only after startup).
    pub fn skills(&self) -> &SkillRegistry {
        &self.skills
    }

    /// Build a dispatcher with the standard tool and skill set.
    ///
    /// Registers: `exec`, `read`, `write`, `fetch`, `hash`, the `json` and
    /// `memory` namespaces, and the `memory` skill. The provider is optional;
    /// without one, `llm-call` tasks fail with an envelope.
    pub fn with_defaults(
        config: &pincer_core::config::Config,
        journal: Arc<pincer_core::MemoryJournal>,
        provider: Option<Arc<dyn LlmProvider>>,
    ) -> Self {
        use crate::skills::memory::MemorySkill;
        use crate::tools::{exec::ExecTool, fetch::FetchTool, filesystem, hash::HashTool};

        let workspace = std::env::current_dir().unwrap_or_else(|_| ".".into());

        let mut tools = ToolRegistry::new();
        tools.register(Arc::new(ExecTool::new(
            workspace,
            Some(config.tools.exec.timeout),
        )));
        tools.register(Arc::new(filesystem::ReadTool));
        tools.register(Arc::new(filesystem::WriteTool));
        tools.register(Arc::new(FetchTool::new(
            Some(config.tools.fetch.timeout),
            Some(config.tools.fetch.max_body_len),
        )));
        tools.register(Arc::new(HashTool));
        tools.register_namespace(crate::tools::json::json_namespace());
        tools.register_namespace(crate::tools::memory::memory_namespace(journal.clone()));

        let mut skills = SkillRegistry::new();
        skills.register(Arc::new(MemorySkill::new(journal)));

        Self::new(tools, skills, provider)
    }

    /// Resolve and execute a task.
    pub async fn dispatch(&self, task: &Task) -> Result<Envelope, DispatchError> {
        match task {
            Task::ToolCall { name, args } => {
                let entry = self
                    .tools
                    .get(name)
                    .ok_or_else(|| DispatchError::ToolNotFound(name.clone()))?;

                match entry {
                    ToolEntry::Flat(tool) => Ok(self.run_tool(tool, name, args).await),
                    ToolEntry::Namespace(namespace) => {
                        let sub = args.first().and_then(|v| v.as_str()).ok_or_else(|| {
                            DispatchError::InvalidTool {
                                tool: name.clone(),
                                sub: "(missing)".to_string(),
                            }
                        })?;
                        let tool =
                            namespace
                                .get(sub)
                                .ok_or_else(|| DispatchError::InvalidTool {
                                    tool: name.clone(),
                                    sub: sub.to_string(),
                                })?;
                        let label = format!("{name}.{sub}");
                        Ok(self.run_tool(tool, &label, &args[1..]).await)
                    }
                }
            }

            Task::SkillCall { name, args } => {
                let skill = self
                    .skills
                    .get(name)
                    .ok_or_else(|| DispatchError::SkillNotFound(name.clone()))?;

                debug!(skill = %name, args = args.len(), "executing skill");
                match skill.execute(args, &self.tools).await {
                    Ok(payload) => Ok(Envelope::ok(payload)),
                    Err(e) => {
                        warn!(skill = %name, error = %e, "skill execution failed");
                        Ok(Envelope::fail(format!("skill '{name}' failed: {e}")))
                    }
                }
            }

            Task::LlmCall { prompt, context } => {
                let Some(provider) = self.provider.as_ref() else {
                    return Ok(Envelope::fail("no LLM provider configured"));
                };

                debug!(provider = provider.display_name(), "executing llm call");
                match provider.generate(prompt, context.as_ref()).await {
                    Ok(content) => Ok(Envelope::ok(json!({
                        "provider": provider.display_name(),
                        "model": provider.model(),
                        "content": content,
                    }))),
                    Err(e) => {
                        warn!(provider = provider.display_name(), error = %e, "llm call failed");
                        Ok(Envelope::fail(e.to_string()))
                    }
                }
            }
        }
    }

    /// Run one tool and wrap the outcome.
    async fn run_tool(&self, tool: &Arc<dyn Tool>, label: &str, args: &[serde_json::Value]) -> Envelope {
        debug!(tool = %label, args = args.len(), "executing tool");
        match tool.execute(args).await {
            Ok(payload) => Envelope::ok(payload),
            Err(e) => {
                warn!(tool = %label, error = %e, "tool execution failed");
                Envelope::fail(format!("{label}: {e}"))
            }
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pincer_providers::ProviderError;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Records the args it was invoked with.
    struct RecordingTool {
        calls: Arc<tokio::sync::Mutex<Vec<Vec<Value>>>>,
    }

    #[async_trait]
    impl Tool for RecordingTool {
        fn name(&self) -> &str {
            "record"
        }
        fn description(&self) -> &str {
            "Records call args"
        }
        async fn execute(&self, args: &[Value]) -> anyhow::Result<Value> {
            self.calls.lock().await.push(args.to_vec());
            Ok(json!({"recorded": args.len()}))
        }
    }

    struct FailTool;

    #[async_trait]
    impl Tool for FailTool {
        fn name(&self) -> &str {
            "fail"
        }
        fn description(&self) -> &str {
            "Always fails"
        }
        async fn execute(&self, _args: &[Value]) -> anyhow::Result<Value> {
            anyhow::bail!("intentional failure")
        }
    }

    struct CountingProvider {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl LlmProvider for CountingProvider {
        async fn generate(
            &self,
            prompt: &str,
            _context: Option<&Value>,
        ) -> Result<String, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(ProviderError::NotConfigured("test".into()))
            } else {
                Ok(format!("reply to: {prompt}"))
            }
        }
        fn model(&self) -> &str {
            "test-model"
        }
        fn display_name(&self) -> &str {
            "TestProvider"
        }
    }

    fn dispatcher_with(
        tools: ToolRegistry,
        skills: SkillRegistry,
        provider: Option<Arc<dyn LlmProvider>>,
    ) -> Dispatcher {
        Dispatcher::new(tools, skills, provider)
    }

    #[tokio::test]
    async fn flat_tool_receives_exact_args() {
        let calls = Arc::new(tokio::sync::Mutex::new(Vec::new()));
        let mut tools = ToolRegistry::new();
        tools.register(Arc::new(RecordingTool {
            calls: calls.clone(),
        }));
        let dispatcher = dispatcher_with(tools, SkillRegistry::new(), None);

        let task = Task::ToolCall {
            name: "record".into(),
            args: vec![json!("a"), json!(2), json!({"k": true})],
        };
        let envelope = dispatcher.dispatch(&task).await.unwrap();

        assert!(envelope.success);
        assert_eq!(envelope.field("recorded"), Some(&json!(3)));
        let recorded = calls.lock().await;
        assert_eq!(recorded[0], vec![json!("a"), json!(2), json!({"k": true})]);
    }

    #[tokio::test]
    async fn unknown_tool_is_not_found_and_nothing_runs() {
        let calls = Arc::new(tokio::sync::Mutex::new(Vec::new()));
        let mut tools = ToolRegistry::new();
        tools.register(Arc::new(RecordingTool {
            calls: calls.clone(),
        }));
        let dispatcher = dispatcher_with(tools, SkillRegistry::new(), None);

        let task = Task::ToolCall {
            name: "doesnotexist".into(),
            args: vec![],
        };
        let err = dispatcher.dispatch(&task).await.unwrap_err();
        assert_eq!(err, DispatchError::ToolNotFound("doesnotexist".into()));
        assert!(calls.lock().await.is_empty());
    }

    #[tokio::test]
    async fn tool_failure_becomes_fail_envelope() {
        let mut tools = ToolRegistry::new();
        tools.register(Arc::new(FailTool));
        let dispatcher = dispatcher_with(tools, SkillRegistry::new(), None);

        let task = Task::ToolCall {
            name: "fail".into(),
            args: vec![],
        };
        let envelope = dispatcher.dispatch(&task).await.unwrap();
        assert!(!envelope.success);
        assert!(envelope.error.as_deref().unwrap().contains("intentional failure"));
    }

    #[tokio::test]
    async fn namespace_routes_to_subtool() {
        let calls = Arc::new(tokio::sync::Mutex::new(Vec::new()));
        let ns = crate::tools::ToolNamespace::new("group").insert(Arc::new(RecordingTool {
            calls: calls.clone(),
        }));
        let mut tools = ToolRegistry::new();
        tools.register_namespace(ns);
        let dispatcher = dispatcher_with(tools, SkillRegistry::new(), None);

        let task = Task::ToolCall {
            name: "group".into(),
            args: vec![json!("record"), json!("payload")],
        };
        let envelope = dispatcher.dispatch(&task).await.unwrap();
        assert!(envelope.success);
        // Sub-tool sees only the remaining args.
        assert_eq!(calls.lock().await[0], vec![json!("payload")]);
    }

    #[tokio::test]
    async fn namespace_bad_subtool_is_invalid() {
        let ns = crate::tools::ToolNamespace::new("group").insert(Arc::new(FailTool));
        let mut tools = ToolRegistry::new();
        tools.register_namespace(ns);
        let dispatcher = dispatcher_with(tools, SkillRegistry::new(), None);

        let task = Task::ToolCall {
            name: "group".into(),
            args: vec![json!("nope")],
        };
        let err = dispatcher.dispatch(&task).await.unwrap_err();
        assert_eq!(
            err,
            DispatchError::InvalidTool {
                tool: "group".into(),
                sub: "nope".into()
            }
        );
    }

    #[tokio::test]
    async fn namespace_missing_subtool_arg_is_invalid() {
        let ns = crate::tools::ToolNamespace::new("group").insert(Arc::new(FailTool));
        let mut tools = ToolRegistry::new();
        tools.register_namespace(ns);
        let dispatcher = dispatcher_with(tools, SkillRegistry::new(), None);

        let task = Task::ToolCall {
            name: "group".into(),
            args: vec![],
        };
        assert!(matches!(
            dispatcher.dispatch(&task).await.unwrap_err(),
            DispatchError::InvalidTool { .. }
        ));
    }

    #[tokio::test]
    async fn unknown_skill_is_not_found() {
        let dispatcher = dispatcher_with(ToolRegistry::new(), SkillRegistry::new(), None);
        let task = Task::SkillCall {
            name: "weather".into(),
            args: vec![],
        };
        let err = dispatcher.dispatch(&task).await.unwrap_err();
        assert_eq!(err, DispatchError::SkillNotFound("weather".into()));
    }

    #[tokio::test]
    async fn llm_call_wraps_content_with_provider_tag() {
        let provider = Arc::new(CountingProvider {
            calls: AtomicUsize::new(0),
            fail: false,
        });
        let dispatcher = dispatcher_with(
            ToolRegistry::new(),
            SkillRegistry::new(),
            Some(provider.clone()),
        );

        let task = Task::LlmCall {
            prompt: "hi".into(),
            context: None,
        };
        let envelope = dispatcher.dispatch(&task).await.unwrap();
        assert!(envelope.success);
        assert_eq!(envelope.field("provider"), Some(&json!("TestProvider")));
        assert_eq!(envelope.field("model"), Some(&json!("test-model")));
        assert_eq!(envelope.field("content"), Some(&json!("reply to: hi")));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn llm_provider_failure_is_fail_envelope() {
        let provider = Arc::new(CountingProvider {
            calls: AtomicUsize::new(0),
            fail: true,
        });
        let dispatcher =
            dispatcher_with(ToolRegistry::new(), SkillRegistry::new(), Some(provider));

        let task = Task::LlmCall {
            prompt: "hi".into(),
            context: None,
        };
        let envelope = dispatcher.dispatch(&task).await.unwrap();
        assert!(!envelope.success);
        assert!(envelope.error.is_some());
        // No error text masquerading as content.
        assert!(envelope.field("content").is_none());
    }

    #[tokio::test]
    async fn default_set_dispatches_hash() {
        let dir = tempfile::tempdir().unwrap();
        let journal = Arc::new(
            pincer_core::MemoryJournal::open(dir.path().join("MEMORY.md")).unwrap(),
        );
        let config = pincer_core::config::Config::default();
        let dispatcher = Dispatcher::with_defaults(&config, journal, None);

        let task = Task::ToolCall {
            name: "hash".into(),
            args: vec![json!("abc"), json!("sha256")],
        };
        let envelope = dispatcher.dispatch(&task).await.unwrap();
        assert!(envelope.success);
        let hash = envelope.field("hash").unwrap().as_str().unwrap();
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn default_set_memory_namespace_and_skill_share_journal() {
        let dir = tempfile::tempdir().unwrap();
        let journal = Arc::new(
            pincer_core::MemoryJournal::open(dir.path().join("MEMORY.md")).unwrap(),
        );
        let config = pincer_core::config::Config::default();
        let dispatcher = Dispatcher::with_defaults(&config, journal, None);

        // Append through the namespace tool…
        let append = Task::ToolCall {
            name: "memory".into(),
            args: vec![json!("append"), json!("shared note")],
        };
        assert!(dispatcher.dispatch(&append).await.unwrap().success);

        // …and observe it through the skill.
        let read = Task::SkillCall {
            name: "memory".into(),
            args: vec![json!("read")],
        };
        let envelope = dispatcher.dispatch(&read).await.unwrap();
        assert!(envelope
            .field("content")
            .unwrap()
            .as_str()
            .unwrap()
            .contains("shared note"));
    }

    #[tokio::test]
    async fn llm_call_without_provider_is_fail_envelope() {
        let dispatcher = dispatcher_with(ToolRegistry::new(), SkillRegistry::new(), None);
        let task = Task::LlmCall {
            prompt: "hi".into(),
            context: None,
        };
        let envelope = dispatcher.dispatch(&task).await.unwrap();
        assert!(!envelope.success);
        assert!(envelope
            .error
            .as_deref()
            .unwrap()
            .contains("no LLM provider"));
    }
}
