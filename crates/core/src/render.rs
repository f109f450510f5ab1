//! Render side channel: callbacks and the caller-owned registries that hold
//! them.
//!
//! Render callbacks are not part of either message representation. They ride
//! along on external messages (`generativeUI`) and on descriptors stored in an
//! [`ActionRegistry`] or [`AgentStateRegistry`]. The converters read and write
//! these registries; ownership always stays with the caller.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Descriptor name that matches any tool without a dedicated descriptor.
pub const WILDCARD: &str = "*";

/// Opaque UI document produced by a render callback.
pub type UiElement = Value;

/// A shared render callback.
#[derive(Clone)]
pub struct RenderFn(Arc<dyn Fn(RenderProps) -> Option<UiElement> + Send + Sync>);

impl RenderFn {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(RenderProps) -> Option<UiElement> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Invoke the callback.
    pub fn call(&self, props: RenderProps) -> Option<UiElement> {
        (self.0)(props)
    }

    /// Whether both handles point at the same callback.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl std::fmt::Debug for RenderFn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("RenderFn(..)")
    }
}

/// Callback a human-in-the-loop render uses to hand a response back.
#[derive(Clone)]
pub struct RespondFn(Arc<dyn Fn(Value) + Send + Sync>);

impl RespondFn {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Value) + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// A respond callback that discards its input.
    pub fn noop() -> Self {
        Self::new(|_| {})
    }

    pub fn call(&self, response: Value) {
        (self.0)(response)
    }
}

impl std::fmt::Debug for RespondFn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("RespondFn(..)")
    }
}

/// Lifecycle status of a tool call as seen by a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ToolCallStatus {
    /// Arguments are still streaming in
    InProgress,
    /// The call is running, no result yet
    Executing,
    /// A correlated result exists
    Complete,
}

impl ToolCallStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InProgress => "inProgress",
            Self::Executing => "executing",
            Self::Complete => "complete",
        }
    }
}

impl std::fmt::Display for ToolCallStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Props handed to a render callback.
///
/// The same bag doubles as the override set a UI passes to an action wrapper:
/// fields set here win over computed values, except the tool `name` handed to
/// wildcard renders. Agent-state wrappers ignore overrides.
#[derive(Debug, Clone, Default)]
pub struct RenderProps {
    pub status: Option<ToolCallStatus>,
    pub args: Option<Value>,
    pub result: Option<Value>,
    pub message_id: Option<String>,
    /// Concrete tool name, supplied to wildcard renders
    pub name: Option<String>,
    /// Agent state, supplied to agent-state renders
    pub state: Option<Value>,
    /// Supplied to tool-specific renders
    pub respond: Option<RespondFn>,
    /// Caller-defined props passed through untouched
    pub extra: Map<String, Value>,
}

impl RenderProps {
    pub fn with_status(mut self, status: ToolCallStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_result(mut self, result: impl Into<Value>) -> Self {
        self.result = Some(result.into());
        self
    }

    pub fn with_respond(mut self, respond: RespondFn) -> Self {
        self.respond = Some(respond);
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Something a registry can resolve by name.
pub trait Descriptor {
    fn name(&self) -> &str;
    fn render(&self) -> Option<&RenderFn>;
    fn set_render(&mut self, render: RenderFn);
}

/// Associates a tool name (or [`WILDCARD`]) with an optional render callback.
#[derive(Debug, Clone)]
pub struct ActionDescriptor {
    pub name: String,
    pub render: Option<RenderFn>,
}

impl ActionDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            render: None,
        }
    }

    /// A descriptor that catches every tool without its own descriptor.
    pub fn wildcard() -> Self {
        Self::new(WILDCARD)
    }

    pub fn with_render(mut self, render: RenderFn) -> Self {
        self.render = Some(render);
        self
    }

    pub fn is_wildcard(&self) -> bool {
        self.name == WILDCARD
    }
}

impl Descriptor for ActionDescriptor {
    fn name(&self) -> &str {
        &self.name
    }

    fn render(&self) -> Option<&RenderFn> {
        self.render.as_ref()
    }

    fn set_render(&mut self, render: RenderFn) {
        self.render = Some(render);
    }
}

/// Associates an agent name with an optional state render callback.
#[derive(Debug, Clone)]
pub struct AgentStateDescriptor {
    pub name: String,
    pub render: Option<RenderFn>,
}

impl AgentStateDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            render: None,
        }
    }

    pub fn with_render(mut self, render: RenderFn) -> Self {
        self.render = Some(render);
        self
    }
}

impl Descriptor for AgentStateDescriptor {
    fn name(&self) -> &str {
        &self.name
    }

    fn render(&self) -> Option<&RenderFn> {
        self.render.as_ref()
    }

    fn set_render(&mut self, render: RenderFn) {
        self.render = Some(render);
    }
}

/// How a descriptor was matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Specific,
    Wildcard,
}

/// A descriptor found by [`Registry::resolve`].
#[derive(Debug)]
pub struct Resolved<'a, D> {
    pub key: &'a str,
    pub descriptor: &'a D,
    pub kind: MatchKind,
}

/// A caller-owned, insertion-ordered map of descriptors.
///
/// Keys are arbitrary; lookups match on the descriptor's own `name`, so two
/// keys may hold descriptors with the same name. Iteration (and therefore
/// tie-breaking between duplicates) follows first insertion order.
#[derive(Debug, Clone)]
pub struct Registry<D> {
    entries: IndexMap<String, D>,
}

pub type ActionRegistry = Registry<ActionDescriptor>;
pub type AgentStateRegistry = Registry<AgentStateDescriptor>;

impl<D> Default for Registry<D> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<D: Descriptor> Registry<D> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert under an explicit key. Replacing an existing key keeps its
    /// original position.
    pub fn insert(&mut self, key: impl Into<String>, descriptor: D) -> Option<D> {
        self.entries.insert(key.into(), descriptor)
    }

    /// Insert keyed by the descriptor's own name.
    pub fn register(&mut self, descriptor: D) -> Option<D> {
        let key = descriptor.name().to_string();
        self.insert(key, descriptor)
    }

    pub fn get(&self, key: &str) -> Option<&D> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut D> {
        self.entries.get_mut(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<D> {
        self.entries.shift_remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &D)> {
        self.entries.iter().map(|(k, d)| (k.as_str(), d))
    }

    /// First descriptor (in insertion order) whose name equals `name`.
    pub fn find(&self, name: &str) -> Option<(&str, &D)> {
        self.iter().find(|(_, d)| d.name() == name)
    }

    /// Resolve `name`: an exact descriptor wins, otherwise the first wildcard.
    pub fn resolve(&self, name: &str) -> Option<Resolved<'_, D>> {
        let (key, descriptor) = self.find(name).or_else(|| self.find(WILDCARD))?;
        let kind = if descriptor.name() == WILDCARD {
            MatchKind::Wildcard
        } else {
            MatchKind::Specific
        };
        Some(Resolved {
            key,
            descriptor,
            kind,
        })
    }

    /// Assign a render to the descriptor stored under `key`.
    pub fn set_render(&mut self, key: &str, render: RenderFn) -> bool {
        match self.entries.get_mut(key) {
            Some(descriptor) => {
                descriptor.set_render(render);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tagged(tag: &'static str) -> RenderFn {
        RenderFn::new(move |_| Some(json!(tag)))
    }

    #[test]
    fn specific_name_wins_over_wildcard() {
        let mut registry = ActionRegistry::new();
        registry.insert("*", ActionDescriptor::wildcard());
        registry.insert("specific", ActionDescriptor::new("foo"));

        let resolved = registry.resolve("foo").unwrap();
        assert_eq!(resolved.key, "specific");
        assert_eq!(resolved.kind, MatchKind::Specific);

        let fallback = registry.resolve("bar").unwrap();
        assert_eq!(fallback.key, "*");
        assert_eq!(fallback.kind, MatchKind::Wildcard);
    }

    #[test]
    fn first_inserted_wildcard_wins() {
        let mut registry = ActionRegistry::new();
        registry.insert("catch-all-a", ActionDescriptor::wildcard());
        registry.insert("catch-all-b", ActionDescriptor::wildcard());
        assert_eq!(registry.resolve("anything").unwrap().key, "catch-all-a");

        // Re-inserting an existing key keeps its slot.
        registry.insert("catch-all-a", ActionDescriptor::wildcard());
        assert_eq!(registry.resolve("anything").unwrap().key, "catch-all-a");
    }

    #[test]
    fn resolve_without_candidates() {
        let mut registry = ActionRegistry::new();
        assert!(registry.resolve("foo").is_none());
        registry.register(ActionDescriptor::new("other"));
        assert!(registry.resolve("foo").is_none());
    }

    #[test]
    fn set_render_targets_key() {
        let mut registry = AgentStateRegistry::new();
        registry.register(AgentStateDescriptor::new("planner"));
        assert!(registry.set_render("planner", tagged("plan")));
        assert!(!registry.set_render("missing", tagged("none")));

        let render = registry.get("planner").unwrap().render().unwrap();
        assert_eq!(render.call(RenderProps::default()), Some(json!("plan")));
    }

    #[test]
    fn remove_preserves_order_of_the_rest() {
        let mut registry = ActionRegistry::new();
        registry.register(ActionDescriptor::new("a"));
        registry.register(ActionDescriptor::new("b"));
        registry.register(ActionDescriptor::new("c"));
        registry.remove("a");
        let keys: Vec<_> = registry.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["b", "c"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn render_fn_identity() {
        let a = tagged("a");
        let b = a.clone();
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&tagged("a")));
    }

    #[test]
    fn status_wire_names() {
        assert_eq!(ToolCallStatus::InProgress.to_string(), "inProgress");
        assert_eq!(
            serde_json::to_value(ToolCallStatus::Complete).unwrap(),
            json!("complete")
        );
    }
}
