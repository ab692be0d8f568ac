//! Named fan-out call lists
//!
//! An [`EventTrigger`] holds `(listener, method, context)` bindings under
//! unique names and calls all of them, in insertion order, when triggered.
//! It is independent of the entity model: listeners only have to implement
//! [`EventTarget`] for the context type passed to [`EventTrigger::trigger`].

use crate::scene::error::SceneResult;

pub use crate::ecs::capability::EventArg;

/// Something a binding can call
pub trait EventTarget<C: ?Sized> {
    /// Call `method` on the target with `args`
    fn invoke(&self, ctx: &mut C, method: &str, args: &[EventArg]) -> SceneResult<()>;
}

/// One registered call
#[derive(Debug, Clone, PartialEq)]
pub struct Binding<L> {
    /// Target of the call
    pub listener: L,
    /// Method invoked on the target
    pub method: String,
    /// Extra argument appended after the trigger arguments
    pub context: Option<EventArg>,
}

/// Insertion-ordered set of named bindings
#[derive(Debug, Clone)]
pub struct EventTrigger<L> {
    bindings: Vec<(String, Binding<L>)>,
    auto_index: u64,
}

impl<L> Default for EventTrigger<L> {
    fn default() -> Self {
        Self { bindings: Vec::new(), auto_index: 0 }
    }
}

impl<L> EventTrigger<L> {
    /// Create an empty trigger
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a binding and return its name
    ///
    /// Without a name the next counter value (`"0"`, `"1"`, ...) is used.
    /// Reusing a name replaces that binding without moving it.
    pub fn add(
        &mut self,
        listener: L,
        method: impl Into<String>,
        name: Option<&str>,
        context: Option<EventArg>,
    ) -> String {
        let name = match name {
            Some(name) => name.to_string(),
            None => {
                let name = self.auto_index.to_string();
                self.auto_index += 1;
                name
            }
        };

        let binding = Binding { listener, method: method.into(), context };
        match self.bindings.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = binding,
            None => self.bindings.push((name.clone(), binding)),
        }
        name
    }

    /// Remove a binding; unknown names are ignored
    pub fn remove(&mut self, name: &str) {
        self.bindings.retain(|(existing, _)| existing != name);
    }

    /// Call every binding in insertion order
    ///
    /// Each listener receives `args` followed by its own bound context.
    /// The first listener error stops the fan-out and is returned.
    pub fn trigger<C: ?Sized>(&self, ctx: &mut C, args: &[EventArg]) -> SceneResult<()>
    where
        L: EventTarget<C>,
    {
        for (_, binding) in &self.bindings {
            match &binding.context {
                Some(context) => {
                    let mut call_args = Vec::with_capacity(args.len() + 1);
                    call_args.extend_from_slice(args);
                    call_args.push(context.clone());
                    binding.listener.invoke(ctx, &binding.method, &call_args)?;
                }
                None => binding.listener.invoke(ctx, &binding.method, args)?,
            }
        }
        Ok(())
    }

    /// Binding registered under `name`
    pub fn get(&self, name: &str) -> Option<&Binding<L>> {
        self.bindings.iter().find(|(existing, _)| existing == name).map(|(_, binding)| binding)
    }

    /// Whether `name` is registered
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Binding names in call order
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.bindings.iter().map(|(name, _)| name.as_str())
    }

    /// Number of bindings
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether there are no bindings
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Drop every binding; the auto-name counter keeps counting
    pub fn clear(&mut self) {
        self.bindings.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::error::SceneError;
    use serde_json::json;

    #[derive(Default)]
    struct CallLog {
        calls: Vec<(&'static str, String, Vec<EventArg>)>,
    }

    #[derive(Clone, Copy)]
    struct Listener(&'static str);

    impl EventTarget<CallLog> for Listener {
        fn invoke(&self, ctx: &mut CallLog, method: &str, args: &[EventArg]) -> SceneResult<()> {
            if method == "fail" {
                return Err(SceneError::behavior(format!("{} failed", self.0)));
            }
            ctx.calls.push((self.0, method.to_string(), args.to_vec()));
            Ok(())
        }
    }

    #[test]
    fn test_trigger_invokes_once_with_args() {
        let mut trigger = EventTrigger::new();
        trigger.add(Listener("obj"), "foo", None, None);

        let mut log = CallLog::default();
        trigger.trigger(&mut log, &[json!(1), json!(2)]).unwrap();

        assert_eq!(log.calls, vec![("obj", "foo".to_string(), vec![json!(1), json!(2)])]);
    }

    #[test]
    fn test_removed_binding_is_not_invoked() {
        let mut trigger = EventTrigger::new();
        let name = trigger.add(Listener("obj"), "foo", None, None);
        trigger.remove(&name);
        trigger.remove("never-added");

        let mut log = CallLog::default();
        trigger.trigger(&mut log, &[]).unwrap();
        assert!(log.calls.is_empty());
        assert!(trigger.is_empty());
    }

    #[test]
    fn test_auto_names_count_up() {
        let mut trigger = EventTrigger::new();
        assert_eq!(trigger.add(Listener("a"), "m", None, None), "0");
        assert_eq!(trigger.add(Listener("b"), "m", Some("named"), None), "named");
        assert_eq!(trigger.add(Listener("c"), "m", None, None), "1");
        assert_eq!(trigger.len(), 3);
    }

    #[test]
    fn test_context_is_appended_per_binding() {
        let mut trigger = EventTrigger::new();
        trigger.add(Listener("a"), "enable", None, Some(json!(true)));
        trigger.add(Listener("b"), "enable", None, Some(json!(false)));
        trigger.add(Listener("c"), "enable", None, None);

        let mut log = CallLog::default();
        trigger.trigger(&mut log, &[json!("go")]).unwrap();

        let args: Vec<_> = log.calls.iter().map(|(_, _, args)| args.clone()).collect();
        assert_eq!(
            args,
            vec![
                vec![json!("go"), json!(true)],
                vec![json!("go"), json!(false)],
                vec![json!("go")],
            ]
        );
    }

    #[test]
    fn test_reused_name_replaces_in_place() {
        let mut trigger = EventTrigger::new();
        trigger.add(Listener("first"), "m", Some("x"), None);
        trigger.add(Listener("second"), "m", Some("y"), None);
        trigger.add(Listener("third"), "m", Some("x"), None);

        assert_eq!(trigger.names().collect::<Vec<_>>(), vec!["x", "y"]);

        let mut log = CallLog::default();
        trigger.trigger(&mut log, &[]).unwrap();
        let order: Vec<_> = log.calls.iter().map(|(who, _, _)| *who).collect();
        assert_eq!(order, vec!["third", "second"]);
    }

    #[test]
    fn test_failing_listener_stops_fan_out() {
        let mut trigger = EventTrigger::new();
        trigger.add(Listener("a"), "ok", None, None);
        trigger.add(Listener("b"), "fail", None, None);
        trigger.add(Listener("c"), "ok", None, None);

        let mut log = CallLog::default();
        assert!(trigger.trigger(&mut log, &[]).is_err());
        assert_eq!(log.calls.len(), 1);
    }

    #[test]
    fn test_clear_keeps_counter() {
        let mut trigger = EventTrigger::new();
        trigger.add(Listener("a"), "m", None, None);
        trigger.clear();
        assert!(!trigger.contains("0"));
        assert_eq!(trigger.add(Listener("a"), "m", None, None), "1");
    }
}
