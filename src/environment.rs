//! Persistent chain of variable bindings. Extending an environment never
//! changes it; the new binding points back at the old chain, which stays
//! shared with every closure and call that holds it.

use std::fmt::Debug;
use std::rc::Rc;

use crate::closure_execution::Value;

/// A (possibly empty) chain of bindings, innermost first.
#[derive(Clone, Default)]
pub struct Environment {
    head: Option<Rc<Binding>>,
}

struct Binding {
    var_name: String,
    value: Value,
    parent: Environment,
}

impl Environment {
    /// The root environment, with nothing bound.
    pub fn empty() -> Self {
        Self { head: None }
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Returns a new environment binding `var_name` to `value` in front of
    /// this one.
    pub fn extend(&self, var_name: &str, value: Value) -> Self {
        Self {
            head: Some(Rc::new(Binding {
                var_name: String::from(var_name),
                value,
                parent: self.clone(),
            })),
        }
    }

    /// Looks up the innermost binding of `var_name`.
    pub fn lookup(&self, var_name: &str) -> Option<Value> {
        self.bindings()
            .find(|(bound_name, _)| *bound_name == var_name)
            .map(|(_, value)| value.clone())
    }

    /// Iterates over the bindings from innermost to outermost, shadowed ones
    /// included.
    pub fn bindings(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        let mut next = self.head.as_deref();

        std::iter::from_fn(move || {
            let binding = next?;
            next = binding.parent.head.as_deref();
            Some((binding.var_name.as_str(), &binding.value))
        })
    }

    /// Number of bindings in the chain.
    pub fn depth(&self) -> usize {
        self.bindings().count()
    }

    /// True if both environments are the very same chain.
    pub fn ptr_eq(&self, other: &Environment) -> bool {
        match (&self.head, &other.head) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.bindings().map(|(var_name, _)| var_name))
            .finish()
    }
}

// Unlinks the parent chain iteratively. Long chains would otherwise be dropped
// recursively, one stack frame per binding.
impl Drop for Binding {
    fn drop(&mut self) {
        let mut next = self.parent.head.take();

        while let Some(binding_rc) = next {
            match Rc::try_unwrap(binding_rc) {
                Ok(mut binding) => next = binding.parent.head.take(),
                Err(_) => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::closure_execution::Closure;
    use crate::syntax_tree::ExprNode;

    // A closure `\param param` used as an opaque value to bind.
    fn identity_value(param: &str) -> Value {
        Value::Closure(Rc::new(Closure {
            captured_env: Environment::empty(),
            formal_param: String::from(param),
            fn_body: Rc::new(ExprNode::name_ref(param)),
        }))
    }

    fn param_of(value: &Value) -> String {
        match value {
            Value::Closure(closure) => closure.formal_param.clone(),
        }
    }

    #[test]
    fn test_lookup_in_empty_environment() {
        let env = Environment::empty();

        assert!(env.is_empty());
        assert!(env.lookup("x").is_none());
    }

    #[test]
    fn test_innermost_binding_wins() {
        let outer = Environment::empty().extend("x", identity_value("a"));
        let inner = outer.extend("y", identity_value("b")).extend("x", identity_value("c"));

        assert_eq!(inner.lookup("x").map(|v| param_of(&v)), Some(String::from("c")));
        assert_eq!(inner.lookup("y").map(|v| param_of(&v)), Some(String::from("b")));
        assert_eq!(inner.depth(), 3);

        // The outer chain is untouched by extension.
        assert_eq!(outer.lookup("x").map(|v| param_of(&v)), Some(String::from("a")));
        assert!(outer.lookup("y").is_none());
        assert_eq!(outer.depth(), 1);
    }

    // Two children of the same parent see the parent's bindings but not each
    // other's.
    #[test]
    fn test_shared_parent() {
        let parent = Environment::empty().extend("x", identity_value("a"));
        let left = parent.extend("l", identity_value("b"));
        let right = parent.extend("r", identity_value("c"));

        assert!(left.lookup("x").is_some());
        assert!(right.lookup("x").is_some());
        assert!(left.lookup("r").is_none());
        assert!(right.lookup("l").is_none());

        drop(parent);
        assert_eq!(left.lookup("x").map(|v| param_of(&v)), Some(String::from("a")));
    }

    #[test]
    fn test_ptr_eq() {
        let env = Environment::empty().extend("x", identity_value("a"));
        let same = env.clone();
        let equal_but_distinct = Environment::empty().extend("x", identity_value("a"));

        assert!(env.ptr_eq(&same));
        assert!(!env.ptr_eq(&equal_but_distinct));
        assert!(Environment::empty().ptr_eq(&Environment::empty()));
    }

    #[test]
    fn test_debug_lists_names() {
        let env = Environment::empty()
            .extend("x", identity_value("a"))
            .extend("y", identity_value("b"));

        assert_eq!(format!("{:?}", env), r#"["y", "x"]"#);
    }

    // Dropping a very long chain must not overflow the stack.
    #[test]
    fn test_drop_long_chain() {
        let value = identity_value("a");
        let mut env = Environment::empty();

        for _ in 0..200_000 {
            env = env.extend("x", value.clone());
        }

        assert_eq!(env.depth(), 200_000);
        drop(env);
    }
}
