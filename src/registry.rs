//! The class registry (SPEC_FULL.md §3 "VM", §4.1, §5).
//!
//! Shared across every thread spawned from the same [`crate::vm::Vm`]:
//! populated during bootstrap, then read-mostly. Writers (class/method
//! redefinition at runtime) go through `&mut` access gated behind
//! `RefCell`'s runtime borrow check, which is sufficient for this core's
//! single-writer-per-instant execution model (SPEC_FULL.md §5: "the
//! operand stack and call-frame stack have single-writer semantics").

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::object::error_object::{name_error, ErrorKind};
use crate::object::{Class, ClassRef};

/// Top-level classes by name, plus the singleton metaclass used to answer
/// `class()` for class objects themselves.
pub struct ClassRegistry {
    classes: RefCell<HashMap<String, ClassRef>>,
    class_class: ClassRef,
}

impl ClassRegistry {
    pub fn new() -> Self {
        let class_class = Class::new("Class");
        let mut classes = HashMap::new();
        classes.insert("Class".to_string(), Rc::clone(&class_class));
        Self {
            classes: RefCell::new(classes),
            class_class,
        }
    }

    /// `top_level_class(name) → Class` (SPEC_FULL.md §4.1): fails with
    /// `NameError` when absent. The error is returned as a plain `String`
    /// here — callers at the dispatch layer wrap it into a language-level
    /// `NameError` object carrying the current source line.
    pub fn top_level_class(&self, name: &str) -> Result<ClassRef, String> {
        self.classes
            .borrow()
            .get(name)
            .cloned()
            .ok_or_else(|| name.to_string())
    }

    pub fn top_level_class_or_error(&self, name: &str, line: crate::source_line::SourceLine) -> Result<ClassRef, crate::object::ErrorObject> {
        self.top_level_class(name).map_err(|missing| name_error(line, &missing))
    }

    /// `initialize_class(name) → Class` (SPEC_FULL.md §4.1): idempotent.
    pub fn initialize_class(&self, name: &str) -> ClassRef {
        if let Some(existing) = self.classes.borrow().get(name) {
            return Rc::clone(existing);
        }
        let class = Class::new(name);
        self.classes.borrow_mut().insert(name.to_string(), Rc::clone(&class));
        class
    }

    pub fn initialize_subclass(&self, name: &str, superclass: ClassRef) -> ClassRef {
        if let Some(existing) = self.classes.borrow().get(name) {
            return Rc::clone(existing);
        }
        let class = Class::with_superclass(name, superclass);
        self.classes.borrow_mut().insert(name.to_string(), Rc::clone(&class));
        class
    }

    /// `set_builtin_methods(class, methods, is_class_method)`
    /// (SPEC_FULL.md §4.1): re-installation overwrites.
    pub fn set_builtin_methods(
        &self,
        class: &ClassRef,
        methods: impl IntoIterator<Item = (&'static str, crate::object::Arity, crate::object::BuiltinFn)>,
        is_class_method: bool,
    ) {
        let mut class = class.borrow_mut();
        for (name, arity, handler) in methods {
            let entry = crate::object::MethodEntry::builtin(name, arity, handler);
            if is_class_method {
                class.class_methods.insert(name.to_string(), entry);
            } else {
                class.instance_methods.insert(name.to_string(), entry);
            }
        }
    }

    pub fn error_class(&self, kind: ErrorKind) -> ClassRef {
        self.initialize_class(kind.class_name())
    }

    /// The metaclass every `Class` object answers `class()` with.
    pub fn class_of_class(&self, _c: &ClassRef) -> ClassRef {
        Rc::clone(&self.class_class)
    }

    pub fn all_class_names(&self) -> Vec<String> {
        self.classes.borrow().keys().cloned().collect()
    }
}

impl Default for ClassRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initialize_class_is_idempotent() {
        let registry = ClassRegistry::new();
        let first = registry.initialize_class("Widget");
        let second = registry.initialize_class("Widget");
        assert!(Rc::ptr_eq(&first, &second));
    }

    #[test]
    fn top_level_class_fails_with_the_missing_name_on_a_miss() {
        let registry = ClassRegistry::new();
        assert_eq!(registry.top_level_class("Nope").unwrap_err(), "Nope");
    }

    #[test]
    fn top_level_class_finds_a_registered_class() {
        let registry = ClassRegistry::new();
        registry.initialize_class("Widget");
        assert!(registry.top_level_class("Widget").is_ok());
    }

    #[test]
    fn initialize_subclass_links_the_superclass() {
        let registry = ClassRegistry::new();
        let base = registry.initialize_class("Base");
        let derived = registry.initialize_subclass("Derived", Rc::clone(&base));
        assert!(Rc::ptr_eq(derived.borrow().superclass.as_ref().unwrap(), &base));
    }

    #[test]
    fn class_of_class_is_the_same_metaclass_for_every_class() {
        let registry = ClassRegistry::new();
        let a = registry.initialize_class("A");
        let b = registry.initialize_class("B");
        assert!(Rc::ptr_eq(&registry.class_of_class(&a), &registry.class_of_class(&b)));
    }

    #[test]
    fn class_registered_under_class_matches_the_metaclass() {
        // Exercises the fix that keeps `GetConstant("Class")` and
        // `class_of_class` answering the same `ClassRef` (SPEC_FULL.md §4.1).
        let registry = ClassRegistry::new();
        let looked_up = registry.top_level_class("Class").unwrap();
        let some_class = registry.initialize_class("Whatever");
        assert!(Rc::ptr_eq(&looked_up, &registry.class_of_class(&some_class)));
    }

    #[test]
    fn set_builtin_methods_installs_into_the_requested_table() {
        fn noop(
            _receiver: &crate::object::Object,
            _line: crate::source_line::SourceLine,
            _thread: &mut crate::thread::Thread,
            _args: &[crate::object::Object],
            _block: Option<&crate::object::Object>,
        ) -> crate::object::Object {
            crate::object::Object::Nil
        }

        let registry = ClassRegistry::new();
        let class = registry.initialize_class("Thing");
        registry.set_builtin_methods(
            &class,
            [("greet", crate::object::Arity::Exact(0), noop as crate::object::BuiltinFn)],
            false,
        );
        assert!(Class::lookup_method(&class, "greet", false).is_some());
        assert!(Class::lookup_method(&class, "greet", true).is_none());
    }
}
