//! Classes (SPEC_FULL.md §3, §4.1). A class holds instance- and
//! class-method tables, an optional superclass link, and a constant table.
//! Classes are themselves objects — see [`crate::object::Object::Class`].

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::object::Object;

use super::method::MethodEntry;

/// A method table: name → built-in descriptor or user-defined instruction set.
pub type MethodTable = HashMap<String, MethodEntry>;

/// Shared handle to a class. Classes are mutated in place (method
/// installation, constant definition) and are referenced from many
/// instances and from the registry, so `Rc<RefCell<_>>` is the natural
/// representation — matching SPEC_FULL.md §5's "serialize writers, publish
/// under a fence" requirement at the single-threaded granularity this core
/// targets (see `ClassRegistry` for the cross-thread story).
pub type ClassRef = Rc<RefCell<Class>>;

pub struct Class {
    pub name: String,
    pub instance_methods: MethodTable,
    pub class_methods: MethodTable,
    pub superclass: Option<ClassRef>,
    pub constants: HashMap<String, Object>,
}

impl Class {
    pub fn new(name: impl Into<String>) -> ClassRef {
        Rc::new(RefCell::new(Class {
            name: name.into(),
            instance_methods: MethodTable::new(),
            class_methods: MethodTable::new(),
            superclass: None,
            constants: HashMap::new(),
        }))
    }

    pub fn with_superclass(name: impl Into<String>, superclass: ClassRef) -> ClassRef {
        Rc::new(RefCell::new(Class {
            name: name.into(),
            instance_methods: MethodTable::new(),
            class_methods: MethodTable::new(),
            superclass: Some(superclass),
            constants: HashMap::new(),
        }))
    }

    /// Walks `self`, then the superclass chain, looking for `method` in
    /// either the instance or class method table (SPEC_FULL.md §4.1: "first
    /// hit wins").
    pub fn lookup_method(class: &ClassRef, method: &str, as_class_method: bool) -> Option<MethodEntry> {
        let mut current = Some(Rc::clone(class));
        while let Some(c) = current {
            let borrowed = c.borrow();
            let table = if as_class_method {
                &borrowed.class_methods
            } else {
                &borrowed.instance_methods
            };
            if let Some(entry) = table.get(method) {
                return Some(entry.clone());
            }
            current = borrowed.superclass.clone();
        }
        None
    }

    /// The fully-qualified name reported in `NoMethodError` messages.
    pub fn qualified_name(class: &ClassRef) -> String {
        class.borrow().name.clone()
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("name", &self.name)
            .field("superclass", &self.superclass.as_ref().map(|s| s.borrow().name.clone()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::method::Arity;
    use crate::source_line::SourceLine;
    use crate::thread::Thread;

    fn noop(_receiver: &Object, _line: SourceLine, _thread: &mut Thread, _args: &[Object], _block: Option<&Object>) -> Object {
        Object::Nil
    }

    #[test]
    fn lookup_method_finds_a_method_defined_directly_on_the_class() {
        let class = Class::new("Widget");
        class
            .borrow_mut()
            .instance_methods
            .insert("greet".to_string(), MethodEntry::builtin("greet", Arity::Exact(0), noop));

        assert!(Class::lookup_method(&class, "greet", false).is_some());
        assert!(Class::lookup_method(&class, "missing", false).is_none());
    }

    #[test]
    fn lookup_method_walks_the_superclass_chain() {
        let base = Class::new("Base");
        base.borrow_mut()
            .instance_methods
            .insert("greet".to_string(), MethodEntry::builtin("greet", Arity::Exact(0), noop));
        let middle = Class::with_superclass("Middle", Rc::clone(&base));
        let derived = Class::with_superclass("Derived", Rc::clone(&middle));

        assert!(Class::lookup_method(&derived, "greet", false).is_some());
    }

    #[test]
    fn lookup_method_stops_at_the_nearest_override() {
        let base = Class::new("Base");
        base.borrow_mut()
            .instance_methods
            .insert("name".to_string(), MethodEntry::builtin("name", Arity::Exact(0), noop));
        let derived = Class::with_superclass("Derived", Rc::clone(&base));
        derived
            .borrow_mut()
            .instance_methods
            .insert("name".to_string(), MethodEntry::builtin("name", Arity::Exact(0), noop));

        // Both tables have an entry; the walk must not panic or loop and
        // must still report a hit from the nearest class.
        assert!(Class::lookup_method(&derived, "name", false).is_some());
    }

    #[test]
    fn instance_and_class_method_tables_are_independent() {
        let class = Class::new("Thing");
        class
            .borrow_mut()
            .class_methods
            .insert("build".to_string(), MethodEntry::builtin("build", Arity::Exact(0), noop));

        assert!(Class::lookup_method(&class, "build", true).is_some());
        assert!(Class::lookup_method(&class, "build", false).is_none());
    }

    #[test]
    fn lookup_method_on_a_root_class_with_no_match_returns_none() {
        let class = Class::new("Lonely");
        assert!(Class::lookup_method(&class, "anything", false).is_none());
    }

    #[test]
    fn qualified_name_reports_the_classs_own_name() {
        let class = Class::new("Widget");
        assert_eq!(Class::qualified_name(&class), "Widget");
    }
}
