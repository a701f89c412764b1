//! The value model (SPEC_FULL.md §3, §9 "Polymorphic object model"): a
//! tagged universe of objects, class metadata, and the small capability set
//! every object answers (`class`, `inspect`, `to_string`, `to_json`).

pub mod block;
pub mod class;
pub mod decimal;
pub mod error_object;
pub mod instance;
pub mod integer;
pub mod method;
pub mod numeric;
pub mod opaque;

use std::cell::RefCell;
use std::rc::Rc;

use num_bigint::BigInt;
use serde_json::Value as Json;

use crate::registry::ClassRegistry;
use crate::thread::Thread;

pub use block::BlockObj;
pub use class::{Class, ClassRef};
pub use decimal::DecimalObj;
pub use error_object::{ErrorKind, ErrorObject};
pub use instance::{Instance, InstanceRef};
pub use integer::IntegerObj;
pub use method::{Arity, BuiltinFn, BuiltinMethod, MethodEntry};
pub use numeric::NumericView;
pub use opaque::OpaqueObj;

pub type ArrayRef = Rc<RefCell<Vec<Object>>>;
pub type HashRef = Rc<RefCell<Vec<(Object, Object)>>>;
pub type StringRef = Rc<String>;

/// Every runtime value (SPEC_FULL.md §3).
#[derive(Debug, Clone)]
pub enum Object {
    Nil,
    Boolean(bool),
    Integer(IntegerObj),
    Float(f64),
    Decimal(DecimalObj),
    Str(StringRef),
    Array(ArrayRef),
    Hash(HashRef),
    Range(Box<Object>, Box<Object>, bool),
    Block(Rc<BlockObj>),
    Error(Rc<ErrorObject>),
    Class(ClassRef),
    Instance(InstanceRef),
    Opaque(OpaqueObj),
}

impl Object {
    pub fn nil() -> Self {
        Object::Nil
    }

    pub fn bool(value: bool) -> Self {
        Object::Boolean(value)
    }

    pub fn int(value: impl Into<BigInt>) -> Self {
        Object::Integer(IntegerObj::new(value))
    }

    pub fn float(value: f64) -> Self {
        Object::Float(value)
    }

    pub fn string(value: impl Into<String>) -> Self {
        Object::Str(Rc::new(value.into()))
    }

    pub fn error(kind: ErrorKind, source_line: crate::source_line::SourceLine, message: impl Into<String>) -> Self {
        Object::Error(Rc::new(error_object::init_error_object(kind, source_line, message)))
    }

    /// `nil` and `false` are the only falsy values; everything else,
    /// including `0` and `0.0`, is truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Object::Nil | Object::Boolean(false))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Object::Error(_))
    }

    /// The Numeric capability view, when this object offers it
    /// (SPEC_FULL.md §3, §4.5: "if x offers the Numeric capability").
    pub fn as_numeric(&self) -> Option<NumericView<'_>> {
        match self {
            Object::Integer(i) => Some(NumericView::Integer(i)),
            Object::Float(f) => Some(NumericView::Float(*f)),
            Object::Decimal(d) => Some(NumericView::Decimal(d)),
            _ => None,
        }
    }

    /// The built-in class name for variant kinds whose class is a
    /// process-wide singleton rather than stored per instance.
    fn builtin_class_name(&self) -> Option<&'static str> {
        match self {
            Object::Nil => Some("NilClass"),
            Object::Boolean(_) => Some("Boolean"),
            Object::Integer(_) => Some("Integer"),
            Object::Float(_) => Some("Float"),
            Object::Decimal(_) => Some("Decimal"),
            Object::Str(_) => Some("String"),
            Object::Array(_) => Some("Array"),
            Object::Hash(_) => Some("Hash"),
            Object::Range(..) => Some("Range"),
            Object::Block(_) => Some("Block"),
            Object::Error(e) => Some(e.kind.class_name()),
            Object::Class(_) => Some("Class"),
            Object::Instance(_) => None,
            Object::Opaque(_) => Some("Opaque"),
        }
    }

    /// The `class()` capability (SPEC_FULL.md §3). Looks the class up in
    /// the registry for built-in kinds; returns the stored class reference
    /// directly for instances and for classes themselves (a `Class` is its
    /// own kind of object, per SPEC_FULL.md §3: "Classes are themselves
    /// objects").
    pub fn class(&self, registry: &ClassRegistry) -> ClassRef {
        match self {
            Object::Instance(inst) => Rc::clone(&inst.borrow().class),
            Object::Class(c) => registry.class_of_class(c),
            _ => {
                let name = self.builtin_class_name().expect("every non-instance variant names a builtin class");
                registry.top_level_class(name).unwrap_or_else(|_| {
                    panic!("builtin class {name:?} missing from registry; bootstrap did not run")
                })
            }
        }
    }

    /// The developer-facing `inspect()` capability: unambiguous, shows type.
    pub fn inspect(&self) -> String {
        match self {
            Object::Nil => "nil".to_string(),
            Object::Boolean(b) => b.to_string(),
            Object::Integer(i) => i.to_string(),
            Object::Float(f) => format_float(*f),
            Object::Decimal(d) => d.to_string(),
            Object::Str(s) => format!("{:?}", s.as_str()),
            Object::Array(items) => {
                let inner: Vec<String> = items.borrow().iter().map(Object::inspect).collect();
                format!("[{}]", inner.join(", "))
            }
            Object::Hash(pairs) => {
                let inner: Vec<String> = pairs
                    .borrow()
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k.inspect(), v.inspect()))
                    .collect();
                format!("{{{}}}", inner.join(", "))
            }
            Object::Range(from, to, exclusive) => {
                format!("{}{}{}", from.inspect(), if *exclusive { "..." } else { ".." }, to.inspect())
            }
            Object::Block(_) => "#<Block>".to_string(),
            Object::Error(e) => format!("#<{}: {}>", e.kind.class_name(), e.message),
            Object::Class(c) => c.borrow().name.clone(),
            Object::Instance(inst) => format!("#<{}>", inst.borrow().class.borrow().name),
            Object::Opaque(o) => format!("#<Opaque:{}>", o.tag),
        }
    }

    /// The user-facing `to_string()` capability. Differs from `inspect()`
    /// for the kinds that have a "plain" rendering distinct from their
    /// debug form (strings drop their quoting; everything else is the same
    /// as `inspect()` in this core, since richer `to_s` overrides for
    /// collections are a standard-library concern out of scope here).
    pub fn to_string_repr(&self) -> String {
        match self {
            Object::Str(s) => s.as_str().to_string(),
            other => other.inspect(),
        }
    }

    /// The `to_json(thread)` capability (SPEC_FULL.md §3). Instances may
    /// carry a user-defined `to_json` override; primitives map onto the
    /// natural JSON shape.
    pub fn to_json(&self, thread: &mut Thread) -> Json {
        match self {
            Object::Nil => Json::Null,
            Object::Boolean(b) => Json::Bool(*b),
            Object::Integer(i) => serde_json::Number::from_str_unwrap(&i.value.to_string())
                .map(Json::Number)
                .unwrap_or_else(|| Json::String(i.value.to_string())),
            Object::Float(f) => serde_json::Number::from_f64(*f).map(Json::Number).unwrap_or(Json::Null),
            Object::Decimal(d) => Json::String(d.to_string()),
            Object::Str(s) => Json::String(s.as_str().to_string()),
            Object::Array(items) => Json::Array(items.borrow().iter().map(|o| o.to_json(thread)).collect()),
            Object::Hash(pairs) => {
                let mut map = serde_json::Map::new();
                for (k, v) in pairs.borrow().iter() {
                    map.insert(k.to_string_repr(), v.to_json(thread));
                }
                Json::Object(map)
            }
            Object::Range(from, to, exclusive) => {
                let mut map = serde_json::Map::new();
                map.insert("from".to_string(), from.to_json(thread));
                map.insert("to".to_string(), to.to_json(thread));
                map.insert("exclusive".to_string(), Json::Bool(*exclusive));
                Json::Object(map)
            }
            Object::Block(_) => Json::String("#<Block>".to_string()),
            Object::Error(e) => {
                let mut map = serde_json::Map::new();
                map.insert("error".to_string(), Json::String(e.kind.class_name().to_string()));
                map.insert("message".to_string(), Json::String(e.message.clone()));
                Json::Object(map)
            }
            Object::Class(c) => Json::String(c.borrow().name.clone()),
            Object::Instance(inst) => {
                let class = Rc::clone(&inst.borrow().class);
                if let Some(crate::object::MethodEntry::UserDefined(body)) =
                    crate::object::Class::lookup_method(&class, "to_json", false)
                {
                    return thread.invoke_user_method(self.clone(), &body, &[], None).to_json(thread);
                }
                let mut map = serde_json::Map::new();
                for (k, v) in inst.borrow().ivars.iter() {
                    map.insert(k.clone(), v.to_json(thread));
                }
                Json::Object(map)
            }
            Object::Opaque(o) => Json::String(format!("#<Opaque:{}>", o.tag)),
        }
    }
}

/// Float inspection always contains a `.` (SPEC_FULL.md §8 invariant 3),
/// matching the reference language's float literal syntax even for integral
/// values. Deliberate narrowing: `NaN`/`Infinity`/`-Infinity` render as their
/// bare names with no `.`, since dotting them (`NaN.0`) would be misleading
/// rather than meaningful — none of these round-trip through a parser
/// either, which is the same finite-only carve-out invariant 3 already makes
/// for round-tripping.
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity".to_string() } else { "-Infinity".to_string() };
    }
    let s = format!("{value}");
    if s.contains('.') || s.contains('e') || s.contains('E') {
        s
    } else {
        format!("{s}.0")
    }
}

trait NumberFromStrExt {
    fn from_str_unwrap(s: &str) -> Option<serde_json::Number>;
}

impl NumberFromStrExt for serde_json::Number {
    fn from_str_unwrap(s: &str) -> Option<serde_json::Number> {
        s.parse::<i64>().ok().map(serde_json::Number::from).or_else(|| {
            s.parse::<f64>().ok().and_then(serde_json::Number::from_f64)
        })
    }
}
