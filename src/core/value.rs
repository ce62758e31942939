//! Generic nested value model for bundler configuration trees.
//!
//! Objects and arrays are shared nodes with a stable identity: a tree may hold
//! the same node in several places and may reference itself. Scalars are plain
//! values. Nothing here interprets the bundler's own semantics.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

/// Identity of a shared object or array node.
///
/// Two handles have the same id exactly when they point at the same node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// A node in a bundler configuration tree.
#[derive(Clone)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    /// Regular expression, stored as its source without delimiters.
    Regex(String),
    /// A callable. Only its name is kept; it is never invoked.
    Function(Option<String>),
    Object(ObjectRef),
    Array(ArrayRef),
    /// A value the model cannot look into, labelled with its type name.
    Opaque(String),
}

impl Value {
    /// Create an empty plain object.
    pub fn object() -> Self {
        Value::Object(ObjectRef::new())
    }

    /// Create an empty object tagged with a class name (e.g. a plugin instance).
    pub fn instance(class: impl Into<String>) -> Self {
        Value::Object(ObjectRef::with_class(class))
    }

    /// Create an array from the given items.
    pub fn array(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Array(ArrayRef::new(items))
    }

    /// Create a regular expression value from its source.
    pub fn regex(source: impl Into<String>) -> Self {
        Value::Regex(source.into())
    }

    /// Create a named function value.
    pub fn function(name: impl Into<String>) -> Self {
        Value::Function(Some(name.into()))
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayRef> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Identity of the node, for objects and arrays.
    pub fn node_id(&self) -> Option<NodeId> {
        match self {
            Value::Object(obj) => Some(obj.id()),
            Value::Array(arr) => Some(arr.id()),
            _ => None,
        }
    }

    /// Runtime type name, as shown in opaque placeholders.
    pub fn type_name(&self) -> &str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Regex(_) => "RegExp",
            Value::Function(_) => "Function",
            Value::Object(_) => "Object",
            Value::Array(_) => "Array",
            Value::Opaque(name) => name,
        }
    }

    /// Convert a JSON document into a fresh tree.
    pub fn from_json(json: &serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s.clone()),
            serde_json::Value::Array(items) => Value::array(items.iter().map(Value::from_json)),
            serde_json::Value::Object(map) => {
                let obj = ObjectRef::new();
                for (key, value) in map {
                    obj.set(key.as_str(), Value::from_json(value));
                }
                Value::Object(obj)
            }
        }
    }
}

impl PartialEq for Value {
    /// Scalars compare by value, objects and arrays by identity.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Regex(a), Value::Regex(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a == b,
            (Value::Opaque(a), Value::Opaque(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            (Value::Array(a), Value::Array(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "Undefined"),
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => write!(f, "Bool({})", b),
            Value::Number(n) => write!(f, "Number({})", n),
            Value::String(s) => write!(f, "String({:?})", s),
            Value::Regex(s) => write!(f, "Regex({:?})", s),
            Value::Function(name) => write!(f, "Function({:?})", name),
            Value::Object(obj) => write!(f, "{:?}", obj),
            Value::Array(arr) => write!(f, "{:?}", arr),
            Value::Opaque(name) => write!(f, "Opaque({:?})", name),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number(n as f64)
    }
}

impl From<ObjectRef> for Value {
    fn from(obj: ObjectRef) -> Self {
        Value::Object(obj)
    }
}

impl From<ArrayRef> for Value {
    fn from(arr: ArrayRef) -> Self {
        Value::Array(arr)
    }
}

/// An object property.
#[derive(Debug, Clone)]
pub struct Property {
    pub value: Value,
    /// Hidden (non-enumerable) properties are only shown on request.
    pub enumerable: bool,
}

/// Contents of an object node.
#[derive(Debug, Default)]
pub struct Object {
    class: Option<String>,
    props: IndexMap<String, Property>,
}

impl Object {
    /// Class name, if the object is an instance of a named type.
    pub fn class(&self) -> Option<&str> {
        self.class.as_deref()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.props.get(key).map(|p| &p.value)
    }

    /// Properties in insertion order, hidden ones included.
    pub fn properties(&self) -> impl Iterator<Item = (&str, &Property)> {
        self.props.iter().map(|(k, p)| (k.as_str(), p))
    }

    pub fn len(&self) -> usize {
        self.props.len()
    }

    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    /// Insert an enumerable property. An existing key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.put(key.into(), value, true);
    }

    /// Insert a hidden property.
    pub fn insert_hidden(&mut self, key: impl Into<String>, value: Value) {
        self.put(key.into(), value, false);
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.props.shift_remove(key).map(|p| p.value)
    }

    fn put(&mut self, key: String, value: Value, enumerable: bool) {
        self.props.insert(key, Property { value, enumerable });
    }
}

/// Shared handle to an object node.
///
/// Trees that contain cycles keep their nodes alive until the process exits;
/// they only ever live for a single inspection.
#[derive(Clone, Default)]
pub struct ObjectRef(Rc<RefCell<Object>>);

impl ObjectRef {
    pub fn new() -> Self {
        ObjectRef::default()
    }

    pub fn with_class(class: impl Into<String>) -> Self {
        ObjectRef(Rc::new(RefCell::new(Object {
            class: Some(class.into()),
            props: IndexMap::new(),
        })))
    }

    pub fn id(&self) -> NodeId {
        NodeId(Rc::as_ptr(&self.0) as *const () as usize)
    }

    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn borrow(&self) -> Ref<'_, Object> {
        self.0.borrow()
    }

    /// Borrow the contents, or `None` while a mutable borrow is active.
    pub fn try_borrow(&self) -> Option<Ref<'_, Object>> {
        self.0.try_borrow().ok()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, Object> {
        self.0.borrow_mut()
    }

    /// Look up a property, cloning the handle.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.borrow().get(key).cloned()
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.borrow_mut().insert(key, value.into());
    }

    pub fn set_hidden(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.borrow_mut().insert_hidden(key, value.into());
    }

    /// Builder-style [`ObjectRef::set`].
    pub fn with(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.try_borrow() {
            Some(obj) => write!(
                f,
                "Object(#{:x}, {} props)",
                self.id().0,
                obj.len()
            ),
            None => write!(f, "Object(#{:x}, borrowed)", self.id().0),
        }
    }
}

/// Shared handle to an array node.
#[derive(Clone, Default)]
pub struct ArrayRef(Rc<RefCell<Vec<Value>>>);

impl ArrayRef {
    pub fn new(items: impl IntoIterator<Item = Value>) -> Self {
        ArrayRef(Rc::new(RefCell::new(items.into_iter().collect())))
    }

    pub fn id(&self) -> NodeId {
        NodeId(Rc::as_ptr(&self.0) as *const () as usize)
    }

    pub fn ptr_eq(&self, other: &ArrayRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn borrow(&self) -> Ref<'_, Vec<Value>> {
        self.0.borrow()
    }

    pub fn try_borrow(&self) -> Option<Ref<'_, Vec<Value>>> {
        self.0.try_borrow().ok()
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        self.borrow().get(index).cloned()
    }

    pub fn push(&self, value: impl Into<Value>) {
        self.0.borrow_mut().push(value.into());
    }

    /// Replace the element at `index`, padding with `undefined` as needed.
    pub fn set(&self, index: usize, value: impl Into<Value>) {
        let mut items = self.0.borrow_mut();
        if index >= items.len() {
            items.resize(index + 1, Value::Undefined);
        }
        items[index] = value.into();
    }

    pub fn len(&self) -> usize {
        self.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.borrow().is_empty()
    }
}

impl fmt::Debug for ArrayRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.try_borrow() {
            Some(items) => write!(f, "Array(#{:x}, {} items)", self.id().0, items.len()),
            None => write!(f, "Array(#{:x}, borrowed)", self.id().0),
        }
    }
}
