use std::fmt;

use crate::stream::LogStream;

/// A context value carried alongside a log message.
///
/// Rather than inspecting arbitrary types at runtime, the logger accepts a
/// closed set of value shapes and renders them with an exhaustive match.
/// Rendering is deterministic and total, so a log call can never fail on an
/// unprintable context value.
///
/// | Shape | Rendered |
/// |---|---|
/// | `Text` / `Integer` / `Float` | natural textual form |
/// | `Bool` | `<bool:true>` / `<bool:false>` |
/// | `Null` | `<NULL>` |
/// | `Resource(kind)` | `<resource:kind>` |
/// | `Composite` | `<array>` |
/// | `Callable` / `Object` | `<object>` |
#[derive(Debug, Clone)]
pub enum LogValue {
    /// Plain text, including any value captured up front via
    /// [`LogValue::stringable`].
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// An absent value.
    Null,
    /// An open OS-backed handle; the payload names the handle's kind.
    Resource(String),
    /// A list or other aggregate. The elements are kept but render as the
    /// opaque `<array>` tag.
    Composite(Vec<LogValue>),
    /// A function value. Renders as a generic object.
    Callable,
    /// Any other value with no textual representation of its own.
    Object,
}

impl LogValue {
    /// Capture any `Display` value as text, the shape used for values that
    /// carry their own textual representation.
    pub fn stringable(value: impl fmt::Display) -> LogValue {
        LogValue::Text(value.to_string())
    }

    /// Tag for an open resource handle of the given kind.
    pub fn resource(kind: impl Into<String>) -> LogValue {
        LogValue::Resource(kind.into())
    }
}

impl fmt::Display for LogValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogValue::Text(text) => f.write_str(text),
            LogValue::Integer(value) => write!(f, "{}", value),
            LogValue::Float(value) => write!(f, "{}", value),
            LogValue::Bool(true) => f.write_str("<bool:true>"),
            LogValue::Bool(false) => f.write_str("<bool:false>"),
            LogValue::Null => f.write_str("<NULL>"),
            LogValue::Resource(kind) => write!(f, "<resource:{}>", kind),
            LogValue::Composite(_) => f.write_str("<array>"),
            LogValue::Callable | LogValue::Object => f.write_str("<object>"),
        }
    }
}

impl From<&str> for LogValue {
    fn from(value: &str) -> Self {
        LogValue::Text(value.to_string())
    }
}

impl From<String> for LogValue {
    fn from(value: String) -> Self {
        LogValue::Text(value)
    }
}

impl From<bool> for LogValue {
    fn from(value: bool) -> Self {
        LogValue::Bool(value)
    }
}

impl From<f64> for LogValue {
    fn from(value: f64) -> Self {
        LogValue::Float(value)
    }
}

impl From<f32> for LogValue {
    fn from(value: f32) -> Self {
        LogValue::Float(value as f64)
    }
}

macro_rules! integer_value {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for LogValue {
                fn from(value: $ty) -> Self {
                    LogValue::Integer(value as i64)
                }
            }
        )*
    };
}

// Integer widths that fit i64 without loss.
integer_value!(i8, i16, i32, i64, u8, u16, u32);

impl<T: Into<LogValue>> From<Option<T>> for LogValue {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(inner) => inner.into(),
            None => LogValue::Null,
        }
    }
}

impl From<Vec<LogValue>> for LogValue {
    fn from(values: Vec<LogValue>) -> Self {
        LogValue::Composite(values)
    }
}

impl From<&LogStream> for LogValue {
    fn from(stream: &LogStream) -> Self {
        LogValue::Resource(stream.resource_kind().to_string())
    }
}
