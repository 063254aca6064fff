use crate::value::LogValue;

/// Ordered placeholder map attached to a single log call.
///
/// Keys are placeholder names; every literal `{key}` token in the message is
/// replaced by the value's rendered form. Pairs are applied in insertion
/// order, builder style:
///
/// ```
/// use linelog::LogContext;
///
/// let ctx = LogContext::new()
///     .with("user", "alice")
///     .with("attempt", 3);
/// assert_eq!(ctx.interpolate("{user} retry {attempt}"), "alice retry 3");
/// ```
#[derive(Debug, Clone, Default)]
pub struct LogContext {
    entries: Vec<(String, LogValue)>,
}

impl LogContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one placeholder pair, builder style.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<LogValue>) -> Self {
        self.push(key, value);
        self
    }

    /// Append one placeholder pair in place.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<LogValue>) {
        self.entries.push((key.into(), value.into()));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &LogValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Substitute `{key}` tokens in `message`.
    ///
    /// One pass per pair over the running string, in insertion order; each
    /// pass is a plain substring replacement of every occurrence, and
    /// replacement text is never rescanned by its own pass. A later pair's
    /// token introduced by an earlier substitution is therefore still
    /// replaced, while the reverse is not. Single-pass on purpose.
    pub fn interpolate(&self, message: &str) -> String {
        let mut output = message.to_string();
        for (key, value) in &self.entries {
            let token = format!("{{{}}}", key);
            output = output.replace(&token, &value.to_string());
        }
        output
    }
}
