//! Single-pass JSON emitter with a configurable null-serialization policy.

use seqwire_common::{Result, error::Error, verify_arg};

#[derive(Debug)]
enum Scope {
    Array { seen_value: bool },
    Object { seen_entry: bool },
}

/// A forward, single-pass JSON writer that builds the document into a string.
///
/// Member names are deferred: [`name`](JsonWriter::name) records the pending
/// name and the next value emission writes it, which is what lets
/// [`null_value`](JsonWriter::null_value) drop a name/null pair entirely when
/// null serialization is disabled. An array slot cannot be omitted, so at
/// array or top-level positions `null_value` always emits the token.
pub struct JsonWriter {
    out: String,
    serialize_nulls: bool,
    stack: Vec<Scope>,
    pending_name: Option<String>,
}

impl JsonWriter {
    /// Creates a writer that omits null members (null serialization off).
    pub fn new() -> JsonWriter {
        JsonWriter {
            out: String::new(),
            serialize_nulls: false,
            stack: Vec::new(),
            pending_name: None,
        }
    }

    /// Sets the null-serialization policy.
    pub fn with_serialize_nulls(mut self, serialize_nulls: bool) -> JsonWriter {
        self.serialize_nulls = serialize_nulls;
        self
    }

    /// Whether this writer emits null members.
    pub fn serialize_nulls(&self) -> bool {
        self.serialize_nulls
    }

    /// Emits any pending member name and the separator owed at the current
    /// position.
    fn before_value(&mut self) -> Result<()> {
        if let Some(name) = self.pending_name.take() {
            match self.stack.last_mut() {
                Some(Scope::Object { seen_entry }) => {
                    if *seen_entry {
                        self.out.push(',');
                    }
                    *seen_entry = true;
                }
                _ => return Err(Error::invalid_operation("member name outside of an object")),
            }
            write_quoted(&mut self.out, &name);
            self.out.push(':');
            return Ok(());
        }
        match self.stack.last_mut() {
            Some(Scope::Array { seen_value }) => {
                if *seen_value {
                    self.out.push(',');
                }
                *seen_value = true;
            }
            Some(Scope::Object { .. }) => {
                return Err(Error::invalid_operation("value without a member name"));
            }
            None => {}
        }
        Ok(())
    }

    /// Opens an array.
    pub fn begin_array(&mut self) -> Result<()> {
        self.before_value()?;
        self.out.push('[');
        self.stack.push(Scope::Array { seen_value: false });
        Ok(())
    }

    /// Closes the current array.
    pub fn end_array(&mut self) -> Result<()> {
        match self.stack.last() {
            Some(Scope::Array { .. }) => {}
            _ => return Err(Error::invalid_operation("end_array outside of an array")),
        }
        self.stack.pop();
        self.out.push(']');
        Ok(())
    }

    /// Opens an object.
    pub fn begin_object(&mut self) -> Result<()> {
        self.before_value()?;
        self.out.push('{');
        self.stack.push(Scope::Object { seen_entry: false });
        Ok(())
    }

    /// Closes the current object.
    pub fn end_object(&mut self) -> Result<()> {
        match self.stack.last() {
            Some(Scope::Object { .. }) => {}
            _ => return Err(Error::invalid_operation("end_object outside of an object")),
        }
        verify_arg!(pending_name, self.pending_name.is_none());
        self.stack.pop();
        self.out.push('}');
        Ok(())
    }

    /// Records the member name for the next value.
    pub fn name(&mut self, name: &str) -> Result<()> {
        match self.stack.last() {
            Some(Scope::Object { .. }) => {}
            _ => return Err(Error::invalid_operation("member name outside of an object")),
        }
        verify_arg!(pending_name, self.pending_name.is_none());
        self.pending_name = Some(name.to_string());
        Ok(())
    }

    /// Emits a null token, subject to the null-serialization policy: when
    /// disabled and a member name is pending, both the name and the null are
    /// dropped.
    pub fn null_value(&mut self) -> Result<()> {
        if self.pending_name.is_some() && !self.serialize_nulls {
            self.pending_name = None;
            return Ok(());
        }
        self.before_value()?;
        self.out.push_str("null");
        Ok(())
    }

    /// Emits a boolean token.
    pub fn bool_value(&mut self, value: bool) -> Result<()> {
        self.before_value()?;
        self.out.push_str(if value { "true" } else { "false" });
        Ok(())
    }

    /// Emits an integer token.
    pub fn i64_value(&mut self, value: i64) -> Result<()> {
        self.before_value()?;
        self.out.push_str(&value.to_string());
        Ok(())
    }

    /// Emits a floating point token. Non-finite values cannot be represented
    /// in the grammar and are rejected.
    pub fn f64_value(&mut self, value: f64) -> Result<()> {
        verify_arg!(value, value.is_finite());
        self.before_value()?;
        self.out.push_str(&value.to_string());
        Ok(())
    }

    /// Emits a string token, escaping as needed.
    pub fn string_value(&mut self, value: &str) -> Result<()> {
        self.before_value()?;
        write_quoted(&mut self.out, value);
        Ok(())
    }

    /// The document produced so far.
    pub fn as_str(&self) -> &str {
        &self.out
    }

    /// Consumes the writer, returning the produced document.
    pub fn into_string(self) -> String {
        self.out
    }
}

impl Default for JsonWriter {
    fn default() -> Self {
        JsonWriter::new()
    }
}

fn write_quoted(out: &mut String, value: &str) {
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            c if (c as u32) < 0x20 => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
}
