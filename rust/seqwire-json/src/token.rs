//! Classification of the value token at the cursor position.

/// The kind of the next token in the document, as reported by
/// [`TokenReader::peek`](crate::reader::TokenReader::peek).
///
/// `peek` classifies without consuming: the cursor does not move past the
/// token until one of the consuming operations is invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// The `null` literal.
    Null,
    /// The `true` or `false` literal.
    Bool,
    /// A JSON number.
    Number,
    /// A JSON string.
    String,
    /// The opening `[` of an array.
    BeginArray,
    /// The closing `]` of the current array.
    EndArray,
    /// The opening `{` of an object.
    BeginObject,
    /// The closing `}` of the current object.
    EndObject,
    /// End of the document.
    Eof,
}
