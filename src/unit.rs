/// A single annotatable span of source text.
///
/// Units are built once per run by the indexer, in package-then-document order,
/// and consumed one at a time by the interactive session. They are never
/// persisted directly; the log records derived from them are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    /// Element id, unique within `source_file`.
    ///
    /// Always present for units from an EPUB package; may be empty for units
    /// from a bare XML document that lacks `xml:id`/`id` attributes.
    pub id: String,

    /// Flattened character content of the span and all descendants, in
    /// document order. No whitespace normalization is applied.
    pub text: String,

    /// Path or name of the owning content document, as referenced by the
    /// package manifest (or the input path itself for bare XML).
    pub source_file: String,

    /// 0-based position of `source_file` in the package reading order.
    ///
    /// This is the file's position, not the unit's position within the file.
    /// Always 0 for bare XML input.
    pub sequence_index: usize,
}
