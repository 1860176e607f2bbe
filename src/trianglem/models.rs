//! Data structures representing TriangleM archive components

use serde::Serialize;

/// One record from the memfs index catalog.
///
/// Catalog order equals record order in the container and is significant;
/// paths are not required to be unique (the index is a master catalog for a
/// whole series, and routes may repeat structurally across volumes).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    /// Logical path inside the companion payload container, e.g.
    /// `/100_common/000_prologue.tat`.
    pub path: String,
    pub metadata_offset: u32,
    /// Short tag decoded from a character-pair field, e.g. `01`.
    pub type_tag: String,
    /// Short tag decoded from a character-pair field, e.g. `.t`.
    pub extension_tag: String,
    /// Raw 16-bit value ahead of the path text. Layout unconfirmed; carried
    /// opaquely and never interpreted.
    pub path_prefix: u16,
}

/// Byte stream produced by inflating a membody container.
#[derive(Debug, Clone)]
pub struct DecodedBlob {
    pub data: Vec<u8>,
    /// Decompressed size announced by the container header.
    pub declared_size: u32,
    /// True when `data.len()` differs from `declared_size`. The declared
    /// field is unreliable across packer tools; `data` is authoritative.
    pub size_mismatch: bool,
}

/// A named, contiguous span of script lines delimited by `[...]` headers.
///
/// The span runs from the line after the header up to (but excluding) the
/// next header line or the end of the script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scene {
    pub name: String,
    /// 1-based source-file line number of the first line after the header.
    /// Anchors stable line numbering for every line in the span.
    pub first_line: usize,
    pub lines: Vec<String>,
}

/// One extracted line of spoken or narrative text with its speaker and
/// surrounding context metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DialogueUnit {
    pub source_file: String,
    /// 1-based line number within the decoded script file.
    pub line_number: usize,
    pub scene: String,
    /// Name from the most recent speaker marker, `None` for narrative lines.
    pub speaker: Option<String>,
    /// Text between the corner quotes, delimiters stripped. Placeholder
    /// tokens such as `${Name}` pass through verbatim.
    pub text: String,
    /// The entire raw line, trailing command tags included.
    pub full_line: String,
    /// Verbatim text of the most recent speaker-marker line, empty if none
    /// has occurred since scene entry.
    pub context: String,
}

/// Classification of one script line, decided before any content extraction
/// is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    Comment,
    SceneHeader,
    SpeakerMarker,
    Dialogue,
    /// A delimiter opened but never closed, or closed before opening.
    Malformed,
    /// Structural or command-only content; carries no dialogue.
    Other,
}
