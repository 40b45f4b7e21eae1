//! Source file handling: owned file content, spans and 1-based locations.

use std::{
    cmp::Ordering,
    fmt::Debug,
    iter::{Iterator, Peekable},
    ops::Range,
    path::{Path, PathBuf},
    str::CharIndices,
    sync::Arc,
};

use getset::Getters;

use super::{file_provider::FileProvider, Error};

/// Represents a configuration source file that contains the directive text.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Getters)]
pub struct SourceFile {
    /// Get the path of the source file.
    #[get = "pub"]
    path: PathBuf,
    /// Get the content of the source file
    #[get = "pub"]
    content: String,
    lines: Vec<Range<usize>>,
}

#[allow(clippy::missing_fields_in_debug)]
impl Debug for SourceFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceFile")
            .field("path", &self.path)
            .field("lines", &self.lines)
            .finish()
    }
}

impl SourceFile {
    fn new(path: PathBuf, content: String) -> Arc<Self> {
        let lines = get_line_byte_positions(&content);

        Arc::new(Self {
            path,
            content,
            lines,
        })
    }

    /// Get the line of the source file at the given line number.
    ///
    /// Numbering starts at 1.
    #[must_use]
    pub fn get_line(&self, line: usize) -> Option<&str> {
        let range = self.lines.get(line.checked_sub(1)?)?.clone();
        Some(&self.content[range])
    }

    /// Get the [`SourceIterator`] for the source file.
    #[must_use]
    pub fn iter<'a>(self: &'a Arc<Self>) -> SourceIterator<'a> {
        SourceIterator {
            source_file: self,
            iterator: self.content().char_indices().peekable(),
        }
    }

    /// Load the source file from the given file path.
    ///
    /// The whole content is read into memory here, so the underlying file
    /// handle is released before lexing begins.
    ///
    /// # Errors
    /// - [`Error::IoError`]: Error occurred when reading the file contents.
    pub fn load(path: &Path, provider: &impl FileProvider) -> Result<Arc<Self>, Error> {
        let source = provider.read_str(path)?;
        Ok(Self::new(path.to_path_buf(), source.into_owned()))
    }

    /// Get the [`Location`] of a given byte index
    #[must_use]
    pub fn get_location(&self, byte_index: usize) -> Option<Location> {
        if !self.content.is_char_boundary(byte_index) {
            return None;
        }

        // the line ranges are sorted and contiguous
        let line = self
            .lines
            .partition_point(|range| range.end <= byte_index);
        if !self.lines.get(line)?.contains(&byte_index) {
            return None;
        }

        // count utf-8 characters from the line start (columns start at 1)
        let column = self.content[self.lines[line].start..byte_index]
            .chars()
            .count()
            + 1;

        Some(Location {
            line: line + 1,
            column,
        })
    }

    /// Get the relative path of the source file from the current working directory.
    #[must_use]
    pub fn path_relative(&self) -> Option<PathBuf> {
        pathdiff::diff_paths(&self.path, std::env::current_dir().ok()?)
    }
}

/// A byte range in a source file, the position every token and tree node carries.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Getters)]
pub struct Span {
    start: usize,
    end: usize,

    /// Get the source file that the span is located in.
    #[get = "pub"]
    source_file: Arc<SourceFile>,
}

#[allow(clippy::missing_fields_in_debug)]
impl Debug for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Span")
            .field("start", &self.start)
            .field("end", &self.end)
            .field("content", &self.str())
            .finish()
    }
}

impl PartialEq for Span {
    fn eq(&self, other: &Self) -> bool {
        (self.start, self.end) == (other.start, other.end)
            && Arc::ptr_eq(&self.source_file, &other.source_file)
    }
}

impl Eq for Span {}

impl PartialOrd for Span {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Span {
    fn cmp(&self, other: &Self) -> Ordering {
        // spans of different files order by the identity of their file
        let key = |span: &Self| (Arc::as_ptr(&span.source_file) as usize, span.start, span.end);

        key(self).cmp(&key(other))
    }
}

impl std::hash::Hash for Span {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        (Arc::as_ptr(&self.source_file), self.start, self.end).hash(state);
    }
}

impl Span {
    /// Create a span from the given start and end byte indices in the source file.
    ///
    /// # Parameters
    /// - `start`: The start byte index of the span.
    /// - `end`: The end byte index of the span (exclusive).
    #[must_use]
    pub fn new(source_file: Arc<SourceFile>, start: usize, end: usize) -> Option<Self> {
        let content = source_file.content();
        let valid = start <= end
            && end <= content.len()
            && content.is_char_boundary(start)
            && content.is_char_boundary(end);

        valid.then(|| Self {
            start,
            end,
            source_file,
        })
    }

    /// Create a span from the given start byte index to the end of the source file.
    #[must_use]
    pub fn to_end(source_file: Arc<SourceFile>, start: usize) -> Option<Self> {
        let end = source_file.content().len();
        Self::new(source_file, start, end)
    }

    /// Get the start byte index of the span.
    #[must_use]
    pub fn start(&self) -> usize {
        self.start
    }

    /// Get the end byte index of the span (exclusive).
    #[must_use]
    pub fn end(&self) -> usize {
        self.end
    }

    /// Get the string slice of the source code that the span represents.
    #[must_use]
    pub fn str(&self) -> &str {
        &self.source_file.content()[self.start..self.end]
    }

    /// Get the starting [`Location`] of the span.
    #[must_use]
    pub fn start_location(&self) -> Location {
        self.source_file.get_location(self.start).unwrap()
    }

    /// Join the starting position of this span with the end position of the given span.
    #[must_use]
    pub fn join(&self, end: &Self) -> Option<Self> {
        let joinable = Arc::ptr_eq(&self.source_file, &end.source_file) && self.start <= end.end;

        joinable.then(|| Self {
            start: self.start,
            end: end.end,
            source_file: self.source_file.clone(),
        })
    }
}

/// A row/column position in a source file, as reported in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Location {
    /// Line number of the location (starts at 1).
    pub line: usize,

    /// Column number of the location (starts at 1).
    pub column: usize,
}

/// An element that covers a region of a source file.
pub trait SourceElement {
    /// Get the span of the element.
    fn span(&self) -> Span;
}

/// Iterator iterating over the characters in a source file that can be peeked at.
#[derive(Debug, Clone)]
pub struct SourceIterator<'a> {
    source_file: &'a Arc<SourceFile>,
    iterator: Peekable<CharIndices<'a>>,
}

impl<'a> SourceIterator<'a> {
    /// Peek at the next character in the source file.
    pub fn peek(&mut self) -> Option<(usize, char)> {
        self.iterator.peek().copied()
    }

    /// Get the source file that the iterator is iterating over.
    #[must_use]
    pub fn source_file(&self) -> &'a Arc<SourceFile> {
        self.source_file
    }
}

impl<'a> Iterator for SourceIterator<'a> {
    type Item = (usize, char);

    fn next(&mut self) -> Option<Self::Item> {
        self.iterator.next()
    }
}

/// Get the byte positions of the lines in the given text.
///
/// Line terminators (`\n`, `\r\n` and lone `\r`) belong to the line they end.
fn get_line_byte_positions(text: &str) -> Vec<Range<usize>> {
    let bytes = text.as_bytes();
    let mut results = Vec::new();
    let mut line_start = 0;
    let mut index = 0;

    while index < bytes.len() {
        let line_end = match bytes[index] {
            b'\n' => index + 1,
            b'\r' if bytes.get(index + 1) == Some(&b'\n') => index + 2,
            b'\r' => index + 1,
            _ => {
                index += 1;
                continue;
            }
        };

        results.push(line_start..line_end);
        line_start = line_end;
        index = line_end;
    }

    // the text after the last terminator is the last line
    results.push(line_start..text.len());

    results
}
