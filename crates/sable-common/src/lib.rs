/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */
//! Common diagnosis helpers shared by the sable crates. This is mostly the [Span]
//! every syntax node carries, as well as error wrapping and reporting on top of it.

use std::fmt::Display;

use smallstr::SmallString;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod error;
pub mod reporter;

//[SableError](error::SableError) exposes ariadne labels, so consumers need the types
pub use ariadne;

pub use error::{error_reporter, warning_reporter, SableError};
pub use reporter::{CacheError, SourceCache};

///Small-string type used for file names on [Span]s. Most paths fit inline.
pub type FileString = SmallString<[u8; 32]>;

///Source-code span information. Half-open byte range `[start, end)` into the
/// file `file`. `file` stays empty for synthetic spans.
///
/// Spans are compared (containment, overlap), but never mutated once created.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Span {
    pub file: FileString,
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn empty() -> Self {
        Span {
            file: FileString::default(),
            start: 0,
            end: 0,
        }
    }

    ///Span without a file, as produced for synthetic nodes.
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(end >= start, "span must not end before it starts");
        Span {
            file: FileString::default(),
            start,
            end,
        }
    }

    pub fn with_file(file: impl Into<FileString>, start: usize, end: usize) -> Self {
        debug_assert!(end >= start, "span must not end before it starts");
        Span {
            file: file.into(),
            start,
            end,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }

    ///True if `offset` falls into the half-open range.
    pub fn contains_offset(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }

    ///True if `other` lies completely within `self`. Spans of different files
    /// never contain each other.
    pub fn contains(&self, other: &Span) -> bool {
        self.file == other.file && other.start >= self.start && other.end <= self.end
    }

    ///True if both ranges share at least one byte.
    pub fn overlaps(&self, other: &Span) -> bool {
        self.file == other.file && self.start < other.end && other.start < self.end
    }

    ///Smallest span covering both `self` and `other`. Keeps `self`'s file.
    pub fn union(&self, other: &Span) -> Span {
        Span {
            file: self.file.clone(),
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.file.is_empty() {
            write!(f, "[{}, {})", self.start, self.end)
        } else {
            write!(f, "{}:[{}, {})", self.file, self.start, self.end)
        }
    }
}

impl ariadne::Span for Span {
    type SourceId = FileString;

    fn source(&self) -> &Self::SourceId {
        &self.file
    }

    fn start(&self) -> usize {
        self.start
    }

    fn end(&self) -> usize {
        self.end
    }
}
