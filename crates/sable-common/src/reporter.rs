/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */
use std::fmt;

use ahash::AHashMap;
use ariadne::Source;
use thiserror::Error;

use crate::FileString;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("could not read source file {file}: {reason}")]
    Io { file: String, reason: String },
    #[error("no source registered for {file}")]
    Unknown { file: String },
}

///Caches the source files diagnostics refer to. Sources can be registered
/// directly (the usual path, the frontend already read the file), any span with
/// an unregistered file falls back to the file system.
#[derive(Default)]
pub struct SourceCache {
    files: AHashMap<FileString, Source<String>>,
}

impl SourceCache {
    pub fn new() -> Self {
        SourceCache {
            files: AHashMap::default(),
        }
    }

    ///Registers `content` as the source text behind `file`. Overwrites any
    /// earlier registration of the same file.
    pub fn add_source(&mut self, file: impl Into<FileString>, content: impl Into<String>) {
        let _ = self.files.insert(file.into(), Source::from(content.into()));
    }

    pub fn get(&self, file: &str) -> Option<&Source<String>> {
        self.files.get(file)
    }
}

impl ariadne::Cache<FileString> for SourceCache {
    type Storage = String;

    fn fetch(&mut self, id: &FileString) -> Result<&Source<String>, Box<dyn fmt::Debug + '_>> {
        if !self.files.contains_key(id) {
            //not registered, try to load from disk
            let content = std::fs::read_to_string(id.as_str()).map_err(|e| {
                Box::new(CacheError::Io {
                    file: id.to_string(),
                    reason: e.to_string(),
                }) as Box<dyn fmt::Debug>
            })?;
            let _ = self.files.insert(id.clone(), Source::from(content));
        }

        self.files.get(id).ok_or_else(|| {
            Box::new(CacheError::Unknown {
                file: id.to_string(),
            }) as Box<dyn fmt::Debug>
        })
    }

    fn display<'a>(&self, id: &'a FileString) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(id.as_str()))
    }
}
