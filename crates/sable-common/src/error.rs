/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */
use std::{error::Error, fmt};

use ariadne::{Label, Report, ReportBuilder};
use smallvec::{smallvec, SmallVec};

use crate::{reporter::SourceCache, Span};

pub fn error_reporter<'a>(err: impl ToString, span: Span) -> ReportBuilder<'a, Span> {
    Report::build(ariadne::ReportKind::Error, span.file.clone(), span.start)
        .with_config(ariadne::Config::default().with_index_type(ariadne::IndexType::Byte))
        .with_message(err)
}

pub fn warning_reporter<'a>(err: impl ToString, span: Span) -> ReportBuilder<'a, Span> {
    Report::build(ariadne::ReportKind::Warning, span.file.clone(), span.start)
        .with_config(ariadne::Config::default().with_index_type(ariadne::IndexType::Byte))
        .with_message(err)
}

///Common error type for the sable modules. Allows you to build a base error from any
/// type `E: Error`. Once built, the error can be augmented with additional context that
/// is rendered by [SableError::report].
///
/// It also allows you to convert any `SableError<A>` to `SableError<B>`, if `A`
/// implements `Into<B>`. You are encouraged to use [thiserror](https://docs.rs/thiserror)
/// to derive your `E` type, and use [SableError] only to embed it.
pub struct SableError<E: Error> {
    pub error: E,
    pub source_span: Option<Span>,
    ///All labels that might be attached to the error.
    pub labels: SmallVec<[Label<Span>; 4]>,
}

impl<E: Error> SableError<E> {
    pub fn new(error: E) -> Self {
        SableError {
            error,
            source_span: None,
            labels: SmallVec::new(),
        }
    }

    ///Creates an error that reports `message` at the given `span`.
    pub fn error_here(error: E, span: Span, message: impl ToString) -> Self {
        Self {
            error,
            source_span: Some(span.clone()),
            labels: smallvec![Label::new(span).with_message(message)],
        }
    }

    ///Pushes a simple _info_ label to the error.
    pub fn with_label(mut self, span: Span, message: impl ToString) -> Self {
        self.labels.push(Label::new(span).with_message(message));
        self
    }

    ///Pushes a warning-label to the error.
    pub fn with_warning(mut self, span: Span, message: impl ToString) -> Self {
        self.labels.push(
            Label::new(span)
                .with_message(message)
                .with_color(ariadne::Color::Yellow),
        );
        self
    }

    ///Marks the `span` as an additional error location.
    pub fn with_error(mut self, span: Span, message: impl ToString) -> Self {
        self.labels.push(
            Label::new(span)
                .with_message(message)
                .with_color(ariadne::Color::Red),
        );
        self
    }

    ///Converts `self` into an `Err(SableError<Err>)`, where `Err` can be converted from `E`.
    pub fn into_err<T, Err: From<E> + Error>(self) -> Result<T, SableError<Err>> {
        Err(self.to_error::<Err>())
    }

    ///Converts `SableError<E>` into `SableError<Err>`, where `E` can be converted into `Err`.
    pub fn to_error<Err: From<E> + Error>(self) -> SableError<Err> {
        SableError {
            error: self.error.into(),
            source_span: self.source_span,
            labels: self.labels,
        }
    }

    ///Renders the full error to stderr, resolving source text through `cache`.
    pub fn report(&self, cache: &mut SourceCache) {
        let span = self.source_span.clone().unwrap_or_else(Span::empty);

        let reporter =
            error_reporter(self.error.to_string(), span).with_labels(self.labels.clone());

        let _ = reporter.finish().eprint(&mut *cache);
    }
}

impl<E: Error> fmt::Debug for SableError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source_span {
            Some(span) => write!(f, "{} @ {}", self.error, span),
            None => write!(f, "{}", self.error),
        }
    }
}

impl<E: Error> fmt::Display for SableError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}
