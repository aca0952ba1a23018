/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */
//! The function node, declaration or expression form. This is the one kind
//! specified in full detail; it combines "is a statement", "introduces a
//! scope" and "declares a name".

use sable_common::Span;
use slotmap::new_key_type;

use crate::{node::Ident, tree::NodeRef};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

///Which syntactic shape the surrounding parser decided this function takes.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FunctionKind {
    Declaration,
    Expression,
    Getter,
    Setter,
    Arrow,
}

new_key_type! {
    ///Opaque reference to the scope slot a name resolves to. The binding pass
    /// owns the storage behind this key; nodes carry it for lookups only, it
    /// must never be used to keep binder state alive.
    pub struct BindingRef;
}

///A function declaration or expression.
///
/// The two structural slots (`parameters`, `body`) are only assignable through
/// the owning [Tree](crate::tree::Tree), which keeps the parent links in sync.
/// Everything else is plain data the parser and binder write directly.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug)]
pub struct Function {
    pub kind: FunctionKind,
    ///`None` for anonymous function expressions.
    pub name: Option<Ident>,
    ///Best-effort display name for anonymous functions, derived by the parser
    /// from the surrounding context. Never used for binding.
    pub name_guess: Option<String>,
    ///Location of the name token. Only meaningful while `name` is set.
    pub name_span: Span,
    ///Location of the parenthesized parameter list, independent of the spans
    /// of the individual parameters.
    pub parameters_span: Span,
    ///True when the node sits in expression position.
    pub is_expression: bool,
    ///Scope slot the function's name resolves to, set by the binding pass.
    pub binding: Option<BindingRef>,
    ///Must point at a [NodeList](crate::node::NodeList) of parameters.
    pub(crate) parameters: Option<NodeRef>,
    ///Must point at a [Block](crate::node::Block). `None` only transiently
    /// during construction.
    pub(crate) body: Option<NodeRef>,
}

impl Function {
    pub fn new(kind: FunctionKind) -> Self {
        Function {
            kind,
            name: None,
            name_guess: None,
            name_span: Span::empty(),
            parameters_span: Span::empty(),
            is_expression: matches!(kind, FunctionKind::Expression | FunctionKind::Arrow),
            binding: None,
            parameters: None,
            body: None,
        }
    }

    pub fn parameters(&self) -> Option<NodeRef> {
        self.parameters
    }

    pub fn body(&self) -> Option<NodeRef> {
        self.body
    }

    pub fn parameter_start(&self) -> usize {
        self.parameters_span.start
    }

    pub fn parameter_end(&self) -> usize {
        self.parameters_span.end
    }

    ///Name used for display: the declared name, or the parser's guess.
    pub fn display_name(&self) -> Option<&str> {
        self.name
            .as_ref()
            .map(|n| n.0.as_str())
            .or(self.name_guess.as_deref())
    }
}
