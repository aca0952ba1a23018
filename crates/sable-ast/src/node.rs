/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */
//! The supporting cast of node kinds around [Function](crate::func::Function):
//! blocks, typed node lists, parameters and the two leaf expressions. Together
//! they are just enough grammar to exercise every slot contract; further kinds
//! follow the same pattern.

use std::fmt::Display;

use smallvec::SmallVec;

use crate::{
    func::{BindingRef, Function},
    tree::NodeRef,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

///An identifier as it appeared in the source.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Ident(pub String);

impl Display for Ident {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Ident {
    fn from(value: &str) -> Self {
        Ident(value.to_owned())
    }
}

///Element kind a [NodeList] is declared over.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElemKind {
    Parameter,
    Statement,
    Expression,
}

impl Display for ElemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ElemKind::Parameter => write!(f, "parameter"),
            ElemKind::Statement => write!(f, "statement"),
            ElemKind::Expression => write!(f, "expression"),
        }
    }
}

///Ordered container of sibling nodes of one declared kind. A list occupies a
/// single child slot of its own parent while itself being the parent of all
/// its items. Item order is semantically significant (parameter order!) and
/// preserved under every mutation.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug)]
pub struct NodeList {
    pub(crate) elem: ElemKind,
    pub(crate) items: SmallVec<[NodeRef; 3]>,
}

impl NodeList {
    pub fn new(elem: ElemKind) -> Self {
        NodeList {
            elem,
            items: SmallVec::new(),
        }
    }

    pub fn elem(&self) -> ElemKind {
        self.elem
    }

    pub fn items(&self) -> &[NodeRef] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

///A braced statement list. This is also the wrapper every statement-kind slot
/// coerces into, so such a slot always holds a block.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Default)]
pub struct Block {
    pub(crate) statements: SmallVec<[NodeRef; 3]>,
}

impl Block {
    pub fn new() -> Self {
        Block {
            statements: SmallVec::new(),
        }
    }

    pub fn statements(&self) -> &[NodeRef] {
        &self.statements
    }
}

///A single parameter declaration inside a function's parameter list.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug)]
pub struct Parameter {
    pub name: Ident,
    ///Zero-based position within the surrounding list.
    pub position: usize,
    ///Scope slot this parameter resolves to, set by the binding pass.
    pub binding: Option<BindingRef>,
}

impl Parameter {
    pub fn new(name: impl Into<Ident>, position: usize) -> Self {
        Parameter {
            name: name.into(),
            position,
            binding: None,
        }
    }
}

///An expression lifted into statement position.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Default)]
pub struct ExprStmt {
    pub(crate) expr: Option<NodeRef>,
}

impl ExprStmt {
    pub fn new() -> Self {
        ExprStmt { expr: None }
    }

    pub fn expr(&self) -> Option<NodeRef> {
        self.expr
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Number(f64),
    Str(String),
    Bool(bool),
    Null,
}

///All node kinds of the syntax tree. Closed set, matched exhaustively by the
/// traversal and replacement machinery.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug)]
pub enum NodeKind {
    Function(Function),
    Block(Block),
    List(NodeList),
    Parameter(Parameter),
    ExprStmt(ExprStmt),
    Ident(Ident),
    Literal(Literal),
}

impl NodeKind {
    ///Kind name for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Function(_) => "function",
            NodeKind::Block(_) => "block",
            NodeKind::List(_) => "list",
            NodeKind::Parameter(_) => "parameter",
            NodeKind::ExprStmt(_) => "expression-statement",
            NodeKind::Ident(_) => "identifier",
            NodeKind::Literal(_) => "literal",
        }
    }

    pub fn is_statement(&self) -> bool {
        match self {
            NodeKind::Block(_) | NodeKind::ExprStmt(_) => true,
            NodeKind::Function(f) => !f.is_expression,
            _ => false,
        }
    }

    pub fn is_expression(&self) -> bool {
        match self {
            NodeKind::Ident(_) | NodeKind::Literal(_) => true,
            NodeKind::Function(f) => f.is_expression,
            _ => false,
        }
    }

    ///Whether a node of this kind may live in a list declared over `elem`.
    pub fn satisfies(&self, elem: ElemKind) -> bool {
        match elem {
            ElemKind::Parameter => matches!(self, NodeKind::Parameter(_)),
            ElemKind::Statement => self.is_statement(),
            ElemKind::Expression => self.is_expression(),
        }
    }

    ///Immediate non-null children, in the fixed order the traversal visits
    /// them: for functions the parameter list first, then the body.
    pub(crate) fn child_refs(&self) -> SmallVec<[NodeRef; 4]> {
        let mut refs = SmallVec::new();
        match self {
            NodeKind::Function(f) => {
                if let Some(params) = f.parameters {
                    refs.push(params);
                }
                if let Some(body) = f.body {
                    refs.push(body);
                }
            }
            NodeKind::Block(b) => refs.extend(b.statements.iter().copied()),
            NodeKind::List(l) => refs.extend(l.items.iter().copied()),
            NodeKind::ExprStmt(s) => {
                if let Some(expr) = s.expr {
                    refs.push(expr);
                }
            }
            NodeKind::Parameter(_) | NodeKind::Ident(_) | NodeKind::Literal(_) => {}
        }
        refs
    }
}
