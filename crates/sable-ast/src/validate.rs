/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */
//! Structural audit over a finished tree. The plain setters already
//! debug-assert their contracts; this pass re-checks the same invariants on
//! demand and reports findings with spans attached, for tests and for
//! frontends that ingest trees they did not build themselves.

use sable_common::{SableError, Span};
use thiserror::Error;

use crate::{
    func::Function,
    node::{Block, ElemKind, ExprStmt, NodeKind, NodeList},
    tree::{NodeRef, Tree},
    util::AstVisitor,
};

#[derive(Debug, Error, Clone)]
pub enum ValidateError {
    #[error("child node does not point back at its structural parent")]
    BrokenParentLink,
    #[error("child slot references a node that was removed from the arena")]
    DanglingChild,
    #[error("function body slot holds a {actual}, expected a block")]
    BodyNotBlock { actual: &'static str },
    #[error("function parameter slot holds a {actual}, expected a parameter list")]
    ParametersNotList { actual: &'static str },
    #[error("list declared over {expected}s holds a {actual}")]
    WrongListElement {
        expected: ElemKind,
        actual: &'static str,
    },
    #[error("block holds a {actual}, which is not a statement")]
    BlockElementNotStatement { actual: &'static str },
    #[error("expression statement wraps a {actual}, which is not an expression")]
    ExprStmtNotExpression { actual: &'static str },
    #[error("span ends before it starts")]
    InvertedSpan,
}

///Checks parent/child agreement, slot kind constraints and span sanity for
/// everything reachable from `root`. `Ok(())` on a clean tree, otherwise all
/// findings, each located at the offending node.
pub fn validate(tree: &Tree, root: NodeRef) -> Result<(), Vec<SableError<ValidateError>>> {
    let mut validator = Validator { errors: Vec::new() };
    tree.walk(root, &mut validator);
    if validator.errors.is_empty() {
        Ok(())
    } else {
        Err(validator.errors)
    }
}

struct Validator {
    errors: Vec<SableError<ValidateError>>,
}

impl Validator {
    fn span_of(&self, tree: &Tree, node: NodeRef) -> Span {
        tree.span(node).cloned().unwrap_or_else(Span::empty)
    }

    fn push(&mut self, tree: &Tree, node: NodeRef, error: ValidateError) {
        self.errors.push(SableError::error_here(
            error,
            self.span_of(tree, node),
            "at this node",
        ));
    }

    ///The back-reference of every enumerated child must agree with `node`.
    fn check_links(&mut self, tree: &Tree, node: NodeRef) {
        for child in tree.children(node) {
            match tree.get(child) {
                None => self.push(tree, node, ValidateError::DanglingChild),
                Some(c) if c.parent() != Some(node) => {
                    let err = SableError::error_here(
                        ValidateError::BrokenParentLink,
                        c.span().clone(),
                        "this node's parent link points elsewhere",
                    )
                    .with_label(self.span_of(tree, node), "structural parent is here");
                    self.errors.push(err);
                }
                Some(_) => {}
            }
        }

        let span = self.span_of(tree, node);
        if span.end < span.start {
            //an inverted span cannot be labeled, report it location-only
            let mut err = SableError::new(ValidateError::InvertedSpan);
            err.source_span = Some(span);
            self.errors.push(err);
        }
    }

    fn kind_name(tree: &Tree, node: NodeRef) -> &'static str {
        tree.kind(node).map(|k| k.name()).unwrap_or("missing node")
    }
}

impl AstVisitor for Validator {
    fn enter_function(&mut self, tree: &Tree, node: NodeRef, func: &Function) -> bool {
        self.check_links(tree, node);
        if let Some(body) = func.body() {
            if !matches!(tree.kind(body), Some(NodeKind::Block(_))) {
                self.push(
                    tree,
                    node,
                    ValidateError::BodyNotBlock {
                        actual: Self::kind_name(tree, body),
                    },
                );
            }
        }
        if let Some(params) = func.parameters() {
            match tree.kind(params) {
                Some(NodeKind::List(l)) if l.elem() == ElemKind::Parameter => {}
                _ => self.push(
                    tree,
                    node,
                    ValidateError::ParametersNotList {
                        actual: Self::kind_name(tree, params),
                    },
                ),
            }
        }
        true
    }

    fn enter_block(&mut self, tree: &Tree, node: NodeRef, block: &Block) -> bool {
        self.check_links(tree, node);
        for &stmt in block.statements() {
            if !tree.kind(stmt).map_or(false, |k| k.is_statement()) {
                self.push(
                    tree,
                    node,
                    ValidateError::BlockElementNotStatement {
                        actual: Self::kind_name(tree, stmt),
                    },
                );
            }
        }
        true
    }

    fn enter_list(&mut self, tree: &Tree, node: NodeRef, list: &NodeList) -> bool {
        self.check_links(tree, node);
        for &item in list.items() {
            if !tree.kind(item).map_or(false, |k| k.satisfies(list.elem())) {
                self.push(
                    tree,
                    node,
                    ValidateError::WrongListElement {
                        expected: list.elem(),
                        actual: Self::kind_name(tree, item),
                    },
                );
            }
        }
        true
    }

    fn enter_expr_stmt(&mut self, tree: &Tree, node: NodeRef, stmt: &ExprStmt) -> bool {
        self.check_links(tree, node);
        if let Some(expr) = stmt.expr() {
            if !tree.kind(expr).map_or(false, |k| k.is_expression()) {
                self.push(
                    tree,
                    node,
                    ValidateError::ExprStmtNotExpression {
                        actual: Self::kind_name(tree, expr),
                    },
                );
            }
        }
        true
    }
}

#[cfg(test)]
mod test {
    use sable_common::Span;

    use super::{validate, ValidateError};
    use crate::{
        func::{Function, FunctionKind},
        node::{Block, ElemKind, NodeKind, NodeList, Parameter},
        tree::Tree,
    };

    #[test]
    fn clean_tree_validates() {
        let mut tree = Tree::new();
        let func = tree.insert(
            Span::new(0, 30),
            NodeKind::Function(Function::new(FunctionKind::Declaration)),
        );
        let params = tree.insert(
            Span::new(10, 12),
            NodeKind::List(NodeList::new(ElemKind::Parameter)),
        );
        let param = tree.insert(Span::new(11, 12), NodeKind::Parameter(Parameter::new("a", 0)));
        tree.list_push(params, param);
        let body = tree.insert(Span::new(14, 30), NodeKind::Block(Block::new()));
        tree.set_parameters(func, Some(params));
        tree.set_body(func, Some(body));

        assert!(validate(&tree, func).is_ok());
    }

    #[test]
    fn broken_parent_link_is_reported() {
        let mut tree = Tree::new();
        let block = tree.insert(Span::new(0, 10), NodeKind::Block(Block::new()));
        let stmt = tree.insert(
            Span::new(2, 8),
            NodeKind::ExprStmt(crate::node::ExprStmt::new()),
        );

        //bypass the setters to wire only the forward link
        if let Some(NodeKind::Block(b)) = tree.kind_mut(block) {
            b.statements.push(stmt);
        }

        let errs = validate(&tree, block).unwrap_err();
        assert!(errs
            .iter()
            .any(|e| matches!(e.error, ValidateError::BrokenParentLink)));
    }

    #[test]
    fn inverted_span_is_reported() {
        let mut tree = Tree::new();
        let span = Span {
            file: Default::default(),
            start: 10,
            end: 3,
        };
        let func = tree.insert(span, NodeKind::Function(Function::new(FunctionKind::Declaration)));

        let errs = validate(&tree, func).unwrap_err();
        let err = errs
            .iter()
            .find(|e| matches!(e.error, ValidateError::InvertedSpan))
            .expect("inverted span not reported");
        //the defective span itself must not be turned into a label
        assert!(err.labels.is_empty());
        assert_eq!(err.source_span.as_ref().map(|s| (s.start, s.end)), Some((10, 3)));
    }
}
