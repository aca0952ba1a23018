/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */
use crate::{
    func::Function,
    node::{Block, ExprStmt, Ident, Literal, NodeKind, NodeList, Parameter},
    tree::{NodeRef, Tree},
};

///Allows an implementor to traverse the tree without matching on node kinds
/// itself. For every node the matching `enter_*` hook runs first; returning
/// `false` skips the node's children. The `exit_*` hook runs after the
/// children were visited, or immediately if they were skipped, so a single
/// traversal can gather top-down context and aggregate bottom-up.
///
/// Hooks only get shared access to the tree; structural mutation goes through
/// [Tree::replace_child] between traversals.
#[allow(unused_variables)]
pub trait AstVisitor {
    fn enter_function(&mut self, tree: &Tree, node: NodeRef, func: &Function) -> bool {
        true
    }
    fn exit_function(&mut self, tree: &Tree, node: NodeRef, func: &Function) {}
    fn enter_block(&mut self, tree: &Tree, node: NodeRef, block: &Block) -> bool {
        true
    }
    fn exit_block(&mut self, tree: &Tree, node: NodeRef, block: &Block) {}
    fn enter_list(&mut self, tree: &Tree, node: NodeRef, list: &NodeList) -> bool {
        true
    }
    fn exit_list(&mut self, tree: &Tree, node: NodeRef, list: &NodeList) {}
    fn enter_parameter(&mut self, tree: &Tree, node: NodeRef, param: &Parameter) -> bool {
        true
    }
    fn exit_parameter(&mut self, tree: &Tree, node: NodeRef, param: &Parameter) {}
    fn enter_expr_stmt(&mut self, tree: &Tree, node: NodeRef, stmt: &ExprStmt) -> bool {
        true
    }
    fn exit_expr_stmt(&mut self, tree: &Tree, node: NodeRef, stmt: &ExprStmt) {}
    fn enter_ident(&mut self, tree: &Tree, node: NodeRef, ident: &Ident) -> bool {
        true
    }
    fn exit_ident(&mut self, tree: &Tree, node: NodeRef, ident: &Ident) {}
    fn enter_literal(&mut self, tree: &Tree, node: NodeRef, lit: &Literal) -> bool {
        true
    }
    fn exit_literal(&mut self, tree: &Tree, node: NodeRef, lit: &Literal) {}
}

impl Tree {
    ///Walks the subtree under `node`, children in the same fixed order
    /// [Tree::children] reports. Stale refs and null slots are skipped
    /// silently; whether a missing slot is acceptable is the caller's call.
    pub fn walk<V: AstVisitor>(&self, node: NodeRef, visitor: &mut V) {
        let Some(n) = self.get(node) else {
            return;
        };

        let descend = match n.kind() {
            NodeKind::Function(f) => visitor.enter_function(self, node, f),
            NodeKind::Block(b) => visitor.enter_block(self, node, b),
            NodeKind::List(l) => visitor.enter_list(self, node, l),
            NodeKind::Parameter(p) => visitor.enter_parameter(self, node, p),
            NodeKind::ExprStmt(s) => visitor.enter_expr_stmt(self, node, s),
            NodeKind::Ident(i) => visitor.enter_ident(self, node, i),
            NodeKind::Literal(l) => visitor.enter_literal(self, node, l),
        };

        if descend {
            for child in self.children(node) {
                self.walk(child, visitor);
            }
        }

        match n.kind() {
            NodeKind::Function(f) => visitor.exit_function(self, node, f),
            NodeKind::Block(b) => visitor.exit_block(self, node, b),
            NodeKind::List(l) => visitor.exit_list(self, node, l),
            NodeKind::Parameter(p) => visitor.exit_parameter(self, node, p),
            NodeKind::ExprStmt(s) => visitor.exit_expr_stmt(self, node, s),
            NodeKind::Ident(i) => visitor.exit_ident(self, node, i),
            NodeKind::Literal(l) => visitor.exit_literal(self, node, l),
        }
    }
}
