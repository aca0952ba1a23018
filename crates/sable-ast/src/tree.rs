/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */
//! The tree arena. Nodes are owned by a slotmap, identity is the arena key,
//! and the parent back-reference is a plain key as well, so it can never keep
//! a subtree alive. All slot assignment funnels through one detach/attach
//! pair which keeps forward links and back-references in agreement.

use sable_common::Span;
use slotmap::{new_key_type, SlotMap};
use smallvec::{smallvec, SmallVec};

use crate::{
    func::Function,
    node::{ElemKind, ExprStmt, NodeKind, Parameter},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

new_key_type! {
    ///Reference to a node within a [Tree]. Copyable, non-owning; a ref whose
    /// node was discarded simply misses on [Tree::get].
    pub struct NodeRef;
}

///One arena slot: span, weak parent link and the kind payload.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug)]
pub struct Node {
    pub(crate) span: Span,
    pub(crate) parent: Option<NodeRef>,
    pub(crate) kind: NodeKind,
}

impl Node {
    pub fn span(&self) -> &Span {
        &self.span
    }

    pub fn parent(&self) -> Option<NodeRef> {
        self.parent
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }
}

///Arena holding one syntax tree. Not designed for concurrent mutation:
/// everything here is synchronous and single-threaded per tree. Read-only
/// traversals of *different* trees may run on different threads, which is why
/// the tree is `Send + Sync`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Default)]
pub struct Tree {
    nodes: SlotMap<NodeRef, Node>,
}

static_assertions::assert_impl_all!(Tree: Send, Sync);

impl Tree {
    pub fn new() -> Self {
        Tree {
            nodes: SlotMap::with_key(),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    ///Inserts a fresh, unattached node.
    pub fn insert(&mut self, span: Span, kind: NodeKind) -> NodeRef {
        self.nodes.insert(Node {
            span,
            parent: None,
            kind,
        })
    }

    pub fn get(&self, node: NodeRef) -> Option<&Node> {
        self.nodes.get(node)
    }

    pub fn span(&self, node: NodeRef) -> Option<&Span> {
        self.nodes.get(node).map(|n| &n.span)
    }

    pub fn parent(&self, node: NodeRef) -> Option<NodeRef> {
        self.nodes.get(node).and_then(|n| n.parent)
    }

    pub fn kind(&self, node: NodeRef) -> Option<&NodeKind> {
        self.nodes.get(node).map(|n| &n.kind)
    }

    pub(crate) fn kind_mut(&mut self, node: NodeRef) -> Option<&mut NodeKind> {
        self.nodes.get_mut(node).map(|n| &mut n.kind)
    }

    ///The function payload behind `node`, if it is a function.
    pub fn function(&self, node: NodeRef) -> Option<&Function> {
        match self.kind(node) {
            Some(NodeKind::Function(f)) => Some(f),
            _ => None,
        }
    }

    ///Mutable access to a function's plain data (name, spans, binding). The
    /// structural slots stay crate-private, so this cannot break parent links.
    pub fn function_mut(&mut self, node: NodeRef) -> Option<&mut Function> {
        match self.kind_mut(node) {
            Some(NodeKind::Function(f)) => Some(f),
            _ => None,
        }
    }

    pub fn parameter_mut(&mut self, node: NodeRef) -> Option<&mut Parameter> {
        match self.kind_mut(node) {
            Some(NodeKind::Parameter(p)) => Some(p),
            _ => None,
        }
    }

    //---- slot assignment -------------------------------------------------

    ///Detach half of the slot contract: clears `child.parent` only if it
    /// still points at `owner`. A foreign parent pointer means the child was
    /// already reparented elsewhere and is left alone.
    fn release(&mut self, child: Option<NodeRef>, owner: NodeRef) {
        if let Some(child) = child {
            if let Some(node) = self.nodes.get_mut(child) {
                if node.parent == Some(owner) {
                    node.parent = None;
                }
            }
        }
    }

    ///Attach half: points `child.parent` at `owner`.
    fn claim(&mut self, child: Option<NodeRef>, owner: NodeRef) {
        if let Some(child) = child {
            if let Some(node) = self.nodes.get_mut(child) {
                node.parent = Some(owner);
            }
        }
    }

    ///Assigns the function's body slot. `body` must be a block node; `None`
    /// detaches the old body without attaching anything.
    pub fn set_body(&mut self, func: NodeRef, body: Option<NodeRef>) {
        debug_assert!(
            body.map_or(true, |b| matches!(self.kind(b), Some(NodeKind::Block(_)))),
            "function body must be a block"
        );
        let old = match self.kind(func) {
            Some(NodeKind::Function(f)) => f.body,
            _ => {
                debug_assert!(false, "set_body on a non-function node");
                return;
            }
        };
        self.release(old, func);
        if let Some(NodeKind::Function(f)) = self.kind_mut(func) {
            f.body = body;
        }
        self.claim(body, func);
    }

    ///Assigns the function's parameter-list slot. `params` must be a list
    /// declared over parameters.
    pub fn set_parameters(&mut self, func: NodeRef, params: Option<NodeRef>) {
        debug_assert!(
            params.map_or(true, |p| matches!(
                self.kind(p),
                Some(NodeKind::List(l)) if l.elem == ElemKind::Parameter
            )),
            "function parameters must be a parameter list"
        );
        let old = match self.kind(func) {
            Some(NodeKind::Function(f)) => f.parameters,
            _ => {
                debug_assert!(false, "set_parameters on a non-function node");
                return;
            }
        };
        self.release(old, func);
        if let Some(NodeKind::Function(f)) = self.kind_mut(func) {
            f.parameters = params;
        }
        self.claim(params, func);
    }

    ///Assigns the wrapped expression of an expression statement.
    pub fn set_expr(&mut self, stmt: NodeRef, expr: Option<NodeRef>) {
        debug_assert!(
            expr.map_or(true, |e| self.kind(e).map_or(false, |k| k.is_expression())),
            "expression statement must wrap an expression"
        );
        let old = match self.kind(stmt) {
            Some(NodeKind::ExprStmt(s)) => s.expr,
            _ => {
                debug_assert!(false, "set_expr on a non-expression-statement node");
                return;
            }
        };
        self.release(old, stmt);
        if let Some(NodeKind::ExprStmt(s)) = self.kind_mut(stmt) {
            s.expr = expr;
        }
        self.claim(expr, stmt);
    }

    ///Appends `item` to the list, taking ownership. The item must satisfy the
    /// list's declared element kind.
    pub fn list_push(&mut self, list: NodeRef, item: NodeRef) {
        let ok = match self.kind(list) {
            Some(NodeKind::List(l)) => self
                .kind(item)
                .map_or(false, |k| k.satisfies(l.elem)),
            _ => false,
        };
        debug_assert!(ok, "list_push: not a list, or incompatible element kind");
        if !ok {
            return;
        }
        if let Some(NodeKind::List(l)) = self.kind_mut(list) {
            l.items.push(item);
        }
        self.claim(Some(item), list);
    }

    ///Appends a statement to a block.
    pub fn push_statement(&mut self, block: NodeRef, stmt: NodeRef) {
        let ok = matches!(self.kind(block), Some(NodeKind::Block(_)))
            && self.kind(stmt).map_or(false, |k| k.is_statement());
        debug_assert!(ok, "push_statement: not a block, or not a statement");
        if !ok {
            return;
        }
        if let Some(NodeKind::Block(b)) = self.kind_mut(block) {
            b.statements.push(stmt);
        }
        self.claim(Some(stmt), block);
    }

    //---- traversal -------------------------------------------------------

    ///Immediate non-null children of `node`, in the fixed order [Tree::walk]
    /// visits them. Restartable: every call yields a fresh iterator.
    pub fn children(&self, node: NodeRef) -> impl Iterator<Item = NodeRef> {
        self.get(node)
            .map(|n| n.kind.child_refs())
            .unwrap_or_default()
            .into_iter()
    }

    //---- structural replacement -----------------------------------------

    ///Swaps `old` for `new` in whatever slot of `parent` currently holds
    /// `old`. Matching is by node identity. Statement slots coerce the
    /// replacement into a block first; list slots require a compatible
    /// shape. Returns `false`, changing nothing, if
    /// `old` is not a child of `parent`, `new` does not fit the slot, or the
    /// swap would make `new` an ancestor of itself.
    ///
    /// This is the sole structural mutation primitive rewrite passes may use.
    pub fn replace_child(&mut self, parent: NodeRef, old: NodeRef, new: NodeRef) -> bool {
        if self.get(new).is_none() {
            return false;
        }

        //installing a node above itself would close a cycle under `new`
        let mut cursor = Some(parent);
        while let Some(at) = cursor {
            if at == new {
                return false;
            }
            cursor = self.parent(at);
        }

        enum Hit {
            Body,
            Params,
            BlockAt(usize),
            ListAt(usize, ElemKind),
            Expr,
        }

        let hit = match self.nodes.get(parent).map(|n| &n.kind) {
            Some(NodeKind::Function(f)) if f.body == Some(old) => Hit::Body,
            Some(NodeKind::Function(f)) if f.parameters == Some(old) => Hit::Params,
            Some(NodeKind::Block(b)) => {
                match b.statements.iter().position(|&s| s == old) {
                    Some(idx) => Hit::BlockAt(idx),
                    None => return false,
                }
            }
            Some(NodeKind::List(l)) => match l.items.iter().position(|&i| i == old) {
                Some(idx) => Hit::ListAt(idx, l.elem),
                None => return false,
            },
            Some(NodeKind::ExprStmt(s)) if s.expr == Some(old) => Hit::Expr,
            _ => return false,
        };

        match hit {
            Hit::Body => {
                let fits = self
                    .kind(new)
                    .map_or(false, |k| k.is_statement() || k.is_expression());
                if !fits {
                    return false;
                }
                let block = self.force_to_block(new);
                self.set_body(parent, Some(block));
                true
            }
            Hit::Params => {
                //the replacement must itself be a list of a compatible element kind
                match self.kind(new) {
                    Some(NodeKind::List(l)) if l.elem == ElemKind::Parameter => {}
                    _ => return false,
                }
                self.set_parameters(parent, Some(new));
                true
            }
            Hit::BlockAt(idx) => {
                let fits = self
                    .kind(new)
                    .map_or(false, |k| k.is_statement() || k.is_expression());
                if !fits {
                    return false;
                }
                let stmt = self.force_to_statement(new);
                self.release(Some(old), parent);
                if let Some(NodeKind::Block(b)) = self.kind_mut(parent) {
                    b.statements[idx] = stmt;
                }
                self.claim(Some(stmt), parent);
                true
            }
            Hit::ListAt(idx, elem) => {
                if !self.kind(new).map_or(false, |k| k.satisfies(elem)) {
                    return false;
                }
                self.release(Some(old), parent);
                if let Some(NodeKind::List(l)) = self.kind_mut(parent) {
                    l.items[idx] = new;
                }
                self.claim(Some(new), parent);
                true
            }
            Hit::Expr => {
                if !self.kind(new).map_or(false, |k| k.is_expression()) {
                    return false;
                }
                self.set_expr(parent, Some(new));
                true
            }
        }
    }

    ///Single conversion point for statement-kind slots: a block passes
    /// through, any other statement gets wrapped into a fresh block, an
    /// expression additionally into an expression statement. The wrappers
    /// take over the wrapped node's span.
    fn force_to_block(&mut self, node: NodeRef) -> NodeRef {
        let span = match self.get(node) {
            Some(n) if matches!(n.kind, NodeKind::Block(_)) => return node,
            Some(n) => n.span.clone(),
            None => return node,
        };
        let stmt = self.force_to_statement(node);
        let block = self.insert(span, NodeKind::Block(Default::default()));
        self.push_statement(block, stmt);
        block
    }

    fn force_to_statement(&mut self, node: NodeRef) -> NodeRef {
        let span = match self.get(node) {
            Some(n) if !n.kind.is_statement() => n.span.clone(),
            _ => return node,
        };
        let stmt = self.insert(span, NodeKind::ExprStmt(ExprStmt::new()));
        self.set_expr(stmt, Some(node));
        stmt
    }

    //---- lifecycle -------------------------------------------------------

    ///Removes `node` from its parent's forward slot (if any) and clears the
    /// back-reference, returning the node to the unattached state.
    pub fn detach(&mut self, node: NodeRef) {
        let Some(parent) = self.parent(node) else {
            return;
        };
        if let Some(kind) = self.kind_mut(parent) {
            match kind {
                NodeKind::Function(f) => {
                    if f.body == Some(node) {
                        f.body = None;
                    }
                    if f.parameters == Some(node) {
                        f.parameters = None;
                    }
                }
                //SmallVec::retain hands the closure a mutable reference
                NodeKind::Block(b) => b.statements.retain(|s| *s != node),
                NodeKind::List(l) => l.items.retain(|i| *i != node),
                NodeKind::ExprStmt(s) => {
                    if s.expr == Some(node) {
                        s.expr = None;
                    }
                }
                NodeKind::Parameter(_) | NodeKind::Ident(_) | NodeKind::Literal(_) => {}
            }
        }
        self.release(Some(node), parent);
    }

    ///Detaches `node` and frees its whole subtree from the arena. Refs into
    /// the subtree become stale and miss on [Tree::get] afterwards.
    pub fn discard(&mut self, node: NodeRef) {
        self.detach(node);
        let mut stack: SmallVec<[NodeRef; 8]> = smallvec![node];
        while let Some(next) = stack.pop() {
            if let Some(removed) = self.nodes.remove(next) {
                stack.extend(removed.kind.child_refs());
            }
        }
    }

    ///Audits the parent/child bookkeeping of the subtree under `root`: every
    /// reachable child must point back at its structural parent. Used by the
    /// debug assertions and tests; [validate](crate::validate::validate)
    /// reports the same defects with spans attached.
    pub fn is_consistent(&self, root: NodeRef) -> bool {
        let Some(node) = self.get(root) else {
            return false;
        };
        for child in node.kind.child_refs() {
            match self.get(child) {
                Some(c) if c.parent == Some(root) => {
                    if !self.is_consistent(child) {
                        return false;
                    }
                }
                _ => return false,
            }
        }
        true
    }
}

impl std::ops::Index<NodeRef> for Tree {
    type Output = Node;

    fn index(&self, index: NodeRef) -> &Self::Output {
        &self.nodes[index]
    }
}

#[cfg(test)]
mod test {
    use sable_common::Span;

    use super::Tree;
    use crate::{
        func::{Function, FunctionKind},
        node::{Block, ElemKind, Ident, NodeKind, NodeList, Parameter},
    };

    fn function_with_body(tree: &mut Tree) -> (super::NodeRef, super::NodeRef) {
        let func = tree.insert(
            Span::new(0, 30),
            NodeKind::Function(Function::new(FunctionKind::Declaration)),
        );
        let body = tree.insert(Span::new(14, 30), NodeKind::Block(Block::new()));
        tree.set_body(func, Some(body));
        (func, body)
    }

    #[test]
    fn assignment_wires_parent() {
        let mut tree = Tree::new();
        let (func, body) = function_with_body(&mut tree);

        assert_eq!(tree.parent(body), Some(func));
        assert_eq!(tree.function(func).unwrap().body(), Some(body));
        assert!(tree.is_consistent(func));
    }

    #[test]
    fn reassignment_detaches_old_child() {
        let mut tree = Tree::new();
        let (func, old_body) = function_with_body(&mut tree);
        let new_body = tree.insert(Span::new(20, 30), NodeKind::Block(Block::new()));

        tree.set_body(func, Some(new_body));
        assert_eq!(tree.parent(old_body), None);
        assert_eq!(tree.parent(new_body), Some(func));

        let children: Vec<_> = tree.children(func).collect();
        assert!(children.contains(&new_body));
        assert!(!children.contains(&old_body));
        assert_eq!(tree[new_body].parent(), Some(func));
        assert!(tree.is_consistent(func));
    }

    #[test]
    fn assigning_same_value_is_noop_in_effect() {
        let mut tree = Tree::new();
        let (func, body) = function_with_body(&mut tree);

        tree.set_body(func, Some(body));
        assert_eq!(tree.parent(body), Some(func));
        assert_eq!(tree.function(func).unwrap().body(), Some(body));
    }

    #[test]
    fn assigning_none_detaches() {
        let mut tree = Tree::new();
        let (func, body) = function_with_body(&mut tree);

        tree.set_body(func, None);
        assert_eq!(tree.parent(body), None);
        assert_eq!(tree.function(func).unwrap().body(), None);
        assert_eq!(tree.children(func).count(), 0);
    }

    #[test]
    fn foreign_parent_pointer_is_left_alone() {
        let mut tree = Tree::new();
        let (func_a, body) = function_with_body(&mut tree);
        let func_b = tree.insert(
            Span::new(40, 70),
            NodeKind::Function(Function::new(FunctionKind::Declaration)),
        );

        //reparent the block externally, then clear the stale slot of func_a
        tree.set_body(func_b, Some(body));
        assert_eq!(tree.parent(body), Some(func_b));

        tree.set_body(func_a, None);
        //func_a no longer owned the block, so the back-reference stays
        assert_eq!(tree.parent(body), Some(func_b));
    }

    #[test]
    fn list_preserves_order() {
        let mut tree = Tree::new();
        let list = tree.insert(
            Span::new(9, 15),
            NodeKind::List(NodeList::new(ElemKind::Parameter)),
        );
        let names = ["a", "b", "c"];
        let mut refs = Vec::new();
        for (idx, name) in names.iter().enumerate() {
            let param = tree.insert(
                Span::new(10 + 2 * idx, 11 + 2 * idx),
                NodeKind::Parameter(Parameter::new(*name, idx)),
            );
            tree.list_push(list, param);
            refs.push(param);
        }

        let children: Vec<_> = tree.children(list).collect();
        assert_eq!(children, refs);
        for param in refs {
            assert_eq!(tree.parent(param), Some(list));
        }
    }

    #[test]
    fn detach_clears_both_directions() {
        let mut tree = Tree::new();
        let (func, body) = function_with_body(&mut tree);

        tree.detach(body);
        assert_eq!(tree.parent(body), None);
        assert_eq!(tree.function(func).unwrap().body(), None);
        //the node itself is still alive and can be reattached
        tree.set_body(func, Some(body));
        assert_eq!(tree.parent(body), Some(func));
    }

    #[test]
    fn detach_removes_block_and_list_entries() {
        let mut tree = Tree::new();
        let block = tree.insert(Span::new(0, 10), NodeKind::Block(Block::new()));
        let stmt = tree.insert(
            Span::new(1, 4),
            NodeKind::ExprStmt(crate::node::ExprStmt::new()),
        );
        tree.push_statement(block, stmt);

        tree.detach(stmt);
        assert_eq!(tree.parent(stmt), None);
        assert_eq!(tree.children(block).count(), 0);

        let list = tree.insert(
            Span::new(0, 6),
            NodeKind::List(NodeList::new(ElemKind::Parameter)),
        );
        let a = tree.insert(Span::new(1, 2), NodeKind::Parameter(Parameter::new("a", 0)));
        let b = tree.insert(Span::new(4, 5), NodeKind::Parameter(Parameter::new("b", 1)));
        tree.list_push(list, a);
        tree.list_push(list, b);

        tree.detach(a);
        assert_eq!(tree.parent(a), None);
        assert_eq!(tree.children(list).collect::<Vec<_>>(), vec![b]);
    }

    #[test]
    fn discard_frees_the_subtree() {
        let mut tree = Tree::new();
        let (func, body) = function_with_body(&mut tree);
        let stmt = tree.insert(
            Span::new(16, 20),
            NodeKind::ExprStmt(crate::node::ExprStmt::new()),
        );
        let expr = tree.insert(Span::new(16, 19), NodeKind::Ident(Ident::from("foo")));
        tree.set_expr(stmt, Some(expr));
        tree.push_statement(body, stmt);

        tree.discard(body);
        assert!(tree.get(body).is_none());
        assert!(tree.get(stmt).is_none());
        assert!(tree.get(expr).is_none());
        assert_eq!(tree.function(func).unwrap().body(), None);
        assert_eq!(tree.len(), 1);
    }
}
