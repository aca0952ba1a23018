/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */
//! # Sable-AST
//!
//! The syntax-node model of the sable JavaScript frontend: node kinds,
//! parent/child bookkeeping, traversal and structural rewriting. The lexer,
//! the grammar, name binding and code generation live outside this crate and
//! only talk to the tree through the contracts exported here.
//!
//! All nodes live in a [Tree] arena and are addressed by [NodeRef] keys.
//! Children are owned by the arena; the parent link on each node is a plain
//! back-reference used for upward navigation and invariant checks, never for
//! lifetime management. The parser builds bottom-up: it [inserts](Tree::insert)
//! unattached nodes, then wires them into slots (`set_body`, `set_parameters`,
//! `list_push`, ...), which keeps forward link and back-reference in
//! agreement.
//!
//! Finished trees are consumed through three contracts:
//! * [Tree::walk] with an [AstVisitor] — two-phase enter/exit traversal,
//!   where an enter hook returning `false` prunes the subtree,
//! * [Tree::children] — plain enumeration of the immediate non-null children,
//!   in the same fixed order `walk` uses,
//! * [Tree::replace_child] — the sole structural mutation primitive for
//!   rewrite passes, enforcing the slot-kind and parent-link invariants.
//!
//! One tree must only ever be mutated from one thread at a time; independent
//! trees can be worked on concurrently.

pub mod func;
pub mod node;
pub mod tree;
pub mod util;
pub mod validate;

pub use func::{BindingRef, Function, FunctionKind};
pub use node::{Block, ElemKind, ExprStmt, Ident, Literal, NodeKind, NodeList, Parameter};
pub use tree::{Node, NodeRef, Tree};
pub use util::AstVisitor;
pub use validate::{validate, ValidateError};
