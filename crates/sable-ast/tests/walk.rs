use sable_ast::{
    AstVisitor, Block, ElemKind, Function, FunctionKind, Ident, NodeKind, NodeList, NodeRef,
    Parameter, Tree,
};
use sable_common::Span;

///Builds `function f(a, b) { a; }`-shaped structure by hand, the way the
/// parser would: nodes first, slots wired afterwards.
fn build_function(tree: &mut Tree) -> (NodeRef, NodeRef, NodeRef) {
    let func = tree.insert(
        Span::new(0, 30),
        NodeKind::Function(Function::new(FunctionKind::Declaration)),
    );
    {
        let f = tree.function_mut(func).unwrap();
        f.name = Some(Ident::from("f"));
        f.name_span = Span::new(9, 10);
        f.parameters_span = Span::new(10, 16);
    }

    let params = tree.insert(
        Span::new(10, 16),
        NodeKind::List(NodeList::new(ElemKind::Parameter)),
    );
    let param_a = tree.insert(Span::new(11, 12), NodeKind::Parameter(Parameter::new("a", 0)));
    let param_b = tree.insert(Span::new(14, 15), NodeKind::Parameter(Parameter::new("b", 1)));
    tree.list_push(params, param_a);
    tree.list_push(params, param_b);

    let body = tree.insert(Span::new(17, 30), NodeKind::Block(Block::new()));
    let stmt = tree.insert(
        Span::new(19, 21),
        NodeKind::ExprStmt(sable_ast::ExprStmt::new()),
    );
    let expr = tree.insert(Span::new(19, 20), NodeKind::Ident(Ident::from("a")));
    tree.set_expr(stmt, Some(expr));
    tree.push_statement(body, stmt);

    tree.set_parameters(func, Some(params));
    tree.set_body(func, Some(body));
    (func, params, body)
}

///Records every hook invocation as a readable event string.
#[derive(Default)]
struct Recorder {
    events: Vec<String>,
    prune_list: bool,
}

impl AstVisitor for Recorder {
    fn enter_function(&mut self, _tree: &Tree, _node: NodeRef, _func: &Function) -> bool {
        self.events.push("enter function".into());
        true
    }
    fn exit_function(&mut self, _tree: &Tree, _node: NodeRef, _func: &Function) {
        self.events.push("exit function".into());
    }
    fn enter_list(&mut self, _tree: &Tree, _node: NodeRef, _list: &NodeList) -> bool {
        self.events.push("enter list".into());
        !self.prune_list
    }
    fn exit_list(&mut self, _tree: &Tree, _node: NodeRef, _list: &NodeList) {
        self.events.push("exit list".into());
    }
    fn enter_parameter(&mut self, _tree: &Tree, _node: NodeRef, param: &Parameter) -> bool {
        self.events.push(format!("enter parameter {}", param.name));
        true
    }
    fn exit_parameter(&mut self, _tree: &Tree, _node: NodeRef, param: &Parameter) {
        self.events.push(format!("exit parameter {}", param.name));
    }
    fn enter_block(&mut self, _tree: &Tree, _node: NodeRef, _block: &Block) -> bool {
        self.events.push("enter block".into());
        true
    }
    fn exit_block(&mut self, _tree: &Tree, _node: NodeRef, _block: &Block) {
        self.events.push("exit block".into());
    }
}

///Collects the enter-order of every node, regardless of kind.
#[derive(Default)]
struct Preorder {
    order: Vec<NodeRef>,
}

impl AstVisitor for Preorder {
    fn enter_function(&mut self, _t: &Tree, node: NodeRef, _f: &Function) -> bool {
        self.order.push(node);
        true
    }
    fn enter_block(&mut self, _t: &Tree, node: NodeRef, _b: &Block) -> bool {
        self.order.push(node);
        true
    }
    fn enter_list(&mut self, _t: &Tree, node: NodeRef, _l: &NodeList) -> bool {
        self.order.push(node);
        true
    }
    fn enter_parameter(&mut self, _t: &Tree, node: NodeRef, _p: &Parameter) -> bool {
        self.order.push(node);
        true
    }
    fn enter_expr_stmt(&mut self, _t: &Tree, node: NodeRef, _s: &sable_ast::ExprStmt) -> bool {
        self.order.push(node);
        true
    }
    fn enter_ident(&mut self, _t: &Tree, node: NodeRef, _i: &Ident) -> bool {
        self.order.push(node);
        true
    }
    fn enter_literal(&mut self, _t: &Tree, node: NodeRef, _l: &sable_ast::Literal) -> bool {
        self.order.push(node);
        true
    }
}

fn children_preorder(tree: &Tree, node: NodeRef, out: &mut Vec<NodeRef>) {
    out.push(node);
    for child in tree.children(node) {
        children_preorder(tree, child, out);
    }
}

#[test]
fn children_are_parameters_then_body() {
    let mut tree = Tree::new();
    let func = tree.insert(
        Span::new(0, 30),
        NodeKind::Function(Function::new(FunctionKind::Declaration)),
    );
    {
        let f = tree.function_mut(func).unwrap();
        f.name = Some(Ident::from("f"));
        f.name_span = Span::new(9, 10);
    }
    let params = tree.insert(
        Span::new(10, 12),
        NodeKind::List(NodeList::new(ElemKind::Parameter)),
    );
    let body = tree.insert(Span::new(14, 30), NodeKind::Block(Block::new()));
    tree.set_parameters(func, Some(params));
    tree.set_body(func, Some(body));

    let children: Vec<_> = tree.children(func).collect();
    assert_eq!(children, vec![params, body]);
    assert_eq!(tree.parent(params), Some(func));
    assert_eq!(tree.parent(body), Some(func));
    assert_eq!(tree.function(func).unwrap().name_span, Span::new(9, 10));
}

#[test]
fn null_slots_are_omitted() {
    let mut tree = Tree::new();
    let func = tree.insert(
        Span::new(0, 30),
        NodeKind::Function(Function::new(FunctionKind::Expression)),
    );
    let body = tree.insert(Span::new(14, 30), NodeKind::Block(Block::new()));
    tree.set_body(func, Some(body));

    //no parameter list yet: children must skip the slot, not fail
    let children: Vec<_> = tree.children(func).collect();
    assert_eq!(children, vec![body]);
}

#[test]
fn enter_and_exit_bracket_the_children() {
    let mut tree = Tree::new();
    let (func, _, _) = build_function(&mut tree);

    let mut recorder = Recorder::default();
    tree.walk(func, &mut recorder);

    assert_eq!(
        recorder.events,
        vec![
            "enter function",
            "enter list",
            "enter parameter a",
            "exit parameter a",
            "enter parameter b",
            "exit parameter b",
            "exit list",
            "enter block",
            "exit block",
            "exit function",
        ]
    );
}

#[test]
fn pruned_list_skips_parameters_but_exits_still_run() {
    let mut tree = Tree::new();
    let (func, _, _) = build_function(&mut tree);

    let mut recorder = Recorder {
        prune_list: true,
        ..Default::default()
    };
    tree.walk(func, &mut recorder);

    assert!(!recorder.events.iter().any(|e| e.contains("parameter")));
    assert!(recorder.events.contains(&"exit list".to_string()));
    assert_eq!(recorder.events.last().unwrap(), "exit function");
}

#[test]
fn walk_agrees_with_children_enumeration() {
    let mut tree = Tree::new();
    let (func, _, _) = build_function(&mut tree);

    let mut preorder = Preorder::default();
    tree.walk(func, &mut preorder);

    let mut expected = Vec::new();
    children_preorder(&tree, func, &mut expected);

    assert_eq!(preorder.order, expected);
}

#[test]
fn walk_agreement_survives_rewrites() {
    let mut tree = Tree::new();
    let (func, _, body) = build_function(&mut tree);

    let replacement = tree.insert(Span::new(17, 30), NodeKind::Block(Block::new()));
    assert!(tree.replace_child(func, body, replacement));

    let mut preorder = Preorder::default();
    tree.walk(func, &mut preorder);
    let mut expected = Vec::new();
    children_preorder(&tree, func, &mut expected);
    assert_eq!(preorder.order, expected);
    assert!(tree.is_consistent(func));
}
