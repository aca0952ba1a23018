//! Builds the tree for a small function by hand, the way the parser would,
//! then walks it and renders a diagnostic against the original source text.

use sable_ast::{
    AstVisitor, Block, ElemKind, Function, FunctionKind, Ident, NodeKind, NodeList, NodeRef,
    Parameter, Tree,
};
use sable_common::{ariadne::Label, warning_reporter, SourceCache, Span};

const FILE: &str = "demo.js";
const SRC: &str = "function add(a, b) { a; }";

///Collects every function name (or name guess) it encounters.
#[derive(Default)]
struct FunctionNames(Vec<String>);

impl AstVisitor for FunctionNames {
    fn enter_function(&mut self, _tree: &Tree, _node: NodeRef, func: &Function) -> bool {
        self.0
            .push(func.display_name().unwrap_or("<anonymous>").to_owned());
        true
    }
}

fn main() {
    let mut tree = Tree::new();

    let func = tree.insert(
        Span::with_file(FILE, 0, 25),
        NodeKind::Function(Function::new(FunctionKind::Declaration)),
    );
    {
        let f = tree.function_mut(func).expect("just inserted a function");
        f.name = Some(Ident::from("add"));
        f.name_span = Span::with_file(FILE, 9, 12);
        f.parameters_span = Span::with_file(FILE, 12, 18);
    }

    let params = tree.insert(
        Span::with_file(FILE, 12, 18),
        NodeKind::List(NodeList::new(ElemKind::Parameter)),
    );
    for (idx, (name, start)) in [("a", 13usize), ("b", 16)].iter().enumerate() {
        let param = tree.insert(
            Span::with_file(FILE, *start, *start + 1),
            NodeKind::Parameter(Parameter::new(*name, idx)),
        );
        tree.list_push(params, param);
    }

    let body = tree.insert(Span::with_file(FILE, 19, 25), NodeKind::Block(Block::new()));
    let stmt = tree.insert(
        Span::with_file(FILE, 21, 23),
        NodeKind::ExprStmt(sable_ast::ExprStmt::new()),
    );
    let expr = tree.insert(
        Span::with_file(FILE, 21, 22),
        NodeKind::Ident(Ident::from("a")),
    );
    tree.set_expr(stmt, Some(expr));
    tree.push_statement(body, stmt);

    tree.set_parameters(func, Some(params));
    tree.set_body(func, Some(body));

    match sable_ast::validate(&tree, func) {
        Ok(()) => println!("tree checks out, {} nodes", tree.len()),
        Err(errs) => {
            let mut cache = SourceCache::new();
            cache.add_source(FILE, SRC);
            for err in errs {
                err.report(&mut cache);
            }
            return;
        }
    }

    let mut names = FunctionNames::default();
    tree.walk(func, &mut names);
    println!("functions: {:?}", names.0);

    //a rewrite pass swaps the body for an expression; the slot contract
    //wraps it back into a block
    let replacement = tree.insert(
        Span::with_file(FILE, 21, 22),
        NodeKind::Ident(Ident::from("b")),
    );
    let old_body = tree.function(func).expect("still a function").body();
    if let Some(old_body) = old_body {
        assert!(tree.replace_child(func, old_body, replacement));
    }

    //and a diagnostic rendered against the source text
    let mut cache = SourceCache::new();
    cache.add_source(FILE, SRC);
    let f = tree.function(func).expect("still a function");
    let _ = warning_reporter("parameter `b` is never read", f.parameters_span.clone())
        .with_label(Label::new(Span::with_file(FILE, 16, 17)).with_message("declared here"))
        .finish()
        .eprint(&mut cache);
}
