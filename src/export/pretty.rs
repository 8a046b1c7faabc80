//! Export pretty printed version of the tree in a Groovy-like surface
//! syntax.
use crate::common::prettify::ToPretty;
use crate::syntax::tree::*;
use pretty::{DocAllocator, DocBuilder};

/// Escape text for output between double quotes
fn escape(s: &str, interpolating: bool) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '$' if interpolating => out.push_str("\\$"),
            c => out.push(c),
        }
    }
    out
}

impl ToPretty for Primitive {
    fn pretty<'b, D, A>(&'b self, allocator: &'b D) -> DocBuilder<'b, D, A>
    where
        D: DocAllocator<'b, A>,
        D::Doc: Clone,
        A: Clone,
    {
        match self {
            Primitive::Str(s) => allocator
                .text("\"")
                .append(allocator.text(escape(s, false)))
                .append(allocator.text("\"")),
            Primitive::Num(n) => allocator.text(format!("{}", n)),
            Primitive::Bool(b) => allocator.text(if *b { "true" } else { "false" }),
            Primitive::Null => allocator.text("null"),
        }
    }
}

/// Arrange the statements of a block between braces, with optional
/// closure parameters
fn pretty_braced<'b, D, A>(
    allocator: &'b D,
    params: &'b [String],
    body: &'b Block,
) -> DocBuilder<'b, D, A>
where
    D: DocAllocator<'b, A>,
    D::Doc: Clone,
    A: Clone,
{
    let open = if params.is_empty() {
        allocator.text("{")
    } else {
        allocator
            .text("{ ")
            .append(allocator.text(params.join(", ")))
            .append(allocator.text(" ->"))
    };

    if body.is_empty() {
        return open.append(allocator.text(" }"));
    }

    let stmt_docs = body.stmts.iter().map(|s| s.pretty(allocator));
    open.append(
        allocator
            .line()
            .append(allocator.intersperse(stmt_docs, allocator.hardline()))
            .nest(2),
    )
    .append(allocator.line())
    .append(allocator.text("}"))
    .group()
}

/// Parenthesise nested binary operations
fn pretty_operand<'b, D, A>(expr: &'b RcExpr, allocator: &'b D) -> DocBuilder<'b, D, A>
where
    D: DocAllocator<'b, A>,
    D::Doc: Clone,
    A: Clone,
{
    match &*expr.inner {
        Expr::Binary(_, _, _, _) => allocator
            .text("(")
            .append(expr.pretty(allocator))
            .append(allocator.text(")")),
        _ => expr.pretty(allocator),
    }
}

impl ToPretty for RcExpr {
    /// Arrange expression into pretty doc
    fn pretty<'b, D, A>(&'b self, allocator: &'b D) -> DocBuilder<'b, D, A>
    where
        D: DocAllocator<'b, A>,
        D::Doc: Clone,
        A: Clone,
    {
        match &*self.inner {
            Expr::Literal(_, prim) => prim.pretty(allocator),
            Expr::GString(_, chunks) => {
                let chunk_docs = chunks.iter().map(|c| match c {
                    Chunk::Text(t) => allocator.text(escape(t, true)),
                    Chunk::Interpolation(e) => allocator
                        .text("${")
                        .append(e.pretty(allocator))
                        .append(allocator.text("}")),
                });
                allocator
                    .text("\"")
                    .append(allocator.concat(chunk_docs))
                    .append(allocator.text("\""))
            }
            Expr::Var(_, name) => allocator.text(name),
            Expr::Property(_, target, name) => target
                .pretty(allocator)
                .append(allocator.text("."))
                .append(allocator.text(name)),
            Expr::Call(_, receiver, method, args) => {
                let args_docs = args.iter().map(|x| x.pretty(allocator));
                let target = match receiver {
                    Some(r) => r.pretty(allocator).append(allocator.text(".")),
                    None => allocator.nil(),
                };

                target
                    .append(allocator.text(method))
                    .append(allocator.text("("))
                    .append(
                        allocator.intersperse(args_docs, allocator.text(",").append(allocator.space())),
                    )
                    .append(allocator.text(")"))
            }
            Expr::Map(_, entries) => {
                if entries.is_empty() {
                    return allocator.text("[:]");
                }
                let entry_docs = entries.iter().map(|(k, v)| {
                    allocator
                        .text(k)
                        .append(allocator.text(":"))
                        .append(allocator.space())
                        .append(v.pretty(allocator))
                });
                allocator
                    .text("[")
                    .append(
                        allocator.intersperse(entry_docs, allocator.text(",").append(allocator.space())),
                    )
                    .append(allocator.text("]"))
            }
            Expr::List(_, items) => {
                let item_docs = items.iter().map(|x| x.pretty(allocator));
                allocator
                    .text("[")
                    .append(
                        allocator.intersperse(item_docs, allocator.text(",").append(allocator.space())),
                    )
                    .append(allocator.text("]"))
            }
            Expr::Binary(_, op, l, r) => pretty_operand(l, allocator)
                .append(allocator.space())
                .append(allocator.text(op.symbol()))
                .append(allocator.space())
                .append(pretty_operand(r, allocator)),
            Expr::Closure(_, params, body) => pretty_braced(allocator, params, body),
            Expr::Thunk(_, body) => pretty_braced(allocator, &[], body),
        }
    }
}

impl ToPretty for Stmt {
    fn pretty<'b, D, A>(&'b self, allocator: &'b D) -> DocBuilder<'b, D, A>
    where
        D: DocAllocator<'b, A>,
        D::Doc: Clone,
        A: Clone,
    {
        let label = match self.label() {
            Some(l) => allocator.text(l).append(allocator.text(": ")),
            None => allocator.nil(),
        };
        let keyword = if self.is_return() {
            allocator.text("return ")
        } else {
            allocator.nil()
        };
        label.append(keyword).append(self.expr().pretty(allocator))
    }
}

impl ToPretty for Block {
    fn pretty<'b, D, A>(&'b self, allocator: &'b D) -> DocBuilder<'b, D, A>
    where
        D: DocAllocator<'b, A>,
        D::Doc: Clone,
        A: Clone,
    {
        let stmt_docs = self.stmts.iter().map(|s| s.pretty(allocator));
        allocator.intersperse(stmt_docs, allocator.hardline())
    }
}
