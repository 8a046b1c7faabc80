//! Statement and expression tree of the process DSL
//!
//! This is the shape the host parser hands over and the shape the
//! desugared result takes. Nodes are immutable and shared by `Rc`;
//! rewrites build new nodes.
use crate::common::sourcemap::{HasSmid, Smid};
use crate::syntax::scope::ScopeId;
use indexmap::IndexMap;
use serde_json::Number;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

/// Constant values
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Str(String),
    Num(Number),
    Bool(bool),
    Null,
}

/// Binary operators the tree can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    And,
    Or,
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Le => "<=",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for BinaryOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(BinaryOp::Add),
            "-" => Ok(BinaryOp::Sub),
            "*" => Ok(BinaryOp::Mul),
            "/" => Ok(BinaryOp::Div),
            "%" => Ok(BinaryOp::Mod),
            "==" => Ok(BinaryOp::Eq),
            "!=" => Ok(BinaryOp::Ne),
            "<" => Ok(BinaryOp::Lt),
            ">" => Ok(BinaryOp::Gt),
            "<=" => Ok(BinaryOp::Le),
            ">=" => Ok(BinaryOp::Ge),
            "&&" => Ok(BinaryOp::And),
            "||" => Ok(BinaryOp::Or),
            _ => Err(s.to_string()),
        }
    }
}

/// Piece of an interpolated string
#[derive(Debug, Clone, PartialEq)]
pub enum Chunk {
    Text(String),
    Interpolation(RcExpr),
}

/// The expression type
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Constant
    Literal(Smid, Primitive),
    /// Interpolated string ("echo $x")
    GString(Smid, Vec<Chunk>),
    /// Bare identifier, which may or may not be bound yet
    Var(Smid, String),
    /// Property access (target.name)
    Property(Smid, RcExpr, String),
    /// Method call with optional receiver (receiver.method(args))
    Call(Smid, Option<RcExpr>, String, Vec<RcExpr>),
    /// Map literal, also the shape of named arguments
    Map(Smid, IndexMap<String, RcExpr>),
    /// List literal
    List(Smid, Vec<RcExpr>),
    /// Binary operation
    Binary(Smid, BinaryOp, RcExpr, RcExpr),
    /// Closure with parameters
    Closure(Smid, Vec<String>, Block),
    /// Zero-parameter deferred block, run later (zero or more times)
    /// at the executor's discretion
    Thunk(Smid, Block),
}

impl HasSmid for Expr {
    fn smid(&self) -> Smid {
        use self::Expr::*;
        match *self {
            Literal(s, _) => s,
            GString(s, _) => s,
            Var(s, _) => s,
            Property(s, _, _) => s,
            Call(s, _, _, _) => s,
            Map(s, _) => s,
            List(s, _) => s,
            Binary(s, _, _, _) => s,
            Closure(s, _, _) => s,
            Thunk(s, _) => s,
        }
    }
}

impl Expr {
    pub fn is_map(&self) -> bool {
        matches!(self, Expr::Map(_, _))
    }

    pub fn is_thunk(&self) -> bool {
        matches!(self, Expr::Thunk(_, _))
    }

    /// True for quoted or interpolated strings, which can stand as
    /// an implicit script
    pub fn is_string_like(&self) -> bool {
        matches!(
            self,
            Expr::Literal(_, Primitive::Str(_)) | Expr::GString(_, _)
        )
    }

    /// Name of a bare identifier
    pub fn var_name(&self) -> Option<&str> {
        match self {
            Expr::Var(_, name) => Some(name),
            _ => None,
        }
    }
}

/// The main form in which expressions are passed around
#[derive(Debug, Clone, PartialEq)]
pub struct RcExpr {
    pub inner: Rc<Expr>,
}

impl From<Expr> for RcExpr {
    fn from(src: Expr) -> RcExpr {
        RcExpr {
            inner: Rc::new(src),
        }
    }
}

impl HasSmid for RcExpr {
    fn smid(&self) -> Smid {
        self.inner.smid()
    }
}

impl RcExpr {
    /// Apply a possibly-failing transformation to each immediate
    /// sub-expression (including the expressions of statements in
    /// nested blocks) and rebuild.
    pub fn walk_safe<E, F>(&self, f: &mut F) -> Result<RcExpr, E>
    where
        F: FnMut(RcExpr) -> Result<RcExpr, E>,
    {
        let rebuilt = match &*self.inner {
            Expr::Literal(_, _) | Expr::Var(_, _) => return Ok(self.clone()),
            Expr::GString(s, chunks) => Expr::GString(
                *s,
                chunks
                    .iter()
                    .map(|c| match c {
                        Chunk::Text(t) => Ok(Chunk::Text(t.clone())),
                        Chunk::Interpolation(e) => f(e.clone()).map(Chunk::Interpolation),
                    })
                    .collect::<Result<Vec<_>, E>>()?,
            ),
            Expr::Property(s, target, name) => Expr::Property(*s, f(target.clone())?, name.clone()),
            Expr::Call(s, receiver, method, args) => {
                let receiver = match receiver {
                    Some(r) => Some(f(r.clone())?),
                    None => None,
                };
                Expr::Call(
                    *s,
                    receiver,
                    method.clone(),
                    args.iter()
                        .map(|a| f(a.clone()))
                        .collect::<Result<Vec<_>, E>>()?,
                )
            }
            Expr::Map(s, entries) => Expr::Map(
                *s,
                entries
                    .iter()
                    .map(|(k, v)| f(v.clone()).map(|v| (k.clone(), v)))
                    .collect::<Result<IndexMap<_, _>, E>>()?,
            ),
            Expr::List(s, items) => Expr::List(
                *s,
                items
                    .iter()
                    .map(|x| f(x.clone()))
                    .collect::<Result<Vec<_>, E>>()?,
            ),
            Expr::Binary(s, op, l, r) => Expr::Binary(*s, *op, f(l.clone())?, f(r.clone())?),
            Expr::Closure(s, params, body) => Expr::Closure(*s, params.clone(), body.walk_safe(f)?),
            Expr::Thunk(s, body) => Expr::Thunk(*s, body.walk_safe(f)?),
        };
        Ok(RcExpr::from(rebuilt))
    }
}

/// A statement: an expression evaluated for effect or returned,
/// optionally carrying a label (`input:`, `exec:`, ...)
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Expr(Smid, Option<String>, RcExpr),
    Return(Smid, Option<String>, RcExpr),
}

impl HasSmid for Stmt {
    fn smid(&self) -> Smid {
        match *self {
            Stmt::Expr(s, _, _) | Stmt::Return(s, _, _) => s,
        }
    }
}

impl Stmt {
    pub fn label(&self) -> Option<&str> {
        match self {
            Stmt::Expr(_, label, _) | Stmt::Return(_, label, _) => label.as_deref(),
        }
    }

    pub fn expr(&self) -> &RcExpr {
        match self {
            Stmt::Expr(_, _, e) | Stmt::Return(_, _, e) => e,
        }
    }

    pub fn is_return(&self) -> bool {
        matches!(self, Stmt::Return(_, _, _))
    }

    /// Same statement (kind, label, position) with a new expression
    pub fn with_expr(&self, expr: RcExpr) -> Stmt {
        match self {
            Stmt::Expr(s, label, _) => Stmt::Expr(*s, label.clone(), expr),
            Stmt::Return(s, label, _) => Stmt::Return(*s, label.clone(), expr),
        }
    }
}

/// A sequence of statements in a lexical scope
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub scope: ScopeId,
    pub stmts: Vec<Stmt>,
}

impl Block {
    pub fn new(scope: ScopeId, stmts: Vec<Stmt>) -> Self {
        Block { scope, stmts }
    }

    pub fn is_empty(&self) -> bool {
        self.stmts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.stmts.len()
    }

    /// Apply a possibly-failing transformation to the expression of
    /// every statement
    pub fn walk_safe<E, F>(&self, f: &mut F) -> Result<Block, E>
    where
        F: FnMut(RcExpr) -> Result<RcExpr, E>,
    {
        Ok(Block {
            scope: self.scope,
            stmts: self
                .stmts
                .iter()
                .map(|s| f(s.expr().clone()).map(|e| s.with_expr(e)))
                .collect::<Result<Vec<_>, E>>()?,
        })
    }
}

/// Construct tree nodes with source locations
pub mod tree {
    use super::*;

    /// Create a string
    pub fn str<T: AsRef<str>>(smid: Smid, s: T) -> RcExpr {
        RcExpr::from(Expr::Literal(smid, Primitive::Str(s.as_ref().to_string())))
    }

    /// Create a number
    pub fn num<N>(smid: Smid, n: N) -> RcExpr
    where
        N: Into<Number>,
    {
        RcExpr::from(Expr::Literal(smid, Primitive::Num(n.into())))
    }

    /// Create a boolean
    pub fn bool_(smid: Smid, b: bool) -> RcExpr {
        RcExpr::from(Expr::Literal(smid, Primitive::Bool(b)))
    }

    pub fn null(smid: Smid) -> RcExpr {
        RcExpr::from(Expr::Literal(smid, Primitive::Null))
    }

    /// Create an interpolated string
    pub fn gstring(smid: Smid, chunks: Vec<Chunk>) -> RcExpr {
        RcExpr::from(Expr::GString(smid, chunks))
    }

    pub fn var<T: AsRef<str>>(smid: Smid, name: T) -> RcExpr {
        RcExpr::from(Expr::Var(smid, name.as_ref().to_string()))
    }

    pub fn property<T: AsRef<str>>(smid: Smid, target: RcExpr, name: T) -> RcExpr {
        RcExpr::from(Expr::Property(smid, target, name.as_ref().to_string()))
    }

    /// Call without receiver
    pub fn call<T: AsRef<str>>(smid: Smid, method: T, args: Vec<RcExpr>) -> RcExpr {
        RcExpr::from(Expr::Call(smid, None, method.as_ref().to_string(), args))
    }

    /// Call on a receiver
    pub fn method<T: AsRef<str>>(
        smid: Smid,
        receiver: RcExpr,
        method: T,
        args: Vec<RcExpr>,
    ) -> RcExpr {
        RcExpr::from(Expr::Call(
            smid,
            Some(receiver),
            method.as_ref().to_string(),
            args,
        ))
    }

    pub fn map(smid: Smid, entries: impl IntoIterator<Item = (String, RcExpr)>) -> RcExpr {
        RcExpr::from(Expr::Map(smid, entries.into_iter().collect()))
    }

    pub fn list(smid: Smid, items: Vec<RcExpr>) -> RcExpr {
        RcExpr::from(Expr::List(smid, items))
    }

    pub fn binary(smid: Smid, op: BinaryOp, l: RcExpr, r: RcExpr) -> RcExpr {
        RcExpr::from(Expr::Binary(smid, op, l, r))
    }

    pub fn closure(smid: Smid, params: Vec<String>, body: Block) -> RcExpr {
        RcExpr::from(Expr::Closure(smid, params, body))
    }

    pub fn thunk(smid: Smid, body: Block) -> RcExpr {
        RcExpr::from(Expr::Thunk(smid, body))
    }

    /// Unlabelled expression statement
    pub fn stmt(smid: Smid, expr: RcExpr) -> Stmt {
        Stmt::Expr(smid, None, expr)
    }

    pub fn labelled<T: AsRef<str>>(smid: Smid, label: T, expr: RcExpr) -> Stmt {
        Stmt::Expr(smid, Some(label.as_ref().to_string()), expr)
    }

    pub fn ret(smid: Smid, expr: RcExpr) -> Stmt {
        Stmt::Return(smid, None, expr)
    }
}

/// Construct tree nodes without source locations
pub mod atree {
    use super::*;

    pub fn str<T: AsRef<str>>(s: T) -> RcExpr {
        tree::str(Smid::default(), s)
    }

    pub fn num<N>(n: N) -> RcExpr
    where
        N: Into<Number>,
    {
        tree::num(Smid::default(), n)
    }

    pub fn bool_(b: bool) -> RcExpr {
        tree::bool_(Smid::default(), b)
    }

    pub fn null() -> RcExpr {
        tree::null(Smid::default())
    }

    pub fn gstring(chunks: Vec<Chunk>) -> RcExpr {
        tree::gstring(Smid::default(), chunks)
    }

    pub fn text<T: AsRef<str>>(s: T) -> Chunk {
        Chunk::Text(s.as_ref().to_string())
    }

    pub fn interp(e: RcExpr) -> Chunk {
        Chunk::Interpolation(e)
    }

    pub fn var<T: AsRef<str>>(name: T) -> RcExpr {
        tree::var(Smid::default(), name)
    }

    pub fn property<T: AsRef<str>>(target: RcExpr, name: T) -> RcExpr {
        tree::property(Smid::default(), target, name)
    }

    pub fn call<T: AsRef<str>>(method: T, args: Vec<RcExpr>) -> RcExpr {
        tree::call(Smid::default(), method, args)
    }

    pub fn method<T: AsRef<str>>(receiver: RcExpr, method: T, args: Vec<RcExpr>) -> RcExpr {
        tree::method(Smid::default(), receiver, method, args)
    }

    pub fn map<K: AsRef<str>>(entries: Vec<(K, RcExpr)>) -> RcExpr {
        tree::map(
            Smid::default(),
            entries
                .into_iter()
                .map(|(k, v)| (k.as_ref().to_string(), v)),
        )
    }

    pub fn list(items: Vec<RcExpr>) -> RcExpr {
        tree::list(Smid::default(), items)
    }

    pub fn binary(op: BinaryOp, l: RcExpr, r: RcExpr) -> RcExpr {
        tree::binary(Smid::default(), op, l, r)
    }

    pub fn closure<T: AsRef<str>>(params: &[T], scope: ScopeId, stmts: Vec<Stmt>) -> RcExpr {
        tree::closure(
            Smid::default(),
            params.iter().map(|p| p.as_ref().to_string()).collect(),
            Block::new(scope, stmts),
        )
    }

    pub fn thunk(scope: ScopeId, stmts: Vec<Stmt>) -> RcExpr {
        tree::thunk(Smid::default(), Block::new(scope, stmts))
    }

    pub fn stmt(expr: RcExpr) -> Stmt {
        tree::stmt(Smid::default(), expr)
    }

    pub fn labelled<T: AsRef<str>>(label: T, expr: RcExpr) -> Stmt {
        tree::labelled(Smid::default(), label, expr)
    }

    pub fn ret(expr: RcExpr) -> Stmt {
        tree::ret(Smid::default(), expr)
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::syntax::scope::Scopes;

    #[test]
    pub fn test_string_like() {
        assert!(atree::str("echo").inner.is_string_like());
        assert!(atree::gstring(vec![atree::text("echo "), atree::interp(atree::var("x"))])
            .inner
            .is_string_like());
        assert!(!atree::num(1).inner.is_string_like());
        assert!(!atree::var("x").inner.is_string_like());
    }

    #[test]
    pub fn test_walk_safe_reaches_nested_blocks() {
        let scopes = Scopes::new();
        let expr = atree::call(
            "run",
            vec![
                atree::var("a"),
                atree::thunk(scopes.root(), vec![atree::stmt(atree::var("b"))]),
            ],
        );

        let mut seen = vec![];
        let mut visit = |e: RcExpr| -> Result<RcExpr, ()> {
            if let Some(name) = e.inner.var_name() {
                seen.push(name.to_string());
                return Ok(atree::str(name));
            }
            e.walk_safe(&mut |x| Ok(x))
        };

        let walked = expr.walk_safe(&mut visit).unwrap();
        assert_eq!(seen, vec!["a".to_string()]);
        match &*walked.inner {
            Expr::Call(_, None, m, args) => {
                assert_eq!(m, "run");
                assert_eq!(args[0], atree::str("a"));
                // visit saw the thunk itself, not its contents
                assert!(args[1].inner.is_thunk());
            }
            _ => panic!("expected call"),
        }
    }

    #[test]
    pub fn test_binary_op_round_trips_symbol() {
        for op in ["+", "-", "*", "/", "%", "==", "!=", "<", ">", "<=", ">=", "&&", "||"] {
            assert_eq!(op.parse::<BinaryOp>().unwrap().symbol(), op);
        }
        assert!("<>".parse::<BinaryOp>().is_err());
    }

    #[test]
    pub fn test_with_expr_keeps_label() {
        let s = atree::labelled("input", atree::var("x"));
        let t = s.with_expr(atree::str("x"));
        assert_eq!(t.label(), Some("input"));
        assert_eq!(t.expr(), &atree::str("x"));
    }
}
