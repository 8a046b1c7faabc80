//! JSON export of trees in the interchange format read by
//! `import::json`

use crate::common::sourcemap::{HasSmid, Smid, SourceMap};
use crate::syntax::tree::{Block, Chunk, Expr, Primitive, RcExpr, Stmt};
use serde_json::{json, Map, Value};
use std::io::Write;

/// Converts trees to JSON, attaching positions from the source map
pub struct JsonExporter<'smap> {
    source_map: &'smap SourceMap,
}

impl<'smap> JsonExporter<'smap> {
    pub fn new(source_map: &'smap SourceMap) -> Self {
        JsonExporter { source_map }
    }

    /// The whole tree document
    pub fn document(&self, source: Option<&str>, body: &Block) -> Value {
        let mut obj = Map::new();
        if let Some(s) = source {
            obj.insert("source".to_string(), Value::String(s.to_string()));
        }
        obj.insert("statements".to_string(), self.statements(body));
        Value::Object(obj)
    }

    /// Write the document as pretty printed JSON
    pub fn write<W: Write>(
        &self,
        out: &mut W,
        source: Option<&str>,
        body: &Block,
    ) -> Result<(), std::io::Error> {
        serde_json::to_writer_pretty(&mut *out, &self.document(source, body))?;
        writeln!(out)
    }

    fn statements(&self, block: &Block) -> Value {
        Value::Array(block.stmts.iter().map(|s| self.statement(s)).collect())
    }

    /// Start a node object with its kind and any known position
    fn node(&self, kind: &str, smid: Smid) -> Map<String, Value> {
        let mut obj = Map::new();
        obj.insert("kind".to_string(), Value::String(kind.to_string()));
        if let Some(position) = self.source_map.position(smid) {
            obj.insert("line".to_string(), json!(position.line));
            obj.insert("column".to_string(), json!(position.column));
        }
        obj
    }

    pub fn statement(&self, stmt: &Stmt) -> Value {
        let kind = if stmt.is_return() { "return" } else { "expr" };
        let mut obj = self.node(kind, stmt.smid());
        if let Some(label) = stmt.label() {
            obj.insert("label".to_string(), Value::String(label.to_string()));
        }
        obj.insert("expr".to_string(), self.expression(stmt.expr()));
        Value::Object(obj)
    }

    pub fn expression(&self, expr: &RcExpr) -> Value {
        let smid = expr.smid();
        let obj = match &*expr.inner {
            Expr::Literal(_, prim) => {
                let (kind, value) = match prim {
                    Primitive::Str(s) => ("str", Some(Value::String(s.clone()))),
                    Primitive::Num(n) => ("num", Some(Value::Number(n.clone()))),
                    Primitive::Bool(b) => ("bool", Some(Value::Bool(*b))),
                    Primitive::Null => ("null", None),
                };
                let mut obj = self.node(kind, smid);
                if let Some(v) = value {
                    obj.insert("value".to_string(), v);
                }
                obj
            }
            Expr::GString(_, chunks) => {
                let mut obj = self.node("gstring", smid);
                let parts = chunks
                    .iter()
                    .map(|c| match c {
                        Chunk::Text(t) => Value::String(t.clone()),
                        Chunk::Interpolation(e) => self.expression(e),
                    })
                    .collect();
                obj.insert("parts".to_string(), Value::Array(parts));
                obj
            }
            Expr::Var(_, name) => {
                let mut obj = self.node("var", smid);
                obj.insert("name".to_string(), Value::String(name.clone()));
                obj
            }
            Expr::Property(_, target, name) => {
                let mut obj = self.node("property", smid);
                obj.insert("target".to_string(), self.expression(target));
                obj.insert("name".to_string(), Value::String(name.clone()));
                obj
            }
            Expr::Call(_, receiver, method, args) => {
                let mut obj = self.node("call", smid);
                if let Some(r) = receiver {
                    obj.insert("receiver".to_string(), self.expression(r));
                }
                obj.insert("method".to_string(), Value::String(method.clone()));
                obj.insert(
                    "args".to_string(),
                    Value::Array(args.iter().map(|a| self.expression(a)).collect()),
                );
                obj
            }
            Expr::Map(_, entries) => {
                let mut obj = self.node("map", smid);
                obj.insert(
                    "entries".to_string(),
                    Value::Object(
                        entries
                            .iter()
                            .map(|(k, v)| (k.clone(), self.expression(v)))
                            .collect(),
                    ),
                );
                obj
            }
            Expr::List(_, items) => {
                let mut obj = self.node("list", smid);
                obj.insert(
                    "items".to_string(),
                    Value::Array(items.iter().map(|x| self.expression(x)).collect()),
                );
                obj
            }
            Expr::Binary(_, op, l, r) => {
                let mut obj = self.node("binary", smid);
                obj.insert("op".to_string(), Value::String(op.symbol().to_string()));
                obj.insert("left".to_string(), self.expression(l));
                obj.insert("right".to_string(), self.expression(r));
                obj
            }
            Expr::Closure(_, params, body) => {
                let mut obj = self.node("closure", smid);
                obj.insert("params".to_string(), json!(params));
                obj.insert("statements".to_string(), self.statements(body));
                obj
            }
            Expr::Thunk(_, body) => {
                let mut obj = self.node("closure", smid);
                obj.insert("statements".to_string(), self.statements(body));
                obj
            }
        };
        Value::Object(obj)
    }
}
