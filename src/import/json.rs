//! Read the JSON interchange format into a syntax tree
use crate::common::sourcemap::{Position, Smid, SourceMap};
use crate::import::error::ImportError;
use crate::syntax::scope::{ScopeId, Scopes};
use crate::syntax::tree::{tree, BinaryOp, Block, Chunk, RcExpr, Stmt};
use indexmap::IndexMap;
use serde_json::{Map, Value};

/// A tree as handed over by the host parser
#[derive(Debug, Clone, PartialEq)]
pub struct TreeDocument {
    /// Name of the DSL source the tree was parsed from
    pub source: Option<String>,
    /// Top level statements, in the root scope
    pub body: Block,
}

/// Read the JSON text of a tree document
///
/// Positions are recorded in `source_map` and every closure opens a
/// new scope in `scopes`.
pub fn read_tree<'smap>(
    source_map: &'smap mut SourceMap,
    scopes: &'smap mut Scopes,
    text: &str,
) -> Result<TreeDocument, ImportError> {
    let value: Value = serde_json::from_str(text)?;
    read_document(source_map, scopes, &value)
}

/// Read an already parsed tree document
pub fn read_document<'smap>(
    source_map: &'smap mut SourceMap,
    scopes: &'smap mut Scopes,
    value: &Value,
) -> Result<TreeDocument, ImportError> {
    let mut reader = Reader::new(source_map, scopes);
    let obj = object(value, "$")?;
    let source = match obj.get("source") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => return Err(ImportError::UnexpectedShape("$.source".to_string(), "a string")),
    };
    let root = reader.scopes.root();
    let body = reader.statements("$.statements", root, field(obj, "$", "statements")?)?;
    Ok(TreeDocument { source, body })
}

/// Check a value is an object
fn object<'v>(value: &'v Value, path: &str) -> Result<&'v Map<String, Value>, ImportError> {
    value
        .as_object()
        .ok_or_else(|| ImportError::UnexpectedShape(path.to_string(), "an object"))
}

fn array<'v>(value: &'v Value, path: &str) -> Result<&'v Vec<Value>, ImportError> {
    value
        .as_array()
        .ok_or_else(|| ImportError::UnexpectedShape(path.to_string(), "an array"))
}

fn field<'v>(
    obj: &'v Map<String, Value>,
    path: &str,
    name: &'static str,
) -> Result<&'v Value, ImportError> {
    obj.get(name)
        .ok_or_else(|| ImportError::MissingField(path.to_string(), name))
}

fn string_field<'v>(
    obj: &'v Map<String, Value>,
    path: &str,
    name: &'static str,
) -> Result<&'v str, ImportError> {
    field(obj, path, name)?
        .as_str()
        .ok_or_else(|| ImportError::UnexpectedShape(format!("{path}.{name}"), "a string"))
}

/// Accumulates source positions and scopes while reading
struct Reader<'smap> {
    source_map: &'smap mut SourceMap,
    scopes: &'smap mut Scopes,
}

impl<'smap> Reader<'smap> {
    fn new(source_map: &'smap mut SourceMap, scopes: &'smap mut Scopes) -> Self {
        Reader { source_map, scopes }
    }

    /// Record the node's position if it has one
    fn new_smid(&mut self, obj: &Map<String, Value>) -> Smid {
        match obj.get("line").and_then(Value::as_u64) {
            Some(line) => {
                let column = obj.get("column").and_then(Value::as_u64).unwrap_or(0);
                self.source_map
                    .add(Position::new(line as usize, column as usize))
            }
            None => Smid::default(),
        }
    }

    fn statements(&mut self, path: &str, scope: ScopeId, value: &Value) -> Result<Block, ImportError> {
        let stmts = array(value, path)?
            .iter()
            .enumerate()
            .map(|(i, s)| self.statement(&format!("{path}[{i}]"), scope, s))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Block::new(scope, stmts))
    }

    fn statement(&mut self, path: &str, scope: ScopeId, value: &Value) -> Result<Stmt, ImportError> {
        let obj = object(value, path)?;
        let smid = self.new_smid(obj);
        let label = match obj.get("label") {
            None | Some(Value::Null) => None,
            Some(Value::String(l)) => Some(l.clone()),
            Some(_) => {
                return Err(ImportError::UnexpectedShape(format!("{path}.label"), "a string"))
            }
        };
        let kind = string_field(obj, path, "kind")?;
        let expr = self.expression(&format!("{path}.expr"), scope, field(obj, path, "expr")?)?;

        match kind {
            "expr" => Ok(Stmt::Expr(smid, label, expr)),
            "return" => Ok(Stmt::Return(smid, label, expr)),
            _ => Err(ImportError::UnknownKind(
                path.to_string(),
                "statement",
                kind.to_string(),
            )),
        }
    }

    fn expressions(
        &mut self,
        path: &str,
        scope: ScopeId,
        value: &Value,
    ) -> Result<Vec<RcExpr>, ImportError> {
        array(value, path)?
            .iter()
            .enumerate()
            .map(|(i, e)| self.expression(&format!("{path}[{i}]"), scope, e))
            .collect()
    }

    fn expression(&mut self, path: &str, scope: ScopeId, value: &Value) -> Result<RcExpr, ImportError> {
        let obj = object(value, path)?;
        let smid = self.new_smid(obj);
        let kind = string_field(obj, path, "kind")?;

        match kind {
            "str" => Ok(tree::str(smid, string_field(obj, path, "value")?)),
            "num" => match field(obj, path, "value")? {
                Value::Number(n) => Ok(tree::num(smid, n.clone())),
                _ => Err(ImportError::UnexpectedShape(format!("{path}.value"), "a number")),
            },
            "bool" => match field(obj, path, "value")? {
                Value::Bool(b) => Ok(tree::bool_(smid, *b)),
                _ => Err(ImportError::UnexpectedShape(format!("{path}.value"), "a boolean")),
            },
            "null" => Ok(tree::null(smid)),
            "gstring" => {
                let parts_path = format!("{path}.parts");
                let chunks = array(field(obj, path, "parts")?, &parts_path)?
                    .iter()
                    .enumerate()
                    .map(|(i, part)| match part {
                        Value::String(s) => Ok(Chunk::Text(s.clone())),
                        _ => self
                            .expression(&format!("{parts_path}[{i}]"), scope, part)
                            .map(Chunk::Interpolation),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(tree::gstring(smid, chunks))
            }
            "var" => Ok(tree::var(smid, string_field(obj, path, "name")?)),
            "property" => {
                let target =
                    self.expression(&format!("{path}.target"), scope, field(obj, path, "target")?)?;
                Ok(tree::property(smid, target, string_field(obj, path, "name")?))
            }
            "call" => {
                let receiver = match obj.get("receiver") {
                    None | Some(Value::Null) => None,
                    Some(r) => Some(self.expression(&format!("{path}.receiver"), scope, r)?),
                };
                let method = string_field(obj, path, "method")?.to_string();
                let args = match obj.get("args") {
                    None => vec![],
                    Some(a) => self.expressions(&format!("{path}.args"), scope, a)?,
                };
                Ok(match receiver {
                    Some(r) => tree::method(smid, r, method, args),
                    None => tree::call(smid, method, args),
                })
            }
            "map" => {
                let entries_path = format!("{path}.entries");
                let entries = object(field(obj, path, "entries")?, &entries_path)?
                    .iter()
                    .map(|(k, v)| {
                        self.expression(&format!("{entries_path}.{k}"), scope, v)
                            .map(|e| (k.clone(), e))
                    })
                    .collect::<Result<IndexMap<_, _>, _>>()?;
                Ok(tree::map(smid, entries))
            }
            "list" => {
                let items = self.expressions(&format!("{path}.items"), scope, field(obj, path, "items")?)?;
                Ok(tree::list(smid, items))
            }
            "binary" => {
                let op = string_field(obj, path, "op")?;
                let op = op
                    .parse::<BinaryOp>()
                    .map_err(|o| ImportError::UnknownOperator(format!("{path}.op"), o))?;
                let left = self.expression(&format!("{path}.left"), scope, field(obj, path, "left")?)?;
                let right =
                    self.expression(&format!("{path}.right"), scope, field(obj, path, "right")?)?;
                Ok(tree::binary(smid, op, left, right))
            }
            "closure" => {
                let params = match obj.get("params") {
                    None | Some(Value::Null) => vec![],
                    Some(p) => {
                        let params_path = format!("{path}.params");
                        array(p, &params_path)?
                            .iter()
                            .map(|p| {
                                p.as_str().map(str::to_string).ok_or_else(|| {
                                    ImportError::UnexpectedShape(params_path.clone(), "parameter names")
                                })
                            })
                            .collect::<Result<Vec<_>, _>>()?
                    }
                };
                let inner = self.scopes.child(scope);
                let body =
                    self.statements(&format!("{path}.statements"), inner, field(obj, path, "statements")?)?;
                if params.is_empty() {
                    Ok(tree::thunk(smid, body))
                } else {
                    Ok(tree::closure(smid, params, body))
                }
            }
            _ => Err(ImportError::UnknownKind(
                path.to_string(),
                "expression",
                kind.to_string(),
            )),
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::common::prettify::prettify;
    use crate::common::sourcemap::HasSmid;
    use crate::syntax::tree::Expr;

    fn parse(text: &str) -> (Result<TreeDocument, ImportError>, SourceMap, Scopes) {
        let mut sm = SourceMap::new();
        let mut scopes = Scopes::new();
        let result = read_tree(&mut sm, &mut scopes, text);
        (result, sm, scopes)
    }

    #[test]
    pub fn test_reads_definition() {
        let text = r#"{
          "source": "main.nf",
          "statements": [
            {"kind": "expr", "line": 1, "column": 1, "expr": {
              "kind": "call", "method": "process", "line": 1, "column": 1, "args": [
                {"kind": "call", "method": "foo", "line": 1, "column": 9, "args": [
                  {"kind": "closure", "line": 1, "column": 13, "statements": [
                    {"kind": "expr", "label": "input", "line": 2, "column": 3,
                     "expr": {"kind": "call", "method": "val", "args": [{"kind": "var", "name": "x"}]}},
                    {"kind": "expr", "line": 3, "column": 3,
                     "expr": {"kind": "gstring", "parts": ["echo ", {"kind": "var", "name": "x"}]}}
                  ]}
                ]}
              ]}
            }
          ]
        }"#;

        let (result, sm, scopes) = parse(text);
        let doc = result.unwrap();
        assert_eq!(doc.source.as_deref(), Some("main.nf"));
        assert_eq!(doc.body.scope, scopes.root());
        assert_eq!(doc.body.len(), 1);
        assert_eq!(
            prettify(&doc.body),
            "process(foo({\n  input: val(x)\n  \"echo ${x}\"\n}))\n"
        );
        assert_eq!(
            sm.position(doc.body.stmts[0].smid()),
            Some(Position::new(1, 1))
        );

        // the closure opened a scope below the root
        let call = doc.body.stmts[0].expr();
        let body = match &*call.inner {
            Expr::Call(_, None, _, args) => match &*args[0].inner {
                Expr::Call(_, None, _, inner) => inner[0].clone(),
                _ => panic!("expected inner call"),
            },
            _ => panic!("expected call"),
        };
        match &*body.inner {
            Expr::Thunk(s, block) => {
                assert_eq!(sm.position(*s), Some(Position::new(1, 13)));
                assert_eq!(scopes.parent(block.scope), Some(scopes.root()));
                assert_eq!(
                    sm.position(block.stmts[1].smid()),
                    Some(Position::new(3, 3))
                );
            }
            _ => panic!("expected thunk"),
        }
    }

    #[test]
    pub fn test_closure_with_params_is_closure() {
        let text = r#"{"statements": [{"kind": "expr", "expr":
            {"kind": "closure", "params": ["a", "b"], "statements": [
              {"kind": "return", "expr": {"kind": "binary", "op": "+",
                "left": {"kind": "var", "name": "a"}, "right": {"kind": "var", "name": "b"}}}
            ]}}]}"#;
        let (result, _, _) = parse(text);
        let doc = result.unwrap();
        assert_eq!(prettify(&doc.body), "{ a, b -> return a + b }\n");
    }

    #[test]
    pub fn test_map_keeps_entry_order() {
        let text = r#"{"statements": [{"kind": "expr", "expr":
            {"kind": "map", "entries": {"zeta": {"kind": "num", "value": 1},
                                         "alpha": {"kind": "null"}}}}]}"#;
        let (result, _, _) = parse(text);
        assert_eq!(prettify(&result.unwrap().body), "[zeta: 1, alpha: null]\n");
    }

    #[test]
    pub fn test_errors_carry_path() {
        let (result, _, _) = parse(r#"{"statements": [{"kind": "expr", "expr": {"kind": "lambda"}}]}"#);
        let err = result.unwrap_err();
        assert_eq!(err.path(), Some("$.statements[0].expr"));
        assert_eq!(
            err.to_string(),
            "unknown expression kind 'lambda' at $.statements[0].expr"
        );

        let (result, _, _) = parse(r#"{"statements": [{"kind": "expr"}]}"#);
        assert_eq!(
            result.unwrap_err().to_string(),
            "missing field 'expr' at $.statements[0]"
        );

        let (result, _, _) = parse(
            r#"{"statements": [{"kind": "expr", "expr": {"kind": "binary", "op": "<>",
                "left": {"kind": "null"}, "right": {"kind": "null"}}}]}"#,
        );
        assert_eq!(
            result.unwrap_err().to_string(),
            "unknown operator '<>' at $.statements[0].expr.op"
        );

        let (result, _, _) = parse("[1, 2");
        assert!(matches!(result, Err(ImportError::InvalidJson(_))));

        let (result, _, _) = parse("[]");
        assert_eq!(result.unwrap_err().to_string(), "expected an object at $");
    }
}
