//! Wrap the script of a definition in a thunk so that it runs when the
//! executor decides, not when the definition is made.
use super::error::ScriptError;
use crate::common::sourcemap::{HasSmid, Smid};
use crate::syntax::scope::Scopes;
use crate::syntax::tree::{tree, Block, Stmt};

/// Result of wrapping a definition's script
#[derive(Debug, Clone, PartialEq)]
pub struct Wrapped {
    /// The block with its script as final statement
    pub block: Block,
    /// Whether a script was found (or already deferred)
    pub script_mode: bool,
    /// Why no script was found
    pub error: Option<ScriptError>,
}

impl Wrapped {
    fn ok(block: Block) -> Self {
        Wrapped {
            block,
            script_mode: true,
            error: None,
        }
    }

    fn failed(block: Block, error: ScriptError) -> Self {
        Wrapped {
            block,
            script_mode: false,
            error: Some(error),
        }
    }
}

/// Append the script to `block` as a thunk.
///
/// `script` holds the statements of the exec / script sections, in
/// order. When there are none, the block's final statement becomes the
/// script if it is a string. `definition` locates the definition for
/// reporting an empty block.
pub fn wrap_script(
    scopes: &mut Scopes,
    definition: Smid,
    mut block: Block,
    script: Vec<Stmt>,
) -> Wrapped {
    if let Some(first) = script.first() {
        let smid = first.smid();
        let scope = scopes.child(block.scope);
        let thunk = tree::thunk(smid, Block::new(scope, script));
        block.stmts.push(tree::stmt(smid, thunk));
        return Wrapped::ok(block);
    }

    let (smid, thunk_ready, string_like) = match block.stmts.last() {
        None => {
            return Wrapped::failed(block, ScriptError::EmptyDefinition(definition));
        }
        Some(last) => (
            last.smid(),
            last.expr().inner.is_thunk(),
            last.expr().inner.is_string_like(),
        ),
    };

    if thunk_ready {
        return Wrapped::ok(block);
    }

    if !string_like {
        return Wrapped::failed(block, ScriptError::NoScript(smid));
    }

    match block.stmts.pop() {
        Some(last) => {
            let scope = scopes.child(block.scope);
            let body = Block::new(scope, vec![tree::stmt(smid, last.expr().clone())]);
            block.stmts.push(tree::stmt(smid, tree::thunk(smid, body)));
            Wrapped::ok(block)
        }
        None => Wrapped::failed(block, ScriptError::EmptyDefinition(definition)),
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::syntax::tree::{atree::*, BinaryOp, Expr};

    fn thunk_body(stmt: &Stmt) -> &Block {
        match &*stmt.expr().inner {
            Expr::Thunk(_, body) => body,
            _ => panic!("expected thunk"),
        }
    }

    #[test]
    pub fn test_explicit_script_section() {
        let mut scopes = Scopes::new();
        let root = scopes.root();
        let block = Block::new(root, vec![labelled("input", call("val", vec![var("x")]))]);
        let script = vec![labelled("exec", str("one")), stmt(str("two"))];

        let wrapped = wrap_script(&mut scopes, Smid::default(), block, script.clone());
        assert!(wrapped.script_mode);
        assert_eq!(wrapped.error, None);
        assert_eq!(wrapped.block.len(), 2);

        let body = thunk_body(&wrapped.block.stmts[1]);
        assert_eq!(body.stmts, script);
        assert_eq!(scopes.parent(body.scope), Some(root));
    }

    #[test]
    pub fn test_trailing_string_inferred() {
        let mut scopes = Scopes::new();
        let root = scopes.root();
        let cmd = gstring(vec![text("echo "), interp(var("x"))]);
        let block = Block::new(
            root,
            vec![labelled("input", call("val", vec![var("x")])), stmt(cmd.clone())],
        );

        let wrapped = wrap_script(&mut scopes, Smid::default(), block, vec![]);
        assert!(wrapped.script_mode);
        assert_eq!(wrapped.block.len(), 2);
        let body = thunk_body(&wrapped.block.stmts[1]);
        assert_eq!(body.stmts, vec![stmt(cmd)]);
        assert!(scopes.is_within(body.scope, root));
    }

    #[test]
    pub fn test_trailing_return_inferred() {
        let mut scopes = Scopes::new();
        let block = Block::new(scopes.root(), vec![ret(str("echo hello"))]);

        let wrapped = wrap_script(&mut scopes, Smid::default(), block, vec![]);
        assert!(wrapped.script_mode);
        assert_eq!(wrapped.block.len(), 1);
        assert!(!wrapped.block.stmts[0].is_return());
        assert_eq!(
            thunk_body(&wrapped.block.stmts[0]).stmts,
            vec![stmt(str("echo hello"))]
        );
    }

    #[test]
    pub fn test_existing_thunk_left_alone() {
        let mut scopes = Scopes::new();
        let root = scopes.root();
        let inner = scopes.child(root);
        let block = Block::new(root, vec![stmt(thunk(inner, vec![stmt(str("ls"))]))]);

        let wrapped = wrap_script(&mut scopes, Smid::default(), block.clone(), vec![]);
        assert!(wrapped.script_mode);
        assert_eq!(wrapped.block, block);
        assert_eq!(scopes.len(), 2);
    }

    #[test]
    pub fn test_non_string_tail_fails() {
        let mut scopes = Scopes::new();
        let at = Smid::fake(4);
        let block = Block::new(
            scopes.root(),
            vec![Stmt::Expr(at, None, binary(BinaryOp::Add, num(1), num(2)))],
        );

        let wrapped = wrap_script(&mut scopes, Smid::fake(0), block.clone(), vec![]);
        assert!(!wrapped.script_mode);
        assert_eq!(wrapped.error, Some(ScriptError::NoScript(at)));
        assert_eq!(wrapped.block, block);
    }

    #[test]
    pub fn test_empty_block_fails_at_definition() {
        let mut scopes = Scopes::new();
        let definition = Smid::fake(9);
        let block = Block::new(scopes.root(), vec![]);

        let wrapped = wrap_script(&mut scopes, definition, block, vec![]);
        assert!(!wrapped.script_mode);
        assert_eq!(wrapped.error, Some(ScriptError::EmptyDefinition(definition)));
        assert!(wrapped.block.is_empty());
    }
}
