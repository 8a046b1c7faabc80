//! Normalise definitions
//!
//! The parser reads `process foo(opts) { ... }` as a call of `process`
//! with a single argument: the call `foo(opts, { ... })`. The canonical
//! form moves the inner arguments up and names the process with a
//! string:
//!
//! ```text
//! process([map]?, "foo", args..., scriptMode, { ... })
//! ```
use super::error::{DesugarError, ScriptError};
use super::script::{wrap_script, Wrapped};
use super::{declaration, section, DefinitionRecord, Desugarer};
use crate::common::sourcemap::Smid;
use crate::syntax::tree::{tree, Block, Expr, RcExpr};

/// Insert the name constant after a leading map of options, or first
pub fn insert_name(mut args: Vec<RcExpr>, name: RcExpr) -> Vec<RcExpr> {
    let index = match args.first() {
        Some(a) if a.inner.is_map() => 1,
        _ => 0,
    };
    args.insert(index, name);
    args
}

/// Insert the script mode flag immediately before the final argument
/// (the block), which stays last
pub fn insert_script_mode(mut args: Vec<RcExpr>, flag: RcExpr) -> Vec<RcExpr> {
    let index = args.len().saturating_sub(1);
    args.insert(index, flag);
    args
}

/// Classify the block's statements, rewrite the declarations and wrap
/// the script
pub fn rewrite_body(desugarer: &mut Desugarer, definition: Smid, block: Block) -> Wrapped {
    let scope = block.scope;
    let partition = section::partition(block.stmts);
    let stmts = partition
        .retained
        .iter()
        .map(|(section, stmt)| declaration::rewrite_statement(*section, stmt))
        .collect();

    wrap_script(
        desugarer.scopes_mut(),
        definition,
        Block::new(scope, stmts),
        partition.script,
    )
}

/// Normalise the definition call `keyword(args)` located at `smid`
pub fn normalize(
    desugarer: &mut Desugarer,
    smid: Smid,
    keyword: &str,
    args: &[RcExpr],
) -> Result<RcExpr, DesugarError> {
    let (inner_smid, name, inner_args) = match args {
        [only] => match &*only.inner {
            Expr::Call(s, None, name, inner_args) => (*s, name.clone(), inner_args.clone()),
            _ => return Err(DesugarError::MalformedDefinition(smid, keyword.to_string())),
        },
        _ => return Err(DesugarError::MalformedDefinition(smid, keyword.to_string())),
    };

    let mut args = insert_name(inner_args, tree::str(inner_smid, &name));

    let body = args.last().and_then(|last| match &*last.inner {
        Expr::Thunk(s, block) => Some((*s, block.clone())),
        _ => None,
    });

    let has_body = body.is_some();
    let script_mode = match body {
        Some((thunk_smid, block)) => {
            let wrapped = rewrite_body(desugarer, smid, block);
            if let Some(error) = &wrapped.error {
                desugarer.report(error);
            }
            if let Some(last) = args.last_mut() {
                *last = tree::thunk(thunk_smid, wrapped.block);
            }
            wrapped.script_mode
        }
        None => {
            desugarer.report(&ScriptError::MissingBody(smid, name.clone()));
            false
        }
    };

    let flag = tree::bool_(desugarer.annotated_smid(smid, "script mode"), script_mode);
    let args = if has_body {
        insert_script_mode(args, flag)
    } else {
        let mut args = args;
        args.push(flag);
        args
    };

    desugarer.record_definition(DefinitionRecord {
        keyword: keyword.to_string(),
        name,
        smid,
        script_mode,
    });

    Ok(RcExpr::from(Expr::Call(smid, None, keyword.to_string(), args)))
}
