//! The Desugarable trait

use super::{definition, error::DesugarError, Desugarer};
use crate::syntax::tree::{Block, Expr, RcExpr};

/// Tree elements that can be desugared
pub trait Desugarable {
    type Output;

    fn desugar(&self, _: &mut Desugarer) -> Result<Self::Output, DesugarError>;
}

/// Blocks desugar statement by statement
impl Desugarable for Block {
    type Output = Block;

    fn desugar(&self, desugarer: &mut Desugarer) -> Result<Block, DesugarError> {
        self.walk_safe(&mut |e| e.desugar(desugarer))
    }
}

/// Definition calls are normalised. Anything else is searched for
/// definitions further down.
impl Desugarable for RcExpr {
    type Output = RcExpr;

    fn desugar(&self, desugarer: &mut Desugarer) -> Result<RcExpr, DesugarError> {
        match &*self.inner {
            Expr::Call(smid, None, method, args)
                if desugarer.settings().is_definition_keyword(method) =>
            {
                definition::normalize(desugarer, *smid, method, args)
            }
            _ => self.walk_safe(&mut |e| e.desugar(desugarer)),
        }
    }
}
