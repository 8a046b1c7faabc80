//! Basic pretty printing facilities

use pretty::{DocAllocator, DocBuilder, RcAllocator};

pub trait ToPretty {
    fn pretty<'b, D, A>(&'b self, allocator: &'b D) -> DocBuilder<'b, D, A>
    where
        D: DocAllocator<'b, A>,
        D::Doc: Clone,
        A: Clone;
}

/// Render at the default width of 80 columns
pub fn prettify<I>(expr: &I) -> String
where
    I: ToPretty,
{
    prettify_width(expr, 80)
}

pub fn prettify_width<I>(expr: &I, width: usize) -> String
where
    I: ToPretty,
{
    let allocator = RcAllocator;
    let doc = expr.pretty::<_, ()>(&allocator).append(allocator.line());
    let mut w = Vec::new();
    doc.1.render(width, &mut w).unwrap();
    String::from_utf8(w).unwrap()
}
