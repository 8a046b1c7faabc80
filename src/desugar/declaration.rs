//! Rewrite declarations in input, output and share sections into
//! their canonical calls.
//!
//! A declaration like `val x` names `x` before anything binds it, so
//! the bare identifier is turned into the string `"x"`, sometimes
//! preceded by a flag recording that it was an identifier rather than
//! a value.
use super::section::Section;
use crate::common::sourcemap::HasSmid;
use crate::syntax::tree::{tree, Expr, RcExpr, Stmt};

/// What to do with the designated argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Leave all arguments alone
    Untouched,
    /// Replace an identifier with its name
    Name,
    /// Replace an identifier with its name preceded by `true`, or
    /// precede any other argument with `false`
    FlaggedName,
}

/// Which argument is designated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// The first argument
    First,
    /// The first argument that is not the map of named options
    AfterOptions,
}

impl Slot {
    pub fn index(&self, args: &[RcExpr]) -> usize {
        match self {
            Slot::First => 0,
            Slot::AfterOptions => match args.first() {
                Some(a) if a.inner.is_map() => 1,
                _ => 0,
            },
        }
    }
}

/// How one declarative method is rewritten in one section
#[derive(Debug)]
pub struct DeclarationRule {
    section: Section,
    method: &'static str,
    canonical: &'static str,
    encoding: Encoding,
    slot: Slot,
    /// Arguments that are calls are declarations in their own right
    components: bool,
}

impl DeclarationRule {
    pub fn canonical(&self) -> &'static str {
        self.canonical
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn slot(&self) -> Slot {
        self.slot
    }
}

macro_rules! rule {
    ($section:ident, $method:expr, $canonical:expr, $encoding:ident, $slot:ident) => {
        DeclarationRule {
            section: Section::$section,
            method: $method,
            canonical: $canonical,
            encoding: Encoding::$encoding,
            slot: Slot::$slot,
            components: false,
        }
    };
    ($section:ident, $method:expr, $canonical:expr, components) => {
        DeclarationRule {
            section: Section::$section,
            method: $method,
            canonical: $canonical,
            encoding: Encoding::Untouched,
            slot: Slot::First,
            components: true,
        }
    };
}

lazy_static! {
    static ref RULES: Vec<DeclarationRule> = vec![
        rule!(Input, "val", "_in_val", FlaggedName, First),
        rule!(Input, "env", "_in_env", FlaggedName, First),
        rule!(Input, "file", "_in_file", FlaggedName, AfterOptions),
        rule!(Input, "path", "_in_path", FlaggedName, AfterOptions),
        rule!(Input, "each", "_in_each", FlaggedName, First),
        rule!(Input, "stdin", "_in_stdin", Untouched, First),
        rule!(Input, "tuple", "_in_tuple", components),
        rule!(Output, "val", "_out_val", Name, First),
        rule!(Output, "file", "_out_file", Name, AfterOptions),
        rule!(Output, "path", "_out_path", Name, AfterOptions),
        rule!(Output, "env", "_out_env", Name, First),
        rule!(Output, "stdout", "_out_stdout", Untouched, First),
        rule!(Output, "tuple", "_out_tuple", components),
        rule!(Output, "into", "into", Name, First),
        rule!(Share, "val", "_share_val", FlaggedName, First),
        rule!(Share, "file", "_share_file", FlaggedName, AfterOptions),
        rule!(Share, "into", "into", Name, First),
    ];
}

/// Look up the rule for a method in a section
pub fn rule(section: Section, method: &str) -> Option<&'static DeclarationRule> {
    RULES
        .iter()
        .find(|r| r.section == section && r.method == method)
}

/// Apply a rule's encoding to its designated argument. Every other
/// argument keeps its place.
pub fn encode_arguments(rule: &DeclarationRule, args: &[RcExpr]) -> Vec<RcExpr> {
    let index = rule.slot.index(args);
    let target = match args.get(index) {
        Some(t) => t,
        None => return args.to_vec(),
    };

    let replacement = match (rule.encoding, target.inner.var_name()) {
        (Encoding::Untouched, _) => return args.to_vec(),
        (Encoding::Name, Some(name)) => vec![tree::str(target.smid(), name)],
        (Encoding::Name, None) => return args.to_vec(),
        (Encoding::FlaggedName, Some(name)) => vec![
            tree::bool_(target.smid(), true),
            tree::str(target.smid(), name),
        ],
        (Encoding::FlaggedName, None) => vec![tree::bool_(target.smid(), false), target.clone()],
    };

    let mut encoded = Vec::with_capacity(args.len() + 1);
    encoded.extend_from_slice(&args[..index]);
    encoded.extend(replacement);
    encoded.extend_from_slice(&args[index + 1..]);
    encoded
}

/// Rewrite every link of a declarative call chain
pub fn rewrite_chain(section: Section, expr: &RcExpr) -> RcExpr {
    match &*expr.inner {
        Expr::Call(s, receiver, method, args) => {
            let receiver = receiver.as_ref().map(|r| rewrite_chain(section, r));

            match rule(section, method) {
                Some(rule) => {
                    let args = if rule.components {
                        args.iter().map(|a| rewrite_chain(section, a)).collect()
                    } else {
                        encode_arguments(rule, args)
                    };
                    RcExpr::from(Expr::Call(
                        *s,
                        receiver,
                        rule.canonical.to_string(),
                        args,
                    ))
                }
                None => RcExpr::from(Expr::Call(*s, receiver, method.clone(), args.clone())),
            }
        }
        // the chain stops at the first receiver that isn't a call
        _ => expr.clone(),
    }
}

/// Rewrite a statement given its effective section. Statements
/// outside input, output and share are returned unchanged.
pub fn rewrite_statement(section: Section, stmt: &Stmt) -> Stmt {
    if section.is_declarative() {
        stmt.with_expr(rewrite_chain(section, stmt.expr()))
    } else {
        stmt.clone()
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::common::prettify::prettify;
    use crate::syntax::tree::atree::*;

    fn input(expr: RcExpr) -> String {
        prettify(&rewrite_chain(Section::Input, &expr))
    }

    fn output(expr: RcExpr) -> String {
        prettify(&rewrite_chain(Section::Output, &expr))
    }

    #[test]
    pub fn test_input_identifier_gets_true_flag() {
        assert_eq!(input(call("val", vec![var("x")])), "_in_val(true, \"x\")\n");
        assert_eq!(input(call("env", vec![var("HOME")])), "_in_env(true, \"HOME\")\n");
        assert_eq!(input(call("each", vec![var("mode")])), "_in_each(true, \"mode\")\n");
    }

    #[test]
    pub fn test_input_value_gets_false_flag() {
        assert_eq!(
            input(call("val", vec![str("x")])),
            "_in_val(false, \"x\")\n"
        );
        assert_eq!(
            input(call("each", vec![list(vec![num(1), num(2)])])),
            "_in_each(false, [1, 2])\n"
        );
    }

    #[test]
    pub fn test_output_names_without_flag() {
        assert_eq!(output(call("file", vec![str("y")])), "_out_file(\"y\")\n");
        assert_eq!(output(call("file", vec![var("y")])), "_out_file(\"y\")\n");
        assert_eq!(output(call("val", vec![var("result")])), "_out_val(\"result\")\n");
        assert_eq!(output(call("stdout", vec![])), "_out_stdout()\n");
        assert_eq!(output(call("env", vec![var("HOME")])), "_out_env(\"HOME\")\n");
        assert_eq!(
            output(call("path", vec![map(vec![("mode", str("copy"))]), var("out")])),
            "_out_path([mode: \"copy\"], \"out\")\n"
        );
    }

    #[test]
    pub fn test_share() {
        let rewritten = rewrite_chain(Section::Share, &call("val", vec![var("acc")]));
        assert_eq!(prettify(&rewritten), "_share_val(true, \"acc\")\n");
        let rewritten = rewrite_chain(Section::Share, &call("file", vec![str("db")]));
        assert_eq!(prettify(&rewritten), "_share_file(false, \"db\")\n");
        let rewritten = rewrite_chain(
            Section::Share,
            &method(call("val", vec![var("acc")]), "into", vec![var("totals")]),
        );
        assert_eq!(
            prettify(&rewritten),
            "_share_val(true, \"acc\").into(\"totals\")\n"
        );
    }

    #[test]
    pub fn test_input_path_and_stdin() {
        let decl = call(
            "path",
            vec![map(vec![("stageAs", str("r.fq"))]), var("reads")],
        );
        assert_eq!(
            input(decl),
            "_in_path([stageAs: \"r.fq\"], true, \"reads\")\n"
        );
        assert_eq!(input(call("path", vec![var("ref")])), "_in_path(true, \"ref\")\n");

        // stdin keeps its arguments as written
        assert_eq!(input(call("stdin", vec![var("lines")])), "_in_stdin(lines)\n");
        assert_eq!(input(call("stdin", vec![])), "_in_stdin()\n");
    }

    #[test]
    pub fn test_slot_after_named_options() {
        let decl = call(
            "file",
            vec![map(vec![("stageAs", str("in.txt"))]), var("reads"), num(1)],
        );
        assert_eq!(
            input(decl),
            "_in_file([stageAs: \"in.txt\"], true, \"reads\", 1)\n"
        );
    }

    #[test]
    pub fn test_only_designated_slot_changes() {
        let decl = call("val", vec![var("x"), var("y"), var("z")]);
        match &*rewrite_chain(Section::Input, &decl).inner {
            Expr::Call(_, None, m, args) => {
                assert_eq!(m, "_in_val");
                assert_eq!(
                    args,
                    &vec![bool_(true), str("x"), var("y"), var("z")]
                );
            }
            _ => panic!("expected call"),
        }
    }

    #[test]
    pub fn test_chain_recurses_through_receivers() {
        let decl = method(call("val", vec![var("x")]), "from", vec![var("ch")]);
        assert_eq!(input(decl), "_in_val(true, \"x\").from(ch)\n");

        let decl = method(call("file", vec![str("out.txt")]), "into", vec![var("results")]);
        assert_eq!(output(decl), "_out_file(\"out.txt\").into(\"results\")\n");
    }

    #[test]
    pub fn test_chain_stops_at_non_call_receiver() {
        let decl = method(property(var("params"), "val"), "file", vec![var("x")]);
        assert_eq!(input(decl), "params.val._in_file(true, \"x\")\n");
    }

    #[test]
    pub fn test_tuple_components() {
        let decl = call(
            "tuple",
            vec![call("val", vec![var("id")]), call("file", vec![var("reads")])],
        );
        assert_eq!(
            input(decl),
            "_in_tuple(_in_val(true, \"id\"), _in_file(true, \"reads\"))\n"
        );

        let decl = call(
            "tuple",
            vec![call("val", vec![var("id")]), call("path", vec![str("*.bam")])],
        );
        assert_eq!(
            output(decl),
            "_out_tuple(_out_val(\"id\"), _out_path(\"*.bam\"))\n"
        );
    }

    #[test]
    pub fn test_unknown_methods_pass_through() {
        let decl = call("_in_val", vec![bool_(true), str("x")]);
        assert_eq!(input(decl.clone()), prettify(&decl));

        let decl = call("set", vec![var("x")]);
        assert_eq!(input(decl), "set(x)\n");

        // names known in one section mean nothing in another
        let decl = call("each", vec![var("x")]);
        assert_eq!(output(decl), "each(x)\n");
    }

    #[test]
    pub fn test_missing_slot_left_alone() {
        assert_eq!(input(call("val", vec![])), "_in_val()\n");
        assert_eq!(
            input(call("file", vec![map(vec![("stageAs", str("*"))])])),
            "_in_file([stageAs: \"*\"])\n"
        );
    }

    #[test]
    pub fn test_statements_outside_declarations_unchanged() {
        let s = labelled("input", call("val", vec![var("x")]));
        assert_eq!(rewrite_statement(Section::None, &s), s);
        assert_eq!(rewrite_statement(Section::Exec, &s), s);
        assert_eq!(
            rewrite_statement(Section::Input, &s),
            labelled("input", call("_in_val", vec![bool_(true), str("x")]))
        );
    }

    #[test]
    pub fn test_rule_lookup() {
        let r = rule(Section::Input, "file").unwrap();
        assert_eq!(r.canonical(), "_in_file");
        assert_eq!(r.encoding(), Encoding::FlaggedName);
        assert_eq!(r.slot(), Slot::AfterOptions);
        assert_eq!(rule(Section::Input, "stdin").unwrap().encoding(), Encoding::Untouched);
        assert!(rule(Section::Exec, "val").is_none());
        assert!(rule(Section::Input, "from").is_none());
    }
}
