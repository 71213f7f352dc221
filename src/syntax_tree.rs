/// Data structures to represent lambda calculus expressions, and a utility to
/// display them.
use std::rc::Rc;

/// Represents a lambda-calculus expression. Children are reference counted so
/// that closures can share a lambda body with the tree it came from.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ExprNode {
    NameRef {
        var_name: String,
    },
    LambdaAbs {
        formal_param: String,
        fn_body: Rc<ExprNode>,
    },
    Apply {
        fn_expr: Rc<ExprNode>,
        actual_arg: Rc<ExprNode>,
    },
}

impl ExprNode {
    pub fn name_ref(var_name: &str) -> Self {
        Self::NameRef {
            var_name: String::from(var_name),
        }
    }

    pub fn lambda_abs(formal_param: &str, fn_body: ExprNode) -> Self {
        Self::LambdaAbs {
            formal_param: String::from(formal_param),
            fn_body: Rc::new(fn_body),
        }
    }

    pub fn apply(fn_expr: ExprNode, actual_arg: ExprNode) -> Self {
        Self::Apply {
            fn_expr: Rc::new(fn_expr),
            actual_arg: Rc::new(actual_arg),
        }
    }
}

// Helper function to produce a string representation of an ExprNode.
fn expr_node_to_string_helper(expr_node: &ExprNode, string_so_far: &mut String) {
    match expr_node {
        ExprNode::NameRef { var_name } => {
            string_so_far.push_str(var_name.as_str());
        }
        ExprNode::Apply {
            fn_expr,
            actual_arg,
        } => {
            // A lambda in function position would otherwise swallow the
            // argument into its body.
            let first_needs_parens = matches!(&**fn_expr, ExprNode::LambdaAbs { .. });

            // Applications in argument position need parentheses to keep
            // application left-associative.
            let second_needs_parens = matches!(
                &**actual_arg,
                ExprNode::LambdaAbs { .. } | ExprNode::Apply { .. }
            );

            push_maybe_parenthesized(fn_expr, first_needs_parens, string_so_far);
            string_so_far.push(' ');
            push_maybe_parenthesized(actual_arg, second_needs_parens, string_so_far);
        }
        ExprNode::LambdaAbs {
            formal_param,
            fn_body,
        } => {
            push_lambda_text(formal_param, fn_body, string_so_far);
        }
    };
}

fn push_maybe_parenthesized(expr_node: &ExprNode, needs_parens: bool, string_so_far: &mut String) {
    if needs_parens {
        string_so_far.push('(');
        expr_node_to_string_helper(expr_node, string_so_far);
        string_so_far.push(')');
    } else {
        expr_node_to_string_helper(expr_node, string_so_far);
    }
}

/// Appends `\param body` to the given string. Shared with the rendering of
/// closures, which print as the lambda they were created from.
pub fn push_lambda_text(formal_param: &str, fn_body: &ExprNode, string_so_far: &mut String) {
    string_so_far.push('\\');
    string_so_far.push_str(formal_param);
    string_so_far.push(' ');
    expr_node_to_string_helper(fn_body, string_so_far);
}

impl std::fmt::Display for ExprNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut out_string = String::new();
        expr_node_to_string_helper(self, &mut out_string);
        write!(f, "{}", out_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical_analysis::tokenize;
    use crate::recursive_descent_parsing::parse;

    #[test]
    fn test_expr_node_to_string_church_succ() {
        let expected_output = r"\n \f \x f (n f x)";

        let test_input = ExprNode::lambda_abs(
            "n",
            ExprNode::lambda_abs(
                "f",
                ExprNode::lambda_abs(
                    "x",
                    ExprNode::apply(
                        ExprNode::name_ref("f"),
                        ExprNode::apply(
                            ExprNode::apply(ExprNode::name_ref("n"), ExprNode::name_ref("f")),
                            ExprNode::name_ref("x"),
                        ),
                    ),
                ),
            ),
        );

        assert_eq!(expected_output, test_input.to_string());
    }

    #[test]
    fn test_lambda_in_function_position_is_parenthesized() {
        let test_input = ExprNode::apply(
            ExprNode::lambda_abs("x", ExprNode::name_ref("x")),
            ExprNode::lambda_abs("y", ExprNode::name_ref("y")),
        );

        assert_eq!(r"(\x x) (\y y)", test_input.to_string());
    }

    // Printing a tree and parsing the text again gives the same tree.
    #[test]
    fn test_display_reparses_to_same_tree() {
        let program_strs = vec![
            r"x \y y z",
            r"(\x \y x)(\p p)(\q q)",
            r"a (b c) (d (e f))",
            r"(\f (\x f (x x)) (\x f (x x))) g",
        ];

        for program_str in program_strs {
            let tokens = tokenize(program_str).expect("tokenize failed");
            let expr = parse(&tokens).expect("parse failed");

            let rendered = expr.to_string();
            let reparsed =
                parse(&tokenize(&rendered).expect("tokenize failed")).expect("reparse failed");

            assert_eq!(expr, reparsed, "rendered as {}", rendered);
        }
    }
}
