//! Evaluation of literal expressions found in factory source.

use serde_json::{Number, Value};
use syn::punctuated::Punctuated;
use syn::{Expr, Lit, Token, UnOp};

use crate::source::{ToolSourceError, ToolSourceResult};

/// Evaluates `expr` to a JSON value if it is built only from literals.
///
/// `context` names the expression in the error returned otherwise.
pub(crate) fn literal_value(expr: &Expr, context: &str) -> ToolSourceResult<Value> {
    let not_literal = || ToolSourceError::NotLiteral {
        context: context.to_owned(),
    };

    match expr {
        Expr::Lit(lit) => match &lit.lit {
            Lit::Str(s) => Ok(Value::String(s.value())),
            Lit::Char(c) => Ok(Value::String(c.value().to_string())),
            Lit::Bool(b) => Ok(Value::Bool(b.value)),
            Lit::Int(int) => int
                .base10_parse::<i64>()
                .map(Value::from)
                .map_err(|_| not_literal()),
            Lit::Float(float) => float
                .base10_parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .ok_or_else(not_literal),
            _ => Err(not_literal()),
        },
        Expr::Unary(unary) if matches!(unary.op, UnOp::Neg(_)) => {
            match literal_value(&unary.expr, context)? {
                Value::Number(n) => negate(&n).ok_or_else(not_literal),
                _ => Err(not_literal()),
            }
        }
        Expr::Paren(inner) => literal_value(&inner.expr, context),
        Expr::Group(inner) => literal_value(&inner.expr, context),
        Expr::Reference(reference) => literal_value(&reference.expr, context),
        Expr::Array(array) => array
            .elems
            .iter()
            .map(|elem| literal_value(elem, context))
            .collect::<ToolSourceResult<Vec<_>>>()
            .map(Value::Array),
        Expr::Macro(mac) if mac.mac.path.is_ident("vec") => {
            let elems = mac
                .mac
                .parse_body_with(Punctuated::<Expr, Token![,]>::parse_terminated)
                .map_err(|_| not_literal())?;
            elems
                .iter()
                .map(|elem| literal_value(elem, context))
                .collect::<ToolSourceResult<Vec<_>>>()
                .map(Value::Array)
        }
        Expr::MethodCall(call)
            if call.args.is_empty()
                && matches!(
                    call.method.to_string().as_str(),
                    "to_string" | "to_owned" | "into"
                ) =>
        {
            literal_value(&call.receiver, context)
        }
        Expr::Call(call) if call.args.len() == 1 && is_string_from(&call.func) => {
            match call.args.first() {
                Some(arg) => literal_value(arg, context),
                None => Err(not_literal()),
            }
        }
        Expr::Path(path) if path.path.is_ident("None") => Ok(Value::Null),
        _ => Err(not_literal()),
    }
}

/// Evaluates `expr` and requires the result to be a string.
pub(crate) fn literal_string(expr: &Expr, context: &str) -> ToolSourceResult<String> {
    match literal_value(expr, context)? {
        Value::String(s) => Ok(s),
        _ => Err(ToolSourceError::NotLiteral {
            context: format!("{context} (expected a string)"),
        }),
    }
}

fn negate(n: &Number) -> Option<Value> {
    if let Some(int) = n.as_i64() {
        return int.checked_neg().map(Value::from);
    }
    n.as_f64().and_then(|f| Number::from_f64(-f)).map(Value::Number)
}

fn is_string_from(func: &Expr) -> bool {
    let Expr::Path(path) = func else {
        return false;
    };
    let mut segments = path.path.segments.iter().map(|segment| &segment.ident);
    matches!(
        (segments.next(), segments.next(), segments.next()),
        (Some(ty), Some(method), None) if ty == "String" && method == "from"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn eval(src: &str) -> ToolSourceResult<Value> {
        let expr: Expr = syn::parse_str(src).unwrap();
        literal_value(&expr, "test")
    }

    #[test]
    fn evaluates_scalars() {
        assert_eq!(eval(r#""Search""#).unwrap(), json!("Search"));
        assert_eq!(eval("42").unwrap(), json!(42));
        assert_eq!(eval("-7").unwrap(), json!(-7));
        assert_eq!(eval("0.5").unwrap(), json!(0.5));
        assert_eq!(eval("-(1.5)").unwrap(), json!(-1.5));
        assert_eq!(eval("true").unwrap(), json!(true));
        assert_eq!(eval("None").unwrap(), Value::Null);
    }

    #[test]
    fn evaluates_string_conversions() {
        assert_eq!(eval(r#""a".to_string()"#).unwrap(), json!("a"));
        assert_eq!(eval(r#""b".to_owned()"#).unwrap(), json!("b"));
        assert_eq!(eval(r#""c".into()"#).unwrap(), json!("c"));
        assert_eq!(eval(r#"String::from("d")"#).unwrap(), json!("d"));
    }

    #[test]
    fn evaluates_sequences() {
        assert_eq!(eval(r#"["a", "b"]"#).unwrap(), json!(["a", "b"]));
        assert_eq!(eval("vec![1, 2, 3]").unwrap(), json!([1, 2, 3]));
        assert_eq!(eval(r#"&["x"]"#).unwrap(), json!(["x"]));
    }

    #[test]
    fn rejects_non_literals() {
        for src in ["search", "load()", "a + b", r#"format!("{x}")"#, r#""a".trim()"#] {
            let err = eval(src).expect_err(src);
            assert!(matches!(err, ToolSourceError::NotLiteral { .. }), "{src}");
        }
    }

    #[test]
    fn string_helper_rejects_numbers() {
        let expr: Expr = syn::parse_str("3").unwrap();
        let err = literal_string(&expr, "argument 0").expect_err("not a string");
        assert!(matches!(
            err,
            ToolSourceError::NotLiteral { context } if context.starts_with("argument 0")
        ));
    }
}
