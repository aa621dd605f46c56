//! Static extraction of tool metadata from factory source.
//!
//! A tool factory's source is parsed, never executed. The single expression
//! the function returns (an explicit `return` or its tail expression) is
//! inspected:
//!
//! * `Tool { name: .., description: .. }` reads the two fields;
//! * `Tool(..)` or `Tool::new(..)` reads positional arguments 0 and 2;
//! * any other call is looked up in a [`ConstructorTable`] and invoked with
//!   its literal arguments.

use syn::visit::{self, Visit};
use syn::{
    Block, Expr, ExprCall, ExprClosure, ExprReturn, ExprStruct, ImplItemFn, ItemFn, Member, Path,
    Stmt,
};
use thiserror::Error;
use tracing::{debug, warn};

use crate::constructors::ConstructorTable;
use crate::literal::{literal_string, literal_value};
use crate::registry::{ToolError, ToolParams};

/// Result alias for source extraction.
pub type ToolSourceResult<T> = Result<T, ToolSourceError>;

const DEFAULT_TOOL_TYPE: &str = "Tool";

/// Extracts [`ToolParams`] from the source of a tool factory.
#[derive(Clone, Debug)]
pub struct SourceToolExtractor {
    tool_type: String,
    constructors: ConstructorTable,
}

impl Default for SourceToolExtractor {
    fn default() -> Self {
        Self::new(ConstructorTable::default())
    }
}

impl SourceToolExtractor {
    /// Creates an extractor that falls back to `constructors` for calls other
    /// than the tool type.
    #[must_use]
    pub fn new(constructors: ConstructorTable) -> Self {
        Self {
            tool_type: DEFAULT_TOOL_TYPE.to_owned(),
            constructors,
        }
    }

    /// Overrides the name of the tool type recognised in source.
    #[must_use]
    pub fn with_tool_type(mut self, tool_type: impl Into<String>) -> Self {
        self.tool_type = tool_type.into();
        self
    }

    /// Extracts params, treating every failure as "no metadata".
    ///
    /// Multiple return points are logged as a warning; other failures are
    /// logged at debug level. Use [`SourceToolExtractor::try_extract`] for the
    /// cause.
    #[must_use]
    pub fn extract(&self, source: &str) -> Option<ToolParams> {
        match self.try_extract(source) {
            Ok(params) => Some(params),
            Err(err @ ToolSourceError::AmbiguousReturn { .. }) => {
                warn!(%err, "tool factory has several return points; skipping");
                None
            }
            Err(err) => {
                debug!(%err, "no tool params extracted");
                None
            }
        }
    }

    /// Extracts params from `source`.
    ///
    /// # Errors
    ///
    /// Returns a [`ToolSourceError`] describing why nothing could be
    /// extracted.
    pub fn try_extract(&self, source: &str) -> ToolSourceResult<ToolParams> {
        let file = syn::parse_file(source).map_err(|err| ToolSourceError::Parse {
            reason: err.to_string(),
        })?;

        let mut collector = ReturnCollector::default();
        collector.visit_file(&file);

        match collector.returns.as_slice() {
            [] => Err(ToolSourceError::NoReturn),
            [returned] => self.params_from(returned),
            returns => Err(ToolSourceError::AmbiguousReturn {
                count: returns.len(),
            }),
        }
    }

    fn params_from(&self, returned: &Expr) -> ToolSourceResult<ToolParams> {
        match returned {
            Expr::Paren(inner) => self.params_from(&inner.expr),
            Expr::Struct(literal) if self.is_tool_type(&literal.path) => {
                Self::keyword_params(literal)
            }
            Expr::Call(call) => {
                let Expr::Path(callee) = call.func.as_ref() else {
                    return Err(ToolSourceError::NotACall);
                };
                if self.is_tool_constructor(&callee.path) {
                    Self::positional_params(call)
                } else {
                    self.constructed_params(&callee.path, call)
                }
            }
            _ => Err(ToolSourceError::NotACall),
        }
    }

    fn keyword_params(literal: &ExprStruct) -> ToolSourceResult<ToolParams> {
        let mut name = None;
        let mut description = None;
        for field in &literal.fields {
            let Member::Named(ident) = &field.member else {
                continue;
            };
            if ident == "name" {
                name = Some(literal_string(&field.expr, "field `name`")?);
            } else if ident == "description" {
                description = Some(literal_string(&field.expr, "field `description`")?);
            }
        }
        Ok(ToolParams::partial(name, description))
    }

    fn positional_params(call: &ExprCall) -> ToolSourceResult<ToolParams> {
        let argument = |index: usize| -> ToolSourceResult<String> {
            let expr = call
                .args
                .iter()
                .nth(index)
                .ok_or(ToolSourceError::MissingArgument { index })?;
            literal_string(expr, &format!("argument {index}"))
        };
        Ok(ToolParams::new(argument(0)?, argument(2)?))
    }

    fn constructed_params(&self, callee: &Path, call: &ExprCall) -> ToolSourceResult<ToolParams> {
        let path = path_string(callee);
        let args = call
            .args
            .iter()
            .enumerate()
            .map(|(index, arg)| literal_value(arg, &format!("argument {index}")))
            .collect::<ToolSourceResult<Vec<_>>>()?;

        let tool = self
            .constructors
            .construct(&path, &args)
            .ok_or_else(|| ToolSourceError::UnknownConstructor { path: path.clone() })?
            .map_err(|source| ToolSourceError::Construction { path, source })?;

        Ok(ToolParams::new(tool.name(), tool.description()))
    }

    fn is_tool_type(&self, path: &Path) -> bool {
        path.segments
            .last()
            .is_some_and(|segment| segment.ident == self.tool_type)
    }

    fn is_tool_constructor(&self, path: &Path) -> bool {
        let idents: Vec<_> = path.segments.iter().map(|segment| &segment.ident).collect();
        match idents.as_slice() {
            [.., ty, method] if *ty == &self.tool_type && *method == "new" => true,
            [.., ty] => *ty == &self.tool_type,
            [] => false,
        }
    }
}

fn path_string(path: &Path) -> String {
    path.segments
        .iter()
        .map(|segment| segment.ident.to_string())
        .collect::<Vec<_>>()
        .join("::")
}

/// Collects the expressions a function hands back to its caller.
///
/// Only outermost functions count; helper functions and impls nested in a
/// body are skipped like closures.
#[derive(Default)]
struct ReturnCollector<'ast> {
    returns: Vec<&'ast Expr>,
    depth: usize,
}

impl<'ast> ReturnCollector<'ast> {
    fn push_tail(&mut self, block: &'ast Block) {
        if let Some(Stmt::Expr(tail, None)) = block.stmts.last()
            && !matches!(tail, Expr::Return(_))
        {
            self.returns.push(tail);
        }
    }
}

impl<'ast> Visit<'ast> for ReturnCollector<'ast> {
    fn visit_expr_return(&mut self, node: &'ast ExprReturn) {
        if let Some(expr) = &node.expr {
            self.returns.push(expr);
        }
        visit::visit_expr_return(self, node);
    }

    fn visit_expr_closure(&mut self, _node: &'ast ExprClosure) {}

    fn visit_item_fn(&mut self, node: &'ast ItemFn) {
        if self.depth > 0 {
            return;
        }
        self.depth += 1;
        visit::visit_item_fn(self, node);
        self.depth -= 1;
        self.push_tail(&node.block);
    }

    fn visit_impl_item_fn(&mut self, node: &'ast ImplItemFn) {
        if self.depth > 0 {
            return;
        }
        self.depth += 1;
        visit::visit_impl_item_fn(self, node);
        self.depth -= 1;
        self.push_tail(&node.block);
    }
}

/// Reasons source extraction produced nothing.
#[derive(Debug, Error)]
pub enum ToolSourceError {
    /// Source text is not valid Rust.
    #[error("tool factory source does not parse: {reason}")]
    Parse {
        /// Parser message.
        reason: String,
    },

    /// No function returns a value.
    #[error("tool factory has no return point")]
    NoReturn,

    /// More than one return point was found.
    #[error("tool factory has {count} return points")]
    AmbiguousReturn {
        /// Number of return points found.
        count: usize,
    },

    /// The returned expression is neither a tool literal nor a call.
    #[error("returned expression is not a tool construction")]
    NotACall,

    /// A positional `Tool` argument is absent.
    #[error("tool constructor is missing positional argument {index}")]
    MissingArgument {
        /// Zero-based argument index.
        index: usize,
    },

    /// An argument or field could not be evaluated as a literal.
    #[error("{context} is not a literal")]
    NotLiteral {
        /// Which argument or field failed.
        context: String,
    },

    /// The called path has no registered constructor.
    #[error("no constructor registered for `{path}`")]
    UnknownConstructor {
        /// Call path as written in source.
        path: String,
    },

    /// The registered constructor returned an error.
    #[error("constructor `{path}` failed")]
    Construction {
        /// Call path as written in source.
        path: String,
        /// Error returned by the constructor.
        source: ToolError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constructors::DescribedTool;
    use crate::registry::ToolResult;
    use serde_json::Value;

    #[test]
    fn extracts_keyword_form() {
        let source = r#"
            fn get_search(api: SerpApi) -> Tool {
                Tool {
                    name: "Search".into(),
                    func: api.run,
                    description: "searches".to_string(),
                }
            }
        "#;
        let params = SourceToolExtractor::default().extract(source).unwrap();
        assert_eq!(params, ToolParams::new("Search", "searches"));
    }

    #[test]
    fn keyword_form_tolerates_missing_fields() {
        let source = r#"fn f() -> Tool { return Tool { name: "Only name", func: run }; }"#;
        let params = SourceToolExtractor::default().try_extract(source).unwrap();
        assert_eq!(params.name(), Some("Only name"));
        assert_eq!(params.description(), None);
    }

    #[test]
    fn extracts_positional_form() {
        let source = r#"
            fn get_python_repl() -> Tool {
                let repl = PythonRepl::default();
                return Tool::new("Python REPL", repl.run, "A Python shell.");
            }
        "#;
        let params = SourceToolExtractor::default().try_extract(source).unwrap();
        assert_eq!(params, ToolParams::new("Python REPL", "A Python shell."));
    }

    #[test]
    fn positional_form_requires_three_arguments() {
        let source = r#"fn f() -> Tool { Tool("Search", run) }"#;
        let err = SourceToolExtractor::default()
            .try_extract(source)
            .expect_err("missing description");
        assert!(matches!(err, ToolSourceError::MissingArgument { index: 2 }));
    }

    #[test]
    fn no_return_is_absent() {
        let source = "fn setup() { let _ = 1; }";
        assert!(SourceToolExtractor::default().extract(source).is_none());
        assert!(matches!(
            SourceToolExtractor::default().try_extract(source),
            Err(ToolSourceError::NoReturn)
        ));
    }

    #[test]
    fn closures_are_not_return_points() {
        let source = r#"
            fn f() -> Tool {
                let wrap = |x: u32| { return x + 1; };
                Tool::new("Wrapped", wrap, "wraps")
            }
        "#;
        let params = SourceToolExtractor::default().try_extract(source).unwrap();
        assert_eq!(params.name(), Some("Wrapped"));
    }

    #[test]
    fn nested_helpers_are_not_return_points() {
        let source = r#"
            fn get_search() -> Tool {
                fn describe() -> &'static str {
                    "searches"
                }
                struct Api;
                impl Api {
                    fn run(&self) -> String {
                        return String::new();
                    }
                }
                Tool::new("Search", run, "searches")
            }
        "#;
        let params = SourceToolExtractor::default().try_extract(source).unwrap();
        assert_eq!(params, ToolParams::new("Search", "searches"));
    }

    #[test]
    fn impl_methods_are_factories() {
        let source = r#"
            impl SearchFactory {
                fn build(&self) -> Tool {
                    Tool::new("Search", run, "searches")
                }
            }
        "#;
        let params = SourceToolExtractor::default().try_extract(source).unwrap();
        assert_eq!(params.name(), Some("Search"));
    }

    #[test]
    fn several_returns_are_ambiguous() {
        let source = r#"
            fn f(flag: bool) -> Tool {
                if flag {
                    return Tool::new("A", run, "first");
                }
                Tool::new("B", run, "second")
            }
        "#;
        let extractor = SourceToolExtractor::default();
        assert!(matches!(
            extractor.try_extract(source),
            Err(ToolSourceError::AmbiguousReturn { count: 2 })
        ));
        assert!(extractor.extract(source).is_none());
    }

    #[test]
    fn unparsable_source_is_absent() {
        let extractor = SourceToolExtractor::default();
        assert!(matches!(
            extractor.try_extract("fn broken( {"),
            Err(ToolSourceError::Parse { .. })
        ));
        assert!(extractor.extract("fn broken( {").is_none());
    }

    #[test]
    fn non_literal_arguments_are_reported() {
        let source = "fn f() -> Tool { Tool::new(NAME, run, DESCRIPTION) }";
        let err = SourceToolExtractor::default()
            .try_extract(source)
            .expect_err("non-literal");
        assert!(matches!(err, ToolSourceError::NotLiteral { context } if context == "argument 0"));
    }

    struct Requests {
        name: String,
    }

    impl DescribedTool for Requests {
        fn name(&self) -> &str {
            &self.name
        }

        fn description(&self) -> &str {
            "Issues HTTP GET requests."
        }
    }

    fn requests(args: &[Value]) -> ToolResult<Requests> {
        let name = args.first().and_then(Value::as_str).unwrap_or("requests_get");
        Ok(Requests {
            name: name.to_owned(),
        })
    }

    #[test]
    fn falls_back_to_registered_constructors() {
        let table = ConstructorTable::new()
            .with("RequestsGetTool::new", requests)
            .unwrap();
        let extractor = SourceToolExtractor::new(table);

        let source = r#"fn f() -> RequestsGetTool { RequestsGetTool::new("requests_get", 30) }"#;
        let params = extractor.try_extract(source).unwrap();
        assert_eq!(params, ToolParams::new("requests_get", "Issues HTTP GET requests."));

        let source = "fn f() -> Wrapper { Wrapper::new() }";
        let err = extractor.try_extract(source).expect_err("unregistered");
        assert!(matches!(
            err,
            ToolSourceError::UnknownConstructor { path } if path == "Wrapper::new"
        ));
    }

    #[test]
    fn constructor_failures_are_reported() {
        let table = ConstructorTable::new()
            .with("Broken::new", |_: &[Value]| -> ToolResult<Requests> {
                Err(ToolError::execution("missing api key"))
            })
            .unwrap();
        let extractor = SourceToolExtractor::new(table);

        let err = extractor
            .try_extract("fn f() -> Broken { Broken::new() }")
            .expect_err("constructor fails");
        assert!(matches!(err, ToolSourceError::Construction { path, .. } if path == "Broken::new"));
        assert!(extractor.extract("fn f() -> Broken { Broken::new() }").is_none());
    }

    #[test]
    fn custom_tool_type() {
        let extractor = SourceToolExtractor::default().with_tool_type("StructuredTool");
        let source =
            r#"fn f() -> StructuredTool { StructuredTool::new("Math", calc, "does maths") }"#;
        let params = extractor.try_extract(source).unwrap();
        assert_eq!(params.name(), Some("Math"));
    }
}
