use component_tools::{
    SourceToolExtractor, ToolCatalog, ToolGroup, ToolParams, ToolSourceError, tool_factory,
};

#[allow(dead_code)]
struct Tool {
    name: String,
    func: fn(&str) -> String,
    description: String,
}

impl Tool {
    fn new(name: &str, func: fn(&str) -> String, description: &str) -> Self {
        Self {
            name: name.to_owned(),
            func,
            description: description.to_owned(),
        }
    }
}

fn echo(input: &str) -> String {
    input.to_owned()
}

#[tool_factory(key = "echo")]
fn get_echo() -> Tool {
    Tool {
        name: "Echo".into(),
        func: echo,
        description: "Repeats its input.".to_string(),
    }
}

#[tool_factory(
    key = "llm-math",
    group = Llm,
    name = "Calculator",
    description = "Useful for arithmetic."
)]
fn get_llm_math() -> Tool {
    Tool::new("ignored", echo, "ignored")
}

#[tool_factory(key = "echo", group = ExtraOptional)]
fn get_loud_echo() -> Tool {
    Tool::new("Loud Echo", echo, "Repeats its input loudly.")
}

#[tool_factory(group = extra_llm)]
fn get_branching(flag: bool) -> Tool {
    if flag {
        return Tool::new("A", echo, "first");
    }
    Tool::new("B", echo, "second")
}

#[test]
fn factories_remain_callable() {
    assert_eq!(get_echo().name, "Echo");
    assert_eq!((get_llm_math().func)("2"), "2");
    assert_eq!(get_branching(true).description, "first");
    assert_eq!(get_loud_echo().name, "Loud Echo");
}

#[test]
fn discovered_catalog_merges_groups() {
    let catalog = ToolCatalog::discovered().unwrap();

    let keys: Vec<_> = catalog.keys().collect();
    assert_eq!(keys, ["echo", "llm-math", "get_branching"]);
    assert_eq!(catalog.get("echo").unwrap().group(), ToolGroup::ExtraOptional);
    assert_eq!(catalog.get("get_branching").unwrap().group(), ToolGroup::ExtraLlm);
}

#[test]
fn params_prefer_declared_metadata() {
    let catalog = ToolCatalog::discovered().unwrap();
    let extractor = SourceToolExtractor::default();

    assert_eq!(
        catalog.tool_params("llm-math", &extractor).unwrap(),
        Some(ToolParams::new("Calculator", "Useful for arithmetic."))
    );
    assert_eq!(
        catalog.tool_params("echo", &extractor).unwrap(),
        Some(ToolParams::new("Loud Echo", "Repeats its input loudly."))
    );
}

#[test]
fn captured_source_is_extractable() {
    let catalog = ToolCatalog::discovered().unwrap();
    let extractor = SourceToolExtractor::default();

    let branching = catalog.get("get_branching").unwrap();
    assert!(branching.declared().is_none());
    let source = branching.source().unwrap();
    assert!(matches!(
        extractor.try_extract(source),
        Err(ToolSourceError::AmbiguousReturn { count: 2 })
    ));
    assert_eq!(catalog.tool_params("get_branching", &extractor).unwrap(), None);

    let described = catalog.describe(&extractor);
    assert_eq!(described.len(), 3);
    assert_eq!(described["echo"].as_ref().and_then(ToolParams::name), Some("Loud Echo"));
}
