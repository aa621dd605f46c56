//! Procedural macros for tool factory registration.
//!
//! `#[tool_factory]` leaves the annotated function untouched and submits a
//! `component_tools::ToolFactory` describing it to the link-time registry.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{ToTokens, format_ident, quote};
use syn::meta::ParseNestedMeta;
use syn::{Ident, ItemFn, LitStr, parse_macro_input};

/// Registers a tool factory.
///
/// Arguments (all optional):
///
/// * `key = "..."`: registry key, defaults to the function name;
/// * `group = Base | Llm | ExtraLlm | ExtraOptional`: defaults to `Base`;
/// * `name = "...", description = "..."`: declared metadata, given together.
///
/// Without declared metadata the function's source is captured so the
/// catalog can inspect it.
#[proc_macro_attribute]
pub fn tool_factory(attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut args = FactoryArgs::default();
    let parser = syn::meta::parser(|meta| args.parse(&meta));
    parse_macro_input!(attr with parser);
    let function = parse_macro_input!(item as ItemFn);

    expand(args, &function)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

#[derive(Default)]
struct FactoryArgs {
    key: Option<LitStr>,
    group: Option<Ident>,
    name: Option<LitStr>,
    description: Option<LitStr>,
}

impl FactoryArgs {
    fn parse(&mut self, meta: &ParseNestedMeta<'_>) -> syn::Result<()> {
        if meta.path.is_ident("key") {
            self.key = Some(meta.value()?.parse()?);
        } else if meta.path.is_ident("group") {
            self.group = Some(meta.value()?.parse()?);
        } else if meta.path.is_ident("name") {
            self.name = Some(meta.value()?.parse()?);
        } else if meta.path.is_ident("description") {
            self.description = Some(meta.value()?.parse()?);
        } else {
            return Err(meta.error("unsupported tool_factory argument"));
        }
        Ok(())
    }
}

fn expand(args: FactoryArgs, function: &ItemFn) -> syn::Result<TokenStream2> {
    let ident = &function.sig.ident;
    let key = args
        .key
        .unwrap_or_else(|| LitStr::new(&ident.to_string(), ident.span()));
    if key.value().trim().is_empty() {
        return Err(syn::Error::new(key.span(), "tool key cannot be empty"));
    }

    let group = match args.group {
        None => format_ident!("Base"),
        Some(group) => group_variant(&group)?,
    };

    let declared = match (args.name, args.description) {
        (Some(name), Some(description)) => quote!(.with_declared(#name, #description)),
        (None, None) => TokenStream2::new(),
        (Some(name), None) => {
            return Err(syn::Error::new(name.span(), "`name` requires `description`"));
        }
        (None, Some(description)) => {
            return Err(syn::Error::new(
                description.span(),
                "`description` requires `name`",
            ));
        }
    };

    let source = function.to_token_stream().to_string();

    Ok(quote! {
        #function

        ::component_tools::inventory::submit! {
            ::component_tools::ToolFactory::new(#key, ::component_tools::ToolGroup::#group)
                .with_source(#source)
                #declared
        }
    })
}

fn group_variant(group: &Ident) -> syn::Result<Ident> {
    let variant = match group.to_string().as_str() {
        "Base" | "base" => "Base",
        "Llm" | "llm" => "Llm",
        "ExtraLlm" | "extra_llm" => "ExtraLlm",
        "ExtraOptional" | "extra_optional" => "ExtraOptional",
        _ => {
            return Err(syn::Error::new(
                group.span(),
                "expected one of `Base`, `Llm`, `ExtraLlm`, `ExtraOptional`",
            ));
        }
    };
    Ok(Ident::new(variant, group.span()))
}
