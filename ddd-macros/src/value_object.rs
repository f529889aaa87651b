use crate::utils::apply_derives;
use proc_macro::TokenStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Item, Result, Token, parse::Parse, parse::ParseStream, parse_macro_input};

/// #[value_object] 宏实现
/// - 支持结构体（具名或 tuple）与枚举
/// - 默认派生：Debug, Default, Clone, Serialize, Deserialize, PartialEq, Eq
/// - `debug = false` / `default = false` 去掉对应派生；`copy = true` 追加 Copy, Hash
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let cfg = parse_macro_input!(attr as ValueObjectAttrConfig);
    let mut input = parse_macro_input!(item as Item);

    let mut required: Vec<syn::Path> = Vec::new();
    if cfg.debug {
        required.push(syn::parse_quote!(Debug));
    }
    if cfg.default {
        required.push(syn::parse_quote!(Default));
    }
    required.extend([
        syn::parse_quote!(Clone),
        syn::parse_quote!(serde::Serialize),
        syn::parse_quote!(serde::Deserialize),
        syn::parse_quote!(PartialEq),
        syn::parse_quote!(Eq),
    ]);
    if cfg.copy {
        required.push(syn::parse_quote!(Copy));
        required.push(syn::parse_quote!(Hash));
    }

    match &mut input {
        Item::Struct(st) => apply_derives(&mut st.attrs, required),
        Item::Enum(en) => apply_derives(&mut en.attrs, required),
        other => {
            return syn::Error::new(other.span(), "#[value_object] only supports struct or enum")
                .to_compile_error()
                .into();
        }
    }

    TokenStream::from(quote! { #input })
}

// -------- parsing --------

struct ValueObjectAttrConfig {
    debug: bool,
    default: bool,
    copy: bool,
}

impl Parse for ValueObjectAttrConfig {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut debug: Option<bool> = None;
        let mut default: Option<bool> = None;
        let mut copy: Option<bool> = None;

        let pairs: Punctuated<syn::MetaNameValue, Token![,]> =
            Punctuated::parse_terminated(input)?;

        for kv in pairs {
            let key = kv
                .path
                .get_ident()
                .map(|i| i.to_string())
                .unwrap_or_default();

            let slot = match key.as_str() {
                "debug" => &mut debug,
                "default" => &mut default,
                "copy" => &mut copy,
                _ => {
                    return Err(syn::Error::new(
                        kv.path.span(),
                        "unknown key; expected 'debug' | 'default' | 'copy'",
                    ));
                }
            };

            if slot.is_some() {
                return Err(syn::Error::new(
                    kv.path.span(),
                    format!("duplicate key '{key}' in attribute"),
                ));
            }

            match kv.value {
                syn::Expr::Lit(syn::ExprLit {
                    lit: syn::Lit::Bool(b),
                    ..
                }) => *slot = Some(b.value()),
                other => {
                    return Err(syn::Error::new(
                        other.span(),
                        format!("expected boolean literal for '{key}'"),
                    ));
                }
            }
        }

        Ok(Self {
            debug: debug.unwrap_or(true),
            default: default.unwrap_or(true),
            copy: copy.unwrap_or(false),
        })
    }
}
