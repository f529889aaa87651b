use crate::utils::{apply_derives, ensure_leading_field, is_field_named};
use proc_macro::TokenStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Item, Result, Token, Type, parse::Parse, parse::ParseStream, parse_macro_input};

const META_FIELD: &str = "meta";

/// #[domain_event] 宏实现
/// - 仅支持具名字段结构体
/// - 确保存在 `meta: EventMeta` 字段（承载事件标识与发生时间）
/// - 生成 `::ddd_domain::domain_event::DomainEvent` 实现
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let cfg = parse_macro_input!(attr as EventAttrConfig);
    let mut input = parse_macro_input!(item as Item);

    let st = match &mut input {
        Item::Struct(st) => st,
        other => {
            return syn::Error::new(
                other.span(),
                "#[domain_event] can only be used on struct types",
            )
            .to_compile_error()
            .into();
        }
    };

    let fields_named = match &mut st.fields {
        syn::Fields::Named(f) => f,
        _ => {
            return syn::Error::new(
                st.span(),
                "#[domain_event] supports only named-field structs, e.g., struct X { a: T }",
            )
            .to_compile_error()
            .into();
        }
    };

    let meta_ty: Type = syn::parse_quote! { ::ddd_domain::domain_event::EventMeta };
    ensure_leading_field(fields_named, META_FIELD, &meta_ty);

    // 载荷字段：除 meta 以外的全部字段，保持声明顺序
    let payload: Vec<(syn::Ident, String)> = fields_named
        .named
        .iter()
        .filter(|f| !is_field_named(f, META_FIELD))
        .filter_map(|f| f.ident.clone())
        .map(|ident| {
            let key = ident.to_string().trim_start_matches("r#").to_string();
            (ident, key)
        })
        .collect();

    apply_derives(
        &mut st.attrs,
        vec![
            syn::parse_quote!(Debug),
            syn::parse_quote!(Clone),
            syn::parse_quote!(PartialEq),
        ],
    );

    let ident = st.ident.clone();
    let generics = st.generics.clone();
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let event_name = cfg
        .name
        .unwrap_or_else(|| syn::LitStr::new(&ident.to_string(), ident.span()));

    let to_entries = payload.iter().map(|(field, key)| {
        quote! {
            body.insert(
                #key.to_string(),
                ::ddd_domain::domain_event::PrimitiveField::to_primitive(&self.#field),
            );
        }
    });

    let from_entries = payload.iter().map(|(field, key)| {
        quote! {
            #field: ::ddd_domain::domain_event::take_field(&mut body, #key)?
        }
    });

    let meta_ident = syn::Ident::new(META_FIELD, proc_macro2::Span::call_site());

    let out = quote! {
        #input

        impl #impl_generics ::ddd_domain::domain_event::DomainEvent for #ident #ty_generics #where_clause {
            fn name() -> &'static str {
                #event_name
            }

            fn event_name(&self) -> &'static str {
                #event_name
            }

            fn event_id(&self) -> &str {
                self.#meta_ident.event_id()
            }

            fn occurred_on(&self) -> &str {
                self.#meta_ident.occurred_on()
            }

            fn to_primitives(&self) -> ::ddd_domain::domain_event::Primitives {
                #[allow(unused_mut)]
                let mut body = ::ddd_domain::domain_event::Primitives::new();
                #( #to_entries )*
                body
            }

            fn from_primitives(
                body: ::ddd_domain::domain_event::Primitives,
                event_id: ::std::string::String,
                occurred_on: ::std::string::String,
            ) -> ::ddd_domain::error::DomainResult<Self> {
                #[allow(unused_mut, unused_variables)]
                let mut body = body;
                ::std::result::Result::Ok(Self {
                    #meta_ident: ::ddd_domain::domain_event::EventMeta::restore(event_id, occurred_on),
                    #( #from_entries, )*
                })
            }
        }
    };

    TokenStream::from(out)
}

// -------- parsing --------

struct EventAttrConfig {
    name: Option<syn::LitStr>,
}

impl Parse for EventAttrConfig {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut name: Option<syn::LitStr> = None;

        let pairs: Punctuated<syn::MetaNameValue, Token![,]> =
            Punctuated::parse_terminated(input)?;

        for kv in pairs {
            if !kv.path.is_ident("name") {
                return Err(syn::Error::new(kv.path.span(), "unknown key; expected 'name'"));
            }
            if name.is_some() {
                return Err(syn::Error::new(
                    kv.path.span(),
                    "duplicate key 'name' in attribute",
                ));
            }
            match kv.value {
                syn::Expr::Lit(syn::ExprLit {
                    lit: syn::Lit::Str(lit),
                    ..
                }) => name = Some(lit),
                other => {
                    return Err(syn::Error::new(
                        other.span(),
                        "expected string literal for 'name'",
                    ));
                }
            }
        }

        Ok(Self { name })
    }
}
