//! Implementation of the `#[service]` attribute macro
//!
//! The expansion walks the impl block once, classifying each method against
//! the eligibility rules. Eligible methods contribute a table entry; the
//! rest are skipped silently, mirroring how a reflective registry ignores
//! methods of the wrong shape. The impl block itself is emitted unchanged,
//! followed by the generated `Service` implementation.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, FnArg, ImplItem, ImplItemFn, ItemImpl, ReturnType, Type, Visibility};

/// The pieces of one eligible method needed to emit its trampoline.
struct Endpoint<'a> {
    /// Rust method ident (`add`)
    ident: &'a syn::Ident,
    /// Wire method name (`"Add"`)
    wire_name: String,
    /// Owned argument type, reference stripped
    arg_ty: &'a Type,
    /// Whether the method takes the argument by `&` reference
    arg_by_ref: bool,
    /// Pointed-to reply type behind the `&mut`
    reply_ty: &'a Type,
}

pub fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    if !attr.is_empty() {
        return syn::Error::new(
            proc_macro2::Span::call_site(),
            "#[service] takes no arguments",
        )
        .to_compile_error()
        .into();
    }

    let input = parse_macro_input!(item as ItemImpl);

    if let Some((_, path, _)) = &input.trait_ {
        return syn::Error::new_spanned(
            path,
            "#[service] goes on an inherent impl block, not a trait impl",
        )
        .to_compile_error()
        .into();
    }

    let service_ident = match receiver_ident(&input.self_ty) {
        Some(ident) => ident,
        None => {
            return syn::Error::new_spanned(
                &input.self_ty,
                "#[service] requires a plain named receiver type",
            )
            .to_compile_error()
            .into();
        }
    };
    let service_name = service_ident.to_string();

    let endpoints: Vec<Endpoint<'_>> = input
        .items
        .iter()
        .filter_map(|item| match item {
            ImplItem::Fn(method) => classify(method),
            _ => None,
        })
        .collect();

    let entries: Vec<TokenStream2> = endpoints.iter().map(table_entry).collect();
    let self_ty = &input.self_ty;

    let expanded = quote! {
        #input

        impl ::jroh_server::Service for #self_ty {
            const NAME: &'static str = #service_name;

            fn method_table(self: ::std::sync::Arc<Self>) -> ::jroh_server::MethodTable {
                #[allow(unused_mut)]
                let mut table = ::jroh_server::MethodTable::new();
                #(#entries)*
                table
            }
        }
    };

    expanded.into()
}

/// Classify one method against the eligibility rules; `None` means skip.
fn classify(method: &ImplItemFn) -> Option<Endpoint<'_>> {
    let sig = &method.sig;

    if !matches!(method.vis, Visibility::Public(_)) {
        return None;
    }
    if sig.asyncness.is_some() || sig.unsafety.is_some() || sig.abi.is_some() {
        return None;
    }
    if !sig.generics.params.is_empty() {
        return None;
    }
    if sig.inputs.len() != 3 {
        return None;
    }

    let mut inputs = sig.inputs.iter();

    // Receiver must be exactly `&self`.
    match inputs.next()? {
        FnArg::Receiver(recv) if recv.reference.is_some() && recv.mutability.is_none() => {}
        _ => return None,
    }

    // Argument: by value, or by shared reference.
    let (arg_ty, arg_by_ref) = match inputs.next()? {
        FnArg::Typed(arg) => match arg.ty.as_ref() {
            Type::Reference(r) if r.mutability.is_none() => (r.elem.as_ref(), true),
            Type::Path(_) => (arg.ty.as_ref(), false),
            _ => return None,
        },
        _ => return None,
    };

    // Reply: must be addressable, i.e. behind `&mut`.
    let reply_ty = match inputs.next()? {
        FnArg::Typed(arg) => match arg.ty.as_ref() {
            Type::Reference(r) if r.mutability.is_some() => r.elem.as_ref(),
            _ => return None,
        },
        _ => return None,
    };

    // One return value of the error-indicator shape.
    if !returns_result(&sig.output) {
        return None;
    }

    Some(Endpoint {
        ident: &sig.ident,
        wire_name: pascal_case(&sig.ident.to_string()),
        arg_ty,
        arg_by_ref,
        reply_ty,
    })
}

/// Emit one `table.insert(...)` block for an endpoint.
fn table_entry(endpoint: &Endpoint<'_>) -> TokenStream2 {
    let Endpoint {
        ident,
        wire_name,
        arg_ty,
        arg_by_ref,
        reply_ty,
    } = endpoint;

    let arg_expr = if *arg_by_ref {
        quote! { &args }
    } else {
        quote! { args }
    };

    quote! {
        {
            let receiver = ::std::sync::Arc::clone(&self);
            table.insert(
                #wire_name,
                ::std::boxed::Box::new(move |params| {
                    ::jroh_server::invoke(params, |args: #arg_ty, reply: &mut #reply_ty| {
                        receiver.#ident(#arg_expr, reply)
                    })
                }),
            );
        }
    }
}

/// Extract the ident of the receiver type, if it is a plain path.
fn receiver_ident(ty: &Type) -> Option<&syn::Ident> {
    match ty {
        Type::Path(path) => path.path.segments.last().map(|seg| &seg.ident),
        _ => None,
    }
}

/// True when the return type is written as some `Result<..>` path.
fn returns_result(output: &ReturnType) -> bool {
    match output {
        ReturnType::Type(_, ty) => match ty.as_ref() {
            Type::Path(path) => path
                .path
                .segments
                .last()
                .is_some_and(|seg| seg.ident == "Result"),
            _ => false,
        },
        ReturnType::Default => false,
    }
}

/// snake_case -> PascalCase for wire method names.
fn pascal_case(ident: &str) -> String {
    let ident = ident.strip_prefix("r#").unwrap_or(ident);
    let mut out = String::with_capacity(ident.len());
    for part in ident.split('_') {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::pascal_case;

    #[test]
    fn pascal_case_conversion() {
        assert_eq!(pascal_case("add"), "Add");
        assert_eq!(pascal_case("server_stats"), "ServerStats");
        assert_eq!(pascal_case("a_b_c"), "ABC");
        assert_eq!(pascal_case("already"), "Already");
    }
}
