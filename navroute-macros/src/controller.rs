//! Controller-related macros.
//!
//! This module contains:
//! - `#[controller]` - Attribute macro generating a `Controller` implementation
//!   from the `#[action]` methods of an inherent `impl` block

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    FnArg, Ident, ImplItem, ImplItemFn, ItemImpl, LitStr, Token, Type, parse::Parse,
    parse_macro_input,
};

/// Arguments for the `#[action]` marker.
struct ActionArgs {
    name: Option<String>,
}

impl Parse for ActionArgs {
    fn parse(input: syn::parse::ParseStream) -> syn::Result<Self> {
        let mut name = None;

        while !input.is_empty() {
            let ident: Ident = input.parse()?;
            input.parse::<Token![=]>()?;

            match ident.to_string().as_str() {
                "name" => {
                    let lit: LitStr = input.parse()?;
                    name = Some(lit.value());
                }
                other => {
                    return Err(syn::Error::new(
                        ident.span(),
                        format!("unknown attribute: {}", other),
                    ));
                }
            }

            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }

        Ok(ActionArgs { name })
    }
}

/// How the action method wants the request.
enum Input {
    None,
    Request,
    Params,
}

struct Action {
    name: String,
    method: Ident,
    is_async: bool,
    input: Input,
}

/// Implementation of the `#[controller]` macro.
pub fn controller_impl(attr: TokenStream, item: TokenStream) -> TokenStream {
    if !attr.is_empty() {
        return syn::Error::new(
            proc_macro2::Span::call_site(),
            "#[controller] takes no arguments",
        )
        .to_compile_error()
        .into();
    }

    let mut input = parse_macro_input!(item as ItemImpl);

    if let Some((_, path, _)) = &input.trait_ {
        return syn::Error::new_spanned(path, "#[controller] must be placed on an inherent impl block")
            .to_compile_error()
            .into();
    }

    let mut actions = Vec::new();
    for item in &mut input.items {
        let ImplItem::Fn(method) = item else {
            continue;
        };
        match take_action(method) {
            Ok(Some(action)) => actions.push(action),
            Ok(None) => {}
            Err(err) => return err.to_compile_error().into(),
        }
    }

    if let Some(duplicate) = find_duplicate(&actions) {
        return syn::Error::new_spanned(
            &duplicate.method,
            format!("action `{}` is defined more than once", duplicate.name),
        )
        .to_compile_error()
        .into();
    }

    let self_ty = &input.self_ty;
    let (impl_generics, _, where_clause) = input.generics.split_for_impl();

    let names: Vec<_> = actions.iter().map(|action| action.name.as_str()).collect();
    let has_action = if names.is_empty() {
        quote! { false }
    } else {
        quote! { ::core::matches!(action, #(#names)|*) }
    };
    let arms = actions.iter().map(call_arm);

    let expanded = quote! {
        #input

        impl #impl_generics ::navroute::Controller for #self_ty #where_clause {
            fn has_action(&self, action: &str) -> bool {
                #has_action
            }

            async fn call(
                &self,
                action: &str,
                request: ::navroute::ActionRequest,
            ) -> ::core::result::Result<(), ::navroute::BoxError> {
                let _ = &request;
                match action {
                    #(#arms)*
                    other => ::core::result::Result::Err(
                        ::std::format!("unknown action `{}`", other).into()
                    ),
                }
            }
        }
    };

    TokenStream::from(expanded)
}

/// Strips the `#[action]` marker from `method` and describes the action.
fn take_action(method: &mut ImplItemFn) -> syn::Result<Option<Action>> {
    let Some(position) = method
        .attrs
        .iter()
        .position(|attr| attr.path().is_ident("action"))
    else {
        return Ok(None);
    };
    let attr = method.attrs.remove(position);

    let args = match &attr.meta {
        syn::Meta::Path(_) => ActionArgs { name: None },
        _ => attr.parse_args::<ActionArgs>()?,
    };

    let sig = &method.sig;
    let mut inputs = sig.inputs.iter();
    match inputs.next() {
        Some(FnArg::Receiver(receiver)) if receiver.reference.is_some() && receiver.mutability.is_none() => {}
        _ => {
            return Err(syn::Error::new_spanned(
                sig,
                "action methods must take `&self`",
            ));
        }
    }

    let input = match inputs.next() {
        None => Input::None,
        Some(FnArg::Typed(pat_type)) => classify(&pat_type.ty)?,
        Some(other) => {
            return Err(syn::Error::new_spanned(other, "unexpected receiver"));
        }
    };

    if let Some(extra) = inputs.next() {
        return Err(syn::Error::new_spanned(
            extra,
            "action methods take at most one argument (`ActionRequest` or `Params`)",
        ));
    }

    Ok(Some(Action {
        name: args.name.unwrap_or_else(|| sig.ident.to_string()),
        method: sig.ident.clone(),
        is_async: sig.asyncness.is_some(),
        input,
    }))
}

fn classify(ty: &Type) -> syn::Result<Input> {
    if let Type::Path(path) = ty
        && let Some(last) = path.path.segments.last()
    {
        match last.ident.to_string().as_str() {
            "ActionRequest" => return Ok(Input::Request),
            "Params" => return Ok(Input::Params),
            _ => {}
        }
    }
    Err(syn::Error::new_spanned(
        ty,
        "action argument must be `ActionRequest` or `Params`",
    ))
}

fn find_duplicate(actions: &[Action]) -> Option<&Action> {
    actions
        .iter()
        .enumerate()
        .find(|(i, action)| actions[..*i].iter().any(|earlier| earlier.name == action.name))
        .map(|(_, action)| action)
}

fn call_arm(action: &Action) -> TokenStream2 {
    let name = &action.name;
    let method = &action.method;
    let args = match action.input {
        Input::None => quote! {},
        Input::Request => quote! { request },
        Input::Params => quote! { request.params },
    };
    let call = if action.is_async {
        quote! { self.#method(#args).await }
    } else {
        quote! { self.#method(#args) }
    };

    quote! {
        #name => ::navroute::IntoActionResult::into_action_result(#call),
    }
}
