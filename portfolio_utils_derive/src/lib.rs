use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, ItemFn};

/// Instrument a function with a tracing span that records its return value at
/// trace level and emits a `call` event whenever the function is entered.
///
/// Arguments are forwarded to [`tracing::instrument`], so fields that must
/// not end up in the logs have to be listed in `skip(...)`.
#[proc_macro_attribute]
pub fn trace_instrument(meta: TokenStream, input: TokenStream) -> TokenStream {
    let meta = proc_macro2::TokenStream::from(meta);
    let ItemFn {
        attrs,
        vis,
        sig,
        block,
    } = parse_macro_input!(input as ItemFn);

    let ret = if sig.asyncness.is_some() || !matches!(sig.output, syn::ReturnType::Default) {
        quote! { ret(level = "trace"), }
    } else {
        quote! {}
    };

    quote! {
        #[::tracing::instrument(#ret #meta)]
        #(#attrs)*
        #vis #sig {
            ::tracing::trace!("call");
            #block
        }
    }
    .into()
}
