use proc_macro::TokenStream;
use quote::quote;
use quote::quote_spanned;
use syn::spanned::Spanned;

/// Turns an `async fn` into a test that runs inside a `fetch_stub::TestSession`,
/// so it has exclusive use of `fetch_stub::global()` and leaves it restored.
#[proc_macro_attribute]
pub fn fetch_stub_test(attrs: TokenStream, item: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(item as syn::ItemFn);
    let args = syn::parse_macro_input!(attrs as syn::AttributeArgs);

    if !args.is_empty() {
        return quote! {
            compile_error!("fetch_stub_test doesn't take any arguments");
        }
        .into();
    }

    let mut signature = input.sig.clone();
    if signature.asyncness.take().is_none() {
        return quote_spanned! {signature.fn_token.span()=>
            compile_error!("fetch_stub_test should be put on an async function");
        }
        .into();
    }

    let attributes = &input.attrs;
    let visibility = &input.vis;
    let block = &input.block;

    let output = quote! {
        #[test]
        #(#attributes)*
        #visibility #signature {
            fetch_stub::TestSession::run(async move #block)
        }
    };

    TokenStream::from(output)
}
