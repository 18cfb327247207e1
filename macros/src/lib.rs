//! Augment the development of primitives with procedural macros.

#![doc(
    html_logo_url = "https://commonware.xyz/imgs/rustdoc_logo.svg",
    html_favicon_url = "https://commonware.xyz/favicon.ico"
)]

use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{parse_macro_input, Error, ItemFn, LitStr};

/// Levels accepted by [macro@test_traced].
const LEVELS: [&str; 5] = ["TRACE", "DEBUG", "INFO", "WARN", "ERROR"];

/// Run a test function with a tracing subscriber that writes to the test output.
///
/// The maximum level defaults to `DEBUG` and can be set with a string literal. The crate using the
/// attribute must depend on `tracing` and `tracing-subscriber`.
///
/// # Example
/// ```rust,ignore
/// use commonware_macros::test_traced;
/// use tracing::{debug, info};
///
/// #[test_traced("INFO")]
/// fn test_info_level() {
///     info!("This is an info log");
///     debug!("This is a debug log (won't be shown)");
///     assert_eq!(2 + 2, 4);
/// }
/// ```
#[proc_macro_attribute]
pub fn test_traced(attr: TokenStream, item: TokenStream) -> TokenStream {
    let level = if attr.is_empty() {
        "DEBUG".to_string()
    } else {
        let literal = parse_macro_input!(attr as LitStr);
        let level = literal.value().to_uppercase();
        if !LEVELS.contains(&level.as_str()) {
            return Error::new(
                literal.span(),
                format!("invalid level `{}`; expected one of {:?}", literal.value(), LEVELS),
            )
            .to_compile_error()
            .into();
        }
        level
    };
    let level = format_ident!("{}", level);

    // Parse the input tokens into a syntax tree
    let input = parse_macro_input!(item as ItemFn);
    let name = &input.sig.ident;
    let attrs = &input.attrs;
    let vis = &input.vis;
    let block = &input.block;

    let expanded = quote! {
        #[test]
        #(#attrs)*
        #vis fn #name() {
            // Create a subscriber that writes to the test output (captured unless the test fails)
            let subscriber = ::tracing_subscriber::fmt()
                .with_test_writer()
                .with_max_level(::tracing::Level::#level)
                .with_line_number(true)
                .finish();
            let dispatcher = ::tracing::Dispatch::new(subscriber);

            // Run the test with the subscriber installed for this thread only
            ::tracing::dispatcher::with_default(&dispatcher, || #block);
        }
    };
    TokenStream::from(expanded)
}
