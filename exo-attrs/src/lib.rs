mod error_kind;

use error_kind::ErrorKindTarget;
use proc_macro::TokenStream;
use quote::quote;
use syn::parse_macro_input;

/// Derives the `exo_error::ErrorKind` trait for the given struct.
///
/// The information of the error can be customized using the `error` attribute by adding the
/// corresponding tags to it:
/// ```ignore
/// use exo_attrs::ErrorKind;
///
/// #[derive(Debug, ErrorKind)]
/// #[error(
///     message = format!("expected `{}`", expected),
///     labels = ["add it here"],
///     help = "every opening bracket needs a closing one",
/// )]
/// pub struct MissingToken {
///     expected: String,
/// }
/// ```
///
/// The following tags are available:
///
/// | Tag         | Description                                                                  |
/// | ----------- | ---------------------------------------------------------------------------- |
/// | `message`   | The message displayed at the top of the error when it is displayed.          |
/// | `labels`    | Label texts, one per span of the error, pointing at the source.              |
/// | `help`      | Optional help text for the error, describing what the user can do to fix it. |
///
/// `message` is required. Each tag accepts an expression; for structs with named fields, the
/// expression is evaluated with the fields of the struct in scope (tuple structs are not
/// supported). Labels beyond the number of spans attached to the error are dropped.
#[proc_macro_derive(ErrorKind, attributes(error))]
pub fn error_kind(item: TokenStream) -> TokenStream {
    let target = parse_macro_input!(item as ErrorKindTarget);
    let name = &target.name;
    quote! {
        impl exo_error::ErrorKind for #name {
            fn as_any(&self) -> &dyn std::any::Any {
                self
            }
            #target
        }
    }.into()
}
