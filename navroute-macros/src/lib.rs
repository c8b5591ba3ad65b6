//! Procedural macros for navroute.

use proc_macro::TokenStream;

mod controller;

/// Generates a `Controller` implementation from an inherent `impl` block.
///
/// Methods marked `#[action]` become actions named after the method;
/// `#[action(name = "...")]` overrides the name. An action takes `&self`
/// and optionally one `ActionRequest` or `Params` argument, may be `async`,
/// and returns `()` or `Result<(), E>`.
///
/// ```rust,ignore
/// struct Users;
///
/// #[navroute::controller]
/// impl Users {
///     #[action]
///     async fn list(&self) {}
///
///     #[action(name = "edit")]
///     fn edit_user(&self, params: Params) -> Result<(), BoxError> {
///         let id: u32 = params.get_as("id")?;
///         Ok(())
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn controller(attr: TokenStream, item: TokenStream) -> TokenStream {
    controller::controller_impl(attr, item)
}
