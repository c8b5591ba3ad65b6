//! Message trait for lifecycle notifications.

/// A marker trait for the notifications raised by the router.
///
/// Messages must be `Send + Sync + 'static` so observers can hold on to them
/// across await points.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Clone, Debug)]
/// struct Breadcrumb { token: String }
///
/// impl Message for Breadcrumb {}
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a valid Message",
    label = "must be `Send + Sync + 'static`",
    note = "Router notifications must be thread-safe and static."
)]
pub trait Message: Send + Sync + 'static {}
