//! Page handler contract plus the built-in endpoints every site gets.

pub mod builtin;
pub mod reload;
pub use builtin::*;
pub use reload::*;

use crate::context::RequestContext;
use crate::error::HandlerError;
use std::future::Future;
use std::pin::Pin;

pub type HandlerFuture<'a> = Pin<Box<dyn Future<Output = Result<(), HandlerError>> + Send + 'a>>;

/// Business logic for one route: fills the context's data bag, or writes the
/// response itself when the route has no template.
///
/// Implemented for any `fn(&mut RequestContext) -> HandlerFuture<'_>`:
///
/// ```ignore
/// fn index(ctx: &mut RequestContext) -> HandlerFuture<'_> {
///     Box::pin(async move {
///         ctx.assign("greeting", "hello");
///         Ok(())
///     })
/// }
/// ```
pub trait PageHandler: Send + Sync + 'static {
    fn call<'a>(&'a self, ctx: &'a mut RequestContext) -> HandlerFuture<'a>;
}

impl<F> PageHandler for F
where
    F: for<'a> Fn(&'a mut RequestContext) -> HandlerFuture<'a> + Send + Sync + 'static,
{
    fn call<'a>(&'a self, ctx: &'a mut RequestContext) -> HandlerFuture<'a> {
        (self)(ctx)
    }
}
