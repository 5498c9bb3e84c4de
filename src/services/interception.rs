//! Generic wrapping machinery shared by every behavior.
//!
//! A chain is built from [`Link`]s: each link pairs one interceptor with the
//! next callable and routes every call through the interceptor's hook. The
//! link itself satisfies [`Callable`], so links nest arbitrarily and the
//! outermost link is indistinguishable from the original service.

use std::sync::Arc;

use crate::domain::capability::DependencySet;
use crate::domain::errors::{CallResult, ChainError, ChainResult};
use crate::domain::models::invocation::Invocation;
use crate::domain::ports::{Callable, Interceptor};

/// One link of an interception chain.
struct Link<I: Interceptor> {
    interceptor: I,
    next: Arc<dyn Callable>,
}

impl<I: Interceptor> Callable for Link<I> {
    fn call(&self, invocation: &Invocation) -> CallResult {
        self.interceptor.intercept(invocation, self.next.as_ref())
    }
}

/// Wrap `interceptor` around `original`, injecting `dependencies` into its
/// declared slots first.
///
/// Fails with [`ChainError::MissingOriginal`] when `original` is `None`;
/// wrapping nothing is a wiring bug, never a recoverable condition.
pub fn wrap<I: Interceptor + 'static>(
    mut interceptor: I,
    original: Option<Arc<dyn Callable>>,
    dependencies: &DependencySet,
) -> ChainResult<Arc<dyn Callable>> {
    let next = original.ok_or(ChainError::MissingOriginal)?;
    interceptor.inject(dependencies);
    Ok(Arc::new(Link { interceptor, next }))
}
