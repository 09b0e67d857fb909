//! Expiry actions.
//!
//! The engine runs an [`ExpiryAction`] on its background thread each time a
//! genuine expiry is observed. Closures implement the trait directly;
//! [`ExpiryCallback`] binds a plain function pointer to a context value.

/// Action invoked on the watchdog's background thread when the timer expires.
pub trait ExpiryAction: Send + Sync + 'static {
    /// Run the action. Errors are the action's own responsibility.
    fn expiry(&self);
}

impl<F> ExpiryAction for F
where
    F: Fn() + Send + Sync + 'static,
{
    fn expiry(&self) {
        self();
    }
}

/// Function pointer invoked with the bound context on expiry.
pub type ExpiryFn<C> = fn(&C);

/// An optional callback plus the context it is called with.
///
/// With no callback bound, expiry is a no-op.
pub struct ExpiryCallback<C> {
    callback: Option<ExpiryFn<C>>,
    context: C,
}

impl<C> ExpiryCallback<C> {
    /// Bind `callback` to `context`.
    #[must_use]
    pub fn new(callback: Option<ExpiryFn<C>>, context: C) -> Self {
        Self { callback, context }
    }

    /// The bound context.
    #[must_use]
    pub fn context(&self) -> &C {
        &self.context
    }

    /// Check if a callback is bound.
    #[must_use]
    pub fn has_callback(&self) -> bool {
        self.callback.is_some()
    }
}

impl<C> ExpiryAction for ExpiryCallback<C>
where
    C: Send + Sync + 'static,
{
    fn expiry(&self) {
        if let Some(callback) = self.callback {
            callback(&self.context);
        }
    }
}

impl<C> std::fmt::Debug for ExpiryCallback<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpiryCallback")
            .field("has_callback", &self.callback.is_some())
            .finish_non_exhaustive()
    }
}
