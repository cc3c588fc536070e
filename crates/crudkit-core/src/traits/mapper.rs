//! Entity to view-model mapping.

/// Translates a stored entity into its caller-facing shape.
///
/// Returning `None` signals that the entity cannot be represented, which
/// services report as a bad request.
pub trait EntityMapper<E, V>: Send + Sync + 'static {
    /// Map one entity.
    fn map(&self, entity: &E) -> Option<V>;
}

/// Adapter turning a plain function into an [`EntityMapper`].
pub struct FnMapper<F>(pub F);

impl<E, V, F> EntityMapper<E, V> for FnMapper<F>
where
    F: Fn(&E) -> Option<V> + Send + Sync + 'static,
{
    fn map(&self, entity: &E) -> Option<V> {
        (self.0)(entity)
    }
}

impl<F> std::fmt::Debug for FnMapper<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FnMapper")
    }
}
