use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;

use pokedex_api::{ApiError, CatalogSource};

use crate::error::QueryError;

/// Cache loader that runs `call` against an owned handle to the source.
///
/// The returned closure is `'static` so the load can outlive the caller
/// that started it.
pub(crate) fn from_source<S, T, F, Fut>(
    source: &Arc<S>,
    call: F,
) -> impl FnOnce() -> BoxFuture<'static, Result<T, QueryError>> + use<S, T, F, Fut>
where
    S: CatalogSource,
    T: Send + 'static,
    F: FnOnce(Arc<S>) -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
{
    let source = source.clone();
    move || async move { call(source).await.map_err(QueryError::from) }.boxed()
}
