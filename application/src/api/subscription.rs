//! GraphQL [`Subscription`]s definitions.

use std::future;

use futures::{
    stream::{self, BoxStream},
    StreamExt as _,
};
use juniper::graphql_subscription;
use service::{domain::project, query, Query as _};
use tokio::sync::broadcast::error::{RecvError, TryRecvError};

use crate::{api, AsError, Context, Error};

/// Root of all GraphQL subscription.
#[derive(Clone, Copy, Debug)]
pub struct Subscription;

#[graphql_subscription(context = Context)]
impl Subscription {
    /// Subscription to the `Appraisal` of the `Project` with the specified
    /// ID.
    ///
    /// Emits the current `Appraisal` immediately, and then a recomputed one
    /// after every change of the `Project`, coalescing bursts of changes
    /// into a single emission.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PROJECT_NOT_EXISTS` - the `Project` with the specified ID does not
    ///                          exist.
    pub async fn project_appraisal(
        &self,
        id: api::project::Id,
        ctx: &Context,
    ) -> Result<BoxStream<'static, Result<api::Appraisal, Error>>, Error> {
        let service = ctx.service().clone();
        let debounce = ctx.subscriptions().debounce;
        let project_id = id.into();

        let initial =
            appraise(&service, project_id).await.map_err(ctx.error())?;

        let changes = service.database().changes();
        Ok(stream::once(future::ready(Ok(initial)))
            .chain(stream::unfold(
                (service, changes),
                move |(service, mut changes)| async move {
                    loop {
                        match changes.recv().await {
                            Ok(changed) if changed == project_id => {}
                            Ok(_) => continue,
                            Err(RecvError::Lagged(_)) => {}
                            Err(RecvError::Closed) => return None,
                        }
                        tokio::time::sleep(debounce).await;
                        loop {
                            match changes.try_recv() {
                                Ok(_) => {}
                                Err(TryRecvError::Empty) => break,
                                Err(TryRecvError::Lagged(_)) => {}
                                Err(TryRecvError::Closed) => return None,
                            }
                        }
                        return Some((
                            appraise(&service, project_id).await,
                            (service, changes),
                        ));
                    }
                },
            ))
            .boxed())
    }
}

/// Computes the current [`api::Appraisal`] of the specified `Project`.
///
/// # Errors
///
/// Errors if the `Project` doesn't exist.
async fn appraise(
    service: &crate::Service,
    project_id: project::Id,
) -> Result<api::Appraisal, Error> {
    service
        .execute(query::appraisal::OfProject { project_id })
        .await
        .map_err(AsError::into_error)?
        .ok_or_else(|| api::query::ProjectError::NotExists.into())
        .map(Into::into)
}
