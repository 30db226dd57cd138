use std::{sync::Arc, time::Duration};
use tracing::{error, info, warn};

use crate::application::usercases::subscription_onboarding::SubscriptionOnboardingUseCase;
use crate::domain::{
    entities::{streamers::Streamer, submissions::Submission},
    errors::CatalogError,
    repositories::{
        channel_resolver::ChannelResolver,
        entity_store::{EntityStore, StoredEntity},
        hub_client::HubClient,
    },
    value_objects::{
        alias::normalize_alias,
        enums::process_actions::ProcessAction,
        operation_context::OperationContext,
        submissions::{InsertSubmissionModel, ProcessedSubmission, normalize_languages},
    },
};

/// Upper bound on the onboarding step of an approval, whatever the caller's deadline.
pub const ONBOARDING_TIMEOUT: Duration = Duration::from_secs(15);

pub struct SubmissionUseCase<S, T, H, R>
where
    S: EntityStore<Submission> + 'static,
    T: EntityStore<Streamer> + 'static,
    H: HubClient + Send + Sync + 'static,
    R: ChannelResolver + Send + Sync + 'static,
{
    submission_store: Arc<S>,
    streamer_store: Arc<T>,
    onboarding: Arc<SubscriptionOnboardingUseCase<T, H, R>>,
}

impl<S, T, H, R> SubmissionUseCase<S, T, H, R>
where
    S: EntityStore<Submission> + 'static,
    T: EntityStore<Streamer> + 'static,
    H: HubClient + Send + Sync + 'static,
    R: ChannelResolver + Send + Sync + 'static,
{
    pub fn new(
        submission_store: Arc<S>,
        streamer_store: Arc<T>,
        onboarding: Arc<SubscriptionOnboardingUseCase<T, H, R>>,
    ) -> Self {
        Self {
            submission_store,
            streamer_store,
            onboarding,
        }
    }

    pub async fn list(&self) -> Result<Vec<Submission>, CatalogError> {
        self.submission_store.list().await
    }

    /// Queues a new candidate after checking its alias against both the
    /// catalog and the pending queue.
    pub async fn submit(&self, model: InsertSubmissionModel) -> Result<Submission, CatalogError> {
        let alias = model.alias.trim().to_string();
        let key = normalize_alias(&alias);
        if key.is_empty() {
            return Err(CatalogError::Validation("alias is required".to_string()));
        }

        let taken_by_streamer = self
            .streamer_store
            .list()
            .await?
            .iter()
            .any(|streamer| normalize_alias(&streamer.alias) == key);
        if taken_by_streamer {
            warn!(alias = %alias, "submission: alias already catalogued");
            return Err(CatalogError::Conflict(format!("alias already exists: {alias}")));
        }

        let submission = Submission {
            id: String::new(),
            alias,
            description: model
                .description
                .map(|description| description.trim().to_string())
                .filter(|description| !description.is_empty()),
            languages: normalize_languages(model.languages),
            platform_url: model
                .platform_url
                .map(|url| url.trim().to_string())
                .filter(|url| !url.is_empty()),
            submitted_at: None,
            submitted_by: model
                .submitted_by
                .map(|by| by.trim().to_string())
                .filter(|by| !by.is_empty()),
        };

        // The submission store enforces uniqueness against the pending queue.
        let stored = self.submission_store.append(submission).await?;
        info!(
            submission_id = %stored.id,
            alias = %stored.alias,
            "submission: queued for review"
        );

        Ok(stored)
    }

    /// Approves or rejects a pending submission.
    ///
    /// A failed approval puts the submission back at its place in the queue
    /// before the error is returned. Onboarding failures after approval are only logged.
    pub async fn process(
        &self,
        ctx: &OperationContext,
        action: &str,
        id: &str,
    ) -> Result<ProcessedSubmission, CatalogError> {
        let action: ProcessAction = action.parse()?;
        let id = id.trim();
        if id.is_empty() {
            return Err(CatalogError::Validation("submission id is required".to_string()));
        }

        let submission = self.submission_store.remove(id).await?;

        match action {
            ProcessAction::Reject => {
                info!(submission_id = %submission.id, "submission: rejected");
                Ok(ProcessedSubmission::rejected(submission))
            }
            ProcessAction::Approve => self.approve(ctx, submission).await,
        }
    }

    async fn approve(
        &self,
        ctx: &OperationContext,
        submission: Submission,
    ) -> Result<ProcessedSubmission, CatalogError> {
        let streamer = match self
            .streamer_store
            .append(Streamer::from_submission(&submission))
            .await
        {
            Ok(streamer) => streamer,
            Err(err) => {
                error!(
                    submission_id = %submission.id,
                    alias = %submission.alias,
                    conflict = err.is_conflict(),
                    error = %err,
                    "submission: failed to create streamer, requeueing"
                );
                self.requeue(submission).await;
                return Err(err);
            }
        };

        info!(
            submission_id = %submission.id,
            streamer_id = %streamer.id,
            "submission: approved"
        );

        if let Some(platform_url) = submission.platform_url() {
            let onboarding_ctx = ctx.child_with_timeout(ONBOARDING_TIMEOUT);
            if let Err(err) = self
                .onboarding
                .from_url(&onboarding_ctx, &streamer, platform_url)
                .await
            {
                warn!(
                    streamer_id = %streamer.id,
                    error = %err,
                    "submission: onboarding failed after approval, retry out of band"
                );
            }
        }

        Ok(ProcessedSubmission::approved(submission, streamer.id))
    }

    /// Puts a removed submission back where it was, ordered by its
    /// original submission time.
    async fn requeue(&self, submission: Submission) {
        let submission_id = submission.id.clone();
        let restored = self
            .submission_store
            .update_file(Box::new(move |queue: &mut Vec<Submission>| {
                let key = submission.unique_key();
                let clashes = queue.iter().any(|queued| {
                    queued.id == submission.id || (key.is_some() && queued.unique_key() == key)
                });
                if clashes {
                    return Err(CatalogError::Conflict(format!(
                        "submission already queued: {}",
                        submission.id
                    )));
                }

                let position = queue
                    .iter()
                    .position(|queued| match (queued.submitted_at, submission.submitted_at) {
                        (Some(queued_at), Some(submitted_at)) => queued_at > submitted_at,
                        _ => false,
                    })
                    .unwrap_or(queue.len());
                queue.insert(position, submission);
                Ok(())
            }))
            .await;

        if let Err(err) = restored {
            error!(
                submission_id = %submission_id,
                error = %err,
                "submission: requeue failed, submission must be restored by hand"
            );
        }
    }
}
