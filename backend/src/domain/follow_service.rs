//! Follow domain service.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{FollowCommand, FollowRepository, UserRepository};
use crate::domain::repository_errors::{map_follow_error, map_user_error, user_not_found};
use crate::domain::{Error, Follow, FollowOutcome, FollowView, UserId, UserProfile};

/// Detail reported when a user targets themself.
pub const SELF_FOLLOW: &str = "Cannot follow self.";

/// Follow service backed by follow and user repositories.
#[derive(Clone)]
pub struct FollowService<F, U> {
    follows: Arc<F>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<F, U> FollowService<F, U> {
    /// Create the service from its driven ports.
    pub fn new(follows: Arc<F>, users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            follows,
            users,
            clock,
        }
    }
}

impl<F, U> FollowService<F, U>
where
    U: UserRepository,
{
    async fn profile(&self, id: &UserId) -> Result<UserProfile, Error> {
        self.users
            .find_profile(id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(user_not_found)
    }
}

#[async_trait]
impl<F, U> FollowCommand for FollowService<F, U>
where
    F: FollowRepository,
    U: UserRepository,
{
    async fn follow(
        &self,
        caller: &UserId,
        target: &UserId,
    ) -> Result<FollowOutcome<FollowView>, Error> {
        let Some(draft) = Follow::draft(*caller, *target, self.clock.utc()) else {
            return Err(Error::invalid_request(SELF_FOLLOW).with_details(
                serde_json::json!({ "field": "following", "code": "self_follow" }),
            ));
        };
        self.profile(target).await?;

        let outcome = self
            .follows
            .insert_if_absent(&draft)
            .await
            .map_err(map_follow_error)?;
        if outcome.is_created() {
            info!(follower_id = %caller, following_id = %target, "user followed");
        }

        let follower = self.profile(caller).await?;
        let following = self.profile(target).await?;
        Ok(outcome.map(|edge| FollowView {
            id: edge.id,
            follower,
            following,
            created_at: edge.created_at,
        }))
    }

    async fn unfollow(&self, caller: &UserId, target: &UserId) -> Result<(), Error> {
        if self
            .follows
            .remove(caller, target)
            .await
            .map_err(map_follow_error)?
        {
            info!(follower_id = %caller, following_id = %target, "user unfollowed");
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "follow_service_tests.rs"]
mod tests;
