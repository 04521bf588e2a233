//! State shared by the command loop and the scheduler.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;

use super::command::Command;
use crate::config::{Config, defaults};
use crate::error::{CommandError, CommandResult, StoreError};
use crate::fetch::run_cycle;
use crate::formatters::{
    abstract_message, help_message, interests_message, listing_message, summary_message,
};
use crate::models::{DailyResult, InterestSet};
use crate::sources::PaperSource;
use crate::store::InterestStore;

/// Context handle held by every task; the lock spans a whole command or cycle.
pub type SharedContext = Arc<tokio::sync::Mutex<BotContext>>;

/// Tunables of the chat surface.
#[derive(Debug, Clone)]
pub struct BotSettings {
    /// Bound on a single source fetch.
    pub fetch_timeout: Duration,
    /// Cap on search results.
    pub max_results: usize,
    /// Prefix marking a chat line as a command.
    pub command_prefix: String,
    /// Maximum characters per outbound message.
    pub message_limit: usize,
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            fetch_timeout: defaults::FETCH_TIMEOUT,
            max_results: defaults::MAX_RESULTS,
            command_prefix: defaults::COMMAND_PREFIX.to_string(),
            message_limit: defaults::MESSAGE_LIMIT,
        }
    }
}

impl From<&Config> for BotSettings {
    fn from(config: &Config) -> Self {
        Self {
            fetch_timeout: config.fetch_timeout,
            max_results: config.max_results,
            command_prefix: config.command_prefix.clone(),
            message_limit: config.message_limit,
        }
    }
}

/// Interest list, its store, the latest result and the paper source.
pub struct BotContext {
    interests: InterestSet,
    store: InterestStore,
    latest: Option<DailyResult>,
    source: Box<dyn PaperSource>,
    settings: BotSettings,
}

impl BotContext {
    /// Build a context around an already loaded interest set.
    #[must_use]
    pub fn new(
        source: Box<dyn PaperSource>,
        store: InterestStore,
        interests: InterestSet,
        settings: BotSettings,
    ) -> Self {
        Self { interests, store, latest: None, source, settings }
    }

    /// Load the interest set from `store` and build a context.
    pub async fn load(
        source: Box<dyn PaperSource>,
        store: InterestStore,
        settings: BotSettings,
    ) -> Result<Self, StoreError> {
        let interests = store.load().await?;
        Ok(Self::new(source, store, interests, settings))
    }

    /// Wrap into a [`SharedContext`].
    #[must_use]
    pub fn shared(self) -> SharedContext {
        Arc::new(tokio::sync::Mutex::new(self))
    }

    /// Current interest list.
    #[must_use]
    pub const fn interests(&self) -> &InterestSet {
        &self.interests
    }

    /// Result of the last cycle, if one ran.
    #[must_use]
    pub const fn latest(&self) -> Option<&DailyResult> {
        self.latest.as_ref()
    }

    /// Chat settings in effect.
    #[must_use]
    pub const fn settings(&self) -> &BotSettings {
        &self.settings
    }

    /// Run a fetch cycle for `today`, keep its result and return the notification.
    pub async fn fetch(&mut self, today: NaiveDate) -> Vec<String> {
        let result = run_cycle(
            self.source.as_ref(),
            &self.interests,
            today,
            self.settings.max_results,
            self.settings.fetch_timeout,
        )
        .await;

        let messages = notification(&result);
        self.latest = Some(result);
        messages
    }

    /// Execute a command and return the replies to post.
    ///
    /// Interest changes are saved before returning; when the save fails the
    /// change is undone and [`CommandError::Persistence`] is returned.
    pub async fn handle(&mut self, command: Command, today: NaiveDate) -> CommandResult<Vec<String>> {
        tracing::debug!(?command, "Handling command");

        match command {
            Command::Fetch => Ok(self.fetch(today).await),
            Command::Abstract(n) => {
                let available = self.latest.as_ref().map_or(0, |r| r.interesting.len());
                let paper = self
                    .latest
                    .as_ref()
                    .and_then(|r| r.paper(n))
                    .ok_or(CommandError::PaperOutOfRange { index: n, available })?;
                Ok(vec![abstract_message(paper)])
            }
            Command::Query => Ok(vec![interests_message(&self.interests)]),
            Command::AddQueries { category, values } => {
                let inserted = self.update_interests(|set| set.add(category, values)).await?;
                let reply = if inserted.is_empty() {
                    format!("Nothing new to add to {category}")
                } else {
                    format!("Added to {category}: {}", inserted.join(", "))
                };
                Ok(vec![reply, interests_message(&self.interests)])
            }
            Command::RemoveQueries(values) => {
                let removed = self.update_interests(|set| set.remove(values.as_slice())).await?;
                Ok(vec![
                    format!("Removed {removed} queries"),
                    interests_message(&self.interests),
                ])
            }
            Command::ClearQuery => {
                self.update_interests(InterestSet::clear).await?;
                Ok(vec!["All queries removed".to_string(), interests_message(&self.interests)])
            }
            Command::MaxResults(n) => {
                self.settings.max_results = n;
                tracing::info!(max_results = n, "Max results changed");
                Ok(vec![format!("Max results set to {n}")])
            }
            Command::Help => Ok(vec![help_message(&self.settings.command_prefix)]),
        }
    }

    async fn update_interests<T>(
        &mut self,
        change: impl FnOnce(&mut InterestSet) -> T,
    ) -> CommandResult<T> {
        let snapshot = self.interests.clone();
        let out = change(&mut self.interests);

        if let Err(e) = self.store.save(&self.interests).await {
            tracing::warn!(error = %e, path = %self.store.path().display(), "Saving interests failed, rolling back");
            self.interests = snapshot;
            return Err(e.into());
        }

        tracing::info!(interests = %self.interests, "Interests updated");
        Ok(out)
    }
}

impl std::fmt::Debug for BotContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotContext")
            .field("source", &self.source.name())
            .field("store", &self.store)
            .field("interests", &self.interests)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

/// Summary line followed by the listing when anything matched.
#[must_use]
pub fn notification(result: &DailyResult) -> Vec<String> {
    let mut messages = vec![summary_message(result)];
    let listing = listing_message(result);
    if !listing.is_empty() {
        messages.push(listing);
    }
    messages
}
