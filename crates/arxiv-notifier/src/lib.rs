//! arXiv Notifier
//!
//! Posts newly published arXiv papers matching a configured interest list to
//! a chat channel, once a day.
//!
//! # Features
//!
//! - **Two sources**: the daily arXiv digest mail or the arXiv search API
//! - **Interest matching**: authors by initial and surname, keywords by substring
//! - **Chat commands**: inspect and edit the persisted interest list
//! - **Daily trigger**: fixed local time, no notifications at the weekend
//!
//! # Example
//!
//! ```no_run
//! use arxiv_notifier::{config::Config, fetch::run_cycle, scheduler::local_today};
//! use arxiv_notifier::sources::{ArxivClient, ArxivSearchSource};
//! use arxiv_notifier::store::InterestStore;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let source = ArxivSearchSource::new(ArxivClient::new(&config)?);
//!     let interests = InterestStore::new(&config.interests_file).load().await?;
//!
//!     let result = run_cycle(
//!         &source,
//!         &interests,
//!         local_today(),
//!         config.max_results,
//!         config.fetch_timeout,
//!     )
//!     .await;
//!     println!("{} interesting papers", result.interesting.len());
//!     Ok(())
//! }
//! ```

pub mod bot;
pub mod config;
pub mod digest;
pub mod error;
pub mod fetch;
pub mod formatters;
mod http;
pub mod matcher;
pub mod models;
pub mod scheduler;
pub mod sources;
pub mod store;

pub use bot::{BotContext, SharedContext};
pub use config::Config;
pub use error::{ChannelError, ClientError, CommandError, SourceError, StoreError};
pub use models::{DailyResult, InterestSet, Paper};
