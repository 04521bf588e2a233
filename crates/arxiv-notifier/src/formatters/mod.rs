//! Output formatting for the chat channel.

mod message;
mod split;

pub use message::{
    abstract_message, help_message, interests_message, listing_message, summary_message,
};
pub use split::split_message;
