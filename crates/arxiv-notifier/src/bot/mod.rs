//! Chat surface: commands, shared state and outbound channels.
//!
//! Commands arrive as lines (`!fetch`, `!add_queries authors "Jane Doe"`)
//! and are answered through a [`Channel`].

mod channel;
mod command;
mod context;

pub use channel::{Channel, MemoryChannel, StdioChannel, WebhookChannel, send_all, send_split};
pub use command::{Command, tokenize};
pub use context::{BotContext, BotSettings, SharedContext, notification};

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::scheduler::local_today;

/// Read command lines until EOF, answering each through `channel`.
///
/// Lines without the command prefix are ignored. Rejected commands are
/// answered with their user message; delivery failures are logged and the
/// loop continues.
pub async fn run_command_loop<R>(
    mut reader: R,
    channel: &dyn Channel,
    ctx: SharedContext,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let (prefix, limit) = {
        let guard = ctx.lock().await;
        (guard.settings().command_prefix.clone(), guard.settings().message_limit)
    };
    let mut line = String::new();

    tracing::info!(prefix = %prefix, "Command loop ready");

    loop {
        line.clear();
        let bytes_read = reader.read_line(&mut line).await?;

        if bytes_read == 0 {
            tracing::info!("Input closed, stopping command loop");
            break;
        }

        let Some(parsed) = Command::parse(&line, &prefix) else {
            continue;
        };

        let replies = match parsed {
            Ok(command) => {
                let mut guard = ctx.lock().await;
                guard.handle(command, local_today()).await
            }
            Err(e) => Err(e),
        };

        let replies = replies.unwrap_or_else(|e| {
            tracing::debug!(error = %e, "Command rejected");
            vec![e.to_user_message()]
        });
        send_all(channel, &replies, limit).await;
    }

    Ok(())
}
