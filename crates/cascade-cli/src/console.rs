//! Terminal rendering of command replies.

use async_trait::async_trait;
use cascade_core::{CascadeError, Result};
use cascade_gateway::{CommandReply, Responder};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

/// Writes replies to one sink and errors to another.
pub struct ConsoleResponder<O, E> {
    out: Mutex<O>,
    err: Mutex<E>,
}

impl ConsoleResponder<tokio::io::Stdout, tokio::io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(tokio::io::stdout(), tokio::io::stderr())
    }
}

impl<O, E> ConsoleResponder<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self {
            out: Mutex::new(out),
            err: Mutex::new(err),
        }
    }

    pub fn into_inner(self) -> (O, E) {
        (self.out.into_inner(), self.err.into_inner())
    }
}

/// Plain-text form of a reply, pages separated by a blank line.
pub fn render(reply: &CommandReply) -> String {
    match reply {
        CommandReply::Text { text } => format!("{text}\n"),
        CommandReply::Paged { title, pages } => {
            let mut rendered = String::new();
            for page in pages {
                if !rendered.is_empty() {
                    rendered.push('\n');
                }
                rendered.push_str(&format!("{title} (page {}/{})\n", page.number, page.total));
                for item in &page.items {
                    rendered.push_str(&format!("  {item}\n"));
                }
            }
            rendered
        }
    }
}

fn io_failed(error: std::io::Error) -> CascadeError {
    CascadeError::operation_failed(error)
}

#[async_trait]
impl<O, E> Responder for ConsoleResponder<O, E>
where
    O: AsyncWrite + Unpin + Send,
    E: AsyncWrite + Unpin + Send,
{
    async fn reply(&self, reply: CommandReply) -> Result<()> {
        let mut out = self.out.lock().await;
        out.write_all(render(&reply).as_bytes())
            .await
            .map_err(io_failed)?;
        out.flush().await.map_err(io_failed)
    }

    async fn error(&self, error: &CascadeError) -> Result<()> {
        let line = if error.is_user_error() {
            format!("{error}\n")
        } else {
            "Something went wrong while running that command\n".to_string()
        };
        let mut err = self.err.lock().await;
        err.write_all(line.as_bytes()).await.map_err(io_failed)?;
        err.flush().await.map_err(io_failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cascade_core::GuildId;
    use cascade_gateway::paginate;
    use std::num::NonZeroUsize;

    #[test]
    fn test_render_pages() {
        let lines = (1..=3).map(|i| format!("{i}. item"));
        let pages = paginate(lines, NonZeroUsize::new(2).unwrap());
        let reply = CommandReply::Paged {
            title: "chores".into(),
            pages,
        };

        assert_eq!(
            render(&reply),
            "chores (page 1/2)\n  1. item\n  2. item\n\nchores (page 2/2)\n  3. item\n"
        );
    }

    #[tokio::test]
    async fn test_internal_errors_are_not_echoed() {
        let console = ConsoleResponder::new(Vec::new(), Vec::new());
        console
            .error(&CascadeError::tenant_not_found(GuildId::new(9)))
            .await
            .unwrap();
        console
            .error(&CascadeError::config("secret path"))
            .await
            .unwrap();
        console.reply(CommandReply::text("ok")).await.unwrap();

        let (out, err) = console.into_inner();
        let err = String::from_utf8(err).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "ok\n");
        assert!(err.contains("9"));
        assert!(!err.contains("secret"));
    }
}
