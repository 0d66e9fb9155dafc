//! HTTP + WebSocket client for `todo-server`.

use super::{RemoteBackend, TodoStream};
use crate::config::ConfigError;
use crate::error::{Error, Result};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, Response, Url};
use todo_engine::{
    AddTodoArgs, AddTodoResponse, ClearAllResponse, ErrorResponse, ServerMessage, Todo, TodoId,
    UpdateTodoArgs,
};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, trace, warn};

/// Remote backend talking to a todo server over HTTP, with the live query on
/// a WebSocket.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base: Url,
    client: Client,
}

impl HttpBackend {
    /// Create a backend for the server at `base_url`
    /// (e.g. `http://localhost:3000`).
    pub fn new(base_url: &str) -> Result<Self> {
        let base =
            Url::parse(base_url).map_err(|e| ConfigError::InvalidRemoteUrl(e.to_string()))?;
        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidRemoteUrl(base_url.to_string()).into());
        }

        Ok(Self {
            base,
            client: Client::new(),
        })
    }

    /// URL of `segments` below the base URL. Segments are percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// URL of the live query socket.
    pub fn live_url(&self) -> Result<Url> {
        let mut url = self.endpoint(&["todos", "live"]);
        let scheme = if url.scheme() == "https" { "wss" } else { "ws" };
        url.set_scheme(scheme)
            .map_err(|_| Error::Transport(format!("cannot derive socket URL from {url}")))?;
        Ok(url)
    }
}

/// Turn a non-success response into [`Error::Remote`].
async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = match response.json::<ErrorResponse>().await {
        Ok(body) => body.error,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    };
    Err(Error::Remote {
        status: status.as_u16(),
        message,
    })
}

/// Decode one live query frame. `None` means the frame carries no collection.
fn decode_frame(message: Message) -> Option<Result<Vec<Todo>>> {
    match message {
        Message::Text(text) => match serde_json::from_str::<ServerMessage>(text.as_str()) {
            Ok(ServerMessage::Todos { todos }) => Some(Ok(todos)),
            Ok(ServerMessage::Pong) => None,
            Ok(ServerMessage::Error { message }) => Some(Err(Error::LiveQuery(message))),
            Err(e) => {
                warn!(error = %e, "Ignoring malformed live query message");
                None
            }
        },
        Message::Close(frame) => {
            debug!(?frame, "Live query closed by server");
            None
        }
        other => {
            trace!(?other, "Ignoring live query frame");
            None
        }
    }
}

#[async_trait]
impl RemoteBackend for HttpBackend {
    async fn get_todos(&self) -> Result<Vec<Todo>> {
        let response = self.client.get(self.endpoint(&["todos"])).send().await?;
        Ok(check(response).await?.json().await?)
    }

    async fn add_todo(&self, text: &str) -> Result<TodoId> {
        let args = AddTodoArgs {
            text: text.to_string(),
        };
        let response = self
            .client
            .post(self.endpoint(&["todos"]))
            .json(&args)
            .send()
            .await?;
        let created: AddTodoResponse = check(response).await?.json().await?;
        Ok(created.id)
    }

    async fn toggle_todo(&self, id: &str) -> Result<()> {
        let response = self
            .client
            .post(self.endpoint(&["todos", id, "toggle"]))
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    async fn delete_todo(&self, id: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.endpoint(&["todos", id]))
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    async fn update_todo(&self, id: &str, text: &str) -> Result<()> {
        let args = UpdateTodoArgs {
            text: text.to_string(),
        };
        let response = self
            .client
            .patch(self.endpoint(&["todos", id]))
            .json(&args)
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    async fn clear_all_todos(&self) -> Result<ClearAllResponse> {
        let response = self
            .client
            .delete(self.endpoint(&["todos"]))
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    async fn watch_todos(&self) -> Result<TodoStream> {
        let url = self.live_url()?;
        let (socket, _response) = connect_async(url.as_str()).await?;
        debug!(url = %url, "Live query connected");

        let stream = socket.filter_map(|frame| async move {
            match frame {
                Ok(message) => decode_frame(message),
                Err(e) => Some(Err(Error::from(e))),
            }
        });
        Ok(stream.boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_encoded() {
        let backend = HttpBackend::new("http://localhost:3000").unwrap();
        assert_eq!(
            backend.endpoint(&["todos", "a b/c", "toggle"]).as_str(),
            "http://localhost:3000/todos/a%20b%2Fc/toggle"
        );

        let backend = HttpBackend::new("http://example.com/api/").unwrap();
        assert_eq!(
            backend.endpoint(&["todos"]).as_str(),
            "http://example.com/api/todos"
        );
    }

    #[test]
    fn live_url_switches_scheme() {
        let backend = HttpBackend::new("http://localhost:3000").unwrap();
        assert_eq!(
            backend.live_url().unwrap().as_str(),
            "ws://localhost:3000/todos/live"
        );

        let backend = HttpBackend::new("https://todos.example.com").unwrap();
        assert_eq!(
            backend.live_url().unwrap().as_str(),
            "wss://todos.example.com/todos/live"
        );
    }

    #[test]
    fn rejects_invalid_urls() {
        for url in ["not a url", "mailto:someone@example.com", "ftp://example.com"] {
            let result = HttpBackend::new(url);
            assert!(
                matches!(result, Err(Error::Config(ConfigError::InvalidRemoteUrl(_)))),
                "{url}"
            );
        }
    }

    #[test]
    fn decode_frames() {
        let frame = Message::text(
            r#"{"type":"todos","todos":[{"_id":"a","text":"Buy milk","isCompleted":false,"_creationTime":1}]}"#,
        );
        let todos = decode_frame(frame).unwrap().unwrap();
        assert_eq!(todos, vec![Todo::new("a", "Buy milk", 1)]);

        assert!(decode_frame(Message::text(r#"{"type":"pong"}"#)).is_none());
        assert!(decode_frame(Message::text("garbage")).is_none());
        assert!(decode_frame(Message::Close(None)).is_none());

        let error = decode_frame(Message::text(r#"{"type":"error","message":"boom"}"#)).unwrap();
        assert!(matches!(error, Err(Error::LiveQuery(m)) if m == "boom"));
    }
}
