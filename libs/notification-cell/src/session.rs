use std::fmt::Display;

use axum::extract::ws::Message;
use futures::{Sink, SinkExt, Stream, StreamExt};
use tracing::{debug, info};

use shared_realtime::ConnectionRegistry;

/// Drives one live connection for `user_id`.
///
/// Pushed frames from the registry are written to `sink` as text. Anything the client
/// sends is read and dropped. When the client closes or the read side errors, the
/// connection is unregistered and the writer stops.
pub async fn serve_connection<W, R, E>(
    mut sink: W,
    mut stream: R,
    registry: ConnectionRegistry,
    user_id: String,
) where
    W: Sink<Message> + Unpin + Send + 'static,
    R: Stream<Item = Result<Message, E>> + Unpin,
    E: Display,
{
    let (connection_id, mut receiver) = registry.register(&user_id).await;
    info!("User {} connected as {}", user_id, connection_id);

    let writer = tokio::spawn(async move {
        while let Some(frame) = receiver.recv().await {
            if sink.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                debug!("Read error on connection {}: {}", connection_id, e);
                break;
            }
        }
    }

    registry.unregister(connection_id, &user_id).await;
    writer.abort();
    info!("User {} disconnected from {}", user_id, connection_id);
}
