use std::convert::Infallible;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::{Stream, StreamExt};
use serde::Deserialize;

use portal_app::Portal;
use portal_types::{Conversation, ConversationDetail};

use crate::error::{blocking, ApiResult};
use crate::extract::ApiJson;

#[derive(Debug, Default, Deserialize)]
pub struct NewConversation {
    #[serde(default)]
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewMessage {
    content: String,
}

pub async fn list(State(portal): State<Portal>) -> ApiResult<Json<Vec<Conversation>>> {
    Ok(Json(portal.chat.list()?))
}

pub async fn create(
    State(portal): State<Portal>,
    ApiJson(body): ApiJson<NewConversation>,
) -> ApiResult<(StatusCode, Json<Conversation>)> {
    let conversation = blocking(move || portal.chat.create(body.title.as_deref())).await?;
    Ok((StatusCode::CREATED, Json(conversation)))
}

pub async fn get(State(portal): State<Portal>, Path(id): Path<i64>) -> ApiResult<Json<ConversationDetail>> {
    Ok(Json(portal.chat.get(id)?))
}

pub async fn delete(State(portal): State<Portal>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    blocking(move || portal.chat.delete(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Stream the assistant reply as `data: {...}` events
pub async fn send_message(
    State(portal): State<Portal>,
    Path(id): Path<i64>,
    ApiJson(body): ApiJson<NewMessage>,
) -> ApiResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    let events = portal.chat.reply_events(id, &body.content)?;
    let stream = events.map(|event| Ok(Event::default().data(event.to_json())));
    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
