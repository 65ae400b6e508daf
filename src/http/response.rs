//! Buffered axum response exposed as a [`ResponseChannel`].

use axum::{
    body::Body,
    http::{
        header::{CONTENT_LENGTH, CONTENT_TYPE},
        HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
};

use crate::guard::ResponseChannel;

/// Message attached by [`ResponseChannel::set_status_with_message`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage(pub String);

/// A response produced downstream that has not been sent yet.
///
/// `send_error*` replace the body and commit the response; a committed
/// response can no longer be turned into a redirect.
pub struct PendingResponse {
    response: Response,
    committed: bool,
}

impl PendingResponse {
    pub fn new(response: Response) -> Self {
        Self {
            response,
            committed: false,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.response.status()
    }

    fn replace_body(&mut self, body: Body, content_type: Option<&'static str>) {
        *self.response.body_mut() = body;
        let headers = self.response.headers_mut();
        headers.remove(CONTENT_LENGTH);
        match content_type {
            Some(value) => {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static(value));
            }
            None => {
                headers.remove(CONTENT_TYPE);
            }
        }
        self.committed = true;
    }
}

impl ResponseChannel for PendingResponse {
    fn set_status(&mut self, status: StatusCode) {
        *self.response.status_mut() = status;
    }

    fn set_status_with_message(&mut self, status: StatusCode, message: &str) {
        *self.response.status_mut() = status;
        self.response
            .extensions_mut()
            .insert(StatusMessage(message.to_string()));
    }

    fn send_error(&mut self, status: StatusCode) {
        *self.response.status_mut() = status;
        self.replace_body(Body::empty(), None);
    }

    fn send_error_with_message(&mut self, status: StatusCode, message: &str) {
        *self.response.status_mut() = status;
        self.replace_body(
            Body::from(message.to_string()),
            Some("text/plain; charset=utf-8"),
        );
    }

    fn is_committed(&self) -> bool {
        self.committed
    }
}

impl IntoResponse for PendingResponse {
    fn into_response(self) -> Response {
        self.response
    }
}
