use http::StatusCode;
use reqwest::Response;

/// Statuses counted as a successful attempt.
pub const ACCEPTED_STATUSES: [StatusCode; 4] = [
    StatusCode::OK,
    StatusCode::CREATED,
    StatusCode::ACCEPTED,
    StatusCode::NO_CONTENT,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Success,
    Failure,
}

#[must_use]
pub fn classify_status(status: StatusCode) -> Classification {
    if ACCEPTED_STATUSES.contains(&status) {
        Classification::Success
    } else {
        Classification::Failure
    }
}

/// What one attempt produced. A response is kept whatever its status; an
/// error only when no response was obtained.
#[derive(Debug)]
pub enum OutcomePayload {
    Response(Response),
    Transport(reqwest::Error),
}

#[derive(Debug)]
pub struct RequestOutcome {
    pub burst: u64,
    pub index: usize,
    pub payload: OutcomePayload,
}

impl RequestOutcome {
    #[must_use]
    pub fn from_attempt(
        burst: u64,
        index: usize,
        attempt: Result<Response, reqwest::Error>,
    ) -> Self {
        let payload = match attempt {
            Ok(response) => OutcomePayload::Response(response),
            Err(err) => OutcomePayload::Transport(err),
        };
        Self {
            burst,
            index,
            payload,
        }
    }

    #[must_use]
    pub fn classification(&self) -> Classification {
        match &self.payload {
            OutcomePayload::Response(response) => classify_status(response.status()),
            OutcomePayload::Transport(_) => Classification::Failure,
        }
    }

    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        self.response().map(Response::status)
    }

    #[must_use]
    pub const fn response(&self) -> Option<&Response> {
        match &self.payload {
            OutcomePayload::Response(response) => Some(response),
            OutcomePayload::Transport(_) => None,
        }
    }

    #[must_use]
    pub const fn error(&self) -> Option<&reqwest::Error> {
        match &self.payload {
            OutcomePayload::Response(_) => None,
            OutcomePayload::Transport(err) => Some(err),
        }
    }
}
