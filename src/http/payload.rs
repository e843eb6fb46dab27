use chrono::Local;
use serde::Serialize;

/// JSON body of every request.
#[derive(Debug, Clone, Serialize)]
pub struct RequestPayload {
    pub name: String,
    pub date: String,
    pub requests_sent: usize,
}

impl RequestPayload {
    #[must_use]
    pub fn new(index: usize) -> Self {
        Self {
            name: format!("request #{}", index),
            date: Local::now().to_rfc3339(),
            requests_sent: index,
        }
    }
}
