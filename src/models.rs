use serde::{Deserialize, Serialize};

/// Envelope body for acknowledgements and error responses
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusMessage {
    pub message: String,
}

impl StatusMessage {
    /// The acknowledgement body for successful updates and deletes
    pub fn success() -> Self {
        StatusMessage {
            message: "success".to_string(),
        }
    }
}
