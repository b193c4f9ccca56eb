use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct JoinRequest {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddUserRequest {
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatedQueue {
    pub queue_id: String,
    pub queue_url: String,
}

#[derive(Debug, Serialize)]
pub struct JoinedQueue {
    pub name: String,
    pub position: usize,
}

#[derive(Debug, Serialize)]
pub struct QueueUsers {
    pub users: Vec<String>,
}
