mod pull_request_request;

pub use pull_request_request::{CreatePullRequestRequest, UpdatePullRequestRequest};
