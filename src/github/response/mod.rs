mod pull_request_response;

pub use pull_request_response::PullRequestResponse;
