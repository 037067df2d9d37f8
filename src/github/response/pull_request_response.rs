use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct PullRequestResponse {
    pub number: u64,
    pub head: Option<BranchRef>,
    pub base: Option<BranchRef>,
}

#[derive(Debug, Deserialize)]
pub struct BranchRef {
    #[serde(rename = "ref")]
    pub name: String,
}
