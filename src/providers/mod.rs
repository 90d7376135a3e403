use crate::fetch::FetchError;
use reqwest::blocking::Client;
use std::time::Duration;

pub mod markets;
pub mod news;
pub mod weather;

const USER_AGENT: &str = "codash dashboard";

/// Client shared by all providers: 30 second timeout so a hung upstream
/// cannot pin a widget in the loading state forever.
pub fn http_client() -> Result<Client, FetchError> {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .user_agent(USER_AGENT)
        .build()
        .map_err(|err| FetchError::Upstream(err.to_string()))
}

pub(crate) fn get_text(client: &Client, url: &str) -> Result<String, FetchError> {
    let resp = client
        .get(url)
        .send()
        .map_err(|err| FetchError::Upstream(err.to_string()))?;
    if !resp.status().is_success() {
        return Err(FetchError::Upstream(format!(
            "http status {}",
            resp.status()
        )));
    }
    resp.text()
        .map_err(|err| FetchError::Upstream(err.to_string()))
}
