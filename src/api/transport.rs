use std::future::Future;

use gloo_net::http::Request;
use url::Url;

use crate::error::ApiError;

/// Issues a GET and hands back the raw body of a successful response.
pub trait Transport {
	fn get_text(&self, url: Url) -> impl Future<Output = Result<String, ApiError>>;
}

/// `fetch`-backed transport used in the browser.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserTransport;

impl Transport for BrowserTransport {
	async fn get_text(&self, url: Url) -> Result<String, ApiError> {
		let response = Request::get(url.as_str()).send().await?;
		if !response.ok() {
			return Err(ApiError::Status {
				status: response.status(),
				url: url.to_string(),
			});
		}
		Ok(response.text().await?)
	}
}
