use futures::future::LocalBoxFuture;
use shared::{EndpointConfig, ExecutionClient, RunRequest, RunResponse, TransportError};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

use crate::browser::{describe_js_error, window};

/// Posts run requests with the browser's `fetch`.
pub struct FetchClient {
    url: String,
}

impl FetchClient {
    pub fn new(config: EndpointConfig) -> Self {
        Self { url: config.url }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl ExecutionClient for FetchClient {
    fn execute(
        &self,
        request: RunRequest,
    ) -> LocalBoxFuture<'static, Result<RunResponse, TransportError>> {
        let url = self.url.clone();
        Box::pin(async move { post_run_request(&url, &request).await })
    }
}

fn request_error(value: JsValue) -> TransportError {
    TransportError::Request(describe_js_error(&value))
}

fn body_error(value: JsValue) -> TransportError {
    TransportError::Body(describe_js_error(&value))
}

// Any status code counts as a response as long as the body decodes.
async fn post_run_request(url: &str, request: &RunRequest) -> Result<RunResponse, TransportError> {
    let body = request.to_json()?;

    let init = RequestInit::new();
    init.set_method("POST");
    init.set_body(&JsValue::from_str(&body));

    let fetch_request = Request::new_with_str_and_init(url, &init).map_err(request_error)?;
    fetch_request
        .headers()
        .set("Content-Type", "application/json")
        .map_err(request_error)?;

    let window = window().map_err(TransportError::Request)?;
    let response = JsFuture::from(window.fetch_with_request(&fetch_request))
        .await
        .map_err(request_error)?;
    let response: Response = response.dyn_into().map_err(body_error)?;

    let text = JsFuture::from(response.text().map_err(body_error)?)
        .await
        .map_err(body_error)?;
    let text = text
        .as_string()
        .ok_or_else(|| TransportError::Body("response body is not text".to_owned()))?;
    RunResponse::from_json(&text)
}
