//! HTTP gateway to the catalog API.
//!
//! Every data fetch goes through one [`HubClient`]: it prefixes the API base,
//! adds the default headers, aborts requests that outlive the configured
//! timeout and retries transient failures according to a [`RetryPolicy`].

use std::cell::Cell;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use gloo_net::http::{Request, RequestBuilder};
use gloo_timers::callback::Timeout;
use gloo_timers::future::TimeoutFuture;
use imagehub::{ApiError, ApiResult, HubConfig, Method, RetryPolicy};
use serde::de::DeserializeOwned;
use web_sys::{AbortController, AbortSignal, File, FormData};

/// One part of a multipart body.
pub enum Part<'a> {
    /// A file, sent with its own name
    File(&'a str, &'a File),
    Text(&'a str, &'a str),
}

/// Configured API client. Cheap to clone.
#[derive(Clone, Debug)]
pub struct HubClient {
    config: Rc<HubConfig>,
}

impl HubClient {
    pub fn new(config: HubConfig) -> Self {
        Self {
            config: Rc::new(config),
        }
    }

    pub fn config(&self) -> &HubConfig {
        &self.config
    }

    /// `GET` a JSON document, retrying per the configured read policy.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&'static str, String)],
    ) -> ApiResult<T> {
        log::debug!("GET {} {:?}", url, params);
        retrying(self.config.retry, move || {
            self.send_json(move |signal| {
                self.builder(Method::Get, url, params)
                    .abort_signal(Some(signal))
                    .build()
                    .map_err(|e| ApiError::Request(e.to_string()))
            })
        })
        .await
    }

    /// `POST` a multipart form and decode the JSON answer.
    ///
    /// The form is rebuilt for every attempt.
    pub async fn post_multipart_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&'static str, String)],
        parts: &[Part<'_>],
        retry: RetryPolicy,
    ) -> ApiResult<T> {
        log::debug!("POST {} {:?} ({} parts)", url, params, parts.len());
        retrying(retry, move || {
            self.send_json(move |signal| {
                let form = form_data(parts)?;
                self.builder(Method::PostMultipart, url, params)
                    .abort_signal(Some(signal))
                    .body(form)
                    .map_err(|e| ApiError::Request(e.to_string()))
            })
        })
        .await
    }

    fn builder(&self, method: Method, url: &str, params: &[(&'static str, String)]) -> RequestBuilder {
        let builder = match method {
            Method::Get => Request::get(url),
            Method::PostMultipart => Request::post(url),
        };
        let (headers, query) = request_pairs(&self.config, params);
        let builder = headers
            .into_iter()
            .fold(builder, |builder, (name, value)| builder.header(name, value));

        if query.is_empty() {
            builder
        } else {
            builder.query(query)
        }
    }

    /// One attempt: send, enforce the deadline, map the status, decode.
    async fn send_json<T: DeserializeOwned>(
        &self,
        make: impl FnOnce(&AbortSignal) -> ApiResult<Request>,
    ) -> ApiResult<T> {
        let controller = AbortController::new()
            .map_err(|e| ApiError::Request(format!("AbortController unavailable: {:?}", e)))?;
        let request = make(&controller.signal())?;

        let timed_out = Rc::new(Cell::new(false));
        // Dropping the timeout cancels it, so it must live until the body is read.
        let _deadline = {
            let timed_out = timed_out.clone();
            Timeout::new(millis(self.config.request_timeout), move || {
                timed_out.set(true);
                controller.abort();
            })
        };

        let response = request
            .send()
            .await
            .map_err(|e| transport_error(&timed_out, e))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| transport_error(&timed_out, e))?;

        if !response.ok() {
            return Err(ApiError::from_response(status, &body));
        }
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Run `attempt` until it succeeds, fails permanently or the policy is spent.
async fn retrying<T, F, Fut>(policy: RetryPolicy, mut attempt: F) -> ApiResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ApiResult<T>>,
{
    let mut retries = 0;
    loop {
        match attempt().await {
            Err(err) if policy.should_retry(retries, &err) => {
                retries += 1;
                let delay = policy.delay_for(retries);
                log::warn!("{} - retrying in {} ms", err, delay.as_millis());
                TimeoutFuture::new(millis(delay)).await;
            }
            result => return result,
        }
    }
}

/// Headers and query pairs of one request, in the order they are added.
fn request_pairs<'a>(
    config: &'a HubConfig,
    params: &'a [(&'static str, String)],
) -> (Vec<(&'a str, &'a str)>, Vec<(&'a str, &'a str)>) {
    let headers = config
        .default_headers
        .iter()
        .map(|(name, value)| (name.as_str(), value.as_str()))
        .collect();
    let query = params.iter().map(|(name, value)| (*name, value.as_str())).collect();
    (headers, query)
}

fn form_data(parts: &[Part<'_>]) -> ApiResult<FormData> {
    let form = FormData::new().map_err(|e| ApiError::Request(format!("Failed to create FormData: {:?}", e)))?;
    for part in parts {
        let appended = match part {
            Part::File(name, file) => form.append_with_blob_and_filename(name, file, &file.name()),
            Part::Text(name, value) => form.append_with_str(name, value),
        };
        appended.map_err(|e| ApiError::Request(format!("Failed to append form part: {:?}", e)))?;
    }
    Ok(form)
}

fn transport_error(timed_out: &Cell<bool>, error: gloo_net::Error) -> ApiError {
    if timed_out.get() {
        ApiError::Timeout
    } else {
        ApiError::Network(error.to_string())
    }
}

/// Browser timers take `u32` milliseconds.
pub(crate) fn millis(duration: Duration) -> u32 {
    u32::try_from(duration.as_millis()).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_millis_saturates() {
        assert_eq!(millis(Duration::from_secs(30)), 30_000);
        assert_eq!(millis(Duration::from_secs(u64::MAX)), u32::MAX);
    }

    #[test]
    fn test_request_pairs() {
        let mut config = HubConfig::new("/api");
        config.default_headers.push(("X-Client".into(), "imagehub".into()));
        let params = vec![("query", "cats".to_string()), ("page", "2".to_string())];

        let (headers, query) = request_pairs(&config, &params);
        assert_eq!(headers, vec![("Accept", "application/json"), ("X-Client", "imagehub")]);
        assert_eq!(query, vec![("query", "cats"), ("page", "2")]);

        let (_, query) = request_pairs(&config, &[]);
        assert!(query.is_empty());
    }

    #[test]
    fn test_abort_after_deadline_is_a_timeout() {
        let flag = Cell::new(false);
        let err = transport_error(&flag, gloo_net::Error::GlooError("aborted".into()));
        assert!(matches!(err, ApiError::Network(_)));

        flag.set(true);
        let err = transport_error(&flag, gloo_net::Error::GlooError("aborted".into()));
        assert_eq!(err, ApiError::Timeout);
        assert!(err.is_transient());
    }
}
