use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tokio::time::sleep;

use super::client::{CategoryFetcher, ClientConfig};
use super::envelope::Envelope;
use super::http_client::create_client;
use super::types::{FetchOutcome, FetchReport, ResultRecord, SearchRequest};
use super::Category;
use crate::error::Result;

/// Longest slice of an unparseable body written to the debug log
const RAW_BODY_LOG_LIMIT: usize = 500;

/// KOSHA smart-search API client
pub struct KoshaClient {
    config: ClientConfig,
    http_client: Client,
}

impl KoshaClient {
    /// Create a new client; the credential is taken from `config` only
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http_client = create_client(config.timeout, &config.user_agent)?;

        Ok(Self {
            config,
            http_client,
        })
    }

    fn build_request(&self, keyword: &str, category: Category) -> SearchRequest {
        let request = SearchRequest::new(keyword, category, self.config.page_size);
        match &self.config.proxy {
            Some(proxy) => request.with_max_page(proxy.max_page),
            None => request,
        }
    }

    fn query_params(&self, service_key: &str, request: &SearchRequest) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("serviceKey", service_key.to_string()),
            ("searchValue", request.keyword().to_string()),
            ("category", request.category().code().to_string()),
            ("numOfRows", request.page_size().to_string()),
            ("pageNo", request.page_no().to_string()),
        ];

        if let Some(proxy) = &self.config.proxy {
            if let Some(max_page) = request.max_page() {
                params.push(("maxPage", max_page.to_string()));
            }
            params.push(("lightMode", proxy.light_mode.to_string()));
            params.push(("dedup", proxy.dedup.to_string()));
            params.push(("onError", proxy.on_error.clone()));
        }

        params
    }

    /// Issue one request and classify whatever comes back
    async fn attempt(&self, service_key: &str, request: &SearchRequest) -> FetchOutcome {
        let params = self.query_params(service_key, request);
        let url = match reqwest::Url::parse_with_params(&self.config.endpoint, &params) {
            Ok(url) => url,
            Err(e) => {
                return FetchOutcome::TransportError(format!(
                    "invalid endpoint '{}': {}",
                    self.config.endpoint, e
                ))
            }
        };

        debug!(
            "GET {} (category={}, numOfRows={})",
            self.config.endpoint,
            request.category().code(),
            request.page_size()
        );

        let response = match self.http_client.get(url).send().await {
            Ok(response) => response,
            Err(e) => return FetchOutcome::TransportError(e.to_string()),
        };

        let status = response.status();
        debug!("API response status: {}", status);

        if status == StatusCode::PAYLOAD_TOO_LARGE {
            return FetchOutcome::OversizedResponse;
        }
        if !status.is_success() {
            return FetchOutcome::HttpStatus(status.as_u16());
        }

        match response.text().await {
            Ok(body) => classify_body(&body),
            Err(e) => FetchOutcome::TransportError(e.to_string()),
        }
    }

    /// Run the bounded retry loop and report how it ended
    pub async fn fetch_report(&self, keyword: &str, category: Category) -> FetchReport {
        let mut request = self.build_request(keyword, category);

        let Some(service_key) = self.config.credential() else {
            return FetchReport {
                outcome: FetchOutcome::MissingCredential,
                attempts: 0,
                page_size: request.page_size(),
            };
        };

        let max_attempts = self.config.max_attempts.max(1);
        let backoff = Duration::from_millis(self.config.retry_backoff_ms);

        for attempt in 1..=max_attempts {
            let outcome = self.attempt(service_key, &request).await;

            if !outcome.is_retryable() {
                return FetchReport {
                    outcome,
                    attempts: attempt,
                    page_size: request.page_size(),
                };
            }

            if attempt == max_attempts {
                break;
            }

            let previous = request.page_size();
            if !request.shrink() {
                warn!(
                    "{}: response too large even at numOfRows={}",
                    category, previous
                );
                return FetchReport {
                    outcome,
                    attempts: attempt,
                    page_size: previous,
                };
            }

            info!(
                "{}: response too large, retrying with numOfRows={} ({}/{})",
                category,
                request.page_size(),
                attempt + 1,
                max_attempts
            );
            sleep(backoff).await;
        }

        FetchReport {
            outcome: FetchOutcome::OversizedResponse,
            attempts: max_attempts,
            page_size: request.page_size(),
        }
    }
}

/// Classify a successfully transported response body
pub(crate) fn classify_body(body: &str) -> FetchOutcome {
    match Envelope::parse(body) {
        Ok(Envelope::ServiceError { code, message })
        | Ok(Envelope::DomainError { code, message }) => FetchOutcome::ApiError { code, message },
        Ok(Envelope::DomainSuccess { items, total_count }) => {
            debug!(
                "received {} items (totalCount={:?})",
                items.len(),
                total_count
            );
            if items.is_empty() {
                FetchOutcome::EmptyResult
            } else {
                FetchOutcome::Success(items)
            }
        }
        Err(e) => {
            debug!(
                "unparseable response body: {}",
                body.chars().take(RAW_BODY_LOG_LIMIT).collect::<String>()
            );
            FetchOutcome::Malformed(e.to_string())
        }
    }
}

#[async_trait]
impl CategoryFetcher for KoshaClient {
    async fn fetch(&self, keyword: &str, category: Category) -> Vec<ResultRecord> {
        let report = self.fetch_report(keyword, category).await;

        match &report.outcome {
            FetchOutcome::Success(records) => {
                info!("{}: {}건 검색됨", category, records.len())
            }
            FetchOutcome::EmptyResult => info!("{}: 검색 결과 없음", category),
            FetchOutcome::ApiError { code, message } => {
                warn!("{}: API 오류 ({}): {}", category, code, message)
            }
            FetchOutcome::TransportError(cause) => {
                warn!("{}: 네트워크 오류: {}", category, cause)
            }
            FetchOutcome::OversizedResponse => warn!(
                "{}: 응답 용량 초과 (시도 {}회, numOfRows={})",
                category, report.attempts, report.page_size
            ),
            FetchOutcome::HttpStatus(status) => {
                warn!("{}: HTTP 상태 코드 {}", category, status)
            }
            FetchOutcome::Malformed(detail) => {
                warn!("{}: 응답을 해석할 수 없음: {}", category, detail)
            }
            FetchOutcome::MissingCredential => {
                warn!("{}: 서비스 키가 설정되지 않아 요청을 보내지 않음", category)
            }
        }

        report.outcome.into_records()
    }
}
