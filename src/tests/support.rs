use std::sync::{ Arc, Mutex };
use async_trait::async_trait;
use log::{ debug, info };
use tokio::io::{ AsyncReadExt, AsyncWriteExt };
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::config::ValidatorConfig;
use crate::errors::{ ValidatorError, ValidatorResult };
use crate::implementations::presumption_validator::PresumptionValidator;
use crate::models::claim::EvidenceItem;
use crate::traits::evidence_retriever::EvidenceRetriever;
use crate::traits::language_model::LanguageModel;

type Handler = Box<dyn Fn(&str) -> ValidatorResult<String> + Send + Sync>;

// Initialize logging once per test binary
pub fn setup() {
    if env_logger::builder().is_test(true).try_init().is_ok() {
        info!("Logger initialized");
    }
}

/// Language model whose answers come from a closure; every call is recorded
pub struct FakeModel {
    handler: Handler,
    pub calls: Mutex<Vec<(String, usize)>>,
}

impl FakeModel {
    pub fn new(handler: impl Fn(&str) -> ValidatorResult<String> + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self { handler: Box::new(handler), calls: Mutex::new(Vec::new()) })
    }

    /// Always answers with the same text
    pub fn answering(text: &str) -> Arc<Self> {
        let text = text.to_string();
        Self::new(move |_| Ok(text.clone()))
    }

    /// Answers each pipeline stage with canned text, recognising the stage from its instruction
    pub fn pipeline(extraction: &str) -> Arc<Self> {
        let extraction = extraction.to_string();
        Self::new(move |prompt| Ok(stage_answer(prompt, &extraction)))
    }

    pub fn prompts(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(p, _)| p.clone()).collect()
    }

    pub fn max_tokens(&self) -> Vec<usize> {
        self.calls.lock().unwrap().iter().map(|(_, m)| *m).collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

pub fn stage_answer(prompt: &str, extraction: &str) -> String {
    if is_extraction(prompt) {
        extraction.to_string()
    } else if is_adjudication(prompt) {
        "The presumption is not accurate. Many advanced cases are treated.".to_string()
    } else if is_consolidation(prompt) {
        "Inaccurate presumption: advanced stage does not mean no treatment.".to_string()
    } else {
        "1".to_string()
    }
}

pub fn is_extraction(prompt: &str) -> bool {
    prompt.starts_with("Analyze the following user prompt")
}

pub fn is_adjudication(prompt: &str) -> bool {
    prompt.starts_with("Please fact-check")
}

pub fn is_consolidation(prompt: &str) -> bool {
    prompt.starts_with("Create a concise version")
}

pub fn model_failure() -> ValidatorError {
    ValidatorError::ExternalServiceError {
        service: "HTTP".to_string(),
        message: "Status 529: overloaded".to_string(),
    }
}

#[async_trait]
impl LanguageModel for FakeModel {
    fn model_id(&self) -> &str {
        "fake-model"
    }

    async fn complete(&self, prompt: &str, max_tokens: usize) -> ValidatorResult<String> {
        self.calls.lock().unwrap().push((prompt.to_string(), max_tokens));
        (self.handler)(prompt)
    }
}

/// Retriever returning a fixed list, truncated to the requested limit
pub struct FakeRetriever {
    pub results: Vec<EvidenceItem>,
    pub queries: Mutex<Vec<(String, usize)>>,
}

impl FakeRetriever {
    pub fn with_results(count: usize) -> Arc<Self> {
        Arc::new(Self { results: evidence(count), queries: Mutex::new(Vec::new()) })
    }

    pub fn queries(&self) -> Vec<(String, usize)> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl EvidenceRetriever for FakeRetriever {
    async fn search(&self, query: &str, limit: usize) -> Vec<EvidenceItem> {
        self.queries.lock().unwrap().push((query.to_string(), limit));
        self.results.iter().take(limit).cloned().collect()
    }
}

pub fn evidence(count: usize) -> Vec<EvidenceItem> {
    (1..=count)
        .map(|i| EvidenceItem {
            title: format!("Source {}", i),
            url: format!("https://example.org/article-{}", i),
            snippet: format!("Snippet {} about lymphoma treatment.", i),
        })
        .collect()
}

pub fn validator(
    model: Arc<FakeModel>,
    retriever: Option<Arc<FakeRetriever>>
) -> PresumptionValidator {
    let retriever = retriever.map(|r| r as Arc<dyn EvidenceRetriever>);
    PresumptionValidator::new(&ValidatorConfig::default(), model, retriever).unwrap()
}

/// Raw HTTP request as seen by the stub server
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub head: String,
    pub body: String,
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n").map(|pos| pos + 4)
}

/// Serve exactly one HTTP response on a local port and hand back what was requested
pub async fn serve_once(status: &'static str, body: String) -> (String, JoinHandle<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];

        let header_end = loop {
            let n = socket.read(&mut chunk).await.unwrap();
            buf.extend_from_slice(&chunk[..n]);
            if let Some(end) = find_header_end(&buf) {
                break end;
            }
            if n == 0 {
                break buf.len();
            }
        };
        let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
        let content_length = head
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        while buf.len() < header_end + content_length {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }
        let request_body = String::from_utf8_lossy(&buf[header_end..]).to_string();
        debug!("Stub server received: {}", head);

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();

        CapturedRequest { head, body: request_body }
    });

    (format!("http://{}", addr), handle)
}
