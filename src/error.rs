use thiserror::Error;

#[derive(Debug, Error)]
pub enum KoshaError {
    #[error("🔑 API 키가 설정되지 않았습니다. 'kosha config set kosha.key YOUR_KEY' 또는 KOSHA_API_KEY 환경 변수를 설정하세요.")]
    NoApiKey,

    #[error("🌐 네트워크 오류: {0}")]
    Network(#[from] reqwest::Error),

    #[error("🌐 네트워크 오류: {0}")]
    Transport(String),

    #[error("📦 응답 용량 초과: 요청 크기를 줄여도 응답이 너무 큽니다")]
    OversizedResponse,

    #[error("⚠️ API 오류 ({code}): {message}")]
    ApiError {
        code: String,
        message: String,
        hint: Option<String>,
    },

    #[error("🚨 HTTP 오류: 상태 코드 {0}")]
    HttpStatus(u16),

    #[error("⚙️ 설정 오류: {0}")]
    Config(String),

    #[error("💾 파일 시스템 오류: {0}")]
    Io(#[from] std::io::Error),

    #[error("📄 데이터 변환 오류: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("📊 CSV 처리 오류: {0}")]
    Csv(#[from] csv::Error),

    #[error("🔍 응답 파싱 오류: {0}")]
    Parse(String),

    #[error("⚠️ {0}")]
    Other(String),
}

impl KoshaError {
    /// Create an API error with an optional hint
    pub fn api_error(code: impl Into<String>, message: impl Into<String>, hint: Option<String>) -> Self {
        Self::ApiError {
            code: code.into(),
            message: message.into(),
            hint,
        }
    }

    /// Get user-friendly hint for the error
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::NoApiKey => Some(
                "공공데이터포털(https://www.data.go.kr)에서 서비스 키를 발급받은 뒤 \
                 'kosha config set kosha.key YOUR_KEY'를 실행하세요."
                    .to_string(),
            ),
            Self::ApiError { hint, .. } => hint.clone(),
            Self::Network(_) | Self::Transport(_) => {
                Some("인터넷 연결을 확인한 후 다시 시도하세요.".to_string())
            }
            Self::OversizedResponse => Some(
                "'kosha config set kosha.page_size' 값을 더 작게 설정해 보세요.".to_string(),
            ),
            Self::HttpStatus(code) if *code >= 500 => {
                Some("서버에 일시적인 문제가 있습니다. 잠시 후 다시 시도하세요.".to_string())
            }
            Self::Parse(_) => Some(
                "API 응답 형식을 해석하지 못했습니다. --verbose 옵션으로 원문을 확인하세요."
                    .to_string(),
            ),
            Self::Io(err) => match err.kind() {
                std::io::ErrorKind::PermissionDenied => {
                    Some("파일에 접근할 권한이 없습니다.".to_string())
                }
                std::io::ErrorKind::NotFound => {
                    Some("파일을 찾을 수 없습니다. 경로를 다시 확인하세요.".to_string())
                }
                _ => None,
            },
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, KoshaError>;
