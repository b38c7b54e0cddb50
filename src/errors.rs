//! 统一错误类型
//!
//! 存储层与启动流程返回 `NazimError`，服务层再映射为 HTTP 响应。
//! 每个变体登记错误代码、类型名称与默认 HTTP 状态。

use actix_web::http::StatusCode;
use std::fmt;

macro_rules! define_nazim_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal, $status:ident)
    ),* $(,)?) => {
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum NazimError {
            $($variant(String),)*
        }

        impl NazimError {
            pub fn code(&self) -> &'static str {
                match self {
                    $(NazimError::$variant(_) => $code,)*
                }
            }

            pub fn error_type(&self) -> &'static str {
                match self {
                    $(NazimError::$variant(_) => $type_name,)*
                }
            }

            pub fn message(&self) -> &str {
                match self {
                    $(NazimError::$variant(msg) => msg,)*
                }
            }

            /// 未被业务层特殊处理时使用的 HTTP 状态
            pub fn status_code(&self) -> StatusCode {
                match self {
                    $(NazimError::$variant(_) => StatusCode::$status,)*
                }
            }
        }

        paste::paste! {
            impl NazimError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        NazimError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_nazim_errors! {
    CacheConnection("E001", "Cache Connection Error", INTERNAL_SERVER_ERROR),
    CachePluginNotFound("E002", "Cache Plugin Not Found", INTERNAL_SERVER_ERROR),
    DatabaseConfig("E003", "Database Configuration Error", INTERNAL_SERVER_ERROR),
    DatabaseConnection("E004", "Database Connection Error", INTERNAL_SERVER_ERROR),
    DatabaseOperation("E005", "Database Operation Error", INTERNAL_SERVER_ERROR),
    FileOperation("E006", "File Operation Error", INTERNAL_SERVER_ERROR),
    Validation("E007", "Validation Error", BAD_REQUEST),
    NotFound("E008", "Resource Not Found", NOT_FOUND),
    Serialization("E009", "Serialization Error", INTERNAL_SERVER_ERROR),
    StoragePluginNotFound("E010", "Storage Plugin Not Found", INTERNAL_SERVER_ERROR),
    DateParse("E011", "Date Parse Error", BAD_REQUEST),
    Authentication("E012", "Authentication Error", UNAUTHORIZED),
    Authorization("E013", "Authorization Error", FORBIDDEN),
    Conflict("E014", "Resource Conflict", CONFLICT),
    // 跨组织或跨学校访问
    TenantScope("E015", "Tenant Scope Error", FORBIDDEN),
}

impl NazimError {
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// 日志用的单行格式
    pub fn format_simple(&self) -> String {
        format!("[{}] {}: {}", self.code(), self.error_type(), self.message())
    }
}

impl fmt::Display for NazimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_simple())
    }
}

impl std::error::Error for NazimError {}

impl From<sea_orm::DbErr> for NazimError {
    fn from(err: sea_orm::DbErr) -> Self {
        NazimError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for NazimError {
    fn from(err: std::io::Error) -> Self {
        NazimError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for NazimError {
    fn from(err: serde_json::Error) -> Self {
        NazimError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for NazimError {
    fn from(err: chrono::ParseError) -> Self {
        NazimError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, NazimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_and_statuses() {
        let err = NazimError::conflict("Admission number already exists");
        assert_eq!(err.code(), "E014");
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.message(), "Admission number already exists");

        assert_eq!(
            NazimError::tenant_scope("other school").status_code(),
            StatusCode::FORBIDDEN
        );
        assert!(NazimError::cache_connection("redis down").is_server_error());
        assert!(!NazimError::validation("bad date").is_server_error());
    }

    #[test]
    fn test_conversions() {
        let err: NazimError = sea_orm::DbErr::Custom("boom".to_string()).into();
        assert_eq!(err.code(), "E005");
        assert!(err.message().contains("boom"));

        let err: NazimError = chrono::NaiveDate::parse_from_str("2026-13-01", "%Y-%m-%d")
            .unwrap_err()
            .into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_format_simple() {
        let formatted = NazimError::validation("Invalid URL").format_simple();
        assert_eq!(formatted, "[E007] Validation Error: Invalid URL");
    }
}
