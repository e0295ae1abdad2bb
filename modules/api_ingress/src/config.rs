use serde::{Deserialize, Serialize};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 16 * 1024 * 1024;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// API ingress configuration (`modules.api_ingress`)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiIngressConfig {
    pub bind_addr: String,
    pub cors_enabled: bool,
    /// Directory served under `/static/`.
    pub static_dir: String,
    /// Destination directory for `/uploads`.
    pub uploads_dir: String,
    pub body_limit_bytes: usize,
    pub request_timeout_secs: u64,
}

impl Default for ApiIngressConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            cors_enabled: false,
            static_dir: "public".to_string(),
            uploads_dir: "uploads".to_string(),
            body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_section_keeps_defaults() {
        let cfg: ApiIngressConfig =
            serde_json::from_value(serde_json::json!({ "bind_addr": "127.0.0.1:8080" })).unwrap();
        assert_eq!(cfg.bind_addr, "127.0.0.1:8080");
        assert_eq!(cfg.static_dir, "public");
        assert_eq!(cfg.uploads_dir, "uploads");
        assert_eq!(cfg.body_limit_bytes, DEFAULT_BODY_LIMIT_BYTES);
        assert_eq!(cfg.request_timeout_secs, 30);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let res = serde_json::from_value::<ApiIngressConfig>(
            serde_json::json!({ "enable_docs": true }),
        );
        assert!(res.is_err());
    }
}
