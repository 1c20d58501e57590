use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Error};
use serde::{Deserialize, Serialize};

/** \brief 未配置档案时示例使用的网关端口。 */
pub const DEFAULT_GATEWAY_PORT: i64 = 8045;

/**
 * \brief 网关调用协议标签。
 * \details 解析是全函数：除 anthropic / gemini 外的任何取值都回落到 OpenAI 兼容协议。
 */
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Protocol {
    #[default]
    OpenAI,
    Anthropic,
    Gemini,
}

impl Protocol {
    pub fn parse(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "anthropic" => Protocol::Anthropic,
            "gemini" => Protocol::Gemini,
            _ => Protocol::OpenAI,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::OpenAI => "openai",
            Protocol::Anthropic => "anthropic",
            Protocol::Gemini => "gemini",
        }
    }
}

impl From<&str> for Protocol {
    fn from(tag: &str) -> Self {
        Protocol::parse(tag)
    }
}

impl From<String> for Protocol {
    fn from(tag: String) -> Self {
        Protocol::parse(&tag)
    }
}

impl From<Protocol> for String {
    fn from(protocol: Protocol) -> Self {
        protocol.as_str().to_string()
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/**
 * \brief 注释语言：仅区分中文与英文。
 */
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Locale {
    #[default]
    En,
    Zh,
}

impl Locale {
    /**
     * \brief 以 "zh" 开头的标签选择中文，其余一律英文。
     */
    pub fn from_lang(lang: &str) -> Self {
        if lang.starts_with("zh") {
            Locale::Zh
        } else {
            Locale::En
        }
    }

    pub fn is_zh(&self) -> bool {
        matches!(self, Locale::Zh)
    }
}

/**
 * \brief 目标客户端语言。
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientLanguage {
    Python,
    NodeJs,
    Go,
    Curl,
    Rust,
}

impl ClientLanguage {
    pub const ALL: [ClientLanguage; 5] = [
        ClientLanguage::Python,
        ClientLanguage::NodeJs,
        ClientLanguage::Go,
        ClientLanguage::Curl,
        ClientLanguage::Rust,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClientLanguage::Python => "python",
            ClientLanguage::NodeJs => "nodejs",
            ClientLanguage::Go => "go",
            ClientLanguage::Curl => "curl",
            ClientLanguage::Rust => "rust",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ClientLanguage::Python => "Python",
            ClientLanguage::NodeJs => "Node.js",
            ClientLanguage::Go => "Go",
            ClientLanguage::Curl => "cURL",
            ClientLanguage::Rust => "Rust",
        }
    }
}

impl FromStr for ClientLanguage {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "python" | "py" => Ok(ClientLanguage::Python),
            "nodejs" | "node" | "js" | "javascript" => Ok(ClientLanguage::NodeJs),
            "go" | "golang" => Ok(ClientLanguage::Go),
            "curl" | "shell" | "cli" | "bash" => Ok(ClientLanguage::Curl),
            "rust" | "rs" => Ok(ClientLanguage::Rust),
            other => Err(anyhow!("unsupported client language: {}", other)),
        }
    }
}

impl fmt::Display for ClientLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/**
 * \brief 生成一段示例代码所需的全部输入。
 */
#[derive(Debug, Clone)]
pub struct SnippetRequest {
    /** \brief 模型标识，原样写入示例 */
    pub model_id: String,
    /** \brief 调用协议 */
    pub protocol: Protocol,
    /** \brief 本地网关端口，不做范围校验 */
    pub port: i64,
    /** \brief API Key，原样写入示例，不做转义 */
    pub api_key: String,
    /** \brief 注释语言标签，缺省为 "en" */
    pub lang: Option<String>,
}

impl SnippetRequest {
    pub fn new(model_id: &str, protocol: Protocol, port: i64, api_key: &str) -> Self {
        Self {
            model_id: model_id.to_string(),
            protocol,
            port,
            api_key: api_key.to_string(),
            lang: None,
        }
    }

    pub fn with_lang(mut self, lang: &str) -> Self {
        self.lang = Some(lang.to_string());
        self
    }

    pub fn lang(&self) -> &str {
        self.lang.as_deref().unwrap_or("en")
    }
}

impl Default for SnippetRequest {
    fn default() -> Self {
        SnippetRequest::new("", Protocol::OpenAI, DEFAULT_GATEWAY_PORT, "")
    }
}

/**
 * \brief 调用方显式给出的参数，覆盖档案中的默认值。
 */
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SnippetOverrides {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub protocol: Option<Protocol>,
    #[serde(default)]
    pub port: Option<i64>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub lang: Option<String>,
}

impl SnippetOverrides {
    pub fn apply(self, base: SnippetRequest) -> SnippetRequest {
        SnippetRequest {
            model_id: self.model.unwrap_or(base.model_id),
            protocol: self.protocol.unwrap_or(base.protocol),
            port: self.port.unwrap_or(base.port),
            api_key: self.api_key.unwrap_or(base.api_key),
            lang: self.lang.or(base.lang),
        }
    }
}

/**
 * \brief 本地网关配置档案，用于预填示例参数。
 */
#[derive(Debug, Clone)]
pub struct GatewayProfile {
    /** \brief 自增主键 */
    pub id: i64,
    /** \brief 档案显示名称 */
    pub name: String,
    /** \brief 网关监听端口 */
    pub port: i64,
    /** \brief 网关 API Key（明文存储） */
    pub api_key: String,
    /** \brief 默认模型名 */
    pub model: String,
    /** \brief 默认协议 */
    pub protocol: Protocol,
}

impl GatewayProfile {
    pub fn to_request(&self) -> SnippetRequest {
        SnippetRequest::new(&self.model, self.protocol, self.port, &self.api_key)
    }
}

/**
 * \brief 以档案（若有）与保存的语言标签构造基础请求。
 */
pub fn base_request(profile: Option<&GatewayProfile>, lang: Option<String>) -> SnippetRequest {
    let mut req = profile
        .map(GatewayProfile::to_request)
        .unwrap_or_default();
    req.lang = lang;
    req
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_parse_is_total() {
        assert_eq!(Protocol::parse("anthropic"), Protocol::Anthropic);
        assert_eq!(Protocol::parse(" Gemini "), Protocol::Gemini);
        assert_eq!(Protocol::parse("openai"), Protocol::OpenAI);
        assert_eq!(Protocol::parse("bedrock"), Protocol::OpenAI);
        assert_eq!(Protocol::parse(""), Protocol::OpenAI);
    }

    #[test]
    fn test_protocol_serde_uses_lowercase_tag() {
        let json = serde_json::to_string(&Protocol::Anthropic).expect("serialize");
        assert_eq!(json, "\"anthropic\"");
        let parsed: Protocol = serde_json::from_str("\"mistral\"").expect("deserialize");
        assert_eq!(parsed, Protocol::OpenAI);
    }

    #[test]
    fn test_locale_prefix_rule() {
        assert_eq!(Locale::from_lang("zh"), Locale::Zh);
        assert_eq!(Locale::from_lang("zh-CN"), Locale::Zh);
        assert_eq!(Locale::from_lang("en"), Locale::En);
        assert_eq!(Locale::from_lang("ZH"), Locale::En);
        assert_eq!(Locale::from_lang(""), Locale::En);
    }

    #[test]
    fn test_client_language_aliases() {
        assert_eq!("py".parse::<ClientLanguage>().unwrap(), ClientLanguage::Python);
        assert_eq!("Node".parse::<ClientLanguage>().unwrap(), ClientLanguage::NodeJs);
        assert_eq!("golang".parse::<ClientLanguage>().unwrap(), ClientLanguage::Go);
        assert_eq!("shell".parse::<ClientLanguage>().unwrap(), ClientLanguage::Curl);
        assert_eq!("rs".parse::<ClientLanguage>().unwrap(), ClientLanguage::Rust);
        assert!("cobol".parse::<ClientLanguage>().is_err());
        for lang in ClientLanguage::ALL {
            assert_eq!(lang.as_str().parse::<ClientLanguage>().unwrap(), lang);
        }
    }

    #[test]
    fn test_overrides_win_over_profile() {
        let profile = GatewayProfile {
            id: 1,
            name: "default".to_string(),
            port: 9000,
            api_key: "sk-profile".to_string(),
            model: "claude-3-opus".to_string(),
            protocol: Protocol::Anthropic,
        };
        let base = base_request(Some(&profile), Some("zh".to_string()));
        let overrides = SnippetOverrides {
            model: Some("gpt-4o".to_string()),
            protocol: Some(Protocol::OpenAI),
            ..Default::default()
        };
        let req = overrides.apply(base);
        assert_eq!(req.model_id, "gpt-4o");
        assert_eq!(req.protocol, Protocol::OpenAI);
        assert_eq!(req.port, 9000);
        assert_eq!(req.api_key, "sk-profile");
        assert_eq!(req.lang(), "zh");
    }

    #[test]
    fn test_overrides_parse_unknown_protocol_as_openai() {
        let overrides: SnippetOverrides =
            serde_json::from_str(r#"{"protocol": "cohere", "port": 9000}"#).expect("deserialize");
        assert_eq!(overrides.protocol, Some(Protocol::OpenAI));
        let overrides: SnippetOverrides =
            serde_json::from_str(r#"{"protocol": "anthropic"}"#).expect("deserialize");
        let req = overrides.apply(SnippetRequest::default());
        assert_eq!(req.protocol, Protocol::Anthropic);
    }

    #[test]
    fn test_base_request_without_profile_uses_defaults() {
        let req = SnippetOverrides::default().apply(base_request(None, None));
        assert_eq!(req.port, DEFAULT_GATEWAY_PORT);
        assert_eq!(req.protocol, Protocol::OpenAI);
        assert!(req.model_id.is_empty());
        assert_eq!(req.lang(), "en");
    }

    #[test]
    fn test_request_lang_defaults_to_en() {
        let req = SnippetRequest::new("gpt-4o", Protocol::OpenAI, 8080, "sk");
        assert_eq!(req.lang(), "en");
        assert_eq!(req.with_lang("zh-CN").lang(), "zh-CN");
    }
}
