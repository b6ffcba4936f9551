use reqwest::Method;
use std::collections::BTreeMap;

/// Where metrics for one provider can be gathered
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderEndpoints {
    pub provider: String,
    pub documentation: Option<String>,
    pub api: Option<String>,
    pub api_method: Method,
    pub status_page: Option<String>,
}

impl ProviderEndpoints {
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            documentation: None,
            api: None,
            api_method: Method::GET,
            status_page: None,
        }
    }

    pub fn documentation(mut self, url: impl Into<String>) -> Self {
        self.documentation = Some(url.into());
        self
    }

    pub fn api(mut self, method: Method, url: impl Into<String>) -> Self {
        self.api_method = method;
        self.api = Some(url.into());
        self
    }

    pub fn status_page(mut self, url: impl Into<String>) -> Self {
        self.status_page = Some(url.into());
        self
    }
}

fn hume(provider: &str) -> ProviderEndpoints {
    ProviderEndpoints::new(provider)
        .documentation("https://dev.hume.ai/docs")
        .api(Method::POST, "https://api.hume.ai/v0/evi/chat")
        .status_page("https://status.hume.ai")
}

/// Public endpoints of every tracked avatar, voice and hosting provider
pub fn known_endpoints() -> Vec<ProviderEndpoints> {
    vec![
        ProviderEndpoints::new("heygen")
            .documentation("https://docs.heygen.com")
            .api(Method::GET, "https://api.heygen.com/v2/avatars")
            .status_page("https://status.heygen.com"),
        ProviderEndpoints::new("anam")
            .documentation("https://docs.anam.ai")
            .status_page("https://status.anam.ai"),
        ProviderEndpoints::new("tavus")
            .documentation("https://docs.tavus.io")
            .api(Method::GET, "https://api.tavus.io/v1/replicas")
            .status_page("https://status.tavus.io"),
        ProviderEndpoints::new("gemini-live")
            .documentation("https://ai.google.dev/gemini-api/docs")
            .status_page("https://status.cloud.google.com"),
        ProviderEndpoints::new("gpt-realtime")
            .documentation("https://platform.openai.com/docs/guides/realtime")
            .status_page("https://status.openai.com"),
        hume("hume-pro"),
        hume("hume-scale"),
        hume("hume-business"),
        ProviderEndpoints::new("grok")
            .documentation("https://docs.x.ai")
            .status_page("https://status.x.ai"),
        ProviderEndpoints::new("azure")
            .documentation("https://docs.microsoft.com/azure")
            .status_page("https://status.azure.com"),
        ProviderEndpoints::new("vercel")
            .documentation("https://vercel.com/docs")
            .status_page("https://www.vercel-status.com"),
        ProviderEndpoints::new("railway")
            .documentation("https://docs.railway.app")
            .status_page("https://status.railway.app"),
    ]
}

/// Latency assumed for a provider when nothing has been measured, milliseconds
pub fn default_latency_estimates() -> BTreeMap<String, u32> {
    [
        ("heygen", 300),
        ("anam", 250),
        ("tavus", 350),
        ("gemini-live", 200),
        ("gpt-realtime", 150),
        ("hume-pro", 100),
        ("hume-scale", 100),
        ("hume-business", 100),
        ("grok", 180),
        ("azure", 50),
        ("vercel", 30),
        ("railway", 60),
    ]
    .into_iter()
    .map(|(provider, ms)| (provider.to_string(), ms))
    .collect()
}
