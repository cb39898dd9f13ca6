// Portal context - the paths and identity every client call is built from
use serde::{Deserialize, Serialize};

/// Which generation of the news REST resource to talk to
///
/// Older portals expose news under `{rest}/v1/news`, newer ones under the
/// content webapp at `/content/rest/contents`. Payloads are the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiVersion {
    V1News,
    #[default]
    Contents,
}

/// Host-provided environment, passed explicitly to every client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortalContext {
    /// Scheme and host, e.g. `https://intranet.example.org`
    pub base_url: String,
    /// Portal context path, usually `/portal`
    pub context: String,
    /// REST servlet segment under the context, usually `rest`
    pub rest: String,
    /// Content webapp path, usually `/content`
    pub content_path: String,
    pub portal_name: String,
    pub container_name: String,
    pub meta_portal_name: String,
    pub user_name: String,
    pub language: Option<String>,
    pub space_id: Option<String>,
}

impl Default for PortalContext {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            context: "/portal".to_string(),
            rest: "rest".to_string(),
            content_path: "/content".to_string(),
            portal_name: "dw".to_string(),
            container_name: "portal".to_string(),
            meta_portal_name: "dw".to_string(),
            user_name: String::new(),
            language: None,
            space_id: None,
        }
    }
}

impl PortalContext {
    fn host(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// `{base}{context}`
    pub fn portal(&self) -> String {
        format!("{}{}", self.host(), self.context)
    }

    /// `{base}{context}/{rest}`
    pub fn portal_rest(&self) -> String {
        format!("{}/{}", self.portal(), self.rest)
    }

    pub fn news_api(&self) -> String {
        format!("{}/v1/news", self.portal_rest())
    }

    pub fn content_api(&self) -> String {
        format!("{}{}/rest", self.host(), self.content_path)
    }

    /// Root of the news entity resource for the given API generation
    pub fn entity_api(&self, version: ApiVersion) -> String {
        match version {
            ApiVersion::V1News => self.news_api(),
            ApiVersion::Contents => format!("{}/contents", self.content_api()),
        }
    }

    pub fn targeting_api(&self) -> String {
        format!("{}/targeting", self.content_api())
    }

    pub fn social_space_api(&self) -> String {
        format!("{}/v1/social/spaces", self.portal_rest())
    }

    pub fn spaces_suggestion_api(&self) -> String {
        format!("{}{}/social/spaces/suggest.json", self.portal_rest(), self.context)
    }

    pub fn spaces_search_api(&self) -> String {
        format!("{}/space/user/searchSpace/", self.portal_rest())
    }

    pub fn notes_languages_api(&self) -> String {
        format!("{}/notes/languages", self.portal_rest())
    }

    /// i18n endpoint serving the resource bundle `name`
    pub fn locale_bundle_url(&self, name: &str) -> String {
        format!("{}{}/i18n/{}", self.host(), self.content_path, name)
    }

    /// Language used when the host did not set one
    pub fn language_or_default(&self) -> &str {
        self.language.as_deref().filter(|l| !l.is_empty()).unwrap_or("en")
    }

    /// Current space, ignoring an empty id
    pub fn current_space(&self) -> Option<&str> {
        self.space_id.as_deref().filter(|s| !s.is_empty())
    }
}
