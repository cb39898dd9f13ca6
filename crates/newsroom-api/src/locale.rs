// Locale bundles - views load their strings before anything renders
use std::collections::HashMap;

use tracing::debug;

use crate::context::PortalContext;
use crate::error::Result;
use crate::http::{ensure_success, HttpSession};

/// Flat key -> translated string map
pub type LocaleBundle = HashMap<String, String>;

/// Strings of the news portlets
pub const NEWS_BUNDLE: &str = "locale.portlet.news.News";
/// Strings of the notes editor, reused by the article composer
pub const NOTES_BUNDLE: &str = "locale.portlet.notes.notesPortlet";

pub struct LocaleLoader {
    session: HttpSession,
    context: PortalContext,
}

impl LocaleLoader {
    pub fn new(context: PortalContext, session: HttpSession) -> Self {
        Self { session, context }
    }

    /// Fetch the news bundle for `lang`
    pub async fn load(&self, lang: &str) -> Result<LocaleBundle> {
        self.load_bundle(NEWS_BUNDLE, lang).await
    }

    pub async fn load_bundle(&self, name: &str, lang: &str) -> Result<LocaleBundle> {
        let url = format!("{}?lang={}", self.context.locale_bundle_url(name), lang);
        let response = self.session.get(&url).send().await?;
        let response = ensure_success(response, "Error loading locale bundle").await?;

        let bundle: LocaleBundle = response.json().await?;
        debug!("Loaded {} strings of {} for {}", bundle.len(), name, lang);
        Ok(bundle)
    }

    /// Fetch the bundle for the context language
    pub async fn load_default(&self) -> Result<LocaleBundle> {
        self.load(self.context.language_or_default()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_load_bundle() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/content/i18n/locale.portlet.news.News"))
            .and(query_param("lang", "fr"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "news.list.seeAll": "Voir tout"
            })))
            .mount(&server)
            .await;

        let context = PortalContext {
            base_url: server.uri(),
            language: Some("fr".to_string()),
            ..PortalContext::default()
        };
        let loader = LocaleLoader::new(context, HttpSession::anonymous().unwrap());
        let bundle = loader.load_default().await.unwrap();
        assert_eq!(bundle.get("news.list.seeAll").map(String::as_str), Some("Voir tout"));
    }

    #[tokio::test]
    async fn test_load_named_bundle() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/content/i18n/locale.portlet.notes.notesPortlet"))
            .and(query_param("lang", "en"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "notes.label.title": "Title"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let context = PortalContext {
            base_url: server.uri(),
            ..PortalContext::default()
        };
        let loader = LocaleLoader::new(context, HttpSession::anonymous().unwrap());
        let bundle = loader.load_bundle(NOTES_BUNDLE, "en").await.unwrap();
        assert_eq!(bundle.len(), 1);
    }
}
