use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::context::PortalContext;
use crate::error::{ApiError, Result};
use crate::http::{ensure_success, HttpSession};
use crate::models::NewsPage;

/// Client behind the news list widgets: pages by target, saves settings
pub struct NewsListClient {
    session: HttpSession,
    context: PortalContext,
}

impl NewsListClient {
    pub fn new(context: PortalContext, session: HttpSession) -> Self {
        Self { session, context }
    }

    pub fn context(&self) -> &PortalContext {
        &self.context
    }

    /// One page of articles pushed to `target_name`
    pub async fn list_by_target(
        &self,
        target_name: &str,
        offset: u32,
        limit: u32,
        return_size: bool,
    ) -> Result<NewsPage> {
        let url = format!(
            "{}/byTarget/{}?offset={}&limit={}&returnSize={}",
            self.context.news_api(),
            urlencoding::encode(target_name),
            offset,
            limit,
            return_size
        );

        let response = self
            .session
            .get(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            debug!("byTarget/{} answered {}", target_name, response.status());
            return Err(ApiError::TargetListFailed);
        }

        let page: NewsPage = response.json().await?;
        debug!("Target {} page at {}: {} articles", target_name, offset, page.news.len());
        Ok(page)
    }

    /// Post widget settings to the portlet action URL as a form
    pub async fn save_settings(
        &self,
        save_settings_url: &str,
        settings: &BTreeMap<String, String>,
    ) -> Result<()> {
        let url = save_settings_url.replace("&amp;", "&");
        let response = self.session.post(&url).form(settings).send().await?;
        ensure_success(response, "Response code indicates a server error").await?;

        info!("Saved {} list view settings", settings.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> NewsListClient {
        let context = PortalContext {
            base_url: server.uri(),
            ..PortalContext::default()
        };
        NewsListClient::new(context, HttpSession::anonymous().unwrap())
    }

    #[tokio::test]
    async fn test_list_by_target() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/portal/rest/v1/news/byTarget/homepage"))
            .and(query_param("offset", "4"))
            .and(query_param("limit", "4"))
            .and(query_param("returnSize", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "news": [{"id": "5", "title": "Five"}],
                "offset": 4,
                "limit": 4,
                "size": 5
            })))
            .mount(&server)
            .await;

        let page = client_for(&server)
            .list_by_target("homepage", 4, 4, true)
            .await
            .unwrap();
        assert_eq!(page.news[0].title, "Five");
        assert_eq!(page.size, Some(5));
    }

    #[tokio::test]
    async fn test_list_by_target_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let result = client_for(&server).list_by_target("gone", 0, 4, false).await;
        assert!(matches!(result, Err(ApiError::TargetListFailed)));
    }

    #[tokio::test]
    async fn test_save_settings_posts_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/portal/dw/home"))
            .and(query_param("portal:action", "save"))
            .and(query_param("id", "7"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string_contains("viewTemplate=NewsSlider"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let mut settings = BTreeMap::new();
        settings.insert("viewTemplate".to_string(), "NewsSlider".to_string());
        settings.insert("limit".to_string(), "6".to_string());

        let url = format!("{}/portal/dw/home?portal:action=save&amp;id=7", server.uri());
        client_for(&server).save_settings(&url, &settings).await.unwrap();
    }
}
