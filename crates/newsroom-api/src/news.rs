use tracing::{debug, info, warn};

use crate::context::{ApiVersion, PortalContext};
use crate::error::{ApiError, Result};
use crate::http::{ensure_success, HttpSession};
use crate::models::{
    Language, News, NewsObjectType, NewsPage, NewsUpdateType, Space, SpacePage,
    SpaceSuggestion, SpaceSuggestions,
};
use crate::undo::{with_store, EntityKind, SharedUndoStore};

/// Result of fetching a single article
///
/// Fetching never fails outright. A 401 comes back as the bare status so
/// callers can redirect to login, transport and decoding problems come back
/// as the error value, and any other status yields `Empty`.
#[derive(Debug)]
pub enum FetchOutcome {
    Found(Box<News>),
    Unauthorized(u16),
    Failed(ApiError),
    Empty,
}

impl FetchOutcome {
    pub fn news(self) -> Option<News> {
        match self {
            FetchOutcome::Found(news) => Some(*news),
            _ => None,
        }
    }
}

/// Optional qualifiers of a single-article fetch
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    pub edit_mode: Option<bool>,
    pub object_type: Option<NewsObjectType>,
    pub lang: Option<String>,
}

/// Filters for the article list endpoint
#[derive(Debug, Clone, Default)]
pub struct NewsQuery {
    /// Server-side filter name (`all`, `myPosted`, `drafts`, ...)
    pub filter: String,
    /// Comma separated space ids
    pub spaces: Option<String>,
    pub search_text: Option<String>,
    pub offset: Option<u32>,
    pub limit: Option<u32>,
    pub return_size: bool,
}

impl NewsQuery {
    pub fn new(filter: impl Into<String>) -> Self {
        Self {
            filter: filter.into(),
            ..Self::default()
        }
    }

    pub fn spaces(mut self, spaces: impl Into<String>) -> Self {
        self.spaces = Some(spaces.into());
        self
    }

    pub fn search_text(mut self, text: impl Into<String>) -> Self {
        self.search_text = Some(text.into());
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn return_size(mut self) -> Self {
        self.return_size = true;
        self
    }

    /// Query string for the list endpoint, without the leading `?`
    ///
    /// Optional parameters only appear when set. A search text starting with
    /// `#` gets that `#` escaped so it is not read as a URL fragment.
    pub fn to_query_string(&self, author: &str, published_only: bool) -> String {
        let mut query = format!("author={}", author);
        if published_only {
            query.push_str("&publicationState=published");
        }
        query.push_str(&format!("&filter={}", self.filter));

        if let Some(text) = self.search_text.as_deref().filter(|t| !t.is_empty()) {
            let text = match text.strip_prefix('#') {
                Some(rest) => format!("%23{}", rest),
                None => text.to_string(),
            };
            query.push_str(&format!("&text={}", text));
        }
        if let Some(spaces) = self.spaces.as_deref().filter(|s| !s.is_empty()) {
            query.push_str(&format!("&spaces={}", spaces));
        }
        if let Some(offset) = self.offset {
            query.push_str(&format!("&offset={}", offset));
        }
        if let Some(limit) = self.limit {
            query.push_str(&format!("&limit={}", limit));
        }
        if self.return_size {
            query.push_str("&returnSize=true");
        }

        query
    }
}

/// Client for article CRUD, publication and translations
pub struct NewsClient {
    session: HttpSession,
    context: PortalContext,
    api_version: ApiVersion,
    undo: SharedUndoStore,
}

impl NewsClient {
    pub fn new(context: PortalContext, session: HttpSession, undo: SharedUndoStore) -> Self {
        Self {
            session,
            context,
            api_version: ApiVersion::default(),
            undo,
        }
    }

    /// Talk to a different generation of the news resource
    pub fn with_api_version(mut self, api_version: ApiVersion) -> Self {
        self.api_version = api_version;
        self
    }

    pub fn context(&self) -> &PortalContext {
        &self.context
    }

    pub fn undo_store(&self) -> &SharedUndoStore {
        &self.undo
    }

    fn api(&self) -> String {
        self.context.entity_api(self.api_version)
    }

    /// Get one article by id
    pub async fn fetch(&self, id: &str, options: &FetchOptions) -> FetchOutcome {
        let mut url = format!(
            "{}/{}?editMode={}&type={}",
            self.api(),
            id,
            options.edit_mode.map(|b| b.to_string()).unwrap_or_default(),
            options.object_type.map(|t| t.as_str()).unwrap_or_default(),
        );
        if self.api_version == ApiVersion::Contents {
            url.push_str(&format!("&lang={}", options.lang.as_deref().unwrap_or_default()));
        }

        let response = match self.session.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Fetching article {} failed: {}", id, e);
                return FetchOutcome::Failed(e.into());
            }
        };

        let status = response.status();
        if status.is_success() {
            return match response.json::<News>().await {
                Ok(news) => FetchOutcome::Found(Box::new(news)),
                Err(e) => {
                    warn!("Article {} could not be decoded: {}", id, e);
                    FetchOutcome::Failed(e.into())
                }
            };
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return FetchOutcome::Unauthorized(status.as_u16());
        }

        debug!("Article {} fetch answered {}", id, status);
        FetchOutcome::Empty
    }

    /// Get the article attached to an activity stream entry
    pub async fn fetch_by_activity(&self, activity_id: &str, lang: Option<&str>) -> Result<News> {
        let mut url = format!("{}/byActivity/{}", self.api(), activity_id);
        if self.api_version == ApiVersion::Contents {
            url.push_str(&format!("?lang={}", lang.unwrap_or_default()));
        }

        let response = self.session.get(&url).send().await?;
        let response = ensure_success(response, "Response code indicates a server error").await?;
        Ok(response.json().await?)
    }

    /// Get the article with only its space sharing information expanded
    pub async fn fetch_spaces(&self, news_id: &str) -> Result<News> {
        let url = format!("{}/{}?fields=spaces&type=article", self.api(), news_id);
        let response = self.session.get(&url).send().await?;
        Ok(response.json().await?)
    }

    pub async fn mark_as_read(&self, news_id: &str) -> Result<String> {
        let url = format!("{}/markAsRead/{}", self.api(), news_id);
        let response = self.session.post(&url).send().await?;
        let response = ensure_success(response, "Error while marking news as read").await?;
        Ok(response.text().await?)
    }

    /// List articles for the current user
    pub async fn list(&self, query: &NewsQuery) -> Result<NewsPage> {
        let published_only = self.api_version == ApiVersion::V1News;
        let url = format!(
            "{}?{}",
            self.api(),
            query.to_query_string(&self.context.user_name, published_only)
        );

        let response = self
            .session
            .get(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            debug!("News list answered {}", response.status());
            return Err(ApiError::ListFailed);
        }

        let page: NewsPage = response.json().await?;
        debug!("Listed {} articles", page.news.len());
        Ok(page)
    }

    /// Create a draft
    pub async fn create(&self, news: &News) -> Result<News> {
        let response = self.session.post(&self.api()).json(news).send().await?;
        let created: News = response.json().await?;
        info!("Created article {:?}", created.id);
        Ok(created)
    }

    /// Ask the server to publish at `news.schedule_post_date`
    pub async fn schedule_publish(
        &self,
        news: &News,
        object_type: Option<NewsObjectType>,
    ) -> Result<News> {
        let url = format!(
            "{}/schedule?type={}",
            self.api(),
            object_type.map(|t| t.as_str()).unwrap_or_default()
        );
        let response = self.session.patch(&url).json(news).send().await?;
        Ok(response.json().await?)
    }

    pub async fn update(
        &self,
        news: &News,
        post: bool,
        object_type: Option<NewsObjectType>,
        update_type: Option<NewsUpdateType>,
    ) -> Result<News> {
        let id = news.id.as_deref().unwrap_or_default();
        let url = format!(
            "{}/{}?post={}&type={}&newsUpdateType={}",
            self.api(),
            id,
            post,
            object_type.map(|t| t.as_str()).unwrap_or_default(),
            update_type.unwrap_or_default().as_str()
        );

        let response = self.session.put(&url).json(news).send().await?;
        let message = format!("Error when updating article with id {}", id);
        let response = ensure_success(response, &message).await?;
        Ok(response.json().await?)
    }

    /// Delete a draft right away, no undo
    pub async fn delete_draft(&self, news_id: &str) -> Result<()> {
        let url = format!("{}/{}", self.api(), news_id);
        self.session.delete(&url).send().await?;
        Ok(())
    }

    /// Delete an article, deferred server-side by `delay_seconds`
    ///
    /// With a positive delay the id goes into the undo store before the
    /// request is sent.
    pub async fn delete_soft(
        &self,
        news_id: &str,
        object_type: Option<NewsObjectType>,
        delay_seconds: u64,
    ) -> Result<()> {
        if delay_seconds > 0 {
            with_store(&self.undo, |store| {
                store.record(EntityKind::News, news_id, delay_seconds)
            })?;
        }

        let url = format!(
            "{}/{}?type={}&delay={}",
            self.api(),
            news_id,
            object_type.map(|t| t.as_str()).unwrap_or_default(),
            delay_seconds
        );
        let response = self.session.delete(&url).send().await?;
        ensure_success(response, "Error when deleting news").await?;

        info!("Deleted article {} (delay {}s)", news_id, delay_seconds);
        Ok(())
    }

    /// Cancel a pending deletion
    pub async fn delete_undo(&self, news_id: &str) -> Result<()> {
        let url = format!("{}/{}/undoDelete", self.api(), news_id);
        let response = self.session.post(&url).send().await?;
        ensure_success(response, "Error when undoing deleting news").await?;

        with_store(&self.undo, |store| store.clear(EntityKind::News, news_id))?;
        info!("Restored article {}", news_id);
        Ok(())
    }

    /// Whether the user may write news in a space; the context space wins
    pub async fn can_create_news(&self, space_id: Option<&str>) -> Result<bool> {
        self.space_permission("canCreateNews", space_id).await
    }

    pub async fn can_schedule_news(&self, space_id: Option<&str>) -> Result<bool> {
        self.space_permission("canScheduleNews", space_id).await
    }

    async fn space_permission(&self, resource: &str, space_id: Option<&str>) -> Result<bool> {
        let space = self
            .context
            .current_space()
            .or(space_id)
            .unwrap_or_default();
        let url = format!("{}/{}/{}", self.api(), resource, space);

        let response = self
            .session
            .get(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            debug!("{} for space {} answered {}", resource, space, response.status());
            return Ok(false);
        }

        Ok(response.json().await?)
    }

    /// Whether the user may publish; here the argument wins over the context
    pub async fn can_publish_news(&self, space_id: Option<&str>) -> Result<bool> {
        let space = space_id
            .filter(|s| !s.is_empty())
            .or(self.context.current_space())
            .unwrap_or_default();
        let url = format!("{}/canPublishNews?spaceId={}", self.api(), space);

        let response = self
            .session
            .get(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await?;
        Ok(response.json().await?)
    }

    pub async fn delete_translation(&self, news_id: &str, lang: &str) -> Result<()> {
        let url = format!(
            "{}/contents/translation/{}?lang={}",
            self.context.content_api(),
            news_id,
            lang
        );
        let response = self.session.delete(&url).send().await?;
        ensure_success(response, "Error when deleting article translation").await?;
        Ok(())
    }

    /// Languages the portal offers for translations
    pub async fn list_available_languages(&self) -> Result<Vec<Language>> {
        let url = format!(
            "{}?lang={}",
            self.context.notes_languages_api(),
            self.context.language_or_default()
        );
        let response = self.session.get(&url).send().await?;
        let response = ensure_success(response, "Response code indicates a server error").await?;
        Ok(response.json().await?)
    }

    /// Language codes an article is translated into
    pub async fn list_article_languages(
        &self,
        article_id: &str,
        with_drafts: bool,
    ) -> Result<Vec<String>> {
        let url = format!(
            "{}/contents/translation/{}?withDrafts={}",
            self.context.content_api(),
            article_id,
            with_drafts
        );
        let response = self.session.get(&url).send().await?;
        let response = ensure_success(response, "Error when getting article languages").await?;
        Ok(response.json().await?)
    }

    pub async fn find_user_spaces(&self, space_name: &str) -> Result<Vec<SpaceSuggestion>> {
        let url = format!(
            "{}?conditionToSearch={}&currentUser={}&typeOfRelation=confirmed",
            self.context.spaces_suggestion_api(),
            urlencoding::encode(space_name),
            self.context.user_name
        );
        let response = self
            .session
            .get(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await?;
        let suggestions: SpaceSuggestions = response.json().await?;
        Ok(suggestions.options)
    }

    /// Spaces the current user is a member of, `filter_type` as the social API takes it
    pub async fn get_user_spaces(
        &self,
        offset: u32,
        limit: u32,
        filter_type: &str,
    ) -> Result<SpacePage> {
        let url = format!(
            "{}?offset={}&limit={}&returnSize=true&filterType={}",
            self.context.social_space_api(),
            offset,
            limit,
            urlencoding::encode(filter_type)
        );
        let response = self.session.get(&url).send().await?;
        let response = ensure_success(response, "Error getting user spaces").await?;
        let page: SpacePage = response.json().await?;
        debug!("Listed {} spaces", page.spaces.len());
        Ok(page)
    }

    pub async fn get_space(&self, id: &str) -> Result<Space> {
        let url = format!("{}/{}", self.context.social_space_api(), id);
        let response = self.session.get(&url).send().await?;
        let message = format!("Error getting space with id {}", id);
        let response = ensure_success(response, &message).await?;
        Ok(response.json().await?)
    }

    pub async fn search_spaces(&self, search_text: &str) -> Result<Vec<Space>> {
        let url = format!(
            "{}?fields=id,url,displayName,avatarUrl&keyword={}",
            self.context.spaces_search_api(),
            urlencoding::encode(search_text)
        );
        let response = self
            .session
            .get(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await?;
        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::undo::PendingDeletions;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> NewsClient {
        let context = PortalContext {
            base_url: server.uri(),
            user_name: "john".to_string(),
            ..PortalContext::default()
        };
        NewsClient::new(
            context,
            HttpSession::anonymous().unwrap(),
            PendingDeletions::new().shared(),
        )
    }

    fn pending_news(client: &NewsClient) -> Option<String> {
        client
            .undo_store()
            .lock()
            .unwrap()
            .pending(EntityKind::News)
            .map(|p| p.id.clone())
    }

    #[test]
    fn test_query_string_only_has_given_params() {
        let query = NewsQuery::new("all");
        assert_eq!(query.to_query_string("john", false), "author=john&filter=all");

        let query = NewsQuery::new("myPosted")
            .spaces("1,2")
            .search_text("budget")
            .offset(0)
            .limit(10)
            .return_size();
        assert_eq!(
            query.to_query_string("john", true),
            concat!(
                "author=john&publicationState=published&filter=myPosted",
                "&text=budget&spaces=1,2&offset=0&limit=10&returnSize=true"
            )
        );
    }

    #[test]
    fn test_leading_hash_is_escaped() {
        let query = NewsQuery::new("all").search_text("#tag");
        assert!(query.to_query_string("john", false).ends_with("&text=%23tag"));

        let query = NewsQuery::new("all").search_text("");
        assert!(!query.to_query_string("john", false).contains("text="));
    }

    #[tokio::test]
    async fn test_fetch_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/content/rest/contents/12"))
            .and(query_param("editMode", "true"))
            .and(query_param("lang", "fr"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"id": "12", "title": "Hello"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let options = FetchOptions {
            edit_mode: Some(true),
            lang: Some("fr".to_string()),
            ..FetchOptions::default()
        };

        let news = client.fetch("12", &options).await.news().unwrap();
        assert_eq!(news.title, "Hello");
    }

    #[tokio::test]
    async fn test_fetch_unauthorized_returns_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/content/rest/contents/12"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let outcome = client_for(&server).fetch("12", &FetchOptions::default()).await;
        assert!(matches!(outcome, FetchOutcome::Unauthorized(401)));
    }

    #[tokio::test]
    async fn test_fetch_other_status_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let outcome = client_for(&server).fetch("12", &FetchOptions::default()).await;
        assert!(matches!(outcome, FetchOutcome::Empty));
    }

    #[tokio::test]
    async fn test_fetch_network_failure_is_swallowed() {
        let server = MockServer::start().await;
        let client = client_for(&server);
        drop(server);

        let outcome = client.fetch("12", &FetchOptions::default()).await;
        assert!(matches!(outcome, FetchOutcome::Failed(ApiError::NetworkError(_))));
    }

    #[tokio::test]
    async fn test_list_escapes_hash_on_the_wire() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/content/rest/contents"))
            .and(query_param("text", "#tag"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "news": [{"id": "1", "title": "Tagged"}],
                "offset": 0,
                "limit": 10,
                "size": 1
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let page = client
            .list(&NewsQuery::new("all").search_text("#tag").return_size())
            .await
            .unwrap();
        assert_eq!(page.news.len(), 1);
        assert_eq!(page.size, Some(1));

        let requests = server.received_requests().await.unwrap();
        let raw_query = requests[0].url.query().unwrap_or_default().to_string();
        assert!(raw_query.contains("text=%23tag"), "query was {}", raw_query);
        assert!(!raw_query.contains("publicationState"));
    }

    #[tokio::test]
    async fn test_list_v1_only_published() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/portal/rest/v1/news"))
            .and(query_param("publicationState", "published"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"news": []})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).with_api_version(ApiVersion::V1News);
        let page = client.list(&NewsQuery::new("all")).await.unwrap();
        assert!(page.news.is_empty());
    }

    #[tokio::test]
    async fn test_list_failure_has_no_partial_result() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let result = client_for(&server).list(&NewsQuery::new("all")).await;
        assert!(matches!(result, Err(ApiError::ListFailed)));
    }

    #[tokio::test]
    async fn test_delete_soft_then_undo_clears_marker() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/content/rest/contents/12"))
            .and(query_param("delay", "8"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/content/rest/contents/12/undoDelete"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let client = client_for(&server);
        client
            .delete_soft("12", Some(NewsObjectType::Article), 8)
            .await
            .unwrap();
        assert_eq!(pending_news(&client).as_deref(), Some("12"));

        client.delete_undo("12").await.unwrap();
        assert_eq!(pending_news(&client), None);
    }

    #[tokio::test]
    async fn test_failed_undo_keeps_marker() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/content/rest/contents/12/undoDelete"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = client_for(&server);
        client.delete_soft("12", None, 8).await.unwrap();

        let result = client.delete_undo("12").await;
        assert!(matches!(result, Err(ApiError::Rejected { status: 500, .. })));
        assert_eq!(pending_news(&client).as_deref(), Some("12"));
    }

    #[tokio::test]
    async fn test_only_last_delete_is_recoverable() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let client = client_for(&server);
        client.delete_soft("1", None, 8).await.unwrap();
        client.delete_soft("2", None, 8).await.unwrap();

        assert_eq!(pending_news(&client).as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn test_immediate_delete_leaves_no_marker() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(query_param("delay", "0"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        client.delete_soft("5", None, 0).await.unwrap();
        assert_eq!(pending_news(&client), None);
    }

    #[tokio::test]
    async fn test_update_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/content/rest/contents/9"))
            .and(query_param("newsUpdateType", "content"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let news = News {
            id: Some("9".to_string()),
            title: "Edited".to_string(),
            ..News::default()
        };
        let err = client_for(&server)
            .update(&news, false, None, None)
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(403));
        assert!(err.to_string().contains("article with id 9"));
    }

    #[tokio::test]
    async fn test_can_create_news_uses_context_space_first() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/content/rest/contents/canCreateNews/3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(true))
            .expect(1)
            .mount(&server)
            .await;

        let mut client = client_for(&server);
        client.context.space_id = Some("3".to_string());
        assert!(client.can_create_news(Some("99")).await.unwrap());
    }

    #[tokio::test]
    async fn test_can_schedule_news_is_false_on_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        assert!(!client_for(&server).can_schedule_news(Some("3")).await.unwrap());
    }

    #[tokio::test]
    async fn test_translations() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/content/rest/contents/translation/12"))
            .and(query_param("withDrafts", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(["en", "fr"])))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/content/rest/contents/translation/12"))
            .and(query_param("lang", "fr"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/portal/rest/notes/languages"))
            .and(query_param("lang", "en"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"value": "fr", "text": "French"}
            ])))
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert_eq!(
            client.list_article_languages("12", true).await.unwrap(),
            vec!["en".to_string(), "fr".to_string()]
        );
        client.delete_translation("12", "fr").await.unwrap();
        let languages = client.list_available_languages().await.unwrap();
        assert_eq!(languages[0].value, "fr");
    }

    #[tokio::test]
    async fn test_fetch_by_activity_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/content/rest/contents/byActivity/77"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let result = client_for(&server).fetch_by_activity("77", None).await;
        assert!(matches!(result, Err(ApiError::Rejected { status: 500, .. })));
    }

    #[tokio::test]
    async fn test_create_posts_draft() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/content/rest/contents"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"id": "31", "title": "Draft"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let news = News {
            title: "Draft".to_string(),
            ..News::default()
        };
        let created = client_for(&server).create(&news).await.unwrap();
        assert_eq!(created.id.as_deref(), Some("31"));
    }

    #[tokio::test]
    async fn test_schedule_publish_patches_with_type() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/content/rest/contents/schedule"))
            .and(query_param("type", "draft"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"id": "31", "title": "Later"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let news = News {
            id: Some("31".to_string()),
            title: "Later".to_string(),
            ..News::default()
        };
        let scheduled = client_for(&server)
            .schedule_publish(&news, Some(NewsObjectType::Draft))
            .await
            .unwrap();
        assert_eq!(scheduled.title, "Later");
    }

    #[tokio::test]
    async fn test_mark_as_read() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/content/rest/contents/markAsRead/12"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/content/rest/contents/markAsRead/13"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert_eq!(client.mark_as_read("12").await.unwrap(), "ok");

        let result = client.mark_as_read("13").await;
        assert!(matches!(result, Err(ApiError::Rejected { status: 500, .. })));
    }

    #[tokio::test]
    async fn test_fetch_spaces_asks_for_space_fields() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/content/rest/contents/12"))
            .and(query_param("fields", "spaces"))
            .and(query_param("type", "article"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"id": "12", "title": "Shared"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let news = client_for(&server).fetch_spaces("12").await.unwrap();
        assert_eq!(news.id.as_deref(), Some("12"));
    }

    #[tokio::test]
    async fn test_delete_draft() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/content/rest/contents/31"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        client.delete_draft("31").await.unwrap();
        assert_eq!(pending_news(&client), None);
    }

    #[tokio::test]
    async fn test_can_publish_news_prefers_argument() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/content/rest/contents/canPublishNews"))
            .and(query_param("spaceId", "9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(true))
            .expect(1)
            .mount(&server)
            .await;

        let mut client = client_for(&server);
        client.context.space_id = Some("3".to_string());
        assert!(client.can_publish_news(Some("9")).await.unwrap());
    }

    #[tokio::test]
    async fn test_find_user_spaces_unwraps_options() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/portal/rest/portal/social/spaces/suggest.json"))
            .and(query_param("conditionToSearch", "mark eting"))
            .and(query_param("currentUser", "john"))
            .and(query_param("typeOfRelation", "confirmed"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "options": [
                    {"value": "marketing", "text": "Marketing", "type": "space"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let suggestions = client_for(&server)
            .find_user_spaces("mark eting")
            .await
            .unwrap();
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].value, "marketing");
        assert_eq!(suggestions[0].kind.as_deref(), Some("space"));
    }

    #[tokio::test]
    async fn test_get_space_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/portal/rest/v1/social/spaces/4"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = client_for(&server).get_space("4").await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert!(err.to_string().contains("space with id 4"));
    }

    #[tokio::test]
    async fn test_search_spaces() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/portal/rest/space/user/searchSpace/"))
            .and(query_param("fields", "id,url,displayName,avatarUrl"))
            .and(query_param("keyword", "sales"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "5", "displayName": "Sales", "url": "sales"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let spaces = client_for(&server).search_spaces("sales").await.unwrap();
        assert_eq!(spaces[0].display_name.as_deref(), Some("Sales"));
    }

    #[tokio::test]
    async fn test_get_user_spaces_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/portal/rest/v1/social/spaces"))
            .and(query_param("offset", "20"))
            .and(query_param("limit", "10"))
            .and(query_param("returnSize", "true"))
            .and(query_param("filterType", "member"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "spaces": [
                    {"id": "5", "displayName": "Sales"},
                    {"id": "6", "displayName": "Support"}
                ],
                "offset": 20,
                "limit": 10,
                "size": 22
            })))
            .expect(1)
            .mount(&server)
            .await;

        let page = client_for(&server)
            .get_user_spaces(20, 10, "member")
            .await
            .unwrap();
        assert_eq!(page.spaces.len(), 2);
        assert_eq!(page.spaces[1].id, "6");
        assert_eq!(page.size, Some(22));
    }

    #[tokio::test]
    async fn test_get_user_spaces_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/portal/rest/v1/social/spaces"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let result = client_for(&server).get_user_spaces(0, 10, "member").await;
        assert!(matches!(result, Err(ApiError::Rejected { status: 401, .. })));
    }
}
