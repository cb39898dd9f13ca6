// View mount controllers - strings first, then the view, then pages on demand
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use newsroom_api::{LocaleBundle, News, NewsPage, NEWS_BUNDLE, NOTES_BUNDLE};
use tracing::{debug, info};

use crate::list_view::{ListQuery, ListViewParams, ListViewSettings};
use crate::source::{LocaleSource, NewsSource};
use crate::templates::{TemplateEntry, TemplateRegistry};
use crate::Result;

/// Shared "still on screen" flag
///
/// Responses landing after `destroy` are dropped instead of applied.
#[derive(Debug, Clone)]
pub struct MountHandle {
    alive: Arc<AtomicBool>,
}

impl MountHandle {
    fn new() -> Self {
        Self {
            alive: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn destroy(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }

    pub fn is_mounted(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }
}

/// A mounted news list widget
pub struct NewsListView {
    settings: ListViewSettings,
    header_title: String,
    bundle: LocaleBundle,
    source: Arc<dyn NewsSource>,
    handle: MountHandle,
}

impl NewsListView {
    /// Resolve the preferences, load strings, then build the view
    pub async fn mount(
        params: &ListViewParams,
        lang: &str,
        header_translations: Option<&HashMap<String, String>>,
        locale: &dyn LocaleSource,
        source: Arc<dyn NewsSource>,
    ) -> Result<Self> {
        let settings = ListViewSettings::resolve(params);
        let bundle = locale.bundle(NEWS_BUNDLE, lang).await?;
        let header_title = settings.localized_header(header_translations, lang);

        info!(
            "Mounted {} on {}",
            settings.view_template,
            mount_point(&settings.app_id)
        );

        Ok(Self {
            settings,
            header_title,
            bundle,
            source,
            handle: MountHandle::new(),
        })
    }

    pub fn settings(&self) -> &ListViewSettings {
        &self.settings
    }

    pub fn header_title(&self) -> &str {
        &self.header_title
    }

    pub fn bundle(&self) -> &LocaleBundle {
        &self.bundle
    }

    pub fn mount_point(&self) -> String {
        mount_point(&self.settings.app_id)
    }

    pub fn title(&self) -> String {
        format!("News List View - {}", self.settings.view_template)
    }

    /// Renderer for the configured template
    pub fn renderer<'a>(&self, registry: &'a TemplateRegistry) -> Option<&'a TemplateEntry> {
        registry.resolve(self.settings.view_template)
    }

    pub fn handle(&self) -> MountHandle {
        self.handle.clone()
    }

    pub fn is_mounted(&self) -> bool {
        self.handle.is_mounted()
    }

    pub fn destroy(&self) {
        debug!("Destroying {}", self.mount_point());
        self.handle.destroy();
    }

    /// Fetch a page; `None` when the view went away in the meantime
    pub async fn load_page(&self, query: &ListQuery) -> Result<Option<NewsPage>> {
        if !self.is_mounted() {
            return Err(crate::Error::NotMounted(self.mount_point()));
        }

        let page = self.source.page(query).await?;

        if !self.is_mounted() {
            debug!("Dropping page at offset {} for destroyed view", query.offset);
            return Ok(None);
        }

        Ok(Some(page))
    }
}

fn mount_point(app_id: &str) -> String {
    format!("#{}", app_id)
}

/// Preferences of the "latest news" block
#[derive(Debug, Clone, Default)]
pub struct LatestNewsParams {
    pub news_info: Vec<News>,
    pub header: String,
    pub see_all_label: String,
    pub url: String,
    pub is_show_header: bool,
}

/// A mounted "latest news" block
pub struct LatestNewsView {
    params: LatestNewsParams,
    bundle: LocaleBundle,
    handle: MountHandle,
}

impl LatestNewsView {
    pub const APP_ID: &'static str = "latestNewsDetails";

    pub async fn mount(
        params: LatestNewsParams,
        lang: &str,
        locale: &dyn LocaleSource,
    ) -> Result<Self> {
        let bundle = locale.bundle(NEWS_BUNDLE, lang).await?;
        info!(
            "Mounted latest news on {} with {} articles",
            mount_point(Self::APP_ID),
            params.news_info.len()
        );

        Ok(Self {
            params,
            bundle,
            handle: MountHandle::new(),
        })
    }

    pub fn params(&self) -> &LatestNewsParams {
        &self.params
    }

    pub fn bundle(&self) -> &LocaleBundle {
        &self.bundle
    }

    pub fn mount_point(&self) -> String {
        mount_point(Self::APP_ID)
    }

    pub fn title(&self) -> &'static str {
        "news"
    }

    pub fn is_mounted(&self) -> bool {
        self.handle.is_mounted()
    }

    pub fn destroy(&self) {
        self.handle.destroy();
    }
}

/// The full article page, with the action buttons the user is entitled to
pub struct NewsDetailsView {
    news: News,
    activity_id: Option<String>,
    news_type: Option<String>,
    bundle: LocaleBundle,
    handle: MountHandle,
}

impl NewsDetailsView {
    pub const APP_ID: &'static str = "newsDetailsApp";

    pub async fn mount(
        news: News,
        activity_id: Option<String>,
        news_type: Option<String>,
        lang: &str,
        locale: &dyn LocaleSource,
    ) -> Result<Self> {
        let bundle = locale.bundle(NEWS_BUNDLE, lang).await?;
        info!("Mounted article {:?} on {}", news.id, mount_point(Self::APP_ID));

        Ok(Self {
            news,
            activity_id,
            news_type,
            bundle,
            handle: MountHandle::new(),
        })
    }

    pub fn news(&self) -> &News {
        &self.news
    }

    pub fn news_id(&self) -> Option<&str> {
        self.news.id.as_deref()
    }

    pub fn activity_id(&self) -> Option<&str> {
        self.activity_id.as_deref()
    }

    pub fn news_type(&self) -> Option<&str> {
        self.news_type.as_deref()
    }

    pub fn show_edit_button(&self) -> bool {
        self.news.can_edit
    }

    pub fn show_publish_button(&self) -> bool {
        self.news.can_publish
    }

    pub fn show_delete_button(&self) -> bool {
        self.news.can_delete
    }

    pub fn bundle(&self) -> &LocaleBundle {
        &self.bundle
    }

    pub fn mount_point(&self) -> String {
        mount_point(Self::APP_ID)
    }

    pub fn title(&self) -> &'static str {
        "Article Details"
    }

    pub fn is_mounted(&self) -> bool {
        self.handle.is_mounted()
    }

    pub fn destroy(&self) {
        self.handle.destroy();
    }
}

/// What the article composer page was opened for, read from its URL
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposerParams {
    pub article_id: Option<String>,
    pub space_id: Option<String>,
    pub activity_id: Option<String>,
    pub article_type: Option<String>,
    pub selected_language: Option<String>,
    pub max_to_upload: u32,
    /// In megabytes
    pub max_file_size: u64,
}

impl ComposerParams {
    pub fn from_page_url(page_url: &str, max_to_upload: u32, max_file_size: u64) -> Self {
        Self {
            article_id: query_param(page_url, "newsId"),
            space_id: query_param(page_url, "spaceId"),
            activity_id: query_param(page_url, "activityId"),
            article_type: query_param(page_url, "type"),
            selected_language: query_param(page_url, "lang"),
            max_to_upload,
            max_file_size,
        }
    }
}

/// First value of `name` in the query string of `url`, form-decoded
pub fn query_param(url: &str, name: &str) -> Option<String> {
    let (_, query) = url.split_once('?')?;
    let query = query.split('#').next().unwrap_or_default();

    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .find(|(key, _)| form_decode(key).as_deref() == Some(name))
        .and_then(|(_, value)| form_decode(value))
}

fn form_decode(raw: &str) -> Option<String> {
    urlencoding::decode(&raw.replace('+', " "))
        .ok()
        .map(|decoded| decoded.into_owned())
}

/// The rich editor page used to write or edit an article
pub struct NewsComposerView {
    params: ComposerParams,
    bundle: LocaleBundle,
    handle: MountHandle,
}

impl NewsComposerView {
    pub const APP_ID: &'static str = "NewsComposerApp";

    /// Loads the notes editor strings and the news strings, news keys winning
    pub async fn mount(
        params: ComposerParams,
        lang: &str,
        locale: &dyn LocaleSource,
    ) -> Result<Self> {
        let mut bundle = locale.bundle(NOTES_BUNDLE, lang).await?;
        bundle.extend(locale.bundle(NEWS_BUNDLE, lang).await?);

        info!(
            "Mounted composer on {} for article {:?}",
            mount_point(Self::APP_ID),
            params.article_id
        );

        Ok(Self {
            params,
            bundle,
            handle: MountHandle::new(),
        })
    }

    pub fn params(&self) -> &ComposerParams {
        &self.params
    }

    pub fn bundle(&self) -> &LocaleBundle {
        &self.bundle
    }

    pub fn mount_point(&self) -> String {
        mount_point(Self::APP_ID)
    }

    pub fn is_mounted(&self) -> bool {
        self.handle.is_mounted()
    }

    pub fn destroy(&self) {
        self.handle.destroy();
    }
}

/// Drawer to pick a publication date, one per article
pub struct ScheduleNewsDrawer {
    news_id: String,
    bundle: LocaleBundle,
    handle: MountHandle,
}

impl ScheduleNewsDrawer {
    pub async fn mount(news_id: &str, lang: &str, locale: &dyn LocaleSource) -> Result<Self> {
        let bundle = locale.bundle(NEWS_BUNDLE, lang).await?;
        debug!("Mounted schedule drawer for article {}", news_id);

        Ok(Self {
            news_id: news_id.to_string(),
            bundle,
            handle: MountHandle::new(),
        })
    }

    pub fn news_id(&self) -> &str {
        &self.news_id
    }

    pub fn app_id(&self) -> String {
        format!("scheduleNewsDrawer-{}", self.news_id)
    }

    pub fn mount_point(&self) -> String {
        mount_point(&self.app_id())
    }

    pub fn bundle(&self) -> &LocaleBundle {
        &self.bundle
    }

    pub fn is_mounted(&self) -> bool {
        self.handle.is_mounted()
    }

    pub fn destroy(&self) {
        self.handle.destroy();
    }
}
