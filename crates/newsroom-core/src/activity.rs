// How a news article shows up as an activity stream card
use std::sync::LazyLock;

use newsroom_api::{News, NewsClient, PortalContext};
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::Result;

/// Thumbnail used when the article has no illustration
pub const DEFAULT_THUMBNAIL: &str = "/content/images/news.png";

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag pattern"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// The part of an activity the news card cares about
#[derive(Debug, Clone, Default)]
pub struct Activity {
    pub id: String,
    pub parent_id: Option<String>,
    pub news: Option<News>,
}

impl Activity {
    /// Shared activities point at the original one
    pub fn source_id(&self) -> &str {
        self.parent_id.as_deref().unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedComponent {
    pub component: &'static str,
    pub override_header: bool,
    pub override_footer: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThumbnailProperties {
    pub height: &'static str,
    pub width: &'static str,
    pub no_border: bool,
}

/// The `news` activity type contributed to the activity stream
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsActivityType {
    pub name: &'static str,
    pub can_edit: bool,
    pub can_share: bool,
    pub hide_on_delete: bool,
    pub supports_thumbnail: bool,
    pub summary_lines_to_display: u8,
    pub no_embedded_link_view: bool,
    pub window_title_prefix_key: &'static str,
    pub add_margin: bool,
    #[serde(skip)]
    activity_base: String,
}

impl NewsActivityType {
    pub fn new(context: &PortalContext) -> Self {
        Self {
            name: "News",
            can_edit: false,
            can_share: true,
            hide_on_delete: true,
            supports_thumbnail: true,
            summary_lines_to_display: 3,
            no_embedded_link_view: true,
            window_title_prefix_key: "news.window.title",
            add_margin: true,
            activity_base: format!("{}/{}/activity", context.context, context.meta_portal_name),
        }
    }

    /// Attach the article to the activity if it is not there yet
    ///
    /// The detail view always refreshes it.
    pub async fn init(
        &self,
        activity: &mut Activity,
        is_detail: bool,
        client: &NewsClient,
    ) -> Result<()> {
        if activity.news.is_some() && !is_detail {
            return Ok(());
        }

        debug!("Loading article for activity {}", activity.source_id());
        let news = client.fetch_by_activity(activity.source_id(), None).await?;
        activity.news = Some(news);
        Ok(())
    }

    pub fn extended_component(&self, is_detail: bool) -> Option<ExtendedComponent> {
        is_detail.then_some(ExtendedComponent {
            component: "exo-news-details-activity",
            override_header: true,
            override_footer: false,
        })
    }

    pub fn extend_shared_activity(&self, is_detail: bool) -> bool {
        is_detail
    }

    pub fn thumbnail(&self, activity: &Activity) -> String {
        match illustration(activity) {
            Some(url) => format!("{}&size=305x285", url),
            None => DEFAULT_THUMBNAIL.to_string(),
        }
    }

    pub fn thumbnail_properties(&self, activity: &Activity) -> Option<ThumbnailProperties> {
        illustration(activity).is_none().then_some(ThumbnailProperties {
            height: "90px",
            width: "90px",
            no_border: true,
        })
    }

    pub fn use_same_view_for_mobile(&self, activity: &Activity) -> bool {
        illustration(activity).is_none()
    }

    pub fn title(&self, activity: &Activity) -> String {
        activity
            .news
            .as_ref()
            .map(|n| n.title.clone())
            .unwrap_or_default()
    }

    pub fn source_link(&self, activity: &Activity) -> String {
        format!("{}?id={}", self.activity_base, activity.source_id())
    }

    /// Summary if written, otherwise the body as plain text
    pub fn summary(&self, activity: &Activity) -> String {
        let Some(news) = activity.news.as_ref() else {
            return String::new();
        };

        match (news.summary.as_deref(), news.body.as_deref()) {
            (Some(summary), _) if !summary.is_empty() => summary.to_string(),
            (_, Some(body)) if !body.is_empty() => html_to_text(body),
            _ => String::new(),
        }
    }

    pub fn tooltip(&self, is_detail: bool) -> Option<&'static str> {
        (!is_detail).then_some("news.activity.clickToShowDetail")
    }
}

fn illustration(activity: &Activity) -> Option<&str> {
    activity
        .news
        .as_ref()
        .and_then(|n| n.illustration_url.as_deref())
        .filter(|url| !url.is_empty())
}

/// Strip tags and the common entities, collapse whitespace
pub fn html_to_text(html: &str) -> String {
    let text = TAG.replace_all(html, " ");
    let text = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}
