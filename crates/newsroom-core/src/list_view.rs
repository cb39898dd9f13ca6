// News list widget settings: raw host preferences in, resolved flags out
use std::collections::{BTreeMap, HashMap};

use newsroom_api::NewsPage;
use serde::{Deserialize, Serialize};

use crate::templates::ViewTemplate;

/// Page size when the widget preferences leave it blank
pub const DEFAULT_LIMIT: u32 = 4;

/// Widget preferences exactly as the host hands them over
///
/// Every value is a string; an empty string means "not set".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListViewParams {
    pub application_id: String,
    pub app_id: String,
    pub view_template: String,
    #[serde(rename = "saveSettingsURL")]
    pub save_settings_url: String,
    pub news_target: String,
    pub header_title: String,
    pub limit: String,
    pub show_header: String,
    pub show_see_all: String,
    pub see_all_url: String,
    pub show_article_title: String,
    pub show_article_summary: String,
    pub show_article_image: String,
    pub show_article_author: String,
    pub show_article_space: String,
    pub show_article_reactions: String,
    pub show_article_date: String,
}

impl ListViewParams {
    /// Build from `key=value` preference pairs; unknown keys are ignored
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            let value = value.to_string();
            match key {
                "applicationId" => params.application_id = value,
                "appId" => params.app_id = value,
                "viewTemplate" => params.view_template = value,
                "saveSettingsURL" => params.save_settings_url = value,
                "newsTarget" => params.news_target = value,
                "headerTitle" => params.header_title = value,
                "limit" => params.limit = value,
                "showHeader" => params.show_header = value,
                "showSeeAll" => params.show_see_all = value,
                "seeAllUrl" => params.see_all_url = value,
                "showArticleTitle" => params.show_article_title = value,
                "showArticleSummary" => params.show_article_summary = value,
                "showArticleImage" => params.show_article_image = value,
                "showArticleAuthor" => params.show_article_author = value,
                "showArticleSpace" => params.show_article_space = value,
                "showArticleReactions" => params.show_article_reactions = value,
                "showArticleDate" => params.show_article_date = value,
                _ => {}
            }
        }
        params
    }
}

/// Empty means the baseline, anything else must be exactly `"true"`
fn flag_or(value: &str, baseline: bool) -> bool {
    if value.is_empty() {
        baseline
    } else {
        value == "true"
    }
}

/// What the widget actually renders with
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListViewSettings {
    pub application_id: String,
    pub app_id: String,
    pub view_template: ViewTemplate,
    pub news_target: String,
    pub header_title: String,
    #[serde(rename = "saveSettingsURL")]
    pub save_settings_url: String,
    pub limit: u32,
    pub show_header: bool,
    pub show_see_all: bool,
    pub see_all_url: String,
    pub show_article_title: bool,
    pub show_article_summary: bool,
    pub show_article_image: bool,
    pub show_article_author: bool,
    pub show_article_space: bool,
    pub show_article_reactions: bool,
    pub show_article_date: bool,
}

impl ListViewSettings {
    pub fn resolve(params: &ListViewParams) -> Self {
        let template = ViewTemplate::from_key_or_empty(&params.view_template);
        let latest = template == ViewTemplate::NewsLatest;

        let limit = if params.limit.is_empty() {
            DEFAULT_LIMIT
        } else {
            params.limit.trim().parse().unwrap_or(DEFAULT_LIMIT)
        };

        Self {
            application_id: params.application_id.clone(),
            app_id: params.app_id.clone(),
            view_template: template,
            news_target: params.news_target.clone(),
            header_title: params.header_title.clone(),
            save_settings_url: params.save_settings_url.clone(),
            limit,
            show_header: template != ViewTemplate::NewsSlider && params.show_header == "true",
            show_see_all: params.show_see_all == "true" && !params.see_all_url.is_empty(),
            see_all_url: params.see_all_url.clone(),
            show_article_title: flag_or(&params.show_article_title, true),
            show_article_summary: !latest && params.show_article_summary == "true",
            show_article_image: flag_or(&params.show_article_image, true),
            show_article_author: !latest && params.show_article_author == "true",
            show_article_space: flag_or(&params.show_article_space, true),
            show_article_reactions: flag_or(&params.show_article_reactions, true),
            show_article_date: flag_or(&params.show_article_date, true),
        }
    }

    /// Header in the user's language when translations exist
    ///
    /// Falls back to English, then to the configured title.
    pub fn localized_header(
        &self,
        translations: Option<&HashMap<String, String>>,
        lang: &str,
    ) -> String {
        let non_empty = |title: &&String| !title.is_empty();
        translations
            .and_then(|t| {
                t.get(lang)
                    .filter(non_empty)
                    .or_else(|| t.get("en").filter(non_empty))
            })
            .cloned()
            .unwrap_or_else(|| self.header_title.clone())
    }

    /// Preferences to post back through the save settings action
    pub fn to_preferences(&self) -> BTreeMap<String, String> {
        let mut prefs = BTreeMap::new();
        let mut put = |key: &str, value: String| {
            prefs.insert(key.to_string(), value);
        };

        put("viewTemplate", self.view_template.id().to_string());
        put("newsTarget", self.news_target.clone());
        put("headerTitle", self.header_title.clone());
        put("limit", self.limit.to_string());
        put("showHeader", self.show_header.to_string());
        put("showSeeAll", self.show_see_all.to_string());
        put("seeAllUrl", self.see_all_url.clone());
        put("showArticleTitle", self.show_article_title.to_string());
        put("showArticleSummary", self.show_article_summary.to_string());
        put("showArticleImage", self.show_article_image.to_string());
        put("showArticleAuthor", self.show_article_author.to_string());
        put("showArticleSpace", self.show_article_space.to_string());
        put("showArticleReactions", self.show_article_reactions.to_string());
        put("showArticleDate", self.show_article_date.to_string());
        prefs
    }

    pub fn first_page(&self) -> ListQuery {
        ListQuery {
            target: self.news_target.clone(),
            offset: 0,
            limit: self.limit,
            return_size: true,
        }
    }
}

/// One page request against a target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub target: String,
    pub offset: u32,
    pub limit: u32,
    pub return_size: bool,
}

impl ListQuery {
    /// The following page; the offset stops at `u32::MAX`
    pub fn next(&self) -> Self {
        Self {
            offset: self.offset.saturating_add(self.limit),
            ..self.clone()
        }
    }

    /// Whether another page may exist after `page`
    ///
    /// Always false once the next offset can no longer be expressed.
    pub fn has_more(&self, page: &NewsPage) -> bool {
        let Ok(count) = u32::try_from(page.news.len()) else {
            return false;
        };
        let Some(seen) = self.offset.checked_add(count) else {
            return false;
        };
        if self.offset.checked_add(self.limit).is_none() {
            return false;
        }

        match page.size {
            Some(size) => seen < size,
            None => count >= self.limit && self.limit > 0,
        }
    }
}
