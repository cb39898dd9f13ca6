use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Where an article sits in its lifecycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PublicationState {
    #[default]
    Draft,
    Pending,
    Published,
    #[serde(other)]
    Unknown,
}

/// Which stored object a request is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NewsObjectType {
    Draft,
    Article,
    LatestDraft,
}

impl NewsObjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NewsObjectType::Draft => "draft",
            NewsObjectType::Article => "article",
            NewsObjectType::LatestDraft => "latest_draft",
        }
    }
}

impl std::fmt::Display for NewsObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NewsObjectType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(NewsObjectType::Draft),
            "article" => Ok(NewsObjectType::Article),
            "latest_draft" => Ok(NewsObjectType::LatestDraft),
            other => Err(format!("unknown news object type: {}", other)),
        }
    }
}

/// What part of an article an update touches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NewsUpdateType {
    #[default]
    #[serde(rename = "content")]
    Content,
    #[serde(rename = "postingAndPublishing")]
    PostingAndPublishing,
    #[serde(rename = "schedule")]
    Schedule,
}

impl NewsUpdateType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NewsUpdateType::Content => "content",
            NewsUpdateType::PostingAndPublishing => "postingAndPublishing",
            NewsUpdateType::Schedule => "schedule",
        }
    }
}

/// Localized fields of one article translation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NewsTranslation {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub body: Option<String>,
}

/// A news article as served by the content REST API
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct News {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    pub summary: Option<String>,
    pub body: Option<String>,
    #[serde(rename = "illustrationURL")]
    pub illustration_url: Option<String>,
    pub author: Option<String>,
    pub author_display_name: Option<String>,
    #[serde(default)]
    pub publication_state: PublicationState,
    pub space_id: Option<String>,
    pub space_display_name: Option<String>,
    #[serde(default)]
    pub targets: Vec<String>,
    #[serde(default)]
    pub views_count: u64,
    pub activity_id: Option<String>,
    pub lang: Option<String>,
    pub schedule_post_date: Option<String>,
    pub time_zone_id: Option<String>,
    pub url: Option<String>,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub can_edit: bool,
    #[serde(default)]
    pub can_delete: bool,
    #[serde(default)]
    pub can_publish: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub shared_in_spaces_list: Vec<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub translations: HashMap<String, NewsTranslation>,
}

impl News {
    /// Title in `lang` if a translation exists, otherwise the original title
    pub fn localized_title(&self, lang: &str) -> &str {
        self.translations
            .get(lang)
            .and_then(|t| t.title.as_deref())
            .unwrap_or(&self.title)
    }
}

/// One page of articles from a list endpoint
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NewsPage {
    #[serde(default)]
    pub news: Vec<News>,
    pub offset: Option<u32>,
    pub limit: Option<u32>,
    /// Only filled when the request asked for `returnSize`
    pub size: Option<u32>,
}

/// A named publication channel articles can be pushed to
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Target {
    pub name: String,
    pub label: Option<String>,
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub properties: HashMap<String, String>,
}

/// A portal space, only ever referenced by id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Space {
    pub id: String,
    pub display_name: Option<String>,
    pub url: Option<String>,
    pub avatar_url: Option<String>,
}

/// One page of the spaces a user belongs to
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SpacePage {
    #[serde(default)]
    pub spaces: Vec<Space>,
    pub offset: Option<u32>,
    pub limit: Option<u32>,
    pub size: Option<u32>,
}

/// Entry of the space suggestion endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpaceSuggestion {
    pub value: String,
    pub text: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(rename = "avatarUrl", default)]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct SpaceSuggestions {
    #[serde(default)]
    pub options: Vec<SpaceSuggestion>,
}

/// Language offered for translations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Language {
    pub value: String,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_news_from_portal_json() {
        let json = r#"{
            "id": "12",
            "title": "Quarterly results",
            "summary": "Numbers are up",
            "body": "<p>Numbers are up</p>",
            "illustrationURL": "/rest/images/12?v=1",
            "publicationState": "published",
            "viewsCount": 31,
            "spaceId": "4",
            "targets": ["homepage"],
            "canEdit": true,
            "someFieldWeDoNotKnow": 1,
            "translations": {"fr": {"title": "Résultats trimestriels"}}
        }"#;

        let news: News = serde_json::from_str(json).unwrap();
        assert_eq!(news.id.as_deref(), Some("12"));
        assert_eq!(news.publication_state, PublicationState::Published);
        assert_eq!(news.views_count, 31);
        assert_eq!(news.illustration_url.as_deref(), Some("/rest/images/12?v=1"));
        assert!(news.can_edit);
        assert_eq!(news.localized_title("fr"), "Résultats trimestriels");
        assert_eq!(news.localized_title("de"), "Quarterly results");
    }

    #[test]
    fn test_unknown_publication_state_is_tolerated() {
        let raw = r#"{"title": "x", "publicationState": "archived"}"#;
        let news: News = serde_json::from_str(raw).unwrap();
        assert_eq!(news.publication_state, PublicationState::Unknown);
    }

    #[test]
    fn test_new_draft_serializes_without_id() {
        let news = News {
            title: "Draft".to_string(),
            ..News::default()
        };
        let json = serde_json::to_value(&news).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["publicationState"], "draft");
    }

    #[test]
    fn test_update_type_wire_names() {
        assert_eq!(NewsUpdateType::default().as_str(), "content");
        assert_eq!(
            serde_json::to_value(NewsUpdateType::PostingAndPublishing).unwrap(),
            "postingAndPublishing"
        );
        assert_eq!("latest_draft".parse::<NewsObjectType>(), Ok(NewsObjectType::LatestDraft));
    }
}
