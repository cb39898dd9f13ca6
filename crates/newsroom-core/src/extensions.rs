use newsroom_api::NewsClient;
use serde::Serialize;
use tracing::{debug, info};

use crate::templates::{TemplateRegistry, ViewTemplate};
use crate::Result;

/// Named insertion point in the host, e.g. `WebNotification / notification-group-extension`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ExtensionPoint {
    pub app: &'static str,
    pub kind: &'static str,
}

impl ExtensionPoint {
    pub const ACTIVITY_TYPE: ExtensionPoint = ExtensionPoint { app: "activity", kind: "type" };
    pub const COMPOSER_ACTION: ExtensionPoint = ExtensionPoint {
        app: "ActivityComposerAction",
        kind: "activity-composer-action",
    };
    pub const COMPOSER_FOOTER_ACTION: ExtensionPoint = ExtensionPoint {
        app: "ActivityComposerFooterAction",
        kind: "activity-composer-footer-action",
    };
    pub const NOTIFICATION_GROUP: ExtensionPoint = ExtensionPoint {
        app: "WebNotification",
        kind: "notification-group-extension",
    };
    pub const NOTIFICATION_CONTENT: ExtensionPoint = ExtensionPoint {
        app: "WebNotification",
        kind: "notification-content-extension",
    };
    pub const TOOLBAR_ACTION: ExtensionPoint = ExtensionPoint {
        app: "ActivityToolbarAction",
        kind: "activity-toolbar-action",
    };
    pub const ANALYTICS_CELL: ExtensionPoint = ExtensionPoint {
        app: "AnalyticsTable",
        kind: "CellValue",
    };
    pub const ANALYTICS_SAMPLE: ExtensionPoint = ExtensionPoint {
        app: "AnalyticsSamples",
        kind: "SampleItem",
    };
    pub const LIST_VIEWS: ExtensionPoint = ExtensionPoint { app: "NewsList", kind: "views" };
}

impl std::fmt::Display for ExtensionPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.app, self.kind)
    }
}

/// Which analytics fields a cell renderer claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMatcher {
    pub field_name: &'static str,
    pub aggregation_type: Option<&'static str>,
}

impl FieldMatcher {
    pub fn matches(&self, field_name: &str, aggregation_type: Option<&str>) -> bool {
        field_name == self.field_name
            && match self.aggregation_type {
                Some(expected) => aggregation_type == Some(expected),
                None => true,
            }
    }
}

/// What a registration contributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Contribution {
    /// A component shown under an id
    Component { id: String, component: String },
    /// An activity type handled by this module
    ActivityType { activity_type: &'static str },
    NotificationGroup {
        name: &'static str,
        icon: &'static str,
        plugins: Vec<&'static str>,
    },
    NotificationContent {
        plugin: &'static str,
        component: &'static str,
    },
    /// A renderer for analytics values of content ids
    Analytics {
        value_type: &'static str,
        component: &'static str,
        matcher: FieldMatcher,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtensionRegistration {
    pub point: ExtensionPoint,
    pub rank: u32,
    pub contribution: Contribution,
}

/// Registrations grouped by insertion point, read back in rank order
#[derive(Debug, Clone, Default)]
pub struct ExtensionRegistry {
    registrations: Vec<ExtensionRegistration>,
}

impl ExtensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, registration: ExtensionRegistration) {
        debug!(
            "Registering {:?} at {} (rank {})",
            registration.contribution, registration.point, registration.rank
        );
        self.registrations.push(registration);
    }

    /// Everything registered at `point`, lowest rank first, ties in
    /// registration order
    pub fn at(&self, point: ExtensionPoint) -> Vec<&ExtensionRegistration> {
        let mut found: Vec<&ExtensionRegistration> =
            self.registrations.iter().filter(|r| r.point == point).collect();
        found.sort_by_key(|r| r.rank);
        found
    }

    /// Analytics renderer claiming a field, if any
    pub fn analytics_renderer(
        &self,
        point: ExtensionPoint,
        field_name: &str,
        aggregation_type: Option<&str>,
    ) -> Option<&ExtensionRegistration> {
        self.at(point).into_iter().find(|r| match &r.contribution {
            Contribution::Analytics { matcher, .. } => {
                matcher.matches(field_name, aggregation_type)
            }
            _ => false,
        })
    }

    /// Distinct insertion points in use
    pub fn points(&self) -> Vec<ExtensionPoint> {
        let mut points: Vec<ExtensionPoint> = self.registrations.iter().map(|r| r.point).collect();
        points.sort();
        points.dedup();
        points
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }
}

const NEWS_NOTIFICATION_PLUGINS: [&str; 4] = [
    "MentionInNewsNotificationPlugin",
    "NewsSpaceWebNotificationPlugin",
    "PostNewsNotificationPlugin",
    "PublishNewsNotificationPlugin",
];

/// Activity stream type plus the composer and toolbar buttons
///
/// Composer buttons are only offered to users who may write news in the
/// current space.
pub fn activity_stream_registrations(can_create_news: bool) -> Vec<ExtensionRegistration> {
    let mut registrations = vec![ExtensionRegistration {
        point: ExtensionPoint::ACTIVITY_TYPE,
        rank: 0,
        contribution: Contribution::ActivityType { activity_type: "news" },
    }];

    if can_create_news {
        registrations.push(ExtensionRegistration {
            point: ExtensionPoint::COMPOSER_ACTION,
            rank: 10,
            contribution: Contribution::Component {
                id: "switchNewsButton".to_string(),
                component: "activity-switch-to-news".to_string(),
            },
        });
        registrations.push(ExtensionRegistration {
            point: ExtensionPoint::COMPOSER_FOOTER_ACTION,
            rank: 30,
            contribution: Contribution::Component {
                id: "writeNewsButton".to_string(),
                component: "activity-write-news-composer".to_string(),
            },
        });
        registrations.push(ExtensionRegistration {
            point: ExtensionPoint::TOOLBAR_ACTION,
            rank: 30,
            contribution: Contribution::Component {
                id: "writeNewsToolbarButton".to_string(),
                component: "activity-write-news-toolbar-action".to_string(),
            },
        });
    }

    registrations
}

pub fn notification_registrations() -> Vec<ExtensionRegistration> {
    let mut registrations = vec![ExtensionRegistration {
        point: ExtensionPoint::NOTIFICATION_GROUP,
        rank: 50,
        contribution: Contribution::NotificationGroup {
            name: "news",
            icon: "fa-newspaper",
            plugins: NEWS_NOTIFICATION_PLUGINS.to_vec(),
        },
    }];

    for plugin in [
        "MentionInNewsNotificationPlugin",
        "PostNewsNotificationPlugin",
        "PublishNewsNotificationPlugin",
    ] {
        registrations.push(ExtensionRegistration {
            point: ExtensionPoint::NOTIFICATION_CONTENT,
            rank: 10,
            contribution: Contribution::NotificationContent {
                plugin,
                component: "user-notification-post-news",
            },
        });
    }

    registrations
}

pub fn analytics_registrations() -> Vec<ExtensionRegistration> {
    vec![
        ExtensionRegistration {
            point: ExtensionPoint::ANALYTICS_CELL,
            rank: 60,
            contribution: Contribution::Analytics {
                value_type: "news",
                component: "analytics-table-cell-content-value",
                matcher: FieldMatcher {
                    field_name: "contentId.keyword",
                    aggregation_type: Some("TERMS"),
                },
            },
        },
        ExtensionRegistration {
            point: ExtensionPoint::ANALYTICS_SAMPLE,
            rank: 30,
            contribution: Contribution::Analytics {
                value_type: "news",
                component: "analytics-sample-item-content",
                matcher: FieldMatcher {
                    field_name: "contentId",
                    aggregation_type: None,
                },
            },
        },
    ]
}

/// List view templates as seen by the host registry
pub fn list_view_registrations(templates: &TemplateRegistry) -> Vec<ExtensionRegistration> {
    templates
        .entries()
        .map(|entry| ExtensionRegistration {
            point: ExtensionPoint::LIST_VIEWS,
            rank: entry.rank,
            contribution: Contribution::Component {
                id: entry.template.id().to_string(),
                component: entry.component.clone(),
            },
        })
        .collect()
}

/// Everything the news module contributes
pub fn news_registry(can_create_news: bool, templates: &TemplateRegistry) -> ExtensionRegistry {
    let mut registry = ExtensionRegistry::new();
    activity_stream_registrations(can_create_news)
        .into_iter()
        .chain(notification_registrations())
        .chain(analytics_registrations())
        .chain(list_view_registrations(templates))
        .for_each(|r| registry.register(r));
    registry
}

/// Build the registry, asking the server about composer rights when the
/// context is inside a space
pub async fn news_registry_for_context(
    client: &NewsClient,
    templates: &TemplateRegistry,
) -> Result<ExtensionRegistry> {
    let can_create_news = match client.context().current_space() {
        Some(space) => client.can_create_news(Some(space)).await?,
        None => false,
    };

    let registry = news_registry(can_create_news, templates);
    info!(
        "Registered {} news extensions (composer actions: {})",
        registry.len(),
        can_create_news
    );
    Ok(registry)
}

/// Lookup helper for the default list-view entry of a template
pub fn list_view_component(registry: &ExtensionRegistry, template: ViewTemplate) -> Option<String> {
    registry
        .at(ExtensionPoint::LIST_VIEWS)
        .into_iter()
        .find_map(|r| match &r.contribution {
            Contribution::Component { id, component } if id == template.id() => {
                Some(component.clone())
            }
            _ => None,
        })
}
