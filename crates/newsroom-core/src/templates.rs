use serde::{Deserialize, Serialize};

/// Visual templates a news list widget can render with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ViewTemplate {
    #[default]
    NewsEmptyTemplate,
    NewsSlider,
    NewsLatest,
    NewsAlert,
    NewsList,
    NewsMosaic,
    NewsStories,
    NewsCards,
}

impl ViewTemplate {
    pub const ALL: [ViewTemplate; 8] = [
        ViewTemplate::NewsEmptyTemplate,
        ViewTemplate::NewsSlider,
        ViewTemplate::NewsLatest,
        ViewTemplate::NewsAlert,
        ViewTemplate::NewsList,
        ViewTemplate::NewsMosaic,
        ViewTemplate::NewsStories,
        ViewTemplate::NewsCards,
    ];

    /// Key stored in the widget preferences
    pub fn id(&self) -> &'static str {
        match self {
            ViewTemplate::NewsEmptyTemplate => "NewsEmptyTemplate",
            ViewTemplate::NewsSlider => "NewsSlider",
            ViewTemplate::NewsLatest => "NewsLatest",
            ViewTemplate::NewsAlert => "NewsAlert",
            ViewTemplate::NewsList => "NewsList",
            ViewTemplate::NewsMosaic => "NewsMosaic",
            ViewTemplate::NewsStories => "NewsStories",
            ViewTemplate::NewsCards => "NewsCards",
        }
    }

    /// Component rendering this template unless a provider overrides it
    pub fn default_component(&self) -> &'static str {
        match self {
            ViewTemplate::NewsEmptyTemplate => "news-empty-template",
            ViewTemplate::NewsSlider => "news-slider-view",
            ViewTemplate::NewsLatest => "news-latest-view",
            ViewTemplate::NewsAlert => "news-alert-view",
            ViewTemplate::NewsList => "news-list-template-view",
            ViewTemplate::NewsMosaic => "news-mosaic-view",
            ViewTemplate::NewsStories => "news-stories-view",
            ViewTemplate::NewsCards => "news-cards-view",
        }
    }

    pub fn default_rank(&self) -> u32 {
        match self {
            ViewTemplate::NewsEmptyTemplate => 10,
            ViewTemplate::NewsSlider => 20,
            ViewTemplate::NewsLatest => 30,
            ViewTemplate::NewsAlert => 40,
            ViewTemplate::NewsList => 50,
            ViewTemplate::NewsMosaic => 60,
            ViewTemplate::NewsStories => 70,
            ViewTemplate::NewsCards => 80,
        }
    }

    /// Parse a stored key; anything unknown renders the empty state
    pub fn from_key_or_empty(key: &str) -> Self {
        key.parse().unwrap_or_default()
    }
}

impl std::fmt::Display for ViewTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl std::str::FromStr for ViewTemplate {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ViewTemplate::ALL
            .into_iter()
            .find(|t| t.id() == s)
            .ok_or_else(|| crate::Error::UnknownTemplate(s.to_string()))
    }
}

/// A renderer registered for a template
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateEntry {
    pub template: ViewTemplate,
    pub component: String,
    pub rank: u32,
}

impl TemplateEntry {
    pub fn builtin(template: ViewTemplate) -> Self {
        Self {
            template,
            component: template.default_component().to_string(),
            rank: template.default_rank(),
        }
    }
}

/// Template -> renderer table, iterated in ascending rank
///
/// Registering a template that is already present replaces its renderer.
/// Entries with equal rank keep registration order.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    entries: Vec<TemplateEntry>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The eight built-in templates
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for template in ViewTemplate::ALL {
            registry.register(TemplateEntry::builtin(template));
        }
        registry
    }

    pub fn register(&mut self, entry: TemplateEntry) {
        match self.entries.iter_mut().find(|e| e.template == entry.template) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
        // stable sort, so equal ranks stay in registration order
        self.entries.sort_by_key(|e| e.rank);
    }

    pub fn resolve(&self, template: ViewTemplate) -> Option<&TemplateEntry> {
        self.entries.iter().find(|e| e.template == template)
    }

    pub fn entries(&self) -> impl Iterator<Item = &TemplateEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
