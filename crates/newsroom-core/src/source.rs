use async_trait::async_trait;
use newsroom_api::{LocaleBundle, LocaleLoader, NewsListClient, NewsPage};

use crate::{list_view::ListQuery, Result};

/// Where a list view gets its pages from
///
/// Views only see this trait, so tests and alternative backends can stand
/// in for the REST client.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NewsSource: Send + Sync {
    async fn page(&self, query: &ListQuery) -> Result<NewsPage>;
}

/// Where views get their translated strings from
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LocaleSource: Send + Sync {
    /// Resource bundle `name` (e.g. [`newsroom_api::NEWS_BUNDLE`]) in `lang`
    async fn bundle(&self, name: &str, lang: &str) -> Result<LocaleBundle>;
}

#[async_trait]
impl NewsSource for NewsListClient {
    async fn page(&self, query: &ListQuery) -> Result<NewsPage> {
        Ok(self
            .list_by_target(&query.target, query.offset, query.limit, query.return_size)
            .await?)
    }
}

#[async_trait]
impl LocaleSource for LocaleLoader {
    async fn bundle(&self, name: &str, lang: &str) -> Result<LocaleBundle> {
        Ok(self.load_bundle(name, lang).await?)
    }
}
