// REST clients for the portal news/content backend
pub mod context;
pub mod error;
pub mod http;
pub mod locale;
pub mod models;
pub mod news;
pub mod news_list;
pub mod targeting;
pub mod undo;

// Re-export common types
pub use context::{ApiVersion, PortalContext};
pub use error::{ApiError, Result};
pub use http::{Credentials, HttpSession};
pub use locale::{LocaleBundle, LocaleLoader, NEWS_BUNDLE, NOTES_BUNDLE};
pub use models::{
    Language, News, NewsObjectType, NewsPage, NewsTranslation, NewsUpdateType, PublicationState,
    Space, SpacePage, SpaceSuggestion, Target,
};
pub use news::{FetchOptions, FetchOutcome, NewsClient, NewsQuery};
pub use news_list::NewsListClient;
pub use targeting::TargetingClient;
pub use undo::{EntityKind, PendingDeletion, PendingDeletions, SharedUndoStore};
