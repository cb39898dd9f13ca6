// Portal-side behaviour of the news module: list policy, views, registrations
pub mod activity;
pub mod config;
pub mod error;
pub mod extensions;
pub mod list_view;
pub mod mount;
pub mod source;
pub mod templates;

pub use activity::{Activity, NewsActivityType};
pub use config::Config;
pub use error::Error;
pub use extensions::{Contribution, ExtensionPoint, ExtensionRegistration, ExtensionRegistry};
pub use list_view::{ListQuery, ListViewParams, ListViewSettings};
pub use mount::{
    ComposerParams, LatestNewsParams, LatestNewsView, MountHandle, NewsComposerView,
    NewsDetailsView, NewsListView, ScheduleNewsDrawer,
};
pub use source::{LocaleSource, NewsSource};
pub use templates::{TemplateEntry, TemplateRegistry, ViewTemplate};

pub type Result<T> = std::result::Result<T, Error>;
