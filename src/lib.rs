//! Catalog client, record normalizer and selection notifier behind the `dex`
//! terminal browser.

pub mod artwork;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod models;
pub mod normalize;
pub mod notify;
pub mod toast;
pub mod transport;
pub mod ui;
pub mod utils;

pub use config::{AlertMode, Config};
pub use error::{AlertError, CatalogError, TransportError};
pub use fetch::CatalogClient;
pub use models::{DisplayRecord, RawDetail, StatBlock};
pub use normalize::normalize;
pub use notify::{Alert, AlertHandle, AlertPlatform, Permission, SelectionNotifier};
pub use transport::{HttpTransport, Transport};
