mod http;

use std::future::Future;

pub use http::HttpGateway;

use crate::error::Result;
use crate::model::StoredLink;

/// Backend that stores a user's ordered link list.
///
/// `submit` receives the links in display order and answers with the list
/// the backend now holds, which the editor adopts as its new baseline.
pub trait PersistenceGateway {
    fn submit(&self, links: &[StoredLink]) -> impl Future<Output = Result<Vec<StoredLink>>> + Send;
}
