pub use editor::{EditorView, LinkEditor, PendingSave, SaveGate, SaveOutcome};
pub use error::{LinkError, Result};
pub use gateway::{HttpGateway, PersistenceGateway};
pub use model::*;
pub use registry::PlatformRegistry;
pub use store::LinkCollectionStore;

pub mod editor;
pub mod error;
pub mod gateway;
pub(crate) mod model;
pub mod preview;
pub mod registry;
pub mod reorder;
pub mod store;
pub mod validator;
