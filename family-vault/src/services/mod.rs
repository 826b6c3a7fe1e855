pub mod database;
pub mod metrics;
pub mod repository;
pub mod storage;

pub use database::MongoDb;
pub use self::metrics::{get_metrics, init_metrics};
pub use repository::{DocumentRepository, MockRepository, ProfileRepository};
pub use storage::{storage_key, LocalStorage, Storage, StoredFile};
