pub mod config;
pub mod logging;

pub mod checksum;
pub mod client;
pub mod error;
pub mod inbox;
pub mod naming;
pub mod receiver;
pub mod server;
pub mod storage;

pub use error::UploadError;
pub use inbox::Inbox;
pub use receiver::UploadOutcome;
