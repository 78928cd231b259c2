pub mod content;
pub mod remote;

pub use self::content::ContentService;
pub use self::remote::{HttpTransport, RemoteClient, RemoteTransport, UploadFile};
