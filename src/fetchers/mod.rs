mod request;

pub use request::{Page, RequestFetcher, SERVER_ERROR_MARKER};
