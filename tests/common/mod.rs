mod test_server;

pub use test_server::{SYSTEM_USER_ID, TestServer};
