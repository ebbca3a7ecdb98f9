pub mod request;
pub(crate) mod serde_utils;
