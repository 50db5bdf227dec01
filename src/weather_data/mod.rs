pub mod archive_client;
pub mod error;
pub mod fetcher;

#[cfg(test)]
pub(crate) mod mock_archive;
