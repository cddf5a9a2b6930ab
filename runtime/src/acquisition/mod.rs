//! Network acquisition: HTTP fetches for sitemap documents.

pub mod http_client;
