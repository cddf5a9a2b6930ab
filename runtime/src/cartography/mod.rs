//! Site cartography: turning a sitemap tree into the list of pages to visit.

pub mod sitemap;
