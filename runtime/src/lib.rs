//! foldscan — which CSS classes does a site render above the fold?
//!
//! Resolves a sitemap into page URLs, loads each page in headless Chromium at
//! a fixed viewport, records the classes of elements fully inside that
//! viewport, and writes the sorted union as `<host>-CSS-ATF.csv`.

pub mod acquisition;
pub mod cartography;
pub mod cli;
pub mod config;
pub mod export;
pub mod extraction;
pub mod pipeline;
pub mod renderer;
