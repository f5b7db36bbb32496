//! Collector implementations.
//!
//! One module per collector kind. Every collector is a bounded operation:
//! one outbound network call or one filesystem read per invocation, with a
//! deterministic use of the request policy (throttle + identity) before any
//! network call. A collector never raises past its own boundary; every
//! underlying failure is converted into a failure-tagged
//! [`CollectorOutcome`](crate::models::CollectorOutcome).

/// Paginated web search (title + link extraction)
pub mod search;

/// Single-page scraping (title, meta tags, text, outbound links)
pub mod scrape;

/// Domain lookups: WHOIS and DNS by record type
pub mod domain;

/// IP geolocation
pub mod geoip;

/// Internet-wide device search
pub mod device_search;

/// Local file metadata (PDF info dictionary / image EXIF)
pub mod filemeta;

/// Optional text recognition over local images
pub mod ocr;
