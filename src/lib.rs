//! Bincookies: Safari/WebKit `Cookies.binarycookies` encoding/decoding in Rust.
//!
//! The crate provides:
//! - The binary container codec (`binarycookies`)
//! - A format-neutral cookie record model (`model`)
//! - File-oriented helpers (`io`)
//! - An optional CLI (`cli` feature)
//!
//! # Quick Start
//!
//! ```
//! use bincookies::binarycookies::BinaryCookiesFile;
//! use bincookies::model::CookieRecord;
//!
//! let record = CookieRecord {
//!     domain: "example.com".into(),
//!     name: "session".into(),
//!     path: "/".into(),
//!     value: "abc123".into(),
//!     secure: true,
//!     ..Default::default()
//! };
//!
//! let file = BinaryCookiesFile::from_records(vec![record]);
//! let bytes = file.encode().unwrap();
//! let decoded = BinaryCookiesFile::decode(&bytes).unwrap();
//! assert_eq!(decoded.to_records()[0].name, "session");
//! ```

pub mod binarycookies;
pub mod io;
pub mod model;

#[cfg(feature = "cli")]
pub mod cli;
