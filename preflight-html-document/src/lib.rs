//! # preflight-html-document
//!
//! Render preflight form pages as fillable HTML.
//!
//! ```rust,ignore
//! use preflight_html_document::{HtmlOptions, form_to_html};
//!
//! let html = form_to_html(&definition, &answers, &HtmlOptions::new());
//! std::fs::write("form.html", html)?;
//! ```

mod generator;

pub use generator::{HtmlOptions, form_to_html, page_to_html};
