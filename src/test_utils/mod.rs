#![allow(missing_docs)]

pub(crate) mod html;
pub(crate) mod transactions_service;

pub(crate) use html::{assert_valid_html, parse_html_document, text_of};
pub(crate) use transactions_service::serve_transactions;
