//! Turning article URLs into clean text.
//!
//! - [`article`]: fetch a page and isolate its body paragraphs, with caching
//! - [`text`]: pure helpers (`clean_title`, `normalize_html`)
//!
//! Body extraction tries these scopes in order and uses the first one that
//! contains paragraph text:
//!
//! | Strategy | Selector |
//! |----------|----------|
//! | `semantic_article` | `article` |
//! | `content_class` | `div` with an article/post/entry/content class |
//! | `content_id` | `div#article`, `div#content`, `div#main-content` |
//! | whole document | every `p` outside navigation and page chrome |

pub mod article;
pub mod text;

pub use article::{ArticleFetcher, HttpPageSource, PageSource, extract_article_text};
pub use text::{clean_title, normalize_html};
