// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTML text extraction
//!
//! Selects the readable part of a page with an ordered rule chain; the
//! first rule that matches supplies the text:
//! 1. Wikipedia article body (`#mw-content-text`)
//! 2. Generic main-content containers (`<main>`, `[role='main']`, `<article>`,
//!    common content class and id names), first match in document order
//! 3. `<body>` with navigation, header, footer and menu elements removed

use scraper::{ElementRef, Html, Node, Selector};
use std::fmt;

use super::types::CrawlError;

/// Bytes inspected when deciding whether a body is binary
const BINARY_SNIFF_LEN: usize = 1024;

/// Share of undecodable characters (1 in N) that marks the sniff window as binary
const REPLACEMENT_RATIO: usize = 8;

const ENCYCLOPEDIA_SELECTOR: &str = "#mw-content-text";

const MAIN_CONTENT_SELECTOR: &str = "main, [role='main'], article, \
    #main-content, #maincontent, #main, #content, \
    .main-content, .post-content, .article-content, .article-body, \
    .entry-content, .story-body, .content";

const NAVIGATION_SELECTOR: &str = "nav, header, footer, aside, menu, \
    [role='navigation'], [role='banner'], [role='contentinfo'], [role='menu'], \
    .nav, .navbar, .navigation, .menu, .header, .footer, .sidebar, .breadcrumb, \
    #nav, #navbar, #navigation, #menu, #header, #footer, #sidebar";

/// Elements whose text is never visible
const HIDDEN_TAGS: &[&str] = &["script", "style", "noscript", "template"];

/// Elements that break the text flow
const BLOCK_TAGS: &[&str] = &[
    "p", "div", "br", "li", "ul", "ol", "tr", "td", "th", "table", "h1", "h2", "h3", "h4",
    "h5", "h6", "section", "article", "main", "blockquote", "pre", "dd", "dt", "hr",
];

/// Which content rule produced the extracted text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentRule {
    Encyclopedia,
    MainContent,
    BodyWithoutNavigation,
}

impl fmt::Display for ContentRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Encyclopedia => "encyclopedia",
            Self::MainContent => "main_content",
            Self::BodyWithoutNavigation => "body_without_navigation",
        };
        f.write_str(name)
    }
}

type RuleFn = fn(&mut Html) -> Option<String>;

/// Evaluated in order, first match wins
const CONTENT_RULES: &[(ContentRule, RuleFn)] = &[
    (ContentRule::Encyclopedia, encyclopedia_text),
    (ContentRule::MainContent, main_content_text),
    (ContentRule::BodyWithoutNavigation, body_without_navigation_text),
];

/// Element counts of a parsed page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageStats {
    pub elements: usize,
    pub links: usize,
    pub images: usize,
    pub paragraphs: usize,
    pub divs: usize,
    pub spans: usize,
    pub headers: usize,
    pub forms: usize,
}

impl PageStats {
    fn collect(document: &Html) -> Self {
        Self {
            elements: count(document, "*"),
            links: count(document, "a"),
            images: count(document, "img"),
            paragraphs: count(document, "p"),
            divs: count(document, "div"),
            spans: count(document, "span"),
            headers: count(document, "h1, h2, h3, h4, h5, h6"),
            forms: count(document, "form"),
        }
    }
}

/// Result of extracting a page
#[derive(Debug, Clone)]
pub struct ExtractedPage {
    /// Whitespace-normalized visible text, original case
    pub text: String,
    /// Serialized parse tree
    pub raw_html: String,
    /// Rule that selected `text`
    pub rule: ContentRule,
    pub stats: PageStats,
}

/// Parse decoded HTML bytes and extract the main readable text
pub fn extract_text(html_bytes: &[u8]) -> Result<ExtractedPage, CrawlError> {
    let sniff = &html_bytes[..html_bytes.len().min(BINARY_SNIFF_LEN)];
    if looks_binary(sniff) {
        return Err(CrawlError::Parse(
            "response body is binary, not markup".to_string(),
        ));
    }

    let source = String::from_utf8_lossy(html_bytes);
    let mut document = Html::parse_document(&source);

    let raw_html = serialize(&document).unwrap_or_else(|| source.to_string());
    let stats = PageStats::collect(&document);

    for (rule, apply) in CONTENT_RULES {
        if let Some(text) = apply(&mut document) {
            return Ok(ExtractedPage {
                text,
                raw_html,
                rule: *rule,
                stats,
            });
        }
    }

    // The body rule always matches; a document without a body still has a root.
    Ok(ExtractedPage {
        text: visible_text(document.root_element()),
        raw_html,
        rule: ContentRule::BodyWithoutNavigation,
        stats,
    })
}

/// Control bytes that never occur in text content
fn is_binary_byte(byte: u8) -> bool {
    matches!(byte, 0x00..=0x08 | 0x0B | 0x0E..=0x1A | 0x1C..=0x1F)
}

/// Binary if the window holds a control byte or is mostly invalid UTF-8.
///
/// Legacy single-byte encodings stay below the replacement threshold, so
/// they are still parsed lossily.
fn looks_binary(window: &[u8]) -> bool {
    if window.iter().copied().any(is_binary_byte) {
        return true;
    }
    let text = String::from_utf8_lossy(window);
    let chars = text.chars().count();
    let replaced = text.chars().filter(|&c| c == char::REPLACEMENT_CHARACTER).count();
    replaced > 1 && replaced * REPLACEMENT_RATIO > chars
}

fn encyclopedia_text(document: &mut Html) -> Option<String> {
    first_match_text(document, ENCYCLOPEDIA_SELECTOR)
}

fn main_content_text(document: &mut Html) -> Option<String> {
    first_match_text(document, MAIN_CONTENT_SELECTOR)
}

fn body_without_navigation_text(document: &mut Html) -> Option<String> {
    let navigation = Selector::parse(NAVIGATION_SELECTOR).ok()?;
    let noisy: Vec<_> = document.select(&navigation).map(|el| el.id()).collect();
    for id in noisy {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }

    first_match_text(document, "body")
}

fn first_match_text(document: &Html, css: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;
    document.select(&selector).next().map(visible_text)
}

/// Concatenate the visible text under `element`, collapsing whitespace
fn visible_text(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    for node in element.descendants() {
        match node.value() {
            Node::Text(text) => {
                let hidden = node
                    .ancestors()
                    .take_while(|ancestor| ancestor.id() != element.id())
                    .filter_map(ElementRef::wrap)
                    .any(|ancestor| HIDDEN_TAGS.contains(&ancestor.value().name()));
                if !hidden {
                    out.push_str(text);
                }
            }
            Node::Element(el) if BLOCK_TAGS.contains(&el.name()) => out.push(' '),
            _ => {}
        }
    }
    clean_text(&out)
}

/// Normalize whitespace runs to single spaces
fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn serialize(document: &Html) -> Option<String> {
    let html = document.html();
    if html.is_empty() {
        None
    } else {
        Some(html)
    }
}

fn count(document: &Html, css: &str) -> usize {
    Selector::parse(css)
        .map(|selector| document.select(&selector).count())
        .unwrap_or(0)
}
