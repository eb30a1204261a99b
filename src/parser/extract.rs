use std::panic::{self, AssertUnwindSafe};

use scraper::{ElementRef, Html};
use tracing::warn;

use super::lexicon::Lexicon;

/// Body text and page title pulled out of one markup document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extracted {
    pub body: String,
    pub title: Option<String>,
    pub saw_article: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    Script,
    Style,
    Nav,
    Aside,
    Article,
    Head,
}

impl Region {
    fn from_tag(tag: &str) -> Option<Region> {
        match tag {
            "script" => Some(Region::Script),
            "style" => Some(Region::Style),
            "nav" => Some(Region::Nav),
            "aside" => Some(Region::Aside),
            "article" | "main" => Some(Region::Article),
            "head" | "title" => Some(Region::Head),
            _ => None,
        }
    }

    fn hides_text(self) -> bool {
        !matches!(self, Region::Article)
    }

    fn hides_breaks(self) -> bool {
        matches!(self, Region::Nav | Region::Aside)
    }
}

enum Child<'a> {
    Element(ElementRef<'a>),
    Text(&'a str),
}

fn children_of(el: ElementRef<'_>) -> Vec<Child<'_>> {
    el.children()
        .filter_map(|node| match ElementRef::wrap(node) {
            Some(child) => Some(Child::Element(child)),
            None => node.value().as_text().map(|t| Child::Text(&**t)),
        })
        .collect()
}

struct Walker<'l> {
    lexicon: &'l Lexicon,
    regions: Vec<Region>,
    parts: Vec<String>,
    title: Option<String>,
    saw_article: bool,
}

impl<'l> Walker<'l> {
    fn new(lexicon: &'l Lexicon) -> Self {
        Walker {
            lexicon,
            regions: Vec::new(),
            parts: Vec::new(),
            title: None,
            saw_article: false,
        }
    }

    fn open(&mut self, el: ElementRef<'_>) {
        let tag = el.value().name();
        if tag == "title" && self.title.is_none() {
            let text = el.text().collect::<String>();
            let text = text.trim();
            if !text.is_empty() {
                self.title = Some(text.to_string());
            }
        }
        if let Some(region) = Region::from_tag(tag) {
            if region == Region::Article {
                self.saw_article = true;
            }
            self.regions.push(region);
        }
    }

    fn close(&mut self, tag: &str) {
        match Region::from_tag(tag) {
            // Innermost matching region only; outer ones stay active.
            Some(region) => {
                if let Some(pos) = self.regions.iter().rposition(|r| *r == region) {
                    self.regions.remove(pos);
                }
            }
            None if matches!(tag, "p" | "br") => {
                if !self.regions.iter().any(|r| r.hides_breaks()) {
                    self.parts.push("\n".to_string());
                }
            }
            None => {}
        }
    }

    fn data(&mut self, raw: &str) {
        if self.regions.iter().any(|r| r.hides_text()) {
            return;
        }
        let text = raw.trim();
        if !text.is_empty() && !self.lexicon.is_noise(text) {
            self.parts.push(text.to_string());
        }
    }

    fn walk(&mut self, root: ElementRef<'_>) {
        self.open(root);
        let mut stack = vec![(root.value().name(), children_of(root).into_iter())];
        loop {
            let next = match stack.last_mut() {
                Some((_, children)) => children.next(),
                None => break,
            };
            match next {
                Some(Child::Element(el)) => {
                    self.open(el);
                    stack.push((el.value().name(), children_of(el).into_iter()));
                }
                Some(Child::Text(text)) => self.data(text),
                None => {
                    if let Some((tag, _)) = stack.pop() {
                        self.close(tag);
                    }
                }
            }
        }
    }

    /// Separators are pushed before filtering finishes, so a second pass
    /// drops blank lines and any line that still carries a noise keyword.
    fn finish(self) -> Extracted {
        let joined = self.parts.join("\n");
        let body = joined
            .trim()
            .split('\n')
            .filter(|line| !line.trim().is_empty() && !self.lexicon.is_noise(line))
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string();
        Extracted {
            body,
            title: self.title,
            saw_article: self.saw_article,
        }
    }
}

fn walk_document(markup: &str, lexicon: &Lexicon) -> Extracted {
    let doc = Html::parse_document(markup);
    let mut walker = Walker::new(lexicon);
    walker.walk(doc.root_element());
    walker.finish()
}

fn guarded<F>(source: &str, f: F) -> Extracted
where
    F: FnOnce() -> Extracted,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(extracted) => extracted,
        Err(_) => {
            warn!("Text extraction failed for {}, continuing with empty body", source);
            Extracted::default()
        }
    }
}

/// Extract denoised body text. Never fails: a parser fault yields an empty body.
pub fn extract_text(source: &str, markup: &str, lexicon: &Lexicon) -> Extracted {
    guarded(source, || walk_document(markup, lexicon))
}
