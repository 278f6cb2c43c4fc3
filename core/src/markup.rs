use crate::tokenizer::collapse_whitespace;
use regex::Regex;
use scraper::{ElementRef, Html, Node};

/// Element whose open/close events bound a content scope.
pub const SCOPE_CONTAINER_TAG: &str = "div";
/// Value of a `<meta name=...>` attribute that carries the document title.
pub const TITLE_META_NAME: &str = "Section-Title";

/// One step of a document scan. Attribute names are lowercase, as the HTML
/// parser reports them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupEvent {
    Start { name: String, attrs: Vec<(String, String)> },
    Text(String),
    End { name: String },
}

impl MarkupEvent {
    pub fn start(name: &str, attrs: &[(&str, &str)]) -> Self {
        MarkupEvent::Start {
            name: name.to_string(),
            attrs: attrs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
        }
    }

    pub fn end(name: &str) -> Self {
        MarkupEvent::End { name: name.to_string() }
    }

    pub fn text(text: &str) -> Self {
        MarkupEvent::Text(text.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentFragment {
    pub text: String,
    pub element_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedContent {
    pub fragments: Vec<ContentFragment>,
    pub title: Option<String>,
}

/// Parse `html` leniently and flatten the resulting tree into start/text/end
/// events in document order. Unclosed tags and missing structure are repaired
/// by the parser, so every start has a matching end.
pub fn scan(html: &str) -> Vec<MarkupEvent> {
    let document = Html::parse_document(html);
    let mut events = Vec::new();
    walk(document.root_element(), &mut events);
    events
}

fn walk(element: ElementRef<'_>, events: &mut Vec<MarkupEvent>) {
    let value = element.value();
    let name = value.name().to_string();
    events.push(MarkupEvent::Start {
        name: name.clone(),
        attrs: value.attrs().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
    });

    for child in element.children() {
        match child.value() {
            Node::Text(text) => events.push(MarkupEvent::Text(text.to_string())),
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    walk(child_element, events);
                }
            }
            _ => {}
        }
    }

    events.push(MarkupEvent::End { name });
}

/// Single-pass state machine over [`MarkupEvent`]s that keeps the text inside
/// content scopes, each piece tagged with its innermost enclosing element.
#[derive(Debug)]
pub struct ContentExtractor<'a> {
    scope: &'a Regex,
    element_stack: Vec<String>,
    capturing: bool,
    scope_depth: usize,
    content: ExtractedContent,
}

impl<'a> ContentExtractor<'a> {
    pub fn new(scope: &'a Regex) -> Self {
        Self {
            scope,
            element_stack: Vec::new(),
            capturing: false,
            scope_depth: 0,
            content: ExtractedContent::default(),
        }
    }

    pub fn feed(&mut self, event: &MarkupEvent) {
        match event {
            MarkupEvent::Start { name, attrs } => self.start_element(name, attrs),
            MarkupEvent::Text(text) => self.text(text),
            MarkupEvent::End { name } => self.end_element(name),
        }
    }

    pub fn is_capturing(&self) -> bool {
        self.capturing
    }

    pub fn finish(self) -> ExtractedContent {
        self.content
    }

    fn start_element(&mut self, name: &str, attrs: &[(String, String)]) {
        self.element_stack.push(name.to_string());

        if name.eq_ignore_ascii_case("meta") {
            let is_title = attr(attrs, "name").is_some_and(|v| v.eq_ignore_ascii_case(TITLE_META_NAME));
            if is_title {
                if let Some(content) = attr(attrs, "content") {
                    self.content.title = Some(collapse_whitespace(content));
                }
            }
        }

        if attr(attrs, "id").is_some_and(|id| self.scope.is_match(id)) {
            self.capturing = true;
        }

        if name.eq_ignore_ascii_case(SCOPE_CONTAINER_TAG) && self.capturing {
            self.scope_depth += 1;
        }
    }

    fn text(&mut self, text: &str) {
        if !self.capturing {
            return;
        }
        let text = collapse_whitespace(text);
        if text.is_empty() {
            return;
        }
        let element_name = self.element_stack.last().cloned().unwrap_or_default();
        self.content.fragments.push(ContentFragment { text, element_name });
    }

    fn end_element(&mut self, name: &str) {
        self.element_stack.pop();

        if name.eq_ignore_ascii_case(SCOPE_CONTAINER_TAG) && self.capturing {
            // a scope opened by a non-container element never incremented the
            // depth, so the first container close ends it
            self.scope_depth = self.scope_depth.saturating_sub(1);
            if self.scope_depth == 0 {
                self.capturing = false;
            }
        }
    }
}

fn attr<'v>(attrs: &'v [(String, String)], key: &str) -> Option<&'v str> {
    attrs
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, v)| v.as_str())
}

/// Run the extractor over an event sequence.
pub fn extract_events<'e, I>(events: I, scope: &Regex) -> ExtractedContent
where
    I: IntoIterator<Item = &'e MarkupEvent>,
{
    let mut extractor = ContentExtractor::new(scope);
    for event in events {
        extractor.feed(event);
    }
    extractor.finish()
}

/// Extract content fragments and title from an HTML document.
pub fn extract(html: &str, scope: &Regex) -> ExtractedContent {
    extract_events(&scan(html), scope)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::content_scope_regex;

    fn scope() -> Regex {
        content_scope_regex("content").unwrap()
    }

    fn texts(content: &ExtractedContent) -> Vec<(&str, &str)> {
        content
            .fragments
            .iter()
            .map(|f| (f.text.as_str(), f.element_name.as_str()))
            .collect()
    }

    #[test]
    fn captures_only_inside_scope() {
        let html = r#"<html><body>
            <div id="nav">skip me</div>
            <div id="content"><h1>Title  here</h1><p>Some <b>bold</b> text</p></div>
            <p>after</p>
        </body></html>"#;
        let content = extract(html, &scope());
        assert_eq!(
            texts(&content),
            vec![("Title here", "h1"), ("Some", "p"), ("bold", "b"), ("text", "p")]
        );
    }

    #[test]
    fn ids_containing_the_scope_name_do_not_capture() {
        let html = r#"<div id="table-of-contents"><p>sidebar</p></div>
            <div id="content-nav"><p>menu</p></div>
            <div id="content"><p>body</p></div>"#;
        let content = extract(html, &scope());
        assert_eq!(texts(&content), vec![("body", "p")]);
    }

    #[test]
    fn nested_containers_keep_scope_open() {
        let html = r#"<div id="content"><div><p>one</p></div><p>two</p></div><p>three</p>"#;
        let content = extract(html, &scope());
        assert_eq!(texts(&content), vec![("one", "p"), ("two", "p")]);
    }

    #[test]
    fn reads_section_title_meta() {
        let html = r#"<html><head><META NAME="section-title" content="  Getting
            Started "></head><body></body></html>"#;
        let content = extract(html, &scope());
        assert_eq!(content.title.as_deref(), Some("Getting Started"));
        assert!(content.fragments.is_empty());
    }

    #[test]
    fn title_keeps_non_breaking_spaces() {
        let html = "<head><meta name=\"Section-Title\" content=\"&nbsp;Intro \"></head>";
        let content = extract(html, &scope());
        assert_eq!(content.title.as_deref(), Some("\u{00A0}Intro"));
    }

    #[test]
    fn tolerates_unclosed_tags() {
        let html = r#"<div id="content"><p>first<p>second<b>bold"#;
        let content = extract(html, &scope());
        assert_eq!(texts(&content), vec![("first", "p"), ("second", "p"), ("bold", "b")]);
    }

    #[test]
    fn non_container_scope_ends_at_next_container_close() {
        let events = vec![
            MarkupEvent::start("body", &[]),
            MarkupEvent::start("section", &[("id", "content")]),
            MarkupEvent::text("kept"),
            MarkupEvent::end("section"),
            MarkupEvent::text("still kept"),
            MarkupEvent::start("div", &[]),
            MarkupEvent::text("inside div"),
            MarkupEvent::end("div"),
            MarkupEvent::text("dropped"),
            MarkupEvent::end("body"),
        ];
        let content = extract_events(&events, &scope());
        assert_eq!(
            texts(&content),
            vec![("kept", "section"), ("still kept", "body"), ("inside div", "div")]
        );
    }

    #[test]
    fn container_close_at_zero_depth_stops_capture() {
        let scope = scope();
        let mut extractor = ContentExtractor::new(&scope);
        extractor.feed(&MarkupEvent::start("span", &[("id", "content")]));
        assert!(extractor.is_capturing());
        extractor.feed(&MarkupEvent::start("p", &[]));
        extractor.feed(&MarkupEvent::end("p"));
        assert!(extractor.is_capturing());
        extractor.feed(&MarkupEvent::end("div"));
        assert!(!extractor.is_capturing());
    }

    #[test]
    fn whitespace_only_text_is_ignored() {
        let events = vec![
            MarkupEvent::start("div", &[("id", "content")]),
            MarkupEvent::text("  \n\t "),
            MarkupEvent::end("div"),
        ];
        assert!(extract_events(&events, &scope()).fragments.is_empty());
    }
}
