//! Single-pass tag scanner over a document that may change between events.
//!
//! The scanner never holds a reference to the text: every call to
//! [`Scanner::next_event`] receives the current buffer, and any edit made by
//! the caller in between must be reported through [`Scanner::rebase`]. This
//! lets the engine delete or insert markup right behind the cursor while the
//! scan keeps going.
//!
//! The dialect is deliberately small:
//! - `<!-- ... -->` comments suppress all tag syntax and end at the first
//!   `>` preceded by `--`.
//! - Inside a tag, `'` and `"` toggle quoting; quoted delimiters are ordinary
//!   characters.
//! - Words inside a tag are separated by space, tab, CR, LF, `/`, and `>`.
//!   The first word is the element name, the rest are attribute words.
//! - A `>` outside any tag is ignored.

use foomatic_combo_diagnostics::Span;

use crate::buffer::Splice;
use crate::error::{MarkupFault, ParseError};

/// Tag shape, also its effect on nesting depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    /// `<name ...>`
    Open,
    /// `</name>`
    Close,
    /// `<name ... />`
    Empty,
}

impl TagKind {
    fn depth_change(self) -> i32 {
        match self {
            TagKind::Open => 1,
            TagKind::Close => -1,
            TagKind::Empty => 0,
        }
    }
}

/// Structural event produced by the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Element name of a tag. `kind` is provisional: a tag only turns out to
    /// be [`TagKind::Empty`] once its trailing `/` is seen.
    TagStart {
        /// Element name.
        name: String,
        /// Kind known so far.
        kind: TagKind,
    },
    /// Attribute-like word following the element name.
    Word(String),
    /// Character data between the previous tag's `>` and the current `<`.
    /// Emitted right before [`Event::TagEnd`].
    Text {
        /// First byte of the text.
        start: usize,
        /// One past the last byte.
        end: usize,
    },
    /// The current tag's `>` was consumed and the depth updated.
    TagEnd {
        /// Final kind of the tag.
        kind: TagKind,
    },
}

/// Fatal scan failure, without the document name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanError {
    /// What went wrong.
    pub fault: MarkupFault,
    /// 1-based line number.
    pub line: usize,
    /// Location in the original document.
    pub span: Span,
}

impl ScanError {
    /// Attach the document name.
    pub fn into_parse_error(self, file: &str) -> ParseError {
        ParseError::Markup {
            file: file.to_string(),
            line: self.line,
            fault: self.fault,
            span: self.span,
        }
    }
}

/// Scanner state. See the module docs for the accepted dialect.
#[derive(Debug, Clone)]
pub struct Scanner {
    /// Next byte to examine.
    pos: usize,
    line: usize,
    in_header: bool,
    in_tag: bool,
    in_comment: bool,
    name_found: bool,
    word_start: Option<usize>,
    single_quoted: bool,
    double_quoted: bool,
    kind: TagKind,
    depth: i32,
    /// `<` of the current (or most recent) tag.
    last_tag: usize,
    /// `>` of the tag before the current one.
    last_tag_end: Option<usize>,
    /// Delimiter whose word was just reported but which is not processed yet.
    delimiter: Option<usize>,
    pending_end: Option<TagKind>,
    tag_closed: bool,
    /// Original offset minus current offset at the cursor.
    shift: isize,
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Scanner {
    /// Scanner positioned at the start of a document, inside its header.
    pub fn new() -> Self {
        Self {
            pos: 0,
            line: 1,
            in_header: true,
            in_tag: false,
            in_comment: false,
            name_found: false,
            word_start: None,
            single_quoted: false,
            double_quoted: false,
            kind: TagKind::Open,
            depth: 0,
            last_tag: 0,
            last_tag_end: None,
            delimiter: None,
            pending_end: None,
            tag_closed: false,
            shift: 0,
        }
    }

    // ── Position accessors ──────────────────────────────────────────────

    /// Offset one past the last consumed byte. After a [`Event::TagEnd`]
    /// this is the byte right after the tag's `>`.
    pub fn cursor(&self) -> usize {
        self.pos
    }

    /// Offset of the current tag's `<`.
    pub fn last_tag(&self) -> usize {
        self.last_tag
    }

    /// Offset of the previous tag's `>`, if there is one in the body.
    pub fn last_tag_end(&self) -> Option<usize> {
        self.last_tag_end
    }

    /// Nesting depth, relative to the document root once the body began.
    pub fn depth(&self) -> i32 {
        self.depth
    }

    /// Current 1-based line in the original document.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Whether the root element has not been reached yet.
    pub fn in_header(&self) -> bool {
        self.in_header
    }

    /// Map a current offset near the cursor back to the original document.
    pub fn origin(&self, offset: usize) -> usize {
        (offset as isize + self.shift).max(0) as usize
    }

    /// Span of the current tag in the original document.
    pub fn tag_span(&self) -> Span {
        let start = self.origin(self.last_tag);
        Span::new(start, self.origin(self.pos).max(start))
    }

    // ── Mutation hooks ──────────────────────────────────────────────────

    /// Apply an edit made to the buffer behind the cursor.
    pub fn rebase(&mut self, splice: &Splice) {
        let before = self.pos;
        self.pos = splice.rebase(self.pos);
        self.shift -= self.pos as isize - before as isize;
        self.last_tag = splice.rebase(self.last_tag);
        self.last_tag_end = self.last_tag_end.map(|end| splice.rebase(end));
        self.word_start = self.word_start.map(|start| splice.rebase(start));
        self.delimiter = self.delimiter.map(|at| splice.rebase(at));
    }

    /// The root element was found and the header removed: depth restarts at
    /// zero and there is no previous tag any more.
    pub fn begin_body(&mut self) {
        self.in_header = false;
        self.depth = 0;
        self.last_tag_end = None;
    }

    // ── Scanning ────────────────────────────────────────────────────────

    /// Produce the next event, or `None` at the end of the buffer.
    pub fn next_event(&mut self, text: &str) -> Result<Option<Event>, ScanError> {
        if self.tag_closed {
            self.tag_closed = false;
            self.last_tag_end = self.pos.checked_sub(1);
        }
        let bytes = text.as_bytes();
        loop {
            if let Some(kind) = self.pending_end.take() {
                self.tag_closed = true;
                return Ok(Some(Event::TagEnd { kind }));
            }
            if let Some(at) = self.delimiter.take() {
                if let Some(event) = self.finish_delimiter(bytes, at)? {
                    return Ok(Some(event));
                }
                continue;
            }
            let Some(&byte) = bytes.get(self.pos) else {
                return self.end_of_input().map(|()| None);
            };
            let at = self.pos;
            self.pos += 1;
            match byte {
                b'<' => self.open_angle(bytes, at)?,
                b'\n' | b'/' | b'>' | b' ' | b'\t' | b'\r' => {
                    if byte == b'\n' {
                        self.line += 1;
                    }
                    if self.quoted() || !self.in_tag {
                        continue;
                    }
                    if !self.in_comment
                        && let Some(start) = self.word_start.take()
                    {
                        self.delimiter = Some(at);
                        let word = text[start..at].to_string();
                        if self.name_found {
                            return Ok(Some(Event::Word(word)));
                        }
                        self.name_found = true;
                        return Ok(Some(Event::TagStart {
                            name: word,
                            kind: self.kind,
                        }));
                    }
                    if let Some(event) = self.finish_delimiter(bytes, at)? {
                        return Ok(Some(event));
                    }
                }
                _ => {
                    if self.in_tag && !self.in_comment {
                        match byte {
                            b'\'' => self.single_quoted = !self.single_quoted,
                            b'"' => self.double_quoted = !self.double_quoted,
                            _ => {}
                        }
                        if self.word_start.is_none() {
                            self.word_start = Some(at);
                        }
                    }
                }
            }
        }
    }

    fn quoted(&self) -> bool {
        self.single_quoted || self.double_quoted
    }

    fn open_angle(&mut self, bytes: &[u8], at: usize) -> Result<(), ScanError> {
        if self.quoted() {
            return Ok(());
        }
        if self.in_tag {
            if !self.in_comment && !self.in_header {
                return Err(self.fault(MarkupFault::NestedAngleBracket));
            }
            return Ok(());
        }
        self.in_tag = true;
        self.single_quoted = false;
        self.double_quoted = false;
        if bytes.get(at + 1..at + 4) == Some(b"!--".as_slice()) {
            self.in_comment = true;
            self.kind = TagKind::Empty;
            return Ok(());
        }
        self.name_found = false;
        self.kind = TagKind::Open;
        self.last_tag = at;
        self.word_start = None;
        Ok(())
    }

    /// Handle the `/` or `>` semantics of a delimiter once its word is out.
    fn finish_delimiter(&mut self, bytes: &[u8], at: usize) -> Result<Option<Event>, ScanError> {
        let Some(&byte) = bytes.get(at) else {
            return Ok(None);
        };
        if !self.in_comment && byte == b'/' {
            self.kind = if self.name_found {
                TagKind::Empty
            } else {
                TagKind::Close
            };
        }
        if byte != b'>' {
            return Ok(None);
        }
        if self.in_comment {
            if at >= 2 && &bytes[at - 2..at] == b"--" {
                self.in_comment = false;
                self.in_tag = false;
            }
            return Ok(None);
        }
        self.in_tag = false;
        if !self.in_header && !self.name_found {
            return Err(self.fault(MarkupFault::TagWithoutName));
        }
        self.depth += self.kind.depth_change();
        if !self.in_header && self.depth < 0 {
            return Err(self.fault(MarkupFault::UnbalancedClose));
        }
        let kind = self.kind;
        match self.last_tag_end {
            Some(end) if end < self.last_tag => {
                self.pending_end = Some(kind);
                Ok(Some(Event::Text {
                    start: end + 1,
                    end: self.last_tag,
                }))
            }
            _ => {
                self.tag_closed = true;
                Ok(Some(Event::TagEnd { kind }))
            }
        }
    }

    fn end_of_input(&self) -> Result<(), ScanError> {
        if self.in_tag {
            let fault = if self.in_comment {
                MarkupFault::UnterminatedComment
            } else {
                MarkupFault::UnterminatedTag
            };
            return Err(self.fault(fault));
        }
        if !self.in_header && self.depth != 0 {
            return Err(self.fault(MarkupFault::UnclosedElement));
        }
        Ok(())
    }

    fn fault(&self, fault: MarkupFault) -> ScanError {
        ScanError {
            fault,
            line: self.line,
            span: self.tag_span(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events(text: &str) -> Result<Vec<Event>, ScanError> {
        let mut scanner = Scanner::new();
        scanner.begin_body();
        let mut out = Vec::new();
        while let Some(event) = scanner.next_event(text)? {
            out.push(event);
        }
        Ok(out)
    }

    fn start(name: &str, kind: TagKind) -> Event {
        Event::TagStart {
            name: name.into(),
            kind,
        }
    }

    #[test]
    fn open_attribute_empty_and_close_tags() {
        let evs = events(r#"<a x="1"><b/>t</a>"#).unwrap();
        assert_eq!(
            evs,
            vec![
                start("a", TagKind::Open),
                Event::Word(r#"x="1""#.into()),
                Event::TagEnd {
                    kind: TagKind::Open
                },
                start("b", TagKind::Open),
                Event::Text { start: 9, end: 9 },
                Event::TagEnd {
                    kind: TagKind::Empty
                },
                start("a", TagKind::Close),
                Event::Text { start: 13, end: 14 },
                Event::TagEnd {
                    kind: TagKind::Close
                },
            ]
        );
    }

    #[test]
    fn quoted_delimiters_stay_inside_the_word() {
        let evs = events(r#"<a t="x > y/z"></a>"#).unwrap();
        assert_eq!(evs[1], Event::Word(r#"t="x > y/z""#.into()));
    }

    #[test]
    fn comments_hide_markup() {
        let evs = events("<a><!-- <b> </b> --></a>").unwrap();
        let names: Vec<_> = evs
            .iter()
            .filter_map(|e| match e {
                Event::TagStart { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(names, ["a", "a"]);
    }

    #[test]
    fn comment_is_part_of_the_following_text() {
        let text = "<a>x<!-- c -->y</a>";
        let evs = events(text).unwrap();
        let body = evs
            .iter()
            .find_map(|e| match e {
                Event::Text { start, end } => Some(&text[*start..*end]),
                _ => None,
            })
            .unwrap();
        assert_eq!(body, "x<!-- c -->y");
    }

    #[test]
    fn stray_close_bracket_is_ignored() {
        assert!(events("<a> > </a>").is_ok());
    }

    #[test]
    fn nested_angle_bracket_is_fatal() {
        let err = events("<a\n<b>").unwrap_err();
        assert_eq!(err.fault, MarkupFault::NestedAngleBracket);
        assert_eq!(err.line, 2);
    }

    #[test]
    fn nested_angle_bracket_is_tolerated_in_header() {
        let mut scanner = Scanner::new();
        let text = "<!DOCTYPE x [<!ENTITY y>]>";
        while scanner.next_event(text).unwrap().is_some() {}
    }

    #[test]
    fn nameless_body_tag_is_fatal() {
        let err = events("<a>< ></a>").unwrap_err();
        assert_eq!(err.fault, MarkupFault::TagWithoutName);
    }

    #[test]
    fn unterminated_tag_and_comment_are_fatal() {
        assert_eq!(
            events("<a><b").unwrap_err().fault,
            MarkupFault::UnterminatedTag
        );
        assert_eq!(
            events("<a><!-- x").unwrap_err().fault,
            MarkupFault::UnterminatedComment
        );
    }

    #[test]
    fn unbalanced_and_unclosed_elements_are_fatal() {
        assert_eq!(
            events("<a></a></b>").unwrap_err().fault,
            MarkupFault::UnbalancedClose
        );
        assert_eq!(
            events("<a><b></b>").unwrap_err().fault,
            MarkupFault::UnclosedElement
        );
    }

    #[test]
    fn header_depth_is_not_checked() {
        let mut scanner = Scanner::new();
        let text = "<?xml version=\"1.0\"?>\n<!-- x -->";
        while scanner.next_event(text).unwrap().is_some() {}
        assert!(scanner.in_header());
    }

    #[test]
    fn rebase_keeps_scanning_after_a_deletion() {
        let mut text = String::from("<a><b>x</b><c/></a>");
        let mut scanner = Scanner::new();
        scanner.begin_body();
        let mut names = Vec::new();
        while let Some(event) = scanner.next_event(&text).unwrap() {
            match event {
                Event::TagStart { name, .. } => names.push(name),
                Event::TagEnd {
                    kind: TagKind::Close,
                } if names.last().map(String::as_str) == Some("b") => {
                    let end = scanner.cursor();
                    text.replace_range(3..end, "");
                    scanner.rebase(&Splice::Deleted { start: 3, end });
                }
                _ => {}
            }
        }
        assert_eq!(text, "<a><c/></a>");
        assert_eq!(names, ["a", "b", "b", "c", "a"]);
        assert_eq!(scanner.depth(), 0);
    }

    #[test]
    fn origin_maps_back_across_deletions() {
        let mut scanner = Scanner::new();
        let text = "0123456789<a>";
        scanner.next_event(text).unwrap();
        scanner.rebase(&Splice::Deleted { start: 0, end: 10 });
        assert_eq!(scanner.origin(scanner.cursor()), 13);
    }
}
