//! The parse-and-rewrite loop shared by all five modes.
//!
//! [`parse_document`] drives a [`Scanner`] over an owned [`Buffer`] and
//! hands every event to the handler of the active [`Mode`]. Handlers edit
//! the buffer through [`Editor`], which keeps the scanner consistent with
//! each splice.

use foomatic_combo_diagnostics::Diagnostic;
use tracing::{debug, trace};

use crate::buffer::{Buffer, Splice};
use crate::context::Session;
use crate::error::ParseError;
use crate::modes::{CatalogDriver, CatalogPrinter, Device, Driver, OptionDoc};
use crate::scanner::{Event, Scanner, TagKind};

/// Which kind of document is being parsed, and for what.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Device document of a single combination.
    Device,
    /// Driver document of a single combination.
    Driver,
    /// Option document of a single combination.
    Option,
    /// Driver document during the first catalog pass.
    CatalogDriver,
    /// Device document during the second catalog pass.
    CatalogPrinter,
}

impl Mode {
    /// Name of the document root element.
    pub fn root(self) -> &'static str {
        match self {
            Mode::Device | Mode::CatalogPrinter => "printer",
            Mode::Driver | Mode::CatalogDriver => "driver",
            Mode::Option => "option",
        }
    }
}

/// Result of parsing one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOutcome {
    /// Rewritten document, `None` when it does not apply.
    pub document: Option<String>,
    /// The document's own lists confirm the requested combination.
    pub confirmed: bool,
    /// Warnings raised while parsing.
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseOutcome {
    /// Whether the document was dropped.
    pub fn is_discarded(&self) -> bool {
        self.document.is_none()
    }
}

/// Whether the document survives the event just handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Discard,
}

/// The tag whose `>` was just consumed.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Closed<'a> {
    pub(crate) name: &'a str,
    pub(crate) kind: TagKind,
    /// Character data between the previous tag and this one.
    pub(crate) body: &'a str,
}

/// Parse `text` in `mode`, rewriting it for the request held by `session`.
///
/// `file` names the document in diagnostics. Structural errors and a device
/// document without make or model are fatal.
pub fn parse_document(
    mode: Mode,
    text: impl Into<String>,
    file: &str,
    session: &mut Session,
) -> Result<ParseOutcome, ParseError> {
    debug!(?mode, file, "parsing document");
    let mut editor = Editor::new(text, file);
    let mut handler = Handler::new(mode, session);
    let mut tag = String::new();
    let mut body = String::new();

    while let Some(event) = editor.next_event()? {
        let flow = match event {
            Event::TagStart { name, kind } => {
                trace!(%name, ?kind, "tag");
                let flow = handler.tag_start(&mut editor, session, &name, kind);
                tag = name;
                flow
            }
            Event::Word(word) => {
                trace!(%word, "attribute word");
                handler.word(session, &tag, &word);
                Flow::Continue
            }
            Event::Text { start, end } => {
                body.clear();
                body.push_str(editor.text(start, end));
                Flow::Continue
            }
            Event::TagEnd { kind } => {
                let closed = Closed {
                    name: &tag,
                    kind,
                    body: &body,
                };
                handler.tag_end(&mut editor, session, closed)
            }
        };
        if flow == Flow::Discard {
            debug!(file, "document does not apply");
            return Ok(ParseOutcome {
                document: None,
                confirmed: false,
                diagnostics: editor.diagnostics,
            });
        }
    }

    let confirmed = handler.finish(&mut editor, session)?;
    Ok(editor.into_outcome(confirmed))
}

// ── Editor ──────────────────────────────────────────────────────────────

/// Buffer plus scanner, edited together.
#[derive(Debug)]
pub(crate) struct Editor<'f> {
    buffer: Buffer,
    scanner: Scanner,
    file: &'f str,
    discarded: bool,
    diagnostics: Vec<Diagnostic>,
}

impl<'f> Editor<'f> {
    pub(crate) fn new(text: impl Into<String>, file: &'f str) -> Self {
        Self {
            buffer: Buffer::new(text),
            scanner: Scanner::new(),
            file,
            discarded: false,
            diagnostics: Vec::new(),
        }
    }

    fn next_event(&mut self) -> Result<Option<Event>, ParseError> {
        self.scanner
            .next_event(self.buffer.as_str())
            .map_err(|err| err.into_parse_error(self.file))
    }

    /// Current text of `[start, end)`.
    pub(crate) fn text(&self, start: usize, end: usize) -> &str {
        self.buffer.as_str().get(start..end).unwrap_or_default()
    }

    /// `<` of the current tag.
    pub(crate) fn last_tag(&self) -> usize {
        self.scanner.last_tag()
    }

    /// First byte after the previous tag's `>`, so that cutting from here
    /// also takes the whitespace leading up to the current tag.
    pub(crate) fn after_last_tag(&self) -> usize {
        self.scanner
            .last_tag_end()
            .map_or(self.scanner.last_tag(), |end| end + 1)
    }

    /// Byte after the `>` just consumed.
    pub(crate) fn cursor(&self) -> usize {
        self.scanner.cursor()
    }

    pub(crate) fn depth(&self) -> i32 {
        self.scanner.depth()
    }

    pub(crate) fn in_header(&self) -> bool {
        self.scanner.in_header()
    }

    /// Drop everything before the root tag and restart depth counting.
    pub(crate) fn remove_header(&mut self) -> Splice {
        let splice = self.buffer.delete_span(0, self.scanner.last_tag());
        trace!(removed = -splice.delta(), "removing document header");
        self.scanner.rebase(&splice);
        self.scanner.begin_body();
        splice
    }

    /// Cut from `start` through the tag just closed.
    pub(crate) fn delete_to_cursor(&mut self, start: usize) -> Splice {
        let splice = self.buffer.delete_span(start, self.scanner.cursor());
        self.scanner.rebase(&splice);
        splice
    }

    pub(crate) fn insert(&mut self, at: usize, text: &str) -> Splice {
        let splice = self.buffer.insert_before(at, text);
        self.scanner.rebase(&splice);
        splice
    }

    /// Swap the whole document once scanning is over.
    pub(crate) fn replace_all(&mut self, text: String) {
        self.buffer.replace_all(text);
    }

    /// Drop the document once scanning is over.
    pub(crate) fn discard(&mut self) {
        self.discarded = true;
    }

    /// Record a warning located at the current tag.
    pub(crate) fn warn(&mut self, code: &'static str, message: String) {
        tracing::warn!(file = self.file, line = self.scanner.line(), "{message}");
        let diagnostic = Diagnostic::warn(code, message, Some(self.scanner.tag_span()))
            .in_document(self.file, Some(self.scanner.line()));
        self.diagnostics.push(diagnostic);
    }

    pub(crate) fn file(&self) -> &str {
        self.file
    }

    fn into_outcome(self, confirmed: bool) -> ParseOutcome {
        ParseOutcome {
            document: (!self.discarded).then(|| self.buffer.into_string()),
            confirmed,
            diagnostics: self.diagnostics,
        }
    }
}

// ── Mode dispatch ───────────────────────────────────────────────────────

#[derive(Debug)]
enum Handler {
    Device(Device),
    Driver(Driver),
    Option(OptionDoc),
    CatalogDriver(CatalogDriver),
    CatalogPrinter(CatalogPrinter),
}

impl Handler {
    fn new(mode: Mode, session: &mut Session) -> Self {
        match mode {
            Mode::Device => Handler::Device(Device::default()),
            Mode::Driver => {
                session.no_pjl = false;
                Handler::Driver(Driver::default())
            }
            Mode::Option => Handler::Option(OptionDoc::default()),
            Mode::CatalogDriver => Handler::CatalogDriver(CatalogDriver::default()),
            Mode::CatalogPrinter => Handler::CatalogPrinter(CatalogPrinter::default()),
        }
    }

    fn tag_start(
        &mut self,
        ed: &mut Editor<'_>,
        session: &mut Session,
        name: &str,
        kind: TagKind,
    ) -> Flow {
        match self {
            Handler::Device(h) => h.tag_start(ed, name, kind),
            Handler::Driver(h) => h.tag_start(ed, session, name, kind),
            Handler::Option(h) => h.tag_start(ed, session, name, kind),
            Handler::CatalogDriver(h) => h.tag_start(ed, name, kind),
            Handler::CatalogPrinter(h) => h.tag_start(ed, name, kind),
        }
    }

    fn word(&mut self, session: &Session, tag: &str, word: &str) {
        match self {
            Handler::Option(h) => h.word(tag, word),
            Handler::CatalogDriver(h) => h.word(tag, word),
            Handler::CatalogPrinter(h) => h.word(session, tag, word),
            Handler::Device(_) | Handler::Driver(_) => {}
        }
    }

    fn tag_end(&mut self, ed: &mut Editor<'_>, session: &mut Session, tag: Closed<'_>) -> Flow {
        match self {
            Handler::Device(h) => h.tag_end(ed, session, tag),
            Handler::Driver(h) => h.tag_end(ed, session, tag),
            Handler::Option(h) => h.tag_end(ed, session, tag),
            Handler::CatalogDriver(h) => h.tag_end(ed, session, tag),
            Handler::CatalogPrinter(h) => h.tag_end(ed, session, tag),
        }
    }

    fn finish(self, ed: &mut Editor<'_>, session: &mut Session) -> Result<bool, ParseError> {
        match self {
            Handler::Device(h) => h.finish(ed, session),
            Handler::Driver(h) => Ok(h.finish()),
            Handler::Option(_) => Ok(false),
            Handler::CatalogDriver(h) => {
                h.finish(ed, session);
                Ok(false)
            }
            Handler::CatalogPrinter(h) => {
                h.finish(ed, session);
                Ok(false)
            }
        }
    }
}

/// Strip the whitespace the database puts in front of text values.
pub(crate) fn trim_leading(text: &str) -> &str {
    text.trim_start_matches([' ', '\n', '\r', '\t'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn after_last_tag_includes_leading_whitespace() {
        let text = "<a>\n  <b>x</b></a>";
        let mut ed = Editor::new(text, "t.xml");
        ed.scanner.begin_body();
        // <a> name, <a> end, <b> name.
        ed.next_event().unwrap();
        ed.next_event().unwrap();
        ed.next_event().unwrap();
        assert_eq!(ed.last_tag(), 6);
        assert_eq!(ed.after_last_tag(), 3);
    }

    #[test]
    fn header_removal_keeps_the_root() {
        let mut ed = Editor::new("<?xml version=\"1.0\"?>\n<printer>\n</printer>\n", "t.xml");
        loop {
            if let Some(Event::TagStart { name, .. }) = ed.next_event().unwrap()
                && name == "printer"
            {
                break;
            }
        }
        ed.remove_header();
        while ed.next_event().unwrap().is_some() {}
        assert_eq!(ed.buffer.as_str(), "<printer>\n</printer>\n");
        assert_eq!(ed.depth(), 0);
    }

    #[test]
    fn trim_leading_only_strips_the_front() {
        assert_eq!(trim_leading(" \n\tPPD/x.ppd \n"), "PPD/x.ppd \n");
        assert_eq!(trim_leading(" \r\n"), "");
    }
}
