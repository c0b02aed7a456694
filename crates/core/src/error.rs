//! Typed errors for the engine.

use std::fmt;

use foomatic_combo_diagnostics::{Diagnostic, Span, codes};

/// Structural problems that stop the scan of a document.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkupFault {
    /// `<` inside a tag that is not a comment.
    NestedAngleBracket,
    /// A body tag without an element name.
    TagWithoutName,
    /// End of input inside a tag.
    UnterminatedTag,
    /// End of input inside a `<!-- -->` comment.
    UnterminatedComment,
    /// A closing tag below the document root.
    UnbalancedClose,
    /// End of input with elements still open.
    UnclosedElement,
}

impl MarkupFault {
    /// Diagnostic code for this fault.
    pub fn code(self) -> &'static str {
        match self {
            MarkupFault::NestedAngleBracket => codes::NESTED_ANGLE_BRACKET,
            MarkupFault::TagWithoutName => codes::TAG_WITHOUT_NAME,
            MarkupFault::UnterminatedTag | MarkupFault::UnterminatedComment => {
                codes::UNTERMINATED_TAG
            }
            MarkupFault::UnbalancedClose => codes::UNBALANCED_CLOSE,
            MarkupFault::UnclosedElement => codes::UNCLOSED_ELEMENT,
        }
    }
}

impl fmt::Display for MarkupFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            MarkupFault::NestedAngleBracket => "nested angle brackets",
            MarkupFault::TagWithoutName => "tag without name",
            MarkupFault::UnterminatedTag => "unterminated tag",
            MarkupFault::UnterminatedComment => "unterminated comment",
            MarkupFault::UnbalancedClose => "closing tag without opening tag",
            MarkupFault::UnclosedElement => "unclosed element",
        };
        f.write_str(text)
    }
}

/// Fatal error while parsing one document.
#[non_exhaustive]
#[derive(Debug, Clone, thiserror::Error)]
pub enum ParseError {
    /// The document is not well-formed enough to scan.
    #[error("XML error: {fault} in {file}, line {line}")]
    Markup {
        /// Document path or label.
        file: String,
        /// 1-based line of the offending byte.
        line: usize,
        /// What went wrong.
        fault: MarkupFault,
        /// Location in the original document.
        span: Span,
    },

    /// A device document lacks `<make>` or `<model>`.
    #[error("could not determine manufacturer or model name from the printer file {file}")]
    MissingMakeModel {
        /// Document path or label.
        file: String,
    },
}

impl ParseError {
    /// Path or label of the document that failed.
    pub fn file(&self) -> &str {
        match self {
            ParseError::Markup { file, .. } | ParseError::MissingMakeModel { file } => file,
        }
    }

    /// Convert into a renderable diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ParseError::Markup {
                file,
                line,
                fault,
                span,
            } => Diagnostic::error(fault.code(), format!("XML error: {fault}"), Some(*span))
                .in_document(file.as_str(), Some(*line)),
            ParseError::MissingMakeModel { file } => {
                Diagnostic::error(codes::MISSING_MAKE_MODEL, self.to_string(), None)
                    .in_document(file.as_str(), None)
            }
        }
    }
}
