use ariadne::{Color, Fmt, Label, Report, ReportKind, Source};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn single(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos + 1,
        }
    }
}

#[derive(Debug, Clone)]
pub enum ErrorKind {
    ParseError,
    RuntimeError,
}

/// Diagnostic carried outside the language. Parse errors point at the
/// offending token; runtime errors travel through evaluation as
/// `Value::Error` and reach this type only when the runner renders the
/// final program value.
#[derive(Debug, Clone)]
pub struct MonkeyError {
    pub kind: ErrorKind,
    pub span: Option<Span>,
    pub message: String,
    pub help: Option<String>,
}

impl MonkeyError {
    pub fn new(kind: ErrorKind, span: Option<Span>, message: String) -> Self {
        Self {
            kind,
            span,
            message,
            help: None,
        }
    }

    pub fn parse_error(span: Span, message: String) -> Self {
        Self::new(ErrorKind::ParseError, Some(span), message)
    }

    pub fn parse_error_with_help(span: Span, message: String, help: String) -> Self {
        let mut error = Self::parse_error(span, message);
        error.help = Some(help);
        error
    }

    pub fn runtime_error(message: String) -> Self {
        Self::new(ErrorKind::RuntimeError, None, message)
    }

    pub fn report(&self, source: &str, filename: Option<&str>) {
        let filename = filename.unwrap_or("<repl>");

        let (color, kind_str) = match self.kind {
            ErrorKind::ParseError => (Color::Yellow, "Parse Error"),
            ErrorKind::RuntimeError => (Color::Magenta, "Runtime Error"),
        };

        let offset = self.span.as_ref().map_or(0, |span| span.start);
        let mut report_builder = Report::build(ReportKind::Error, filename, offset)
            .with_message(format!("{}: {}", kind_str.fg(color), self.message));

        if let Some(span) = &self.span {
            report_builder = report_builder.with_label(
                Label::new((filename, span.start..span.end))
                    .with_message(&self.message)
                    .with_color(color),
            );
        }

        if let Some(ref help_text) = self.help {
            report_builder =
                report_builder.with_note(format!("{}: {}", "help".fg(Color::Cyan), help_text));
        }

        report_builder
            .finish()
            .print((filename, Source::from(source)))
            .unwrap();
    }
}

impl fmt::Display for MonkeyError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for MonkeyError {}
