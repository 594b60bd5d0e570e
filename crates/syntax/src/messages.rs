//! Localized rendering of diagnostics.
//!
//! The provider is constructed by whoever reports errors and passed down
//! explicitly; the library never consults a global language setting.

use crate::error::{CompilationError, ErrorKind};

/// Supported message languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    English,
    Russian,
}

impl Language {
    /// Parse a language tag such as `en`, `ru` or `ru-RU`.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.to_ascii_lowercase();
        match tag.split(['-', '_']).next()? {
            "en" => Some(Self::English),
            "ru" => Some(Self::Russian),
            _ => None,
        }
    }
}

/// Renders error kinds in the selected language.
///
/// English uses the `Display` impl of [`ErrorKind`] directly.
#[derive(Debug, Clone, Copy)]
pub struct Messages {
    language: Language,
}

impl Messages {
    #[must_use]
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    #[must_use]
    pub fn render(&self, kind: &ErrorKind) -> String {
        use ErrorKind::*;
        match self.language {
            Language::English => kind.to_string(),
            Language::Russian => match kind {
                UnknownSymbol(glyph) => format!("неизвестный символ '{glyph}'"),
                UnclosedQuotationMark => "незакрытая кавычка".into(),
                InvalidEscapeSequence(glyph) => {
                    format!("неверная управляющая последовательность '\\{glyph}'")
                }
                UnclosedOpeningBracket(glyph) => {
                    format!("незакрытая открывающая скобка '{glyph}'")
                }
                MissingOpeningBracket(glyph) => {
                    format!("отсутствует открывающая скобка, соответствующая '{glyph}'")
                }
                BracketsDoNotMatch { opening, closing } => {
                    format!("закрывающая скобка '{closing}' не соответствует '{opening}'")
                }
                NotAStatement(text) => format!("токен '{text}' не является инструкцией"),
                ExpectedLvalue => "ожидается выражение (lvalue для присваивания)".into(),
                ExpectedExpression => "ожидается выражение".into(),
                ExpectedCommaBetweenArguments => "ожидается запятая между аргументами".into(),
                ExpectedExpressionAfterComma => "ожидается выражение после запятой".into(),
                InvalidFunctionArgument => "недопустимый аргумент функции".into(),
                DuplicateParameter(name) => format!("повторяющийся параметр '{name}'"),
                CannotReadSourceFile(path) => {
                    format!("не удаётся прочитать исходный файл '{path}'")
                }
            },
        }
    }

    /// One report line: `file:row:column: message`.
    #[must_use]
    pub fn report_line(&self, file_name: &str, error: &CompilationError) -> String {
        format!(
            "{}:{}:{}: {}",
            file_name,
            error.span.begin.row,
            error.span.begin.column,
            self.render(&error.kind)
        )
    }

    /// The summary line printed after a failed compilation.
    #[must_use]
    pub fn compilation_failed(&self, count: usize) -> String {
        match self.language {
            Language::English => format!("compilation failed with {count} error(s)"),
            Language::Russian => format!("компиляция завершилась с ошибками: {count}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Span;

    #[test]
    fn tags_are_case_insensitive_and_region_tolerant() {
        assert_eq!(Language::from_tag("en"), Some(Language::English));
        assert_eq!(Language::from_tag("RU"), Some(Language::Russian));
        assert_eq!(Language::from_tag("ru-RU"), Some(Language::Russian));
        assert_eq!(Language::from_tag("ru_RU"), Some(Language::Russian));
        assert_eq!(Language::from_tag("fr"), None);
    }

    #[test]
    fn english_matches_display() {
        let messages = Messages::new(Language::English);
        assert_eq!(
            messages.render(&ErrorKind::ExpectedExpression),
            "expected expression"
        );
    }

    #[test]
    fn russian_is_translated() {
        let messages = Messages::new(Language::Russian);
        assert_eq!(
            messages.render(&ErrorKind::UnknownSymbol('@')),
            "неизвестный символ '@'"
        );
    }

    #[test]
    fn report_line_points_at_the_error_begin() {
        let messages = Messages::new(Language::English);
        let mut span = Span::new(Default::default(), Default::default());
        span.begin.row = 3;
        span.begin.column = 7;
        let error = CompilationError::new(span, ErrorKind::ExpectedExpression);
        assert_eq!(
            messages.report_line("main.goat", &error),
            "main.goat:3:7: expected expression"
        );
    }
}
