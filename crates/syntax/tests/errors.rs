use goat_syntax::{ErrorKind, Parser};

#[test]
fn unclosed_bracket_is_critical_and_spans_the_run() {
    let parse = Parser::new("(1+2").parse();
    assert!(parse.root.is_none());
    assert_eq!(parse.errors.len(), 1);
    let error = &parse.errors[0];
    assert!(error.critical);
    assert_eq!(error.kind, ErrorKind::UnclosedOpeningBracket('('));
    assert_eq!(error.span.begin.offset, 0);
    assert_eq!(error.span.end.offset, 4);
}

#[test]
fn double_assignment_stops_the_pipeline() {
    let parse = Parser::new("a = = 1;").parse();
    assert!(parse.root.is_none());
    let error = &parse.errors[0];
    assert!(error.critical);
    assert_eq!(error.kind, ErrorKind::ExpectedLvalue);
    // the second `=` is the offender
    assert_eq!(error.span.begin.offset, 4);
}

#[test]
fn bad_escape_surfaces_from_the_scanner() {
    let parse = Parser::new(r#""bad\q""#).parse();
    assert!(parse.root.is_none());
    let error = &parse.errors[0];
    assert!(error.critical);
    assert_eq!(error.kind, ErrorKind::InvalidEscapeSequence('q'));
}

#[test]
fn unmatched_quote_is_reported() {
    let parse = Parser::new("\"abc").parse();
    assert_eq!(parse.errors[0].kind, ErrorKind::UnclosedQuotationMark);
}

#[test]
fn unknown_symbol_is_reported() {
    let parse = Parser::new("x = 1 @;").parse();
    assert_eq!(parse.errors[0].kind, ErrorKind::UnknownSymbol('@'));
    assert!(parse.errors[0].critical);
}

#[test]
fn mismatched_brackets_are_reported() {
    let parse = Parser::new("(]").parse();
    assert_eq!(
        parse.errors[0].kind,
        ErrorKind::BracketsDoNotMatch {
            opening: '(',
            closing: ']'
        }
    );
}

#[test]
fn stray_closer_is_reported() {
    let parse = Parser::new(")").parse();
    assert_eq!(parse.errors[0].kind, ErrorKind::MissingOpeningBracket(')'));
}

#[test]
fn bare_identifier_argument_is_rejected() {
    // arguments are checked before lone identifiers become expressions,
    // so only literals and nested calls are accepted here
    let parse = Parser::new("print(x);").parse();
    assert!(parse.root.is_none());
    assert_eq!(parse.errors[0].kind, ErrorKind::ExpectedExpression);
}

#[test]
fn trailing_comma_in_arguments_is_rejected() {
    let parse = Parser::new("print(1,);").parse();
    assert_eq!(parse.errors[0].kind, ErrorKind::ExpectedExpressionAfterComma);
}

#[test]
fn missing_comma_between_arguments_is_rejected() {
    let parse = Parser::new("print(1 2);").parse();
    assert_eq!(parse.errors[0].kind, ErrorKind::ExpectedCommaBetweenArguments);
}

#[test]
fn non_statement_tokens_are_reported_but_not_fatal() {
    let parse = Parser::new("[];").parse();
    assert_eq!(parse.errors.len(), 1);
    assert_eq!(parse.errors[0].kind, ErrorKind::NotAStatement("[]".into()));
    assert!(!parse.errors[0].critical);
    let root = parse.root.expect("root survives non-critical errors");
    assert_eq!(parse.ast[root].arity(), 0);
}

#[test]
fn every_offending_statement_is_reported() {
    let parse = Parser::new("[]; []; x = 1;").parse();
    assert_eq!(parse.errors.len(), 2);
    let root = parse.root.unwrap();
    assert_eq!(parse.ast[root].arity(), 1);
}

#[test]
fn duplicate_parameters_are_flagged() {
    let parse = Parser::new("f = func(a, a) { return a; };").parse();
    assert_eq!(parse.errors.len(), 1);
    assert_eq!(parse.errors[0].kind, ErrorKind::DuplicateParameter("a".into()));
    assert!(!parse.errors[0].critical);
    assert!(parse.root.is_some());
}

#[test]
fn non_identifier_parameter_is_fatal() {
    let parse = Parser::new("f = func(1) { };").parse();
    assert!(parse.root.is_none());
    assert_eq!(parse.errors[0].kind, ErrorKind::InvalidFunctionArgument);
}

#[test]
fn missing_comma_between_parameters_is_fatal() {
    let parse = Parser::new("f = func(a b) { };").parse();
    assert_eq!(parse.errors[0].kind, ErrorKind::ExpectedCommaBetweenArguments);
}

#[test]
fn const_without_initializer_is_rejected() {
    let parse = Parser::new("const x;").parse();
    assert!(parse.root.is_none());
    assert_eq!(parse.errors[0].kind, ErrorKind::ExpectedExpression);
}

#[test]
fn var_without_a_name_is_rejected() {
    let parse = Parser::new("var;").parse();
    assert!(parse.root.is_none());
    assert_eq!(parse.errors[0].kind, ErrorKind::ExpectedExpression);
}

#[test]
fn missing_operand_stops_the_pipeline() {
    let parse = Parser::new("x = 1 +;").parse();
    assert!(parse.root.is_none());
    assert_eq!(parse.errors[0].kind, ErrorKind::ExpectedExpression);
}

#[test]
fn assignment_to_a_literal_is_rejected() {
    let parse = Parser::new("1 = x;").parse();
    assert!(parse.root.is_none());
    assert_eq!(parse.errors[0].kind, ErrorKind::ExpectedLvalue);
}
