use picocalc as pc;
use picocalc::{Context, ErrorKind, Found};
use pretty_assertions::assert_eq;

// Every malformed input must come back as an error value, never a panic.
#[test]
fn test_malformed_inputs_error() {
    let ctx = Context::new();
    for expr in [
        "", "   ", "(", ")", "*", "3*", "3 /", "notfound", "2px", "cos(", "cos(1,", "cos(1",
        "((((1))", "(1))", "1 +", "2 3", "#", ".", "sin 1", "1..2", "é", "1 ,2",
    ] {
        assert!(ctx.eval_expression(expr).is_err(), "`{expr}` should not evaluate");
    }
}

#[test]
fn test_deeply_unbalanced_parens() {
    let open = "(".repeat(100) + "1";
    let err = pc::eval(&open).unwrap_err();
    assert_eq!(err.kind, ErrorKind::ExpectedClosingParen);
    assert_eq!(err.found, Found::EndOfString);

    let close = "1".to_string() + &")".repeat(200);
    let err = pc::eval(&close).unwrap_err();
    assert_eq!(err.kind, ErrorKind::TrailingCharacters);
}

#[test]
fn test_huge_nesting_errors_instead_of_overflowing() {
    let ctx = Context::new();
    for input in [
        "(".repeat(100_000) + "1",
        "-".repeat(100_000) + "1",
        "abs(".repeat(100_000) + "1",
        "(".repeat(100_000) + "1" + &")".repeat(100_000),
    ] {
        let err = ctx.eval_expression(&input).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TooDeep);
        assert!(err.to_string().contains("Expression nested too deeply"));
    }
    let err = ctx
        .eval_multi_expression(&("1, ".to_string() + &"(".repeat(100_000)))
        .last()
        .unwrap()
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::TooDeep);
}

#[test]
fn test_nesting_up_to_the_limit_still_evaluates() {
    let depth = pc::DEFAULT_MAX_DEPTH;
    let balanced = "(".repeat(depth) + "2" + &")".repeat(depth);
    assert_eq!(pc::eval(&balanced).unwrap(), 2.0);
    let signs = "-".repeat(depth) + "2";
    assert_eq!(pc::eval(&signs).unwrap(), 2.0);

    let too_deep = "(".repeat(depth + 1) + "2" + &")".repeat(depth + 1);
    assert_eq!(pc::eval(&too_deep).unwrap_err().kind, ErrorKind::TooDeep);
}

#[test]
fn test_empty_input_message() {
    let err = pc::eval("").unwrap_err();
    assert_eq!(
        err.to_string(),
        "In character -1: Unexpected end of the string found: End of string"
    );
}

#[test]
fn test_invalid_character_message() {
    let err = pc::eval("1 + $x").unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidCharacter);
    assert_eq!(err.to_string(), "In character 3: Invalid character found: $x");
}

#[test]
fn test_unknown_variable_message() {
    let err = pc::eval("notfound").unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnknownVariable);
    assert_eq!(err.to_string(), "In character 7: Unknown variable 'notfound'");
}

#[test]
fn test_unknown_unit_message() {
    let err = pc::eval("2px").unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnknownUnit);
    assert_eq!(err.to_string(), "In character 2: Unknown unit 'px'");
}

#[test]
fn test_unknown_function_is_reported_before_arguments() {
    let err = pc::eval("nope(1 +)").unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnknownFunction);
    assert_eq!(err.identifier(), Some("nope"));
}

#[test]
fn test_missing_closing_paren_in_call() {
    let err = pc::eval("cos(1").unwrap_err();
    assert_eq!(err.kind, ErrorKind::ExpectedClosingParen);

    let err = pc::eval("cos(1,").unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnexpectedEnd);

    let err = pc::eval("cos(").unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnexpectedEnd);
}

#[test]
fn test_too_many_arguments() {
    let ctx = Context::new();
    let nine = "max(1, 2, 3, 4, 5, 6, 7, 8, 9)";
    let err = ctx.eval_expression(nine).unwrap_err();
    assert_eq!(err.kind, ErrorKind::TooManyArguments);
    // Detected at the ninth argument, before it is parsed.
    assert_eq!(err.found, Found::Text("9)".into()));
}

#[test]
fn test_too_many_arguments_stops_before_parsing_the_excess() {
    // The ninth argument is garbage, but the cap trips first.
    let err = pc::eval("max(1, 2, 3, 4, 5, 6, 7, 8, *)").unwrap_err();
    assert_eq!(err.kind, ErrorKind::TooManyArguments);
}

#[test]
fn test_error_short_circuits_later_errors() {
    let err = pc::eval("foo + bar").unwrap_err();
    assert_eq!(err.identifier(), Some("foo"));
}
