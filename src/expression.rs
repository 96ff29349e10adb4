// src/expression.rs
use tracing::trace;

use crate::context::Context;
use crate::errors::{ErrorKind, Result};
use crate::scanner::Scanner;
use crate::Number;

/// Recursive-descent evaluator. Each rule returns the value of what it parsed; no
/// tree is built.
pub(crate) struct ExprParser<'c, 's> {
    ctx: &'c Context,
    scanner: Scanner<'s>,
    depth: usize,
}

impl<'c, 's> ExprParser<'c, 's> {
    pub fn new(ctx: &'c Context, input: &'s str) -> Self {
        Self {
            ctx,
            scanner: Scanner::new(input),
            depth: 0,
        }
    }

    pub fn scanner(&mut self) -> &mut Scanner<'s> {
        &mut self.scanner
    }

    /// Whole input must be one expression.
    pub fn parse_complete(&mut self) -> Result<Number> {
        let value = self.parse_expression()?;
        self.scanner.skip_ws();
        if !self.scanner.eof() {
            return Err(self.scanner.error(ErrorKind::TrailingCharacters));
        }
        Ok(value)
    }

    pub fn parse_expression(&mut self) -> Result<Number> {
        self.scanner.skip_ws();
        if self.scanner.eof() {
            return Err(self.scanner.error(ErrorKind::UnexpectedEnd));
        }
        self.parse_addition()
    }

    fn parse_addition(&mut self) -> Result<Number> {
        let mut left = self.parse_multiplication()?;
        self.scanner.skip_ws();
        while let Some(op) = self.scanner.consume_if(|c| matches!(c, '+' | '-')) {
            self.scanner.skip_ws();
            let right = self.parse_multiplication()?;
            if op == '+' {
                left += right;
            } else {
                left -= right;
            }
            self.scanner.skip_ws();
        }
        Ok(left)
    }

    fn parse_multiplication(&mut self) -> Result<Number> {
        let mut left = self.parse_unary()?;
        self.scanner.skip_ws();
        while let Some(op) = self.scanner.consume_if(|c| matches!(c, '*' | '/')) {
            self.scanner.skip_ws();
            let right = self.parse_unary()?;
            if op == '*' {
                left *= right;
            } else {
                left /= right;
            }
            self.scanner.skip_ws();
        }
        Ok(left)
    }

    /// Run a nested rule, failing once nesting exceeds `max_depth` instead of
    /// exhausting the stack.
    fn nested<T>(&mut self, rule: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.depth >= self.ctx.options().max_depth {
            return Err(self.scanner.error(ErrorKind::TooDeep));
        }
        self.depth += 1;
        let result = rule(self);
        self.depth -= 1;
        result
    }

    fn parse_unary(&mut self) -> Result<Number> {
        if let Some(sign) = self.scanner.consume_if(|c| matches!(c, '+' | '-')) {
            self.scanner.skip_ws();
            let value = self.nested(Self::parse_unary)?;
            return Ok(if sign == '-' { -value } else { value });
        }
        match self.scanner.peek_char() {
            Some('0'..='9' | '.') => self.parse_number(),
            Some('(') => self.parse_parenthesized(),
            _ if self.scanner.is_alpha() => self.parse_identifier(),
            None => Err(self.scanner.error(ErrorKind::UnexpectedEnd)),
            _ => Err(self.scanner.error(ErrorKind::InvalidCharacter)),
        }
    }

    fn parse_number(&mut self) -> Result<Number> {
        let mut value: Number = 0.0;
        let mut digits = 0usize;
        while let Some(d) = self.scanner.take_digit() {
            value = value * 10.0 + Number::from(d);
            digits += 1;
        }
        if self.scanner.consume_char('.') {
            let mut weight: Number = 1.0;
            while let Some(d) = self.scanner.take_digit() {
                weight /= 10.0;
                value += Number::from(d) * weight;
                digits += 1;
            }
        }
        if digits == 0 {
            return Err(self.scanner.error(ErrorKind::InvalidNumber));
        }

        // Unit suffix, with or without a space before it
        self.scanner.skip_ws();
        if self.scanner.is_unit_char() {
            let name = self.scanner.take_unit();
            let scale = self
                .ctx
                .unit(name)
                .ok_or_else(|| self.scanner.error_at(ErrorKind::UnknownUnit, name))?;
            value *= scale;
        }
        Ok(value)
    }

    fn parse_parenthesized(&mut self) -> Result<Number> {
        // '('
        self.scanner.bump();
        let value = self.nested(Self::parse_expression)?;
        self.scanner.skip_ws();
        if !self.scanner.consume_char(')') {
            return Err(self.scanner.error(ErrorKind::ExpectedClosingParen));
        }
        Ok(value)
    }

    fn parse_identifier(&mut self) -> Result<Number> {
        let name = self.scanner.take_identifier();
        self.scanner.skip_ws();
        if self.scanner.peek_char() == Some('(') {
            return self.parse_call(name);
        }
        self.ctx
            .variable(name)
            .ok_or_else(|| self.scanner.error_at(ErrorKind::UnknownVariable, name))
    }

    fn parse_call(&mut self, name: &str) -> Result<Number> {
        let ctx = self.ctx;
        let function = ctx
            .function(name)
            .ok_or_else(|| self.scanner.error_at(ErrorKind::UnknownFunction, name))?;

        // '('
        self.scanner.bump();
        self.scanner.skip_ws();

        let max_arguments = ctx.options().max_arguments;
        let mut args: Vec<Number> = Vec::with_capacity(max_arguments.min(16));
        if self.scanner.peek_char() != Some(')') {
            loop {
                if args.len() == max_arguments {
                    return Err(self.scanner.error(ErrorKind::TooManyArguments));
                }
                args.push(self.nested(Self::parse_expression)?);
                self.scanner.skip_ws();
                if !self.scanner.consume_char(',') {
                    break;
                }
                self.scanner.skip_ws();
            }
        }
        if !self.scanner.consume_char(')') {
            return Err(self.scanner.error(ErrorKind::ExpectedClosingParen));
        }

        trace!(function = name, argc = args.len(), "calling function");
        function
            .call(&args)
            .map_err(|kind| self.scanner.error_at(kind, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Found;
    use pretty_assertions::assert_eq;

    fn eval(input: &str) -> Result<Number> {
        let ctx = Context::new();
        ExprParser::new(&ctx, input).parse_complete()
    }

    #[test]
    fn fractional_digits_accumulate_by_weight() {
        let mut expected: Number = 2.0;
        let mut weight: Number = 1.0;
        for d in [0.0, 0.0, 3.0] {
            weight /= 10.0;
            expected += d * weight;
        }
        assert_eq!(eval("2.003"), Ok(expected));
    }

    #[test]
    fn leading_dot_number() {
        assert_eq!(eval(".5"), Ok(0.5));
        assert_eq!(eval("1."), Ok(1.0));
    }

    #[test]
    fn lone_dot_is_invalid_number() {
        let err = eval(".").unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidNumber);
    }

    #[test]
    fn error_offsets_point_before_the_cursor() {
        let err = eval("3*").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnexpectedEnd);
        assert_eq!(err.offset, 1);
        assert_eq!(err.found, Found::EndOfString);

        let err = eval("*").unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidCharacter);
        assert_eq!(err.offset, -1);
        assert_eq!(err.found, Found::Text("*".into()));
    }

    #[test]
    fn trailing_garbage_is_rejected() {
        let err = eval("1 + 2 )").unwrap_err();
        assert_eq!(err.kind, ErrorKind::TrailingCharacters);
        assert_eq!(err.to_string(), "In character 5: Invalid characters after expression found: )");
    }

    #[test]
    fn unknown_names_carry_the_identifier() {
        let err = eval("foo + 1").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnknownVariable);
        assert_eq!(err.identifier(), Some("foo"));

        let err = eval("foo(1)").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnknownFunction);
        assert_eq!(err.identifier(), Some("foo"));
    }

    #[test]
    fn nesting_beyond_the_limit_is_an_error() {
        let mut ctx = Context::new();
        ctx.options_mut().max_depth = 3;
        let eval = |input: &str| ExprParser::new(&ctx, input).parse_complete();
        assert_eq!(eval("((( 1 )))"), Ok(1.0));
        assert_eq!(eval("---1"), Ok(-1.0));
        assert_eq!(eval("abs(abs(abs(1)))"), Ok(1.0));

        let err = eval("((((1))))").unwrap_err();
        assert_eq!(err.kind, ErrorKind::TooDeep);
        assert_eq!(err.found, Found::Text("1))))".into()));
        assert_eq!(eval("----1").unwrap_err().kind, ErrorKind::TooDeep);
        assert_eq!(eval("abs(abs(abs(abs(1))))").unwrap_err().kind, ErrorKind::TooDeep);
    }

    #[test]
    fn depth_is_released_after_each_group() {
        let mut ctx = Context::new();
        ctx.options_mut().max_depth = 1;
        let input = "(1) + (2) * -3 - max(4, 5)";
        assert_eq!(ExprParser::new(&ctx, input).parse_complete(), Ok(-10.0));
    }

    #[test]
    fn whitespace_between_name_and_paren_is_a_call() {
        assert_eq!(eval("sqrt (16)"), Ok(4.0));
    }
}
