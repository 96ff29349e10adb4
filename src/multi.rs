use std::iter::FusedIterator;

use tracing::debug;

use crate::errors::Result;
use crate::expression::ExprParser;
use crate::Number;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// First segment evaluated but not yet handed out.
    Ready,
    SegmentParsed,
    Exhausted,
}

/// Lazy sequence of results, one per comma-separated segment.
///
/// Created by [`crate::Context::eval_multi_expression`]. Iterating yields every
/// segment, the first one included. An error ends the sequence, since the cursor may
/// be stuck in the middle of a segment.
pub struct MultiExpression<'c, 's> {
    parser: ExprParser<'c, 's>,
    first: Result<Number>,
    state: State,
}

impl<'c, 's> MultiExpression<'c, 's> {
    pub(crate) fn new(mut parser: ExprParser<'c, 's>) -> Self {
        let first = parser.parse_expression();
        Self {
            parser,
            first,
            state: State::Ready,
        }
    }

    /// Result of the first segment, evaluated on creation.
    pub fn first(&self) -> &Result<Number> {
        &self.first
    }

    /// Next segment, or `None` once the input is consumed. Calling it again after
    /// that keeps returning `None`.
    pub fn eval_next(&mut self) -> Option<Result<Number>> {
        match self.state {
            State::Ready => {
                self.state = if self.first.is_ok() {
                    State::SegmentParsed
                } else {
                    State::Exhausted
                };
                Some(self.first.clone())
            }
            State::SegmentParsed => self.advance(),
            State::Exhausted => None,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.state == State::Exhausted
    }

    fn advance(&mut self) -> Option<Result<Number>> {
        let scanner = self.parser.scanner();
        scanner.skip_ws();
        if scanner.eof() {
            self.state = State::Exhausted;
            return None;
        }
        // The separator is optional: "1 2" is two segments
        if scanner.consume_char(',') {
            scanner.skip_ws();
        }
        let result = self.parser.parse_expression();
        if let Err(e) = &result {
            debug!(error = %e, "segment failed");
            self.state = State::Exhausted;
        }
        Some(result)
    }
}

impl Iterator for MultiExpression<'_, '_> {
    type Item = Result<Number>;

    fn next(&mut self) -> Option<Self::Item> {
        self.eval_next()
    }
}

impl FusedIterator for MultiExpression<'_, '_> {}
