//! Built-in function implementations
//!
//! This module provides the intrinsic functions that are resolved before any
//! user-defined function and cannot be shadowed.
//!
//! # Supported Built-ins
//!
//! - `print(value)`: any value followed by a newline
//! - `puts(string)`: a string followed by a newline
//! - `printf(format, ...)`: formatted output, returns the number of characters written
//! - `scanf(format, targets...)`: whitespace-separated input into variables
//! - `stoi(string)` / `stof(string)`: numeric prefix conversion
//!
//! # Implementation Notes
//!
//! - `printf` supports `%d` (int), `%f`/`%.Nf` (float), `%s` (string) and `%%`;
//!   argument kinds must match their placeholder exactly
//! - Escape sequences `\n \t \\ \"` are expanded in `printf` formats only;
//!   string literals themselves are kept verbatim
//! - All built-ins are implemented as methods on the [`Interpreter`] struct

use crate::interpreter::constants::DEFAULT_FLOAT_PRECISION;
use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::Value;
use crate::parser::ast::{AstNode, SourceLocation, Type};

/// A `%` conversion in a printf/scanf format
#[derive(Debug, Clone, Copy, PartialEq)]
enum Conversion {
    Int,
    Float(Option<usize>),
    Str,
}

impl Conversion {
    fn placeholder(self) -> &'static str {
        match self {
            Conversion::Int => "%d",
            Conversion::Float(_) => "%f",
            Conversion::Str => "%s",
        }
    }

    fn value_type(self) -> Type {
        match self {
            Conversion::Int => Type::Int,
            Conversion::Float(_) => Type::Float,
            Conversion::Str => Type::String,
        }
    }
}

/// Piece of a parsed format string
#[derive(Debug, Clone, PartialEq)]
enum FormatPiece {
    Text(String),
    Conversion(Conversion),
}

fn format_error(message: impl Into<String>, location: SourceLocation) -> RuntimeError {
    RuntimeError::Format {
        message: message.into(),
        location,
    }
}

/// Split a format into literal text (escapes expanded) and conversions
fn parse_format(format: &str, location: SourceLocation) -> Result<Vec<FormatPiece>, RuntimeError> {
    let mut pieces = Vec::new();
    let mut text = String::new();
    let mut chars = format.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some('n') => text.push('\n'),
                Some('t') => text.push('\t'),
                Some('\\') => text.push('\\'),
                Some('"') => text.push('"'),
                Some(other) => {
                    text.push('\\');
                    text.push(other);
                }
                None => text.push('\\'),
            },
            '%' => {
                if chars.peek() == Some(&'%') {
                    chars.next();
                    text.push('%');
                    continue;
                }

                let precision = if chars.peek() == Some(&'.') {
                    chars.next();
                    let mut digits = String::new();
                    while let Some(d) = chars.peek().copied().filter(char::is_ascii_digit) {
                        digits.push(d);
                        chars.next();
                    }
                    let parsed = digits
                        .parse::<usize>()
                        .map_err(|_| format_error("expected digits after '%.'", location))?;
                    Some(parsed)
                } else {
                    None
                };

                let conversion = match (chars.next(), precision) {
                    (Some('d'), None) => Conversion::Int,
                    (Some('s'), None) => Conversion::Str,
                    (Some('f'), precision) => Conversion::Float(precision),
                    (Some(other), Some(_)) if other == 'd' || other == 's' => {
                        return Err(format_error(
                            format!("precision is not allowed with '%{}'", other),
                            location,
                        ))
                    }
                    (Some(other), _) => {
                        return Err(format_error(
                            format!("unsupported conversion '%{}'", other),
                            location,
                        ))
                    }
                    (None, _) => {
                        return Err(format_error("format ends with an incomplete '%'", location))
                    }
                };

                if !text.is_empty() {
                    pieces.push(FormatPiece::Text(std::mem::take(&mut text)));
                }
                pieces.push(FormatPiece::Conversion(conversion));
            }
            other => text.push(other),
        }
    }

    if !text.is_empty() {
        pieces.push(FormatPiece::Text(text));
    }
    Ok(pieces)
}

/// Render a printf format against its evaluated arguments
pub(crate) fn format_printf(
    format: &str,
    args: &[Value],
    location: SourceLocation,
) -> Result<String, RuntimeError> {
    let pieces = parse_format(format, location)?;
    let mut output = String::new();
    let mut remaining = args.iter();

    for piece in pieces {
        let conversion = match piece {
            FormatPiece::Text(text) => {
                output.push_str(&text);
                continue;
            }
            FormatPiece::Conversion(conversion) => conversion,
        };

        let arg = remaining.next().ok_or_else(|| {
            format_error(
                format!("not enough arguments for '{}'", conversion.placeholder()),
                location,
            )
        })?;

        match (conversion, arg) {
            (Conversion::Int, Value::Int(n)) => output.push_str(&n.to_string()),
            (Conversion::Float(precision), Value::Float(x)) => output.push_str(&format!(
                "{:.*}",
                precision.unwrap_or(DEFAULT_FLOAT_PRECISION),
                x
            )),
            (Conversion::Str, Value::String(s)) => output.push_str(s),
            (conversion, other) => {
                return Err(format_error(
                    format!(
                        "'{}' expects {}, got {}",
                        conversion.placeholder(),
                        conversion.value_type(),
                        other.type_name()
                    ),
                    location,
                ))
            }
        }
    }

    let extra = remaining.count();
    if extra > 0 {
        return Err(format_error(
            format!("{} argument(s) left over after the last placeholder", extra),
            location,
        ));
    }

    Ok(output)
}

/// Leading optional sign and decimal digits, after leading whitespace
pub(crate) fn parse_int_prefix(text: &str) -> Option<i32> {
    let text = text.trim_start();
    let sign_len = usize::from(text.starts_with(['+', '-']));
    let digits = text[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits == 0 {
        return None;
    }
    text[..sign_len + digits].parse().ok()
}

/// Leading optional sign, digits, optional point and fraction
pub(crate) fn parse_float_prefix(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let sign_len = usize::from(text.starts_with(['+', '-']));

    let int_digits = bytes[sign_len..]
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .count();
    let mut end = sign_len + int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = bytes[end + 1..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return None;
    }
    text[..end].trim_end_matches('.').parse().ok()
}

impl Interpreter {
    /// Dispatch a built-in by name
    pub(crate) fn call_builtin(
        &mut self,
        name: &str,
        args: &[AstNode],
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        match name {
            "print" => self.builtin_print(args, location),
            "puts" => self.builtin_puts(args, location),
            "printf" => self.builtin_printf(args, location),
            "scanf" => self.builtin_scanf(args, location),
            "stoi" => self.builtin_stoi(args, location),
            "stof" => self.builtin_stof(args, location),
            _ => Err(RuntimeError::UndefinedFunction {
                name: name.to_string(),
                location,
            }),
        }
    }

    fn expect_args(
        name: &str,
        args: &[AstNode],
        expected: usize,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        if args.len() != expected {
            return Err(RuntimeError::ArgumentCountMismatch {
                function: name.to_string(),
                expected,
                got: args.len(),
                location,
            });
        }
        Ok(())
    }

    /// Evaluate a single argument that must be a string
    fn string_argument(
        &mut self,
        name: &str,
        args: &[AstNode],
        location: SourceLocation,
    ) -> Result<String, RuntimeError> {
        Self::expect_args(name, args, 1, location)?;
        match self.evaluate_expr(&args[0])? {
            Value::String(s) => Ok(s),
            other => Err(RuntimeError::type_error("string", other.type_name(), location)),
        }
    }

    fn emit(&mut self, text: &str, location: SourceLocation) -> Result<(), RuntimeError> {
        self.terminal
            .write(text)
            .map_err(|e| RuntimeError::io(e, location))
    }

    fn builtin_print(&mut self, args: &[AstNode], location: SourceLocation) -> Result<Value, RuntimeError> {
        Self::expect_args("print", args, 1, location)?;
        let value = self.evaluate_expr(&args[0])?;
        self.emit(&format!("{}\n", value), location)?;
        Ok(Value::Void)
    }

    fn builtin_puts(&mut self, args: &[AstNode], location: SourceLocation) -> Result<Value, RuntimeError> {
        let text = self.string_argument("puts", args, location)?;
        self.emit(&format!("{}\n", text), location)?;
        Ok(Value::Void)
    }

    pub(crate) fn builtin_printf(
        &mut self,
        args: &[AstNode],
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let Some((format_arg, rest)) = args.split_first() else {
            return Err(format_error("printf requires a format string", location));
        };

        let format = match self.evaluate_expr(format_arg)? {
            Value::String(s) => s,
            other => return Err(RuntimeError::type_error("string", other.type_name(), location)),
        };

        let mut arg_values = Vec::with_capacity(rest.len());
        for arg in rest {
            arg_values.push(self.evaluate_expr(arg)?);
        }

        let output = format_printf(&format, &arg_values, location)?;
        self.emit(&output, location)?;

        Ok(Value::Int(output.chars().count() as i32))
    }

    /// Read one input token per placeholder into the target variables.
    ///
    /// Returns the number of targets assigned, or -1 when input ends before
    /// the first one. An unparsable token stops the scan.
    pub(crate) fn builtin_scanf(
        &mut self,
        args: &[AstNode],
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let Some((format_arg, targets)) = args.split_first() else {
            return Err(format_error("scanf requires a format string", location));
        };

        let format = match self.evaluate_expr(format_arg)? {
            Value::String(s) => s,
            other => return Err(RuntimeError::type_error("string", other.type_name(), location)),
        };

        let conversions: Vec<Conversion> = parse_format(&format, location)?
            .into_iter()
            .filter_map(|piece| match piece {
                FormatPiece::Conversion(c) => Some(c),
                FormatPiece::Text(_) => None,
            })
            .collect();

        if conversions.len() != targets.len() {
            return Err(format_error(
                format!(
                    "format has {} placeholder(s) but {} target(s) were given",
                    conversions.len(),
                    targets.len()
                ),
                location,
            ));
        }

        // Validate every target before consuming any input
        let mut places = Vec::with_capacity(targets.len());
        for (conversion, target) in conversions.iter().zip(targets) {
            if !target.is_place() {
                return Err(format_error(
                    "scanf targets must be variables, array elements or fields",
                    target.location(),
                ));
            }
            let place = self.resolve_place(target)?;
            let declared = self.place_type(&place)?;
            if declared != conversion.value_type() {
                return Err(format_error(
                    format!(
                        "'{}' cannot store into a {} target",
                        conversion.placeholder(),
                        declared
                    ),
                    target.location(),
                ));
            }
            places.push(place);
        }

        let mut assigned = 0;
        for (conversion, place) in conversions.iter().zip(&places) {
            let token = match self
                .terminal
                .next_token()
                .map_err(|e| RuntimeError::io(e, location))?
            {
                Some(token) => token,
                None if assigned == 0 => return Ok(Value::Int(-1)),
                None => break,
            };

            let value = match conversion {
                Conversion::Int => parse_int_prefix(&token).map(Value::Int),
                Conversion::Float(_) => parse_float_prefix(&token).map(Value::Float),
                Conversion::Str => Some(Value::String(token.clone())),
            };
            let Some(value) = value else {
                // Unmatched input stays in the stream for the next read
                self.terminal.unread_token(token);
                break;
            };

            self.write_place(place, value, location)?;
            assigned += 1;
        }

        Ok(Value::Int(assigned))
    }

    fn builtin_stoi(&mut self, args: &[AstNode], location: SourceLocation) -> Result<Value, RuntimeError> {
        let text = self.string_argument("stoi", args, location)?;
        parse_int_prefix(&text)
            .map(Value::Int)
            .ok_or(RuntimeError::Conversion {
                function: "stoi".to_string(),
                input: text,
                location,
            })
    }

    fn builtin_stof(&mut self, args: &[AstNode], location: SourceLocation) -> Result<Value, RuntimeError> {
        let text = self.string_argument("stof", args, location)?;
        parse_float_prefix(&text)
            .map(Value::Float)
            .ok_or(RuntimeError::Conversion {
                function: "stof".to_string(),
                input: text,
                location,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc() -> SourceLocation {
        SourceLocation::new(1, 1)
    }

    #[test]
    fn test_int_prefix() {
        assert_eq!(parse_int_prefix("123"), Some(123));
        assert_eq!(parse_int_prefix("  -42abc"), Some(-42));
        assert_eq!(parse_int_prefix("+7"), Some(7));
        assert_eq!(parse_int_prefix("abc"), None);
        assert_eq!(parse_int_prefix("-"), None);
        assert_eq!(parse_int_prefix(""), None);
        assert_eq!(parse_int_prefix("99999999999"), None);
    }

    #[test]
    fn test_float_prefix() {
        assert_eq!(parse_float_prefix("12.5"), Some(12.5));
        assert_eq!(parse_float_prefix("3.14xyz"), Some(3.14));
        assert_eq!(parse_float_prefix("-0.5"), Some(-0.5));
        assert_eq!(parse_float_prefix("7"), Some(7.0));
        assert_eq!(parse_float_prefix("5."), Some(5.0));
        assert_eq!(parse_float_prefix(".25"), Some(0.25));
        assert_eq!(parse_float_prefix("."), None);
        assert_eq!(parse_float_prefix("x1"), None);
    }

    #[test]
    fn test_printf_placeholders() {
        let out = format_printf(
            "Int: %d, Float: %f, String: %s\\n",
            &[
                Value::Int(10),
                Value::Float(2.5),
                Value::String("Texto".to_string()),
            ],
            loc(),
        )
        .unwrap();
        assert_eq!(out, "Int: 10, Float: 2.500000, String: Texto\n");
    }

    #[test]
    fn test_printf_precision_and_percent() {
        let out = format_printf("%.2f%% done\\t!", &[Value::Float(99.456)], loc()).unwrap();
        assert_eq!(out, "99.46% done\t!");
    }

    #[test]
    fn test_printf_mismatches_are_format_errors() {
        let missing = format_printf("%d %d", &[Value::Int(1)], loc());
        assert!(matches!(missing, Err(RuntimeError::Format { .. })));

        let extra = format_printf("%d", &[Value::Int(1), Value::Int(2)], loc());
        assert!(matches!(extra, Err(RuntimeError::Format { .. })));

        let wrong_kind = format_printf("%f", &[Value::Int(1)], loc());
        assert!(matches!(wrong_kind, Err(RuntimeError::Format { .. })));

        let unknown = format_printf("%x", &[Value::Int(1)], loc());
        assert!(matches!(unknown, Err(RuntimeError::Format { .. })));
    }
}
