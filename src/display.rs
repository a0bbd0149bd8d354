//! Character display abstraction and the text rendered on it.

use core::fmt::Write;

use heapless::String;

/// Characters kept per rendered line; longer text is truncated.
pub const LINE_CAPACITY: usize = 32;

/// One line of display text.
pub type Line = String<LINE_CAPACITY>;

/// Two-line character display, such as an HD44780 module.
///
/// Failures are not reported: the display is the last resort for telling the
/// user anything, so there is nowhere to surface them.
pub trait CharacterDisplay {
    /// Powers up and initialises the controller.
    fn initialize(&mut self);

    /// Moves the cursor to the start of the first line.
    fn first_line(&mut self);

    /// Moves the cursor to the start of the second line.
    fn second_line(&mut self);

    /// Writes text at the cursor position.
    fn write_text(&mut self, text: &str);

    /// Clears both lines.
    fn clear(&mut self);
}

impl<T: CharacterDisplay + ?Sized> CharacterDisplay for &mut T {
    fn initialize(&mut self) {
        (**self).initialize();
    }

    fn first_line(&mut self) {
        (**self).first_line();
    }

    fn second_line(&mut self) {
        (**self).second_line();
    }

    fn write_text(&mut self, text: &str) {
        (**self).write_text(text);
    }

    fn clear(&mut self) {
        (**self).clear();
    }
}

/// Formats into a [`Line`], silently dropping whatever does not fit.
pub fn line(args: core::fmt::Arguments<'_>) -> Line {
    let mut line = Line::new();
    let _ = line.write_fmt(args);
    line
}

/// Splits `value` into a signed integer part and a truncated, non-negative
/// fraction with `scale` (10, 100, ...) steps.
fn split_decimal(value: f64, scale: i32) -> (&'static str, i32, i32) {
    let whole = value as i32;
    let fraction = ((value * scale as f64) as i32 % scale).abs();
    // `as` truncates toward zero, so -0.5 has no sign left in its whole part.
    let sign = if value < 0.0 && whole == 0 { "-" } else { "" };
    (sign, whole, fraction)
}

/// `"T: 23.45 degC"`, fraction truncated to two zero-padded digits.
pub fn temperature_line(celsius: f64) -> Line {
    let (sign, whole, fraction) = split_decimal(celsius, 100);
    line(format_args!("T: {}{}.{:02} degC", sign, whole, fraction))
}

/// `"p: 98765.4 Pa"`, fraction truncated to one digit.
pub fn pressure_line(pascal: f64) -> Line {
    let (sign, whole, fraction) = split_decimal(pascal, 10);
    line(format_args!("p: {}{}.{} Pa", sign, whole, fraction))
}
