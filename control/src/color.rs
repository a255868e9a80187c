//! Colour arithmetic on strip pixels.

use smart_leds::RGB8;

pub const OFF: RGB8 = RGB8 { r: 0, g: 0, b: 0 };
pub const GREEN: RGB8 = RGB8 { r: 0, g: 255, b: 0 };
pub const YELLOW: RGB8 = RGB8 { r: 255, g: 255, b: 0 };
pub const RED: RGB8 = RGB8 { r: 255, g: 0, b: 0 };

/// Dim the colour, 255 keeps it intact, 0 turns it off.
#[must_use]
pub fn scale(color: RGB8, factor: u8) -> RGB8 {
    let channel = |c: u8| (u16::from(c) * u16::from(factor) / 255) as u8;
    RGB8 {
        r: channel(color.r),
        g: channel(color.g),
        b: channel(color.b),
    }
}

/// Linear interpolation from `a` to `b` at `position / span`.
#[must_use]
pub fn lerp(a: RGB8, b: RGB8, position: u32, span: u32) -> RGB8 {
    if span == 0 {
        return a;
    }
    let position = position.min(span);
    let channel = |from: u8, to: u8| {
        let from = i64::from(from);
        let to = i64::from(to);
        (from + (to - from) * i64::from(position) / i64::from(span)) as u8
    };
    RGB8 {
        r: channel(a.r, b.r),
        g: channel(a.g, b.g),
        b: channel(a.b, b.b),
    }
}

/// Colour of pixel `index` on a green, yellow and red gradient spread over
/// `length` pixels.
#[must_use]
pub fn gradient(index: usize, length: usize) -> RGB8 {
    if length < 2 {
        return GREEN;
    }
    let span = (length - 1) as u32;
    // Position on a doubled scale, first half is green to yellow.
    let position = (index.min(length - 1) as u32) * 2;
    if position <= span {
        lerp(GREEN, YELLOW, position, span)
    } else {
        lerp(YELLOW, RED, position - span, span)
    }
}
