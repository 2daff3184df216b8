//! POSIX tz-string parsing
//!
//! Accepts `std offset [dst [offset] [,start[/time],end[/time]]]` together with
//! the RFC 8536 extensions found in TZif footers (quoted `<+0330>` names and
//! transition times outside 0..=24 hours).

use std::fmt;

use crate::error::{Error, Result};

const SECONDS_PER_HOUR: i32 = 3600;
const DEFAULT_TRANSITION_TIME: i32 = 2 * SECONDS_PER_HOUR;
const MAX_OFFSET_HOURS: u32 = 24;
const MAX_TRANSITION_HOURS: u32 = 167;

/// A parsed POSIX tz-string such as `IST-2IDT,M3.4.4/26,M10.5.0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TzString {
    text: String,
    std_name: String,
    std_offset: i32,
    dst: Option<DaylightSaving>,
}

/// The daylight saving part of a tz-string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaylightSaving {
    /// Abbreviation used while daylight saving time is in effect.
    pub name: String,
    /// POSIX offset in seconds (positive west of Greenwich).
    pub offset: i32,
    /// Start and end of daylight saving time. `None` leaves the choice to the C library.
    pub rules: Option<(Transition, Transition)>,
}

/// A transition rule: a day of the year plus a local time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Which day the transition happens on.
    pub date: TransitionDate,
    /// Seconds after local midnight; may be negative or exceed a day.
    pub time: i32,
}

/// Day-of-year forms allowed in a transition rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionDate {
    /// `Jn`: Julian day 1..=365, February 29 is never counted.
    Julian1(u16),
    /// `n`: zero-based day 0..=365, leap days counted.
    Julian0(u16),
    /// `Mm.w.d`: day `d` (0 = Sunday) of week `w` (5 = last) of month `m`.
    MonthWeekDay {
        /// Month, 1..=12.
        month: u8,
        /// Week of the month, 1..=5.
        week: u8,
        /// Day of the week, 0..=6.
        weekday: u8,
    },
}

impl TzString {
    /// Parses a tz-string, failing with [`Error::Parse`] when it is malformed.
    pub fn parse(input: &str) -> Result<Self> {
        let mut cursor = Cursor::new(input);

        let std_name = cursor.name()?;
        let std_offset = cursor.offset(MAX_OFFSET_HOURS)?;

        let dst = if cursor.at_end() {
            None
        } else {
            let name = cursor.name()?;
            let offset = if cursor.peek_is_offset_start() {
                cursor.offset(MAX_OFFSET_HOURS)?
            } else {
                std_offset - SECONDS_PER_HOUR
            };
            let rules = if cursor.eat(b',') {
                let start = cursor.transition()?;
                cursor.expect(b',')?;
                let end = cursor.transition()?;
                Some((start, end))
            } else {
                None
            };
            Some(DaylightSaving { name, offset, rules })
        };

        if !cursor.at_end() {
            return Err(cursor.error("unexpected trailing characters"));
        }

        Ok(Self {
            text: input.to_string(),
            std_name,
            std_offset,
            dst,
        })
    }

    /// The original text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Abbreviation for standard time, without the `<>` quoting.
    pub fn std_name(&self) -> &str {
        &self.std_name
    }

    /// Raw POSIX offset in seconds (positive west of Greenwich).
    pub fn std_offset(&self) -> i32 {
        self.std_offset
    }

    /// Standard time offset east of UTC in seconds, e.g. `7200` for `IST-2`.
    pub fn utc_offset_seconds(&self) -> i32 {
        -self.std_offset
    }

    /// Daylight saving information, if the zone observes it.
    pub fn dst(&self) -> Option<&DaylightSaving> {
        self.dst.as_ref()
    }

    /// Returns true if the zone observes daylight saving time.
    pub fn has_dst(&self) -> bool {
        self.dst.is_some()
    }
}

impl fmt::Display for TzString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl std::str::FromStr for TzString {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

struct Cursor<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            pos: 0,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_is_offset_start(&self) -> bool {
        matches!(self.peek(), Some(b'+' | b'-' | b'0'..=b'9'))
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, byte: u8) -> Result<()> {
        if self.eat(byte) {
            Ok(())
        } else {
            Err(self.error(&format!("expected '{}'", char::from(byte))))
        }
    }

    fn error(&self, message: &str) -> Error {
        Error::Parse(format!(
            "invalid tz-string '{}' at position {}: {}",
            self.input, self.pos, message
        ))
    }

    fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> &'a str {
        let input = self.input;
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.pos += 1;
        }
        // Predicates only accept ASCII, so the slice is on char boundaries.
        &input[start..self.pos]
    }

    fn name(&mut self) -> Result<String> {
        let name = if self.eat(b'<') {
            let quoted =
                self.take_while(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'-');
            self.expect(b'>')?;
            quoted
        } else {
            self.take_while(|b| b.is_ascii_alphabetic())
        };

        if name.len() < 3 {
            return Err(self.error("zone abbreviation must have at least 3 characters"));
        }
        Ok(name.to_string())
    }

    fn number(&mut self, max_digits: usize) -> Result<u32> {
        let digits = self.take_while(|b| b.is_ascii_digit());
        if digits.is_empty() {
            return Err(self.error("expected a number"));
        }
        if digits.len() > max_digits {
            return Err(self.error("number has too many digits"));
        }
        digits
            .parse()
            .map_err(|_| self.error("number out of range"))
    }

    /// `[+|-]hh[:mm[:ss]]` in seconds, hours capped at `max_hours`.
    fn offset(&mut self, max_hours: u32) -> Result<i32> {
        let negative = if self.eat(b'-') {
            true
        } else {
            self.eat(b'+');
            false
        };

        let hours = self.number(3)?;
        if hours > max_hours {
            return Err(self.error("hours out of range"));
        }
        let mut seconds = hours * 3600;

        if self.eat(b':') {
            let minutes = self.number(2)?;
            if minutes > 59 {
                return Err(self.error("minutes out of range"));
            }
            seconds += minutes * 60;

            if self.eat(b':') {
                let secs = self.number(2)?;
                if secs > 59 {
                    return Err(self.error("seconds out of range"));
                }
                seconds += secs;
            }
        }

        let seconds = i32::try_from(seconds).map_err(|_| self.error("offset out of range"))?;
        Ok(if negative { -seconds } else { seconds })
    }

    fn transition(&mut self) -> Result<Transition> {
        let date = match self.peek() {
            Some(b'J') => {
                self.pos += 1;
                let day = self.bounded(3, 1, 365, "Julian day must be 1..=365")?;
                TransitionDate::Julian1(day as u16)
            }
            Some(b'M') => {
                self.pos += 1;
                let month = self.bounded(2, 1, 12, "month must be 1..=12")?;
                self.expect(b'.')?;
                let week = self.bounded(1, 1, 5, "week must be 1..=5")?;
                self.expect(b'.')?;
                let weekday = self.bounded(1, 0, 6, "weekday must be 0..=6")?;
                TransitionDate::MonthWeekDay {
                    month: month as u8,
                    week: week as u8,
                    weekday: weekday as u8,
                }
            }
            Some(b'0'..=b'9') => {
                let day = self.bounded(3, 0, 365, "day must be 0..=365")?;
                TransitionDate::Julian0(day as u16)
            }
            _ => return Err(self.error("expected a transition rule")),
        };

        let time = if self.eat(b'/') {
            self.offset(MAX_TRANSITION_HOURS)?
        } else {
            DEFAULT_TRANSITION_TIME
        };

        Ok(Transition { date, time })
    }

    fn bounded(&mut self, max_digits: usize, min: u32, max: u32, message: &str) -> Result<u32> {
        let value = self.number(max_digits)?;
        if !(min..=max).contains(&value) {
            return Err(self.error(message));
        }
        Ok(value)
    }
}
