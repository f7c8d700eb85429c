//! ITA2 (Baudot-Murray) teleprinter code.
//!
//! Converts between ASCII characters and 5-bit tape units. Each code has a
//! letters (LTRS) and a figures (FIGS) meaning; two reserved codes switch
//! between them. Only the characters the teleprinter could print are
//! accepted; everything else is rejected rather than dropped.
//!
//! Impulse 1 is the least-significant bit of a code, matching the
//! keystream combiner.
//!
//! Shift state is always explicit: the [`Encoder`] and [`Decoder`] own
//! theirs, and [`decode`] takes it by `&mut`.

use serde::{Deserialize, Serialize};

use crate::error::LorenzError;

/// Letters-shift code.
pub const LTRS: u8 = 31;

/// Figures-shift code.
pub const FIGS: u8 = 27;

/// Largest valid 5-bit code.
pub const MAX_CODE: u8 = 0b1_1111;

/// Bell, printed by figures code 26.
pub const BEL: char = '\x07';

/// "Who are you?" answer-back request, figures code 18. Written as `$`.
pub const WRU: char = '$';

/// Codes that print the same in either shift: NUL, CR, space, LF.
const EITHER_SHIFT: [u8; 4] = [0, 2, 4, 8];

/// Letters table, indexed by code.
const LTRS_TABLE: [Option<char>; 32] = [
    Some('\0'),
    Some('T'),
    Some('\r'),
    Some('O'),
    Some(' '),
    Some('H'),
    Some('N'),
    Some('M'),
    Some('\n'),
    Some('L'),
    Some('R'),
    Some('G'),
    Some('I'),
    Some('P'),
    Some('C'),
    Some('V'),
    Some('E'),
    Some('Z'),
    Some('D'),
    Some('B'),
    Some('S'),
    Some('Y'),
    Some('F'),
    Some('X'),
    Some('A'),
    Some('W'),
    Some('J'),
    None, // FIGS
    Some('U'),
    Some('Q'),
    Some('K'),
    None, // LTRS
];

/// Figures table, indexed by code. Codes 5 and 22 are left for national use.
const FIGS_TABLE: [Option<char>; 32] = [
    Some('\0'),
    Some('5'),
    Some('\r'),
    Some('9'),
    Some(' '),
    None,
    Some(','),
    Some('.'),
    Some('\n'),
    Some(')'),
    Some('4'),
    Some('&'),
    Some('8'),
    Some('0'),
    Some(':'),
    Some('='),
    Some('3'),
    Some('+'),
    Some(WRU),
    Some('?'),
    Some('\''),
    Some('6'),
    None,
    Some('/'),
    Some('-'),
    Some('2'),
    Some(BEL),
    None, // FIGS
    Some('7'),
    Some('1'),
    Some('('),
    None, // LTRS
];

/// Teleprinter case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shift {
    /// Letters case.
    #[default]
    Letters,
    /// Figures case.
    Figures,
}

impl Shift {
    /// Code that switches the printer into this shift.
    pub const fn code(self) -> u8 {
        match self {
            Shift::Letters => LTRS,
            Shift::Figures => FIGS,
        }
    }

    /// Returns the shift selected by `code`, if it is a shift code.
    pub const fn from_code(code: u8) -> Option<Shift> {
        match code {
            LTRS => Some(Shift::Letters),
            FIGS => Some(Shift::Figures),
            _ => None,
        }
    }

    fn table(self) -> &'static [Option<char>; 32] {
        match self {
            Shift::Letters => &LTRS_TABLE,
            Shift::Figures => &FIGS_TABLE,
        }
    }
}

/// Shift the encoder assumes the receiving printer is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitialShift {
    /// Printer starts in letters; no leading shift before letters.
    #[default]
    Letters,
    /// Printer state is unknown; the first shift-specific character is
    /// always preceded by its shift code.
    Unknown,
}

/// One encoded character: an optional shift code followed by the code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Encoded {
    /// Shift change emitted before the character, if any.
    pub shift: Option<Shift>,
    /// Character code.
    pub code: u8,
}

impl Encoded {
    /// Tape units in emission order.
    pub fn units(&self) -> impl Iterator<Item = u8> {
        self.shift.map(Shift::code).into_iter().chain(Some(self.code))
    }
}

/// Maps a character to the shift it needs and its code.
///
/// Returns `None` as the shift for characters valid in either case.
fn lookup(ch: char) -> Option<(Option<Shift>, u8)> {
    let ch = match ch {
        '<' | '[' | '{' => '(',
        '>' | ']' | '}' => ')',
        '~' => BEL,
        c => c.to_ascii_uppercase(),
    };
    if let Some(&code) = EITHER_SHIFT
        .iter()
        .find(|&&code| LTRS_TABLE[code as usize] == Some(ch))
    {
        return Some((None, code));
    }
    for shift in [Shift::Letters, Shift::Figures] {
        if let Some(code) = shift.table().iter().position(|&c| c == Some(ch)) {
            return Some((Some(shift), code as u8));
        }
    }
    None
}

/// Stateful ASCII to ITA2 encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoder {
    shift: Option<Shift>,
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder {
    /// Creates an encoder that assumes letters shift.
    pub fn new() -> Self {
        Self::with_initial(InitialShift::Letters)
    }

    /// Creates an encoder with the given initial printer assumption.
    pub fn with_initial(initial: InitialShift) -> Self {
        let shift = match initial {
            InitialShift::Letters => Some(Shift::Letters),
            InitialShift::Unknown => None,
        };
        Encoder { shift }
    }

    /// Shift the printer is known to be in, if any.
    pub fn shift(&self) -> Option<Shift> {
        self.shift
    }

    /// Encodes one character.
    ///
    /// # Errors
    /// Returns [`LorenzError::UnsupportedSymbol`] if the character has no
    /// teleprinter code. The shift state is left unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use lorenz_sz40::baudot::{Encoder, Shift};
    ///
    /// let mut enc = Encoder::new();
    /// let e = enc.encode('7').unwrap();
    /// assert_eq!(e.shift, Some(Shift::Figures));
    /// assert_eq!(e.code, 28);
    /// ```
    pub fn encode(&mut self, ch: char) -> Result<Encoded, LorenzError> {
        let (needed, code) = lookup(ch).ok_or(LorenzError::UnsupportedSymbol(ch))?;
        let shift = match needed {
            Some(s) if self.shift != Some(s) => {
                self.shift = Some(s);
                Some(s)
            }
            _ => None,
        };
        Ok(Encoded { shift, code })
    }

    /// Encodes a string into tape units, shift codes included.
    ///
    /// # Errors
    /// Returns [`LorenzError::UnsupportedSymbol`] on the first character
    /// with no teleprinter code.
    pub fn encode_str(&mut self, text: &str) -> Result<Vec<u8>, LorenzError> {
        let mut out = Vec::with_capacity(text.len());
        for ch in text.chars() {
            out.extend(self.encode(ch)?.units());
        }
        Ok(out)
    }
}

/// Decodes one tape unit under the given shift state.
///
/// Shift codes update `shift` and yield `None`.
///
/// # Errors
/// Returns [`LorenzError::UnsupportedCode`] if `code` is wider than 5 bits
/// or is unassigned in the current shift. `shift` is left unchanged.
///
/// # Examples
///
/// ```
/// use lorenz_sz40::baudot::{decode, Shift, FIGS};
///
/// let mut shift = Shift::Letters;
/// assert_eq!(decode(24, &mut shift).unwrap(), Some('A'));
/// assert_eq!(decode(FIGS, &mut shift).unwrap(), None);
/// assert_eq!(decode(24, &mut shift).unwrap(), Some('-'));
/// ```
pub fn decode(code: u8, shift: &mut Shift) -> Result<Option<char>, LorenzError> {
    if code > MAX_CODE {
        return Err(LorenzError::UnsupportedCode(code));
    }
    if let Some(s) = Shift::from_code(code) {
        *shift = s;
        return Ok(None);
    }
    match shift.table()[code as usize] {
        Some(ch) => Ok(Some(ch)),
        None => Err(LorenzError::UnsupportedCode(code)),
    }
}

/// Stateful ITA2 to ASCII decoder. Starts in letters shift.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Decoder {
    shift: Shift,
}

impl Decoder {
    /// Creates a decoder in letters shift.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current shift state.
    pub fn shift(&self) -> Shift {
        self.shift
    }

    /// Decodes one unit, tracking shift changes.
    ///
    /// # Errors
    /// See [`decode`].
    pub fn decode(&mut self, code: u8) -> Result<Option<char>, LorenzError> {
        decode(code, &mut self.shift)
    }
}

/// Reads a plain (unenciphered) tape as text, starting in letters shift.
///
/// # Errors
/// Returns [`LorenzError::UnsupportedCode`] for the first invalid unit.
pub fn read_tape(units: &[u8]) -> Result<String, LorenzError> {
    let mut decoder = Decoder::new();
    let mut text = String::with_capacity(units.len());
    for &unit in units {
        if let Some(ch) = decoder.decode(unit)? {
            text.push(ch);
        }
    }
    Ok(text)
}
