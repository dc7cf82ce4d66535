// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scalar lexeme encoding
//!
//! Real formatting and the string escape scheme of ISO 10303-21:
//! `''` for a quote, `\\` for a backslash, `\X2\hhhh..\X0\` for BMP
//! characters, `\X4\hhhhhhhh..\X0\` for astral ones. On read `\X\hh`,
//! `\S\c` and `\P?\` are understood as well.

use ifc_step_model::{Result, StepError};

/// Format a real the STEP way: always a decimal point, no trailing zeros
///
/// `1.0` → `1.`, `1.5` → `1.5`, `1e-7` → `1.E-7`. Non-finite values have
/// no STEP representation and are written as `$`.
pub fn format_real(value: f64, out: &mut String) {
    if !value.is_finite() {
        out.push('$');
        return;
    }

    let mut buffer = [0u8; lexical_core::BUFFER_SIZE];
    let written = lexical_core::write(value, &mut buffer);
    let text: String = written.iter().map(|&b| b as char).collect();

    let (mantissa, exponent) = match text.find(['e', 'E']) {
        Some(pos) => (&text[..pos], Some(&text[pos + 1..])),
        None => (text.as_str(), None),
    };

    if mantissa.contains('.') {
        out.push_str(mantissa.trim_end_matches('0'));
    } else {
        out.push_str(mantissa);
        out.push('.');
    }

    if let Some(exponent) = exponent {
        out.push('E');
        out.push_str(exponent);
    }
}

/// Write a string literal including the surrounding quotes
pub fn encode_string(value: &str, out: &mut String) {
    out.push('\'');

    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\'' => out.push_str("''"),
            '\\' => out.push_str("\\\\"),
            ' '..='~' => out.push(c),
            _ => {
                let astral = c as u32 > 0xFFFF;
                out.push_str(if astral { "\\X4\\" } else { "\\X2\\" });
                push_hex(c, astral, out);
                while let Some(&next) = chars.peek() {
                    if matches!(next, ' '..='~') || (next as u32 > 0xFFFF) != astral {
                        break;
                    }
                    push_hex(next, astral, out);
                    chars.next();
                }
                out.push_str("\\X0\\");
            }
        }
    }

    out.push('\'');
}

fn push_hex(c: char, astral: bool, out: &mut String) {
    if astral {
        out.push_str(&format!("{:08X}", c as u32));
    } else {
        out.push_str(&format!("{:04X}", c as u32));
    }
}

/// Decode the escaped body of a string literal (quotes already stripped)
pub fn decode_string(raw: &str) -> Result<String> {
    if !raw.contains(['\\', '\'']) {
        return Ok(raw.to_string());
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(pos) = rest.find(['\\', '\'']) {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];

        if let Some(after) = rest.strip_prefix("''") {
            out.push('\'');
            rest = after;
        } else if let Some(after) = rest.strip_prefix('\'') {
            return Err(StepError::malformed(format!(
                "unescaped quote in string near `{}`",
                preview(after)
            )));
        } else if let Some(after) = rest.strip_prefix("\\\\") {
            out.push('\\');
            rest = after;
        } else if let Some(after) = rest.strip_prefix("\\X2\\") {
            rest = decode_utf16_run(after, &mut out)?;
        } else if let Some(after) = rest.strip_prefix("\\X4\\") {
            rest = decode_utf32_run(after, &mut out)?;
        } else if let Some(after) = rest.strip_prefix("\\X\\") {
            let hex = after
                .get(..2)
                .ok_or_else(|| StepError::malformed("truncated \\X\\ escape"))?;
            let byte = parse_hex(hex)?;
            out.push(char::from(byte as u8));
            rest = &after[2..];
        } else if let Some(after) = rest.strip_prefix("\\S\\") {
            let c = after
                .chars()
                .next()
                .ok_or_else(|| StepError::malformed("truncated \\S\\ escape"))?;
            let shifted = char::from_u32(c as u32 + 0x80)
                .ok_or_else(|| StepError::malformed("invalid \\S\\ escape"))?;
            out.push(shifted);
            rest = &after[c.len_utf8()..];
        } else if is_code_page_switch(rest) {
            rest = &rest[4..];
        } else {
            // a lone backslash is literal text (common in file paths)
            out.push('\\');
            rest = &rest[1..];
        }
    }

    out.push_str(rest);
    Ok(out)
}

fn is_code_page_switch(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() >= 4
        && bytes[1] == b'P'
        && bytes[2].is_ascii_uppercase()
        && bytes[3] == b'\\'
}

fn decode_utf16_run<'a>(text: &'a str, out: &mut String) -> Result<&'a str> {
    let end = text
        .find("\\X0\\")
        .ok_or_else(|| StepError::malformed("unterminated \\X2\\ escape"))?;
    let hex = &text[..end];
    if hex.len() % 4 != 0 {
        return Err(StepError::malformed(format!(
            "\\X2\\ escape needs 4 hex digits per character: `{}`",
            preview(hex)
        )));
    }

    let units = hex
        .as_bytes()
        .chunks(4)
        .map(|chunk| parse_hex_bytes(chunk).map(|v| v as u16))
        .collect::<Result<Vec<u16>>>()?;

    for decoded in char::decode_utf16(units) {
        let c = decoded.map_err(|e| {
            StepError::malformed(format!("invalid UTF-16 in \\X2\\ escape: {e}"))
        })?;
        out.push(c);
    }

    Ok(&text[end + 4..])
}

fn decode_utf32_run<'a>(text: &'a str, out: &mut String) -> Result<&'a str> {
    let end = text
        .find("\\X0\\")
        .ok_or_else(|| StepError::malformed("unterminated \\X4\\ escape"))?;
    let hex = &text[..end];
    if hex.len() % 8 != 0 {
        return Err(StepError::malformed(format!(
            "\\X4\\ escape needs 8 hex digits per character: `{}`",
            preview(hex)
        )));
    }

    for chunk in hex.as_bytes().chunks(8) {
        let code = parse_hex_bytes(chunk)?;
        let c = char::from_u32(code)
            .ok_or_else(|| StepError::malformed(format!("invalid code point {code:X}")))?;
        out.push(c);
    }

    Ok(&text[end + 4..])
}

fn parse_hex(text: &str) -> Result<u32> {
    parse_hex_bytes(text.as_bytes())
}

fn parse_hex_bytes(bytes: &[u8]) -> Result<u32> {
    bytes.iter().try_fold(0u32, |acc, &b| {
        let digit = (b as char)
            .to_digit(16)
            .ok_or_else(|| StepError::malformed(format!("invalid hex digit `{}`", b as char)))?;
        Ok(acc * 16 + digit)
    })
}

fn preview(text: &str) -> String {
    text.chars().take(16).collect()
}
