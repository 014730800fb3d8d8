//! Number formatting per ECMAScript `Number::toString`, which is what JSON
//! text uses for finite numbers.
//!
//! `ryu` supplies the shortest round-trip digits; this module only decides
//! where the decimal point goes and when to switch to exponent form.

/// Append the JSON text for `n`. Non-finite values become `null`.
pub fn write_number(n: f64, out: &mut String) {
    if !n.is_finite() {
        out.push_str("null");
        return;
    }
    // Covers -0 as well.
    if n == 0.0 {
        out.push('0');
        return;
    }
    if n < 0.0 {
        out.push('-');
    }

    let mut buf = ryu::Buffer::new();
    let (digits, point) = decimal_digits(buf.format_finite(n.abs()));
    let k = digits.len() as i32;
    let n = point;

    if k <= n && n <= 21 {
        // Integer: digits then n - k zeros.
        out.push_str(&digits);
        for _ in 0..(n - k) {
            out.push('0');
        }
    } else if 0 < n && n <= 21 {
        let (int, frac) = digits.split_at(n as usize);
        out.push_str(int);
        out.push('.');
        out.push_str(frac);
    } else if -6 < n && n <= 0 {
        out.push_str("0.");
        for _ in 0..(-n) {
            out.push('0');
        }
        out.push_str(&digits);
    } else {
        let exponent = n - 1;
        let (first, rest) = digits.split_at(1);
        out.push_str(first);
        if !rest.is_empty() {
            out.push('.');
            out.push_str(rest);
        }
        out.push('e');
        out.push(if exponent < 0 { '-' } else { '+' });
        out.push_str(&exponent.abs().to_string());
    }
}

/// Number formatted to a fresh string.
pub fn format_number(n: f64) -> String {
    let mut out = String::new();
    write_number(n, &mut out);
    out
}

/// Split a positive `ryu` rendering (`"123.0"`, `"0.001"`, `"1.5e-7"`,
/// `"1e21"`) into significant digits and decimal point position, so that
/// the value is `0.d1d2... * 10^point`.
fn decimal_digits(rendered: &str) -> (String, i32) {
    let (mantissa, exp10) = match rendered.split_once(['e', 'E']) {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (rendered, 0),
    };
    let (int, frac) = mantissa.split_once('.').unwrap_or((mantissa, ""));

    let mut point = int.len() as i32 + exp10;
    let all: String = int.chars().chain(frac.chars()).collect();
    let trimmed_front = all.trim_start_matches('0');
    point -= (all.len() - trimmed_front.len()) as i32;
    let digits = trimmed_front.trim_end_matches('0').to_string();
    (digits, point)
}
