// Number rendering for data labels and axis ticks

use serde::Serialize;

/// Separators used when rendering numbers as text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NumberFormat {
    pub thousands: char,
    pub decimal: char,
}

impl NumberFormat {
    pub const fn english() -> Self {
        Self { thousands: ',', decimal: '.' }
    }

    pub const fn german() -> Self {
        Self { thousands: '.', decimal: ',' }
    }

    /// One decimal place followed by " %" (e.g. `30.0 %`)
    pub fn percent(&self, value: f64) -> String {
        format!("{} %", self.fixed(value, 1))
    }

    /// Integer part grouped by thousands; fractional part (up to two places) kept
    /// only when the value is not whole (e.g. `12,345` or `1,234.5`)
    pub fn grouped(&self, value: f64) -> String {
        let rendered = self.fixed(value, 2);
        let (int_part, frac_part) = match rendered.split_once(self.decimal) {
            Some((i, f)) => (i.to_string(), f.trim_end_matches('0').to_string()),
            None => (rendered, String::new()),
        };

        let (sign, digits) = match int_part.strip_prefix('-') {
            Some(d) => ("-", d),
            None => ("", int_part.as_str()),
        };

        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(self.thousands);
            }
            grouped.push(ch);
        }

        let mut out = format!("{}{}", sign, grouped);
        if !frac_part.is_empty() {
            out.push(self.decimal);
            out.push_str(&frac_part);
        }
        if out == "-0" {
            out = "0".to_string();
        }
        out
    }

    /// Fixed decimal places with this format's decimal mark (no grouping)
    pub fn fixed(&self, value: f64, places: usize) -> String {
        let s = format!("{:.*}", places, value);
        if self.decimal == '.' {
            s
        } else {
            s.replace('.', &self.decimal.to_string())
        }
    }
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self::english()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent() {
        assert_eq!(NumberFormat::english().percent(30.0), "30.0 %");
        assert_eq!(NumberFormat::english().percent(12.345), "12.3 %");
        assert_eq!(NumberFormat::german().percent(12.345), "12,3 %");
    }

    #[test]
    fn test_grouped_integers() {
        let en = NumberFormat::english();
        assert_eq!(en.grouped(0.0), "0");
        assert_eq!(en.grouped(999.0), "999");
        assert_eq!(en.grouped(1000.0), "1,000");
        assert_eq!(en.grouped(1234567.0), "1,234,567");
        assert_eq!(en.grouped(-45210.0), "-45,210");
    }

    #[test]
    fn test_grouped_fractions() {
        assert_eq!(NumberFormat::english().grouped(1234.5), "1,234.5");
        assert_eq!(NumberFormat::german().grouped(1234.5), "1.234,5");
        assert_eq!(NumberFormat::german().grouped(1234.567), "1.234,57");
    }

    #[test]
    fn test_grouped_negative_zero() {
        assert_eq!(NumberFormat::english().grouped(-0.001), "0");
    }
}
