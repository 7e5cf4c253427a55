//! Types scalaires des propriétés et leur représentation textuelle.
//!
//! Le format texte suit les conventions DIDL-Lite : booléens en `"1"`/`"0"`,
//! entiers en décimal, nombres flottants avec deux décimales.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Type sémantique d'une propriété liée.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyKind {
    Element,
    String,
    Boolean,
    Integer,
    UnsignedInteger,
    Long,
    UnsignedLong,
    Number,
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PropertyKind::Element => "element",
            PropertyKind::String => "string",
            PropertyKind::Boolean => "boolean",
            PropertyKind::Integer => "integer",
            PropertyKind::UnsignedInteger => "unsigned integer",
            PropertyKind::Long => "long",
            PropertyKind::UnsignedLong => "unsigned long",
            PropertyKind::Number => "number",
        };
        f.write_str(name)
    }
}

/// Valeur scalaire dynamiquement typée, utilisée par l'adressage par chemin
/// et l'export JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    String(String),
    Boolean(bool),
    Integer(i32),
    UnsignedInteger(u32),
    Long(i64),
    UnsignedLong(u64),
    Number(f64),
}

impl Scalar {
    pub fn kind(&self) -> PropertyKind {
        match self {
            Scalar::String(_) => PropertyKind::String,
            Scalar::Boolean(_) => PropertyKind::Boolean,
            Scalar::Integer(_) => PropertyKind::Integer,
            Scalar::UnsignedInteger(_) => PropertyKind::UnsignedInteger,
            Scalar::Long(_) => PropertyKind::Long,
            Scalar::UnsignedLong(_) => PropertyKind::UnsignedLong,
            Scalar::Number(_) => PropertyKind::Number,
        }
    }

    /// Représentation texte, identique à celle écrite dans le document.
    pub fn to_text(&self) -> String {
        match self {
            Scalar::String(v) => v.format(),
            Scalar::Boolean(v) => v.format(),
            Scalar::Integer(v) => v.format(),
            Scalar::UnsignedInteger(v) => v.format(),
            Scalar::Long(v) => v.format(),
            Scalar::UnsignedLong(v) => v.format(),
            Scalar::Number(v) => v.format(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(v) => Some(v),
            _ => None,
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::String(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::String(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Boolean(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Integer(value)
    }
}

impl From<u32> for Scalar {
    fn from(value: u32) -> Self {
        Scalar::UnsignedInteger(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Long(value)
    }
}

impl From<u64> for Scalar {
    fn from(value: u64) -> Self {
        Scalar::UnsignedLong(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Number(value)
    }
}

/// Type Rust pouvant être stocké derrière une liaison scalaire.
pub trait ScalarValue: Clone + Send + Sync + 'static {
    const KIND: PropertyKind;

    /// Formate la valeur pour le document.
    fn format(&self) -> String;

    /// Lit la valeur depuis le texte du document. La chaîne entière doit
    /// être consommée.
    fn parse_text(raw: &str) -> Option<Self>;

    fn to_scalar(&self) -> Scalar;

    fn from_scalar(value: &Scalar) -> Option<Self>;
}

impl ScalarValue for String {
    const KIND: PropertyKind = PropertyKind::String;

    fn format(&self) -> String {
        self.clone()
    }

    fn parse_text(raw: &str) -> Option<Self> {
        Some(raw.to_string())
    }

    fn to_scalar(&self) -> Scalar {
        Scalar::String(self.clone())
    }

    fn from_scalar(value: &Scalar) -> Option<Self> {
        match value {
            Scalar::String(v) => Some(v.clone()),
            other => Some(other.to_text()),
        }
    }
}

impl ScalarValue for bool {
    const KIND: PropertyKind = PropertyKind::Boolean;

    fn format(&self) -> String {
        if *self { "1" } else { "0" }.to_string()
    }

    fn parse_text(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => Some(true),
            "0" | "false" | "no" => Some(false),
            _ => None,
        }
    }

    fn to_scalar(&self) -> Scalar {
        Scalar::Boolean(*self)
    }

    fn from_scalar(value: &Scalar) -> Option<Self> {
        match value {
            Scalar::Boolean(v) => Some(*v),
            Scalar::String(v) => Self::parse_text(v),
            _ => None,
        }
    }
}

/// Découpe un entier textuel en (négatif, base, chiffres).
///
/// Accepte un signe optionnel, puis `0x`/`0X` (hexadécimal), un `0` initial
/// suivi d'autres chiffres (octal) ou du décimal.
fn split_integer(raw: &str) -> Option<(bool, u32, &str)> {
    let s = raw.trim();
    let (negative, s) = match s.as_bytes().first()? {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };
    let (radix, digits) = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        (16, hex)
    } else if s.len() > 1 && s.starts_with('0') {
        (8, &s[1..])
    } else {
        (10, s)
    };
    // from_str_radix accepte un signe : on l'a déjà consommé
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return None;
    }
    Some((negative, radix, digits))
}

fn parse_signed(raw: &str) -> Option<i64> {
    let (negative, radix, digits) = split_integer(raw)?;
    let magnitude = u64::from_str_radix(digits, radix).ok()?;
    if negative {
        if magnitude == i64::MIN.unsigned_abs() {
            Some(i64::MIN)
        } else {
            i64::try_from(magnitude).ok().map(|v| -v)
        }
    } else {
        i64::try_from(magnitude).ok()
    }
}

fn parse_unsigned(raw: &str) -> Option<u64> {
    let (negative, radix, digits) = split_integer(raw)?;
    let magnitude = u64::from_str_radix(digits, radix).ok()?;
    if negative && magnitude != 0 {
        return None;
    }
    Some(magnitude)
}

macro_rules! integer_scalar {
    ($ty:ty, $kind:ident, $parse:ident) => {
        impl ScalarValue for $ty {
            const KIND: PropertyKind = PropertyKind::$kind;

            fn format(&self) -> String {
                self.to_string()
            }

            fn parse_text(raw: &str) -> Option<Self> {
                $parse(raw).and_then(|v| <$ty>::try_from(v).ok())
            }

            fn to_scalar(&self) -> Scalar {
                Scalar::$kind(*self)
            }

            fn from_scalar(value: &Scalar) -> Option<Self> {
                match value {
                    Scalar::Integer(v) => <$ty>::try_from(*v).ok(),
                    Scalar::UnsignedInteger(v) => <$ty>::try_from(*v).ok(),
                    Scalar::Long(v) => <$ty>::try_from(*v).ok(),
                    Scalar::UnsignedLong(v) => <$ty>::try_from(*v).ok(),
                    Scalar::String(v) => Self::parse_text(v),
                    _ => None,
                }
            }
        }
    };
}

integer_scalar!(i32, Integer, parse_signed);
integer_scalar!(u32, UnsignedInteger, parse_unsigned);
integer_scalar!(i64, Long, parse_signed);
integer_scalar!(u64, UnsignedLong, parse_unsigned);

impl ScalarValue for f64 {
    const KIND: PropertyKind = PropertyKind::Number;

    fn format(&self) -> String {
        format!("{:.2}", self)
    }

    fn parse_text(raw: &str) -> Option<Self> {
        let value: f64 = raw.trim().parse().ok()?;
        value.is_finite().then_some(value)
    }

    fn to_scalar(&self) -> Scalar {
        Scalar::Number(*self)
    }

    fn from_scalar(value: &Scalar) -> Option<Self> {
        match value {
            Scalar::Number(v) => Some(*v),
            Scalar::Integer(v) => Some(f64::from(*v)),
            Scalar::UnsignedInteger(v) => Some(f64::from(*v)),
            Scalar::String(v) => Self::parse_text(v),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boolean_format_and_parse() {
        assert_eq!(true.format(), "1");
        assert_eq!(false.format(), "0");
        assert_eq!(bool::parse_text("TRUE"), Some(true));
        assert_eq!(bool::parse_text("no"), Some(false));
        assert_eq!(bool::parse_text("0"), Some(false));
        assert_eq!(bool::parse_text("maybe"), None);
    }

    #[test]
    fn test_integer_prefixes() {
        assert_eq!(i32::parse_text("42"), Some(42));
        assert_eq!(i32::parse_text("-17"), Some(-17));
        assert_eq!(i32::parse_text("0x1F"), Some(31));
        assert_eq!(i32::parse_text("010"), Some(8));
        assert_eq!(u64::parse_text("0"), Some(0));
        assert_eq!(u32::parse_text(" 7 "), Some(7));
    }

    #[test]
    fn test_integer_rejects_garbage() {
        assert_eq!(i32::parse_text("12abc"), None);
        assert_eq!(i32::parse_text(""), None);
        assert_eq!(i32::parse_text("0x"), None);
        assert_eq!(i32::parse_text("--1"), None);
        assert_eq!(u32::parse_text("-1"), None);
        assert_eq!(i32::parse_text("4294967296"), None);
        assert_eq!(i64::parse_text("-9223372036854775808"), Some(i64::MIN));
    }

    #[test]
    fn test_number_two_decimals() {
        assert_eq!(3.14159f64.format(), "3.14");
        assert_eq!(2f64.format(), "2.00");
        assert_eq!(f64::parse_text("9.99"), Some(9.99));
        assert_eq!(f64::parse_text("9.99 EUR"), None);
    }

    #[test]
    fn test_scalar_conversions() {
        assert_eq!(u32::from_scalar(&Scalar::Integer(5)), Some(5));
        assert_eq!(u32::from_scalar(&Scalar::Integer(-5)), None);
        assert_eq!(String::from_scalar(&Scalar::Boolean(true)), Some("1".to_string()));
        assert_eq!(Scalar::from(1.5f64).to_text(), "1.50");
        assert_eq!(Scalar::from("x").kind(), PropertyKind::String);
    }
}
