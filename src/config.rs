use crate::error::{Error, Result};

/// Raw, still-unparsed option values as they arrive from the CLI.
#[derive(Debug, Clone, Default)]
pub struct RawOptions {
    pub size: Option<String>,
    pub margins: Option<String>,
    pub position: Option<String>,
    pub scale: Option<String>,
    pub font_size: Option<String>,
    pub node_values: Option<String>,
}

/// Fully resolved render configuration. Built once per render; nothing
/// downstream re-reads the raw option strings.
#[derive(Debug, Clone)]
pub struct Config {
    pub width: f64,
    pub height: f64,
    pub margins: Margins,
    /// Attribute names (x, y) for manual node placement.
    pub position: Option<(String, String)>,
    /// Pixels per attribute unit in manual placement mode.
    pub scale: Option<f64>,
    pub font_size: f64,
    pub node_values: Option<ValueFormat>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            margins: Margins::default(),
            position: None,
            scale: None,
            font_size: 12.0,
            node_values: None,
        }
    }
}

impl Config {
    /// Merge raw option values over the defaults. Fails fast on the first
    /// malformed value; a partially resolved config is never observable.
    pub fn resolve(raw: &RawOptions) -> Result<Self> {
        let mut config = Config::default();
        if let Some(size) = &raw.size {
            let (width, height) = parse_size(size)?;
            config.width = width;
            config.height = height;
        }
        if let Some(margins) = &raw.margins {
            config.margins = parse_margins(margins)?;
        }
        if let Some(position) = &raw.position {
            config.position = Some(parse_position(position)?);
        }
        if let Some(scale) = &raw.scale {
            config.scale = Some(parse_number(scale)?);
        }
        if let Some(font_size) = &raw.font_size {
            config.font_size = parse_number(font_size)?;
        }
        if let Some(spec) = &raw.node_values {
            config.node_values = Some(ValueFormat::parse(spec)?);
        }
        Ok(config)
    }

    /// Drawing area left over after margins.
    pub fn inner_size(&self) -> (f64, f64) {
        (
            (self.width - self.margins.left - self.margins.right).max(0.0),
            (self.height - self.margins.top - self.margins.bottom).max(0.0),
        )
    }
}

fn parse_number(token: &str) -> Result<f64> {
    let value: f64 = token
        .trim()
        .parse()
        .map_err(|_| Error::InvalidArgument(format!("expected a number, got {token:?}")))?;
    if !value.is_finite() {
        return Err(Error::InvalidArgument(format!(
            "expected a finite number, got {token:?}"
        )));
    }
    Ok(value)
}

fn parse_numbers(value: &str) -> Result<Vec<f64>> {
    value.split(',').map(parse_number).collect()
}

/// `"640"` is a square; `"800,600"` is width,height.
pub fn parse_size(value: &str) -> Result<(f64, f64)> {
    let numbers = parse_numbers(value)?;
    match numbers[..] {
        [side] => Ok((side, side)),
        [width, height] => Ok((width, height)),
        _ => Err(Error::InvalidArgument(format!(
            "size: expected 1 or 2 numbers, got {}",
            numbers.len()
        ))),
    }
}

/// CSS-style margin shorthand: 1 value is uniform, 2 is vertical,horizontal,
/// 4 is top,right,bottom,left.
pub fn parse_margins(value: &str) -> Result<Margins> {
    let numbers = parse_numbers(value)?;
    match numbers[..] {
        [all] => Ok(Margins {
            top: all,
            right: all,
            bottom: all,
            left: all,
        }),
        [vertical, horizontal] => Ok(Margins {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }),
        [top, right, bottom, left] => Ok(Margins {
            top,
            right,
            bottom,
            left,
        }),
        _ => Err(Error::InvalidArgument(format!(
            "margins: expected 1, 2 or 4 numbers, got {}",
            numbers.len()
        ))),
    }
}

/// Exactly two attribute names: the x attribute and the y attribute.
pub fn parse_position(value: &str) -> Result<(String, String)> {
    let attrs: Vec<&str> = value.split(',').map(str::trim).collect();
    match attrs[..] {
        [x, y] if !x.is_empty() && !y.is_empty() => Ok((x.to_string(), y.to_string())),
        _ => Err(Error::InvalidArgument(format!(
            "position: expected 2 attribute names, got {value:?}"
        ))),
    }
}

/// A small subset of d3-format specifiers: optional `,` for thousands
/// grouping, optional `.N` precision, optional trailing `f` (fixed) or
/// `d` (integer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueFormat {
    grouping: bool,
    precision: Option<usize>,
    kind: FormatKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormatKind {
    Auto,
    Fixed,
    Integer,
}

impl ValueFormat {
    pub fn parse(spec: &str) -> Result<Self> {
        let mut rest = spec;
        let grouping = rest.starts_with(',');
        if grouping {
            rest = &rest[1..];
        }
        let mut precision = None;
        if let Some(digits) = rest.strip_prefix('.') {
            let end = digits
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(digits.len());
            if end == 0 {
                return Err(Error::InvalidArgument(format!(
                    "node value format: missing precision in {spec:?}"
                )));
            }
            precision = Some(digits[..end].parse::<usize>().map_err(|_| {
                Error::InvalidArgument(format!("node value format: bad precision in {spec:?}"))
            })?);
            rest = &digits[end..];
        }
        let kind = match rest {
            "" => FormatKind::Auto,
            "f" => FormatKind::Fixed,
            "d" => FormatKind::Integer,
            _ => {
                return Err(Error::InvalidArgument(format!(
                    "node value format: unsupported specifier {spec:?}"
                )));
            }
        };
        if kind == FormatKind::Integer && precision.is_some() {
            return Err(Error::InvalidArgument(format!(
                "node value format: precision does not apply to \"d\" in {spec:?}"
            )));
        }
        Ok(Self {
            grouping,
            precision,
            kind,
        })
    }

    pub fn format(&self, value: f64) -> String {
        let text = match self.kind {
            FormatKind::Integer => format!("{}", value.round() as i64),
            FormatKind::Fixed => format!("{:.*}", self.precision.unwrap_or(6), value),
            FormatKind::Auto => match self.precision {
                Some(precision) => format!("{value:.precision$}"),
                None => format!("{value}"),
            },
        };
        if self.grouping {
            group_thousands(&text)
        } else {
            text
        }
    }
}

fn group_thousands(text: &str) -> String {
    let (int_part, frac_part) = match text.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (text, None),
    };
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", int_part),
    };
    let mut grouped = String::new();
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let mut out = format!("{sign}{grouped}");
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_one_number_is_square() {
        assert_eq!(parse_size("640").unwrap(), (640.0, 640.0));
    }

    #[test]
    fn size_two_numbers() {
        assert_eq!(parse_size("800, 600").unwrap(), (800.0, 600.0));
    }

    #[test]
    fn size_three_numbers_rejected() {
        assert!(matches!(parse_size("1,2,3"), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn margins_one_value_uniform() {
        let margins = parse_margins("10").unwrap();
        assert_eq!(
            margins,
            Margins {
                top: 10.0,
                right: 10.0,
                bottom: 10.0,
                left: 10.0
            }
        );
    }

    #[test]
    fn margins_two_values_vertical_horizontal() {
        let margins = parse_margins("10,20").unwrap();
        assert_eq!(
            margins,
            Margins {
                top: 10.0,
                right: 20.0,
                bottom: 10.0,
                left: 20.0
            }
        );
    }

    #[test]
    fn margins_four_values_clockwise() {
        let margins = parse_margins("1,2,3,4").unwrap();
        assert_eq!(
            margins,
            Margins {
                top: 1.0,
                right: 2.0,
                bottom: 3.0,
                left: 4.0
            }
        );
    }

    #[test]
    fn margins_other_counts_rejected() {
        for bad in ["", "1,2,3", "1,2,3,4,5"] {
            assert!(
                matches!(parse_margins(bad), Err(Error::InvalidArgument(_))),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn non_numeric_token_rejected() {
        assert!(matches!(
            parse_margins("10,abc"),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(parse_size("NaN"), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn position_requires_two_attributes() {
        assert_eq!(
            parse_position("x, y").unwrap(),
            ("x".to_string(), "y".to_string())
        );
        assert!(matches!(
            parse_position("x"),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            parse_position("x,y,z"),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn resolve_defaults() {
        let config = Config::resolve(&RawOptions::default()).unwrap();
        assert_eq!(config.width, 800.0);
        assert_eq!(config.height, 600.0);
        assert_eq!(config.margins, Margins::default());
        assert_eq!(config.font_size, 12.0);
        assert!(config.position.is_none());
        assert!(config.node_values.is_none());
    }

    #[test]
    fn resolve_rejects_bad_scale() {
        let raw = RawOptions {
            scale: Some("fast".to_string()),
            ..RawOptions::default()
        };
        assert!(matches!(
            Config::resolve(&raw),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn inner_size_subtracts_margins() {
        let raw = RawOptions {
            size: Some("100,80".to_string()),
            margins: Some("10,20".to_string()),
            ..RawOptions::default()
        };
        let config = Config::resolve(&raw).unwrap();
        assert_eq!(config.inner_size(), (60.0, 60.0));
    }

    #[test]
    fn value_format_fixed() {
        let fmt = ValueFormat::parse(".1f").unwrap();
        assert_eq!(fmt.format(10.0), "10.0");
        assert_eq!(fmt.format(2.345), "2.3");
    }

    #[test]
    fn value_format_grouped_integer() {
        let fmt = ValueFormat::parse(",d").unwrap();
        assert_eq!(fmt.format(1234567.0), "1,234,567");
        assert_eq!(fmt.format(-1234.4), "-1,234");
    }

    #[test]
    fn value_format_auto() {
        let fmt = ValueFormat::parse("").unwrap();
        assert_eq!(fmt.format(10.0), "10");
        assert_eq!(fmt.format(2.5), "2.5");
    }

    #[test]
    fn value_format_unknown_specifier_rejected() {
        assert!(matches!(
            ValueFormat::parse("%"),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            ValueFormat::parse(".2d"),
            Err(Error::InvalidArgument(_))
        ));
    }
}
