use foundation::math::{Placement, Vec2};

/// Malformed positional attribute (`xy`, `angle`, `size`).
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeError {
    NotANumber {
        attr: &'static str,
        value: String,
    },
    WrongArity {
        attr: &'static str,
        value: String,
        expected: usize,
    },
}

impl std::fmt::Display for AttributeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttributeError::NotANumber { attr, value } => {
                write!(f, "attribute {attr}=\"{value}\" is not a finite number list")
            }
            AttributeError::WrongArity {
                attr,
                value,
                expected,
            } => write!(f, "attribute {attr}=\"{value}\" needs {expected} numbers"),
        }
    }
}

impl std::error::Error for AttributeError {}

fn parse_numbers(attr: &'static str, value: &str) -> Result<Vec<f64>, AttributeError> {
    value
        .split_whitespace()
        .map(|part| {
            part.parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .ok_or_else(|| AttributeError::NotANumber {
                    attr,
                    value: value.to_string(),
                })
        })
        .collect()
}

/// Parses `"<a> <b>"` into a pair. Used for `xy` and `size`.
pub fn parse_pair(attr: &'static str, value: &str) -> Result<Vec2, AttributeError> {
    match parse_numbers(attr, value)?.as_slice() {
        [a, b] => Ok(Vec2::new(*a, *b)),
        _ => Err(AttributeError::WrongArity {
            attr,
            value: value.to_string(),
            expected: 2,
        }),
    }
}

pub fn parse_angle(value: &str) -> Result<f64, AttributeError> {
    match parse_numbers("angle", value)?.as_slice() {
        [a] => Ok(*a),
        _ => Err(AttributeError::WrongArity {
            attr: "angle",
            value: value.to_string(),
            expected: 1,
        }),
    }
}

/// Local placement from optional `xy`/`angle` values (defaults `"0 0"`/`0`).
/// Blank values count as absent.
pub fn parse_placement(xy: Option<&str>, angle: Option<&str>) -> Result<Placement, AttributeError> {
    let xy = xy.filter(|v| !v.trim().is_empty());
    let angle = angle.filter(|v| !v.trim().is_empty());
    let origin = match xy {
        Some(v) => parse_pair("xy", v)?,
        None => Vec2::ZERO,
    };
    let angle = match angle {
        Some(v) => parse_angle(v)?,
        None => 0.0,
    };
    Ok(Placement::new(origin, angle))
}

#[cfg(test)]
mod tests {
    use super::{AttributeError, parse_angle, parse_pair, parse_placement};
    use foundation::math::{Placement, Vec2};

    #[test]
    fn pair_accepts_extra_whitespace_and_negatives() {
        assert_eq!(parse_pair("xy", " -10   2.5 ").unwrap(), Vec2::new(-10.0, 2.5));
    }

    #[test]
    fn pair_rejects_wrong_arity_and_garbage() {
        assert!(matches!(
            parse_pair("size", "100"),
            Err(AttributeError::WrongArity { expected: 2, .. })
        ));
        assert!(matches!(
            parse_pair("xy", "1 two"),
            Err(AttributeError::NotANumber { .. })
        ));
        assert!(matches!(
            parse_pair("xy", "NaN 1"),
            Err(AttributeError::NotANumber { .. })
        ));
    }

    #[test]
    fn placement_defaults_to_origin() {
        assert_eq!(parse_placement(None, None).unwrap(), Placement::ORIGIN);
        assert_eq!(
            parse_placement(Some("10 20"), Some("0.5")).unwrap(),
            Placement::new(Vec2::new(10.0, 20.0), 0.5)
        );
        assert_eq!(parse_angle("-1.5").unwrap(), -1.5);
        assert_eq!(parse_placement(Some(" "), Some("")).unwrap(), Placement::ORIGIN);
    }
}
