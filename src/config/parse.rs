//! Textual configuration reader.
//!
//! The format is line-oriented `key = value` with `#` comments. Scalar
//! parameters take numbers (plain, or `PI` forms such as `2*PI/5`);
//! variability functions are defined once under a chosen name and then
//! referenced by the six curve slots:
//!
//! ```text
//! datum = 100
//! length = 1000
//! stations = 200
//! xs_points = 21
//! valley_slope = 0.002
//! critical_shields = 0.045
//! d50 = 0.032
//! bankfull_width = 25
//! min_bankfull_width = 8
//! floodplain_width = 40
//! terrace_width = 15
//! toe_height = 0.5
//! terrace_height = 2
//! boundary_width = 10
//! shape = asymmetric
//!
//! m1 = SIN(30, PI/125, 0)
//! a1 = SIN(1, PI/125, PI/2)
//! w1 = PERL(4, 80)
//! t1 = SIN_SQ(0.4, PI/60, 0)
//!
//! meander = m1
//! alignment = a1
//! width = w1
//! thalweg = t1
//! ```
//!
//! Function families: `SIN(a, f, ps)`, `COS(a, f, ps)`, `SIN_SQ(a, f, ps)`,
//! `LINE(slope, intercept)`, `PERL(a, wavelength)`. Curve slots accept only
//! `+`-joined names of previously defined functions.

use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;

use crate::vary::{CurveId, CurveSet, VaryFn};

use super::{ConfigError, Params, ShapeKind};

/// Errors raised while reading a configuration. All are fatal and are
/// reported before any geometry computation begins.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: expected `key = value`, got `{text}`")]
    MalformedLine { line: usize, text: String },
    #[error("line {line}: bad numeric value `{text}`")]
    BadNumber { line: usize, text: String },
    #[error("line {line}: function `{name}` already defined")]
    FunctionRedefined { line: usize, name: String },
    #[error("line {line}: malformed function `{text}`: {reason}")]
    MalformedFunction {
        line: usize,
        text: String,
        reason: &'static str,
    },
    #[error("line {line}: curve `{curve}` references undefined function `{name}`")]
    UndefinedFunction {
        line: usize,
        curve: String,
        name: String,
    },
    #[error(
        "line {line}: curve `{curve}` takes defined function names, not raw values (`{token}`)"
    )]
    RawValueInCurve {
        line: usize,
        curve: String,
        token: String,
    },
    #[error("line {line}: unknown key `{key}`")]
    UnknownKey { line: usize, key: String },
    #[error("line {line}: unknown shape `{text}` (expected symmetric, asymmetric or polygon)")]
    UnknownShape { line: usize, text: String },
    #[error("required parameter `{0}` is missing")]
    MissingParameter(&'static str),
    #[error("asymmetric shape requires the first `alignment` term to be SIN")]
    AsymmetricNeedsSine,
    #[error(transparent)]
    Config(#[from] ConfigError),
}

const SCALAR_KEYS: &[&str] = &[
    "datum",
    "length",
    "stations",
    "xs_points",
    "valley_slope",
    "critical_shields",
    "d50",
    "bankfull_width",
    "min_bankfull_width",
    "bankfull_depth",
    "floodplain_width",
    "terrace_width",
    "toe_height",
    "terrace_height",
    "boundary_width",
    "base_edges",
    "seed",
];

const REQUIRED_KEYS: &[&str] = &[
    "datum",
    "length",
    "stations",
    "xs_points",
    "valley_slope",
    "critical_shields",
    "d50",
    "bankfull_width",
    "min_bankfull_width",
    "floodplain_width",
    "terrace_width",
    "toe_height",
    "terrace_height",
    "boundary_width",
];

/// Parses a number, accepting plain floats and `(k*)PI(/m)` forms.
fn parse_number(text: &str) -> Option<f64> {
    let t = text.trim();
    if let Ok(v) = t.parse::<f64>() {
        return Some(v);
    }
    let (neg, t) = match t.strip_prefix('-') {
        Some(rest) => (true, rest.trim()),
        None => (false, t),
    };
    let (mult, rest) = match t.split_once('*') {
        Some((a, b)) => (a.trim().parse::<f64>().ok()?, b.trim()),
        None => (1.0, t),
    };
    let (body, div) = match rest.split_once('/') {
        Some((a, b)) => (a.trim(), b.trim().parse::<f64>().ok()?),
        None => (rest, 1.0),
    };
    if body != "PI" {
        return None;
    }
    let v = mult * std::f64::consts::PI / div;
    Some(if neg { -v } else { v })
}

fn curve_for_key(key: &str) -> Option<CurveId> {
    CurveId::ALL.iter().copied().find(|id| id.name() == key)
}

fn parse_fn_args(
    line: usize,
    text: &str,
    inner: &str,
    arity: usize,
) -> Result<Vec<f64>, ParseError> {
    let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
    if parts.len() != arity {
        return Err(ParseError::MalformedFunction {
            line,
            text: text.to_string(),
            reason: "wrong argument count",
        });
    }
    parts
        .iter()
        .map(|p| {
            parse_number(p).ok_or_else(|| ParseError::BadNumber {
                line,
                text: (*p).to_string(),
            })
        })
        .collect()
}

/// Parses one function-family call such as `SIN(2, PI/25, 0)`.
fn parse_fn_call(line: usize, text: &str) -> Result<VaryFn, ParseError> {
    let text = text.trim();
    let open = text.find('(').ok_or(ParseError::MalformedFunction {
        line,
        text: text.to_string(),
        reason: "missing `(`",
    })?;
    if !text.ends_with(')') {
        return Err(ParseError::MalformedFunction {
            line,
            text: text.to_string(),
            reason: "missing closing `)`",
        });
    }
    let family = text[..open].trim();
    let inner = &text[open + 1..text.len() - 1];
    match family {
        "SIN" | "COS" | "SIN_SQ" => {
            let args = parse_fn_args(line, text, inner, 3)?;
            let (amplitude, frequency, phase) = (args[0], args[1], args[2]);
            Ok(match family {
                "SIN" => VaryFn::Sin { amplitude, frequency, phase },
                "COS" => VaryFn::Cos { amplitude, frequency, phase },
                _ => VaryFn::SinSq { amplitude, frequency, phase },
            })
        }
        "LINE" => {
            let args = parse_fn_args(line, text, inner, 2)?;
            Ok(VaryFn::Line { slope: args[0], intercept: args[1] })
        }
        "PERL" => {
            let args = parse_fn_args(line, text, inner, 2)?;
            if args[1] <= 0.0 {
                return Err(ParseError::MalformedFunction {
                    line,
                    text: text.to_string(),
                    reason: "wavelength must be positive",
                });
            }
            Ok(VaryFn::Noise { amplitude: args[0], wavelength: args[1] })
        }
        _ => Err(ParseError::MalformedFunction {
            line,
            text: text.to_string(),
            reason: "unknown function family",
        }),
    }
}

/// Parses configuration text into the parameter set and curve table.
///
/// Every error condition of the format (missing parameters, reused or
/// malformed function names, undefined references, raw values in curve
/// slots, bad shape or base-edge selections) is reported here, before any
/// geometry is computed.
pub fn parse_config(text: &str) -> Result<(Params, CurveSet), ParseError> {
    let mut scalars: HashMap<&str, f64> = HashMap::new();
    let mut shape_word: Option<(usize, String)> = None;
    let mut functions: HashMap<String, VaryFn> = HashMap::new();
    let mut attachments: Vec<(CurveId, VaryFn)> = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let stripped = match raw.split_once('#') {
            Some((before, _)) => before,
            None => raw,
        };
        let stripped = stripped.trim();
        if stripped.is_empty() {
            continue;
        }

        let (key, value) = stripped
            .split_once('=')
            .ok_or(ParseError::MalformedLine {
                line,
                text: stripped.to_string(),
            })?;
        let key = key.trim();
        let value = value.trim();
        if key.is_empty() || value.is_empty() {
            return Err(ParseError::MalformedLine {
                line,
                text: stripped.to_string(),
            });
        }

        if let Some(pos) = SCALAR_KEYS.iter().position(|k| *k == key) {
            let v = parse_number(value).ok_or(ParseError::BadNumber {
                line,
                text: value.to_string(),
            })?;
            scalars.insert(SCALAR_KEYS[pos], v);
        } else if key == "shape" {
            shape_word = Some((line, value.to_string()));
        } else if let Some(id) = curve_for_key(key) {
            for token in value.split('+').map(str::trim) {
                if let Some(f) = functions.get(token) {
                    attachments.push((id, *f));
                } else if parse_number(token).is_some() || token.contains('(') {
                    return Err(ParseError::RawValueInCurve {
                        line,
                        curve: key.to_string(),
                        token: token.to_string(),
                    });
                } else {
                    return Err(ParseError::UndefinedFunction {
                        line,
                        curve: key.to_string(),
                        name: token.to_string(),
                    });
                }
            }
        } else if value.contains('(') {
            let f = parse_fn_call(line, value)?;
            if functions.insert(key.to_string(), f).is_some() {
                return Err(ParseError::FunctionRedefined {
                    line,
                    name: key.to_string(),
                });
            }
        } else {
            return Err(ParseError::UnknownKey {
                line,
                key: key.to_string(),
            });
        }
    }

    for key in REQUIRED_KEYS {
        if !scalars.contains_key(key) {
            return Err(ParseError::MissingParameter(key));
        }
    }
    let (shape_line, shape_word) = shape_word.ok_or(ParseError::MissingParameter("shape"))?;
    let shape = match shape_word.as_str() {
        "symmetric" => ShapeKind::SymmetricU,
        "asymmetric" => ShapeKind::AsymmetricU,
        "polygon" => {
            let base = *scalars
                .get("base_edges")
                .ok_or(ParseError::MissingParameter("base_edges"))?;
            ShapeKind::Polygonal {
                base_edges: base as usize,
            }
        }
        _ => {
            return Err(ParseError::UnknownShape {
                line: shape_line,
                text: shape_word,
            })
        }
    };

    let params = Params {
        datum: scalars["datum"],
        length: scalars["length"],
        n_stations: scalars["stations"] as usize,
        n_xs_points: scalars["xs_points"] as usize,
        valley_slope: scalars["valley_slope"],
        critical_shields: scalars["critical_shields"],
        d50: scalars["d50"],
        bankfull_width: scalars["bankfull_width"],
        min_bankfull_width: scalars["min_bankfull_width"],
        bankfull_depth: scalars.get("bankfull_depth").copied(),
        floodplain_width: scalars["floodplain_width"],
        terrace_width: scalars["terrace_width"],
        toe_height: scalars["toe_height"],
        terrace_height: scalars["terrace_height"],
        boundary_width: scalars["boundary_width"],
        shape,
        seed: scalars.get("seed").map(|s| *s as u32).unwrap_or(42),
    };
    params.validate()?;

    let mut curves = CurveSet::new(params.seed);
    for (id, f) in attachments {
        curves.attach(id, f);
    }

    if params.shape == ShapeKind::AsymmetricU {
        match curves.first_term(CurveId::Alignment) {
            Some(VaryFn::Sin { .. }) => {}
            _ => return Err(ParseError::AsymmetricNeedsSine),
        }
    }

    Ok((params, curves))
}

/// Reads and parses a configuration file.
pub fn parse_config_file(path: &Path) -> Result<(Params, CurveSet), ParseError> {
    let text = std::fs::read_to_string(path)?;
    parse_config(&text)
}
