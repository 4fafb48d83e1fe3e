//! Token types and their structural validators.
//!
//! Built-in types form a closed set; vendor-defined tags land in
//! [`TokenType::Other`] and skip structural validation while still
//! participating in inheritance and alias resolution.

use crate::error::FlattenError;
use crate::pointer::TokenPointer;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;

/// Recognized `fontWeight` keywords.
const FONT_WEIGHT_KEYWORDS: [&str; 22] = [
    "thin",
    "hairline",
    "extra-light",
    "extralight",
    "ultra-light",
    "ultralight",
    "light",
    "normal",
    "regular",
    "book",
    "medium",
    "semi-bold",
    "semibold",
    "demi-bold",
    "demibold",
    "bold",
    "extra-bold",
    "extrabold",
    "ultra-bold",
    "ultrabold",
    "black",
    "heavy",
];

/// Recognized `strokeStyle` keywords.
const STROKE_STYLE_KEYWORDS: [&str; 8] = [
    "solid", "dashed", "dotted", "double", "groove", "ridge", "outset", "inset",
];

/// A token's type tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenType {
    /// A color value.
    Color,
    /// A length with a `px`/`rem` unit.
    Dimension,
    /// A bare number.
    Number,
    /// A font family name or stack.
    FontFamily,
    /// A font weight number or keyword.
    FontWeight,
    /// A time span with an `ms`/`s` unit.
    Duration,
    /// One or more drop/inner shadows.
    Shadow,
    /// A stroke line style.
    StrokeStyle,
    /// A gradient stop list.
    Gradient,
    /// A composite typography record.
    Typography,
    /// A vendor-defined type; accepted without structural validation.
    Other(String),
}

impl TokenType {
    /// Maps a raw `$type` tag to a token type.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "color" => Self::Color,
            "dimension" => Self::Dimension,
            "number" => Self::Number,
            "fontFamily" => Self::FontFamily,
            "fontWeight" => Self::FontWeight,
            "duration" => Self::Duration,
            "shadow" => Self::Shadow,
            "strokeStyle" => Self::StrokeStyle,
            "gradient" => Self::Gradient,
            "typography" => Self::Typography,
            other => Self::Other(other.to_string()),
        }
    }

    /// Returns the wire tag for this type.
    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Self::Color => "color",
            Self::Dimension => "dimension",
            Self::Number => "number",
            Self::FontFamily => "fontFamily",
            Self::FontWeight => "fontWeight",
            Self::Duration => "duration",
            Self::Shadow => "shadow",
            Self::StrokeStyle => "strokeStyle",
            Self::Gradient => "gradient",
            Self::Typography => "typography",
            Self::Other(tag) => tag,
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl Serialize for TokenType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.tag())
    }
}

/// Lookup over already-resolved tokens, used to resolve alias strings
/// embedded inside composite values.
#[derive(Debug, Default)]
pub struct TypeLookup {
    entries: HashMap<TokenPointer, (TokenType, Value)>,
}

impl TypeLookup {
    /// Creates an empty lookup.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a resolved token.
    pub fn insert(&mut self, pointer: TokenPointer, token_type: TokenType, value: Value) {
        self.entries.insert(pointer, (token_type, value));
    }

    /// Looks up a resolved token by pointer.
    #[must_use]
    pub fn get(&self, pointer: &TokenPointer) -> Option<(&TokenType, &Value)> {
        self.entries.get(pointer).map(|(t, v)| (t, v))
    }
}

/// Validates a resolved value against its type's structural contract.
///
/// # Errors
///
/// Returns [`FlattenError::InvalidValue`] on contract violations, and
/// reference errors for unresolvable aliases embedded in composite values.
pub fn validate(
    token_type: &TokenType,
    value: &Value,
    pointer: &TokenPointer,
    lookup: &TypeLookup,
) -> Result<(), FlattenError> {
    match token_type {
        TokenType::Color => check_color(value, pointer, lookup),
        TokenType::Dimension => check_dimension(value, pointer, lookup),
        TokenType::Duration => check_duration(value, pointer, lookup),
        TokenType::Number => check_number(value, pointer, lookup),
        TokenType::FontFamily => check_font_family(value, pointer, lookup),
        TokenType::FontWeight => check_font_weight(value, pointer, lookup),
        TokenType::Shadow => check_shadow(value, pointer, lookup),
        TokenType::StrokeStyle => check_stroke_style(value, pointer, lookup),
        TokenType::Gradient => check_gradient(value, pointer, lookup),
        TokenType::Typography => check_typography(value, pointer, lookup),
        TokenType::Other(_) => Ok(()),
    }
}

fn invalid(pointer: &TokenPointer, token_type: TokenType, reason: impl Into<String>) -> FlattenError {
    FlattenError::InvalidValue {
        pointer: pointer.clone(),
        token_type,
        reason: reason.into(),
    }
}

/// Resolves an embedded alias string against the lookup.
///
/// Returns `Ok(None)` if the value is not reference-shaped.
fn embedded_alias<'a>(
    value: &Value,
    pointer: &TokenPointer,
    lookup: &'a TypeLookup,
) -> Result<Option<(&'a TokenType, &'a Value)>, FlattenError> {
    let Value::String(raw) = value else {
        return Ok(None);
    };
    if !TokenPointer::is_reference(raw) {
        return Ok(None);
    }
    let target = TokenPointer::parse(raw)?;
    lookup
        .get(&target)
        .map(Some)
        .ok_or_else(|| FlattenError::UnknownReference {
            pointer: pointer.clone(),
            target,
        })
}

/// Checks a component value that may be an embedded alias to `expected`.
fn check_component(
    value: &Value,
    expected: &TokenType,
    pointer: &TokenPointer,
    lookup: &TypeLookup,
) -> Result<(), FlattenError> {
    if let Some((resolved_type, resolved_value)) = embedded_alias(value, pointer, lookup)? {
        if resolved_type != expected {
            return Err(invalid(
                pointer,
                expected.clone(),
                format!("embedded reference resolves to `{resolved_type}`, expected `{expected}`"),
            ));
        }
        return validate(expected, resolved_value, pointer, lookup);
    }
    validate(expected, value, pointer, lookup)
}

fn check_color(
    value: &Value,
    pointer: &TokenPointer,
    lookup: &TypeLookup,
) -> Result<(), FlattenError> {
    if let Some((resolved_type, _)) = embedded_alias(value, pointer, lookup)? {
        if *resolved_type != TokenType::Color {
            return Err(invalid(
                pointer,
                TokenType::Color,
                format!("reference resolves to `{resolved_type}`"),
            ));
        }
        return Ok(());
    }
    let Value::String(text) = value else {
        return Err(invalid(pointer, TokenType::Color, "expected a string"));
    };
    if is_color_literal(text) {
        Ok(())
    } else {
        Err(invalid(
            pointer,
            TokenType::Color,
            format!("`{text}` is not a recognized color form"),
        ))
    }
}

fn is_color_literal(text: &str) -> bool {
    if let Some(digits) = text.strip_prefix('#') {
        return matches!(digits.len(), 3 | 4 | 6 | 8)
            && digits.chars().all(|c| c.is_ascii_hexdigit());
    }
    let lowered = text.to_ascii_lowercase();
    ["rgb(", "rgba(", "hsl(", "hsla(", "lab(", "oklch(", "color("]
        .iter()
        .any(|f| lowered.starts_with(f))
        || (!text.is_empty() && text.chars().all(|c| c.is_ascii_alphabetic()))
}

fn check_unit_record(
    value: &Value,
    pointer: &TokenPointer,
    lookup: &TypeLookup,
    token_type: TokenType,
    allowed_units: &[&str],
) -> Result<(), FlattenError> {
    if let Some((resolved_type, _)) = embedded_alias(value, pointer, lookup)? {
        if *resolved_type != token_type {
            return Err(invalid(
                pointer,
                token_type,
                format!("reference resolves to `{resolved_type}`"),
            ));
        }
        return Ok(());
    }
    let Value::Object(record) = value else {
        return Err(invalid(
            pointer,
            token_type,
            "expected `{value, unit}` record",
        ));
    };
    if !record.get("value").is_some_and(Value::is_number) {
        return Err(invalid(pointer, token_type, "`value` must be a number"));
    }
    match record.get("unit").and_then(Value::as_str) {
        Some(unit) if allowed_units.contains(&unit) => Ok(()),
        Some(unit) => Err(invalid(
            pointer,
            token_type,
            format!("unit `{unit}` not in {allowed_units:?}"),
        )),
        None => Err(invalid(pointer, token_type, "`unit` must be a string")),
    }
}

fn check_dimension(
    value: &Value,
    pointer: &TokenPointer,
    lookup: &TypeLookup,
) -> Result<(), FlattenError> {
    check_unit_record(value, pointer, lookup, TokenType::Dimension, &["px", "rem"])
}

fn check_duration(
    value: &Value,
    pointer: &TokenPointer,
    lookup: &TypeLookup,
) -> Result<(), FlattenError> {
    check_unit_record(value, pointer, lookup, TokenType::Duration, &["ms", "s"])
}

fn check_number(
    value: &Value,
    pointer: &TokenPointer,
    lookup: &TypeLookup,
) -> Result<(), FlattenError> {
    if let Some((resolved_type, _)) = embedded_alias(value, pointer, lookup)? {
        if *resolved_type != TokenType::Number {
            return Err(invalid(
                pointer,
                TokenType::Number,
                format!("reference resolves to `{resolved_type}`"),
            ));
        }
        return Ok(());
    }
    if value.is_number() {
        Ok(())
    } else {
        Err(invalid(pointer, TokenType::Number, "expected a number"))
    }
}

fn check_font_family(
    value: &Value,
    pointer: &TokenPointer,
    lookup: &TypeLookup,
) -> Result<(), FlattenError> {
    if let Some((resolved_type, _)) = embedded_alias(value, pointer, lookup)? {
        if *resolved_type != TokenType::FontFamily {
            return Err(invalid(
                pointer,
                TokenType::FontFamily,
                format!("reference resolves to `{resolved_type}`"),
            ));
        }
        return Ok(());
    }
    match value {
        Value::String(_) => Ok(()),
        Value::Array(entries) if !entries.is_empty() => {
            if entries.iter().all(Value::is_string) {
                Ok(())
            } else {
                Err(invalid(
                    pointer,
                    TokenType::FontFamily,
                    "stack entries must all be strings",
                ))
            }
        }
        _ => Err(invalid(
            pointer,
            TokenType::FontFamily,
            "expected a string or an array of strings",
        )),
    }
}

fn check_font_weight(
    value: &Value,
    pointer: &TokenPointer,
    lookup: &TypeLookup,
) -> Result<(), FlattenError> {
    if let Some((resolved_type, _)) = embedded_alias(value, pointer, lookup)? {
        if *resolved_type != TokenType::FontWeight {
            return Err(invalid(
                pointer,
                TokenType::FontWeight,
                format!("reference resolves to `{resolved_type}`"),
            ));
        }
        return Ok(());
    }
    match value {
        Value::Number(n) => {
            let weight = n.as_f64().unwrap_or(0.0);
            if (1.0..=1000.0).contains(&weight) {
                Ok(())
            } else {
                Err(invalid(
                    pointer,
                    TokenType::FontWeight,
                    format!("{weight} is outside [1, 1000]"),
                ))
            }
        }
        Value::String(keyword) => {
            if FONT_WEIGHT_KEYWORDS.contains(&keyword.to_ascii_lowercase().as_str()) {
                Ok(())
            } else {
                Err(invalid(
                    pointer,
                    TokenType::FontWeight,
                    format!("`{keyword}` is not a recognized weight keyword"),
                ))
            }
        }
        _ => Err(invalid(
            pointer,
            TokenType::FontWeight,
            "expected a number or keyword",
        )),
    }
}

fn check_shadow_record(
    record: &Map<String, Value>,
    pointer: &TokenPointer,
    lookup: &TypeLookup,
) -> Result<(), FlattenError> {
    for key in ["color", "offsetX", "offsetY", "blur", "spread"] {
        let Some(component) = record.get(key) else {
            return Err(invalid(
                pointer,
                TokenType::Shadow,
                format!("missing `{key}`"),
            ));
        };
        let expected = if key == "color" {
            TokenType::Color
        } else {
            TokenType::Dimension
        };
        check_component(component, &expected, pointer, lookup)?;
    }
    if let Some(inset) = record.get("inset") {
        if !inset.is_boolean() {
            return Err(invalid(
                pointer,
                TokenType::Shadow,
                "`inset` must be a boolean",
            ));
        }
    }
    Ok(())
}

fn check_shadow(
    value: &Value,
    pointer: &TokenPointer,
    lookup: &TypeLookup,
) -> Result<(), FlattenError> {
    match value {
        Value::Object(record) => check_shadow_record(record, pointer, lookup),
        Value::Array(layers) if !layers.is_empty() => {
            for layer in layers {
                let Value::Object(record) = layer else {
                    return Err(invalid(
                        pointer,
                        TokenType::Shadow,
                        "layers must be objects",
                    ));
                };
                check_shadow_record(record, pointer, lookup)?;
            }
            Ok(())
        }
        _ => Err(invalid(
            pointer,
            TokenType::Shadow,
            "expected an object or a non-empty array of objects",
        )),
    }
}

fn check_stroke_style(
    value: &Value,
    pointer: &TokenPointer,
    lookup: &TypeLookup,
) -> Result<(), FlattenError> {
    match value {
        Value::String(keyword) => {
            if STROKE_STYLE_KEYWORDS.contains(&keyword.as_str()) {
                Ok(())
            } else {
                Err(invalid(
                    pointer,
                    TokenType::StrokeStyle,
                    format!("`{keyword}` is not a recognized stroke keyword"),
                ))
            }
        }
        Value::Object(record) => {
            let Some(Value::Array(dashes)) = record.get("dashArray") else {
                return Err(invalid(
                    pointer,
                    TokenType::StrokeStyle,
                    "`dashArray` must be an array",
                ));
            };
            if dashes.is_empty() {
                return Err(invalid(
                    pointer,
                    TokenType::StrokeStyle,
                    "`dashArray` must not be empty",
                ));
            }
            for dash in dashes {
                check_component(dash, &TokenType::Dimension, pointer, lookup)?;
            }
            match record.get("lineCap").and_then(Value::as_str) {
                Some("round" | "butt" | "square") => Ok(()),
                _ => Err(invalid(
                    pointer,
                    TokenType::StrokeStyle,
                    "`lineCap` must be one of `round`, `butt`, `square`",
                )),
            }
        }
        _ => Err(invalid(
            pointer,
            TokenType::StrokeStyle,
            "expected a keyword or `{dashArray, lineCap}` record",
        )),
    }
}

fn check_gradient(
    value: &Value,
    pointer: &TokenPointer,
    lookup: &TypeLookup,
) -> Result<(), FlattenError> {
    let Value::Array(stops) = value else {
        return Err(invalid(
            pointer,
            TokenType::Gradient,
            "expected an array of stops",
        ));
    };
    if stops.is_empty() {
        return Err(invalid(
            pointer,
            TokenType::Gradient,
            "stop list must not be empty",
        ));
    }
    for stop in stops {
        let Value::Object(record) = stop else {
            return Err(invalid(pointer, TokenType::Gradient, "stops must be objects"));
        };
        let Some(color) = record.get("color") else {
            return Err(invalid(pointer, TokenType::Gradient, "stop missing `color`"));
        };
        check_component(color, &TokenType::Color, pointer, lookup)?;
        let Some(position) = record.get("position") else {
            return Err(invalid(
                pointer,
                TokenType::Gradient,
                "stop missing `position`",
            ));
        };
        check_component(position, &TokenType::Number, pointer, lookup)?;
    }
    Ok(())
}

fn check_typography(
    value: &Value,
    pointer: &TokenPointer,
    lookup: &TypeLookup,
) -> Result<(), FlattenError> {
    let Value::Object(record) = value else {
        return Err(invalid(
            pointer,
            TokenType::Typography,
            "expected a composite record",
        ));
    };
    for (key, expected) in [
        ("fontFamily", TokenType::FontFamily),
        ("fontSize", TokenType::Dimension),
        ("fontWeight", TokenType::FontWeight),
        ("lineHeight", TokenType::Number),
    ] {
        let Some(component) = record.get(key) else {
            return Err(invalid(
                pointer,
                TokenType::Typography,
                format!("missing `{key}`"),
            ));
        };
        check_component(component, &expected, pointer, lookup)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ptr(raw: &str) -> TokenPointer {
        TokenPointer::parse(raw).unwrap()
    }

    fn check(token_type: TokenType, value: Value) -> Result<(), FlattenError> {
        validate(&token_type, &value, &ptr("#/t"), &TypeLookup::new())
    }

    #[test]
    fn tag_round_trip_for_builtins() {
        for tag in [
            "color",
            "dimension",
            "number",
            "fontFamily",
            "fontWeight",
            "duration",
            "shadow",
            "strokeStyle",
            "gradient",
            "typography",
        ] {
            assert_eq!(TokenType::from_tag(tag).tag(), tag);
        }
        assert_eq!(
            TokenType::from_tag("com.example.easing"),
            TokenType::Other("com.example.easing".to_string())
        );
    }

    #[test]
    fn color_accepts_common_forms() {
        assert!(check(TokenType::Color, json!("#000")).is_ok());
        assert!(check(TokenType::Color, json!("#aabbccdd")).is_ok());
        assert!(check(TokenType::Color, json!("rgb(0, 0, 0)")).is_ok());
        assert!(check(TokenType::Color, json!("rebeccapurple")).is_ok());
        assert!(check(TokenType::Color, json!("#12345")).is_err());
        assert!(check(TokenType::Color, json!(42)).is_err());
    }

    #[test]
    fn dimension_requires_known_unit() {
        assert!(check(TokenType::Dimension, json!({"value": 4, "unit": "px"})).is_ok());
        assert!(check(TokenType::Dimension, json!({"value": 0.25, "unit": "rem"})).is_ok());
        assert!(check(TokenType::Dimension, json!({"value": 4, "unit": "vh"})).is_err());
        assert!(check(TokenType::Dimension, json!({"value": "4", "unit": "px"})).is_err());
        assert!(check(TokenType::Dimension, json!("4px")).is_err());
    }

    #[test]
    fn duration_requires_time_unit() {
        assert!(check(TokenType::Duration, json!({"value": 150, "unit": "ms"})).is_ok());
        assert!(check(TokenType::Duration, json!({"value": 1, "unit": "s"})).is_ok());
        assert!(check(TokenType::Duration, json!({"value": 1, "unit": "px"})).is_err());
    }

    #[test]
    fn font_weight_range_and_keywords() {
        assert!(check(TokenType::FontWeight, json!(400)).is_ok());
        assert!(check(TokenType::FontWeight, json!(1)).is_ok());
        assert!(check(TokenType::FontWeight, json!(1000)).is_ok());
        assert!(check(TokenType::FontWeight, json!(0)).is_err());
        assert!(check(TokenType::FontWeight, json!(1001)).is_err());
        assert!(check(TokenType::FontWeight, json!("semi-bold")).is_ok());
        assert!(check(TokenType::FontWeight, json!("heavy")).is_ok());
        assert!(check(TokenType::FontWeight, json!("chonky")).is_err());
    }

    #[test]
    fn font_family_string_or_stack() {
        assert!(check(TokenType::FontFamily, json!("Inter")).is_ok());
        assert!(check(TokenType::FontFamily, json!(["Inter", "sans-serif"])).is_ok());
        assert!(check(TokenType::FontFamily, json!(["Inter", 3])).is_err());
        assert!(check(TokenType::FontFamily, json!(7)).is_err());
    }

    #[test]
    fn shadow_requires_all_components() {
        let full = json!({
            "color": "#0003",
            "offsetX": {"value": 0, "unit": "px"},
            "offsetY": {"value": 2, "unit": "px"},
            "blur": {"value": 4, "unit": "px"},
            "spread": {"value": 0, "unit": "px"},
            "inset": false
        });
        assert!(check(TokenType::Shadow, full.clone()).is_ok());
        assert!(check(TokenType::Shadow, json!([full])).is_ok());

        let missing = json!({"color": "#000", "offsetX": {"value": 0, "unit": "px"}});
        assert!(check(TokenType::Shadow, missing).is_err());
        assert!(check(TokenType::Shadow, json!([])).is_err());
    }

    #[test]
    fn stroke_style_keyword_or_record() {
        assert!(check(TokenType::StrokeStyle, json!("dashed")).is_ok());
        assert!(check(TokenType::StrokeStyle, json!("wavy")).is_err());
        let record = json!({
            "dashArray": [{"value": 2, "unit": "px"}],
            "lineCap": "round"
        });
        assert!(check(TokenType::StrokeStyle, record).is_ok());
        let empty = json!({"dashArray": [], "lineCap": "round"});
        assert!(check(TokenType::StrokeStyle, empty).is_err());
    }

    #[test]
    fn gradient_stops() {
        let stops = json!([
            {"color": "#000", "position": 0},
            {"color": "#fff", "position": 1}
        ]);
        assert!(check(TokenType::Gradient, stops).is_ok());
        assert!(check(TokenType::Gradient, json!([])).is_err());
        assert!(check(TokenType::Gradient, json!([{"color": "#000"}])).is_err());
    }

    #[test]
    fn typography_composite() {
        let record = json!({
            "fontFamily": "Inter",
            "fontSize": {"value": 1, "unit": "rem"},
            "fontWeight": 600,
            "lineHeight": 1.5
        });
        assert!(check(TokenType::Typography, record).is_ok());
        assert!(check(TokenType::Typography, json!({"fontFamily": "Inter"})).is_err());
    }

    #[test]
    fn vendor_types_skip_validation() {
        assert!(check(TokenType::Other("cubicBezier".into()), json!([0.4, 0.0, 0.2, 1.0])).is_ok());
    }

    #[test]
    fn embedded_alias_resolves_through_lookup() {
        let mut lookup = TypeLookup::new();
        lookup.insert(ptr("#/palette/black"), TokenType::Color, json!("#000"));
        lookup.insert(ptr("#/scale/half"), TokenType::Number, json!(0.5));

        let stop_value = json!([{"color": "{palette.black}", "position": "#/scale/half"}]);
        assert!(validate(&TokenType::Gradient, &stop_value, &ptr("#/g"), &lookup).is_ok());

        // position resolving to a color is a type error
        let bad = json!([{"color": "#000", "position": "{palette.black}"}]);
        assert!(validate(&TokenType::Gradient, &bad, &ptr("#/g"), &lookup).is_err());

        // dangling embedded reference
        let dangling = json!([{"color": "{palette.missing}", "position": 0}]);
        assert!(matches!(
            validate(&TokenType::Gradient, &dangling, &ptr("#/g"), &lookup),
            Err(FlattenError::UnknownReference { .. })
        ));
    }
}
