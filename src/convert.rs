use crate::constants::composite::{CLOSE, OPEN, SEPARATOR};

/// Render a two-component vector as one composite cell, e.g. `[1.5,-2]`.
///
/// Composite cells keep a fixed-arity numeric tuple inside a single column;
/// the tabular layer quotes the cell so the inner separators survive.
pub fn vec2_cell(value: [f32; 2]) -> String {
    format!("{OPEN}{}{SEPARATOR}{}{CLOSE}", value[0], value[1])
}

/// Render a three-component vector as one composite cell, e.g. `[1,2.5,3]`.
pub fn vec3_cell(value: [f32; 3]) -> String {
    format!(
        "{OPEN}{}{SEPARATOR}{}{SEPARATOR}{}{CLOSE}",
        value[0], value[1], value[2]
    )
}

/// Parse a composite cell into exactly `expected` numeric components.
///
/// Accepts surrounding whitespace on the cell and on each component. The
/// error is a bare detail string; callers wrap it with row context.
pub(crate) fn parse_components(raw: &str, expected: usize) -> Result<Vec<f32>, String> {
    let inner = raw
        .trim()
        .strip_prefix(OPEN)
        .and_then(|rest| rest.strip_suffix(CLOSE))
        .ok_or_else(|| format!("composite cell '{raw}' is not bracket-delimited"))?;

    let mut components = Vec::with_capacity(expected);
    for part in inner.split(SEPARATOR) {
        let part = part.trim();
        let value = part
            .parse::<f32>()
            .map_err(|err| format!("composite component '{part}' is not numeric: {err}"))?;
        components.push(value);
    }
    if components.len() != expected {
        return Err(format!(
            "composite cell '{raw}' has {} components, expected {expected}",
            components.len()
        ));
    }
    Ok(components)
}
