// ── Device state summarizer ──
//
// Pure, total mapping from (device class, raw state document) to a
// short human-readable line. ThinQ state payloads are loosely shaped
// and only partially populated, so every lookup tolerates missing or
// mistyped fields. Nothing here can fail or panic.

use serde_json::Value;

use crate::model::{DeviceClass, PLACEHOLDER};

/// Render a one-line status summary for a device.
///
/// A state document with nothing recognizable in it -- including the
/// empty object -- yields the placeholder, never an error.
pub fn summarize(class: DeviceClass, state: &Value) -> String {
    match class {
        DeviceClass::AirConditioner => air_conditioner(state),
        DeviceClass::Refrigerator => refrigerator(state),
        DeviceClass::Washer => washer(state),
        DeviceClass::Dryer | DeviceClass::Other => PLACEHOLDER.to_owned(),
    }
}

/// Operation mode, target temperature, job mode, and wind strength are
/// four independent nested fields; each falls back on its own.
fn air_conditioner(state: &Value) -> String {
    let op = text(&state["operation"]["airConOperationMode"]);
    let target = text(&state["temperature"]["targetTemperature"]);
    let unit = text(&state["temperature"]["unit"]);
    let mode = text(&state["airConJobMode"]["currentJobMode"]);
    let wind = text(&state["airFlow"]["windStrength"]);

    if op.is_none() && target.is_none() && mode.is_none() && wind.is_none() {
        return PLACEHOLDER.to_owned();
    }

    format!(
        "{} | Target {}{} | Mode {} | Wind {}",
        op.as_deref().unwrap_or(PLACEHOLDER),
        target.as_deref().unwrap_or(PLACEHOLDER),
        unit.as_deref().unwrap_or(""),
        mode.as_deref().unwrap_or(PLACEHOLDER),
        wind.as_deref().unwrap_or(PLACEHOLDER),
    )
}

/// `temperature` is a list of compartment readings; entries with both a
/// location name and a target temperature render `loc:valueunit`.
fn refrigerator(state: &Value) -> String {
    let mut parts = Vec::new();
    if let Some(entries) = state["temperature"].as_array() {
        for entry in entries {
            let loc = entry["locationName"].as_str().filter(|s| !s.is_empty());
            let val = text(&entry["targetTemperature"]);
            if let (Some(loc), Some(val)) = (loc, val) {
                let unit = entry["unit"].as_str().unwrap_or("");
                parts.push(format!("{loc}:{val}{unit}"));
            }
        }
    }
    if parts.is_empty() {
        PLACEHOLDER.to_owned()
    } else {
        parts.join(" | ")
    }
}

/// Washer state arrives either as a single object or as a one-element
/// list wrapping it; unwrap transparently. Missing remain-time fields
/// default to zero.
fn washer(state: &Value) -> String {
    let obj = match state {
        Value::Array(items) => items.first().unwrap_or(&Value::Null),
        other => other,
    };

    let current = text(&obj["runState"]["currentState"]);
    let timer = &obj["timer"];
    if current.is_none() && timer.is_null() {
        return PLACEHOLDER.to_owned();
    }

    let hours = timer["remainHour"].as_i64().unwrap_or(0);
    let minutes = timer["remainMinute"].as_i64().unwrap_or(0);
    format!(
        "{} | Remain {:02}:{:02}",
        current.as_deref().unwrap_or(PLACEHOLDER),
        hours,
        minutes,
    )
}

/// A displayable scalar: strings pass through, numbers and booleans
/// are rendered; objects, arrays, and null don't summarize.
fn text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
