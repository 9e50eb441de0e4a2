use crate::{
    error::FormatError,
    format::{CELSIUS, PERCENT, format_number},
    model::{Condition, CurrentConditions, CurrentPayload},
};

/// Extract display values from a `/weather` payload.
///
/// Fields are checked in a fixed order and the first failure is returned:
/// metrics block, temp, feels_like, humidity, condition list, condition item.
/// Description and location fall back to empty strings.
pub fn parse_current(payload: &CurrentPayload) -> Result<CurrentConditions, FormatError> {
    let main = payload.main.as_ref().ok_or(FormatError::Missing("main"))?;

    let temp = main.temp.ok_or(FormatError::Invalid("temp"))?;
    let feels_like = main.feels_like.ok_or(FormatError::Invalid("feels_like"))?;
    let humidity = main.humidity.ok_or(FormatError::Invalid("humidity"))?;

    let first = payload
        .weather
        .as_ref()
        .and_then(|list| list.first())
        .ok_or(FormatError::Missing("weather"))?;

    if !first.is_object() {
        return Err(FormatError::Invalid("weather item"));
    }
    let condition: Condition = serde_json::from_value(first.clone())
        .map_err(|_| FormatError::Invalid("weather item"))?;
    let condition_id = condition
        .id
        .as_ref()
        .and_then(|code| code.as_int())
        .ok_or(FormatError::Invalid("weather id"))?;

    Ok(CurrentConditions {
        temp: format!("{}{CELSIUS}", format_number(temp)),
        feels_like: format!("{}{CELSIUS}", format_number(feels_like)),
        humidity: format!("{}{PERCENT}", format_number(humidity)),
        condition_id,
        description: condition.description.unwrap_or_default(),
        location: payload.name.clone().unwrap_or_default(),
    })
}
