//! ASCII art and colors per OpenWeather condition code.

use chrono::{NaiveTime, Timelike};
use crossterm::style::Color;

pub const CLEAR_SUNNY: &str = " \\ | / \n - O -  \n / | \\ ";
pub const CLEAR_NIGHT: &str = "  .   * \n*    . O\n. . *  .";
pub const PARTIAL_CLOUDS: &str = " \\ /(  )\n- O(    )\n / (  )  ";
pub const CLOUDS: &str = " ( )()_ \n(      )\n (  )() ";
pub const DRIZZLE: &str = "'  '    '\n '   ' ' \n'    '   '";
pub const RAIN: &str = "' '' ' '\n'' ' ' '\n' ' '' '";
pub const SNOW: &str = "* '* ' *\n'* ' * '\n*' * ' *";
pub const FOG: &str = "-- _ --\n-__-- -\n- _--__";
pub const THUNDERSTORM: &str = "c__ -- _\n-- _-c__\nc-- c_ -";
pub const EVERYTHING_ELSE: &str = "c__ ''' '\n' '' c___\nc__ ' 'c_";

/// Clear sky shows the sun strictly between these hours, the moon otherwise.
pub const SUNRISE_HOUR: u32 = 6;
pub const SUNSET_HOUR: u32 = 20;

pub const YELLOW: Color = Color::Rgb { r: 0xFF, g: 0xDB, b: 0x58 };
pub const PURPLE: Color = Color::Rgb { r: 0x5D, g: 0x3F, b: 0xD3 };
pub const WHITE: Color = Color::Rgb { r: 0xA7, g: 0xC7, b: 0xE7 };
pub const LIGHT_BLUE: Color = Color::Rgb { r: 0x46, g: 0x82, b: 0xB4 };
pub const BLUE: Color = Color::Rgb { r: 0x14, g: 0x34, b: 0xA4 };
pub const DARK_GRAY: Color = Color::Rgb { r: 0x6A, g: 0x87, b: 0x67 };
pub const GRAY: Color = Color::Rgb { r: 0xA9, g: 0xA9, b: 0xA9 };
pub const LIGHT_GRAY: Color = Color::Rgb { r: 0xAA, g: 0xAE, b: 0xB1 };
pub const RED: Color = Color::Red;

/// Pick the art and color for a condition code at local time `now`.
pub fn select(condition_id: i64, now: NaiveTime) -> (&'static str, Color) {
    if condition_id == 800 {
        let secs = now.num_seconds_from_midnight();
        return if secs > SUNRISE_HOUR * 3600 && secs < SUNSET_HOUR * 3600 {
            (CLEAR_SUNNY, YELLOW)
        } else {
            (CLEAR_NIGHT, PURPLE)
        };
    }

    match (condition_id / 100, condition_id % 100) {
        (2, _) => (THUNDERSTORM, RED),
        (3, _) => (DRIZZLE, LIGHT_BLUE),
        (5, _) => (RAIN, BLUE),
        (6, _) => (SNOW, WHITE),
        (7, _) => (FOG, DARK_GRAY),
        (8, state) if state < 3 => (PARTIAL_CLOUDS, LIGHT_GRAY),
        (8, _) => (CLOUDS, GRAY),
        _ => (EVERYTHING_ELSE, LIGHT_GRAY),
    }
}
