use serde::Serialize;
use weather_lookup_core::{LookupError, WeatherRecord};

/// JSON document returned by `weather show --json` and the API.
#[derive(Debug, Serialize)]
pub struct JsonWeather {
    pub city: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub description: String,
    pub humidity: u8,
    pub wind_speed: f64,
    pub weather_type: String,
}

impl From<&WeatherRecord> for JsonWeather {
    fn from(r: &WeatherRecord) -> Self {
        JsonWeather {
            city: r.city.clone(),
            temperature: r.temperature_celsius,
            feels_like: r.feels_like_celsius,
            description: r.description.clone(),
            humidity: r.humidity_percent,
            wind_speed: r.wind_speed_mps,
            // Older payloads carry no condition group; the description is the next best thing.
            weather_type: r.weather_type.clone().unwrap_or_else(|| r.description.clone()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct JsonError {
    pub error: String,
}

pub fn text(r: &WeatherRecord) -> String {
    format!(
        "Weather in {}:\n\
         Temperature: {}°C\n\
         Feels like: {}°C\n\
         Description: {}\n\
         Humidity: {}%\n\
         Wind speed: {} m/s",
        r.city,
        r.temperature_celsius,
        r.feels_like_celsius,
        r.description,
        r.humidity_percent,
        r.wind_speed_mps,
    )
}

const PAGE_HEAD: &str = r#"<!doctype html>
<title>Weather Dashboard</title>
<h1>Check Weather</h1>
<form method="post">
    <input type="text" name="city" placeholder="Enter city name">
    <input type="submit" value="Get Weather">
</form>
"#;

/// The form page, followed by the result of the last submission if there was one.
pub fn html_page(outcome: Option<&Result<WeatherRecord, LookupError>>) -> String {
    let mut page = String::from(PAGE_HEAD);

    match outcome {
        None => {}
        Some(Ok(r)) => {
            page.push_str(&format!(
                "<h2>Weather in {}:</h2>\n\
                 <ul>\n\
                 \x20   <li>Temperature: {}°C</li>\n\
                 \x20   <li>Feels like: {}°C</li>\n\
                 \x20   <li>Description: {}</li>\n\
                 \x20   <li>Humidity: {}%</li>\n\
                 \x20   <li>Wind speed: {} m/s</li>\n\
                 </ul>\n",
                escape_html(&r.city),
                r.temperature_celsius,
                r.feels_like_celsius,
                escape_html(&r.description),
                r.humidity_percent,
                r.wind_speed_mps,
            ));
        }
        Some(Err(err)) => {
            page.push_str(&format!(
                "<p style=\"color:red;\">{}</p>\n",
                escape_html(&err.user_message())
            ));
        }
    }

    page
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
