#!/usr/bin/env cargo
use weather_api::openapi::WeatherApiDoc;

fn main() {
    let openapi = WeatherApiDoc::openapi();
    let json = serde_json::to_string_pretty(&openapi)
        .expect("Failed to serialize OpenAPI spec to JSON");

    println!("{}", json);
}
