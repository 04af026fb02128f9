//! Response body rendering.
//!
//! Bodies are negotiated from the `Accept` header alone: YAML if asked
//! for, then plain text, otherwise JSON. JSON and YAML encode the same
//! structure. The plain-text view is a lossy, one-line-per-arrival listing
//! meant for eyeballing in a terminal.

use serde::Serialize;

use crate::domain::{Arrival, StopEnvelope, StopId, StopResults};

/// Media types that select YAML.
const YAML_TYPES: &[&str] = &["application/yaml", "application/x-yaml", "text/yaml"];

/// Media type that selects plain text.
const TEXT_TYPE: &str = "text/plain";

/// Errors while encoding a body.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML encoding failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Wire encoding of a response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
    Text,
}

impl Format {
    /// Choose a format from an `Accept` header value.
    ///
    /// Matching is a case-insensitive substring search; quality values are
    /// ignored.
    pub fn negotiate(accept: Option<&str>) -> Self {
        let Some(accept) = accept else {
            return Format::Json;
        };
        let accept = accept.to_ascii_lowercase();

        if YAML_TYPES.iter().any(|t| accept.contains(t)) {
            Format::Yaml
        } else if accept.contains(TEXT_TYPE) {
            Format::Text
        } else {
            Format::Json
        }
    }

    /// `Content-Type` for bodies in this format.
    pub fn content_type(&self) -> &'static str {
        match self {
            Format::Json => "application/json",
            Format::Yaml => "application/yaml",
            Format::Text => "text/plain; charset=utf-8",
        }
    }
}

/// Something with a line-oriented text view.
pub trait TextView {
    /// One line per (stop, arrival) pair.
    fn text_lines(&self) -> Vec<String>;
}

/// Format one arrival as
/// `stopId | stopName | route headsign | agency | scheduled | realTime`.
pub fn text_line(stop: &StopId, stop_name: &str, arrival: &Arrival) -> String {
    format!(
        "{} | {} | {} {} | {} | {} | {}",
        stop,
        stop_name,
        arrival.route,
        arrival.headsign,
        arrival.agency.as_deref().unwrap_or(""),
        arrival.scheduled_arrival.to_rfc3339(),
        arrival
            .real_time_arrival
            .map(|t| t.to_rfc3339())
            .unwrap_or_default(),
    )
}

impl TextView for StopResults {
    fn text_lines(&self) -> Vec<String> {
        self.iter()
            .flat_map(|(stop, result)| {
                result
                    .arrivals
                    .iter()
                    .map(move |a| text_line(stop, &result.stop_name, a))
            })
            .collect()
    }
}

impl TextView for StopEnvelope {
    fn text_lines(&self) -> Vec<String> {
        self.arrivals
            .iter()
            .map(|a| text_line(&self.stop_id, &self.stop_name, a))
            .collect()
    }
}

/// An encoded body and its content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub body: Vec<u8>,
    pub content_type: &'static str,
}

/// Encode `value` in the given format.
pub fn encode<T>(value: &T, format: Format) -> Result<Rendered, FormatError>
where
    T: Serialize + TextView,
{
    let body = match format {
        Format::Json => serde_json::to_vec(value)?,
        Format::Yaml => serde_yaml::to_string(value)?.into_bytes(),
        Format::Text => value.text_lines().join("\n").into_bytes(),
    };

    Ok(Rendered {
        body,
        content_type: format.content_type(),
    })
}

/// Encode `value` in the format negotiated from `accept`.
pub fn render<T>(value: &T, accept: Option<&str>) -> Result<Rendered, FormatError>
where
    T: Serialize + TextView,
{
    encode(value, Format::negotiate(accept))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StopResult;
    use chrono::{DateTime, FixedOffset};

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn sample() -> StopResults {
        let main_st = StopId::normalize("1348");
        let quay = StopId::normalize("7602");
        let mut results = StopResults::new();
        results.insert(
            main_st.clone(),
            StopResult::new(
                "Main Street",
                vec![
                    Arrival {
                        route: "46A".into(),
                        headsign: "Phoenix Park".into(),
                        agency: Some("Dublin Bus".into()),
                        scheduled_arrival: at("2026-10-16T10:05:00+01:00"),
                        real_time_arrival: Some(at("2026-10-16T10:07:00+01:00")),
                        stop_id: main_st.clone(),
                    },
                    Arrival {
                        route: "145".into(),
                        headsign: "Heuston Station".into(),
                        agency: None,
                        scheduled_arrival: at("2026-10-16T10:02:00+01:00"),
                        real_time_arrival: None,
                        stop_id: main_st,
                    },
                ],
            ),
        );
        results.insert(quay, StopResult::new("Quay", vec![]));
        results.insert(StopId::normalize("??invalid??"), StopResult::empty());
        results
    }

    #[test]
    fn negotiation_priority() {
        assert_eq!(Format::negotiate(None), Format::Json);
        assert_eq!(Format::negotiate(Some("")), Format::Json);
        assert_eq!(Format::negotiate(Some("*/*")), Format::Json);
        assert_eq!(Format::negotiate(Some("text/html")), Format::Json);
        assert_eq!(Format::negotiate(Some("application/json")), Format::Json);
        assert_eq!(Format::negotiate(Some("application/yaml")), Format::Yaml);
        assert_eq!(Format::negotiate(Some("application/x-yaml")), Format::Yaml);
        assert_eq!(Format::negotiate(Some("text/plain")), Format::Text);
        // YAML beats plain text wherever it appears
        assert_eq!(
            Format::negotiate(Some("text/plain, application/yaml;q=0.1")),
            Format::Yaml
        );
    }

    #[test]
    fn negotiation_is_case_insensitive() {
        assert_eq!(Format::negotiate(Some("Application/YAML")), Format::Yaml);
        assert_eq!(Format::negotiate(Some("TEXT/PLAIN")), Format::Text);
    }

    #[test]
    fn content_types() {
        let results = sample();
        assert_eq!(
            render(&results, None).unwrap().content_type,
            "application/json"
        );
        assert_eq!(
            render(&results, Some("application/yaml")).unwrap().content_type,
            "application/yaml"
        );
        assert_eq!(
            render(&results, Some("text/plain")).unwrap().content_type,
            "text/plain; charset=utf-8"
        );
    }

    #[test]
    fn json_and_yaml_decode_to_the_same_structure() {
        let results = sample();
        let json = render(&results, Some("application/json")).unwrap();
        let yaml = render(&results, Some("application/yaml")).unwrap();

        let from_json: StopResults = serde_json::from_slice(&json.body).unwrap();
        let from_yaml: StopResults = serde_yaml::from_slice(&yaml.body).unwrap();
        assert_eq!(from_json, from_yaml);
        assert_eq!(from_json, results);

        let json_value: serde_json::Value = serde_json::from_slice(&json.body).unwrap();
        let yaml_value: serde_json::Value = serde_yaml::from_slice(&yaml.body).unwrap();
        assert_eq!(json_value, yaml_value);
    }

    #[test]
    fn envelope_json_and_yaml_agree() {
        let results = sample();
        let stop = StopId::normalize("1348");
        let envelope = StopEnvelope::new(stop.clone(), results.get(&stop).unwrap().clone());

        let json = encode(&envelope, Format::Json).unwrap();
        let yaml = encode(&envelope, Format::Yaml).unwrap();

        let from_json: StopEnvelope = serde_json::from_slice(&json.body).unwrap();
        let from_yaml: StopEnvelope = serde_yaml::from_slice(&yaml.body).unwrap();
        assert_eq!(from_json, from_yaml);
        assert_eq!(from_json, envelope);
    }

    #[test]
    fn text_view_lines() {
        let rendered = render(&sample(), Some("text/plain")).unwrap();
        let text = String::from_utf8(rendered.body).unwrap();
        let lines: Vec<_> = text.lines().collect();

        // Stops with no arrivals contribute no lines
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "8220DB001348 | Main Street | 145 Heuston Station |  | 2026-10-16T10:02:00+01:00 | "
        );
        assert_eq!(
            lines[1],
            "8220DB001348 | Main Street | 46A Phoenix Park | Dublin Bus | \
             2026-10-16T10:05:00+01:00 | 2026-10-16T10:07:00+01:00"
        );
    }

    #[test]
    fn text_view_of_empty_results_is_empty() {
        let rendered = render(&StopResults::new(), Some("text/plain")).unwrap();
        assert!(rendered.body.is_empty());
    }

    #[test]
    fn empty_results_are_an_empty_mapping() {
        let rendered = render(&StopResults::new(), None).unwrap();
        assert_eq!(rendered.body, b"{}");
    }
}
