use super::error::WeatherError;
use super::format::{format_forecast_item, forecast_local_time, DATE_KEY_FORMAT};
use super::types::*;
use chrono_tz::Tz;

/// Bucket 3-hour forecast slots by their local calendar date.
///
/// One pass in input order; a slot that fails to format fails the whole
/// grouping.
pub fn group_by_date(items: &[ForecastItem], tz: &Tz) -> Result<GroupedForecast, WeatherError> {
    let mut grouped = GroupedForecast::new();

    for item in items {
        let date = forecast_local_time(item, tz).format(DATE_KEY_FORMAT).to_string();
        grouped.push(date, format_forecast_item(item, tz)?);
    }

    Ok(grouped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::format::tests::forecast_item;

    const SEOUL: Tz = chrono_tz::Asia::Seoul;

    #[test]
    fn test_two_dates_keep_input_order() {
        let items = vec![
            forecast_item("2024-05-01 00:00:00", 15.0),
            forecast_item("2024-05-01 03:00:00", 18.0),
            forecast_item("2024-05-02 00:00:00", 16.0),
        ];

        let grouped = group_by_date(&items, &SEOUL).unwrap();

        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped.dates().collect::<Vec<_>>(), vec!["2024-05-01", "2024-05-02"]);

        let first = grouped.get("2024-05-01").unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].current_temp, "15.00℃");
        assert_eq!(first[1].current_temp, "18.00℃");

        let second = grouped.get("2024-05-02").unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].current_temp, "16.00℃");
    }

    #[test]
    fn test_grouping_preserves_every_entry() {
        // Five days of 3-hour slots starting at 12:00 UTC
        let items: Vec<ForecastItem> = (0..40)
            .map(|i| {
                let day = 1 + (12 + i * 3) / 24;
                let hour = (12 + i * 3) % 24;
                forecast_item(&format!("2024-05-{:02} {:02}:00:00", day, hour), i as f64)
            })
            .collect();

        let grouped = group_by_date(&items, &SEOUL).unwrap();

        assert_eq!(grouped.entry_count(), items.len());

        let flattened: Vec<String> = grouped
            .days()
            .iter()
            .flat_map(|day| day.entries.iter().map(|e| e.current_temp.clone()))
            .collect();
        let expected: Vec<String> = (0..40).map(|i| format!("{:.2}℃", i as f64)).collect();
        assert_eq!(flattened, expected);

        // Every entry sits under the date it reports, and dates are distinct.
        let mut seen = std::collections::HashSet::new();
        for day in grouped.days() {
            assert!(seen.insert(day.date.clone()));
            for entry in &day.entries {
                assert!(entry.forecast_time.starts_with(&day.date));
            }
        }
    }

    #[test]
    fn test_date_key_uses_service_timezone() {
        // 15:00 UTC on the 1st is already the 2nd in Seoul
        let items = vec![
            forecast_item("2024-05-01 12:00:00", 15.0),
            forecast_item("2024-05-01 15:00:00", 14.0),
        ];

        let grouped = group_by_date(&items, &SEOUL).unwrap();
        assert_eq!(grouped.dates().collect::<Vec<_>>(), vec!["2024-05-01", "2024-05-02"]);
    }

    #[test]
    fn test_keys_follow_first_occurrence() {
        let items = vec![
            forecast_item("2024-05-02 00:00:00", 1.0),
            forecast_item("2024-05-01 00:00:00", 2.0),
            forecast_item("2024-05-02 03:00:00", 3.0),
        ];

        let grouped = group_by_date(&items, &SEOUL).unwrap();
        assert_eq!(grouped.dates().collect::<Vec<_>>(), vec!["2024-05-02", "2024-05-01"]);
        assert_eq!(grouped.get("2024-05-02").unwrap().len(), 2);
    }

    #[test]
    fn test_empty_list() {
        let grouped = group_by_date(&[], &SEOUL).unwrap();
        assert!(grouped.is_empty());
    }

    #[test]
    fn test_serializes_as_ordered_object() {
        let items = vec![
            forecast_item("2024-05-01 00:00:00", 15.0),
            forecast_item("2024-05-02 00:00:00", 16.0),
        ];
        let grouped = group_by_date(&items, &SEOUL).unwrap();

        let json = serde_json::to_string(&grouped).unwrap();
        let first = json.find("2024-05-01").unwrap();
        let second = json.find("\"2024-05-02\"").unwrap();
        assert!(first < second);

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["2024-05-01"][0]["forecastTime"], "2024-05-01 09:00");
    }
}
