use csv::Writer;
use std::io;
use strfmt::{strfmt_map, FmtError, Formatter};

use crate::{Entry, Error};
use crate::error::Result;

/// Template used when none is given.
pub const DEFAULT_TEMPLATE: &str = "{rank:>2}. {label:<25} {code:<10} {value:>12} {bar}";

/// Names longer than this get shortened in labels.
const LABEL_WIDTH: usize = 25;

/// Cells of the bar drawn for the largest entry.
const BAR_WIDTH: usize = 30;

/// Shortens long product names so they fit next to a chart.
pub fn truncate_label(name: &str) -> String {
    if name.chars().count() > LABEL_WIDTH {
        let mut label: String = name.chars().take(LABEL_WIDTH - 3).collect();

        label.push_str("...");

        label
    } else {
        name.to_string()
    }
}

/// Whole US dollars with thousands separators, e.g. `$1,235`.
pub fn format_currency(value: f64) -> String {
    let sign = if value < 0.0 && value.abs().round() > 0.0 { "-" } else { "" };

    if !value.is_finite() {
        return format!("{}$∞", sign);
    }

    let digits = format!("{:.0}", value.abs().round());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }

        grouped.push(c);
    }

    format!("{}${}", sign, grouped)
}

fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 || !max.is_finite() {
        return String::new();
    }

    let cells = ((value / max) * BAR_WIDTH as f64).round().max(0.0) as usize;

    "█".repeat(cells.min(BAR_WIDTH))
}

/// Renders one line per entry. Templates use `{key}` placeholders with the
/// usual alignment specs; available keys are `rank`, `name`, `label`,
/// `code`, `value`, `raw` and `bar`.
pub fn render(entries: &[Entry], template: &str) -> Result<Vec<String>> {
    let max = entries.iter().map(|e| e.value).fold(0.0, f64::max);

    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let rank = (i + 1).to_string();
            let label = truncate_label(&entry.name);
            let code = if entry.code.is_empty() { "N/A" } else { entry.code.as_str() };
            let value = format_currency(entry.value);
            let raw = entry.value.to_string();
            let bar = bar(entry.value, max);

            strfmt_map(template, &|mut fmt: Formatter| {
                let v = match fmt.key {
                    "rank" => rank.as_str(),
                    "name" => entry.name.as_str(),
                    "label" => label.as_str(),
                    "code" => code,
                    "value" => value.as_str(),
                    "raw" => raw.as_str(),
                    "bar" => bar.as_str(),
                    _ => return Err(FmtError::KeyError(fmt.key.to_string())),
                };

                fmt.str(v)
            })
            .map_err(|e| match e {
                FmtError::KeyError(key) => Error::Template(format!("unknown key {}", key)),
                FmtError::Invalid(msg) | FmtError::TypeError(msg) => Error::Template(msg),
            })
        })
        .collect()
}

/// Writes the entries as CSV, header included.
pub fn write_csv<W: io::Write>(entries: &[Entry], writer: W) -> Result<()> {
    let mut writer = Writer::from_writer(writer);

    writer.write_record(&["rank", "name", "code", "value"])?;

    for (i, entry) in entries.iter().enumerate() {
        writer.write_record(&[
            (i + 1).to_string(),
            entry.name.clone(),
            entry.code.clone(),
            entry.value.to_string(),
        ])?;
    }

    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{format_currency, render, truncate_label, write_csv};
    use crate::{decode, Entry, Error};

    fn entries() -> Vec<Entry> {
        vec![
            Entry { name: "Widget A".to_string(), value: 150.0, code: "WA-01".to_string() },
            Entry { name: "Widget, Deluxe".to_string(), value: 75.0, code: String::new() },
        ]
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "$0");
        assert_eq!(format_currency(999.0), "$999");
        assert_eq!(format_currency(1234.5), "$1,235");
        assert_eq!(format_currency(1234567.0), "$1,234,567");
        assert_eq!(format_currency(-5.0), "-$5");
        assert_eq!(format_currency(-0.2), "$0");
        assert_eq!(format_currency(f64::INFINITY), "$∞");
    }

    #[test]
    fn test_truncate_label() {
        assert_eq!(truncate_label("Widget A"), "Widget A");
        assert_eq!(truncate_label("1234567890123456789012345"), "1234567890123456789012345");
        assert_eq!(
            truncate_label("Extra large stainless widget"),
            "Extra large stainless ..."
        );
    }

    #[test]
    fn test_render() {
        let lines = render(&entries(), "{rank}|{name}|{code}|{value}|{raw}|{bar}").unwrap();

        assert_eq!(
            lines,
            vec![
                format!("1|Widget A|WA-01|$150|150|{}", "█".repeat(30)),
                format!("2|Widget, Deluxe|N/A|$75|75|{}", "█".repeat(15)),
            ]
        );
    }

    #[test]
    fn test_render_alignment() {
        let lines = render(&entries()[..1], "[{rank:>3}] {name:<10}|").unwrap();

        assert_eq!(lines, vec!["[  1] Widget A  |"]);
    }

    #[test]
    fn test_render_unknown_key() {
        match render(&entries(), "{price}") {
            Err(Error::Template(ref msg)) if msg.contains("price") => {}
            other => panic!("didn't expect {:?}", other),
        }

        assert!(render(&[], "{price}").unwrap().is_empty());
    }

    #[test]
    fn test_write_csv() {
        let mut out = Vec::new();

        write_csv(&entries(), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();

        assert_eq!(
            text,
            "rank,name,code,value\n1,Widget A,WA-01,150\n2,\"Widget, Deluxe\",,75\n"
        );
        assert_eq!(decode(&text)[2].get(1), Some("Widget, Deluxe"));
    }
}
