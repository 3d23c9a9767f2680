// conference-export-service/src/formatter.rs
//
// Display formatting for exported fields. Nothing in here fails: legacy rows
// that do not match current validation degrade to the placeholder or to their
// raw value.

use serde_json::{Map, Value};

pub const PLACEHOLDER: &str = "-";

pub const TOPIC_LABELS: [&str; 7] = [
    "Session 1: Drinking Water Treatment and Distribution",
    "Session 2: Wastewater Treatment and Resource Recovery",
    "Session 3: Membrane Technologies",
    "Session 4: Water Reuse and Desalination",
    "Session 5: Emerging Contaminants and Water Quality",
    "Session 6: Urban Water Management and Climate Resilience",
    "Session 7: Smart Water and Digital Solutions",
];

/// Trimmed value, or `None` when the field is absent or blank.
pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

pub fn or_placeholder(value: Option<&str>) -> String {
    non_empty(value).unwrap_or(PLACEHOLDER).to_string()
}

pub fn format_topic(topic: Option<i64>) -> String {
    match topic {
        None => PLACEHOLDER.to_string(),
        Some(n @ 1..=7) => TOPIC_LABELS[(n - 1) as usize].to_string(),
        Some(other) => other.to_string(),
    }
}

/// Numbered author block: `"1) Jane Doe\n2) John Roe"`.
///
/// Accepts the current JSON shape (`[{"firstName": .., "surname": ..}]`) and
/// the older free-text form with one author per line.
pub fn format_authors(raw: Option<&str>) -> String {
    let Some(raw) = non_empty(raw) else {
        return PLACEHOLDER.to_string();
    };

    let names: Vec<String> = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => items.iter().map(author_from_json).collect(),
        _ => legacy_authors(raw),
    };

    if names.is_empty() {
        return PLACEHOLDER.to_string();
    }

    names
        .iter()
        .enumerate()
        .map(|(i, name)| format!("{}) {}", i + 1, name))
        .collect::<Vec<_>>()
        .join("\n")
}

fn author_from_json(item: &Value) -> String {
    let name = match item {
        Value::Object(map) => join_name(str_field(map, "firstName"), str_field(map, "surname")),
        Value::String(s) => collapse_whitespace(s),
        _ => String::new(),
    };

    if name.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        name
    }
}

fn str_field<'a>(map: &'a Map<String, Value>, key: &str) -> &'a str {
    map.get(key).and_then(Value::as_str).unwrap_or("").trim()
}

fn legacy_authors(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let before_comma = line.split(',').next().unwrap_or("").trim();
            let mut tokens = before_comma.split_whitespace();
            let first = tokens.next().unwrap_or("");
            let surname = tokens.collect::<Vec<_>>().join(" ");
            let name = join_name(first, &surname);
            if name.is_empty() {
                line.to_string()
            } else {
                name
            }
        })
        .collect()
}

fn join_name(first: &str, surname: &str) -> String {
    format!("{} {}", first, surname).trim().to_string()
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Replaces `& < > " '` with entities. Used as the template engine's escape
/// function, so every interpolated value goes through it.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// ASCII letters and digits only, whitespace runs collapsed to `_`.
/// Returns `None` when nothing usable is left.
pub fn safe_file_stem(display_name: &str) -> Option<String> {
    let kept: String = display_name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect();
    let stem = kept.split_whitespace().collect::<Vec<_>>().join("_");
    (!stem.is_empty()).then_some(stem)
}

pub fn single_export_filename(display_name: &str, user_id: i64) -> String {
    let stem = safe_file_stem(display_name).unwrap_or_else(|| format!("User_{}", user_id));
    format!("Conference_{}.pdf", stem)
}

pub const BATCH_EXPORT_FILENAME: &str = "Conference_All_Regular_Users.pdf";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_authors_are_numbered_in_order() {
        let raw = r#"[{"firstName":"Wei","surname":"Zhang"},{"firstName":"Anna","surname":"Müller"},{"firstName":"Li","surname":""}]"#;
        assert_eq!(
            format_authors(Some(raw)),
            "1) Wei Zhang\n2) Anna Müller\n3) Li"
        );
    }

    #[test]
    fn json_entry_without_names_still_gets_a_line() {
        let raw = r#"[{"firstName":"","surname":""},{"firstName":"Ada","surname":"Lovelace"}]"#;
        assert_eq!(format_authors(Some(raw)), "1) -\n2) Ada Lovelace");
    }

    #[test]
    fn legacy_lines_each_become_one_entry() {
        let raw = "Jane Mary Doe, University of Oslo\n\n  John Roe\n, orphan affiliation\n";
        assert_eq!(
            format_authors(Some(raw)),
            "1) Jane Mary Doe\n2) John Roe\n3) , orphan affiliation"
        );
    }

    #[test]
    fn malformed_json_falls_back_to_text() {
        assert_eq!(format_authors(Some("[{\"firstName\": \"Jo")), "1) [{\"firstName\": \"Jo");
    }

    #[test]
    fn empty_authors_render_placeholder() {
        assert_eq!(format_authors(None), PLACEHOLDER);
        assert_eq!(format_authors(Some("   ")), PLACEHOLDER);
        assert_eq!(format_authors(Some("[]")), PLACEHOLDER);
    }

    #[test]
    fn topics_map_through_the_label_table() {
        assert_eq!(format_topic(Some(1)), TOPIC_LABELS[0]);
        assert_eq!(format_topic(Some(7)), TOPIC_LABELS[6]);
    }

    #[test]
    fn out_of_range_topics_never_panic() {
        assert_eq!(format_topic(None), PLACEHOLDER);
        assert_eq!(format_topic(Some(0)), "0");
        assert_eq!(format_topic(Some(8)), "8");
        assert_eq!(format_topic(Some(-3)), "-3");
        assert_eq!(format_topic(Some(i64::MAX)), i64::MAX.to_string());
    }

    #[test]
    fn escape_covers_all_five_characters() {
        assert_eq!(
            escape_html(r#"<script>alert("x" & 'y')</script>"#),
            "&lt;script&gt;alert(&quot;x&quot; &amp; &#39;y&#39;)&lt;/script&gt;"
        );
        assert_eq!(escape_html("平和 water"), "平和 water");
    }

    #[test]
    fn blank_values_use_placeholder() {
        assert_eq!(or_placeholder(None), "-");
        assert_eq!(or_placeholder(Some("")), "-");
        assert_eq!(or_placeholder(Some("  \t")), "-");
        assert_eq!(or_placeholder(Some(" Oslo ")), "Oslo");
    }

    #[test]
    fn filenames_are_sanitized() {
        assert_eq!(single_export_filename("Dr. Jane  O'Neil", 7), "Conference_Dr_Jane_ONeil.pdf");
        assert_eq!(single_export_filename("张伟", 12), "Conference_User_12.pdf");
        assert_eq!(single_export_filename("  ", 3), "Conference_User_3.pdf");
    }
}
