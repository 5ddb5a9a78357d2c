use crate::calendar::{CalendarCell, DisplayedMonth, WEEKDAY_LABELS};
use crate::models::CalendarResponse;

pub fn render_index(view: &CalendarResponse, name: Option<&str>, currency: &str) -> String {
    let month = DisplayedMonth::normalized(view.year, i64::from(view.month) - 1);
    let title = if view.user_name.is_empty() {
        "Wage calendar".to_string()
    } else {
        format!("{}'s wages", escape_html(&view.user_name))
    };

    INDEX_HTML
        .replace("{{TITLE}}", &title)
        .replace("{{MONTH_LABEL}}", &month.label())
        .replace("{{TOTAL}}", &escape_html(&format_total(view.monthly_total, currency)))
        .replace("{{PREV_HREF}}", &month_href(name, month.advance(-1)))
        .replace("{{NEXT_HREF}}", &month_href(name, month.advance(1)))
        .replace("{{WEEKDAYS}}", &render_weekdays())
        .replace("{{CELLS}}", &render_cells(&view.cells))
}

fn render_weekdays() -> String {
    WEEKDAY_LABELS
        .iter()
        .map(|label| format!(r#"<div class="weekday">{label}</div>"#))
        .collect()
}

fn render_cells(cells: &[CalendarCell]) -> String {
    let mut html = String::new();
    for cell in cells {
        match cell {
            CalendarCell::Blank => html.push_str(r#"<div class="day blank"></div>"#),
            CalendarCell::Day {
                day,
                date_key,
                wage,
            } => {
                let amount = if *wage > 0.0 {
                    format!(r#"<span class="wage">+{wage}</span>"#)
                } else {
                    r#"<span class="no-wage">-</span>"#.to_string()
                };
                html.push_str(&format!(
                    r#"<div class="day" data-date="{}"><span class="day-number">{day}</span>{amount}</div>"#,
                    escape_html(date_key)
                ));
            }
        }
    }
    html
}

fn month_href(name: Option<&str>, month: DisplayedMonth) -> String {
    let mut href = String::from("/?");
    if let Some(name) = name {
        href.push_str(&format!("name={}&amp;", encode_query_value(name)));
    }
    href.push_str(&format!("year={}&amp;month={}", month.year, month.month_number()));
    href
}

/// Currency symbol plus the amount with thousands separators and at most
/// three fraction digits, e.g. `¥ 1,150.5`.
pub fn format_total(amount: f64, currency: &str) -> String {
    let rounded = (amount * 1000.0).round() / 1000.0;
    let sign = if rounded < 0.0 { "-" } else { "" };
    let text = format!("{:.3}", rounded.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), ""));
    let fraction = fraction.trim_end_matches('0');

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (position, digit) in whole.chars().enumerate() {
        if position > 0 && (whole.len() - position) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    if fraction.is_empty() {
        format!("{currency} {sign}{grouped}")
    } else {
        format!("{currency} {sign}{grouped}.{fraction}")
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn encode_query_value(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    encoded
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Wage Calendar</title>
  <style>
    :root {
      --bg: #f5f7fa;
      --ink: #1f2937;
      --muted: #9ca3af;
      --accent: #2563eb;
      --accent-2: #3b82f6;
      --earned: #10b981;
      --cell: #f9fafb;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Helvetica, Arial, sans-serif;
    }

    .app {
      max-width: 480px;
      margin: 0 auto;
      padding: 16px;
      display: grid;
      gap: 16px;
    }

    header {
      background: linear-gradient(135deg, var(--accent-2) 0%, var(--accent) 100%);
      border-radius: 16px;
      padding: 20px;
      color: white;
      box-shadow: 0 4px 12px rgba(37, 99, 235, 0.2);
      display: grid;
      gap: 4px;
    }

    h1 {
      margin: 0 0 6px;
      font-size: 18px;
      font-weight: normal;
      opacity: 0.9;
    }

    .total-label {
      font-size: 14px;
      opacity: 0.8;
    }

    .total {
      font-size: 32px;
      font-weight: bold;
    }

    nav {
      display: flex;
      justify-content: space-between;
      align-items: center;
      padding: 0 8px;
    }

    nav a {
      background: white;
      border: 1px solid #e5e7eb;
      border-radius: 8px;
      padding: 8px 16px;
      font-size: 14px;
      color: #374151;
      text-decoration: none;
    }

    nav span {
      font-size: 18px;
      font-weight: 600;
    }

    .calendar {
      background: white;
      border-radius: 16px;
      padding: 16px;
      box-shadow: 0 2px 8px rgba(0, 0, 0, 0.05);
    }

    .grid {
      display: grid;
      grid-template-columns: repeat(7, 1fr);
      gap: 8px;
    }

    .weekday {
      text-align: center;
      font-size: 14px;
      color: var(--muted);
      padding-bottom: 8px;
    }

    .day {
      aspect-ratio: 1 / 1;
      background: var(--cell);
      border: 1px solid #f3f4f6;
      border-radius: 8px;
      display: flex;
      flex-direction: column;
      align-items: center;
      justify-content: center;
    }

    .day.blank {
      background: transparent;
      border: none;
    }

    .day-number {
      font-size: 14px;
      font-weight: 500;
      color: #374151;
      margin-bottom: 2px;
    }

    .wage {
      font-size: 12px;
      font-weight: 600;
      color: var(--earned);
    }

    .no-wage {
      font-size: 12px;
      color: #d1d5db;
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>{{TITLE}}</h1>
      <span class="total-label">{{MONTH_LABEL}} total</span>
      <span class="total" id="total">{{TOTAL}}</span>
    </header>

    <nav>
      <a href="{{PREV_HREF}}" id="prev">&lt; Prev</a>
      <span id="month">{{MONTH_LABEL}}</span>
      <a href="{{NEXT_HREF}}" id="next">Next &gt;</a>
    </nav>

    <section class="calendar">
      <div class="grid">{{WEEKDAYS}}</div>
      <div class="grid" id="days">{{CELLS}}</div>
    </section>
  </main>
</body>
</html>
"#;
