//! HTML pages

use std::fmt::Write as _;

use crate::charts::Chart;
use crate::constants;
use crate::monthly::MonthlyReport;
use crate::reports::DetailRow;
use crate::yearly::{MonthHighlight, YearlyReport};

/// Escape text for HTML and SVG bodies and attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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

const STYLE: &str = "
body { font-family: sans-serif; max-width: 960px; margin: 2rem auto; padding: 0 1rem; color: #222; }
nav a { margin-right: 1rem; }
table { border-collapse: collapse; width: 100%; margin-top: 1rem; }
th, td { border: 1px solid #ccc; padding: 0.35rem 0.6rem; text-align: left; }
td.amount { text-align: right; font-variant-numeric: tabular-nums; }
form.inline label { margin-right: 0.75rem; }
.chart { margin: 1.5rem 0; }
.highlights { display: flex; gap: 2rem; }
";

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>{STYLE}</style>
</head>
<body>
<nav><a href="/">Add expense</a><a href="/monthly">Monthly</a><a href="/yearly">Yearly</a></nav>
<h1>{title}</h1>
{body}
</body>
</html>
"#,
        title = escape(title),
    )
}

fn detail_table(out: &mut String, details: &[DetailRow], currency: &str) {
    out.push_str(
        "<table>\n<thead><tr><th>Date</th><th>Category</th><th>Amount</th><th>Note</th></tr></thead>\n<tbody>\n",
    );
    for row in details {
        let _ = writeln!(
            out,
            r#"<tr><td>{}</td><td>{}</td><td class="amount">{}{:.2}</td><td>{}</td></tr>"#,
            escape(&row.date),
            escape(&row.category),
            escape(currency),
            row.amount,
            escape(&row.note),
        );
    }
    out.push_str("</tbody>\n</table>\n");
}

/// Expense entry form
pub fn index_page(today: &str) -> String {
    let body = format!(
        r#"<form method="post" action="/add">
<p><label>Date <input type="date" name="date" value="{today}" required></label></p>
<p><label>Category <input type="text" name="category" required></label></p>
<p><label>Amount <input type="number" name="amount" step="0.01" required></label></p>
<p><label>Note <input type="text" name="note"></label></p>
<p><button type="submit">Add expense</button></p>
</form>
"#,
        today = escape(today),
    );
    layout("Daily Expenses", &body)
}

/// Monthly breakdown with pie chart and detail table
pub fn monthly_page(report: &MonthlyReport, chart: &Chart, currency: &str) -> String {
    let mut body = String::new();

    body.push_str(r#"<form class="inline" method="post" action="/monthly"><label>Month <select name="month">"#);
    for (i, name) in constants::MONTH_NAMES.iter().enumerate() {
        let month = i as u32 + 1;
        let selected = if month == report.period.month { " selected" } else { "" };
        let _ = write!(body, r#"<option value="{month}"{selected}>{name}</option>"#);
    }
    let _ = writeln!(
        body,
        r#"</select></label><label>Year <input type="number" name="year" value="{}" min="1"></label><button type="submit">Show</button></form>"#,
        report.period.year
    );

    let _ = writeln!(body, "<h2>{} {}</h2>", report.month_name, report.period.year);
    let _ = writeln!(body, r#"<div class="chart">{}</div>"#, chart.svg());

    body.push_str("<table>\n<thead><tr><th>Category</th><th>Total</th><th>Share</th></tr></thead>\n<tbody>\n");
    for category in &report.categories {
        let _ = writeln!(
            body,
            r#"<tr><td>{}</td><td class="amount">{}{:.2}</td><td class="amount">{:.1}%</td></tr>"#,
            escape(&category.category),
            escape(currency),
            category.total,
            category.share
        );
    }
    let _ = writeln!(
        body,
        r#"<tr><th>Total</th><th class="amount">{}{:.2}</th><th></th></tr>"#,
        escape(currency),
        report.total
    );
    body.push_str("</tbody>\n</table>\n");

    body.push_str("<h2>Expenses</h2>\n");
    detail_table(&mut body, &report.details, currency);

    layout("Monthly Expenses", &body)
}

fn highlight_section(out: &mut String, label: &str, highlight: &MonthHighlight, currency: &str) {
    let _ = write!(
        out,
        "<section><h3>{} month: {} ({}{:.2})</h3>",
        label,
        highlight.name,
        escape(currency),
        highlight.total
    );
    if highlight.reasons.is_empty() {
        out.push_str("<p>No expenses recorded.</p>");
    } else {
        out.push_str("<ol>");
        for reason in &highlight.reasons {
            let _ = write!(
                out,
                "<li>{}: {}{:.2}</li>",
                escape(&reason.category),
                escape(currency),
                reason.total
            );
        }
        out.push_str("</ol>");
    }
    out.push_str("</section>\n");
}

/// Yearly overview with bar chart, highest/lowest month and detail table
pub fn yearly_page(report: &YearlyReport, chart: &Chart, currency: &str) -> String {
    let mut body = String::new();

    body.push_str(r#"<form class="inline" method="post" action="/yearly"><label>Year <select name="year">"#);
    for year in &report.years {
        let selected = if *year == report.year { " selected" } else { "" };
        let _ = write!(body, r#"<option value="{year}"{selected}>{year}</option>"#);
    }
    body.push_str("</select></label><button type=\"submit\">Show</button></form>\n");

    let _ = writeln!(body, "<h2>{}</h2>", report.year);
    let _ = writeln!(body, r#"<div class="chart">{}</div>"#, chart.svg());
    let _ = writeln!(
        body,
        "<p>Total for the year: {}{:.2}</p>",
        escape(currency),
        report.total
    );

    body.push_str(r#"<div class="highlights">"#);
    highlight_section(&mut body, "Highest", &report.highest, currency);
    highlight_section(&mut body, "Lowest", &report.lowest, currency);
    body.push_str("</div>\n");

    body.push_str("<h2>Expenses</h2>\n");
    detail_table(&mut body, &report.details, currency);

    layout("Yearly Expenses", &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts;
    use crate::expenses::tests::expense;
    use crate::monthly::monthly_report;
    use crate::reports::Outcome;
    use crate::yearly::yearly_report;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn test_index_page_has_form() {
        let html = index_page("2024-01-31");
        assert!(html.contains(r#"action="/add""#));
        assert!(html.contains(r#"name="note""#));
        assert!(html.contains(r#"value="2024-01-31""#));
    }

    #[test]
    fn test_monthly_page() {
        let mut food = expense("2024-01-05", "Food & Drink", 12.0);
        food.note = "<script>".to_string();
        let expenses = vec![food, expense("2024-01-06", "Rent", 100.0)];
        let Outcome::Report(report) = monthly_report(&expenses, None, None) else {
            panic!("expected report");
        };

        let html = monthly_page(&report, &charts::pie_chart(&report.categories), "$");

        assert!(html.contains(r#"<option value="1" selected>January</option>"#));
        assert!(html.contains(r#"name="year" value="2024""#));
        assert!(html.contains("Food &amp; Drink"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("2024-01-06"));
        assert!(html.contains("$112.00"));
    }

    #[test]
    fn test_yearly_page() {
        let expenses = vec![
            expense("2023-02-05", "Food", 12.0),
            expense("2024-03-06", "Rent", 300.0),
        ];
        let Outcome::Report(report) = yearly_report(&expenses, Some(2024)) else {
            panic!("expected report");
        };

        let chart = charts::bar_chart(report.year, &report.monthly_totals, "$");
        let html = yearly_page(&report, &chart, "$");

        assert!(html.contains(r#"<option value="2024" selected>2024</option>"#));
        assert!(html.contains(r#"<option value="2023">2023</option>"#));
        assert!(html.contains("Highest month: March ($300.00)"));
        assert!(html.contains("<li>Rent: $300.00</li>"));
        assert!(html.contains("Lowest month: January ($0.00)"));
        assert!(html.contains("No expenses recorded."));
    }
}
