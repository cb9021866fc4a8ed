//! HTML rendering for the catalog pages
//!
//! Pages are assembled as plain strings. Every value that came from a
//! document goes through [`escape`] before it reaches the markup.

use std::fmt::Display;

use vitrine_common::{aggregate_rating, format_date, star_glyphs, Evaluation};

use crate::loader::{Advisory, CatalogItem};
use crate::view::{Facets, SortOrder, ViewFilters};

const SITE_TITLE: &str = "Vitrine";

/// Escape text for HTML element content and attribute values
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Percent-encode a query-string value
pub fn encode_query_value(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

/// Link to the detail page of a document
pub fn detail_href(source_ref: &str) -> String {
    format!("/post?cafe={}", encode_query_value(source_ref))
}

fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<link rel="stylesheet" href="/static/style.css">
</head>
<body>
<header class="site-header"><a href="/">{site}</a></header>
<main>
{body}
</main>
</body>
</html>
"#,
        title = escape(title),
        site = SITE_TITLE,
        body = body
    )
}

/// Status box for the current advisory (empty when hidden)
pub fn advisory_box(advisory: &Advisory) -> String {
    let (class, message) = match advisory {
        Advisory::Hidden => return String::new(),
        Advisory::Warning(msg) => ("status status-warn", msg),
        Advisory::Error(msg) => ("status status-error", msg),
    };
    format!(
        r#"<pre class="{}" role="status">{}</pre>"#,
        class,
        escape(message)
    )
}

fn badge(title: &str, value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    format!(
        r#"<span class="badge" title="{}">{}</span>"#,
        escape(title),
        escape(value)
    )
}

fn stars_span(rating: i64, label: &str) -> String {
    format!(
        r#"<span class="stars" aria-label="{} {} of 5">{}</span>"#,
        escape(label),
        rating,
        star_glyphs(rating)
    )
}

/// One term/definition row; omitted when the value is empty
fn dl_row(label: &str, value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    format!(
        r#"<div class="dl-row"><div class="dl-term">{}</div><div class="dl-def">{}</div></div>"#,
        escape(label),
        escape(value)
    )
}

fn opt<T: Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Table cell text for an optional measurement
fn cell<T: Display>(value: Option<T>) -> String {
    value.map(|v| escape(&v.to_string())).unwrap_or_else(|| "—".to_string())
}

fn meta_badges(c: &CatalogItem) -> String {
    let item = &c.item;
    [
        badge("Producer/Farm", &item.producer),
        badge("Origin", &item.origin),
        badge("Variety", &item.variety),
        badge("Process", &item.process),
        badge("Roast", &item.roast_level),
    ]
    .into_iter()
    .filter(|b| !b.is_empty())
    .collect::<Vec<_>>()
    .join(" ")
}

fn tag_badges(tags: &[String]) -> String {
    tags.iter()
        .map(|t| format!(r#"<span class="badge tag">{}</span>"#, escape(t)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn notes_block(c: &CatalogItem, label: &str) -> String {
    let notes: Vec<&str> = [c.item.profile.as_str(), c.item.impressions.as_str()]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect();
    if notes.is_empty() {
        return String::new();
    }
    format!(
        r#"<div class="note"><strong>{}:</strong> {}</div>"#,
        label,
        escape(&notes.join(" | "))
    )
}

fn display_name(c: &CatalogItem) -> String {
    if !c.item.name.is_empty() {
        c.item.name.clone()
    } else if c.is_stub() {
        "(Invalid file)".to_string()
    } else {
        "(Unnamed)".to_string()
    }
}

/// Evaluations table (empty when there are none)
pub fn evaluations_table(evaluations: &[Evaluation]) -> String {
    if evaluations.is_empty() {
        return String::new();
    }

    let rows: String = evaluations
        .iter()
        .enumerate()
        .map(|(i, e)| {
            format!(
                "<tr><th scope=\"row\">{}</th><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                i + 1,
                escape(&e.method),
                stars_span(i64::from(e.rating), "Rating"),
                cell(e.grind_size),
                cell(e.dose),
                cell(e.beverage_yield),
                cell(e.time),
                cell(e.water_temp),
                escape(&e.best_use),
                escape(&e.comments),
            )
        })
        .collect();

    format!(
        r#"<div class="table-wrap">
<table class="tbl">
<caption>Evaluations by brew method</caption>
<thead><tr><th scope="col">#</th><th scope="col">Method</th><th scope="col">Rating</th><th scope="col">Grind (μm)</th><th scope="col">Dose (g)</th><th scope="col">Yield (g)</th><th scope="col">Time (s)</th><th scope="col">Water (°C)</th><th scope="col">Best use</th><th scope="col">Comments</th></tr></thead>
<tbody>
{}</tbody>
</table>
</div>"#,
        rows
    )
}

/// Card for one catalog item, with the full record inside `<details>`
pub fn card(c: &CatalogItem) -> String {
    let item = &c.item;
    let rating = aggregate_rating(&item.evaluations);
    let roast = if item.roast_date.is_empty() {
        String::new()
    } else {
        format!(" · roasted {}", escape(&format_date(&item.roast_date)))
    };
    let tags = tag_badges(&item.tags);
    let tags = if tags.is_empty() {
        String::new()
    } else {
        format!(r#"<div class="meta">{}</div>"#, tags)
    };

    let load_error = match &c.load_error {
        Some(err) => format!(
            r#"<div class="box box-error"><strong>Failed to load <code>{}</code>:</strong> {}</div>"#,
            escape(&c.source_ref),
            escape(err)
        ),
        None => String::new(),
    };

    let warnings = if c.warnings.is_empty() {
        String::new()
    } else {
        let list: String = c
            .warnings
            .iter()
            .map(|w| format!("<li>{}</li>", escape(w)))
            .collect();
        format!(
            r#"<div class="box"><strong>Validation warnings:</strong><ul>{}</ul></div>"#,
            list
        )
    };

    let link = if c.is_stub() {
        String::new()
    } else {
        format!(
            r#"<p><a class="btn" href="{}">Open page</a></p>"#,
            escape(&detail_href(&c.source_ref))
        )
    };

    let rows = [
        dl_row("File", &c.source_ref),
        dl_row("ID", &item.id),
        dl_row("Timestamp (_ts)", &item.ts.to_string()),
        dl_row("Name", &item.name),
        dl_row("Producer", &item.producer),
        dl_row("Origin", &item.origin),
        dl_row("Variety", &item.variety),
        dl_row("Process", &item.process),
        dl_row("Roast date", &format_date(&item.roast_date)),
        dl_row("Roaster", &item.roaster),
        dl_row("Density (g/L)", &opt(item.density)),
        dl_row("Size (μm)", &opt(item.size)),
        dl_row("Humidity (%)", &opt(item.humidity)),
        dl_row("Agtron", &opt(item.agtron)),
        dl_row("Roast level", &item.roast_level),
        dl_row("Defects", &item.defects),
        dl_row("Sensory profile", &item.profile),
        dl_row("Impressions", &item.impressions),
    ]
    .concat();

    format!(
        r#"<article class="card">
<h3>{name}</h3>
<div class="meta">{meta}</div>
<div>{stars}{roast}</div>
{tags}
{notes}
<details class="details-block">
<summary>Details</summary>
{load_error}
{warnings}
{link}
<div class="detail-grid">{rows}</div>
{table}
</details>
</article>
"#,
        name = escape(&display_name(c)),
        meta = meta_badges(c),
        stars = stars_span(i64::from(rating), "Average rating"),
        roast = roast,
        tags = tags,
        notes = notes_block(c, "Notes"),
        load_error = load_error,
        warnings = warnings,
        link = link,
        rows = rows,
        table = evaluations_table(&item.evaluations),
    )
}

fn select(name: &str, placeholder: &str, options: &[String], current: &str) -> String {
    let mut html = format!(
        r#"<select name="{}" aria-label="{}"><option value="">{}</option>"#,
        name,
        escape(placeholder),
        escape(placeholder)
    );
    for option in options {
        let selected = if option.eq_ignore_ascii_case(current.trim()) {
            " selected"
        } else {
            ""
        };
        html.push_str(&format!(
            r#"<option value="{v}"{s}>{v}</option>"#,
            v = escape(option),
            s = selected
        ));
    }
    html.push_str("</select>");
    html
}

fn filter_form(filters: &ViewFilters, facets: &Facets) -> String {
    let sort = filters.sort_order();
    let sort_options: String = [
        (SortOrder::Recent, "Most recent"),
        (SortOrder::Name, "Name"),
        (SortOrder::Rating, "Rating"),
    ]
    .iter()
    .map(|(order, label)| {
        format!(
            r#"<option value="{}"{}>{}</option>"#,
            order.as_str(),
            if *order == sort { " selected" } else { "" },
            label
        )
    })
    .collect();

    format!(
        r#"<form class="filters" method="get" action="/">
<input type="search" name="query" placeholder="Search" value="{query}">
{origin}
{process}
{method}
{roast}
<select name="sort" aria-label="Sort">{sort}</select>
<button type="submit">Apply</button>
<a class="btn-ghost" href="/">Clear</a>
</form>
<form class="reload" method="post" action="/reload"><button type="submit">Reload</button></form>"#,
        query = escape(&filters.query),
        origin = select("origin", "Origin", &facets.origins, &filters.origin),
        process = select("process", "Process", &facets.processes, &filters.process),
        method = select("method", "Method", &facets.methods, &filters.method),
        roast = select("roast", "Roast", &facets.roast_levels, &filters.roast),
        sort = sort_options,
    )
}

/// Catalog index: filter form, advisory box, card grid and empty notice
pub fn index_page(
    items: &[&CatalogItem],
    filters: &ViewFilters,
    facets: &Facets,
    advisory: &Advisory,
) -> String {
    let cards: String = items.iter().map(|c| card(c)).collect();
    let empty = if items.is_empty() {
        r#"<p class="empty">No coffees match the current filters.</p>"#
    } else {
        ""
    };

    let body = format!(
        "{}\n{}\n<section class=\"grid\">\n{}</section>\n{}",
        filter_form(filters, facets),
        advisory_box(advisory),
        cards,
        empty
    );
    page(SITE_TITLE, &body)
}

/// Detail page for a single document
pub fn detail_page(c: &CatalogItem) -> String {
    let item = &c.item;
    let rating = aggregate_rating(&item.evaluations);
    let title = if item.name.is_empty() {
        "(Unnamed coffee)".to_string()
    } else {
        item.name.clone()
    };

    let mut dates = String::new();
    if !item.roast_date.is_empty() {
        dates.push_str(&format!(" · roasted on {}", escape(&format_date(&item.roast_date))));
    }
    if !item.tasting_date.is_empty() {
        dates.push_str(&format!(" · tasted on {}", escape(&format_date(&item.tasting_date))));
    }

    let tags = tag_badges(&item.tags);
    let tags = if tags.is_empty() {
        String::new()
    } else {
        format!(r#"<p class="meta">{}</p>"#, tags)
    };

    let warnings = if c.warnings.is_empty() {
        String::new()
    } else {
        let list: String = c
            .warnings
            .iter()
            .map(|w| format!("<li>{}</li>", escape(w)))
            .collect();
        format!(
            r#"<div class="box"><strong>Validation warnings:</strong><ul>{}</ul></div>"#,
            list
        )
    };

    let rows = [
        dl_row("Producer", &item.producer),
        dl_row("Origin", &item.origin),
        dl_row("Variety", &item.variety),
        dl_row("Process", &item.process),
        dl_row("Roast date", &format_date(&item.roast_date)),
        dl_row("Tasting date", &format_date(&item.tasting_date)),
        dl_row("Roaster", &item.roaster),
        dl_row("Density (g/L)", &opt(item.density)),
        dl_row("Size (μm)", &opt(item.size)),
        dl_row("Humidity (%)", &opt(item.humidity)),
        dl_row("Agtron", &opt(item.agtron)),
        dl_row("Roast level", &item.roast_level),
        dl_row("Defects", &item.defects),
    ]
    .concat();

    let body = format!(
        r#"<article class="card post">
<header>
<h2>{name}</h2>
<p class="meta">{meta}</p>
<p>{stars}{dates}</p>
{tags}
<p class="meta"><small>File: <code>{file}</code></small></p>
</header>
{warnings}
{notes}
<section aria-label="Technical details"><div class="detail-grid">{rows}</div></section>
{table}
</article>
<p><a href="/">&larr; Back to catalog</a></p>"#,
        name = escape(&title),
        meta = meta_badges(c),
        stars = stars_span(i64::from(rating), "Average rating"),
        dates = dates,
        tags = tags,
        file = escape(&c.source_ref),
        warnings = warnings,
        notes = notes_block(c, "Free notes"),
        rows = rows,
        table = evaluations_table(&item.evaluations),
    );
    page(&title, &body)
}

/// Page that only shows an advisory (failed detail loads, bad requests)
pub fn advisory_page(title: &str, advisory: &Advisory) -> String {
    let body = format!(
        "<h2>{}</h2>\n{}\n<p><a href=\"/\">&larr; Back to catalog</a></p>",
        escape(title),
        advisory_box(advisory)
    );
    page(title, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use vitrine_common::normalize_item;

    fn entry(raw: serde_json::Value) -> CatalogItem {
        CatalogItem {
            item: normalize_item(&raw),
            source_ref: "2024/a b.json".to_string(),
            load_error: None,
            warnings: Vec::new(),
        }
    }

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn test_detail_href_encodes_reference() {
        assert_eq!(detail_href("2024/a b.json"), "/post?cafe=2024/a%20b.json");
        assert_eq!(detail_href("café.json"), "/post?cafe=caf%C3%A9.json");
        assert_eq!(detail_href("a&b=c.json"), "/post?cafe=a%26b%3Dc.json");
    }

    #[test]
    fn test_card_escapes_document_text() {
        let c = entry(json!({"nome": "<script>alert(1)</script>", "tags": ["a&b"]}));
        let html = card(&c);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("a&amp;b"));
    }

    #[test]
    fn test_card_shows_rating_and_roast_date() {
        let c = entry(json!({
            "nome": "Bourbon", "dataTorra": "2024-01-15",
            "avaliacoes": [{"metodo": "V60", "nota": 4}]
        }));
        let html = card(&c);
        assert!(html.contains("★★★★☆"));
        assert!(html.contains("roasted 15/01/2024"));
        assert!(html.contains("Evaluations by brew method"));
        assert!(html.contains(r#"href="/post?cafe=2024/a%20b.json""#));
    }

    #[test]
    fn test_stub_card_shows_error_without_link() {
        let stub = CatalogItem::stub(
            "a.json",
            "[unavailable] a.json".to_string(),
            "Not found: a.json".to_string(),
        );
        let html = card(&stub);
        assert!(html.contains("Failed to load <code>a.json</code>"));
        assert!(html.contains("Not found: a.json"));
        assert!(!html.contains("/post?cafe="));
    }

    #[test]
    fn test_dl_row_omits_empty_values() {
        assert_eq!(dl_row("Roaster", ""), "");
        assert!(dl_row("Roaster", "Acme").contains("Acme"));
    }

    #[test]
    fn test_evaluations_table_missing_measurements() {
        assert_eq!(evaluations_table(&[]), "");
        let c = entry(json!({"avaliacoes": [{"metodo": "Espresso", "nota": 3, "dose": 18}]}));
        let html = evaluations_table(&c.item.evaluations);
        assert!(html.contains("<td>18</td>"));
        assert!(html.contains("<td>—</td>"));
        assert!(html.contains("★★★☆☆"));
    }

    #[test]
    fn test_index_page_empty_notice_and_advisory() {
        let html = index_page(
            &[],
            &ViewFilters::default(),
            &Facets::default(),
            &Advisory::Warning("Manifest is empty. Edit index.json.".to_string()),
        );
        assert!(html.contains("No coffees match"));
        assert!(html.contains("status-warn"));
        assert!(html.contains("Manifest is empty. Edit index.json."));
    }

    #[test]
    fn test_index_page_hidden_advisory() {
        let c = entry(json!({"nome": "Geisha"}));
        let html = index_page(
            &[&c],
            &ViewFilters::default(),
            &Facets::default(),
            &Advisory::Hidden,
        );
        assert!(!html.contains("role=\"status\""));
        assert!(!html.contains("No coffees match"));
        assert!(html.contains("Geisha"));
    }

    #[test]
    fn test_filter_form_marks_selection() {
        let facets = Facets {
            origins: vec!["Brasil".to_string(), "Quênia".to_string()],
            ..Default::default()
        };
        let filters = ViewFilters {
            origin: "Brasil".to_string(),
            sort: "rating".to_string(),
            ..Default::default()
        };
        let html = filter_form(&filters, &facets);
        assert!(html.contains(r#"<option value="Brasil" selected>Brasil</option>"#));
        assert!(html.contains(r#"<option value="rating" selected>Rating</option>"#));
    }

    #[test]
    fn test_detail_page_dates() {
        let c = entry(json!({
            "nome": "Geisha",
            "dataTorra": "2024-03-01",
            "dataBebido": "2024/03/10"
        }));
        let html = detail_page(&c);
        assert!(html.contains("roasted on 01/03/2024"));
        assert!(html.contains("tasted on 10/03/2024"));
        assert!(html.contains("<title>Geisha</title>"));
    }
}
