use anyhow::{Context, Result};
use log::info;
use std::fs;
use std::path::Path;

use crate::discover::discover_city_pages;
use crate::types::CityPage;

const SITE_TITLE: &str = "North Carolina Careers Hub";
const TAGLINE: &str = "Explore in-demand roles across the Tar Heel State. Choose a city to see curated opportunities filtered from the latest Adzuna feed.";
const OPTION_INDENT: &str = "          ";

// HTML generation helpers
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// CSS styles for the home page
fn css_styles() -> &'static str {
    r#"
    :root {
      color-scheme: light;
      font-family: "Segoe UI", system-ui, -apple-system, sans-serif;
      line-height: 1.6;
      --bg: #f5f7fb;
      --text: #1f2933;
      --muted: #637183;
      --accent: #2463eb;
      --accent-dark: #1a44a6;
      --card: #ffffff;
      --shadow: 0 18px 45px rgba(15, 31, 62, 0.12);
      --radius: 18px;
    }

    *, *::before, *::after {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--text);
      display: flex;
      flex-direction: column;
    }

    header {
      background: linear-gradient(145deg, #102b5d, #15407c, #2463eb);
      color: #fff;
      padding: 3.5rem 1.5rem 3rem;
      text-align: center;
    }

    header h1 {
      margin: 0;
      font-size: clamp(2.2rem, 3vw + 1.2rem, 3.2rem);
      letter-spacing: -0.015em;
    }

    header p {
      margin: 1rem auto 0;
      max-width: 60ch;
      color: #dce7ff;
    }

    main {
      flex: 1 1 auto;
      width: min(900px, 92%);
      margin: -2.5rem auto 0;
    }

    .search-card {
      background: var(--card);
      border-radius: var(--radius);
      box-shadow: var(--shadow);
      padding: 2.2rem 2.4rem;
      display: grid;
      gap: 1.4rem;
    }

    .search-card h2 {
      margin: 0;
      font-size: clamp(1.5rem, 1.4vw + 1rem, 2rem);
    }

    .search-form {
      display: grid;
      gap: 1rem;
    }

    .search-fields {
      display: grid;
      gap: 0.75rem;
    }

    @media (min-width: 640px) {
      .search-fields {
        grid-template-columns: 1fr 1fr;
        gap: 0.85rem;
        align-items: center;
      }
    }

    @media (min-width: 960px) {
      .search-fields {
        grid-template-columns: 1.1fr 1fr 1fr;
      }
    }

    .search-fields input {
      border: 1px solid rgba(31, 41, 51, 0.1);
      border-radius: 999px;
      padding: 0.85rem 1.1rem;
      font-size: 1rem;
      width: 100%;
    }

    .search-fields select {
      border: 1px solid rgba(31, 41, 51, 0.12);
      border-radius: 999px;
      padding: 0.85rem 1.1rem;
      font-size: 1rem;
      width: 100%;
      background: #fff;
    }

    .search-form button {
      justify-self: flex-start;
      border: none;
      border-radius: 999px;
      padding: 0.85rem 1.8rem;
      background: var(--accent);
      color: #fff;
      font-weight: 600;
      cursor: pointer;
      transition: transform 0.2s ease, box-shadow 0.2s ease, background 0.2s ease;
    }

    .search-form button:hover {
      background: var(--accent-dark);
      transform: translateY(-2px);
      box-shadow: var(--shadow);
    }

    footer {
      padding: 2rem 0 2.5rem;
      text-align: center;
      color: var(--muted);
      font-size: 0.95rem;
    }

    .visually-hidden {
      position: absolute;
      width: 1px;
      height: 1px;
      padding: 0;
      margin: -1px;
      overflow: hidden;
      clip: rect(0, 0, 0, 0);
      white-space: nowrap;
      border: 0;
    }
"#
}

/// Inline script: filters the city list as you type and navigates on submit
fn search_script() -> &'static str {
    r#"
    const searchInput = document.getElementById('city-search');
    const keywordInput = document.getElementById('keyword-search');
    const citySelect = document.getElementById('city-select');
    const form = document.getElementById('city-form');

    if (searchInput && citySelect) {
      searchInput.addEventListener('input', () => {
        const term = searchInput.value.trim().toLowerCase();
        let firstVisible = null;
        Array.from(citySelect.options).forEach(option => {
          if (!option.value) return;
          const match = option.text.toLowerCase().includes(term);
          option.hidden = !match;
          if (match && !firstVisible) {
            firstVisible = option;
          }
        });
        if (firstVisible) {
          citySelect.value = firstVisible.value;
        } else {
          citySelect.value = '';
        }
      });
    }

    if (form && citySelect) {
      form.addEventListener('submit', event => {
        event.preventDefault();
        let destination = citySelect.value;
        if (!destination) return;

        const keyword = keywordInput ? keywordInput.value.trim() : '';
        if (keyword) {
          const joiner = destination.includes('?') ? '&' : '?';
          destination += joiner + 'q=' + encodeURIComponent(keyword);
        }
        window.location.href = destination;
      });
    }
"#
}

/// Generate page header HTML
fn page_header() -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>{title}</title>
  <style>{styles}  </style>
</head>
<body>
  <header>
    <h1>{title}</h1>
    <p>{tagline}</p>
  </header>
"#,
        title = html_escape(SITE_TITLE),
        styles = css_styles(),
        tagline = html_escape(TAGLINE),
    )
}

/// Generate page footer HTML
fn page_footer() -> String {
    format!(
        r#"  <footer>
    &copy; 2024 {title}. Connecting talent with opportunity statewide.
  </footer>

  <script>{script}  </script>
</body>
</html>
"#,
        title = html_escape(SITE_TITLE),
        script = search_script(),
    )
}

/// One `<option>` per city page, or a disabled placeholder when there are none
fn city_options(pages: &[CityPage]) -> String {
    if pages.is_empty() {
        return format!(
            r#"{}<option value="" disabled>No city pages found</option>"#,
            OPTION_INDENT
        );
    }

    pages
        .iter()
        .map(|page| {
            format!(
                r#"{}<option value="{}">{}</option>"#,
                OPTION_INDENT,
                html_escape(&page.path),
                html_escape(&page.label)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the complete home page document
pub fn build_home_html(pages: &[CityPage]) -> String {
    let mut html = page_header();

    html.push_str(&format!(
        r#"  <main>
    <section class="search-card">
      <h2>Search openings by city</h2>
      <form class="search-form" id="city-form">
        <div class="search-fields">
          <label class="visually-hidden" for="city-search">Filter cities</label>
          <input id="city-search" type="search" placeholder="Start typing a city..." autocomplete="off" />
          <label class="visually-hidden" for="keyword-search">Keyword or skill (optional)</label>
          <input id="keyword-search" type="search" placeholder="Keyword or skill (optional)" autocomplete="off" />
          <label class="visually-hidden" for="city-select">Choose a city</label>
          <select id="city-select" required>
            <option value="" disabled selected>Select a city</option>
{}
          </select>
        </div>
        <button type="submit">View city insights</button>
      </form>
    </section>
  </main>
"#,
        city_options(pages)
    ));

    html.push_str(&page_footer());

    html
}

/// Write the rendered page, replacing any existing file
pub fn write_home_page(html: &str, output: &Path) -> Result<()> {
    fs::write(output, html)
        .with_context(|| format!("Failed to write home page: {}", output.display()))
}

/// Main generation function
pub fn run_generate(dist_dir: &Path, output: &Path) -> Result<()> {
    info!("Scanning {} for city pages", dist_dir.display());
    let pages = discover_city_pages(dist_dir)?;

    let html = build_home_html(&pages);
    write_home_page(&html, output)?;

    println!("✅ Wrote home page to '{}'.", output.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};
    use tempfile::TempDir;

    /// (value, text, disabled) for every option after the "Select a city" prompt
    fn parsed_options(html: &str) -> Vec<(String, String, bool)> {
        let document = Html::parse_document(html);
        let selector = Selector::parse("select#city-select option").unwrap();
        document
            .select(&selector)
            .skip(1)
            .map(|option| {
                let el = option.value();
                (
                    el.attr("value").unwrap_or_default().to_string(),
                    option.text().collect::<String>(),
                    el.attr("disabled").is_some(),
                )
            })
            .collect()
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("Raleigh"), "Raleigh");
        assert_eq!(html_escape("A & B"), "A &amp; B");
        assert_eq!(
            html_escape(r#"<script>alert("x")</script>"#),
            "&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt;"
        );
        assert_eq!(html_escape("O'Neil"), "O&#39;Neil");
        assert_eq!(html_escape("&amp;"), "&amp;amp;");
    }

    #[test]
    fn test_options_match_entries() {
        let pages = vec![
            CityPage::new("Durham, NC", "dist/durham-nc/index.html"),
            CityPage::new("Raleigh", "dist/raleigh/index.html"),
        ];
        let html = build_home_html(&pages);

        assert_eq!(
            parsed_options(&html),
            vec![
                (
                    "dist/durham-nc/index.html".to_string(),
                    "Durham, NC".to_string(),
                    false
                ),
                (
                    "dist/raleigh/index.html".to_string(),
                    "Raleigh".to_string(),
                    false
                ),
            ]
        );
        assert!(!html.contains("No city pages found"));
    }

    #[test]
    fn test_prompt_option_comes_first() {
        let html = build_home_html(&[CityPage::new("Cary", "dist/cary/index.html")]);
        let document = Html::parse_document(&html);
        let selector = Selector::parse("select#city-select option").unwrap();
        let first = document.select(&selector).next().unwrap();
        assert_eq!(first.value().attr("value"), Some(""));
        assert!(first.value().attr("disabled").is_some());
        assert!(first.value().attr("selected").is_some());
        assert_eq!(first.text().collect::<String>(), "Select a city");
    }

    #[test]
    fn test_empty_renders_placeholder_only() {
        let html = build_home_html(&[]);

        assert_eq!(
            parsed_options(&html),
            vec![(String::new(), "No city pages found".to_string(), true)]
        );
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_entries_are_escaped() {
        let pages = vec![
            CityPage::new("Fuquay & Varina", "dist/a&b/index.html"),
            CityPage::new(
                r#"Evil"><script>alert(1)</script>"#,
                r#"dist/"><script>/index.html"#,
            ),
        ];
        let html = build_home_html(&pages);

        assert!(html.contains(
            r#"<option value="dist/a&amp;b/index.html">Fuquay &amp; Varina</option>"#
        ));
        assert!(!html.contains("<script>alert(1)</script>"));

        let document = Html::parse_document(&html);
        let scripts = Selector::parse("script").unwrap();
        assert_eq!(document.select(&scripts).count(), 1);

        let options = parsed_options(&html);
        assert_eq!(options.len(), 2);
        assert_eq!(options[0].0, "dist/a&b/index.html");
        assert_eq!(options[0].1, "Fuquay & Varina");
        assert_eq!(options[1].0, r#"dist/"><script>/index.html"#);
        assert_eq!(options[1].1, r#"Evil"><script>alert(1)</script>"#);
    }

    #[test]
    fn test_page_is_self_contained() {
        let html = build_home_html(&[CityPage::new("Boone", "dist/boone/index.html")]);
        let document = Html::parse_document(&html);

        for sel in ["link[rel=stylesheet]", "script[src]", "img"] {
            let selector = Selector::parse(sel).unwrap();
            assert_eq!(document.select(&selector).count(), 0, "{}", sel);
        }
        let title = Selector::parse("title").unwrap();
        assert_eq!(
            document.select(&title).next().unwrap().text().collect::<String>(),
            SITE_TITLE
        );
        for id in ["#city-form", "#city-search", "#keyword-search", "#city-select"] {
            let selector = Selector::parse(id).unwrap();
            assert_eq!(document.select(&selector).count(), 1, "{}", id);
        }
    }

    #[test]
    fn test_script_handles_filter_and_keyword() {
        let html = build_home_html(&[]);
        assert!(html.contains("option.text.toLowerCase().includes(term)"));
        assert!(html.contains("destination.includes('?') ? '&' : '?'"));
        assert!(html.contains("'q=' + encodeURIComponent(keyword)"));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let pages = vec![CityPage::new("Raleigh", "dist/raleigh/index.html")];
        assert_eq!(build_home_html(&pages), build_home_html(&pages));
    }

    #[test]
    fn test_write_overwrites_existing_file() {
        let tmp = TempDir::new().unwrap();
        let output = tmp.path().join("home.html");
        fs::write(&output, "stale content that is longer than the new one").unwrap();

        write_home_page("<p>new</p>", &output).unwrap();
        assert_eq!(fs::read_to_string(&output).unwrap(), "<p>new</p>");
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let tmp = TempDir::new().unwrap();
        let output = tmp.path().join("missing").join("home.html");

        let err = write_home_page("<p></p>", &output).unwrap_err();
        assert!(err.to_string().contains("home.html"));
    }

    #[test]
    fn test_run_generate_end_to_end() {
        let tmp = TempDir::new().unwrap();
        let dist = tmp.path().join("dist");
        for rel in ["index.html", "about.html", "raleigh/index.html", "cities/cary-nc.html"] {
            let path = dist.join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "<html></html>").unwrap();
        }
        let output = tmp.path().join("home.html");

        run_generate(&dist, &output).unwrap();

        let html = fs::read_to_string(&output).unwrap();
        let options = parsed_options(&html);
        assert_eq!(
            options,
            vec![
                (
                    "dist/cities/cary-nc.html".to_string(),
                    "Cary, NC".to_string(),
                    false
                ),
                (
                    "dist/raleigh/index.html".to_string(),
                    "Raleigh".to_string(),
                    false
                ),
            ]
        );
    }

    #[test]
    fn test_run_generate_without_dist() {
        let tmp = TempDir::new().unwrap();
        let output = tmp.path().join("home.html");

        run_generate(&tmp.path().join("dist"), &output).unwrap();

        let html = fs::read_to_string(&output).unwrap();
        assert!(html.contains(r#"<option value="" disabled>No city pages found</option>"#));
    }
}
