// In crates/presentation/src/chart.rs

use core_types::AnnotatedBar;
use serde_json::{Value, json};
use std::path::PathBuf;

use crate::{Error, Presenter, Result};

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// Renders price candles, the SMA and the strategy equity into a standalone
/// HTML page backed by plotly.js.
///
/// The equity curve sits on a secondary y-axis on the right, so price and
/// strategy value stay readable even when their scales differ by orders of
/// magnitude.
#[derive(Debug, Clone)]
pub struct HtmlChart {
    path: PathBuf,
}

impl HtmlChart {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Presenter for HtmlChart {
    fn name(&self) -> &'static str {
        "HtmlChart"
    }

    fn present(&self, title: &str, rows: &[AnnotatedBar]) -> Result<PathBuf> {
        if rows.is_empty() {
            return Err(Error::EmptySeries);
        }

        let page = render_page(title, rows)?;
        std::fs::write(&self.path, page)?;

        tracing::info!(path = %self.path.display(), "Chart written.");
        Ok(self.path.clone())
    }
}

/// Builds the plotly traces: candlesticks, SMA line, equity line.
fn traces(rows: &[AnnotatedBar]) -> Value {
    let dates: Vec<String> = rows.iter().map(|row| row.bar.date.to_string()).collect();
    let column = |f: fn(&AnnotatedBar) -> f64| rows.iter().map(f).collect::<Vec<f64>>();
    // `None` serializes to null, which plotly draws as a gap.
    let sma: Vec<Option<f64>> = rows.iter().map(|row| row.sma).collect();

    json!([
        {
            "type": "candlestick",
            "name": "Price (Candlestick)",
            "x": dates,
            "open": column(|row| row.bar.open),
            "high": column(|row| row.bar.high),
            "low": column(|row| row.bar.low),
            "close": column(|row| row.bar.close),
        },
        {
            "type": "scatter",
            "mode": "lines",
            "name": "SMA",
            "x": dates,
            "y": sma,
            "line": { "color": "red", "width": 2 },
        },
        {
            "type": "scatter",
            "mode": "lines",
            "name": "Strategy Value",
            "x": dates,
            "y": column(|row| row.equity),
            "yaxis": "y2",
            "line": { "color": "green", "width": 2 },
        },
    ])
}

fn layout(title: &str) -> Value {
    json!({
        "title": { "text": title, "x": 0.5 },
        "plot_bgcolor": "white",
        "paper_bgcolor": "white",
        "font": { "color": "black" },
        "xaxis": { "rangeslider": { "visible": true }, "tickformat": "%Y-%m-%d" },
        "yaxis": { "title": { "text": "Price (USD)" }, "showgrid": true, "color": "black" },
        "yaxis2": { "title": { "text": "Strategy Value" }, "overlaying": "y", "side": "right" },
        "legend": { "orientation": "h", "yanchor": "bottom", "y": 1.02, "xanchor": "right", "x": 1 },
    })
}

fn render_page(title: &str, rows: &[AnnotatedBar]) -> Result<String> {
    let data = script_safe(serde_json::to_string(&traces(rows))?);
    let layout = script_safe(serde_json::to_string(&layout(title))?);

    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{cdn}"></script>
</head>
<body>
<div id="chart" style="width:100%;height:90vh;"></div>
<script>
Plotly.newPlot("chart", {data}, {layout}, {{"responsive": true}});
</script>
</body>
</html>
"#,
        title = escape_html(title),
        cdn = PLOTLY_CDN,
    ))
}

// JSON inside <script> must not close the tag early.
fn script_safe(json: String) -> String {
    json.replace("</", "<\\/")
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use core_types::Bar;

    fn rows() -> Vec<AnnotatedBar> {
        (1..=3)
            .map(|d| AnnotatedBar {
                bar: Bar {
                    date: NaiveDate::from_ymd_opt(2024, 5, d).unwrap(),
                    open: 10.0,
                    high: 12.0,
                    low: 9.0,
                    close: 11.0,
                    volume: 0.0,
                },
                sma: (d == 3).then_some(10.5),
                equity: 404.0,
            })
            .collect()
    }

    #[test]
    fn traces_hold_candles_sma_and_equity() {
        let traces = traces(&rows());

        assert_eq!(traces[0]["type"], "candlestick");
        assert_eq!(traces[0]["x"][0], "2024-05-01");
        assert_eq!(traces[1]["y"], json!([null, null, 10.5]));
        assert_eq!(traces[2]["yaxis"], "y2");
        assert_eq!(traces[2]["y"], json!([404.0, 404.0, 404.0]));
    }

    #[test]
    fn page_is_written_with_escaped_title() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.html");

        let written = HtmlChart::new(&path).present("BTC <SMA200> </script>", &rows()).unwrap();
        let html = std::fs::read_to_string(written).unwrap();

        assert!(html.contains("<title>BTC &lt;SMA200&gt; &lt;/script&gt;</title>"));
        assert!(html.contains("Plotly.newPlot(\"chart\""));
        assert!(html.contains("<\\/script>"));
        assert_eq!(html.matches("</script>").count(), 2);
    }

    #[test]
    fn rendering_into_a_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let chart = HtmlChart::new(dir.path().join("nope").join("chart.html"));
        assert!(matches!(chart.present("t", &rows()), Err(Error::Io(_))));
    }
}
