//! Public report view
//!
//! Read-only rendering surface addressed by report id, requiring no
//! authentication: any holder of the URL can view. This is a deliberate,
//! documented trust boundary; report ids are UUIDs and the links are only
//! handed out through distribution.

use crate::error::HttpAppError;
use crate::state::AppState;
use adscribe_core::AppError;
use axum::{
    extract::{Path, State},
    response::Html,
};
use pulldown_cmark::{html, Options, Parser};
use std::sync::Arc;
use uuid::Uuid;

#[tracing::instrument(skip(state), fields(report_id = %id, operation = "view_report"))]
pub async fn view_report(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<Html<String>, HttpAppError> {
    let (report, client_name) = state
        .db
        .reports
        .get_report_with_client(id)
        .await?
        .ok_or_else(|| AppError::NotFound("找不到報告".to_string()))?;

    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    let parser = Parser::new_ext(&report.content, options);
    let mut body = String::new();
    html::push_html(&mut body, parser);

    Ok(Html(render_page(&client_name, &report.report_date.to_string(), &body)))
}

fn render_page(client_name: &str, report_date: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="zh-Hant">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{client} 廣告報告</title>
<style>
body {{ font-family: system-ui, -apple-system, "Noto Sans TC", sans-serif; max-width: 48rem; margin: 0 auto; padding: 2rem 1rem; color: #1f2937; line-height: 1.8; }}
h1 {{ font-size: 1.5rem; border-bottom: 2px solid #e5e7eb; padding-bottom: 0.5rem; }}
table {{ border-collapse: collapse; width: 100%; margin: 1rem 0; }}
th, td {{ border: 1px solid #d1d5db; padding: 0.5rem 0.75rem; text-align: left; }}
th {{ background: #f3f4f6; }}
.meta {{ color: #6b7280; font-size: 0.875rem; margin-bottom: 2rem; }}
</style>
</head>
<body>
<h1>{client} 廣告報告</h1>
<div class="meta">報告日期：{date}</div>
{body}
</body>
</html>
"#,
        client = client_name,
        date = report_date,
        body = body,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_page_contains_client_and_body() {
        let page = render_page("ABC", "2026-08-08", "<p>內容</p>");
        assert!(page.contains("<title>ABC 廣告報告</title>"));
        assert!(page.contains("報告日期：2026-08-08"));
        assert!(page.contains("<p>內容</p>"));
    }

    #[test]
    fn test_markdown_tables_render_as_html() {
        let markdown = "| 指標 | 數值 |\n|------|------|\n| CTR | 2.4% |";
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        let parser = Parser::new_ext(markdown, options);
        let mut body = String::new();
        html::push_html(&mut body, parser);
        assert!(body.contains("<table>"));
        assert!(body.contains("CTR"));
    }
}
