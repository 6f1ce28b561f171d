//! Payload normalizer
//!
//! Converts the mixed screenshot representations the frontend may send
//! (bare base64 string, wrapped object, already-prefixed data URI) into a
//! canonical ordered list of data URIs, bounds the image count, and renders
//! the contextual metadata into a single text block for the prompt.

use adscribe_core::AppError;
use serde::Deserialize;

/// Rendered when a client context field is absent; lines are never omitted.
const FIELD_PLACEHOLDER: &str = "未提供";

/// One screenshot as supplied over the wire: either an encoded string or a
/// structured object wrapping one.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ScreenshotInput {
    Encoded(String),
    Structured(ScreenshotObject),
}

/// Structured screenshot wrapper. The encoded field is taken from a fixed
/// priority order: `data`, then `base64`, then `src`.
#[derive(Debug, Clone, Deserialize)]
pub struct ScreenshotObject {
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub base64: Option<String>,
    #[serde(default)]
    pub src: Option<String>,
}

/// Client identity rendered into the context block
#[derive(Debug, Clone, Deserialize)]
pub struct ClientContext {
    pub name: Option<String>,
    pub industry: Option<String>,
}

/// Optional structured-data attachment (CSV export from an ad platform)
#[derive(Debug, Clone)]
pub struct TabularAttachment {
    pub data: String,
    pub file_name: Option<String>,
}

/// Normalizer output: bounded ordered data URIs plus the context block
#[derive(Debug, Clone)]
pub struct NormalizedPayload {
    pub images: Vec<String>,
    pub context_block: String,
}

impl NormalizedPayload {
    pub fn image_count(&self) -> usize {
        self.images.len()
    }
}

fn normalize_item(item: &ScreenshotInput) -> Option<String> {
    let encoded = match item {
        ScreenshotInput::Encoded(s) => s.clone(),
        ScreenshotInput::Structured(obj) => obj
            .data
            .clone()
            .or_else(|| obj.base64.clone())
            .or_else(|| obj.src.clone())
            .unwrap_or_default(),
    };

    if encoded.is_empty() {
        return None;
    }

    if encoded.starts_with("data:") {
        Some(encoded)
    } else {
        Some(format!("data:image/png;base64,{}", encoded))
    }
}

/// Normalize the screenshot list and assemble the context block.
///
/// Excess images beyond `max_images` are silently dropped, not an error.
/// Zero usable images is a validation failure unless a tabular attachment
/// carries the data instead.
pub fn normalize_payload(
    screenshots: &[ScreenshotInput],
    client: Option<&ClientContext>,
    notes: Option<&str>,
    tabular: Option<&TabularAttachment>,
    max_images: usize,
) -> Result<NormalizedPayload, AppError> {
    let images: Vec<String> = screenshots
        .iter()
        .take(max_images)
        .filter_map(normalize_item)
        .collect();

    let has_tabular = tabular.map(|t| !t.data.trim().is_empty()).unwrap_or(false);
    if images.is_empty() && !has_tabular {
        return Err(AppError::Validation("沒有收到圖片".to_string()));
    }

    let context_block = build_context_block(client, notes, tabular.filter(|_| has_tabular));

    Ok(NormalizedPayload {
        images,
        context_block,
    })
}

fn build_context_block(
    client: Option<&ClientContext>,
    notes: Option<&str>,
    tabular: Option<&TabularAttachment>,
) -> String {
    let mut block = String::new();

    if let Some(client) = client {
        block.push_str(&format!(
            "【客戶資訊】\n客戶名稱：{}\n產業類別：{}\n\n",
            client.name.as_deref().unwrap_or(FIELD_PLACEHOLDER),
            client.industry.as_deref().unwrap_or(FIELD_PLACEHOLDER),
        ));
    }

    if let Some(notes) = notes {
        if !notes.trim().is_empty() {
            block.push_str(&format!("【本期特殊狀況/備註】\n{}\n\n", notes));
        }
    }

    if let Some(tabular) = tabular {
        let label = tabular
            .file_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .map(|n| format!("【CSV 數據】（{}）", n))
            .unwrap_or_else(|| "【CSV 數據】".to_string());
        block.push_str(&format!("{}\n{}\n\n", label, tabular.data));
    }

    block
}
