//! 要素が無くても失敗しないフィールド読み取り

use crate::error::ScraperError;
use crate::events::{EventSink, ExtractionEvent};
use crate::surface::Surface;

/// 1項目ずつ読み取り、要素が無い・途中で消えた場合は空値を返す
///
/// ページ自体が壊れている（致命的な）エラーだけを `Err` として返す。
pub struct FieldReader<'a, S: Surface> {
    surface: &'a S,
    events: &'a dyn EventSink,
}

impl<'a, S: Surface> Clone for FieldReader<'a, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, S: Surface> Copy for FieldReader<'a, S> {}

impl<'a, S: Surface> FieldReader<'a, S> {
    pub fn new(surface: &'a S, events: &'a dyn EventSink) -> Self {
        Self { surface, events }
    }

    pub fn surface(&self) -> &'a S {
        self.surface
    }

    fn recover<T: Default>(&self, selector: &str, result: Result<T, ScraperError>) -> Result<T, ScraperError> {
        match result {
            Ok(value) => Ok(value),
            Err(e) if e.is_recoverable() => {
                self.events.record(ExtractionEvent::FieldUnavailable {
                    selector: selector.to_string(),
                    reason: e.to_string(),
                });
                Ok(T::default())
            }
            Err(e) => Err(e),
        }
    }

    /// 最初に一致した要素のテキスト（前後の空白を除去）。無ければ空文字。
    pub async fn read(&self, selector: &str, scope: Option<&S::Element>) -> Result<String, ScraperError> {
        Ok(self.read_optional(selector, scope).await?.unwrap_or_default())
    }

    /// `read` と同じだが、要素が無い場合を `None` で区別する
    pub async fn read_optional(
        &self,
        selector: &str,
        scope: Option<&S::Element>,
    ) -> Result<Option<String>, ScraperError> {
        let text = self.surface.text_content(selector, scope).await;
        let text = self.recover(selector, text)?;
        Ok(text.map(|t| t.trim().to_string()))
    }

    pub async fn read_attribute(
        &self,
        selector: &str,
        name: &str,
        scope: Option<&S::Element>,
    ) -> Result<String, ScraperError> {
        let value = self.surface.attribute(selector, name, scope).await;
        let value = self.recover(selector, value)?;
        Ok(value.map(|v| v.trim().to_string()).unwrap_or_default())
    }

    /// 要素そのもののテキスト
    pub async fn read_element(&self, element: &S::Element) -> Result<String, ScraperError> {
        let text = self.surface.element_text(element).await;
        let text = self.recover("<element>", text)?;
        Ok(text.map(|t| t.trim().to_string()).unwrap_or_default())
    }

    pub async fn exists(&self, selector: &str, scope: Option<&S::Element>) -> Result<bool, ScraperError> {
        let found = self
            .surface
            .query(selector, scope)
            .await
            .map(|element| element.is_some());
        self.recover(selector, found)
    }

    /// 一致した全要素のテキストをドキュメント順で返す
    pub async fn read_lines(
        &self,
        selector: &str,
        scope: Option<&S::Element>,
    ) -> Result<Vec<String>, ScraperError> {
        let elements = self.surface.query_all(selector, scope).await;
        let elements = self.recover(selector, elements)?;
        let mut lines = Vec::with_capacity(elements.len());
        for element in &elements {
            lines.push(self.read_element(element).await?);
        }
        Ok(lines)
    }

    /// `selector` のテキストから、内側の `exclude` 要素（「もっと見る」など）の文字列を除いて返す
    pub async fn read_filtered(
        &self,
        selector: &str,
        exclude: &str,
        scope: Option<&S::Element>,
    ) -> Result<String, ScraperError> {
        let target = self.surface.query(selector, scope).await;
        let Some(target) = self.recover(selector, target)? else {
            return Ok(String::new());
        };
        let text = self.surface.element_text(&target).await;
        let text = self.recover(selector, text)?.unwrap_or_default();

        let excluded = self.surface.text_content(exclude, Some(&target)).await;
        let excluded = self.recover(exclude, excluded)?.unwrap_or_default();
        let excluded = excluded.trim();

        Ok(strip_toggle(text.trim(), excluded).trim().to_string())
    }
}

/// 切り替えボタンの文字列は本文の後ろにあるので、最後に現れた箇所だけを除く
fn strip_toggle(text: &str, toggle: &str) -> String {
    if toggle.is_empty() {
        return text.to_string();
    }
    if let Some(rest) = text.strip_suffix(toggle) {
        return rest.to_string();
    }
    match text.rfind(toggle) {
        Some(pos) => format!("{}{}", &text[..pos], &text[pos + toggle.len()..]),
        None => text.to_string(),
    }
}
